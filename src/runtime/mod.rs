use std::env;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::controller::PlaybackController;
use crate::media::RodioMedia;

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, warning) = settings::load_settings();
    logging::init(&settings.logging);
    if let Some(msg) = warning {
        log::warn!("{msg}");
    }

    let dir_arg = env::args().nth(1);
    let (catalog, origin) = startup::build_catalog(dir_arg.as_deref(), &settings.library)?;
    log::info!("catalog: {} tracks from {origin}", catalog.len());

    let (media, media_events) = RodioMedia::spawn_or_silent(&settings.audio);
    let mut controller =
        PlaybackController::new(catalog, media).with_auto_advance(settings.playback.auto_advance);

    let mut app = App::new(controller.catalog().len());
    app.fullscreen = settings.ui.start_fullscreen;
    app.set_library_origin(origin);

    startup::apply_playback_defaults(&mut controller, &settings);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut controller,
        &media_events,
        &mut state,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    log::info!("exiting");
    run_result
}
