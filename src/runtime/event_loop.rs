use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::catalog::TrackId;
use crate::config;
use crate::controller::PlaybackController;
use crate::media::{MediaEvent, RodioMedia};
use crate::ui::{self, HitAreas};

type Controller = PlaybackController<RodioMedia>;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Clickable regions from the most recent draw.
    pub hits: HitAreas,
    /// Selection seen on the previous iteration, to detect track changes.
    last_selected: Option<TrackId>,
}

/// Main terminal event loop: drains media events into the controller, draws,
/// and turns input into intents. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller,
    media_events: &Receiver<MediaEvent>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Ticks are consumed in arrival order; stale generations are dropped by the controller.
        while let Ok(ev) = media_events.try_recv() {
            controller.handle_event(ev);
        }
        for notice in controller.take_notices() {
            app.set_notice(notice);
        }

        // Keep the cursor on the playing track when the selection moves (next/prev, auto-advance).
        if controller.session().selected != state.last_selected {
            state.last_selected = controller.session().selected.clone();
            let idx = state
                .last_selected
                .as_ref()
                .and_then(|id| controller.catalog().index_of(id));
            app.follow(idx);
        }

        let session = controller.snapshot();
        terminal.draw(|f| {
            state.hits = ui::draw(
                f,
                app,
                controller.catalog(),
                &session,
                &settings.ui,
                &settings.controls,
            );
        })?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, settings, app, controller, state) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, app, controller, state),
                _ => {}
            }
        }
    }

    Ok(())
}

fn quit(settings: &config::Settings, controller: &Controller) {
    controller
        .media()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
}

/// Select the track at library row `idx`.
fn play_row(idx: usize, app: &mut App, controller: &mut Controller) {
    let Some(id) = controller.catalog().get_index(idx).map(|t| t.id.clone()) else {
        return;
    };
    app.follow_playback = true;
    app.clear_notice();
    if let Err(e) = controller.select(&id) {
        log::error!("select row {idx}: {e}");
    }
}

/// Returns `true` when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller,
    state: &mut EventLoopState,
) -> bool {
    let seek_step = f64::from(settings.controls.seek_step_percent) / 100.0;

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => {
            quit(settings, controller);
            return true;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback = false;
            app.cursor_next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback = false;
            app.cursor_prev();
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback = false;
                app.cursor_top();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            app.follow_playback = false;
            app.cursor_bottom();
        }
        KeyCode::Enter => play_row(app.cursor, app, controller),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            app.clear_notice();
            controller.toggle_play_pause();
        }
        KeyCode::Char('l') => {
            app.follow_playback = true;
            app.clear_notice();
            controller.next();
        }
        KeyCode::Char('h') => {
            app.follow_playback = true;
            app.clear_notice();
            controller.prev();
        }
        KeyCode::Char('L') => controller.seek_relative(seek_step),
        KeyCode::Char('H') => controller.seek_relative(-seek_step),
        KeyCode::Char('f') => app.toggle_fullscreen(),
        KeyCode::Char('K') => app.toggle_metadata_window(),
        KeyCode::Esc => {
            app.metadata_window = false;
            app.clear_notice();
        }
        _ => {}
    }

    false
}

fn handle_mouse_event(
    mouse: MouseEvent,
    app: &mut App,
    controller: &mut Controller,
    state: &mut EventLoopState,
) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some((offset_x, width)) = state.hits.progress_offset(mouse.column, mouse.row) {
                controller.seek(offset_x, width);
            } else if let Some(idx) = state.hits.library_index(mouse.column, mouse.row) {
                app.set_cursor(idx);
                play_row(idx, app, controller);
            }
        }
        MouseEventKind::ScrollDown => {
            app.follow_playback = false;
            app.cursor_next();
        }
        MouseEventKind::ScrollUp => {
            app.follow_playback = false;
            app.cursor_prev();
        }
        _ => {}
    }
}
