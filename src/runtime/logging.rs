use std::fs::OpenOptions;

use log::LevelFilter;

use crate::config::LoggingSettings;

/// Initialise `colog`. The terminal belongs to the UI, so records go to the
/// configured file; without one logging stays off unless `RUST_LOG` is set.
pub fn init(settings: &LoggingSettings) {
    let mut builder = colog::default_builder();
    builder.filter(None, LevelFilter::from(settings.level));

    match &settings.file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("cadence: cannot open log file {}: {e}", path.display());
                builder.filter(None, LevelFilter::Off);
            }
        },
        None if std::env::var_os("RUST_LOG").is_some() => {
            builder.parse_default_env();
        }
        None => {
            builder.filter(None, LevelFilter::Off);
        }
    }

    // A second init (tests, embedding) keeps the first logger.
    let _ = builder.try_init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));
}
