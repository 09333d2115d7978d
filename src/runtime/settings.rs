use crate::config;
use crate::error::SettingsError;

/// Load settings, falling back to defaults. The second value is a warning to
/// log once logging is up.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => (s, None),
        // Config is optional; failures should not prevent the app from starting.
        Err(e @ SettingsError::Invalid { .. }) => (
            config::Settings::default(),
            Some(format!("invalid config, using defaults: {e}")),
        ),
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}
