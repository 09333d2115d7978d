use std::env;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;

use super::schema::Settings;

/// Prefix of environment overrides, e.g. `CADENCE__AUDIO__TICK_INTERVAL_MS`.
const ENV_PREFIX: &str = "CADENCE";
/// Explicit config file location.
const PATH_VAR: &str = "CADENCE_CONFIG_PATH";

impl Settings {
    /// Load and validate settings from the resolved config file and the
    /// environment.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(resolve_config_path().as_deref())
    }

    /// Layer the environment over `file` (skipped when absent) over struct
    /// defaults, then validate the result.
    pub fn load_from(file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        let settings: Settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the player cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.audio.tick_interval_ms == 0 {
            return Err(SettingsError::Invalid {
                key: "audio.tick_interval_ms",
                reason: "must be at least 1".into(),
            });
        }
        if !(1..=100).contains(&self.controls.seek_step_percent) {
            return Err(SettingsError::Invalid {
                key: "controls.seek_step_percent",
                reason: format!("{} is outside 1..=100", self.controls.seek_step_percent),
            });
        }
        Ok(())
    }
}

/// `CADENCE_CONFIG_PATH` when set, otherwise [`default_config_path`].
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os(PATH_VAR)
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `$XDG_CONFIG_HOME/cadence/config.toml`, falling back to
/// `~/.config/cadence/config.toml`. Relative `XDG_CONFIG_HOME` values are ignored.
pub fn default_config_path() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|dir| dir.join("cadence").join("config.toml"))
}
