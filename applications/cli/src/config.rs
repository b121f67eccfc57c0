/// Console front end configuration
use crate::error::{CliError, Result};
use encore_library::LibraryConfig;
use encore_session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read when no `--config` is given (optional)
pub const DEFAULT_CONFIG_FILE: &str = "encore.toml";

/// Environment variable prefix, e.g. `ENCORE_SESSION__INITIAL_VOLUME=0.3`
pub const ENV_PREFIX: &str = "ENCORE";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub simulator: SimulatorSettings,
}

/// Behaviour of the simulated playback engine
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulatorSettings {
    /// Seconds each track "plays" before the engine reports idle
    #[serde(default = "default_track_secs")]
    pub track_secs: u64,

    /// Refuse to play tracks whose file has disappeared
    #[serde(default = "default_require_files")]
    pub require_files: bool,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            track_secs: default_track_secs(),
            require_files: default_require_files(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `encore.toml` is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (ENCORE_<SECTION>__<KEY>)
        settings = settings.add_source(
            config::Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.session.validate().map_err(CliError::Config)?;

        if self.library.extensions.is_empty() {
            return Err(CliError::Config(
                "library.extensions must list at least one extension".to_string(),
            ));
        }

        if self.simulator.track_secs == 0 {
            return Err(CliError::Config(
                "simulator.track_secs must be >= 1".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_track_secs() -> u64 {
    5
}

fn default_require_files() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert_eq!(config.library.music_dir, PathBuf::from("musics"));
        assert_eq!(config.session.initial_volume, 0.5);
        assert_eq!(config.simulator.track_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("encore.toml");
        fs::write(
            &path,
            r#"
[library]
music_dir = "/srv/music"

[session]
initial_volume = 0.8
ended_linger_secs = 30

[simulator]
track_secs = 2
"#,
        )
        .unwrap();

        let config = AppConfig::load_with_prefix(Some(&path), "ENCORE_TEST_FILE").unwrap();
        assert_eq!(config.library.music_dir, PathBuf::from("/srv/music"));
        assert_eq!(config.library.extensions, vec!["mp3".to_string()]);
        assert_eq!(config.session.initial_volume, 0.8);
        assert_eq!(config.session.ended_linger_secs, 30);
        assert_eq!(config.session.volume_step, 0.1);
        assert_eq!(config.simulator.track_secs, 2);
    }

    #[test]
    fn environment_overrides_file() {
        std::env::set_var("ENCORE_TEST_ENV_SESSION__VOLUME_STEP", "0.25");

        let config = AppConfig::load_with_prefix(None, "ENCORE_TEST_ENV").unwrap();
        assert_eq!(config.session.volume_step, 0.25);

        std::env::remove_var("ENCORE_TEST_ENV_SESSION__VOLUME_STEP");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.session.initial_volume = 2.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.simulator.track_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.library.extensions.clear();
        assert!(config.validate().is_err());
    }
}
