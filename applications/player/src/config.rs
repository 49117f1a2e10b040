/// Player configuration
use crate::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tune_core::Catalog;
use tune_playback::PlaybackConfig;
use tune_playback_desktop::{MAX_SPEED, MIN_SPEED};

/// Default config file, used when present in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "player.toml";

/// Prefix for environment overrides (`TUNE_CATALOG`, `TUNE_PLAYBACK__VOLUME`)
pub const ENV_PREFIX: &str = "TUNE";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Track catalog (TOML or JSON)
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,

    /// Speed factor of the silent clock backend
    #[serde(default = "default_clock_speed")]
    pub clock_speed: f32,

    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `player.toml` is read if
    /// present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Same as [`load`](Self::load) with a custom environment prefix
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Nested keys use a double underscore: TUNE_PLAYBACK__POSITION_INTERVAL_MS
        settings = settings.add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| PlayerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| PlayerError::Config(e.to_string()))
    }

    /// Load the configured track catalog
    pub fn load_catalog(&self) -> Result<Catalog> {
        Ok(Catalog::load(&self.catalog)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.catalog.as_os_str().is_empty() {
            return Err(PlayerError::Config(
                "Catalog path is required (set TUNE_CATALOG or --catalog)".to_string(),
            ));
        }

        let volume = self.playback.volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(PlayerError::Config(format!(
                "playback.volume must be between 0.0 and 1.0, got {}",
                volume
            )));
        }

        if self.playback.position_interval_ms == 0 {
            return Err(PlayerError::Config(
                "playback.position_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.playback.command_buffer == 0 {
            return Err(PlayerError::Config(
                "playback.command_buffer must be greater than 0".to_string(),
            ));
        }

        if !(MIN_SPEED..=MAX_SPEED).contains(&self.clock_speed) {
            return Err(PlayerError::Config(format!(
                "clock_speed must be between {} and {}, got {}",
                MIN_SPEED, MAX_SPEED, self.clock_speed
            )));
        }

        Ok(())
    }
}

// Default values
fn default_catalog() -> PathBuf {
    PathBuf::from("catalog.toml")
}

fn default_clock_speed() -> f32 {
    1.0
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            clock_speed: default_clock_speed(),
            playback: PlaybackConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = PlayerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.catalog, PathBuf::from("catalog.toml"));
        assert_eq!(config.playback.volume, 0.8);
    }

    #[test]
    fn load_from_file_fills_missing_fields() {
        let file = write_config(
            r#"
            catalog = "/srv/tune/catalog.json"

            [playback]
            volume = 0.5
            shuffled = true
            "#,
        );

        let config =
            PlayerConfig::load_with_prefix(Some(file.path()), "TUNE_TEST_FILE_ONLY").unwrap();

        assert_eq!(config.catalog, PathBuf::from("/srv/tune/catalog.json"));
        assert_eq!(config.playback.volume, 0.5);
        assert!(config.playback.shuffled);
        assert!(!config.playback.looped);
        assert_eq!(config.playback.position_interval_ms, 250);
        assert_eq!(config.clock_speed, 1.0);
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_config("[playback]\nvolume = 0.5\n");
        std::env::set_var("TUNE_TEST_ENV_PLAYBACK__VOLUME", "0.25");
        std::env::set_var("TUNE_TEST_ENV_PLAYBACK__POSITION_INTERVAL_MS", "100");
        std::env::set_var("TUNE_TEST_ENV_CLOCK_SPEED", "8");

        let config = PlayerConfig::load_with_prefix(Some(file.path()), "TUNE_TEST_ENV").unwrap();

        assert_eq!(config.playback.volume, 0.25);
        assert_eq!(config.playback.position_interval_ms, 100);
        assert_eq!(config.clock_speed, 8.0);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = PlayerConfig::load_with_prefix(
            Some(Path::new("/definitely/not/here/player.toml")),
            "TUNE_TEST_MISSING",
        );
        assert!(matches!(result, Err(PlayerError::Config(_))));
    }

    #[test]
    fn missing_catalog_is_a_catalog_error() {
        let config = PlayerConfig {
            catalog: PathBuf::from("/definitely/not/here/catalog.toml"),
            ..PlayerConfig::default()
        };
        assert!(matches!(config.load_catalog(), Err(PlayerError::Catalog(_))));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut config = PlayerConfig::default();
        config.playback.volume = 1.5;
        assert!(config.validate().is_err());

        let mut config = PlayerConfig::default();
        config.playback.position_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = PlayerConfig::default();
        config.clock_speed = 0.0;
        assert!(config.validate().is_err());

        let mut config = PlayerConfig::default();
        config.catalog = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_bounds_clock_speed() {
        let mut config = PlayerConfig::default();
        for speed in [1e30, 1e-30, f32::NAN, f32::INFINITY, -2.0] {
            config.clock_speed = speed;
            assert!(config.validate().is_err(), "accepted clock_speed {}", speed);
        }
        for speed in [MIN_SPEED, 1.0, 40.0, MAX_SPEED] {
            config.clock_speed = speed;
            assert!(config.validate().is_ok(), "rejected clock_speed {}", speed);
        }
    }
}
