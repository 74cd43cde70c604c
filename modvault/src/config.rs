//! Configuration file handling for `~/.modvault/config.ini`.
//!
//! Loads and saves user configuration with sensible defaults. Parsing
//! starts from `Config::default()` and overlays any values found in the
//! INI, so a partial file is always valid.

use ini::Ini;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default seconds between full update scans (1 hour).
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 3600;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

/// Game installation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSettings {
    /// Root directory of the game installation. `None` until configured.
    pub install_dir: Option<PathBuf>,
}

/// Update tracking settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSettings {
    /// Seconds between full update scans.
    pub check_interval_secs: u64,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            check_interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
        }
    }
}

/// User configuration, backed by `~/.modvault/config.ini`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// `[game]` section.
    pub game: GameSettings,
    /// `[updates]` section.
    pub updates: UpdateSettings,
}

impl Config {
    /// Load configuration from the default path (`~/.modvault/config.ini`).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::DirectoryError)?;
        }

        std::fs::write(path, self.to_config_string())
            .map_err(|e| ConfigError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    /// The update check interval as a [`Duration`].
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.updates.check_interval_secs)
    }

    /// Commented INI representation written to `config.ini`.
    fn to_config_string(&self) -> String {
        let install_dir = self
            .game
            .install_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        format!(
            r#"[game]
; Root directory of the game installation.
; Asset installs and update checks require it; leave empty to set later.
install_dir = {}

[updates]
; Seconds between full update scans (default: 3600 = 1 hour)
check_interval_secs = {}
"#,
            install_dir, self.updates.check_interval_secs
        )
    }
}

/// Error returned when parsing an unrecognized configuration key name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown configuration key {0:?}")]
pub struct UnknownConfigKey(pub String);

/// Supported configuration keys, addressed as `section.key`.
///
/// Each key maps to one field of [`Config`] and knows how to get and set
/// its value as a string, which is what the command line works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// `game.install_dir`
    GameInstallDir,
    /// `updates.check_interval_secs`
    UpdatesCheckIntervalSecs,
}

impl FromStr for ConfigKey {
    type Err = UnknownConfigKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "game.install_dir" => Ok(ConfigKey::GameInstallDir),
            "updates.check_interval_secs" => Ok(ConfigKey::UpdatesCheckIntervalSecs),
            _ => Err(UnknownConfigKey(s.to_string())),
        }
    }
}

impl ConfigKey {
    /// The canonical key name (e.g. "game.install_dir").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::GameInstallDir => "game.install_dir",
            ConfigKey::UpdatesCheckIntervalSecs => "updates.check_interval_secs",
        }
    }

    /// The section name (e.g. "game").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// The key name within the section (e.g. "install_dir").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Read the value from a config as a string. Unset values read as "".
    pub fn get(&self, config: &Config) -> String {
        match self {
            ConfigKey::GameInstallDir => config
                .game
                .install_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            ConfigKey::UpdatesCheckIntervalSecs => config.updates.check_interval_secs.to_string(),
        }
    }

    /// Set the value in a config after validating it.
    ///
    /// An empty value clears optional keys.
    pub fn set(&self, config: &mut Config, value: &str) -> Result<(), ConfigError> {
        match self {
            ConfigKey::GameInstallDir => {
                config.game.install_dir = optional_path(value);
            }
            ConfigKey::UpdatesCheckIntervalSecs => {
                config.updates.check_interval_secs =
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue {
                            section: "updates".to_string(),
                            key: "check_interval_secs".to_string(),
                            value: value.to_string(),
                            reason: "expected a whole number of seconds".to_string(),
                        })?;
            }
        }
        Ok(())
    }

    /// All supported configuration keys, in display order.
    pub fn all() -> &'static [ConfigKey] {
        &[ConfigKey::GameInstallDir, ConfigKey::UpdatesCheckIntervalSecs]
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Convert an empty string to `None`, anything else to a path.
fn optional_path(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(expand_tilde(trimmed))
    }
}

/// Parse an `Ini` object into a `Config`.
fn parse_ini(ini: &Ini) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    if let Some(section) = ini.section(Some("game")) {
        if let Some(v) = section.get("install_dir") {
            let v = v.trim();
            if !v.is_empty() {
                config.game.install_dir = Some(PathBuf::from(v));
            }
        }
    }

    if let Some(section) = ini.section(Some("updates")) {
        if let Some(v) = section.get("check_interval_secs") {
            config.updates.check_interval_secs =
                v.parse().map_err(|_| ConfigError::InvalidValue {
                    section: "updates".to_string(),
                    key: "check_interval_secs".to_string(),
                    value: v.to_string(),
                    reason: "expected a whole number of seconds".to_string(),
                })?;
        }
    }

    Ok(config)
}

/// Get the path to the config directory (`~/.modvault`).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".modvault")
}

/// Get the path to the config file (`~/.modvault/config.ini`).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// Get the path to the cache directory (`~/.modvault/cache`).
///
/// The update tracker's [`JsonFileCache`](crate::cache::JsonFileCache)
/// lives here.
pub fn cache_directory() -> PathBuf {
    config_directory().join("cache")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.game.install_dir.is_none());
        assert_eq!(
            config.updates.check_interval_secs,
            DEFAULT_CHECK_INTERVAL_SECS
        );
        assert_eq!(config.check_interval(), Duration::from_secs(3600));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.ini");

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.ini");

        let config = Config {
            game: GameSettings {
                install_dir: Some(PathBuf::from("/games/colony-sim")),
            },
            updates: UpdateSettings {
                check_interval_secs: 600,
            },
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[game]\ninstall_dir = /games/colony-sim\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(
            config.game.install_dir.as_deref(),
            Some(Path::new("/games/colony-sim"))
        );
        assert_eq!(
            config.updates.check_interval_secs,
            DEFAULT_CHECK_INTERVAL_SECS
        );
    }

    #[test]
    fn test_empty_install_dir_stays_unset() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[game]\ninstall_dir = \n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.game.install_dir.is_none());
    }

    #[test]
    fn test_invalid_interval_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[updates]\ncheck_interval_secs = soon\n").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_config_key_parsing() {
        assert_eq!(
            "game.install_dir".parse::<ConfigKey>().unwrap(),
            ConfigKey::GameInstallDir
        );
        // Case insensitive
        assert_eq!(
            "UPDATES.CHECK_INTERVAL_SECS".parse::<ConfigKey>().unwrap(),
            ConfigKey::UpdatesCheckIntervalSecs
        );
        assert_eq!(
            "invalid.key".parse::<ConfigKey>(),
            Err(UnknownConfigKey("invalid.key".to_string()))
        );
    }

    #[test]
    fn test_config_key_name_parts() {
        assert_eq!(ConfigKey::GameInstallDir.section(), "game");
        assert_eq!(ConfigKey::GameInstallDir.key_name(), "install_dir");
        assert_eq!(ConfigKey::UpdatesCheckIntervalSecs.section(), "updates");
        assert_eq!(
            ConfigKey::UpdatesCheckIntervalSecs.key_name(),
            "check_interval_secs"
        );
    }

    #[test]
    fn test_config_key_get_and_set() {
        let mut config = Config::default();

        assert_eq!(ConfigKey::GameInstallDir.get(&config), "");
        assert_eq!(ConfigKey::UpdatesCheckIntervalSecs.get(&config), "3600");

        ConfigKey::GameInstallDir
            .set(&mut config, "/games/colony-sim")
            .unwrap();
        assert_eq!(
            config.game.install_dir.as_deref(),
            Some(Path::new("/games/colony-sim"))
        );

        ConfigKey::UpdatesCheckIntervalSecs
            .set(&mut config, "600")
            .unwrap();
        assert_eq!(config.updates.check_interval_secs, 600);
    }

    #[test]
    fn test_config_key_set_rejects_bad_interval() {
        let mut config = Config::default();

        let result = ConfigKey::UpdatesCheckIntervalSecs.set(&mut config, "hourly");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert_eq!(config.updates.check_interval_secs, DEFAULT_CHECK_INTERVAL_SECS);
    }

    #[test]
    fn test_config_key_empty_value_clears_install_dir() {
        let mut config = Config {
            game: GameSettings {
                install_dir: Some(PathBuf::from("/games/colony-sim")),
            },
            updates: UpdateSettings::default(),
        };

        ConfigKey::GameInstallDir.set(&mut config, "").unwrap();
        assert!(config.game.install_dir.is_none());
    }

    #[test]
    fn test_config_key_all_covers_every_key() {
        let keys = ConfigKey::all();
        assert!(keys.contains(&ConfigKey::GameInstallDir));
        assert!(keys.contains(&ConfigKey::UpdatesCheckIntervalSecs));
    }
}
