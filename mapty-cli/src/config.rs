use mapty_core::Coords;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default map zoom when centring on a workout.
pub const DEFAULT_ZOOM: u8 = 15;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding workouts.json
    pub data_dir: ConfigValue<PathBuf>,
    /// Position reported as "current" by the geolocation stand-in
    pub home: ConfigValue<Option<Coords>>,
    /// Map zoom level used when focusing a workout
    pub zoom: ConfigValue<u8>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    home: Option<Coords>,
    zoom: Option<u8>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut home = ConfigValue::new(None, ConfigSource::Default);
        let mut zoom = ConfigValue::new(DEFAULT_ZOOM, ConfigSource::Default);
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(coords) = file_config.home {
                home = ConfigValue::new(Some(coords), ConfigSource::File);
            }
            if let Some(level) = file_config.zoom {
                zoom = ConfigValue::new(level, ConfigSource::File);
            }
        }

        if let Ok(dir) = std::env::var("MAPTY_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(value) = std::env::var("MAPTY_HOME") {
            let coords: Coords = value
                .parse()
                .map_err(|e: String| ConfigError::InvalidEnv("MAPTY_HOME", e))?;
            home = ConfigValue::new(Some(coords), ConfigSource::Environment);
        }

        Ok(Self {
            data_dir,
            home,
            zoom,
            config_file,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/mapty/
    /// - macOS: ~/Library/Application Support/mapty/
    /// - Windows: %APPDATA%/mapty/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mapty")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/mapty/
    /// - macOS: ~/Library/Application Support/mapty/
    /// - Windows: %APPDATA%/mapty/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mapty")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidEnv(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidEnv(var, e) => write!(f, "Invalid {}: {}", var, e),
        }
    }
}

impl std::error::Error for ConfigError {}
