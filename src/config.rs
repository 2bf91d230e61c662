//! Startup configuration.
//!
//! Everything has a hardcoded default. A `skeleton.json` file in the working directory may
//! override any subset of the fields.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::abs::TextureFilter;

/// File looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "skeleton.json";

/// Errors produced while reading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "CPSC 453".to_string(),
            width: 800,
            height: 800,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("shaders/test.vert"),
            fragment: PathBuf::from("shaders/test.frag"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub ship: PathBuf,
    pub diamond: PathBuf,
    pub filter: TextureFilter,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            ship: PathBuf::from("textures/ship.png"),
            diamond: PathBuf::from("textures/diamond.png"),
            filter: TextureFilter::Nearest,
        }
    }
}

/// All startup settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub shaders: ShaderConfig,
    pub textures: TextureConfig,
    /// Overridden by `RUST_LOG` when that is set.
    pub log_level: log::LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            shaders: ShaderConfig::default(),
            textures: TextureConfig::default(),
            log_level: log::LevelFilter::Info,
        }
    }
}

impl AppConfig {
    /// Parses a configuration from JSON text. Missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Loads the configuration at `path`, or the defaults if there is no such file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_assignment_setup() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.window.title, "CPSC 453");
        assert_eq!(config.shaders.vertex, PathBuf::from("shaders/test.vert"));
        assert_eq!(config.textures.filter, TextureFilter::Nearest);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = AppConfig::from_json(
            r#"{ "window": { "title": "Asteroids" }, "log_level": "debug" }"#,
        )
        .unwrap();
        assert_eq!(config.window.title, "Asteroids");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.log_level, log::LevelFilter::Debug);
        assert_eq!(config.textures, TextureConfig::default());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("skeleton2d-config-does-not-exist.json");
        assert_eq!(AppConfig::load(path).unwrap(), AppConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join("skeleton2d-config-malformed.json");
        std::fs::write(&path, "{ window: ").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
