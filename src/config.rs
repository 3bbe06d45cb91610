use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::source::SourceKind;

/// Cards per session unless configured otherwise
pub const DEFAULT_DECK_SIZE: usize = 10;
const MAX_DECK_SIZE: usize = 100;

/// Application configuration.
///
/// Layered: built-in defaults, then the optional config file, then
/// `PAWS_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Which upstream serves the deck
    pub source: SourceKind,
    /// Base URL of the upstream
    pub endpoint: String,
    /// TheCatAPI key, sent as `x-api-key`
    pub api_key: Option<String>,
    /// Cards per session (1..=100)
    pub deck_size: usize,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::TheCatApi,
            endpoint: SourceKind::TheCatApi.default_endpoint().to_string(),
            api_key: None,
            deck_size: DEFAULT_DECK_SIZE,
            timeout_secs: 30,
        }
    }
}

/// On-disk form: every field optional, unknown fields rejected
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    source: Option<SourceKind>,
    endpoint: Option<String>,
    api_key: Option<String>,
    deck_size: Option<usize>,
    timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Load from the standard locations. Problems are logged and the
    /// remaining layers still apply.
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|err| {
                warn!("⚠️  {}", err);
                Self::default()
            }),
            _ => Self::default(),
        };

        if let Err(err) = config.apply_env(|key| std::env::var(key).ok()) {
            warn!("⚠️  {}", err);
        }
        config.normalize();

        info!(
            "Using {:?} at {} ({} cats per deck)",
            config.source, config.endpoint, config.deck_size
        );
        config
    }

    /// `~/.config/paws-and-preferences/config.json` on Linux
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("paws-and-preferences");
        path.push("config.json");
        Some(path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file: FileConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        let defaults = Self::default();
        let source = file.source.unwrap_or(defaults.source);
        Ok(Self {
            source,
            // Switching source without naming an endpoint means the source's own
            endpoint: file
                .endpoint
                .unwrap_or_else(|| source.default_endpoint().to_string()),
            api_key: file.api_key,
            deck_size: file.deck_size.unwrap_or(defaults.deck_size),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
        })
    }

    /// Apply `PAWS_*` overrides read through `lookup`.
    ///
    /// Every valid variable is applied; the first invalid one is reported.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let mut first_error = None;

        if let Some(value) = lookup("PAWS_SOURCE") {
            match SourceKind::parse(&value) {
                Some(kind) => {
                    if kind != self.source {
                        self.endpoint = kind.default_endpoint().to_string();
                    }
                    self.source = kind;
                }
                None => {
                    first_error.get_or_insert(ConfigError::InvalidValue {
                        key: "PAWS_SOURCE",
                        value,
                    });
                }
            }
        }

        if let Some(value) = lookup("PAWS_ENDPOINT") {
            if value.trim().is_empty() {
                first_error.get_or_insert(ConfigError::InvalidValue {
                    key: "PAWS_ENDPOINT",
                    value,
                });
            } else {
                self.endpoint = value.trim().to_string();
            }
        }

        if let Some(value) = lookup("PAWS_API_KEY") {
            self.api_key = Some(value).filter(|key| !key.is_empty());
        }

        if let Some(value) = lookup("PAWS_DECK_SIZE") {
            match value.trim().parse() {
                Ok(size) => self.deck_size = size,
                Err(_) => {
                    first_error.get_or_insert(ConfigError::InvalidValue {
                        key: "PAWS_DECK_SIZE",
                        value,
                    });
                }
            }
        }

        if let Some(value) = lookup("PAWS_TIMEOUT_SECS") {
            match value.trim().parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => {
                    first_error.get_or_insert(ConfigError::InvalidValue {
                        key: "PAWS_TIMEOUT_SECS",
                        value,
                    });
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Clamp values into their valid ranges
    pub fn normalize(&mut self) {
        self.deck_size = self.deck_size.clamp(1, MAX_DECK_SIZE);
        self.timeout_secs = self.timeout_secs.max(1);
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
