use thiserror::Error;

/// Errors produced while fetching a deck or downloading a card image.
///
/// Variants carry strings rather than source errors so the type stays
/// `Clone` and can travel inside iced messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure
    #[error("Failed to fetch cats: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status
    #[error("Failed to fetch cats (HTTP {status})")]
    Status { status: u16 },

    /// The payload could not be parsed
    #[error("Malformed response from cat endpoint: {0}")]
    Malformed(String),

    /// The image bytes could not be decoded
    #[error("Could not decode cat picture: {0}")]
    Image(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            FetchError::Malformed(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Errors produced while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}
