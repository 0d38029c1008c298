use crate::zone::ZoneParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Load-time failures. Any of these prevents the resolver from being built.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Invalid zone for '{group}': {source}")]
    Zone {
        group: String,
        #[source]
        source: ZoneParseError,
    },
}
