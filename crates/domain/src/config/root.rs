use super::compiled::CompiledCustomDns;
use super::custom_dns::CustomDnsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "splitdns.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub custom_dns: CustomDnsConfig,

    /// Directory of the loaded file; base for relative `$INCLUDE` paths.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
}

impl Config {
    /// Loads configuration from `config_path`, or from `splitdns.toml` in
    /// the working directory when present, otherwise defaults.
    pub fn load(config_path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                fallback.exists().then_some(fallback)
            }
        };

        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                let base_dir = path
                    .parent()
                    .map(|p| if p.as_os_str().is_empty() { Path::new(".") } else { p })
                    .map(Path::to_path_buf);
                Self::from_toml_str(&text, base_dir)?
            }
            None => Self::default(),
        };

        if let Some(level) = overrides.log_level {
            config.logging.level = level;
        }

        Ok(config)
    }

    pub fn from_toml_str(text: &str, base_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(text)?;
        config.base_dir = base_dir;
        Ok(config)
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate().map_err(ConfigError::Validation)?;
        self.custom_dns.validate().map_err(ConfigError::Validation)
    }

    /// Builds the immutable resolver configuration, compiling every zone.
    pub fn compile_custom_dns(&self) -> Result<CompiledCustomDns, ConfigError> {
        CompiledCustomDns::compile(&self.custom_dns, self.base_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_toml_str("", None).unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.custom_dns.custom_ttl, 3600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let config = Config::from_toml_str("[logging]\nlevel = \"loud\"\n", None).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load(Some("/nonexistent/splitdns.toml"), CliOverrides::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
