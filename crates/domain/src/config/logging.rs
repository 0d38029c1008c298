use serde::{Deserialize, Serialize};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// `[logging]` section. `RUST_LOG`, when set, takes precedence at runtime.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub level: String,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), String> {
        if LEVELS.contains(&self.level.to_ascii_lowercase().as_str()) {
            Ok(())
        } else {
            Err(format!(
                "unknown log level '{}' (expected one of {})",
                self.level,
                LEVELS.join(", ")
            ))
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_is_case_insensitive() {
        let config = LoggingConfig {
            level: "DEBUG".into(),
        };
        assert!(config.validate().is_ok());

        let config = LoggingConfig {
            level: "verbose".into(),
        };
        assert!(config.validate().unwrap_err().contains("verbose"));
    }
}
