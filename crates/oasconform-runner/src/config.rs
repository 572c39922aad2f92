//! Run configuration (.oasconform.toml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Settings a run picks up from a config file. Everything is optional;
/// command-line flags override whatever is set here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server root to test, overriding the definition's `host`/`basePath`.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Trials per operation.
    #[serde(default)]
    pub trials: Option<u32>,

    /// Seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,

    /// HTTP headers sent with every request (Auth, API keys, etc.)
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request timeout in seconds (default 10).
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Config {
    /// Load config from file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from default location (.oasconform.toml)
    pub fn load_default() -> Result<Self, ConfigError> {
        let candidates = [".oasconform.toml", "oasconform.toml"];

        for name in candidates {
            let path = Path::new(name);
            if path.exists() {
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout.unwrap_or(10))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_empty() {
        let config = Config::default();
        assert!(config.base_url.is_none());
        assert!(config.headers.is_empty());
        assert_eq!(config.timeout(), std::time::Duration::from_secs(10));
    }

    #[test]
    fn parse_toml() {
        let toml = r#"
base_url = "http://localhost:3000"
trials = 50
seed = 7

[headers]
Authorization = "Bearer token123"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.trials, Some(50));
        assert_eq!(config.seed, Some(7));
        assert_eq!(
            config.headers.get("Authorization"),
            Some(&"Bearer token123".to_string())
        );
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(b"trials = 5\ntimeout = 3\n").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.trials, Some(5));
        assert_eq!(config.timeout(), std::time::Duration::from_secs(3));
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(b"trials = [not valid").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
