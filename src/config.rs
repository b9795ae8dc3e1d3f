use serde::Deserialize;
use std::path::Path;

/// Top-level configuration loaded from pushgate.toml.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct GateConfig {
    pub countdown: CountdownConfig,
}

/// Countdown window and poll quantum.
///
/// These defaults reproduce the fixed behavior the gate ships with: a
/// 10-second window checked every 100ms. They are configuration rather than
/// constants so tests and callers can run with shorter windows.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CountdownConfig {
    /// Length of the abort window in milliseconds.
    pub timeout_ms: u64,
    /// Sleep quantum between flag checks, in milliseconds. Bounds the
    /// worst-case abort-detection latency.
    pub poll_interval_ms: u64,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            poll_interval_ms: 100,
        }
    }
}

impl GateConfig {
    /// Apply CLI overrides on top of file/default values.
    pub fn apply_overrides(&mut self, timeout_ms: Option<u64>, poll_interval_ms: Option<u64>) {
        if let Some(ms) = timeout_ms {
            self.countdown.timeout_ms = ms;
        }
        if let Some(ms) = poll_interval_ms {
            self.countdown.poll_interval_ms = ms;
        }
    }

    /// Validate resolved settings. A zero poll quantum would spin the loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.countdown.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "countdown.poll_interval_ms must be greater than 0",
            });
        }
        Ok(())
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file exists but could not be read.
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    /// Config file is not valid TOML for this schema.
    Parse {
        path: std::path::PathBuf,
        source: toml::de::Error,
    },
    /// Resolved settings fail validation.
    Invalid { reason: &'static str },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config {}: {}", path.display(), source)
            }
            ConfigError::Invalid { reason } => write!(f, "invalid config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Invalid { .. } => None,
        }
    }
}

/// Load configuration from `path`.
///
/// A missing file is not an error: the gate is usually invoked bare, with no
/// config file present, and defaults apply.
pub fn load(path: &Path) -> Result<GateConfig, ConfigError> {
    if !path.exists() {
        return Ok(GateConfig::default());
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_behavior() {
        let config = GateConfig::default();
        assert_eq!(config.countdown.timeout_ms, 10_000);
        assert_eq!(config.countdown.poll_interval_ms, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config: GateConfig = toml::from_str(
            r#"
            [countdown]
            timeout_ms = 3000
            poll_interval_ms = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.countdown.timeout_ms, 3000);
        assert_eq!(config.countdown.poll_interval_ms, 50);
    }

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let config: GateConfig = toml::from_str(
            r#"
            [countdown]
            timeout_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.countdown.timeout_ms, 500);
        assert_eq!(config.countdown.poll_interval_ms, 100);
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config: GateConfig = toml::from_str("").unwrap();
        assert_eq!(config.countdown.timeout_ms, 10_000);
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let mut config: GateConfig = toml::from_str(
            r#"
            [countdown]
            timeout_ms = 3000
            poll_interval_ms = 50
            "#,
        )
        .unwrap();
        config.apply_overrides(Some(1000), None);
        assert_eq!(config.countdown.timeout_ms, 1000);
        assert_eq!(config.countdown.poll_interval_ms, 50);
    }

    #[test]
    fn test_none_overrides_change_nothing() {
        let mut config = GateConfig::default();
        config.apply_overrides(None, None);
        assert_eq!(config.countdown.timeout_ms, 10_000);
        assert_eq!(config.countdown.poll_interval_ms, 100);
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let mut config = GateConfig::default();
        config.apply_overrides(None, Some(0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_is_valid() {
        let mut config = GateConfig::default();
        config.apply_overrides(Some(0), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let config = load(Path::new("/nonexistent/pushgate.toml")).unwrap();
        assert_eq!(config.countdown.timeout_ms, 10_000);
    }
}
