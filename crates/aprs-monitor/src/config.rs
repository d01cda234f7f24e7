//! Monitor settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

/// Environment variable that overrides the configured server address
pub const SERVER_ENV: &str = "APRS_MONITOR_SERVER";

/// How decoded frames are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One TNC2 monitor line per frame
    #[default]
    Tnc2,
    /// One JSON object per frame
    Json,
    /// Labelled multi-line dump per frame
    Detailed,
}

/// Monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// KISS server address (`host:port`)
    pub server: String,
    /// Output format
    pub output: OutputFormat,
    /// First reconnect delay in milliseconds
    pub reconnect_delay_ms: u64,
    /// Reconnect delay cap in milliseconds
    pub max_reconnect_delay_ms: u64,
    /// Socket read buffer size
    pub read_buffer_size: usize,
    /// Print frames whose APRS payload fails to decode
    pub show_undecodable: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            server: "localhost:8001".to_string(),
            output: OutputFormat::Tnc2,
            reconnect_delay_ms: 1000,
            max_reconnect_delay_ms: 30_000,
            read_buffer_size: 1024,
            show_undecodable: true,
        }
    }
}

impl MonitorConfig {
    /// Default config directory
    fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".config").join("aprs-monitor"))
    }

    /// Default config file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Parse settings from JSON text
    pub fn from_json(text: &str) -> Result<Self, MonitorError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present, otherwise built-in defaults. The server env var wins over both.
    pub fn load(path: Option<&Path>) -> Result<Self, MonitorError> {
        let mut config = match path {
            Some(path) => Self::from_json(&std::fs::read_to_string(path)?)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_json(&std::fs::read_to_string(path)?)?,
                None => Self::default(),
            },
        };

        config.apply_server_override(std::env::var(SERVER_ENV).ok())?;
        Ok(config)
    }

    /// Replace the server address and re-check the result
    fn apply_server_override(&mut self, server: Option<String>) -> Result<(), MonitorError> {
        if let Some(server) = server {
            self.server = server;
            self.validate()?;
        }
        Ok(())
    }

    /// Check values that would make the monitor misbehave
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.server.trim().is_empty() {
            return Err(MonitorError::Config("server address is empty".into()));
        }
        if self.read_buffer_size == 0 {
            return Err(MonitorError::Config("read_buffer_size must be > 0".into()));
        }
        if self.reconnect_delay_ms > self.max_reconnect_delay_ms {
            return Err(MonitorError::Config(format!(
                "reconnect_delay_ms ({}) exceeds max_reconnect_delay_ms ({})",
                self.reconnect_delay_ms, self.max_reconnect_delay_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.server, "localhost:8001");
        assert_eq!(config.output, OutputFormat::Tnc2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MonitorConfig::from_json(r#"{"server": "10.0.0.2:8001", "output": "json"}"#)
            .unwrap();
        assert_eq!(config.server, "10.0.0.2:8001");
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.read_buffer_size, 1024);
    }

    #[test]
    fn test_unknown_output_rejected() {
        assert!(matches!(
            MonitorConfig::from_json(r#"{"output": "xml"}"#),
            Err(MonitorError::Json(_))
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            MonitorConfig::from_json(r#"{"server": " "}"#),
            Err(MonitorError::Config(_))
        ));
        assert!(matches!(
            MonitorConfig::from_json(r#"{"reconnect_delay_ms": 5000, "max_reconnect_delay_ms": 10}"#),
            Err(MonitorError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let result = MonitorConfig::load(Some(Path::new("/nonexistent/aprs-monitor.json")));
        assert!(matches!(result, Err(MonitorError::Io(_))));
    }

    #[test]
    fn test_server_override() {
        let mut config = MonitorConfig::default();
        config.apply_server_override(None).unwrap();
        assert_eq!(config.server, "localhost:8001");

        config
            .apply_server_override(Some("192.168.1.20:8001".into()))
            .unwrap();
        assert_eq!(config.server, "192.168.1.20:8001");
    }

    #[test]
    fn test_server_override_is_validated() {
        let mut config = MonitorConfig::default();
        assert!(matches!(
            config.apply_server_override(Some("  ".into())),
            Err(MonitorError::Config(_))
        ));
    }

    #[test]
    fn test_load_applies_server_env() {
        let path = std::env::temp_dir().join(format!("aprs-monitor-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"server": "10.0.0.2:8001", "output": "json"}"#).unwrap();

        std::env::set_var(SERVER_ENV, "10.0.0.9:8001");
        let result = MonitorConfig::load(Some(path.as_path()));
        std::env::remove_var(SERVER_ENV);
        let _ = std::fs::remove_file(&path);

        let config = result.unwrap();
        assert_eq!(config.server, "10.0.0.9:8001");
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = MonitorConfig {
            output: OutputFormat::Detailed,
            ..Default::default()
        };
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert_eq!(MonitorConfig::from_json(&json).unwrap(), config);
    }
}
