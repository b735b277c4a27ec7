//! # Telemetry
//!
//! Installs the global `tracing` subscriber.
//!
//! The level comes from [`LoggingSettings`] unless `RUST_LOG` is set, in
//! which case the environment wins.

use crate::application::error::InfrastructureError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Output format of the fmt subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human readable output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging section of the settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, e.g. `info` or `remit_quotes=debug`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Builds the filter: `RUST_LOG` if set and valid, otherwise `settings.level`.
fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns `InfrastructureError::Configuration` if a global subscriber is
/// already installed.
pub fn init_tracing(settings: &LoggingSettings) -> Result<(), InfrastructureError> {
    let filter = env_filter(settings);
    let installed = match settings.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .try_init(),
    };
    installed.map_err(|e| InfrastructureError::configuration(format!("tracing: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn format_deserializes_lowercase() {
        let settings: LoggingSettings =
            serde_json::from_str(r#"{"level":"debug","format":"json"}"#).unwrap();
        assert_eq!(settings.format, LogFormat::Json);
        assert_eq!(settings.level, "debug");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings: LoggingSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, LoggingSettings::default());
    }

    #[test]
    fn second_install_is_an_error() {
        let settings = LoggingSettings::default();
        let _ = init_tracing(&settings);
        assert!(init_tracing(&settings).is_err());
    }
}
