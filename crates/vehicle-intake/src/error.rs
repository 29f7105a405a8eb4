use crate::config::ConfigError;
use crate::telemetry::TelemetryError;

/// Failures that end a process run: startup of the server or an offline document check.
///
/// Request-level intake failures never reach this type; the router answers them directly.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid application document: {0}")]
    Document(#[from] serde_json::Error),
}
