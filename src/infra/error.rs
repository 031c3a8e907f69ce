use thiserror::Error;

/// Startup failures. Everything here is fatal; `main` reports the error
/// chain and exits non-zero.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("failed to bind listener: {0}")]
    Listener(#[from] std::io::Error),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("tracing subscriber rejected: {0}")]
    Telemetry(String),
    #[error("invalid configuration: {0}")]
    Configuration(String),
}
