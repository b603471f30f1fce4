//! Logger errors

/// Result type for logger setup
pub type LogResult<T> = Result<T, LogError>;

/// Errors raised while installing the subscriber
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The level/directive string is not a valid `EnvFilter`
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// Unknown output format name
    #[error("Unknown log format '{0}' (expected pretty, compact or json)")]
    Format(String),

    /// A global subscriber was already installed in this process
    #[error("Global subscriber already initialised: {0}")]
    AlreadyInitialized(String),
}
