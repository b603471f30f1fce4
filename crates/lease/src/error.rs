//! Error taxonomy for lease operations
//!
//! Three families reach callers: [`ValidationError`] (bad or disallowed
//! input, never retried), [`ConnectionError`] (target unreachable, possibly
//! transient) and [`ProviderExecutionError`] (the target rejected a
//! statement; carries the target's message verbatim). Nothing is retried
//! inside the engine.

use std::fmt;

use thiserror::Error;

use crate::registry::ProviderKind;
use crate::template::StatementKind;

/// Result type for lease operations
pub type LeaseResult<T> = Result<T, LeaseError>;

/// Any failure of a lifecycle operation
#[derive(Debug, Error)]
pub enum LeaseError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Execution(#[from] ProviderExecutionError),
}

impl LeaseError {
    /// Malformed or disallowed input; retrying the same call cannot succeed
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether a caller-level retry might succeed.
    ///
    /// Only connection failures qualify. Execution failures are not retryable
    /// because part of the statement set may already have run.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// The guard's verdict, if this error is a blocked host
    pub fn blocked_host(&self) -> Option<&BlockedHostError> {
        match self {
            Self::Validation(ValidationError::BlockedHost(blocked)) => Some(blocked),
            _ => None,
        }
    }
}

/// Malformed or disallowed input
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Provider inputs do not match the schema
    #[error("Invalid provider inputs: {field}: {reason}")]
    Schema { field: String, reason: String },

    /// The target host is refused by the connection guard
    #[error(transparent)]
    BlockedHost(#[from] BlockedHostError),

    /// Expiration is not a representable instant
    #[error("Invalid expiration timestamp: {epoch_ms}ms")]
    InvalidExpiry { epoch_ms: i64 },

    /// A statement template failed to render or rendered to nothing
    #[error("Invalid {kind} statement: {reason}")]
    Template { kind: StatementKind, reason: String },

    /// Discriminator does not name a provider family
    #[error("Unknown provider '{0}'")]
    UnknownProvider(String),

    /// Provider family exists but its driver is compiled out
    #[error("Provider '{0}' is not enabled in this build")]
    ProviderDisabled(ProviderKind),
}

impl ValidationError {
    pub(crate) fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Why the guard refused a host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// `localhost` / `127.0.0.1`, refused in every mode
    Loopback,
    /// Known alias of internal infrastructure (restricted mode)
    InternalAlias,
    /// `10.0.0.0/8` or `192.168.0.0/16` (restricted mode)
    PrivateRange,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Loopback => "loopback targets are not allowed",
            Self::InternalAlias => "internal host aliases are not allowed",
            Self::PrivateRange => "private network ranges are not allowed",
        })
    }
}

/// Target host refused by the connection guard
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid db host '{host}': {reason}")]
pub struct BlockedHostError {
    pub host: String,
    pub reason: BlockReason,
}

/// Target unreachable or never became ready
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to connect to {provider} target {host}:{port}: {message}")]
    Connect {
        provider: ProviderKind,
        host: String,
        port: u16,
        message: String,
    },

    #[error("{provider} client not ready")]
    NotReady { provider: ProviderKind },

    #[error("Connection probe against {provider} target failed: {message}")]
    Probe {
        provider: ProviderKind,
        message: String,
    },
}

/// A statement in a [`StatementSet`](crate::StatementSet) was rejected by the target.
///
/// `Display` is the target's message, unchanged. Statements before
/// `statement_index` have already been applied and are not rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderExecutionError {
    pub message: String,
    /// Zero-based position of the rejected statement
    pub statement_index: usize,
    pub statement_count: usize,
}

impl ProviderExecutionError {
    /// Number of statements that ran successfully before the failure
    pub fn applied(&self) -> usize {
        self.statement_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_error_displays_target_message_verbatim() {
        let err = ProviderExecutionError {
            message: "invalid user name: ABC".into(),
            statement_index: 1,
            statement_count: 2,
        };
        assert_eq!(err.to_string(), "invalid user name: ABC");
        assert_eq!(err.applied(), 1);

        let wrapped = LeaseError::from(err);
        assert_eq!(wrapped.to_string(), "invalid user name: ABC");
        assert!(!wrapped.is_retryable());
    }

    #[test]
    fn blocked_host_is_a_validation_error() {
        let err = LeaseError::from(ValidationError::from(BlockedHostError {
            host: "localhost".into(),
            reason: BlockReason::Loopback,
        }));
        assert!(err.is_validation());
        assert_eq!(err.blocked_host().map(|b| b.reason), Some(BlockReason::Loopback));
        assert!(err.to_string().contains("Invalid db host 'localhost'"));
    }

    #[test]
    fn only_connection_failures_are_retryable() {
        let err = LeaseError::from(ConnectionError::NotReady {
            provider: ProviderKind::Postgres,
        });
        assert!(err.is_retryable());
        assert!(!err.is_validation());
    }
}
