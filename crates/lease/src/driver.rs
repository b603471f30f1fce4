//! Connection seam between the engine and target protocols
//!
//! A [`TargetDriver`] knows how to open one connection to a target family;
//! the [`TargetConnection`] it returns executes text statements one at a
//! time. Connections are never pooled: the provider opens one per lifecycle
//! operation and closes it before returning.

use async_trait::async_trait;

use crate::inputs::ProviderInputs;
use crate::registry::ProviderKind;

/// Error reported by a target or its client library.
///
/// `message` is what the target said, as close to verbatim as the client
/// library allows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DriverError {
    pub message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An open, exclusively owned connection to a target
#[async_trait]
pub trait TargetConnection: Send + Sized {
    /// Execute one statement and wait for the target's verdict.
    async fn execute(&mut self, statement: &str) -> Result<(), DriverError>;

    /// Whether the client reports the session as ready for statements.
    fn is_ready(&self) -> bool {
        true
    }

    /// Close the connection. Failures are logged, not returned: by the time a
    /// connection is closed the operation's outcome is already decided.
    async fn close(self);
}

/// Opens connections for one target family
#[async_trait]
pub trait TargetDriver: Send + Sync + 'static {
    type Connection: TargetConnection;

    fn kind(&self) -> ProviderKind;

    /// Cheap statement used by connection health checks.
    fn probe_statement(&self) -> &'static str;

    /// Connect and authenticate as the admin user from `inputs`.
    async fn open(&self, inputs: &ProviderInputs) -> Result<Self::Connection, DriverError>;
}
