//! Lease lifecycle contract
//!
//! Callers (API handlers, expiry sweepers) depend on [`LeaseProvider`] only.
//! Inputs arrive as opaque JSON and are validated on every call; nothing is
//! cached between calls, so an edit to a provider configuration or to the
//! engine policy applies to the very next operation.
//!
//! # Lifecycle
//!
//! ```text
//! Requested -> (validate) -> (guard) -> Created -> [Renewed]* -> Revoked
//! ```
//!
//! Retries are the caller's concern. [`revoke`](LeaseProvider::revoke) of an
//! entity that no longer exists surfaces the target's own error as a
//! [`ProviderExecutionError`](crate::ProviderExecutionError); callers treating
//! revocation as idempotent match on that.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::LeaseResult;
use crate::inputs::ProviderInputs;
use crate::lease::{CreatedLease, LeaseRef};
use crate::registry::ProviderKind;

/// Uniform lifecycle implemented by every provider family
#[async_trait]
pub trait LeaseProvider: Send + Sync {
    /// Family this provider manages
    fn kind(&self) -> ProviderKind;

    /// Schema-validate `raw` and apply the connection guard.
    ///
    /// Never touches the network.
    fn validate_provider_inputs(&self, raw: &Value) -> LeaseResult<ProviderInputs>;

    /// Connect, run the family's probe statement and close.
    ///
    /// Does not create or change any credential.
    async fn validate_connection(&self, raw: &Value) -> LeaseResult<bool>;

    /// Issue a new credential valid until `expire_at_ms` (epoch milliseconds).
    ///
    /// Statements that ran before a rejected one are not rolled back.
    async fn create(&self, raw: &Value, expire_at_ms: i64) -> LeaseResult<CreatedLease>;

    /// Extend `entity_id` until `expire_at_ms`.
    async fn renew(&self, raw: &Value, entity_id: &str, expire_at_ms: i64)
    -> LeaseResult<LeaseRef>;

    /// Remove `entity_id` from the target.
    async fn revoke(&self, raw: &Value, entity_id: &str) -> LeaseResult<LeaseRef>;
}
