//! Leasehold Lease - dynamic secret lease engine
//!
//! Creates, renews and revokes short-lived credentials on external target
//! systems through one uniform contract, [`LeaseProvider`].
//!
//! # Pieces
//!
//! - [`generator`] - CSPRNG usernames and passwords
//! - [`template`] - Handlebars rendering of operator statements into a [`StatementSet`]
//! - [`guard`] - refuses loopback and (in restricted mode) internal targets
//! - [`driver`] - the seam between the engine and a target's wire protocol
//! - [`StatementLeaseProvider`] - the lifecycle, generic over a driver
//! - [`ProviderRegistry`] - closed set of provider families keyed by [`ProviderKind`]
//!
//! # Trust boundary
//!
//! Statement templates are operator configuration and are trusted as such:
//! they run verbatim with the admin credentials the operator supplied. The
//! only runtime-substituted values are the generated username and password,
//! the formatted expiration, and (for renew/revoke) an entity id that must be
//! alphanumeric like every id this engine issues.
//!
//! # Example
//!
//! ```rust,no_run
//! use leasehold_config::ConfigHandle;
//! use leasehold_lease::{LeaseProvider, ProviderKind, ProviderRegistry};
//!
//! # async fn example() -> Result<(), leasehold_lease::LeaseError> {
//! let registry = ProviderRegistry::new(ConfigHandle::default());
//! let provider = registry.get(ProviderKind::Postgres)?;
//!
//! let inputs = serde_json::json!({
//!     "host": "db.example.com",
//!     "port": 5432,
//!     "username": "admin",
//!     "password": "admin-password",
//!     "creationStatement": "CREATE ROLE \"{{username}}\" LOGIN PASSWORD '{{password}}' VALID UNTIL '{{expiration}}';",
//!     "revocationStatement": "DROP ROLE \"{{username}}\";"
//! });
//!
//! let lease = provider.create(&inputs, 1_893_456_000_000).await?;
//! provider.revoke(&inputs, &lease.entity_id).await?;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

#[cfg(not(any(feature = "sap-hana", feature = "postgres", feature = "mysql")))]
compile_error!("enable at least one target driver feature: sap-hana, postgres or mysql");

/// Lease lifecycle contract shared by every provider family
pub mod contract;
/// Connection seam between the engine and target protocols
pub mod driver;
/// Concrete target drivers (feature-gated)
pub mod drivers;
/// Error taxonomy
pub mod error;
/// Credential generation
pub mod generator;
/// Target connection guard
pub mod guard;
/// Provider input schema
pub mod inputs;
/// Lease results and expiration handling
pub mod lease;
/// Generic statement-driven provider
pub mod provider;
/// Provider families and registry
pub mod registry;
/// Statement templating
pub mod template;
/// In-memory target for exercising providers without a network
#[cfg(feature = "testing")]
pub mod testing;

pub use contract::LeaseProvider;
pub use driver::{DriverError, TargetConnection, TargetDriver};
pub use error::{
    BlockReason, BlockedHostError, ConnectionError, LeaseError, LeaseResult,
    ProviderExecutionError, ValidationError,
};
pub use generator::{GeneratedCredential, generate_password, generate_username};
pub use guard::assert_allowed_host;
pub use inputs::ProviderInputs;
pub use lease::{CreatedLease, Expiration, LeaseCredentials, LeaseRef};
pub use provider::StatementLeaseProvider;
pub use registry::{DynamicProvider, ProviderKind, ProviderRegistry};
pub use template::{RenderMode, StatementKind, StatementSet, StatementTemplater};
