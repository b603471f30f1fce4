//! Leasehold Config - engine policy shared by every lease provider
//!
//! The lease engine reads one process-wide policy object at validation time.
//! This crate owns that object ([`EngineConfig`]), the layered loader that
//! builds it (defaults → TOML file → `LEASEHOLD_*` environment), and the
//! [`ConfigHandle`] through which providers observe the *current* policy.
//!
//! ```rust,no_run
//! use leasehold_config::{ConfigHandle, EngineConfig};
//!
//! # fn main() -> Result<(), leasehold_config::ConfigError> {
//! let config = EngineConfig::load(None)?;
//! let handle = ConfigHandle::new(config)?;
//!
//! // Later, e.g. on an operator toggle:
//! handle.store(EngineConfig::restricted())?;
//! assert!(handle.restricted_mode());
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod engine;
mod error;
mod handle;
mod loader;

pub use engine::{
    DEFAULT_INTERNAL_HOST_ALIAS, DEFAULT_PASSWORD_LENGTH, EngineConfig, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use error::{ConfigError, ConfigResult};
pub use handle::ConfigHandle;
pub use loader::ENV_PREFIX;
