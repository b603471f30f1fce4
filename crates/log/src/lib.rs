//! Leasehold Log - subscriber setup for leasehold binaries
//!
//! Libraries in this workspace only emit `tracing` events; binaries call
//! [`init`] (or build a [`LoggerBuilder`]) once at startup. Output goes to
//! stderr so that command results on stdout stay machine-readable.
//!
//! ```rust,no_run
//! let _guard = leasehold_log::init(leasehold_log::Config::from_env())?;
//! tracing::info!("ready");
//! # Ok::<(), leasehold_log::LogError>(())
//! ```
#![forbid(unsafe_code)]

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format};
pub use error::{LogError, LogResult};

/// Initialise the global subscriber from `config`.
pub fn init(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}
