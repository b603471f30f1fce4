//! Layered loading: defaults → TOML file → environment

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};

use crate::engine::EngineConfig;
use crate::error::{ConfigError, ConfigResult};

/// Prefix for environment overrides, e.g. `LEASEHOLD_RESTRICTED_MODE=true`.
pub const ENV_PREFIX: &str = "LEASEHOLD_";

impl EngineConfig {
    /// Figment stack used by [`EngineConfig::load`]. Exposed so callers can
    /// merge further providers (CLI flags) before extracting.
    pub fn figment(path: Option<&Path>) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(EngineConfig::default()));

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::MissingFile {
                    path: path.to_path_buf(),
                });
            }
            figment = figment.merge(Toml::file(path));
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Load and validate the engine policy.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        Self::from_figment(Self::figment(path)?)
    }

    /// Extract and validate from an already assembled figment.
    pub fn from_figment(figment: Figment) -> ConfigResult<Self> {
        let config: EngineConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;

        tracing::debug!(
            restricted_mode = config.restricted_mode,
            aliases = config.internal_host_aliases.len(),
            "engine configuration loaded"
        );

        Ok(config)
    }
}
