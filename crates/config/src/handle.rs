//! Shared, swappable view of the engine policy

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::engine::EngineConfig;
use crate::error::ConfigResult;

/// Cheaply cloneable handle to the current [`EngineConfig`].
///
/// Providers hold a handle rather than a snapshot: the policy is read at
/// validation time, so an operator flipping restricted mode takes effect on
/// the next lifecycle call without rebuilding any provider.
#[derive(Clone)]
pub struct ConfigHandle {
    current: Arc<ArcSwap<EngineConfig>>,
}

impl ConfigHandle {
    /// Handle over `config`, which must pass [`EngineConfig::validate`].
    pub fn new(config: EngineConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: EngineConfig) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// Snapshot of the current policy.
    pub fn load(&self) -> Arc<EngineConfig> {
        self.current.load_full()
    }

    /// Replace the policy for all holders of this handle.
    ///
    /// An invalid policy is refused and the current one stays in place.
    pub fn store(&self, config: EngineConfig) -> ConfigResult<()> {
        config.validate()?;
        tracing::info!(
            restricted_mode = config.restricted_mode,
            "engine configuration replaced"
        );
        self.current.store(Arc::new(config));
        Ok(())
    }

    pub fn restricted_mode(&self) -> bool {
        self.current.load().restricted_mode
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::from_valid(EngineConfig::default())
    }
}

impl std::fmt::Debug for ConfigHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigHandle")
            .field("current", &*self.current.load())
            .finish()
    }
}
