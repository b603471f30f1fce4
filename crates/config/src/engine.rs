//! Engine policy

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Hostname Docker publishes for the host machine. Always blocked in restricted mode.
pub const DEFAULT_INTERNAL_HOST_ALIAS: &str = "host.docker.internal";

/// Length of generated lease passwords unless overridden.
pub const DEFAULT_PASSWORD_LENGTH: usize = 48;

/// Shortest password length the engine will agree to generate.
pub const MIN_PASSWORD_LENGTH: usize = 16;

/// Longest password length the engine will agree to generate.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Process-wide policy consulted by every lease provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Multi-tenant hosted deployment: private ranges and internal aliases are refused.
    pub restricted_mode: bool,

    /// Hostnames treated as aliases of internal infrastructure in restricted mode.
    pub internal_host_aliases: Vec<String>,

    /// Length of generated lease passwords.
    pub password_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            restricted_mode: false,
            internal_host_aliases: vec![DEFAULT_INTERNAL_HOST_ALIAS.to_string()],
            password_length: DEFAULT_PASSWORD_LENGTH,
        }
    }
}

impl EngineConfig {
    /// Policy for multi-tenant hosted deployments.
    #[must_use]
    pub fn restricted() -> Self {
        Self {
            restricted_mode: true,
            ..Self::default()
        }
    }

    /// Builder-style toggle for restricted mode.
    pub fn with_restricted_mode(mut self, restricted: bool) -> Self {
        self.restricted_mode = restricted;
        self
    }

    /// Check value ranges after loading.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&self.password_length) {
            return Err(ConfigError::invalid(
                "password_length",
                format!(
                    "must be between {MIN_PASSWORD_LENGTH} and {MAX_PASSWORD_LENGTH}, got {}",
                    self.password_length
                ),
            ));
        }

        if let Some(alias) = self
            .internal_host_aliases
            .iter()
            .find(|alias| alias.trim().is_empty())
        {
            return Err(ConfigError::invalid(
                "internal_host_aliases",
                format!("entries must be non-empty hostnames, got {alias:?}"),
            ));
        }

        Ok(())
    }

    /// Whether `host` is one of the configured internal aliases (case-insensitive).
    pub fn is_internal_alias(&self, host: &str) -> bool {
        self.internal_host_aliases
            .iter()
            .any(|alias| alias.trim().eq_ignore_ascii_case(host))
    }
}
