//! Provider families and registry
//!
//! The set of families is closed: [`ProviderKind`] enumerates them and
//! [`DynamicProvider`] holds one concrete provider per compiled-in family.
//! Adding a family means adding a variant to both, and the compiler points
//! at every match that needs it.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use leasehold_config::ConfigHandle;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contract::LeaseProvider;
#[cfg(feature = "sap-hana")]
use crate::drivers::HanaDriver;
#[cfg(feature = "mysql")]
use crate::drivers::MySqlDriver;
#[cfg(feature = "postgres")]
use crate::drivers::PostgresDriver;
use crate::error::{LeaseResult, ValidationError};
use crate::inputs::ProviderInputs;
use crate::lease::{CreatedLease, LeaseRef};
use crate::provider::StatementLeaseProvider;

/// Discriminator of a target-system family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    SapHana,
    Postgres,
    #[serde(rename = "mysql")]
    MySql,
}

impl ProviderKind {
    pub const ALL: [Self; 3] = [Self::SapHana, Self::Postgres, Self::MySql];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SapHana => "sap-hana",
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
        }
    }

    /// Whether this build carries the family's driver.
    pub const fn is_enabled(self) -> bool {
        match self {
            Self::SapHana => cfg!(feature = "sap-hana"),
            Self::Postgres => cfg!(feature = "postgres"),
            Self::MySql => cfg!(feature = "mysql"),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sap-hana" | "saphana" | "hana" => Ok(Self::SapHana),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" => Ok(Self::MySql),
            _ => Err(ValidationError::UnknownProvider(s.to_string())),
        }
    }
}

/// One provider per compiled-in family
#[derive(Debug)]
pub enum DynamicProvider {
    #[cfg(feature = "sap-hana")]
    SapHana(StatementLeaseProvider<HanaDriver>),
    #[cfg(feature = "postgres")]
    Postgres(StatementLeaseProvider<PostgresDriver>),
    #[cfg(feature = "mysql")]
    MySql(StatementLeaseProvider<MySqlDriver>),
}

macro_rules! dispatch {
    ($self:expr, $provider:ident => $body:expr) => {
        match $self {
            #[cfg(feature = "sap-hana")]
            DynamicProvider::SapHana($provider) => $body,
            #[cfg(feature = "postgres")]
            DynamicProvider::Postgres($provider) => $body,
            #[cfg(feature = "mysql")]
            DynamicProvider::MySql($provider) => $body,
        }
    };
}

impl DynamicProvider {
    /// Build the provider for `kind`, or report it compiled out.
    pub fn new(kind: ProviderKind, config: ConfigHandle) -> Result<Self, ValidationError> {
        match kind {
            #[cfg(feature = "sap-hana")]
            ProviderKind::SapHana => Ok(Self::SapHana(StatementLeaseProvider::new(HanaDriver, config))),
            #[cfg(feature = "postgres")]
            ProviderKind::Postgres => Ok(Self::Postgres(StatementLeaseProvider::new(
                PostgresDriver,
                config,
            ))),
            #[cfg(feature = "mysql")]
            ProviderKind::MySql => Ok(Self::MySql(StatementLeaseProvider::new(MySqlDriver, config))),
            #[allow(unreachable_patterns)]
            disabled => Err(ValidationError::ProviderDisabled(disabled)),
        }
    }
}

#[async_trait]
impl LeaseProvider for DynamicProvider {
    fn kind(&self) -> ProviderKind {
        dispatch!(self, p => p.kind())
    }

    fn validate_provider_inputs(&self, raw: &Value) -> LeaseResult<ProviderInputs> {
        dispatch!(self, p => p.validate_provider_inputs(raw))
    }

    async fn validate_connection(&self, raw: &Value) -> LeaseResult<bool> {
        dispatch!(self, p => p.validate_connection(raw).await)
    }

    async fn create(&self, raw: &Value, expire_at_ms: i64) -> LeaseResult<CreatedLease> {
        dispatch!(self, p => p.create(raw, expire_at_ms).await)
    }

    async fn renew(&self, raw: &Value, entity_id: &str, expire_at_ms: i64) -> LeaseResult<LeaseRef> {
        dispatch!(self, p => p.renew(raw, entity_id, expire_at_ms).await)
    }

    async fn revoke(&self, raw: &Value, entity_id: &str) -> LeaseResult<LeaseRef> {
        dispatch!(self, p => p.revoke(raw, entity_id).await)
    }
}

/// Maps a [`ProviderKind`] to its provider.
///
/// Every provider shares the registry's [`ConfigHandle`], so a policy change
/// stored through the handle reaches all of them.
#[derive(Debug)]
pub struct ProviderRegistry {
    config: ConfigHandle,
    providers: Vec<DynamicProvider>,
}

impl ProviderRegistry {
    /// One provider for each family enabled in this build.
    pub fn new(config: ConfigHandle) -> Self {
        let providers = ProviderKind::ALL
            .into_iter()
            .filter_map(|kind| DynamicProvider::new(kind, config.clone()).ok())
            .collect();
        Self { config, providers }
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    pub fn get(&self, kind: ProviderKind) -> Result<&DynamicProvider, ValidationError> {
        self.providers
            .iter()
            .find(|provider| provider.kind() == kind)
            .ok_or(ValidationError::ProviderDisabled(kind))
    }

    /// Look up a provider by discriminator string, e.g. `"postgres"`.
    pub fn resolve(&self, name: &str) -> Result<&DynamicProvider, ValidationError> {
        self.get(name.parse()?)
    }

    /// Families available in this build
    pub fn kinds(&self) -> impl Iterator<Item = ProviderKind> + '_ {
        self.providers.iter().map(LeaseProvider::kind)
    }
}
