//! Generic statement-driven provider
//!
//! Every SQL-speaking target family shares one lifecycle: validate the
//! inputs, apply the guard, open a connection, render a template into a
//! [`StatementSet`] and run it in order. Only the wire protocol differs, and
//! that is the [`TargetDriver`]'s business.

use async_trait::async_trait;
use leasehold_config::ConfigHandle;
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::field::Empty;
use tracing::{Span, instrument};

use crate::contract::LeaseProvider;
use crate::driver::{TargetConnection, TargetDriver};
use crate::error::{
    ConnectionError, LeaseResult, ProviderExecutionError, ValidationError,
};
use crate::generator::GeneratedCredential;
use crate::guard::assert_allowed_host_with;
use crate::inputs::ProviderInputs;
use crate::lease::{CreatedLease, Expiration, LeaseRef};
use crate::registry::ProviderKind;
use crate::template::{StatementKind, StatementSet, StatementTemplater, StatementVariables};

/// Lease provider for targets managed through text statements.
///
/// Holds no per-lease state. Every call re-validates its inputs against the
/// policy current at that moment and owns its connection exclusively until
/// it returns.
pub struct StatementLeaseProvider<D> {
    driver: D,
    config: ConfigHandle,
    templater: StatementTemplater,
}

impl<D: TargetDriver> StatementLeaseProvider<D> {
    pub fn new(driver: D, config: ConfigHandle) -> Self {
        Self {
            driver,
            config,
            templater: StatementTemplater::new(),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    fn validate(&self, raw: &Value) -> Result<ProviderInputs, ValidationError> {
        let inputs = ProviderInputs::from_value(raw)?;
        let policy = self.config.load();
        assert_allowed_host_with(&inputs.host, &policy)?;
        Span::current().record("host", tracing::field::display(&inputs.host));
        Ok(inputs)
    }

    /// Open a connection and make sure the client reports it ready.
    async fn connect(&self, inputs: &ProviderInputs) -> Result<D::Connection, ConnectionError> {
        let conn = self
            .driver
            .open(inputs)
            .await
            .map_err(|e| ConnectionError::Connect {
                provider: self.driver.kind(),
                host: inputs.host.clone(),
                port: inputs.port,
                message: e.message,
            })?;

        if !conn.is_ready() {
            conn.close().await;
            return Err(ConnectionError::NotReady {
                provider: self.driver.kind(),
            });
        }

        tracing::debug!(host = %inputs.host, port = inputs.port, "connected to target");
        Ok(conn)
    }

    /// Connect, run `set`, close. The connection is closed on every path
    /// once it has been opened.
    async fn run(&self, inputs: &ProviderInputs, set: &StatementSet) -> LeaseResult<()> {
        let mut conn = self.connect(inputs).await?;
        let outcome = execute_statements(&mut conn, set).await;
        conn.close().await;
        outcome.map_err(Into::into)
    }
}

/// Execute `set` in order, stopping at the first statement the target rejects.
async fn execute_statements<C: TargetConnection>(
    conn: &mut C,
    set: &StatementSet,
) -> Result<(), ProviderExecutionError> {
    let statement_count = set.len();
    for (statement_index, statement) in set.iter().enumerate() {
        if let Err(e) = conn.execute(statement).await {
            tracing::warn!(
                statement_index,
                statement_count,
                "target rejected statement; remaining statements skipped"
            );
            return Err(ProviderExecutionError {
                message: e.message,
                statement_index,
                statement_count,
            });
        }
    }
    Ok(())
}

/// Entity ids are generated usernames: non-empty and alphanumeric. Anything
/// else never came from this engine and is refused before it reaches a
/// statement.
fn check_entity_id(entity_id: &str) -> Result<(), ValidationError> {
    if entity_id.is_empty() {
        return Err(ValidationError::schema("entityId", "must not be empty"));
    }
    if !entity_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::schema(
            "entityId",
            "must contain only ASCII letters and digits",
        ));
    }
    Ok(())
}

#[async_trait]
impl<D: TargetDriver> LeaseProvider for StatementLeaseProvider<D> {
    fn kind(&self) -> ProviderKind {
        self.driver.kind()
    }

    fn validate_provider_inputs(&self, raw: &Value) -> LeaseResult<ProviderInputs> {
        Ok(self.validate(raw)?)
    }

    #[instrument(skip_all, fields(provider = %self.kind(), host = Empty))]
    async fn validate_connection(&self, raw: &Value) -> LeaseResult<bool> {
        let inputs = self.validate(raw)?;
        let mut conn = self.connect(&inputs).await?;
        let probe = conn.execute(self.driver.probe_statement()).await;
        conn.close().await;

        probe.map_err(|e| ConnectionError::Probe {
            provider: self.kind(),
            message: e.message,
        })?;
        tracing::debug!("connection probe succeeded");
        Ok(true)
    }

    #[instrument(skip_all, fields(provider = %self.kind(), host = Empty))]
    async fn create(&self, raw: &Value, expire_at_ms: i64) -> LeaseResult<CreatedLease> {
        let inputs = self.validate(raw)?;
        let expires_at = Expiration::from_epoch_millis(expire_at_ms)?;
        let credential = GeneratedCredential::generate(self.config.load().password_length);

        let expiration = expires_at.to_statement_value();
        let set = self.templater.statements(
            StatementKind::Creation,
            &inputs.creation_statement,
            &StatementVariables {
                username: Some(&credential.username),
                password: Some(credential.password.expose_secret()),
                expiration: Some(&expiration),
            },
        )?;

        self.run(&inputs, &set).await?;
        tracing::info!(statements = set.len(), %expires_at, "lease created");

        Ok(CreatedLease {
            entity_id: credential.username.clone(),
            data: credential.into(),
            expires_at,
        })
    }

    #[instrument(skip_all, fields(provider = %self.kind(), host = Empty))]
    async fn renew(&self, raw: &Value, entity_id: &str, expire_at_ms: i64) -> LeaseResult<LeaseRef> {
        let inputs = self.validate(raw)?;
        check_entity_id(entity_id)?;
        let expires_at = Expiration::from_epoch_millis(expire_at_ms)?;

        let Some(template) = inputs.renew_statement.as_deref() else {
            tracing::debug!("no renewal statement configured; nothing to execute");
            return Ok(LeaseRef::new(entity_id));
        };

        let expiration = expires_at.to_statement_value();
        let set = self.templater.statements(
            StatementKind::Renewal,
            template,
            &StatementVariables {
                username: Some(entity_id),
                password: None,
                expiration: Some(&expiration),
            },
        )?;

        self.run(&inputs, &set).await?;
        tracing::info!(statements = set.len(), %expires_at, "lease renewed");
        Ok(LeaseRef::new(entity_id))
    }

    #[instrument(skip_all, fields(provider = %self.kind(), host = Empty))]
    async fn revoke(&self, raw: &Value, entity_id: &str) -> LeaseResult<LeaseRef> {
        let inputs = self.validate(raw)?;
        check_entity_id(entity_id)?;

        let set = self.templater.statements(
            StatementKind::Revocation,
            &inputs.revocation_statement,
            &StatementVariables {
                username: Some(entity_id),
                ..StatementVariables::default()
            },
        )?;

        self.run(&inputs, &set).await?;
        tracing::info!(statements = set.len(), "lease revoked");
        Ok(LeaseRef::new(entity_id))
    }
}

impl<D: TargetDriver + std::fmt::Debug> std::fmt::Debug for StatementLeaseProvider<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementLeaseProvider")
            .field("driver", &self.driver)
            .field("config", &self.config)
            .finish()
    }
}
