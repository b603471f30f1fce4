//! PostgreSQL driver over `sqlx`

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::{ConnectOptions, Connection, Executor};

use super::sqlx_message;
use crate::driver::{DriverError, TargetConnection, TargetDriver};
use crate::inputs::ProviderInputs;
use crate::registry::ProviderKind;

const DEFAULT_DATABASE: &str = "postgres";

/// Connects to PostgreSQL as the configured admin role
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDriver;

/// Open PostgreSQL session
pub struct PostgresConnection {
    inner: PgConnection,
}

fn connect_options(inputs: &ProviderInputs) -> PgConnectOptions {
    let options = PgConnectOptions::new()
        .host(&inputs.host)
        .port(inputs.port)
        .username(&inputs.username)
        .password(inputs.password.expose_secret())
        .database(inputs.database.as_deref().unwrap_or(DEFAULT_DATABASE))
        // Creation statements carry generated passwords.
        .disable_statement_logging();

    match &inputs.ca {
        Some(ca) => options
            .ssl_mode(PgSslMode::VerifyCa)
            .ssl_root_cert_from_pem(ca.as_bytes().to_vec()),
        None => options.ssl_mode(PgSslMode::Prefer),
    }
}

#[async_trait]
impl TargetDriver for PostgresDriver {
    type Connection = PostgresConnection;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Postgres
    }

    fn probe_statement(&self) -> &'static str {
        "SELECT 1"
    }

    async fn open(&self, inputs: &ProviderInputs) -> Result<PostgresConnection, DriverError> {
        let inner = PgConnection::connect_with(&connect_options(inputs))
            .await
            .map_err(|e| DriverError::new(sqlx_message(&e)))?;
        Ok(PostgresConnection { inner })
    }
}

#[async_trait]
impl TargetConnection for PostgresConnection {
    async fn execute(&mut self, statement: &str) -> Result<(), DriverError> {
        // No bind arguments: sqlx sends this over the simple query protocol,
        // which DDL such as CREATE ROLE requires.
        self.inner
            .execute(statement)
            .await
            .map(|_| ())
            .map_err(|e| DriverError::new(sqlx_message(&e)))
    }

    async fn close(self) {
        if let Err(e) = self.inner.close().await {
            tracing::warn!(error = %e, "failed to close postgres connection cleanly");
        }
    }
}
