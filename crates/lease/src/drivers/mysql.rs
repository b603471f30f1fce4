//! MySQL driver over `sqlx`

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::mysql::{MySqlConnectOptions, MySqlSslMode};
use sqlx::{ConnectOptions, Connection, Executor};

use super::sqlx_message;
use crate::driver::{DriverError, TargetConnection, TargetDriver};
use crate::inputs::ProviderInputs;
use crate::registry::ProviderKind;

/// Connects to MySQL as the configured admin user
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDriver;

/// Open MySQL session
pub struct MySqlConnection {
    inner: sqlx::MySqlConnection,
}

fn connect_options(inputs: &ProviderInputs) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new()
        .host(&inputs.host)
        .port(inputs.port)
        .username(&inputs.username)
        .password(inputs.password.expose_secret())
        .disable_statement_logging();

    if let Some(database) = &inputs.database {
        options = options.database(database);
    }

    match &inputs.ca {
        Some(ca) => options
            .ssl_mode(MySqlSslMode::VerifyCa)
            .ssl_ca_from_pem(ca.as_bytes().to_vec()),
        None => options.ssl_mode(MySqlSslMode::Preferred),
    }
}

#[async_trait]
impl TargetDriver for MySqlDriver {
    type Connection = MySqlConnection;

    fn kind(&self) -> ProviderKind {
        ProviderKind::MySql
    }

    fn probe_statement(&self) -> &'static str {
        "SELECT 1"
    }

    async fn open(&self, inputs: &ProviderInputs) -> Result<MySqlConnection, DriverError> {
        let inner = sqlx::MySqlConnection::connect_with(&connect_options(inputs))
            .await
            .map_err(|e| DriverError::new(sqlx_message(&e)))?;
        Ok(MySqlConnection { inner })
    }
}

#[async_trait]
impl TargetConnection for MySqlConnection {
    async fn execute(&mut self, statement: &str) -> Result<(), DriverError> {
        self.inner
            .execute(statement)
            .await
            .map(|_| ())
            .map_err(|e| DriverError::new(sqlx_message(&e)))
    }

    async fn close(self) {
        if let Err(e) = self.inner.close().await {
            tracing::warn!(error = %e, "failed to close mysql connection cleanly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    const PEM: &str = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----";

    fn inputs(extra: &[(&str, &str)]) -> ProviderInputs {
        let mut raw = json!({
            "host": "DB.example.com",
            "port": 3306,
            "username": "admin",
            "password": "admin-password",
            "creationStatement": "CREATE USER {{username}};",
            "revocationStatement": "DROP USER {{username}};",
        });
        for (key, value) in extra {
            raw[*key] = Value::String((*value).to_owned());
        }
        ProviderInputs::from_value(&raw).unwrap()
    }

    #[test]
    fn no_database_unless_given() {
        let options = connect_options(&inputs(&[]));
        assert_eq!(options.get_host(), "db.example.com");
        assert_eq!(options.get_port(), 3306);
        assert_eq!(options.get_username(), "admin");
        assert_eq!(options.get_database(), None);

        let options = connect_options(&inputs(&[("database", "app")]));
        assert_eq!(options.get_database(), Some("app"));
    }

    #[test]
    fn tls_is_opportunistic_without_ca() {
        let options = connect_options(&inputs(&[]));
        assert!(matches!(options.get_ssl_mode(), MySqlSslMode::Preferred));
    }

    #[test]
    fn ca_requires_a_verified_server() {
        let options = connect_options(&inputs(&[("ca", PEM)]));
        assert!(matches!(options.get_ssl_mode(), MySqlSslMode::VerifyCa));
    }

    #[test]
    fn probe_is_select_one() {
        assert_eq!(MySqlDriver.probe_statement(), "SELECT 1");
        assert_eq!(MySqlDriver.kind(), ProviderKind::MySql);
    }
}
