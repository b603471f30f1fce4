//! SAP HANA driver over `hdbconnect_async`

use async_trait::async_trait;
use hdbconnect_async::{ConnectParams, Connection, ServerCerts};
use secrecy::ExposeSecret;

use crate::driver::{DriverError, TargetConnection, TargetDriver};
use crate::inputs::ProviderInputs;
use crate::registry::ProviderKind;

/// Connects to SAP HANA as the configured admin user
#[derive(Debug, Clone, Copy, Default)]
pub struct HanaDriver;

/// Open HANA session
pub struct HanaConnection {
    inner: Connection,
}

fn connect_params(inputs: &ProviderInputs) -> Result<ConnectParams, DriverError> {
    let mut builder = ConnectParams::builder();
    builder
        .hostname(&inputs.host)
        .port(inputs.port)
        .dbuser(&inputs.username)
        .password(inputs.password.expose_secret());
    if let Some(ca) = &inputs.ca {
        builder.tls_with(ServerCerts::Direct(ca.clone()));
    }

    builder
        .build()
        .map_err(|e| DriverError::new(e.to_string()))
}

/// Any successful reply counts: result sets, affected-row counts and plain
/// success alike. Only an error from the server fails the statement.
fn completed<T, E: std::fmt::Display>(reply: Result<T, E>) -> Result<(), DriverError> {
    reply
        .map(|_| ())
        .map_err(|e| DriverError::new(e.to_string()))
}

#[async_trait]
impl TargetDriver for HanaDriver {
    type Connection = HanaConnection;

    fn kind(&self) -> ProviderKind {
        ProviderKind::SapHana
    }

    fn probe_statement(&self) -> &'static str {
        "SELECT 1 FROM DUMMY"
    }

    async fn open(&self, inputs: &ProviderInputs) -> Result<HanaConnection, DriverError> {
        let inner = Connection::new(connect_params(inputs)?)
            .await
            .map_err(|e| DriverError::new(e.to_string()))?;

        Ok(HanaConnection { inner })
    }
}

#[async_trait]
impl TargetConnection for HanaConnection {
    async fn execute(&mut self, statement: &str) -> Result<(), DriverError> {
        completed(self.inner.statement(statement).await)
    }

    async fn close(self) {
        // hdbconnect disconnects the session when the last handle drops.
        drop(self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn inputs(ca: Option<&str>) -> ProviderInputs {
        let mut raw = json!({
            "host": "hana.example.com",
            "port": 39013,
            "username": "SYSTEM",
            "password": "Manager1",
            "creationStatement": "CREATE USER {{username}} PASSWORD \"{{password}}\";",
            "revocationStatement": "DROP USER {{username}};",
        });
        if let Some(ca) = ca {
            raw["ca"] = Value::String(ca.to_owned());
        }
        ProviderInputs::from_value(&raw).unwrap()
    }

    #[test]
    fn plain_tcp_without_ca() {
        let params = connect_params(&inputs(None)).unwrap();
        assert_eq!(params.host(), "hana.example.com");
        assert_eq!(params.port(), 39013);
        assert_eq!(params.dbuser(), "SYSTEM");
        assert!(!params.is_tls());
    }

    #[test]
    fn ca_switches_to_tls() {
        let pem = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----";
        let params = connect_params(&inputs(Some(pem))).unwrap();
        assert!(params.is_tls());
    }

    #[test]
    fn result_sets_and_row_counts_are_success() {
        // The probe returns a one-row result set; DML returns a row count.
        assert!(completed(Ok::<_, String>(vec![1_u8])).is_ok());
        assert!(completed(Ok::<_, String>(3_usize)).is_ok());
        assert!(completed(Ok::<_, String>(())).is_ok());
    }

    #[test]
    fn server_error_keeps_its_message() {
        let err = completed(Err::<(), _>("invalid user name: ABC")).unwrap_err();
        assert_eq!(err.message, "invalid user name: ABC");
    }

    #[test]
    fn probe_is_a_query() {
        assert_eq!(HanaDriver.probe_statement(), "SELECT 1 FROM DUMMY");
        assert_eq!(HanaDriver.kind(), ProviderKind::SapHana);
    }
}
