//! Provider input schema
//!
//! Inputs arrive as opaque JSON from the API layer (camelCase keys) and are
//! re-validated on every lifecycle call. Hosts are trimmed and lower-cased
//! before the guard sees them.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ValidationError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawInputs {
    host: String,
    port: u16,
    #[serde(default)]
    database: Option<String>,
    username: String,
    password: String,
    #[serde(default)]
    ca: Option<String>,
    creation_statement: String,
    revocation_statement: String,
    #[serde(default)]
    renew_statement: Option<String>,
}

/// Validated configuration for reaching a target and managing leases on it.
///
/// Templates are kept as raw source; they are rendered per call.
pub struct ProviderInputs {
    pub host: String,
    pub port: u16,
    /// Database to attach to, for families that need one
    pub database: Option<String>,
    /// Admin user the engine connects as
    pub username: String,
    pub password: SecretString,
    /// PEM trust material; enables TLS when present
    pub ca: Option<String>,
    pub creation_statement: String,
    pub revocation_statement: String,
    /// Renewal is a no-op when absent
    pub renew_statement: Option<String>,
}

fn non_empty(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::schema(field, "must not be empty"));
    }
    Ok(trimmed.to_owned())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl ProviderInputs {
    /// Schema-validate opaque inputs. Does not apply the host guard.
    pub fn from_value(raw: &Value) -> Result<Self, ValidationError> {
        let raw = RawInputs::deserialize(raw)
            .map_err(|e| ValidationError::schema("inputs", e.to_string()))?;

        if raw.port == 0 {
            return Err(ValidationError::schema("port", "must be between 1 and 65535"));
        }

        Ok(Self {
            host: non_empty("host", &raw.host)?.to_lowercase(),
            port: raw.port,
            database: optional(raw.database),
            username: non_empty("username", &raw.username)?,
            password: SecretString::from(non_empty("password", &raw.password)?),
            ca: optional(raw.ca),
            creation_statement: non_empty("creationStatement", &raw.creation_statement)?,
            revocation_statement: non_empty("revocationStatement", &raw.revocation_statement)?,
            renew_statement: optional(raw.renew_statement),
        })
    }

    /// Normalised inputs as JSON, admin password included.
    ///
    /// For callers that persist the validated configuration (encrypted) in
    /// their own store.
    pub fn to_value(&self) -> Value {
        let mut value = json!({
            "host": self.host,
            "port": self.port,
            "username": self.username,
            "password": self.password.expose_secret(),
            "creationStatement": self.creation_statement,
            "revocationStatement": self.revocation_statement,
        });
        if let Value::Object(map) = &mut value {
            for (key, field) in [
                ("database", &self.database),
                ("ca", &self.ca),
                ("renewStatement", &self.renew_statement),
            ] {
                if let Some(field) = field {
                    map.insert(key.to_owned(), Value::String(field.clone()));
                }
            }
        }
        value
    }
}

impl fmt::Debug for ProviderInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderInputs")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("ca", &self.ca.as_ref().map(|_| "[PEM]"))
            .field("renew_statement", &self.renew_statement.is_some())
            .finish()
    }
}
