//! Lease results and expiration handling
//!
//! The engine persists nothing; these values go back to the caller, who
//! stores `{entityId, encrypted secret, expiresAt}` wherever it keeps leases.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::ValidationError;
use crate::generator::GeneratedCredential;

/// Lease expiry instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Expiration(DateTime<Utc>);

impl Expiration {
    /// From epoch milliseconds, as callers track expiry.
    pub fn from_epoch_millis(epoch_ms: i64) -> Result<Self, ValidationError> {
        DateTime::from_timestamp_millis(epoch_ms)
            .map(Self)
            .ok_or(ValidationError::InvalidExpiry { epoch_ms })
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// ISO-8601 with millisecond precision and `Z`, e.g. `2030-01-01T00:00:00.000Z`.
    ///
    /// This is the `{{expiration}}` value statements see.
    pub fn to_statement_value(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl Serialize for Expiration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_statement_value())
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_statement_value())
    }
}

/// Credentials handed to the lease holder.
///
/// Serialises as `{"DB_USERNAME": .., "DB_PASSWORD": ..}`, exposing the
/// password; `Debug` redacts it.
pub struct LeaseCredentials {
    pub username: String,
    pub password: SecretString,
}

impl From<GeneratedCredential> for LeaseCredentials {
    fn from(credential: GeneratedCredential) -> Self {
        Self {
            username: credential.username,
            password: credential.password,
        }
    }
}

impl Serialize for LeaseCredentials {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LeaseCredentials", 2)?;
        state.serialize_field("DB_USERNAME", &self.username)?;
        state.serialize_field("DB_PASSWORD", self.password.expose_secret())?;
        state.end()
    }
}

impl fmt::Debug for LeaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeaseCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Result of `create`: the entity id (generated username) and its secret
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLease {
    pub entity_id: String,
    pub data: LeaseCredentials,
    pub expires_at: Expiration,
}

/// Result of `renew` / `revoke`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseRef {
    pub entity_id: String,
}

impl LeaseRef {
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
        }
    }
}
