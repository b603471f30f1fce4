//! Target drivers, one per provider family

#[cfg(feature = "sap-hana")]
mod hana;
#[cfg(feature = "mysql")]
mod mysql;
#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "sap-hana")]
pub use hana::{HanaConnection, HanaDriver};
#[cfg(feature = "mysql")]
pub use mysql::{MySqlConnection, MySqlDriver};
#[cfg(feature = "postgres")]
pub use postgres::{PostgresConnection, PostgresDriver};

/// Message of a sqlx error, preferring the database's own text.
#[cfg(any(feature = "postgres", feature = "mysql"))]
fn sqlx_message(error: &sqlx::Error) -> String {
    error
        .as_database_error()
        .map_or_else(|| error.to_string(), |db| db.message().to_owned())
}
