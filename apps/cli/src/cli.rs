//! Command-line arguments

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::DateTime;
use clap::{Args, Parser, Subcommand};
use leasehold_lease::ProviderKind;
use leasehold_log::Format;

#[derive(Debug, Parser)]
#[command(
    name = "leasehold",
    version,
    about = "Create, renew and revoke short-lived database credentials"
)]
pub struct Cli {
    /// Engine policy file (TOML). `LEASEHOLD_*` environment variables override it.
    #[arg(long, global = true, env = "LEASEHOLD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Refuse internal aliases and private network ranges
    #[arg(long, global = true)]
    pub restricted: bool,

    /// Log output format: pretty, compact or json
    #[arg(long, global = true, value_parser = parse_format)]
    pub log_format: Option<Format>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate provider inputs and apply the host guard
    Validate(TargetArgs),
    /// Connect and run the provider's probe statement
    TestConnection(TargetArgs),
    /// Issue a new lease
    Create {
        #[command(flatten)]
        target: TargetArgs,
        /// Expiry as epoch milliseconds or RFC 3339
        #[arg(long, value_parser = parse_expire_at)]
        expire_at: i64,
    },
    /// Extend an existing lease
    Renew {
        #[command(flatten)]
        target: TargetArgs,
        /// Entity id returned by `create`
        entity_id: String,
        #[arg(long, value_parser = parse_expire_at)]
        expire_at: i64,
    },
    /// Remove a lease from the target
    Revoke {
        #[command(flatten)]
        target: TargetArgs,
        entity_id: String,
    },
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Provider family: sap-hana, postgres or mysql
    #[arg(long, short = 'p', value_parser = parse_provider)]
    pub provider: ProviderKind,

    /// JSON file with provider inputs, `-` for stdin
    #[arg(long, short = 'i')]
    pub inputs: PathBuf,
}

fn parse_provider(value: &str) -> Result<ProviderKind> {
    Ok(value.parse()?)
}

fn parse_format(value: &str) -> Result<Format> {
    Ok(value.parse()?)
}

/// Epoch milliseconds, or an RFC 3339 timestamp converted to them.
pub fn parse_expire_at(value: &str) -> Result<i64> {
    let value = value.trim();
    if let Ok(epoch_ms) = value.parse::<i64>() {
        return Ok(epoch_ms);
    }
    if value.is_empty() {
        bail!("expiry must not be empty");
    }
    let instant = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("'{value}' is neither epoch milliseconds nor RFC 3339"))?;
    Ok(instant.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn expire_at_accepts_millis_and_rfc3339() {
        assert_eq!(parse_expire_at("1893456000000").unwrap(), 1_893_456_000_000);
        assert_eq!(
            parse_expire_at("2030-01-01T00:00:00.000Z").unwrap(),
            1_893_456_000_000
        );
        assert_eq!(
            parse_expire_at("2030-01-01T01:00:00+01:00").unwrap(),
            1_893_456_000_000
        );
        assert!(parse_expire_at("tomorrow").is_err());
        assert!(parse_expire_at("").is_err());
    }

    #[test]
    fn parses_create_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "leasehold",
            "create",
            "--provider",
            "pg",
            "--inputs",
            "inputs.json",
            "--expire-at",
            "1893456000000",
            "--restricted",
        ])
        .unwrap();

        assert!(cli.restricted);
        match cli.command {
            Command::Create { target, expire_at } => {
                assert_eq!(target.provider, ProviderKind::Postgres);
                assert_eq!(expire_at, 1_893_456_000_000);
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_provider_is_rejected_by_the_parser() {
        let err = Cli::try_parse_from([
            "leasehold",
            "validate",
            "--provider",
            "oracle",
            "--inputs",
            "x.json",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("oracle"));
    }
}
