//! `leasehold` - drive the lease engine from the command line
//!
//! Results go to stdout as JSON, logs to stderr. The exit code tells the
//! failure family apart so scripts can decide whether to retry:
//! 2 invalid input, 3 target unreachable, 4 statement rejected, 1 anything else.

mod cli;

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use figment::providers::Serialized;
use leasehold_config::{ConfigHandle, EngineConfig};
use leasehold_lease::{LeaseError, LeaseProvider, ProviderRegistry};
use serde_json::{Value, json};

use crate::cli::{Cli, Command, TargetArgs};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut log_config = leasehold_log::Config::from_env();
    if let Some(format) = cli.log_format {
        log_config = log_config.with_format(format);
    }
    let _log = match leasehold_log::init(log_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {e}");
            None
        },
    };

    match run(cli).await {
        Ok(output) => {
            println!("{output:#}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(exit_code(&e))
        },
    }
}

fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<LeaseError>() {
        Some(LeaseError::Validation(_)) => 2,
        Some(LeaseError::Connection(_)) => 3,
        Some(LeaseError::Execution(_)) => 4,
        None => 1,
    }
}

fn engine_config(cli: &Cli) -> Result<EngineConfig> {
    let mut figment = EngineConfig::figment(cli.config.as_deref())?;
    if cli.restricted {
        figment = figment.merge(Serialized::default("restricted_mode", true));
    }
    Ok(EngineConfig::from_figment(figment)?)
}

fn read_inputs(path: &Path) -> Result<Value> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read inputs from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read inputs from {}", path.display()))?
    };
    serde_json::from_str(&text).context("inputs are not valid JSON")
}

async fn run(cli: Cli) -> Result<Value> {
    let registry = ProviderRegistry::new(ConfigHandle::new(engine_config(&cli)?)?);

    let load = |target: &TargetArgs| -> Result<_> {
        let provider = registry.get(target.provider).map_err(LeaseError::from)?;
        Ok((provider, read_inputs(&target.inputs)?))
    };

    let output = match &cli.command {
        Command::Validate(target) => {
            let (provider, raw) = load(target)?;
            let inputs = provider.validate_provider_inputs(&raw)?;
            tracing::debug!(?inputs, "inputs validated");
            json!({ "provider": provider.kind(), "valid": true })
        },
        Command::TestConnection(target) => {
            let (provider, raw) = load(target)?;
            let connected = provider.validate_connection(&raw).await?;
            json!({ "provider": provider.kind(), "connected": connected })
        },
        Command::Create { target, expire_at } => {
            let (provider, raw) = load(target)?;
            serde_json::to_value(provider.create(&raw, *expire_at).await?)?
        },
        Command::Renew {
            target,
            entity_id,
            expire_at,
        } => {
            let (provider, raw) = load(target)?;
            serde_json::to_value(provider.renew(&raw, entity_id, *expire_at).await?)?
        },
        Command::Revoke { target, entity_id } => {
            let (provider, raw) = load(target)?;
            serde_json::to_value(provider.revoke(&raw, entity_id).await?)?
        },
    };

    Ok(output)
}
