//! Target connection guard
//!
//! Runs before credentials are generated and before any socket is opened,
//! so the lease feature cannot be pointed at the deployment's own
//! infrastructure.

use std::sync::LazyLock;

use leasehold_config::{DEFAULT_INTERNAL_HOST_ALIAS, EngineConfig};
use regex::Regex;

use crate::error::{BlockReason, BlockedHostError};

/// Hosts refused in every mode.
pub const LOOPBACK_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

static PRIVATE_RANGES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"^10\.\d+\.\d+\.\d+").expect("static regex"),
        Regex::new(r"^192\.168\.\d+\.\d+").expect("static regex"),
    ]
});

/// Check `host` against the loopback ban and, in restricted mode, the
/// default internal alias and private ranges.
pub fn assert_allowed_host(host: &str, restricted_mode: bool) -> Result<(), BlockedHostError> {
    check(host, restricted_mode, |candidate| {
        candidate.eq_ignore_ascii_case(DEFAULT_INTERNAL_HOST_ALIAS)
    })
}

/// Same as [`assert_allowed_host`], using the policy's mode and alias list.
pub fn assert_allowed_host_with(host: &str, policy: &EngineConfig) -> Result<(), BlockedHostError> {
    check(host, policy.restricted_mode, |candidate| {
        policy.is_internal_alias(candidate)
    })
}

fn check(
    host: &str,
    restricted_mode: bool,
    is_internal_alias: impl Fn(&str) -> bool,
) -> Result<(), BlockedHostError> {
    let candidate = host.trim();
    let blocked = |reason| {
        Err(BlockedHostError {
            host: host.to_string(),
            reason,
        })
    };

    if restricted_mode {
        if is_internal_alias(candidate) {
            return blocked(BlockReason::InternalAlias);
        }
        if PRIVATE_RANGES.iter().any(|range| range.is_match(candidate)) {
            return blocked(BlockReason::PrivateRange);
        }
    }

    if LOOPBACK_HOSTS
        .iter()
        .any(|loopback| candidate.eq_ignore_ascii_case(loopback))
    {
        return blocked(BlockReason::Loopback);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("localhost", false)]
    #[case("localhost", true)]
    #[case("LOCALHOST", false)]
    #[case("127.0.0.1", false)]
    #[case("127.0.0.1", true)]
    fn loopback_is_always_blocked(#[case] host: &str, #[case] restricted: bool) {
        let err = assert_allowed_host(host, restricted).unwrap_err();
        assert_eq!(err.reason, BlockReason::Loopback);
        assert_eq!(err.host, host);
    }

    #[rstest]
    #[case("10.0.0.1", BlockReason::PrivateRange)]
    #[case("10.255.12.9", BlockReason::PrivateRange)]
    #[case("192.168.1.20", BlockReason::PrivateRange)]
    #[case("host.docker.internal", BlockReason::InternalAlias)]
    fn internal_targets_blocked_only_when_restricted(
        #[case] host: &str,
        #[case] reason: BlockReason,
    ) {
        assert_eq!(assert_allowed_host(host, true).unwrap_err().reason, reason);
        assert!(assert_allowed_host(host, false).is_ok());
    }

    #[rstest]
    #[case("db.example.com")]
    #[case("172.16.0.4")]
    #[case("100.10.0.1")]
    #[case("192.169.0.1")]
    #[case("11.0.0.1")]
    fn public_hosts_pass_in_restricted_mode(#[case] host: &str) {
        assert!(assert_allowed_host(host, true).is_ok());
    }

    #[test]
    fn configured_aliases_are_honoured() {
        let policy = EngineConfig {
            internal_host_aliases: vec!["metadata.internal".into()],
            ..EngineConfig::restricted()
        };
        let err = assert_allowed_host_with("metadata.internal", &policy).unwrap_err();
        assert_eq!(err.reason, BlockReason::InternalAlias);

        let permissive = EngineConfig {
            restricted_mode: false,
            ..policy
        };
        assert!(assert_allowed_host_with("metadata.internal", &permissive).is_ok());
        assert!(assert_allowed_host_with("localhost", &permissive).is_err());
    }
}
