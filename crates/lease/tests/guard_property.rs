//! Guard and templating properties.
//!
//! - Loopback hosts fail validation in every mode
//! - Private ranges fail only in restricted mode
//! - Rendering then splitting preserves statement order and drops blanks

use leasehold_config::{ConfigHandle, EngineConfig};
use leasehold_lease::template::StatementVariables;
use leasehold_lease::testing::InMemoryTarget;
use leasehold_lease::{
    BlockReason, LeaseProvider, ProviderKind, StatementKind, StatementTemplater,
    assert_allowed_host, generate_password,
};
use proptest::prelude::*;
use secrecy::ExposeSecret;
use serde_json::json;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_private_host() -> impl Strategy<Value = String> {
    prop_oneof![
        (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(b, c, d)| format!("10.{b}.{c}.{d}")),
        (any::<u8>(), any::<u8>()).prop_map(|(c, d)| format!("192.168.{c}.{d}")),
    ]
}

fn arb_loopback_host() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("localhost".to_string()),
        Just("LocalHost".to_string()),
        Just("127.0.0.1".to_string()),
    ]
}

fn raw_inputs(host: &str) -> serde_json::Value {
    json!({
        "host": host,
        "port": 5432,
        "username": "admin",
        "password": "admin-password",
        "creationStatement": "CREATE USER {{username}};",
        "revocationStatement": "DROP USER {{username}};",
    })
}

fn provider(restricted: bool) -> impl LeaseProvider {
    let config = ConfigHandle::new(EngineConfig::default().with_restricted_mode(restricted)).unwrap();
    InMemoryTarget::new(ProviderKind::Postgres).provider(config)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn loopback_fails_validation_in_every_mode(
        host in arb_loopback_host(),
        restricted in any::<bool>(),
    ) {
        let err = provider(restricted)
            .validate_provider_inputs(&raw_inputs(&host))
            .unwrap_err();
        prop_assert_eq!(err.blocked_host().map(|b| b.reason), Some(BlockReason::Loopback));
    }

    #[test]
    fn private_ranges_fail_only_when_restricted(host in arb_private_host()) {
        let raw = raw_inputs(&host);

        let err = provider(true).validate_provider_inputs(&raw).unwrap_err();
        prop_assert_eq!(err.blocked_host().map(|b| b.reason), Some(BlockReason::PrivateRange));

        prop_assert!(provider(false).validate_provider_inputs(&raw).is_ok());
    }

    #[test]
    fn other_ipv4_hosts_pass_restricted_mode(
        a in 11u8..=126,
        b in any::<u8>(),
        c in any::<u8>(),
        d in any::<u8>(),
    ) {
        let host = format!("{a}.{b}.{c}.{d}");
        prop_assert!(assert_allowed_host(&host, true).is_ok());
    }

    #[test]
    fn split_keeps_order_and_drops_blank_segments(
        names in prop::collection::vec("[A-Za-z0-9]{1,12}", 1..8),
        padding in prop::collection::vec(" {0,3}", 1..8),
    ) {
        let source: String = names
            .iter()
            .zip(padding.iter().cycle())
            .map(|(name, pad)| format!("{pad}GRANT {name} TO {{{{username}}}};{pad};"))
            .collect();

        let set = StatementTemplater::new()
            .statements(
                StatementKind::Revocation,
                &source,
                &StatementVariables { username: Some("u1"), ..StatementVariables::default() },
            )
            .unwrap();

        let expected: Vec<String> = names.iter().map(|name| format!("GRANT {name} TO u1")).collect();
        prop_assert_eq!(set.as_slice(), expected.as_slice());
    }

    #[test]
    fn raw_creation_render_keeps_passwords_byte_for_byte(length in 16usize..=128) {
        let password = generate_password(length);
        let rendered = StatementTemplater::new()
            .statements(
                StatementKind::Creation,
                "CREATE USER {{username}} PASSWORD '{{password}}'",
                &StatementVariables {
                    username: Some("u1"),
                    password: Some(password.expose_secret()),
                    expiration: None,
                },
            )
            .unwrap();

        let expected = format!("CREATE USER u1 PASSWORD '{}'", password.expose_secret());
        prop_assert_eq!(rendered.as_slice(), &[expected][..]);
    }
}
