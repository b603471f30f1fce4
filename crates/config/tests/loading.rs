//! Layered loading through figment's jail (isolated cwd + env)

use std::path::Path;

use figment::Jail;
use leasehold_config::{ConfigError, DEFAULT_PASSWORD_LENGTH, EngineConfig};
use pretty_assertions::assert_eq;

#[test]
fn defaults_without_file_or_env() {
    Jail::expect_with(|_jail| {
        let config = EngineConfig::load(None).expect("defaults load");
        assert_eq!(config, EngineConfig::default());
        Ok(())
    });
}

#[test]
fn file_then_env_override() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "leasehold.toml",
            r#"
                restricted_mode = false
                password_length = 64
                internal_host_aliases = ["host.docker.internal", "metadata.internal"]
            "#,
        )?;
        jail.set_env("LEASEHOLD_RESTRICTED_MODE", "true");

        let config = EngineConfig::load(Some(Path::new("leasehold.toml"))).expect("load");
        assert!(config.restricted_mode);
        assert_eq!(config.password_length, 64);
        assert!(config.is_internal_alias("metadata.internal"));
        Ok(())
    });
}

#[test]
fn unrelated_prefixed_env_is_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("LEASEHOLD_LOG", "debug");
        let config = EngineConfig::load(None).expect("load");
        assert_eq!(config.password_length, DEFAULT_PASSWORD_LENGTH);
        Ok(())
    });
}

#[test]
fn missing_explicit_file_is_an_error() {
    Jail::expect_with(|_jail| {
        let err = EngineConfig::load(Some(Path::new("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
        Ok(())
    });
}

#[test]
fn out_of_range_length_fails_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("LEASEHOLD_PASSWORD_LENGTH", "8");
        let err = EngineConfig::load(None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "password_length"));
        Ok(())
    });
}

#[test]
fn malformed_value_is_a_load_error() {
    Jail::expect_with(|jail| {
        jail.set_env("LEASEHOLD_PASSWORD_LENGTH", "many");
        let err = EngineConfig::load(None).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
        Ok(())
    });
}
