//! Configuration presets for common scenarios

use super::{Config, DisplayConfig, Format};

impl Config {
    /// Create configuration from environment variables
    ///
    /// `LEASEHOLD_LOG` wins over `RUST_LOG`; `LEASEHOLD_LOG_FORMAT` selects the
    /// format and falls back to compact when unset or unrecognised.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup("LEASEHOLD_LOG").or_else(|| lookup("RUST_LOG")) {
            config.level = level;
        }

        if let Some(format) = lookup("LEASEHOLD_LOG_FORMAT") {
            config.format = format.parse().unwrap_or_default();
        }

        if config.format == Format::Json || lookup("NO_COLOR").is_some() {
            config.display.colors = false;
        }

        config
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                colors: true,
                source: true,
                ..DisplayConfig::default()
            },
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                source: false,
                ..DisplayConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_env_gives_defaults() {
        assert_eq!(Config::from_lookup(lookup(&[])), Config::default());
    }

    #[test]
    fn leasehold_log_beats_rust_log() {
        let config = Config::from_lookup(lookup(&[
            ("RUST_LOG", "warn"),
            ("LEASEHOLD_LOG", "leasehold_lease=trace"),
        ]));
        assert_eq!(config.level, "leasehold_lease=trace");
    }

    #[test]
    fn json_format_disables_colors() {
        let config = Config::from_lookup(lookup(&[("LEASEHOLD_LOG_FORMAT", "json")]));
        assert_eq!(config.format, Format::Json);
        assert!(!config.display.colors);
    }

    #[test]
    fn unknown_format_falls_back_to_compact() {
        let config = Config::from_lookup(lookup(&[("LEASEHOLD_LOG_FORMAT", "xml")]));
        assert_eq!(config.format, Format::Compact);
    }
}
