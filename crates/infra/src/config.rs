//! Configuration loading and representation.

use std::path::PathBuf;

use tallybook_accounting::{LedgerOptions, MissingAccountPolicy};
use tallybook_observability::{LogFormat, UnknownLogFormat};

pub const SNAPSHOT_PATH: &str = "TALLYBOOK_SNAPSHOT_PATH";
pub const REF_PREFIX: &str = "TALLYBOOK_REF_PREFIX";
pub const STRICT_BALANCES: &str = "TALLYBOOK_STRICT_BALANCES";
pub const ACTOR: &str = "TALLYBOOK_ACTOR";
pub const LOG_FORMAT: &str = "TALLYBOOK_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must not be blank")]
    Blank { key: &'static str },

    #[error("{key} expects a boolean, got `{value}`")]
    InvalidBool { key: &'static str, value: String },

    #[error("{key}: {source}")]
    InvalidLogFormat {
        key: &'static str,
        #[source]
        source: UnknownLogFormat,
    },
}

/// Process configuration. Unset variables fall back to [`AppConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Where [`crate::JsonFileSink`] keeps the ledger; `None` keeps it in memory.
    pub snapshot_path: Option<PathBuf>,
    pub reference_prefix: String,
    /// Balance queries on unknown accounts fail instead of returning zero.
    pub strict_balances: bool,
    pub actor: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        let options = LedgerOptions::default();
        Self {
            snapshot_path: None,
            reference_prefix: options.reference_prefix,
            strict_balances: false,
            actor: options.actor,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source (env, test maps, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup(SNAPSHOT_PATH).filter(|p| !p.trim().is_empty()) {
            config.snapshot_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(prefix) = lookup(REF_PREFIX) {
            config.reference_prefix = non_blank(REF_PREFIX, prefix)?;
        }
        if let Some(actor) = lookup(ACTOR) {
            config.actor = non_blank(ACTOR, actor)?;
        }
        if let Some(value) = lookup(STRICT_BALANCES) {
            config.strict_balances = parse_bool(STRICT_BALANCES, &value)?;
        }
        if let Some(value) = lookup(LOG_FORMAT) {
            config.log_format = value
                .parse()
                .map_err(|source| ConfigError::InvalidLogFormat {
                    key: LOG_FORMAT,
                    source,
                })?;
        }

        Ok(config)
    }

    pub fn ledger_options(&self) -> LedgerOptions {
        LedgerOptions {
            reference_prefix: self.reference_prefix.clone(),
            missing_account: if self.strict_balances {
                MissingAccountPolicy::Error
            } else {
                MissingAccountPolicy::ZeroBalance
            },
            actor: self.actor.clone(),
        }
    }
}

fn non_blank(key: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Blank { key });
    }
    Ok(trimmed.to_string())
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_the_engine_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.ledger_options(), LedgerOptions::default());
    }

    #[test]
    fn every_variable_is_read() {
        let config = config(&[
            (SNAPSHOT_PATH, "/var/lib/tallybook/books.json"),
            (REF_PREFIX, "GJ"),
            (STRICT_BALANCES, "Yes"),
            (ACTOR, " accountant@example.com "),
            (LOG_FORMAT, "pretty"),
        ])
        .unwrap();

        assert_eq!(
            config.snapshot_path,
            Some(PathBuf::from("/var/lib/tallybook/books.json"))
        );
        assert_eq!(config.log_format, LogFormat::Pretty);

        let options = config.ledger_options();
        assert_eq!(options.reference_prefix, "GJ");
        assert_eq!(options.missing_account, MissingAccountPolicy::Error);
        assert_eq!(options.actor, "accountant@example.com");
    }

    #[test]
    fn bad_values_are_reported_by_key() {
        assert_eq!(
            config(&[(STRICT_BALANCES, "maybe")]),
            Err(ConfigError::InvalidBool {
                key: STRICT_BALANCES,
                value: "maybe".to_string()
            })
        );
        assert_eq!(
            config(&[(REF_PREFIX, "  ")]),
            Err(ConfigError::Blank { key: REF_PREFIX })
        );
        assert!(matches!(
            config(&[(LOG_FORMAT, "xml")]),
            Err(ConfigError::InvalidLogFormat { key: LOG_FORMAT, .. })
        ));
    }

    #[test]
    fn blank_snapshot_path_means_in_memory() {
        assert_eq!(config(&[(SNAPSHOT_PATH, "")]).unwrap().snapshot_path, None);
    }
}
