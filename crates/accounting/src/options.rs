use serde::{Deserialize, Serialize};

/// What a balance query does when the account name does not resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingAccountPolicy {
    /// Report a zero balance (forgiving; hides typos in names).
    #[default]
    ZeroBalance,
    /// Fail with `LedgerError::AccountNotFound`.
    Error,
}

/// Engine behavior knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerOptions {
    /// Prefix of generated entry references, e.g. `JE-20250101-000001`.
    pub reference_prefix: String,
    pub missing_account: MissingAccountPolicy,
    /// Recorded as the actor of every audit-trail event.
    pub actor: String,
}

impl Default for LedgerOptions {
    fn default() -> Self {
        Self {
            reference_prefix: "JE".to_string(),
            missing_account: MissingAccountPolicy::default(),
            actor: "system".to_string(),
        }
    }
}

impl LedgerOptions {
    pub fn strict() -> Self {
        Self {
            missing_account: MissingAccountPolicy::Error,
            ..Self::default()
        }
    }
}
