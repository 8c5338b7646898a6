use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tallybook_core::{AccountId, Entity};

/// High-level account kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

/// Side on which an account kind normally carries its balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NormalBalance {
    Debit,
    Credit,
}

impl AccountKind {
    pub const ALL: [AccountKind; 5] = [
        AccountKind::Asset,
        AccountKind::Liability,
        AccountKind::Equity,
        AccountKind::Income,
        AccountKind::Expense,
    ];

    /// Presentation side only. Engine balances are always debit-positive.
    pub fn normal_balance(self) -> NormalBalance {
        match self {
            AccountKind::Asset | AccountKind::Expense => NormalBalance::Debit,
            AccountKind::Liability | AccountKind::Equity | AccountKind::Income => {
                NormalBalance::Credit
            }
        }
    }

    /// Income and expense accounts are zeroed by year-end closing.
    pub fn is_temporary(self) -> bool {
        matches!(self, AccountKind::Income | AccountKind::Expense)
    }
}

impl NormalBalance {
    /// Convert a debit-positive balance into this side's natural sign.
    pub fn present(self, balance: Decimal) -> Decimal {
        match self {
            NormalBalance::Debit => balance,
            NormalBalance::Credit => -balance,
        }
    }
}

impl core::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            AccountKind::Asset => "Asset",
            AccountKind::Liability => "Liability",
            AccountKind::Equity => "Equity",
            AccountKind::Income => "Income",
            AccountKind::Expense => "Expense",
        };
        f.write_str(s)
    }
}

/// An account in the chart of accounts.
///
/// `balance` is a cache of `opening + Σ(debit - credit)` over the journal and
/// is only ever changed by the ledger when it applies a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub(crate) id: AccountId,
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) kind: AccountKind,
    pub(crate) opening: Decimal,
    pub(crate) balance: Decimal,
    pub(crate) active: bool,
}

impl Account {
    pub(crate) fn open(new: NewAccount) -> Self {
        Self {
            id: AccountId::new(),
            code: new.code.trim().to_string(),
            name: new.name,
            kind: new.kind,
            opening: new.opening,
            balance: new.opening,
            active: true,
        }
    }

    pub fn id_typed(&self) -> AccountId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn opening(&self) -> Decimal {
        self.opening
    }

    /// Current debit-positive balance (opening + every posting to date).
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Request to add an account to the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub code: String,
    pub name: String,
    pub kind: AccountKind,
    /// Signed, debit-positive opening balance.
    pub opening: Decimal,
}

impl NewAccount {
    pub fn new(name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            code: String::new(),
            name: name.into(),
            kind,
            opening: Decimal::ZERO,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_opening(mut self, opening: Decimal) -> Self {
        self.opening = opening;
        self
    }
}
