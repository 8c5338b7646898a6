//! Monetary amounts.
//!
//! Journal line sides are non-negative decimals. Balances are plain signed
//! `Decimal`s; only the *inputs* to posting carry the non-negative guarantee.

use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_object::ValueObject;

/// Why a raw number was refused as an amount.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount cannot be negative (got {0})")]
    Negative(Decimal),

    #[error("amount must be greater than zero (got {0})")]
    NotPositive(Decimal),

    #[error("amount is not a finite number")]
    NotFinite,

    #[error("amount is out of range: {0}")]
    OutOfRange(String),

    #[error("malformed amount: {0}")]
    Malformed(String),
}

/// Non-negative exact decimal amount.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl ValueObject for Amount {}

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Accepts zero and positive values.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value));
        }
        Ok(Self(value.normalize()))
    }

    /// Accepts strictly positive values only (posting amounts).
    pub fn positive(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }
        Ok(Self(value.normalize()))
    }

    /// Boundary conversion for hosts that hold amounts as floats.
    ///
    /// `NaN` and infinities are rejected instead of being coerced.
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::NotFinite);
        }
        let decimal =
            Decimal::from_f64(value).ok_or_else(|| AmountError::OutOfRange(value.to_string()))?;
        Self::new(decimal)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal =
            Decimal::from_str(s.trim()).map_err(|e| AmountError::Malformed(format!("{s:?}: {e}")))?;
        Self::new(decimal)
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
