use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tallybook_core::{DomainError, DomainResult, ValueObject};

/// Inclusive calendar-date filter. Missing bounds are open-ended.
///
/// A range whose `from` is after its `to` matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ValueObject for DateRange {}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn starting(from: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    pub fn until(to: NaiveDate) -> Self {
        Self {
            from: None,
            to: Some(to),
        }
    }

    /// January 1st through December 31st.
    pub fn year(year: i32) -> DomainResult<Self> {
        let from = ymd(year, 1, 1)?;
        let to = ymd(year, 12, 31)?;
        Ok(Self::between(from, to))
    }

    /// First through last day of a calendar month.
    pub fn month(year: i32, month: u32) -> DomainResult<Self> {
        let from = ymd(year, month, 1)?;
        let next = if month == 12 {
            ymd(year + 1, 1, 1)?
        } else {
            ymd(year, month + 1, 1)?
        };
        let to = next
            .pred_opt()
            .ok_or_else(|| DomainError::validation("month end out of range"))?;
        Ok(Self::between(from, to))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    pub fn is_empty(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }

    /// Everything strictly before this range starts, or `None` when the range
    /// is open at the start.
    pub fn before(&self) -> Option<Self> {
        let from = self.from?;
        Some(match from.pred_opt() {
            Some(prev) => Self::until(prev),
            None => Self::between(NaiveDate::MAX, NaiveDate::MIN),
        })
    }
}

fn ymd(year: i32, month: u32, day: u32) -> DomainResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DomainError::validation(format!("invalid date {year}-{month:02}-{day:02}")))
}
