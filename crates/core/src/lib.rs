//! `tallybook-core`: shared building blocks for the ledger crates.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AccountId, EntryId, LedgerId};
pub use money::{Amount, AmountError};
pub use value_object::ValueObject;
