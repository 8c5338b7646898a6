//! Ledger change events and the append-only audit trail built from them.

pub mod envelope;
pub mod event;
pub mod log;

pub use envelope::EventEnvelope;
pub use event::Event;
pub use log::EventLog;
