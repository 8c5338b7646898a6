//! In-memory append-only event log.

use chrono::Utc;
use uuid::Uuid;

use tallybook_core::LedgerId;

use crate::envelope::EventEnvelope;
use crate::event::Event;

/// Append-only log of enveloped events for a single ledger.
///
/// Sequence numbers start at 1 and increase by one per appended event.
#[derive(Debug, Clone)]
pub struct EventLog<E> {
    ledger_id: LedgerId,
    entries: Vec<EventEnvelope<E>>,
}

impl<E: Event> EventLog<E> {
    pub fn new(ledger_id: LedgerId) -> Self {
        Self {
            ledger_id,
            entries: Vec::new(),
        }
    }

    pub fn ledger_id(&self) -> LedgerId {
        self.ledger_id
    }

    /// Append an event, stamping it with the next sequence number.
    pub fn append(&mut self, actor: &str, payload: E) -> &EventEnvelope<E> {
        let next = self.last_sequence() + 1;
        self.entries.push(EventEnvelope::new(
            Uuid::now_v7(),
            self.ledger_id,
            next,
            Utc::now(),
            actor,
            payload,
        ));
        &self.entries[self.entries.len() - 1]
    }

    pub fn last_sequence(&self) -> u64 {
        self.entries.last().map(|e| e.sequence_number()).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventEnvelope<E>> {
        self.entries.iter()
    }

    /// Events strictly after `sequence_number`.
    pub fn since(&self, sequence_number: u64) -> &[EventEnvelope<E>] {
        let start = self
            .entries
            .partition_point(|e| e.sequence_number() <= sequence_number);
        &self.entries[start..]
    }
}
