use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tallybook_core::LedgerId;

/// Envelope for an event, containing ledger + audit metadata.
///
/// This is the unit appended to the audit trail.
///
/// Notes:
/// - **Append-only**: `sequence_number` is monotonically increasing per ledger, starting at 1.
/// - `actor` is who triggered the change (a user name, or `system`).
/// - `recorded_at` is wall-clock time of recording; the payload carries business time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    ledger_id: LedgerId,

    /// Monotonically increasing position in the ledger's audit stream.
    sequence_number: u64,

    recorded_at: DateTime<Utc>,
    actor: String,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        ledger_id: LedgerId,
        sequence_number: u64,
        recorded_at: DateTime<Utc>,
        actor: impl Into<String>,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            ledger_id,
            sequence_number,
            recorded_at,
            actor: actor.into(),
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn ledger_id(&self) -> LedgerId {
        self.ledger_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
