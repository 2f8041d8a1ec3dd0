use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::draw::DrawState;

/// Every observable state change in a draw produces an Event.
/// The CLI prints these as they stream out of the engine's `tick()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    DrawStarted {
        cycle: u32,
        candidates: usize,
        at: DateTime<Utc>,
    },
    /// Cosmetic selection hop. Carries no information about the winner.
    CandidateHighlighted {
        user_id: String,
        name: String,
        at: DateTime<Utc>,
    },
    /// Final outcome. Emitted exactly once per started draw.
    DrawFinished {
        cycle: u32,
        winner_id: String,
        winner_name: String,
        at: DateTime<Utc>,
    },
    DrawCancelled {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: DrawState,
        candidates: usize,
        hops_done: usize,
        total_hops: usize,
        at: DateTime<Utc>,
    },
}
