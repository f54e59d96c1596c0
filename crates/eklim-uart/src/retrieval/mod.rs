//! Bulk fault-log retrieval
//!
//! The device only tells how many records it holds, so a session first asks
//! for the count and then walks the slots from the highest index down to 1,
//! one paced request at a time. Single-record failures are counted and
//! skipped; they never abort the session.

mod manager;

use serde::Serialize;

pub use manager::FaultRetriever;

/// Retrieval session state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session has run since creation or the last clear
    #[default]
    Idle,
    /// Waiting for the count answer
    CountingTotal,
    /// Walking the device slots
    Fetching,
    /// Every slot was attempted
    Completed,
    /// The device reported no retrievable records
    NoRecords,
    /// Stopped at a pacing checkpoint
    Cancelled,
}

impl SessionState {
    /// Whether a session is running in this state
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::CountingTotal | SessionState::Fetching)
    }
}

/// Snapshot published after every state change and every attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalProgress {
    pub state: SessionState,
    /// Slots requested so far
    pub attempted: u32,
    /// Slots the session will request
    pub total: u32,
    pub success_count: u32,
    pub fail_count: u32,
}

impl RetrievalProgress {
    /// Completed share of the session in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.attempted) / f64::from(self.total)
        }
    }

    /// Completed share as a whole percentage (rounded down)
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            (u64::from(self.attempted) * 100 / u64::from(self.total)) as u32
        }
    }
}

/// Counters of a finished or cancelled session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalSummary {
    pub success_count: u32,
    pub fail_count: u32,
    pub total: u32,
    /// Slots that failed, in request order (descending)
    pub failed_indices: Vec<u32>,
}

impl RetrievalSummary {
    /// Slots actually requested
    pub fn attempted(&self) -> u32 {
        self.success_count + self.fail_count
    }

    /// Every slot was fetched and decoded
    pub fn is_full_success(&self) -> bool {
        self.total > 0 && self.success_count == self.total
    }

    /// Some, but not all, slots were fetched
    pub fn is_partial(&self) -> bool {
        self.success_count > 0 && self.success_count < self.total
    }
}

/// Result of one bulk retrieval session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RetrievalOutcome {
    /// Count was zero or unavailable; nothing was fetched
    NoRecords,
    /// All slots attempted
    Completed(RetrievalSummary),
    /// Cancelled before all slots were attempted; fetched records are kept
    Cancelled(RetrievalSummary),
}

impl RetrievalOutcome {
    /// Summary of the attempted slots, if any were attempted
    pub fn summary(&self) -> Option<&RetrievalSummary> {
        match self {
            RetrievalOutcome::NoRecords => None,
            RetrievalOutcome::Completed(summary) | RetrievalOutcome::Cancelled(summary) => {
                Some(summary)
            }
        }
    }

    /// Terminal session state for this outcome
    pub fn state(&self) -> SessionState {
        match self {
            RetrievalOutcome::NoRecords => SessionState::NoRecords,
            RetrievalOutcome::Completed(_) => SessionState::Completed,
            RetrievalOutcome::Cancelled(_) => SessionState::Cancelled,
        }
    }
}
