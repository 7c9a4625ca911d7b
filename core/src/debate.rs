//! Debate coordinator — speaking order and completion.
//!
//! A debate walks its speaking order exactly once. Each recorded speech
//! advances the speaker index; when the index wraps back to 0 the debate
//! is Completed. Completion is purely round-count based: `time_limit`
//! is stored for clients but never enforced here.

use crate::types::{EntityId, PlayerId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebateStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debate {
    pub id: EntityId,
    pub proposal_id: EntityId,
    /// Snapshotted at creation; later roster changes do not affect it.
    #[serde(default)]
    pub speaking_order: Vec<PlayerId>,
    #[serde(default)]
    pub current_speaker_index: usize,
    /// Per-speaker limit in milliseconds.
    #[serde(default)]
    pub time_limit: u64,
    #[serde(default)]
    pub started_at: String,
    pub status: DebateStatus,
}

impl Debate {
    pub fn open(
        id: EntityId,
        proposal_id: EntityId,
        speaking_order: Vec<PlayerId>,
        time_limit: u64,
        started_at: String,
    ) -> Self {
        Self {
            id,
            proposal_id,
            speaking_order,
            current_speaker_index: 0,
            time_limit,
            started_at,
            status: DebateStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == DebateStatus::Active
    }

    pub fn is_completed(&self) -> bool {
        self.status == DebateStatus::Completed
    }

    /// Whose turn it is, if the order is non-empty.
    pub fn current_speaker(&self) -> Option<&PlayerId> {
        self.speaking_order.get(self.current_speaker_index)
    }

    /// Advance past the current speaker. Returns true if this call
    /// completed the debate.
    ///
    /// An empty speaking order never completes: the index stays at 0.
    pub fn advance_speaker(&mut self) -> bool {
        let len = self.speaking_order.len();
        if len == 0 {
            return false;
        }
        // Reduce first: the index comes from client JSON and may be out of range.
        self.current_speaker_index = (self.current_speaker_index % len + 1) % len;
        if self.current_speaker_index == 0 && self.is_active() {
            self.status = DebateStatus::Completed;
            return true;
        }
        false
    }
}

/// One recorded contribution within a debate. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speech {
    pub id: EntityId,
    pub debate_id: EntityId,
    #[serde(default)]
    pub speaker_id: PlayerId,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
}
