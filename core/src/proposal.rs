//! Proposal lifecycle — the phase state machine for one proposal.
//!
//!   Proposed ──start_debate──▶ Debate ──advance_turn──▶ Voting ──tally──▶ Enacted
//!                                       (debate done)                 └─▶ Rejected
//!
//! RULE: Only the engine moves a proposal between phases, and only
//! forward. Enacted and Rejected are terminal.

use crate::{outcome::SkipReason, types::EntityId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_TITLE: &str = "Untitled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Proposed,
    Debate,
    Voting,
    Enacted,
    Rejected,
}

impl ProposalStatus {
    /// Whether `self -> next` is a legal single step.
    pub fn can_transition_to(&self, next: ProposalStatus) -> bool {
        matches!(
            (self, next),
            (Self::Proposed, Self::Debate)
                | (Self::Debate, Self::Voting)
                | (Self::Voting, Self::Enacted)
                | (Self::Voting, Self::Rejected)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Debate   => "debate",
            Self::Voting   => "voting",
            Self::Enacted  => "enacted",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: EntityId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub proposer_id: String,
    #[serde(default)]
    pub created_at: String,
    pub status: ProposalStatus,
    #[serde(default)]
    pub debate_id: Option<EntityId>,
    /// Moderation and review fields attached by other services.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Proposal {
    pub fn new(
        id: EntityId,
        title: String,
        description: String,
        proposer_id: String,
        created_at: String,
    ) -> Self {
        Self {
            id,
            title,
            description,
            proposer_id,
            created_at,
            status: ProposalStatus::Proposed,
            debate_id: None,
            extra: Map::new(),
        }
    }

    /// Check that a debate may be opened, without changing anything.
    pub fn check_can_debate(&self) -> Result<(), SkipReason> {
        if self.status == ProposalStatus::Proposed {
            Ok(())
        } else {
            Err(SkipReason::ProposalNotProposed { proposal_id: self.id.clone() })
        }
    }

    /// Proposed → Debate, linking the debate record.
    pub fn begin_debate(&mut self, debate_id: EntityId) -> Result<(), SkipReason> {
        self.check_can_debate()?;
        self.status = ProposalStatus::Debate;
        self.debate_id = Some(debate_id);
        Ok(())
    }

    /// Debate → Voting. Returns false if the proposal is not in debate.
    pub fn open_voting(&mut self) -> bool {
        if self.status != ProposalStatus::Debate {
            return false;
        }
        self.status = ProposalStatus::Voting;
        true
    }

    /// Voting → Enacted/Rejected. Returns false if not in voting
    /// or `outcome` is not terminal.
    pub fn resolve(&mut self, outcome: ProposalStatus) -> bool {
        if !self.status.can_transition_to(outcome) {
            return false;
        }
        self.status = outcome;
        true
    }
}
