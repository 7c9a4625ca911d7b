//! Per-action outcomes and the optional diagnostics trace.
//!
//! The public `advance` contract is silent: skipped actions leave no
//! trace in the returned snapshot. `advance_traced` exposes the same
//! outcomes so tests and operators can see what was skipped and why.

use crate::types::EntityId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Applied { action_type: String },
    Skipped { action_type: String, reason: SkipReason },
}

impl ActionOutcome {
    pub fn applied(action_type: &str) -> Self {
        Self::Applied { action_type: action_type.to_string() }
    }

    pub fn skipped(action_type: &str, reason: SkipReason) -> Self {
        Self::Skipped { action_type: action_type.to_string(), reason }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Skipped { reason, .. } => Some(reason),
            Self::Applied { .. } => None,
        }
    }
}

/// Why a handler declined an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    UnknownActionType,
    MissingField { field: String },
    ProposalNotFound { proposal_id: EntityId },
    ProposalNotProposed { proposal_id: EntityId },
    DebateNotFound { debate_id: EntityId },
    DebateNotActive { debate_id: EntityId },
}

impl SkipReason {
    pub fn missing(field: &str) -> Self {
        Self::MissingField { field: field.to_string() }
    }
}

/// Everything `advance_traced` observed during one batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvanceTrace {
    pub seed: u32,
    /// One entry per input action, in input order.
    pub outcomes: Vec<ActionOutcome>,
    pub enacted: Vec<EntityId>,
    pub rejected: Vec<EntityId>,
    pub economy_updated: bool,
}

impl AdvanceTrace {
    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = (usize, &SkipReason)> {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.skip_reason().map(|r| (i, r)))
    }
}
