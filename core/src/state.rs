//! Game state snapshot — the value `advance` consumes and produces.
//!
//! RULE: Every container is always present. Missing or `null` JSON
//! fields deserialize to empty sequences / defaults here, so no handler ever
//! needs a fallback at the use site.
//!
//! Fields the engine does not interpret (moderation flags, registry
//! bookkeeping, client extras) round-trip verbatim through `extra`.

use crate::{
    debate::{Debate, Speech},
    economy::Economy,
    lenient::null_as_default,
    proposal::Proposal,
    types::{EntityId, PlayerId},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

pub const CHOICE_FOR: &str = "for";
pub const CHOICE_AGAINST: &str = "against";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<Player>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub proposals: Vec<Proposal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub votes: Vec<Vote>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub debates: Vec<Debate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub speeches: Vec<Speech>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub economy: Economy,
    #[serde(default, deserialize_with = "null_as_default")]
    pub turn: Turn,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderation_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_verification_required: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GameStateSnapshot {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_players<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.players.extend(ids.into_iter().map(Player::new));
        self
    }

    pub fn with_economy(mut self, economy: Economy) -> Self {
        self.economy = economy;
        self
    }

    /// Parse a snapshot from JSON. Missing containers become empty.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Current player ids in roster order.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    pub fn proposal_ids(&self) -> HashSet<EntityId> {
        self.proposals.iter().map(|p| p.id.clone()).collect()
    }

    pub fn proposal(&self, id: &str) -> Option<&Proposal> {
        self.proposals.iter().find(|p| p.id == id)
    }

    pub fn proposal_mut(&mut self, id: &str) -> Option<&mut Proposal> {
        self.proposals.iter_mut().find(|p| p.id == id)
    }

    pub fn debate(&self, id: &str) -> Option<&Debate> {
        self.debates.iter().find(|d| d.id == id)
    }

    pub fn debate_mut(&mut self, id: &str) -> Option<&mut Debate> {
        self.debates.iter_mut().find(|d| d.id == id)
    }

    pub fn votes_for_proposal<'a>(&'a self, proposal_id: &'a str) -> impl Iterator<Item = &'a Vote> {
        self.votes.iter().filter(move |v| v.proposal_id == proposal_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<PlayerRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_rating: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Player {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    Citizen,
    Moderator,
    Observer,
    Ai,
}

/// One player's recorded choice on one proposal. Append-only.
/// Only "for" and "against" are tallied; anything else abstains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub player_id: PlayerId,
    pub proposal_id: EntityId,
    pub choice: String,
    pub timestamp: String,
}

impl Vote {
    pub fn is_for(&self) -> bool {
        self.choice == CHOICE_FOR
    }

    pub fn is_against(&self) -> bool {
        self.choice == CHOICE_AGAINST
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    #[serde(default)]
    pub turn_number: u32,
    /// Owned by the registry. The engine never reads or writes it.
    #[serde(default)]
    pub phase: TurnPhase,
}

impl Default for Turn {
    fn default() -> Self {
        Self { turn_number: 0, phase: TurnPhase::Lobby }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    #[default]
    Lobby,
    Proposal,
    Debate,
    Voting,
    Resolution,
    Recess,
    Enacted,
}
