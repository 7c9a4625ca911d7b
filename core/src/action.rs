use crate::{
    lenient::{object_or_empty, string_or_empty},
    types::PlayerId,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const PROPOSE: &str = "propose";
pub const START_DEBATE: &str = "start_debate";
pub const SPEAK: &str = "speak";
pub const VOTE: &str = "vote";
pub const ADVANCE_TURN: &str = "advance_turn";

/// A player action as submitted by clients.
///
/// `type` is an open string: unknown values deserialize fine and are
/// ignored by the dispatcher. Use `kind()` for the typed view.
///
/// Decoding never fails on a JSON object: a missing or non-string
/// `type`/`playerId` becomes `""`, a non-object payload becomes empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAction {
    #[serde(rename = "type", default, deserialize_with = "string_or_empty")]
    pub action_type: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub player_id: PlayerId,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub payload: Map<String, Value>,
}

/// Typed view of a `PlayerAction`. Payload fields that are absent,
/// empty, or of the wrong JSON type come through as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Propose {
        title: Option<String>,
        description: Option<String>,
        proposer_id: Option<String>,
    },
    StartDebate {
        proposal_id: Option<String>,
        speaking_order: Option<Vec<PlayerId>>,
    },
    Speak {
        debate_id: Option<String>,
        speaker_id: Option<String>,
        content: Option<String>,
    },
    Vote {
        proposal_id: Option<String>,
        player_id: Option<String>,
        choice: Option<String>,
    },
    AdvanceTurn,
    Unknown,
}

impl PlayerAction {
    pub fn new(action_type: &str, player_id: &str, payload: Value) -> Self {
        let payload = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            action_type: action_type.to_string(),
            player_id: player_id.to_string(),
            payload,
        }
    }

    pub fn propose(player_id: &str, title: &str, description: &str) -> Self {
        Self::new(PROPOSE, player_id, json!({ "title": title, "description": description }))
    }

    pub fn start_debate(player_id: &str, proposal_id: &str, speaking_order: Option<&[&str]>) -> Self {
        let mut payload = json!({ "proposalId": proposal_id });
        if let Some(order) = speaking_order {
            payload["speakingOrder"] = json!(order);
        }
        Self::new(START_DEBATE, player_id, payload)
    }

    pub fn speak(player_id: &str, debate_id: &str, content: &str) -> Self {
        Self::new(
            SPEAK,
            player_id,
            json!({ "debateId": debate_id, "speakerId": player_id, "content": content }),
        )
    }

    pub fn vote(player_id: &str, proposal_id: &str, choice: &str) -> Self {
        Self::new(
            VOTE,
            player_id,
            json!({ "proposalId": proposal_id, "playerId": player_id, "choice": choice }),
        )
    }

    pub fn advance_turn(player_id: &str) -> Self {
        Self::new(ADVANCE_TURN, player_id, Value::Null)
    }

    /// Acting player, if one was supplied.
    pub fn actor(&self) -> Option<&str> {
        non_empty(&self.player_id)
    }

    pub fn kind(&self) -> ActionKind {
        match self.action_type.as_str() {
            PROPOSE => ActionKind::Propose {
                title:       self.str_field("title"),
                description: self.str_field("description"),
                proposer_id: self.str_field("proposerId"),
            },
            START_DEBATE => ActionKind::StartDebate {
                proposal_id:    self.str_field("proposalId"),
                speaking_order: self.list_field("speakingOrder"),
            },
            SPEAK => ActionKind::Speak {
                debate_id:  self.str_field("debateId"),
                speaker_id: self.str_field("speakerId"),
                content:    self.str_field("content"),
            },
            VOTE => ActionKind::Vote {
                proposal_id: self.str_field("proposalId"),
                player_id:   self.str_field("playerId"),
                choice:      self.str_field("choice"),
            },
            ADVANCE_TURN => ActionKind::AdvanceTurn,
            _ => ActionKind::Unknown,
        }
    }

    fn str_field(&self, key: &str) -> Option<String> {
        self.payload
            .get(key)
            .and_then(Value::as_str)
            .and_then(non_empty)
            .map(str::to_string)
    }

    fn list_field(&self, key: &str) -> Option<Vec<String>> {
        let items = self.payload.get(key)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        )
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_format() {
        let action: PlayerAction = serde_json::from_str(
            r#"{"type":"propose","playerId":"P1","payload":{"title":"Tax Reform"}}"#,
        )
        .expect("parse");
        assert_eq!(
            action.kind(),
            ActionKind::Propose {
                title: Some("Tax Reform".into()),
                description: None,
                proposer_id: None,
            }
        );
        assert_eq!(action.actor(), Some("P1"));
    }

    #[test]
    fn missing_or_null_payload_is_empty() {
        let a: PlayerAction = serde_json::from_str(r#"{"type":"advance_turn"}"#).expect("parse");
        assert!(a.payload.is_empty());
        assert_eq!(a.actor(), None);
        let b: PlayerAction =
            serde_json::from_str(r#"{"type":"advance_turn","playerId":"p1","payload":null}"#)
                .expect("parse");
        assert!(b.payload.is_empty());
        assert_eq!(b.kind(), ActionKind::AdvanceTurn);
    }

    #[test]
    fn malformed_envelope_decays_instead_of_failing() {
        let a: PlayerAction =
            serde_json::from_str(r#"{"type":"propose","playerId":null,"payload":"oops"}"#)
                .expect("parse");
        assert_eq!(a.player_id, "");
        assert!(a.payload.is_empty());
        assert_eq!(a.actor(), None);

        let b: PlayerAction = serde_json::from_str(r#"{"playerId":3,"payload":[1]}"#).expect("parse");
        assert_eq!(b.action_type, "");
        assert_eq!(b.kind(), ActionKind::Unknown);
    }

    #[test]
    fn unknown_types_are_representable() {
        let a: PlayerAction =
            serde_json::from_str(r#"{"type":"comment","playerId":"p1","payload":{"text":"hi"}}"#)
                .expect("parse");
        assert_eq!(a.kind(), ActionKind::Unknown);
    }

    #[test]
    fn wrongly_typed_fields_count_as_missing() {
        let a = PlayerAction::new(
            VOTE,
            "p1",
            json!({ "proposalId": 42, "choice": "", "playerId": "p1" }),
        );
        assert_eq!(
            a.kind(),
            ActionKind::Vote { proposal_id: None, player_id: Some("p1".into()), choice: None }
        );
    }

    #[test]
    fn speaking_order_drops_non_string_entries() {
        let a = PlayerAction::new(
            START_DEBATE,
            "p1",
            json!({ "proposalId": "proposal-1", "speakingOrder": ["p1", 7, "p2"] }),
        );
        match a.kind() {
            ActionKind::StartDebate { speaking_order, .. } => {
                assert_eq!(speaking_order, Some(vec!["p1".to_string(), "p2".to_string()]));
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }
}
