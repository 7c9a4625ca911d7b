//! Action dispatcher — applies one batch of player actions in order.
//!
//! RULES:
//!   - Actions are processed strictly in input order.
//!   - A handler never fails. Missing prerequisites yield
//!     `ActionOutcome::Skipped` and the batch continues.
//!   - A skipped action draws nothing from the RNG.
//!   - PRNG draw order inside a handler is part of the wire contract:
//!     id first (if any), then the pseudo-timestamp.

use crate::{
    action::{ActionKind, PlayerAction},
    clock::format_millis,
    config::EngineConfig,
    debate::{Debate, Speech},
    outcome::{ActionOutcome, SkipReason},
    proposal::{Proposal, DEFAULT_TITLE},
    rng::{make_id, Mulberry32},
    state::{GameStateSnapshot, Vote},
    types::EpochMillis,
};

const UNKNOWN_PROPOSER: &str = "unknown";

/// Mutable context for one batch: the working copy, the seeded RNG,
/// and the 1-based action counter behind pseudo-timestamps.
pub struct Dispatcher<'a> {
    state: &'a mut GameStateSnapshot,
    rng: &'a mut Mulberry32,
    config: &'a EngineConfig,
    counter: i64,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        state: &'a mut GameStateSnapshot,
        rng: &'a mut Mulberry32,
        config: &'a EngineConfig,
    ) -> Self {
        Self { state, rng, config, counter: 0 }
    }

    /// Apply every action in order. One outcome per action.
    pub fn run(&mut self, actions: &[PlayerAction]) -> Vec<ActionOutcome> {
        actions.iter().map(|action| self.dispatch(action)).collect()
    }

    pub fn dispatch(&mut self, action: &PlayerAction) -> ActionOutcome {
        self.counter += 1;
        let result = match action.kind() {
            ActionKind::Propose { title, description, proposer_id } => {
                self.propose(action, title, description, proposer_id)
            }
            ActionKind::StartDebate { proposal_id, speaking_order } => {
                self.start_debate(proposal_id, speaking_order)
            }
            ActionKind::Speak { debate_id, speaker_id, content } => {
                self.speak(action, debate_id, speaker_id, content)
            }
            ActionKind::Vote { proposal_id, player_id, choice } => {
                self.vote(action, proposal_id, player_id, choice)
            }
            ActionKind::AdvanceTurn => self.advance_turn(),
            ActionKind::Unknown => Err(SkipReason::UnknownActionType),
        };

        match result {
            Ok(()) => {
                log::debug!("action #{} '{}' applied", self.counter, action.action_type);
                ActionOutcome::applied(&action.action_type)
            }
            Err(reason) => {
                log::trace!(
                    "action #{} '{}' skipped: {:?}",
                    self.counter,
                    action.action_type,
                    reason
                );
                ActionOutcome::skipped(&action.action_type, reason)
            }
        }
    }

    /// `counter * 1000 + [0, 1000)` milliseconds, rendered as ISO 8601.
    fn pseudo_timestamp(&mut self) -> String {
        let jitter = EpochMillis::from(self.rng.next_below(1000));
        format_millis(self.counter * 1000 + jitter)
    }

    fn propose(
        &mut self,
        action: &PlayerAction,
        title: Option<String>,
        description: Option<String>,
        proposer_id: Option<String>,
    ) -> Result<(), SkipReason> {
        let id = make_id("proposal", self.rng);
        let created_at = self.pseudo_timestamp();
        let proposer_id = proposer_id
            .or_else(|| action.actor().map(str::to_string))
            .unwrap_or_else(|| UNKNOWN_PROPOSER.to_string());

        self.state.proposals.push(Proposal::new(
            id,
            title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description.unwrap_or_default(),
            proposer_id,
            created_at,
        ));
        Ok(())
    }

    fn start_debate(
        &mut self,
        proposal_id: Option<String>,
        speaking_order: Option<Vec<String>>,
    ) -> Result<(), SkipReason> {
        let proposal_id = proposal_id.ok_or_else(|| SkipReason::missing("proposalId"))?;
        self.state
            .proposal(&proposal_id)
            .ok_or_else(|| SkipReason::ProposalNotFound { proposal_id: proposal_id.clone() })?
            .check_can_debate()?;

        let debate_id = make_id("debate", self.rng);
        let started_at = self.pseudo_timestamp();
        let speaking_order = speaking_order.unwrap_or_else(|| self.state.player_ids());

        self.state.debates.push(Debate::open(
            debate_id.clone(),
            proposal_id.clone(),
            speaking_order,
            self.config.debate.speaker_time_limit_ms,
            started_at,
        ));
        if let Some(proposal) = self.state.proposal_mut(&proposal_id) {
            proposal.begin_debate(debate_id)?;
        }
        Ok(())
    }

    fn speak(
        &mut self,
        action: &PlayerAction,
        debate_id: Option<String>,
        speaker_id: Option<String>,
        content: Option<String>,
    ) -> Result<(), SkipReason> {
        let debate_id = debate_id.ok_or_else(|| SkipReason::missing("debateId"))?;
        let debate = self
            .state
            .debate(&debate_id)
            .ok_or_else(|| SkipReason::DebateNotFound { debate_id: debate_id.clone() })?;
        if !debate.is_active() {
            return Err(SkipReason::DebateNotActive { debate_id });
        }
        let expected = debate.current_speaker().cloned();

        let speech_id = make_id("speech", self.rng);
        let timestamp = self.pseudo_timestamp();
        let speaker_id = speaker_id
            .or_else(|| action.actor().map(str::to_string))
            .unwrap_or_default();
        // Turn order is advisory: an out-of-turn speech still counts.
        if expected.as_ref().is_some_and(|e| *e != speaker_id) {
            log::trace!("debate {debate_id}: {speaker_id} spoke out of turn");
        }

        self.state.speeches.push(Speech {
            id: speech_id,
            debate_id: debate_id.clone(),
            speaker_id,
            content: content.unwrap_or_default(),
            timestamp,
        });

        if let Some(debate) = self.state.debate_mut(&debate_id) {
            if debate.advance_speaker() {
                log::debug!("debate {debate_id} completed");
            }
        }
        Ok(())
    }

    fn vote(
        &mut self,
        action: &PlayerAction,
        proposal_id: Option<String>,
        player_id: Option<String>,
        choice: Option<String>,
    ) -> Result<(), SkipReason> {
        let proposal_id = proposal_id.ok_or_else(|| SkipReason::missing("proposalId"))?;
        let player_id = player_id
            .or_else(|| action.actor().map(str::to_string))
            .ok_or_else(|| SkipReason::missing("playerId"))?;
        let choice = choice.ok_or_else(|| SkipReason::missing("choice"))?;
        if self.state.proposal(&proposal_id).is_none() {
            return Err(SkipReason::ProposalNotFound { proposal_id });
        }

        // No deduplication: a second vote by the same player is recorded
        // and counted again at resolution.
        let timestamp = self.pseudo_timestamp();
        self.state.votes.push(Vote { player_id, proposal_id, choice, timestamp });
        Ok(())
    }

    fn advance_turn(&mut self) -> Result<(), SkipReason> {
        let GameStateSnapshot { proposals, debates, turn, .. } = &mut *self.state;

        for proposal in proposals.iter_mut() {
            let debate_done = proposal
                .debate_id
                .as_deref()
                .and_then(|id| debates.iter().find(|d| d.id == id))
                .is_some_and(Debate::is_completed);
            if debate_done && proposal.open_voting() {
                log::debug!("proposal {} moved to voting", proposal.id);
            }
        }

        turn.turn_number = turn.turn_number.saturating_add(1);
        Ok(())
    }
}
