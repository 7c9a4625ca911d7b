//! The state advancer — the heart of the game engine.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Clone the input snapshot into a working copy.
//!   2. Record the ids of proposals that exist before the batch.
//!   3. Dispatch every action in order (dispatch.rs).
//!   4. Resolve pre-existing Voting proposals (resolution.rs).
//!   5. Step the economy if anything was enacted (economy.rs).
//!   6. Stamp `updatedAt` from the time source.
//!
//! RULES:
//!   - The input snapshot is never mutated.
//!   - All randomness flows through one Mulberry32 seeded per call.
//!   - The time source is the only non-deterministic input.

use crate::{
    action::PlayerAction,
    clock::{SystemClock, TimeSource},
    config::EngineConfig,
    dispatch::Dispatcher,
    economy::EconomySimulator,
    outcome::AdvanceTrace,
    proposal::Proposal,
    resolution::resolve_voting,
    rng::Mulberry32,
    state::GameStateSnapshot,
};
use std::sync::Arc;

pub struct GameEngine {
    config: EngineConfig,
    clock: Arc<dyn TimeSource>,
}

impl GameEngine {
    pub fn new(config: EngineConfig, clock: Arc<dyn TimeSource>) -> Self {
        Self { config, clock }
    }

    /// Built-in config, real wall clock.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default(), Arc::new(SystemClock))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn TimeSource> {
        &self.clock
    }

    /// Apply `actions` to a copy of `state` and return the copy.
    /// Individual actions never cause an error; invalid ones are skipped.
    pub fn advance(
        &self,
        state: &GameStateSnapshot,
        actions: &[PlayerAction],
        seed: u32,
    ) -> GameStateSnapshot {
        self.advance_traced(state, actions, seed).0
    }

    /// Like `advance`, also returning what happened to each action.
    pub fn advance_traced(
        &self,
        state: &GameStateSnapshot,
        actions: &[PlayerAction],
        seed: u32,
    ) -> (GameStateSnapshot, AdvanceTrace) {
        // A zero seed behaves like 1.
        let seed = if seed == 0 { 1 } else { seed };
        let mut rng = Mulberry32::new(seed);
        let mut next = state.clone();
        let pre_existing = state.proposal_ids();

        let outcomes = Dispatcher::new(&mut next, &mut rng, &self.config).run(actions);
        let resolution = resolve_voting(&mut next, &pre_existing);

        let enacted: Vec<&Proposal> = next
            .proposals
            .iter()
            .filter(|p| resolution.enacted.contains(&p.id))
            .collect();
        let stepped = EconomySimulator::new(&self.config.economy).step(&next.economy, &enacted);
        let economy_updated = stepped.is_some();
        if let Some(economy) = stepped {
            next.economy = economy;
        }

        next.updated_at = Some(self.clock.now_iso());

        let trace = AdvanceTrace {
            seed,
            outcomes,
            enacted: resolution.enacted,
            rejected: resolution.rejected,
            economy_updated,
        };
        log::debug!(
            "advance game={} seed={seed}: {}/{} actions applied, {} enacted, {} rejected",
            next.id,
            trace.applied_count(),
            actions.len(),
            trace.enacted.len(),
            trace.rejected.len()
        );
        (next, trace)
    }
}

impl Default for GameEngine {
    fn default() -> Self { Self::with_defaults() }
}

/// Advance with the built-in config and the real wall clock.
pub fn advance(state: &GameStateSnapshot, actions: &[PlayerAction], seed: u32) -> GameStateSnapshot {
    GameEngine::with_defaults().advance(state, actions, seed)
}
