//! End-to-end scenarios: propose, debate, vote, resolve.

use sphere_core::{
    clock::FixedClock,
    config::EngineConfig,
    debate::DebateStatus,
    engine::GameEngine,
    proposal::ProposalStatus,
    rng::{make_id, Mulberry32},
    GameStateSnapshot, PlayerAction,
};
use std::sync::Arc;

fn engine() -> GameEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    GameEngine::new(EngineConfig::default(), Arc::new(FixedClock::new(0)))
}

/// Ids the engine will generate for seed 1 when the batch opens with
/// propose then start_debate: (proposal id, debate id).
fn seed_one_ids() -> (String, String) {
    let mut rng = Mulberry32::new(1);
    let proposal = make_id("proposal", &mut rng);
    rng.next_f64(); // createdAt jitter
    let debate = make_id("debate", &mut rng);
    (proposal, debate)
}

/// Scenario A: one player proposes "Tax Reform".
#[test]
fn scenario_a_single_proposal() {
    let state = GameStateSnapshot::new("g1", "Scenario A").with_players(["P1"]);
    let actions = [serde_json::from_str::<PlayerAction>(
        r#"{"type":"propose","playerId":"P1","payload":{"title":"Tax Reform"}}"#,
    )
    .expect("parse action")];

    let next = engine().advance(&state, &actions, 1);

    assert_eq!(next.proposals.len(), 1);
    let p = &next.proposals[0];
    assert_eq!(p.status, ProposalStatus::Proposed);
    assert_eq!(p.title, "Tax Reform");
    assert_eq!(p.proposer_id, "P1");
    assert_eq!(p.id, "proposal-adcdck");
    assert_eq!(p.created_at, "1970-01-01T00:00:01.002Z");

    let json: serde_json::Value = serde_json::to_value(&next).expect("serialize");
    assert_eq!(json["proposals"][0]["status"], "proposed");
}

/// Scenario B, first half: a completed debate does not move the
/// proposal on by itself.
#[test]
fn scenario_b_debate_completes_but_proposal_waits() {
    let start = GameStateSnapshot::new("g1", "Scenario B").with_players(["P1"]);
    let mut state = engine().advance(&start, &[PlayerAction::propose("P1", "Tax Reform", "")], 1);
    state.players.push(sphere_core::state::Player::new("P2"));
    let pid = state.proposals[0].id.clone();

    // The debate id depends on the seed of this call.
    let mut rng = Mulberry32::new(2);
    let did = make_id("debate", &mut rng);

    let next = engine().advance(
        &state,
        &[
            PlayerAction::start_debate("P1", &pid, Some(&["P1", "P2"][..])),
            PlayerAction::speak("P1", &did, "Lower rates"),
            PlayerAction::speak("P2", &did, "Higher rates"),
        ],
        2,
    );

    assert_eq!(next.debates.len(), 1);
    assert_eq!(next.debates[0].id, did);
    assert_eq!(next.debates[0].status, DebateStatus::Completed);
    assert_eq!(next.proposals[0].status, ProposalStatus::Debate);
    assert_eq!(next.speeches.len(), 2);
}

/// Scenario B, second half: advance_turn opens voting. Run as one
/// batch so the proposal is new and resolution leaves it in Voting.
#[test]
fn scenario_b_advance_turn_opens_voting() {
    let state = GameStateSnapshot::new("g1", "Scenario B").with_players(["P1", "P2"]);
    let (pid, did) = seed_one_ids();

    let next = engine().advance(
        &state,
        &[
            PlayerAction::propose("P1", "Tax Reform", ""),
            PlayerAction::start_debate("P1", &pid, Some(&["P1", "P2"][..])),
            PlayerAction::speak("P1", &did, "Lower rates"),
            PlayerAction::speak("P2", &did, "Higher rates"),
        ],
        1,
    );
    assert_eq!(next.debates[0].status, DebateStatus::Completed);
    assert_eq!(next.proposals[0].status, ProposalStatus::Debate);

    let state = GameStateSnapshot::new("g1", "Scenario B").with_players(["P1", "P2"]);
    let next = engine().advance(
        &state,
        &[
            PlayerAction::propose("P1", "Tax Reform", ""),
            PlayerAction::start_debate("P1", &pid, Some(&["P1", "P2"][..])),
            PlayerAction::speak("P1", &did, "Lower rates"),
            PlayerAction::speak("P2", &did, "Higher rates"),
            PlayerAction::advance_turn("P1"),
        ],
        1,
    );
    assert_eq!(next.proposals[0].status, ProposalStatus::Voting);
    assert_eq!(next.turn.turn_number, 1);
}

/// Scenario C: a pre-existing Voting proposal with a 1–1 tie is
/// rejected on the next call, even with no actions.
#[test]
fn scenario_c_tie_rejects_on_next_call() {
    let state = GameStateSnapshot::new("g1", "Scenario C").with_players(["P1", "P2"]);
    let (pid, did) = seed_one_ids();

    let voting = engine().advance(
        &state,
        &[
            PlayerAction::propose("P1", "Tax Reform", ""),
            PlayerAction::start_debate("P1", &pid, Some(&["P1", "P2"][..])),
            PlayerAction::speak("P1", &did, "Lower rates"),
            PlayerAction::speak("P2", &did, "Higher rates"),
            PlayerAction::advance_turn("P1"),
            PlayerAction::vote("P1", &pid, "for"),
            PlayerAction::vote("P2", &pid, "against"),
        ],
        1,
    );
    assert_eq!(voting.proposals[0].status, ProposalStatus::Voting);
    assert_eq!(voting.votes.len(), 2);

    let (resolved, trace) = engine().advance_traced(&voting, &[], 1);

    assert_eq!(resolved.proposals[0].status, ProposalStatus::Rejected);
    assert_eq!(trace.rejected, vec![pid]);
    assert!(trace.enacted.is_empty());
    assert_eq!(resolved.economy, voting.economy);
}

/// A proposal that already existed is resolved in the same call that
/// moves it to Voting, since resolution runs after the whole batch.
#[test]
fn pre_existing_proposal_resolves_in_the_call_that_opens_voting() {
    let state = GameStateSnapshot::new("g1", "Guard").with_players(["P1"]);
    let (pid, did) = seed_one_ids();
    let debated = engine().advance(
        &state,
        &[
            PlayerAction::propose("P1", "Welfare Expansion", ""),
            PlayerAction::start_debate("P1", &pid, None),
            PlayerAction::speak("P1", &did, "Solo"),
        ],
        1,
    );
    assert_eq!(debated.proposals[0].status, ProposalStatus::Debate);

    let next = engine().advance(
        &debated,
        &[PlayerAction::advance_turn("P1"), PlayerAction::vote("P1", &pid, "for")],
        3,
    );
    assert_eq!(next.proposals[0].status, ProposalStatus::Enacted);
    assert_eq!(next.economy.treasury, 8_000.0);
}
