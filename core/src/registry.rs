//! In-memory game registry — owner of the authoritative snapshots.
//!
//! RULES:
//!   - Each game lives behind its own Mutex. Every read-modify-write of
//!     a game (join, start, process_action) holds that lock for the
//!     whole cycle, so concurrent advances on one game serialize and
//!     never lose updates.
//!   - The game map sits behind an RwLock and is write-locked only to
//!     insert or delete a game.
//!   - The engine is called with the lock held; it does no I/O.

use crate::{
    action::{PlayerAction, PROPOSE, VOTE},
    engine::GameEngine,
    error::{EngineError, EngineResult},
    outcome::AdvanceTrace,
    state::{GameStateSnapshot, Player, TurnPhase},
    types::{GameId, PlayerId},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    Active,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub max_players: usize,
    pub turn_duration_secs: u64,
    pub debate_duration_secs: u64,
}

/// A game as the registry holds it: the engine snapshot plus
/// registry-only bookkeeping the engine never sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub status: GameStatus,
    pub settings: GameSettings,
    pub state: GameStateSnapshot,
}

impl GameRecord {
    pub fn id(&self) -> &str {
        &self.state.id
    }

    pub fn creator_id(&self) -> Option<&str> {
        self.state.players.first().map(|p| p.id.as_str())
    }
}

type GameSlot = Arc<Mutex<GameRecord>>;

pub struct GameRegistry {
    engine: GameEngine,
    games: RwLock<HashMap<GameId, GameSlot>>,
    player_games: RwLock<HashMap<PlayerId, BTreeSet<GameId>>>,
    seed_sequence: AtomicU32,
}

impl GameRegistry {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine,
            games: RwLock::new(HashMap::new()),
            player_games: RwLock::new(HashMap::new()),
            seed_sequence: AtomicU32::new(0),
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    // ── Lifecycle ──────────────────────────────────────────────

    pub fn create_game(
        &self,
        creator_id: &str,
        display_name: &str,
        name: &str,
    ) -> EngineResult<GameRecord> {
        let defaults = &self.engine.config().new_game;
        let now = self.engine.clock().now_iso();
        let game_id = format!("game-{}", uuid::Uuid::new_v4());

        let mut state = GameStateSnapshot::new(
            game_id.clone(),
            if name.is_empty() { defaults.default_name.as_str() } else { name },
        )
        .with_economy(defaults.starting_economy.clone());
        state.players.push(self.new_player(creator_id, display_name, &now));
        state.turn.turn_number = defaults.starting_turn;
        state.turn.phase = TurnPhase::Lobby;
        state.created_at = Some(now.clone());
        state.updated_at = Some(now);

        let record = GameRecord {
            status: GameStatus::Waiting,
            settings: GameSettings {
                max_players:          defaults.max_players,
                turn_duration_secs:   defaults.turn_duration_secs,
                debate_duration_secs: defaults.debate_duration_secs,
            },
            state,
        };

        self.games
            .write()
            .map_err(|_| EngineError::LockPoisoned { game_id: game_id.clone() })?
            .insert(game_id.clone(), Arc::new(Mutex::new(record.clone())));
        self.link_player(creator_id, &game_id)?;

        log::info!("game {game_id} created by {creator_id}");
        Ok(record)
    }

    pub fn join_game(
        &self,
        game_id: &str,
        player_id: &str,
        display_name: &str,
    ) -> EngineResult<GameRecord> {
        let slot = self.slot(game_id)?;
        let mut game = lock(&slot, game_id)?;

        if game.status == GameStatus::Finished {
            return Err(EngineError::GameFinished { game_id: game_id.to_string() });
        }
        if game.state.players.len() >= game.settings.max_players {
            return Err(EngineError::GameFull {
                game_id: game_id.to_string(),
                max_players: game.settings.max_players,
            });
        }
        if game.state.has_player(player_id) {
            return Err(EngineError::AlreadyJoined {
                game_id: game_id.to_string(),
                player_id: player_id.to_string(),
            });
        }

        let now = self.engine.clock().now_iso();
        game.state.players.push(self.new_player(player_id, display_name, &now));
        game.state.updated_at = Some(now);
        let record = game.clone();
        drop(game);

        self.link_player(player_id, game_id)?;
        log::info!("player {player_id} joined game {game_id}");
        Ok(record)
    }

    /// Waiting → Active. Only the creator may start, with enough players.
    pub fn start_game(&self, game_id: &str, player_id: &str) -> EngineResult<GameRecord> {
        let slot = self.slot(game_id)?;
        let mut game = lock(&slot, game_id)?;

        if game.creator_id() != Some(player_id) {
            return Err(EngineError::NotCreator { game_id: game_id.to_string() });
        }
        if game.status != GameStatus::Waiting {
            return Err(EngineError::GameAlreadyStarted { game_id: game_id.to_string() });
        }
        let required = self.engine.config().new_game.min_players_to_start;
        if game.state.players.len() < required {
            return Err(EngineError::NotEnoughPlayers { game_id: game_id.to_string(), required });
        }

        game.status = GameStatus::Active;
        game.state.turn.phase = TurnPhase::Debate;
        game.state.updated_at = Some(self.engine.clock().now_iso());
        log::info!("game {game_id} started");
        Ok(game.clone())
    }

    /// Move a game to Finished. Further actions and joins are refused.
    pub fn finish_game(&self, game_id: &str) -> EngineResult<GameRecord> {
        let slot = self.slot(game_id)?;
        let mut game = lock(&slot, game_id)?;
        game.status = GameStatus::Finished;
        log::info!("game {game_id} finished");
        Ok(game.clone())
    }

    /// Remove a game entirely. Only the creator may delete; every
    /// member's game index is unlinked.
    pub fn delete_game(&self, game_id: &str, player_id: &str) -> EngineResult<()> {
        let slot = self.slot(game_id)?;
        let members = {
            let game = lock(&slot, game_id)?;
            if game.creator_id() != Some(player_id) {
                return Err(EngineError::NotCreator { game_id: game_id.to_string() });
            }
            game.state.player_ids()
        };

        self.games
            .write()
            .map_err(|_| EngineError::LockPoisoned { game_id: game_id.to_string() })?
            .remove(game_id);

        let mut index = self
            .player_games
            .write()
            .map_err(|_| EngineError::LockPoisoned { game_id: game_id.to_string() })?;
        for member in &members {
            if let Some(set) = index.get_mut(member) {
                set.remove(game_id);
                if set.is_empty() {
                    index.remove(member);
                }
            }
        }

        log::info!("game {game_id} deleted by {player_id}");
        Ok(())
    }

    // ── Actions ────────────────────────────────────────────────

    pub fn process_action(&self, game_id: &str, action: PlayerAction) -> EngineResult<GameRecord> {
        self.process_batch(game_id, vec![action]).map(|(record, _)| record)
    }

    /// Run one batch through the engine under the game's lock and merge
    /// the result back into the authoritative record.
    pub fn process_batch(
        &self,
        game_id: &str,
        actions: Vec<PlayerAction>,
    ) -> EngineResult<(GameRecord, AdvanceTrace)> {
        let slot = self.slot(game_id)?;
        let mut game = lock(&slot, game_id)?;

        if !matches!(game.status, GameStatus::Waiting | GameStatus::Active) {
            return Err(EngineError::GameNotActive { game_id: game_id.to_string() });
        }
        if let Some(outsider) = actions.iter().find(|a| !game.state.has_player(&a.player_id)) {
            log::warn!("rejected action from {} in game {game_id}", outsider.player_id);
            return Err(EngineError::PlayerNotInGame {
                game_id: game_id.to_string(),
                player_id: outsider.player_id.clone(),
            });
        }

        let actions: Vec<PlayerAction> = actions.into_iter().map(enrich).collect();
        let seed = self.next_seed();
        let (next, trace) = self.engine.advance_traced(&game.state, &actions, seed);

        let state = &mut game.state;
        state.proposals = next.proposals;
        state.votes = next.votes;
        state.debates = next.debates;
        state.speeches = next.speeches;
        state.economy = next.economy;
        state.turn.turn_number = next.turn.turn_number;
        state.updated_at = next.updated_at;

        Ok((game.clone(), trace))
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn get_game(&self, game_id: &str) -> EngineResult<GameRecord> {
        let slot = self.slot(game_id)?;
        let game = lock(&slot, game_id)?;
        Ok(game.clone())
    }

    /// All games, oldest first.
    pub fn list_games(&self) -> EngineResult<Vec<GameRecord>> {
        let slots: Vec<(GameId, GameSlot)> = self
            .games
            .read()
            .map_err(|_| EngineError::LockPoisoned { game_id: "*".into() })?
            .iter()
            .map(|(id, slot)| (id.clone(), Arc::clone(slot)))
            .collect();

        let mut records = slots
            .iter()
            .map(|(id, slot)| lock(slot, id).map(|g| g.clone()))
            .collect::<EngineResult<Vec<_>>>()?;
        records.sort_by(|a, b| {
            a.state.created_at.cmp(&b.state.created_at).then_with(|| a.id().cmp(b.id()))
        });
        Ok(records)
    }

    pub fn player_games(&self, player_id: &str) -> EngineResult<Vec<GameRecord>> {
        let ids: Vec<GameId> = self
            .player_games
            .read()
            .map_err(|_| EngineError::LockPoisoned { game_id: "*".into() })?
            .get(player_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        ids.iter().map(|id| self.get_game(id)).collect()
    }

    // ── Internals ──────────────────────────────────────────────

    fn slot(&self, game_id: &str) -> EngineResult<GameSlot> {
        self.games
            .read()
            .map_err(|_| EngineError::LockPoisoned { game_id: game_id.to_string() })?
            .get(game_id)
            .cloned()
            .ok_or_else(|| EngineError::GameNotFound { game_id: game_id.to_string() })
    }

    fn link_player(&self, player_id: &str, game_id: &str) -> EngineResult<()> {
        self.player_games
            .write()
            .map_err(|_| EngineError::LockPoisoned { game_id: game_id.to_string() })?
            .entry(player_id.to_string())
            .or_default()
            .insert(game_id.to_string());
        Ok(())
    }

    fn new_player(&self, player_id: &str, display_name: &str, now: &str) -> Player {
        let mut player = Player::new(player_id).with_display_name(display_name);
        player.created_at = Some(now.to_string());
        player
    }

    /// Wall-clock milliseconds truncated to 32 bits, mixed with a
    /// per-registry sequence so two batches in the same millisecond
    /// never share a seed.
    fn next_seed(&self) -> u32 {
        let sequence = self.seed_sequence.fetch_add(1, Ordering::Relaxed);
        (self.engine.clock().now_millis() as u32) ^ sequence.wrapping_mul(0x9E37_79B9)
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new(GameEngine::with_defaults())
    }
}

fn lock<'a>(slot: &'a GameSlot, game_id: &str) -> EngineResult<MutexGuard<'a, GameRecord>> {
    slot.lock()
        .map_err(|_| EngineError::LockPoisoned { game_id: game_id.to_string() })
}

/// Fill implicit identifiers so clients need not repeat themselves:
/// votes default `playerId`, proposals default `proposerId`.
fn enrich(mut action: PlayerAction) -> PlayerAction {
    let key = match action.action_type.as_str() {
        VOTE => "playerId",
        PROPOSE => "proposerId",
        _ => return action,
    };
    let present = action
        .payload
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty());
    if !present {
        action.payload.insert(key.to_string(), Value::from(action.player_id.clone()));
    }
    action
}
