//! Deterministic game-state advancement engine for Political Sphere.
//!
//! `engine::GameEngine::advance` takes a snapshot, an ordered batch of
//! player actions and a seed, and returns a new snapshot. Same inputs,
//! same output, apart from the injectable `updatedAt` clock.

pub mod action;
pub mod clock;
pub mod config;
pub mod debate;
pub mod dispatch;
pub mod economy;
pub mod engine;
pub mod error;
pub mod lenient;
pub mod outcome;
pub mod proposal;
pub mod registry;
pub mod resolution;
pub mod rng;
pub mod state;
pub mod types;

pub use action::PlayerAction;
pub use engine::{advance, GameEngine};
pub use outcome::{ActionOutcome, AdvanceTrace, SkipReason};
pub use state::GameStateSnapshot;
