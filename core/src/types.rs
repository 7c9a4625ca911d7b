//! Shared primitive types used across the entire engine.

/// Identifier of a game held by the registry.
pub type GameId = String;

/// Identifier of a player within a game.
pub type PlayerId = String;

/// A stable identifier for any engine-created record
/// (proposal, debate, speech).
pub type EntityId = String;

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;
