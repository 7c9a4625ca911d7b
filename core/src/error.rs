use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Game '{game_id}' not found")]
    GameNotFound { game_id: String },

    #[error("Game '{game_id}' has finished")]
    GameFinished { game_id: String },

    #[error("Game '{game_id}' is full ({max_players} players)")]
    GameFull { game_id: String, max_players: usize },

    #[error("Game '{game_id}' is not active")]
    GameNotActive { game_id: String },

    #[error("Game '{game_id}' already started")]
    GameAlreadyStarted { game_id: String },

    #[error("Player '{player_id}' already joined game '{game_id}'")]
    AlreadyJoined { game_id: String, player_id: String },

    #[error("Player '{player_id}' is not in game '{game_id}'")]
    PlayerNotInGame { game_id: String, player_id: String },

    #[error("Only the creator of game '{game_id}' can do that")]
    NotCreator { game_id: String },

    #[error("Game '{game_id}' needs at least {required} players to start")]
    NotEnoughPlayers { game_id: String, required: usize },

    #[error("Lock poisoned for game '{game_id}'")]
    LockPoisoned { game_id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
