use crate::economy::{Economy, PolicyEffect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyConfig {
    pub base_treasury_income: f64,
    pub base_inflation_drift: f64,
    pub base_unemployment_drift: f64,
    /// Applied in table order for every enacted proposal.
    pub policy_effects: Vec<PolicyEffect>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            base_treasury_income:    10_000.0,
            base_inflation_drift:    0.001,
            base_unemployment_drift: -0.001,
            policy_effects: vec![
                PolicyEffect::new("tax",        5_000.0, 0.005, 0.0),
                PolicyEffect::new("welfare",   -2_000.0, 0.0,  -0.01),
                PolicyEffect::new("austerity",  3_000.0, 0.0,   0.005),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateConfig {
    /// Stored on every debate; not enforced by the engine.
    pub speaker_time_limit_ms: u64,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self { speaker_time_limit_ms: 300_000 } // 5 minutes per speaker
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGameConfig {
    pub default_name: String,
    pub max_players: usize,
    pub min_players_to_start: usize,
    pub starting_turn: u32,
    pub turn_duration_secs: u64,
    pub debate_duration_secs: u64,
    pub starting_economy: Economy,
}

impl Default for NewGameConfig {
    fn default() -> Self {
        Self {
            default_name:         "New Game".into(),
            max_players:          20,
            min_players_to_start: 2,
            starting_turn:        1,
            turn_duration_secs:   300,
            debate_duration_secs: 180,
            starting_economy:     Economy::new(100_000.0, 0.02, 0.05),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub economy: EconomyConfig,
    #[serde(default)]
    pub debate: DebateConfig,
    #[serde(default)]
    pub new_game: NewGameConfig,
}

impl EngineConfig {
    /// Load from the data/ directory.
    /// In tests, use EngineConfig::default().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/engine/engine.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        log::info!(
            "Loaded engine config from {path}: {} policy effects",
            config.economy.policy_effects.len()
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_data_file_matches_builtin_defaults() {
        let data_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../data");
        let loaded = EngineConfig::load(data_dir).expect("load data/engine/engine.json");
        assert_eq!(loaded, EngineConfig::default());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"debate":{"speaker_time_limit_ms":60000}}"#).expect("parse");
        assert_eq!(config.debate.speaker_time_limit_ms, 60_000);
        assert_eq!(config.economy, EconomyConfig::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = EngineConfig::load("/definitely/not/here").unwrap_err();
        assert!(err.to_string().contains("Cannot read"));
    }
}
