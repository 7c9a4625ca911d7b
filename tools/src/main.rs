//! game-runner: headless state advancer for Political Sphere.
//!
//! Usage:
//!   game-runner --state state.json --actions actions.json --seed 12345
//!   game-runner --actions actions.json --seed 7 --trace --data-dir ./data

use anyhow::{Context, Result};
use sphere_core::{
    clock::SystemClock, config::EngineConfig, engine::GameEngine, GameStateSnapshot, PlayerAction,
};
use std::env;
use std::fs;
use std::sync::Arc;

#[derive(serde::Serialize)]
struct TracedOutput<'a> {
    state: &'a GameStateSnapshot,
    trace: &'a sphere_core::AdvanceTrace,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 1u32);
    let traced = args.iter().any(|a| a == "--trace");
    let state_path = str_arg(&args, "--state");
    let actions_path = str_arg(&args, "--actions");
    let data_dir = str_arg(&args, "--data-dir").unwrap_or("./data");

    let config = match EngineConfig::load(data_dir) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{e}; using built-in engine config");
            EngineConfig::default()
        }
    };

    let state = match state_path {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            GameStateSnapshot::from_json(&json).with_context(|| format!("parsing {path}"))?
        }
        None => GameStateSnapshot::default(),
    };

    let actions: Vec<PlayerAction> = match actions_path {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&json).with_context(|| format!("parsing {path}"))?
        }
        None => Vec::new(),
    };

    log::info!(
        "advancing game '{}' with {} actions, seed {seed}",
        state.id,
        actions.len()
    );

    let engine = GameEngine::new(config, Arc::new(SystemClock));
    let (next, trace) = engine.advance_traced(&state, &actions, seed);

    let out = if traced {
        serde_json::to_string_pretty(&TracedOutput { state: &next, trace: &trace })?
    } else {
        serde_json::to_string_pretty(&next)?
    };
    println!("{out}");

    for (index, reason) in trace.skipped() {
        log::info!("action #{index} skipped: {reason:?}");
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}
