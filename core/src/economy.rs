//! Economy simulator — incremental changes from enacted policy.
//!
//! This simulator is REACTIVE. It runs only when at least one proposal
//! was enacted in the current batch; otherwise the economy is returned
//! untouched.
//!
//! Step order (fixed):
//!   1. Base step: income, inflation drift, unemployment drift,
//!      with inflation and unemployment floored at 0.
//!   2. Keyword effects, per enacted proposal, per table row.
//!      Non-exclusive: one title may match several rows.
//!   3. Treasury floored at 0. Unemployment is NOT re-floored,
//!      so a welfare effect can leave it transiently negative.

use crate::{config::EconomyConfig, proposal::Proposal};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Economy {
    #[serde(default)]
    pub treasury: f64,
    #[serde(default)]
    pub inflation_rate: f64,
    #[serde(default)]
    pub unemployment_rate: f64,
}

impl Economy {
    pub fn new(treasury: f64, inflation_rate: f64, unemployment_rate: f64) -> Self {
        Self { treasury, inflation_rate, unemployment_rate }
    }
}

/// One row of the keyword table: a case-insensitive title substring
/// and the deltas it applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEffect {
    pub keyword: String,
    #[serde(default)]
    pub treasury_delta: f64,
    #[serde(default)]
    pub inflation_delta: f64,
    #[serde(default)]
    pub unemployment_delta: f64,
}

impl PolicyEffect {
    pub fn new(keyword: &str, treasury_delta: f64, inflation_delta: f64, unemployment_delta: f64) -> Self {
        Self {
            keyword: keyword.to_string(),
            treasury_delta,
            inflation_delta,
            unemployment_delta,
        }
    }

    /// Case-insensitive substring match against a proposal title.
    pub fn matches(&self, title: &str) -> bool {
        title.to_lowercase().contains(&self.keyword.to_lowercase())
    }

    fn apply(&self, economy: &mut Economy) {
        economy.treasury += self.treasury_delta;
        economy.inflation_rate += self.inflation_delta;
        economy.unemployment_rate += self.unemployment_delta;
    }
}

pub struct EconomySimulator<'a> {
    config: &'a EconomyConfig,
}

impl<'a> EconomySimulator<'a> {
    pub fn new(config: &'a EconomyConfig) -> Self {
        Self { config }
    }

    /// Apply one step for the proposals enacted this batch.
    /// Returns `None` when nothing was enacted.
    pub fn step(&self, economy: &Economy, enacted: &[&Proposal]) -> Option<Economy> {
        if enacted.is_empty() {
            return None;
        }

        let mut next = economy.clone();
        next.treasury += self.config.base_treasury_income;
        next.inflation_rate = (next.inflation_rate + self.config.base_inflation_drift).max(0.0);
        next.unemployment_rate =
            (next.unemployment_rate + self.config.base_unemployment_drift).max(0.0);

        for proposal in enacted {
            for effect in &self.config.policy_effects {
                if effect.matches(&proposal.title) {
                    log::debug!(
                        "economy: '{}' matched keyword '{}'",
                        proposal.title,
                        effect.keyword
                    );
                    effect.apply(&mut next);
                }
            }
        }

        next.treasury = next.treasury.max(0.0);
        Some(next)
    }
}
