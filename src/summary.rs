//! End-of-run report
//!
//! Printed by the binary as JSON or as log lines.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::sim::{GamePhase, GameState, Health, Stats};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub config: SimConfig,
    /// +1 right, -1 left
    pub store_side: f32,
    pub outcome: GamePhase,
    pub frames: u64,
    pub sim_time: f64,
    pub player_health: Health,
    pub population: usize,
    pub zombies: usize,
    pub carriers: usize,
    pub stats: Stats,
}

impl RunSummary {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            seed: state.seed,
            config: state.config.clone(),
            store_side: state.store.side,
            outcome: state.phase,
            frames: state.frame,
            sim_time: state.sim_time,
            player_health: state.player.health,
            population: state.population.len(),
            zombies: state.population.count(Health::Zombie),
            carriers: state.population.count(Health::Infected),
            stats: state.stats.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Short human-readable outcome
    pub fn headline(&self) -> String {
        let outcome = match self.outcome {
            GamePhase::Playing => "still running",
            GamePhase::Won => "reached the store",
            GamePhase::Lost => "was caught",
        };
        format!(
            "Player {} after {} frames ({:.1}s), {} waves, {} NPCs on track",
            outcome, self.frames, self.sim_time, self.stats.waves, self.population
        )
    }
}
