//! MCTS-based policy
//!
//! Wraps a vanilla MCTS search with its own random generator and keeps a
//! running total of search timings for the arena's periodic log lines.

use anyhow::Result;
use engine_core::Board;
use mcts::{run_mcts, MctsConfig, SearchStats};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

/// Search totals accumulated across every move a policy made.
#[derive(Debug, Clone, Default)]
pub struct SearchTotals {
    pub searches: u32,
    pub iterations: u64,
    pub nodes_created: u64,
    pub rollout_plies: u64,
    pub total_us: u64,
}

impl SearchTotals {
    fn add(&mut self, stats: &SearchStats) {
        self.searches += 1;
        self.iterations += stats.iterations as u64;
        self.nodes_created += stats.nodes_created as u64;
        self.rollout_plies += stats.rollout_plies;
        self.total_us += stats.total_us;
    }

    pub fn avg_search_us(&self) -> f64 {
        if self.searches > 0 {
            self.total_us as f64 / self.searches as f64
        } else {
            0.0
        }
    }
}

/// Policy that runs a fresh MCTS search for every move.
#[derive(Debug)]
pub struct MctsPolicy {
    config: MctsConfig,
    rng: ChaCha20Rng,
    totals: SearchTotals,
}

impl MctsPolicy {
    pub fn new(config: MctsConfig) -> Self {
        Self {
            config,
            rng: ChaCha20Rng::from_entropy(),
            totals: SearchTotals::default(),
        }
    }

    /// Create with a specific seed for determinism
    pub fn with_seed(config: MctsConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha20Rng::seed_from_u64(seed),
            totals: SearchTotals::default(),
        }
    }

    #[allow(dead_code)]
    pub fn totals(&self) -> &SearchTotals {
        &self.totals
    }

    /// Return and reset the accumulated totals.
    pub fn take_totals(&mut self) -> SearchTotals {
        std::mem::take(&mut self.totals)
    }
}

impl<B: Board> crate::policy::Policy<B> for MctsPolicy {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn select_action(&mut self, board: &B, state: &B::State) -> Result<B::Action> {
        let result = run_mcts(board, state.clone(), self.config.clone(), &mut self.rng)?;
        self.totals.add(&result.stats);

        debug!(
            action = ?result.action,
            win_ratio = result.win_ratio,
            iterations = result.iterations,
            total_us = result.stats.total_us,
            "MCTS move selected"
        );

        Ok(result.action)
    }
}
