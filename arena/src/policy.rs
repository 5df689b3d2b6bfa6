//! Action selection policies for the arena

use anyhow::{anyhow, Result};
use engine_core::Board;
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;

/// Something that picks a move for the player to act.
pub trait Policy<B: Board>: Send {
    /// Short label used in the per-game log line
    fn name(&self) -> &'static str;

    /// Select an action for the player to move in `state`
    fn select_action(&mut self, board: &B, state: &B::State) -> Result<B::Action>;
}

/// Random policy that selects legal actions uniformly at random.
#[derive(Debug)]
pub struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Board> Policy<B> for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select_action(&mut self, board: &B, state: &B::State) -> Result<B::Action> {
        board
            .legal_actions(state)
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| anyhow!("no legal actions in state {:?}", state))
    }
}
