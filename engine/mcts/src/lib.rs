//! Vanilla Monte Carlo Tree Search (MCTS) for two-player games.
//!
//! The search works with any game implementing the `engine-core` [`Board`]
//! trait and needs no evaluation function: positions are scored by playing
//! random moves to the end of the game.
//!
//! [`Board`]: engine_core::Board
//!
//! # Overview
//!
//! Each iteration of the search consists of four phases:
//!
//! 1. **Selection**: Walk the tree using UCB (Upper Confidence Bound) to
//!    balance exploration and exploitation, scoring opponent moves from the
//!    opponent's side
//! 2. **Expansion**: Add one child for a random untried action
//! 3. **Rollout**: Play uniformly random moves until the game ends
//! 4. **Backpropagation**: Add a visit and a +1/-1 result for the deciding
//!    player to every node from the new child up to the root
//!
//! After the configured number of iterations the root child with the best
//! raw win ratio is chosen.
//!
//! # Usage
//!
//! ```rust,ignore
//! use games_tictactoe::{State, TicTacToe};
//! use mcts::{run_mcts, MctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let game = TicTacToe::new();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let result = run_mcts(&game, State::new(), MctsConfig::default(), &mut rng)?;
//!
//! println!("Best action: {}", result.action);
//! println!("Win ratio: {:.3}", result.win_ratio);
//! ```
//!
//! [`think`] does the same with the default config and an entropy-seeded
//! generator.
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `num_iterations`: iterations per decision (default: 1000)
//! - `exploration`: UCB exploration constant (default: 2.0)
//! - `rollout_depth_limit`: optional cap on random plies per rollout

pub mod config;
pub mod node;
pub mod rollout;
pub mod search;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_games;

// Re-export main types
pub use config::MctsConfig;
pub use node::{MctsNode, NodeId};
pub use rollout::rollout;
pub use search::{
    is_win, run_mcts, think, think_with, MctsSearch, SearchError, SearchResult, SearchStats,
};
pub use tree::{ChildFilter, MctsTree, TreeStats};
