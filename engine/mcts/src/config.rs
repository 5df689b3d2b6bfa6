//! MCTS configuration parameters.

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Number of select/expand/rollout/backpropagate iterations per search.
    pub num_iterations: u32,

    /// Exploration constant `c` in the UCB formula.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub exploration: f64,

    /// Maximum number of random plies in one rollout.
    /// None trusts the game to always terminate.
    pub rollout_depth_limit: Option<u32>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_iterations: 1000,
            exploration: 2.0,
            rollout_depth_limit: None,
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_iterations: 200,
            ..Self::default()
        }
    }

    /// Builder pattern: set number of iterations.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.num_iterations = n;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: cap rollout length. Zero means unlimited.
    pub fn with_rollout_depth_limit(mut self, limit: u32) -> Self {
        self.rollout_depth_limit = (limit > 0).then_some(limit);
        self
    }
}
