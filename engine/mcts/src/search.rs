//! MCTS search implementation.
//!
//! Each iteration runs the four classic phases:
//! 1. Selection: walk the tree by UCB to a node worth expanding
//! 2. Expansion: materialize one untried action as a new child
//! 3. Rollout: play random moves to the end of the game
//! 4. Backpropagation: push the win/loss up to the root

use std::time::Instant;

use engine_core::Board;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::node::NodeId;
use crate::rollout::play_out;
use crate::tree::{ChildFilter, MctsTree};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Outcome requested for a non-terminal state: {0}")]
    NonTerminalOutcome(String),

    #[error("Rollout exceeded depth limit of {limit} plies")]
    RolloutDepthExceeded { limit: u32 },

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Counters and timings collected over one search.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Iterations completed
    pub iterations: u32,
    /// Nodes added by expansion (the root is not counted)
    pub nodes_created: u32,
    /// Iterations whose selection ended on an already finished game
    pub terminal_hits: u32,
    /// Random plies played across all rollouts
    pub rollout_plies: u64,
    /// Rollouts the deciding player won
    pub wins: u32,
    /// Rollouts the deciding player did not win
    pub losses: u32,
    pub selection_us: u64,
    pub expansion_us: u64,
    pub rollout_us: u64,
    pub backprop_us: u64,
    pub total_us: u64,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult<A> {
    /// Best action to take
    pub action: A,

    /// Raw win ratio of the chosen root child
    pub win_ratio: f64,

    /// Number of iterations performed
    pub iterations: u32,

    pub stats: SearchStats,
}

/// MCTS search state for one decision.
pub struct MctsSearch<'a, B: Board> {
    tree: MctsTree<B::Action, B::Player>,
    board: &'a B,
    root_state: B::State,
    bot: B::Player,
    config: MctsConfig,
    stats: SearchStats,
}

impl<'a, B: Board> MctsSearch<'a, B> {
    /// Create a new search deciding for the player to move in `state`.
    ///
    /// Fails with [`SearchError::NoLegalMoves`] when the game is already over
    /// or nothing is legal.
    pub fn new(board: &'a B, state: B::State, config: MctsConfig) -> Result<Self, SearchError> {
        if board.is_ended(&state) {
            return Err(SearchError::NoLegalMoves);
        }

        let legal = board.legal_actions(&state);
        if legal.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        let bot = board.current_player(&state);

        Ok(Self {
            tree: MctsTree::new(legal),
            board,
            root_state: state,
            bot,
            config,
            stats: SearchStats::default(),
        })
    }

    /// Run the configured number of iterations and pick the root child with
    /// the best raw win ratio.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult<B::Action>, SearchError> {
        let start = Instant::now();

        for _ in 0..self.config.num_iterations {
            self.iterate(rng)?;
        }

        self.stats.total_us += start.elapsed().as_micros() as u64;

        // Zero iterations leaves the root without children
        let (action, win_ratio) = self.tree.best_action().ok_or(SearchError::NoLegalMoves)?;

        let tree_stats = self.tree.stats();
        debug!(
            iterations = self.stats.iterations,
            nodes = tree_stats.total_nodes,
            max_depth = tree_stats.max_depth,
            root_win_ratio = tree_stats.root_win_ratio,
            win_ratio = win_ratio,
            terminal_hits = self.stats.terminal_hits,
            rollout_plies = self.stats.rollout_plies,
            selection_us = self.stats.selection_us,
            expansion_us = self.stats.expansion_us,
            rollout_us = self.stats.rollout_us,
            backprop_us = self.stats.backprop_us,
            total_us = self.stats.total_us,
            "MCTS search complete"
        );

        Ok(SearchResult {
            action,
            win_ratio,
            iterations: self.stats.iterations,
            stats: self.stats.clone(),
        })
    }

    /// Run a single iteration (select -> expand -> rollout -> backpropagate).
    pub fn iterate(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        let mut state = self.root_state.clone();

        let t = Instant::now();
        let mut node_id = self.traverse(&mut state);
        self.stats.selection_us += t.elapsed().as_micros() as u64;

        let t = Instant::now();
        if let Some((child_id, child_state)) = self.expand(node_id, &state, rng) {
            node_id = child_id;
            state = child_state;
            self.stats.nodes_created += 1;
        } else if self.board.is_ended(&state) {
            self.stats.terminal_hits += 1;
        }
        self.stats.expansion_us += t.elapsed().as_micros() as u64;

        let t = Instant::now();
        let (terminal, plies) = play_out(self.board, state, rng, self.config.rollout_depth_limit)?;
        let won = is_win(self.board, &terminal, &self.bot)?;
        self.stats.rollout_plies += plies as u64;
        self.stats.rollout_us += t.elapsed().as_micros() as u64;

        let t = Instant::now();
        self.tree.backpropagate(node_id, won);
        self.stats.backprop_us += t.elapsed().as_micros() as u64;

        if won {
            self.stats.wins += 1;
        } else {
            self.stats.losses += 1;
        }
        self.stats.iterations += 1;

        trace!(
            iteration = self.stats.iterations,
            node = node_id.0,
            plies = plies,
            won = won,
            "MCTS iteration complete"
        );

        Ok(())
    }

    /// Walk from the root to the node this iteration should work on,
    /// advancing `state` along every edge taken.
    fn traverse(&self, state: &mut B::State) -> NodeId {
        let exploration = self.config.exploration;
        let mut current = self.tree.root();

        while !self.board.is_ended(state) {
            if self.tree.get(current).has_untried_actions() {
                return current;
            }

            if let Some(child_id) =
                self.tree
                    .select_child(current, &self.bot, exploration, ChildFilter::Expandable)
            {
                self.advance(state, child_id);
                return child_id;
            }

            match self
                .tree
                .select_child(current, &self.bot, exploration, ChildFilter::All)
            {
                Some(child_id) => {
                    self.advance(state, child_id);
                    current = child_id;
                }
                None => return current,
            }
        }

        current
    }

    fn advance(&self, state: &mut B::State, node_id: NodeId) {
        if let Some(action) = &self.tree.get(node_id).parent_action {
            *state = self.board.next_state(state, action);
        }
    }

    /// Materialize one random untried action of `node_id`, whose position is
    /// `state`. Returns the new child and its state, or None when the node
    /// has nothing left to expand.
    fn expand(
        &mut self,
        node_id: NodeId,
        state: &B::State,
        rng: &mut ChaCha20Rng,
    ) -> Option<(NodeId, B::State)> {
        let node = self.tree.get_mut(node_id);
        if !node.has_untried_actions() {
            return None;
        }

        let index = rng.gen_range(0..node.untried_actions.len());
        let action = node.take_untried(index);

        let mover = self.board.current_player(state);
        let next = self.board.next_state(state, &action);
        let untried = if self.board.is_ended(&next) {
            Vec::new()
        } else {
            self.board.legal_actions(&next)
        };

        let child_id = self.tree.add_child(node_id, action, mover, untried);
        Some((child_id, next))
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree<B::Action, B::Player> {
        &self.tree
    }

    /// Statistics gathered so far.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}

/// Whether `player` won the finished game in `state`.
///
/// Only terminal states have an outcome; anything else is an error.
pub fn is_win<B: Board>(board: &B, state: &B::State, player: &B::Player) -> Result<bool, SearchError> {
    let points = board
        .points_values(state)
        .ok_or_else(|| SearchError::NonTerminalOutcome(format!("{:?}", state)))?;
    Ok(points.get(player) == Some(&1))
}

/// Convenience function to run a single MCTS search.
pub fn run_mcts<B: Board>(
    board: &B,
    state: B::State,
    config: MctsConfig,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult<B::Action>, SearchError> {
    let mut search = MctsSearch::new(board, state, config)?;
    search.run(rng)
}

/// Pick a move for the player to act in `state` with an explicit config and
/// random source.
pub fn think_with<B: Board>(
    board: &B,
    state: B::State,
    config: MctsConfig,
    rng: &mut ChaCha20Rng,
) -> Result<B::Action, SearchError> {
    run_mcts(board, state, config, rng).map(|result| result.action)
}

/// Pick a move for the player to act in `state` using the default config
/// and an entropy-seeded generator.
pub fn think<B: Board>(board: &B, state: B::State) -> Result<B::Action, SearchError> {
    let mut rng = ChaCha20Rng::from_entropy();
    think_with(board, state, MctsConfig::default(), &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_games::ScriptedGame;
    use games_tictactoe::{Action, State, TicTacToe};

    #[test]
    fn test_mcts_basic_search() {
        let game = TicTacToe::new();
        let config = MctsConfig::for_testing();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let result = run_mcts(&game, State::new(), config, &mut rng).unwrap();

        // Should pick a legal opening move
        assert!(result.action.position() < 9);
        assert_eq!(result.iterations, 200);
        assert!((-1.0..=1.0).contains(&result.win_ratio));
        assert_eq!(result.stats.wins + result.stats.losses, 200);
    }

    #[test]
    fn test_root_visits_equal_iterations() {
        let game = TicTacToe::new();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut search = MctsSearch::new(&game, State::new(), MctsConfig::for_testing()).unwrap();

        search.run(&mut rng).unwrap();

        let tree = search.tree();
        let root = tree.get(tree.root());
        assert_eq!(root.visits, 200);

        let child_visits: u32 = tree.root_children().iter().map(|(_, v, _)| *v).sum();
        assert!(child_visits <= 200);
    }

    #[test]
    fn test_chosen_action_is_a_root_child() {
        let game = TicTacToe::new();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut search = MctsSearch::new(&game, State::new(), MctsConfig::for_testing()).unwrap();

        let result = search.run(&mut rng).unwrap();

        assert!(search
            .tree()
            .root_children()
            .iter()
            .any(|(action, _, _)| *action == result.action));
    }

    #[test]
    fn test_every_root_action_gets_expanded() {
        let game = TicTacToe::new();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut search =
            MctsSearch::new(&game, State::new(), MctsConfig::default().with_iterations(9)).unwrap();

        search.run(&mut rng).unwrap();

        // The root expands before anything below it
        let tree = search.tree();
        assert!(!tree.get(tree.root()).has_untried_actions());
        assert_eq!(tree.get(tree.root()).children.len(), 9);
        assert_eq!(tree.len(), 10);
    }

    #[test]
    fn test_expansion_never_repeats_an_action() {
        let game = TicTacToe::new();
        let mut rng = ChaCha20Rng::seed_from_u64(99);
        let mut search = MctsSearch::new(&game, State::new(), MctsConfig::for_testing()).unwrap();

        search.run(&mut rng).unwrap();

        let tree = search.tree();
        assert_eq!(tree.len() as u32, 1 + search.stats().nodes_created);
        assert!(search.stats().nodes_created <= 200);

        for node in tree.arena() {
            for (i, (action, _)) in node.children.iter().enumerate() {
                assert!(!node.untried_actions.contains(action));
                assert!(node.children[i + 1..].iter().all(|(other, _)| other != action));
            }
        }
    }

    #[test]
    fn test_expand_moves_one_action() {
        let game = TicTacToe::new();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut search = MctsSearch::new(&game, State::new(), MctsConfig::for_testing()).unwrap();
        let root = search.tree().root();

        let (child_id, child_state) = search.expand(root, &State::new(), &mut rng).unwrap();

        let tree = search.tree();
        assert_eq!(tree.get(root).untried_actions.len(), 8);
        assert_eq!(tree.get(root).children.len(), 1);

        let child = tree.get(child_id);
        assert_eq!(child.parent, root);
        assert_eq!(child.mover, Some(1));
        assert_eq!(child.untried_actions.len(), 8);

        let action = child.parent_action.unwrap();
        assert_eq!(child_state, State::new().make_move(action.position()));
    }

    #[test]
    fn test_expand_without_untried_is_noop() {
        let game = ScriptedGame::single_action();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut search = MctsSearch::new(&game, 0, MctsConfig::for_testing()).unwrap();
        let root = search.tree().root();

        assert!(search.expand(root, &0, &mut rng).is_some());
        assert!(search.expand(root, &0, &mut rng).is_none());
        assert_eq!(search.tree().len(), 2);
    }

    #[test]
    fn test_expanded_terminal_child_has_no_untried() {
        let game = ScriptedGame::win_in_one();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut search = MctsSearch::new(&game, 0, MctsConfig::for_testing()).unwrap();
        let root = search.tree().root();

        let (child_id, child_state) = search.expand(root, &0, &mut rng).unwrap();
        assert!(game.is_ended(&child_state));
        assert!(!search.tree().get(child_id).has_untried_actions());
    }

    #[test]
    fn test_traverse_returns_root_while_it_has_untried() {
        let game = TicTacToe::new();
        let search = MctsSearch::new(&game, State::new(), MctsConfig::for_testing()).unwrap();

        let mut state = State::new();
        assert_eq!(search.traverse(&mut state), search.tree().root());
        assert_eq!(state, State::new());
    }

    #[test]
    fn test_traverse_advances_state_to_returned_node() {
        let game = ScriptedGame::safe_and_risky();
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let mut search = MctsSearch::new(&game, 0, MctsConfig::for_testing()).unwrap();

        // Two iterations expand both root actions
        search.iterate(&mut rng).unwrap();
        search.iterate(&mut rng).unwrap();
        assert!(!search.tree().get(search.tree().root()).has_untried_actions());

        let mut state = 0;
        let node_id = search.traverse(&mut state);
        let node = search.tree().get(node_id);

        // Step 1: a root child that still has replies to try
        assert_eq!(node.parent, search.tree().root());
        assert!(node.has_untried_actions());
        let expected = match node.parent_action {
            Some(0) => 1,
            Some(1) => 2,
            other => panic!("unexpected action {:?}", other),
        };
        assert_eq!(state, expected);
    }

    #[test]
    fn test_single_action_is_returned() {
        let game = ScriptedGame::single_action();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let result = run_mcts(&game, 0, MctsConfig::for_testing(), &mut rng).unwrap();
        assert_eq!(result.action, 7);
    }

    #[test]
    fn test_single_action_tictactoe() {
        let game = TicTacToe::new();
        // Only the bottom-right corner is left
        let state = State::from_moves(&[0, 1, 2, 4, 3, 5, 7, 6]);
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let action = think_with(&game, state, MctsConfig::for_testing(), &mut rng).unwrap();
        assert_eq!(action, Action::Place(8));
    }

    #[test]
    fn test_finds_immediate_win() {
        let game = ScriptedGame::win_in_one();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let mut search = MctsSearch::new(&game, 0, MctsConfig::for_testing()).unwrap();

        let result = search.run(&mut rng).unwrap();

        assert_eq!(result.action, 0);
        assert!((result.win_ratio - 1.0).abs() < 1e-12);
        for (action, visits, wins) in search.tree().root_children() {
            assert!(visits > 0);
            if action == 0 {
                assert_eq!(wins, visits as i32);
            } else {
                assert_eq!(wins, -(visits as i32));
            }
        }
    }

    #[test]
    fn test_avoids_line_that_opponent_can_punish() {
        let game = ScriptedGame::safe_and_risky();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let result = run_mcts(&game, 0, MctsConfig::for_testing(), &mut rng).unwrap();
        assert_eq!(result.action, 0);
        assert!((result.win_ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mcts_finds_winning_move_tictactoe() {
        // X | X | _
        // O | O | _
        // _ | _ | _
        //
        // X should play position 2 to win
        let game = TicTacToe::new();
        let state = State::from_moves(&[0, 3, 1, 4]);
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let mut search = MctsSearch::new(&game, state, MctsConfig::default()).unwrap();

        let result = search.run(&mut rng).unwrap();

        let (_, visits, wins) = search
            .tree()
            .root_children()
            .into_iter()
            .find(|(action, _, _)| *action == Action::Place(2))
            .unwrap();
        assert!(visits > 0);
        assert_eq!(wins, visits as i32);
        assert_eq!(result.action, Action::Place(2));
    }

    #[test]
    fn test_search_on_terminal_state_fails() {
        let game = ScriptedGame::finished();
        let result = MctsSearch::new(&game, 0, MctsConfig::for_testing());
        assert!(matches!(result, Err(SearchError::NoLegalMoves)));

        let game = TicTacToe::new();
        let won = State::from_moves(&[0, 3, 1, 4, 2]);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let result = think_with(&game, won, MctsConfig::for_testing(), &mut rng);
        assert!(matches!(result, Err(SearchError::NoLegalMoves)));
    }

    #[test]
    fn test_search_on_stalled_state_fails() {
        let game = ScriptedGame::stalled();
        let result = MctsSearch::new(&game, 0, MctsConfig::for_testing());
        assert!(matches!(result, Err(SearchError::NoLegalMoves)));
    }

    #[test]
    fn test_think_with_default_config() {
        assert!(matches!(think(&ScriptedGame::single_action(), 0), Ok(7)));
        assert!(matches!(
            think(&ScriptedGame::finished(), 0),
            Err(SearchError::NoLegalMoves)
        ));
    }

    #[test]
    fn test_zero_iterations_fails() {
        let game = TicTacToe::new();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let config = MctsConfig::default().with_iterations(0);

        let result = run_mcts(&game, State::new(), config, &mut rng);
        assert!(matches!(result, Err(SearchError::NoLegalMoves)));
    }

    #[test]
    fn test_rollout_depth_limit_propagates() {
        let game = ScriptedGame::endless();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let config = MctsConfig::for_testing().with_rollout_depth_limit(10);

        let result = run_mcts(&game, 0, config, &mut rng);
        assert!(matches!(
            result,
            Err(SearchError::RolloutDepthExceeded { limit: 10 })
        ));
    }

    #[test]
    fn test_is_win() {
        let game = TicTacToe::new();
        let x_won = State::from_moves(&[0, 3, 1, 4, 2]);

        assert!(is_win(&game, &x_won, &1).unwrap());
        assert!(!is_win(&game, &x_won, &2).unwrap());

        // Draw is not a win for anyone
        let draw = State::from_moves(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert!(game.is_ended(&draw));
        assert!(!is_win(&game, &draw, &1).unwrap());
        assert!(!is_win(&game, &draw, &2).unwrap());
    }

    #[test]
    fn test_is_win_on_non_terminal_fails() {
        let game = TicTacToe::new();
        let result = is_win(&game, &State::new(), &1);
        assert!(matches!(result, Err(SearchError::NonTerminalOutcome(_))));
    }

    #[test]
    fn test_search_is_reproducible_with_seed() {
        let game = TicTacToe::new();
        let run = |seed| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut search =
                MctsSearch::new(&game, State::new(), MctsConfig::for_testing()).unwrap();
            search.run(&mut rng).unwrap();
            search.tree().root_children()
        };

        assert_eq!(run(17), run(17));
    }

    #[test]
    fn test_search_connect4_opening() {
        let game = games_connect4::Connect4::new();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let result = run_mcts(
            &game,
            games_connect4::State::new(),
            MctsConfig::for_testing(),
            &mut rng,
        )
        .unwrap();

        assert!(result.action.column() < 7);
        assert!(result.stats.rollout_plies > 0);
    }
}
