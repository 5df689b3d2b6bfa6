//! Random playouts.
//!
//! A rollout plays uniformly random legal moves from a state until the game
//! ends. It never touches the search tree.

use engine_core::Board;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

use crate::search::SearchError;

/// Play uniformly random moves from `state` until the game is over and
/// return the terminal state. A terminal `state` comes back unchanged.
///
/// With `depth_limit` set, a playout longer than the limit fails with
/// [`SearchError::RolloutDepthExceeded`] instead of running forever.
pub fn rollout<B: Board>(
    board: &B,
    state: B::State,
    rng: &mut ChaCha20Rng,
    depth_limit: Option<u32>,
) -> Result<B::State, SearchError> {
    play_out(board, state, rng, depth_limit).map(|(terminal, _)| terminal)
}

/// Like [`rollout`], also returning the number of plies played.
pub(crate) fn play_out<B: Board>(
    board: &B,
    mut state: B::State,
    rng: &mut ChaCha20Rng,
    depth_limit: Option<u32>,
) -> Result<(B::State, u32), SearchError> {
    let mut depth = 0u32;

    while !board.is_ended(&state) {
        if let Some(limit) = depth_limit {
            if depth >= limit {
                return Err(SearchError::RolloutDepthExceeded { limit });
            }
        }

        let legal = board.legal_actions(&state);
        let action = legal.choose(rng).ok_or_else(|| {
            SearchError::InvalidState(format!("no legal actions at non-terminal state {:?}", state))
        })?;
        state = board.next_state(&state, action);
        depth += 1;
    }

    Ok((state, depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_games::ScriptedGame;
    use games_tictactoe::{State, TicTacToe};
    use rand::SeedableRng;

    #[test]
    fn test_rollout_reaches_terminal() {
        let game = TicTacToe::new();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        for _ in 0..20 {
            let terminal = rollout(&game, State::new(), &mut rng, None).unwrap();
            assert!(game.is_ended(&terminal));
            assert!(game.points_values(&terminal).is_some());
        }
    }

    #[test]
    fn test_rollout_on_terminal_state_is_unchanged() {
        let game = TicTacToe::new();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let finished = State::from_moves(&[0, 3, 1, 4, 2]);
        assert!(game.is_ended(&finished));

        let result = rollout(&game, finished, &mut rng, Some(1)).unwrap();
        assert_eq!(result, finished);
    }

    #[test]
    fn test_rollout_respects_depth_limit() {
        let game = ScriptedGame::endless();
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let err = rollout(&game, 0, &mut rng, Some(25)).unwrap_err();
        assert!(matches!(err, SearchError::RolloutDepthExceeded { limit: 25 }));
    }

    #[test]
    fn test_rollout_limit_not_hit_by_short_games() {
        let game = TicTacToe::new();
        let mut rng = ChaCha20Rng::seed_from_u64(3);

        // Tic-tac-toe never lasts more than 9 plies
        let terminal = rollout(&game, State::new(), &mut rng, Some(9)).unwrap();
        assert!(game.is_ended(&terminal));
    }

    #[test]
    fn test_rollout_stalled_state_fails() {
        let game = ScriptedGame::stalled();
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let err = rollout(&game, 0, &mut rng, None).unwrap_err();
        assert!(matches!(err, SearchError::InvalidState(_)));
    }

    #[test]
    fn test_play_out_counts_plies() {
        let game = TicTacToe::new();
        let mut rng = ChaCha20Rng::seed_from_u64(5);

        let (terminal, plies) = play_out(&game, State::new(), &mut rng, None).unwrap();
        let filled = (0..9).filter(|&i| terminal.cell(i) != 0).count() as u32;
        assert_eq!(plies, filled);
        assert!((5..=9).contains(&plies));

        let finished = State::from_moves(&[0, 3, 1, 4, 2]);
        let (_, plies) = play_out(&game, finished, &mut rng, None).unwrap();
        assert_eq!(plies, 0);
    }

    #[test]
    fn test_rollout_is_reproducible_with_seed() {
        let game = TicTacToe::new();
        let a = rollout(&game, State::new(), &mut ChaCha20Rng::seed_from_u64(9), None).unwrap();
        let b = rollout(&game, State::new(), &mut ChaCha20Rng::seed_from_u64(9), None).unwrap();
        assert_eq!(a, b);
    }
}
