//! The `Board` trait: everything the search knows about a game.
//!
//! Implementations hold the rules only. States are plain values owned by the
//! caller; the search clones them as it walks the tree and never inspects
//! them except through these methods.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Outcome table of a finished game, keyed by player identity.
///
/// A player has won when its entry equals `1`.
pub type Points<P> = HashMap<P, i32>;

/// Rules of a deterministic, perfect-information, two-player turn-based game.
///
/// # Type Parameters
///
/// * `State` - One position. Cloned freely by the search, keep it compact
/// * `Action` - A legal move token. Only equality is required
/// * `Player` - Identity of a player, used as the key of [`Points`]
///
/// # Example
///
/// ```rust
/// use engine_core::{Board, Points};
///
/// /// Players alternately take one or two stones; whoever takes the last wins.
/// #[derive(Debug)]
/// struct Nim;
///
/// impl Board for Nim {
///     type State = (u8, u8); // (stones left, player to move)
///     type Action = u8;
///     type Player = u8;
///
///     fn is_ended(&self, state: &Self::State) -> bool {
///         state.0 == 0
///     }
///
///     fn legal_actions(&self, state: &Self::State) -> Vec<u8> {
///         (1..=2).filter(|&take| take <= state.0).collect()
///     }
///
///     fn next_state(&self, state: &Self::State, action: &u8) -> Self::State {
///         (state.0 - action, 3 - state.1)
///     }
///
///     fn current_player(&self, state: &Self::State) -> u8 {
///         state.1
///     }
///
///     fn points_values(&self, state: &Self::State) -> Option<Points<u8>> {
///         if !self.is_ended(state) {
///             return None;
///         }
///         // The player who just moved took the last stone.
///         let winner = 3 - state.1;
///         Some(Points::from([(winner, 1), (state.1, -1)]))
///     }
/// }
///
/// let nim = Nim;
/// assert_eq!(nim.legal_actions(&(1, 1)), vec![1]);
/// assert_eq!(nim.points_values(&(0, 2)).unwrap()[&1], 1);
/// ```
pub trait Board: Debug {
    /// Game state type
    type State: Clone + Debug;

    /// Move token type
    type Action: Clone + PartialEq + Debug;

    /// Player identity type
    type Player: Copy + Eq + Hash + Debug;

    /// Whether the game is over at `state`.
    fn is_ended(&self, state: &Self::State) -> bool;

    /// Legal actions at `state`. Empty iff the state is terminal.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// The state reached by playing `action` at `state`.
    ///
    /// Only defined for a legal `action` at a non-terminal `state`.
    fn next_state(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    /// The player whose move applies at `state`.
    fn current_player(&self, state: &Self::State) -> Self::Player;

    /// Outcome table at `state`, or `None` if the game is still running.
    fn points_values(&self, state: &Self::State) -> Option<Points<Self::Player>>;
}
