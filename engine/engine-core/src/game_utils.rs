//! Shared utilities for two-player game implementations
//!
//! Both reference games identify players as `1` and `2` and track the result
//! of a game in a single winner byte:
//! * `0` - game ongoing
//! * `1` - player 1 won
//! * `2` - player 2 won
//! * `3` - draw

use crate::board::Points;

/// Winner byte of a game that is still running.
pub const ONGOING: u8 = 0;

/// Winner byte of a drawn game.
pub const DRAW: u8 = 3;

/// The opponent of a two-player identity (`1` <-> `2`).
///
/// # Example
/// ```
/// use engine_core::game_utils::other_player;
///
/// assert_eq!(other_player(1), 2);
/// assert_eq!(other_player(2), 1);
/// ```
#[inline]
pub fn other_player(player: u8) -> u8 {
    if player == 1 {
        2
    } else {
        1
    }
}

/// Convert a winner byte into an outcome table.
///
/// Returns `None` while the game is ongoing. A win scores `1` for the winner
/// and `-1` for the loser; a draw scores `0` for both players.
///
/// # Example
/// ```
/// use engine_core::game_utils::points_for_winner;
///
/// // Player 1 wins
/// let points = points_for_winner(1).unwrap();
/// assert_eq!(points[&1], 1);
/// assert_eq!(points[&2], -1);
///
/// // Draw
/// let points = points_for_winner(3).unwrap();
/// assert_eq!(points[&1], 0);
/// assert_eq!(points[&2], 0);
///
/// // Game ongoing
/// assert!(points_for_winner(0).is_none());
/// ```
pub fn points_for_winner(winner: u8) -> Option<Points<u8>> {
    match winner {
        ONGOING => None,
        1 | 2 => Some(Points::from([(winner, 1), (other_player(winner), -1)])),
        _ => Some(Points::from([(1, 0), (2, 0)])),
    }
}
