//! Core traits and types for the Arbor game engine
//!
//! This crate defines the contract between a game implementation and the
//! search that plays it:
//! - `Board`: rules of a deterministic, perfect-information, two-player game
//! - `Points`: the per-player outcome table of a finished game
//! - `game_utils`: helpers shared by the two-player reference games

pub mod board;
pub mod game_utils;

// Re-export main types for convenience
pub use board::{Board, Points};
pub use game_utils::{other_player, points_for_winner};
