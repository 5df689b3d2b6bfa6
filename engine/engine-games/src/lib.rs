//! Game lookup for the Arbor engine
//!
//! Binaries pick a game from the `env_id` string in the central config.
//! This crate owns the list of known ids so that every component agrees on
//! them.
//!
//! # Usage
//!
//! ```rust
//! use engine_games::GameKind;
//!
//! let kind: GameKind = "connect4".parse().unwrap();
//! assert_eq!(kind, GameKind::Connect4);
//! assert_eq!(kind.env_id(), "connect4");
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Returned when an environment id names no built-in game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown game '{name}', expected one of: {}", GameKind::env_ids().join(", "))]
pub struct UnknownGame {
    pub name: String,
}

/// The built-in games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    TicTacToe,
    Connect4,
}

impl GameKind {
    /// Every built-in game, in display order.
    pub const ALL: [GameKind; 2] = [GameKind::TicTacToe, GameKind::Connect4];

    /// The id used in config files and on the command line.
    pub fn env_id(&self) -> &'static str {
        match self {
            GameKind::TicTacToe => "tictactoe",
            GameKind::Connect4 => "connect4",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            GameKind::TicTacToe => "Tic-Tac-Toe",
            GameKind::Connect4 => "Connect 4",
        }
    }

    /// All known environment ids.
    pub fn env_ids() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.env_id()).collect()
    }
}

impl FromStr for GameKind {
    type Err = UnknownGame;

    /// Ids are matched case-insensitively; `tic_tac_toe` and `connect_four`
    /// are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tictactoe" | "tic_tac_toe" => Ok(GameKind::TicTacToe),
            "connect4" | "connect_four" => Ok(GameKind::Connect4),
            _ => Err(UnknownGame {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_id())
    }
}
