//! Configuration for the arena runner
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use engine_games::GameKind;
use mcts::MctsConfig;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_env_id() -> String {
    CENTRAL_CONFIG.common.env_id.clone()
}

fn default_data_dir() -> String {
    CENTRAL_CONFIG.common.data_dir.clone()
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_games() -> u32 {
    CENTRAL_CONFIG.arena.games
}

fn default_opponent() -> String {
    CENTRAL_CONFIG.arena.opponent.clone()
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.arena.seed
}

fn default_log_interval() -> u32 {
    CENTRAL_CONFIG.arena.log_interval
}

fn default_num_iterations() -> u32 {
    CENTRAL_CONFIG.mcts.num_iterations
}

fn default_exploration() -> f64 {
    CENTRAL_CONFIG.mcts.exploration
}

fn default_rollout_depth_limit() -> u32 {
    CENTRAL_CONFIG.mcts.rollout_depth_limit
}

/// Who the MCTS bot plays against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentKind {
    /// Uniformly random legal moves
    Random,
    /// A second MCTS bot with the same settings
    Mcts,
}

impl OpponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpponentKind::Random => "random",
            OpponentKind::Mcts => "mcts",
        }
    }
}

impl FromStr for OpponentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(OpponentKind::Random),
            "mcts" => Ok(OpponentKind::Mcts),
            other => Err(anyhow!(
                "invalid opponent '{}', expected one of random, mcts",
                other
            )),
        }
    }
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "arena")]
#[command(about = "Arbor Arena - MCTS bot-vs-bot match runner")]
#[command(
    long_about = "Plays a series of games between a vanilla MCTS bot and an opponent,
alternating who moves first, and writes win/loss statistics to the data directory.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Environment ID to play (tictactoe, connect4)
    #[arg(long, default_value_t = default_env_id())]
    pub env_id: String,

    /// Number of games to play
    #[arg(long, default_value_t = default_games())]
    pub games: u32,

    /// Opponent of the MCTS bot (random, mcts)
    #[arg(long, default_value_t = default_opponent())]
    pub opponent: String,

    /// MCTS iterations per move
    #[arg(long, default_value_t = default_num_iterations())]
    pub num_iterations: u32,

    /// UCB exploration constant
    #[arg(long, default_value_t = default_exploration())]
    pub exploration: f64,

    /// Maximum random plies per rollout (0 for unlimited)
    #[arg(long, default_value_t = default_rollout_depth_limit())]
    pub rollout_depth_limit: u32,

    /// RNG seed (0 to seed from entropy)
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Log progress every N games (0 to disable)
    #[arg(long, default_value_t = default_log_interval())]
    pub log_interval: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Data directory for the stats file
    #[arg(long, default_value_t = default_data_dir())]
    pub data_dir: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.env_id.is_empty() {
            return Err(anyhow!("env_id cannot be empty"));
        }

        self.game_kind()?;
        self.opponent_kind()?;

        if self.num_iterations == 0 {
            return Err(anyhow!("num_iterations must be greater than 0"));
        }

        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(anyhow!(
                "exploration must be a non-negative number, got {}",
                self.exploration
            ));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    pub fn game_kind(&self) -> Result<GameKind> {
        Ok(self.env_id.parse::<GameKind>()?)
    }

    pub fn opponent_kind(&self) -> Result<OpponentKind> {
        self.opponent.parse()
    }

    /// Search settings for every MCTS bot in the arena.
    pub fn mcts_config(&self) -> MctsConfig {
        MctsConfig::default()
            .with_iterations(self.num_iterations)
            .with_exploration(self.exploration)
            .with_rollout_depth_limit(self.rollout_depth_limit)
    }

    /// Seed for the bot's generator; None means seed from entropy.
    pub fn rng_seed(&self) -> Option<u64> {
        (self.seed != 0).then_some(self.seed)
    }

    /// Path of the JSON stats file
    pub fn stats_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("arena_stats.json")
    }
}
