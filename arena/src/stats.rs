//! Arena statistics tracking and persistence.
//!
//! Counts game outcomes from the MCTS bot's point of view and writes them
//! to a JSON file in the data directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

/// Result of one arena game for the MCTS bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    BotWin,
    OpponentWin,
    Draw,
}

/// Aggregated arena statistics, designed for lock-free updates.
#[derive(Debug)]
pub struct ArenaStats {
    games_played: AtomicU32,
    bot_wins: AtomicU32,
    opponent_wins: AtomicU32,
    draws: AtomicU32,
    /// Games in which the bot made the first move
    bot_first_games: AtomicU32,
    /// Wins among `bot_first_games`
    bot_first_wins: AtomicU32,
    /// Sum of game lengths in plies
    total_moves: AtomicU64,
    /// Searches made by the bot
    bot_searches: AtomicU64,
    /// Total bot search time (microseconds)
    bot_search_us: AtomicU64,
    start_time: Instant,
    stats_path: PathBuf,
    env_id: String,
    opponent: String,
}

/// Serializable stats for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArenaStatsSnapshot {
    pub env_id: String,
    pub opponent: String,
    pub games_played: u32,
    pub bot_wins: u32,
    pub opponent_wins: u32,
    pub draws: u32,
    pub bot_first_games: u32,
    pub bot_first_wins: u32,
    pub bot_win_rate: f64,
    pub avg_game_length: f64,
    pub bot_avg_search_us: f64,
    pub games_per_second: f64,
    pub runtime_seconds: f64,
    pub timestamp: u64,
}

impl ArenaStats {
    /// Create new stats tracker writing to `stats_path`.
    pub fn new(stats_path: impl Into<PathBuf>, env_id: &str, opponent: &str) -> Self {
        let stats_path = stats_path.into();

        // Ensure data directory exists
        if let Some(dir) = stats_path.parent() {
            if let Err(e) = fs::create_dir_all(dir) {
                warn!("Failed to create data directory: {}", e);
            }
        }

        Self {
            games_played: AtomicU32::new(0),
            bot_wins: AtomicU32::new(0),
            opponent_wins: AtomicU32::new(0),
            draws: AtomicU32::new(0),
            bot_first_games: AtomicU32::new(0),
            bot_first_wins: AtomicU32::new(0),
            total_moves: AtomicU64::new(0),
            bot_searches: AtomicU64::new(0),
            bot_search_us: AtomicU64::new(0),
            start_time: Instant::now(),
            stats_path,
            env_id: env_id.to_string(),
            opponent: opponent.to_string(),
        }
    }

    /// Record a finished game.
    pub fn record_game(&self, outcome: GameOutcome, moves: u32, bot_moved_first: bool) {
        self.games_played.fetch_add(1, Ordering::Relaxed);
        self.total_moves.fetch_add(moves as u64, Ordering::Relaxed);

        let counter = match outcome {
            GameOutcome::BotWin => &self.bot_wins,
            GameOutcome::OpponentWin => &self.opponent_wins,
            GameOutcome::Draw => &self.draws,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        if bot_moved_first {
            self.bot_first_games.fetch_add(1, Ordering::Relaxed);
            if outcome == GameOutcome::BotWin {
                self.bot_first_wins.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Record the bot's search effort for a game.
    pub fn record_searches(&self, searches: u32, search_us: u64) {
        self.bot_searches
            .fetch_add(searches as u64, Ordering::Relaxed);
        self.bot_search_us.fetch_add(search_us, Ordering::Relaxed);
    }

    pub fn games_played(&self) -> u32 {
        self.games_played.load(Ordering::Relaxed)
    }

    /// Get a snapshot of current stats.
    pub fn snapshot(&self) -> ArenaStatsSnapshot {
        let games = self.games_played.load(Ordering::Relaxed);
        let bot_wins = self.bot_wins.load(Ordering::Relaxed);
        let total_moves = self.total_moves.load(Ordering::Relaxed);
        let searches = self.bot_searches.load(Ordering::Relaxed);
        let search_us = self.bot_search_us.load(Ordering::Relaxed);
        let runtime = self.start_time.elapsed().as_secs_f64();

        let (bot_win_rate, avg_game_length) = if games > 0 {
            (
                bot_wins as f64 / games as f64,
                total_moves as f64 / games as f64,
            )
        } else {
            (0.0, 0.0)
        };

        let bot_avg_search_us = if searches > 0 {
            search_us as f64 / searches as f64
        } else {
            0.0
        };

        let games_per_second = if runtime > 0.0 {
            games as f64 / runtime
        } else {
            0.0
        };

        ArenaStatsSnapshot {
            env_id: self.env_id.clone(),
            opponent: self.opponent.clone(),
            games_played: games,
            bot_wins,
            opponent_wins: self.opponent_wins.load(Ordering::Relaxed),
            draws: self.draws.load(Ordering::Relaxed),
            bot_first_games: self.bot_first_games.load(Ordering::Relaxed),
            bot_first_wins: self.bot_first_wins.load(Ordering::Relaxed),
            bot_win_rate,
            avg_game_length,
            bot_avg_search_us,
            games_per_second,
            runtime_seconds: runtime,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    /// Write stats to JSON file (atomic write-then-rename).
    pub fn write_stats(&self) {
        let snapshot = self.snapshot();

        let json = match serde_json::to_string_pretty(&snapshot) {
            Ok(j) => j,
            Err(e) => {
                warn!("Failed to serialize arena stats: {}", e);
                return;
            }
        };

        // Write to temp file then rename (atomic on most filesystems)
        let temp_path = self.stats_path.with_extension("json.tmp");
        match fs::File::create(&temp_path) {
            Ok(mut file) => {
                if let Err(e) = file.write_all(json.as_bytes()) {
                    warn!("Failed to write arena stats: {}", e);
                    return;
                }
            }
            Err(e) => {
                warn!("Failed to create temp stats file: {}", e);
                return;
            }
        }

        if let Err(e) = fs::rename(&temp_path, &self.stats_path) {
            warn!("Failed to rename stats file: {}", e);
            let _ = fs::remove_file(&temp_path);
            return;
        }

        debug!("Wrote arena stats to {}", self.stats_path.display());
    }

    pub fn stats_path(&self) -> &Path {
        &self.stats_path
    }
}
