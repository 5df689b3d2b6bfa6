//! Arena - bot-vs-bot match runner for Arbor
//!
//! A headless process that:
//! 1. Loads settings from config.toml, environment and command line
//! 2. Plays a series of games between a vanilla MCTS bot and an opponent
//! 3. Writes outcome statistics to `<data_dir>/arena_stats.json`

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

mod arena;
mod config;
mod mcts_policy;
mod policy;
mod stats;

use crate::arena::Arena;
use crate::config::Config;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse and validate configuration
    let config = Config::parse();
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    info!(
        "Starting arena: {} games of {} against {}",
        config.games, config.env_id, config.opponent
    );

    let arena = Arc::new(Arena::new(config)?);

    // Setup graceful shutdown
    let shutdown_arena = Arc::clone(&arena);
    let shutdown_handle = tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, stopping after the current game...");
                shutdown_arena.shutdown();
            }
            Err(e) => warn!("Failed to listen for ctrl+c: {}", e),
        }
    });

    // Searches are CPU-bound; keep them off the async workers
    let run_arena = Arc::clone(&arena);
    let run_result = tokio::task::spawn_blocking(move || run_arena.run())
        .await
        .context("arena task panicked")?;

    shutdown_handle.abort();

    match run_result {
        Ok(snapshot) => {
            info!(
                games = snapshot.games_played,
                win_rate = format!("{:.3}", snapshot.bot_win_rate),
                stats_path = %arena.stats().stats_path().display(),
                "Arena completed successfully"
            );
            Ok(())
        }
        Err(e) => {
            error!("Arena failed: {:#}", e);
            Err(e)
        }
    }
}
