//! Match loop pitting the MCTS bot against an opponent policy.

use anyhow::{anyhow, Context, Result};
use engine_core::Board;
use engine_games::GameKind;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::{Config, OpponentKind};
use crate::mcts_policy::MctsPolicy;
use crate::policy::{Policy, RandomPolicy};
use crate::stats::{ArenaStats, ArenaStatsSnapshot, GameOutcome};

/// One finished game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub outcome: GameOutcome,
    pub moves: u32,
    pub bot_moved_first: bool,
}

/// Play one game to the end. `bot` and `opponent` alternate, starting with
/// `bot` when `bot_first` is set. The outcome is read from the bot's side.
pub fn play_game<B: Board>(
    board: &B,
    mut state: B::State,
    bot: &mut MctsPolicy,
    opponent: &mut dyn Policy<B>,
    bot_first: bool,
) -> Result<GameRecord> {
    let first_player = board.current_player(&state);
    let (mut bot_player, mut opponent_player) = if bot_first {
        (Some(first_player), None)
    } else {
        (None, Some(first_player))
    };
    let mut moves = 0u32;

    while !board.is_ended(&state) {
        let bot_to_move = (moves % 2 == 0) == bot_first;
        let action = if bot_to_move {
            if bot_player.is_none() {
                bot_player = Some(board.current_player(&state));
            }
            Policy::<B>::select_action(bot, board, &state)?
        } else {
            if opponent_player.is_none() {
                opponent_player = Some(board.current_player(&state));
            }
            opponent.select_action(board, &state)?
        };

        state = board.next_state(&state, &action);
        moves += 1;
    }

    let points = board
        .points_values(&state)
        .ok_or_else(|| anyhow!("finished game has no outcome: {:?}", state))?;

    // One side may never have moved; the other side's identity still decides
    let winner = points
        .iter()
        .find(|(_, score)| **score == 1)
        .map(|(player, _)| player);
    let outcome = match (winner, bot_player.as_ref(), opponent_player.as_ref()) {
        (None, _, _) => GameOutcome::Draw,
        (Some(w), Some(bot), _) if w == bot => GameOutcome::BotWin,
        (Some(_), Some(_), _) => GameOutcome::OpponentWin,
        (Some(w), None, Some(opponent)) if w == opponent => GameOutcome::OpponentWin,
        (Some(_), None, _) => GameOutcome::BotWin,
    };

    Ok(GameRecord {
        outcome,
        moves,
        bot_moved_first: bot_first,
    })
}

/// Runs a series of games and keeps the stats file current.
pub struct Arena {
    config: Config,
    stats: ArenaStats,
    shutdown_signal: AtomicBool,
}

impl Arena {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let opponent = config.opponent_kind()?;
        let stats = ArenaStats::new(config.stats_path(), &config.env_id, opponent.as_str());

        Ok(Self {
            config,
            stats,
            shutdown_signal: AtomicBool::new(false),
        })
    }

    /// Ask the running series to stop after the current game.
    pub fn shutdown(&self) {
        self.shutdown_signal.store(true, Ordering::Relaxed);
        info!("Shutdown signal set");
    }

    pub fn stats(&self) -> &ArenaStats {
        &self.stats
    }

    /// Play the configured series on the configured game.
    pub fn run(&self) -> Result<ArenaStatsSnapshot> {
        let kind = self.config.game_kind()?;
        info!(
            game = kind.display_name(),
            games = self.config.games,
            opponent = %self.config.opponent,
            num_iterations = self.config.num_iterations,
            exploration = self.config.exploration,
            "Arena starting"
        );

        match kind {
            GameKind::TicTacToe => {
                self.run_series(&games_tictactoe::TicTacToe::new(), games_tictactoe::State::new)
            }
            GameKind::Connect4 => {
                self.run_series(&games_connect4::Connect4::new(), games_connect4::State::new)
            }
        }
    }

    fn run_series<B: Board>(
        &self,
        board: &B,
        initial_state: impl Fn() -> B::State,
    ) -> Result<ArenaStatsSnapshot> {
        let mcts_config = self.config.mcts_config();
        let seed = self.config.rng_seed();

        let mut bot = match seed {
            Some(seed) => MctsPolicy::with_seed(mcts_config.clone(), seed),
            None => MctsPolicy::new(mcts_config.clone()),
        };
        let opponent_seed = seed.map(|s| s.wrapping_add(1));
        let mut opponent: Box<dyn Policy<B>> = match self.config.opponent_kind()? {
            OpponentKind::Random => Box::new(match opponent_seed {
                Some(seed) => RandomPolicy::with_seed(seed),
                None => RandomPolicy::new(),
            }),
            OpponentKind::Mcts => Box::new(match opponent_seed {
                Some(seed) => MctsPolicy::with_seed(mcts_config, seed),
                None => MctsPolicy::new(mcts_config),
            }),
        };

        // Progress bar only when stderr is a TTY
        let progress = if self.config.games > 0
            && std::io::IsTerminal::is_terminal(&std::io::stderr())
        {
            let pb = ProgressBar::new(self.config.games as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} games ({eta})")
                    .context("invalid progress bar template")?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        for game_index in 0..self.config.games {
            if self.shutdown_signal.load(Ordering::Relaxed) {
                info!(
                    played = self.stats.games_played(),
                    "Shutdown signal received, stopping arena"
                );
                break;
            }

            // Alternate who opens so neither side keeps the first-move edge
            let bot_first = game_index % 2 == 0;
            let game_start = Instant::now();
            let record = play_game(
                board,
                initial_state(),
                &mut bot,
                opponent.as_mut(),
                bot_first,
            )
            .with_context(|| format!("game {} failed", game_index + 1))?;

            let totals = bot.take_totals();
            self.stats
                .record_game(record.outcome, record.moves, record.bot_moved_first);
            self.stats.record_searches(totals.searches, totals.total_us);

            let played = game_index + 1;
            debug!(
                game = played,
                opponent = opponent.name(),
                outcome = ?record.outcome,
                moves = record.moves,
                bot_first,
                duration = game_start.elapsed().as_secs_f64(),
                searches = totals.searches,
                iterations = totals.iterations,
                nodes_created = totals.nodes_created,
                rollout_plies = totals.rollout_plies,
                avg_search_us = totals.avg_search_us(),
                "Game completed"
            );

            if let Some(ref pb) = progress {
                pb.inc(1);
            }

            if self.config.log_interval > 0 && played % self.config.log_interval == 0 {
                let log_progress = || {
                    let snapshot = self.stats.snapshot();
                    info!(
                        games = snapshot.games_played,
                        bot_wins = snapshot.bot_wins,
                        opponent_wins = snapshot.opponent_wins,
                        draws = snapshot.draws,
                        win_rate = format!("{:.3}", snapshot.bot_win_rate),
                        avg_search_ms = format!("{:.1}", snapshot.bot_avg_search_us / 1000.0),
                        "Arena progress"
                    );
                };

                // Suspend progress bar while logging to avoid visual glitches
                match progress {
                    Some(ref pb) => pb.suspend(log_progress),
                    None => log_progress(),
                }
                self.stats.write_stats();
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }

        self.stats.write_stats();
        let snapshot = self.stats.snapshot();
        info!(
            games = snapshot.games_played,
            bot_wins = snapshot.bot_wins,
            opponent_wins = snapshot.opponent_wins,
            draws = snapshot.draws,
            stats_path = %self.stats.stats_path().display(),
            "Arena finished"
        );

        Ok(snapshot)
    }
}
