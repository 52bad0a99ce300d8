//! Batched Monte Carlo estimation with interrupt and progress checks.

use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use xox_core::{Coord, GameState, GameStatus, Player, Result, RolloutConfig, RolloutEvaluator, RolloutSummary};

use crate::stats::RolloutStats;

/// Runs rollouts from one position in batches.
///
/// Between batches the `running` flag is checked and progress is logged, so
/// an interrupted run still has a usable partial estimate.
pub struct Estimator<R: Rng = ChaCha8Rng> {
    evaluator: RolloutEvaluator<R>,
    /// Estimator statistics
    pub stats: RolloutStats,
}

impl<R: Rng> Estimator<R> {
    pub fn new(evaluator: RolloutEvaluator<R>) -> Self {
        Self {
            evaluator,
            stats: RolloutStats::new(),
        }
    }

    /// Run `config.iterations` playouts of `position`.
    ///
    /// Returns false if interrupted before all iterations finished.
    pub fn run(
        &mut self,
        position: &GameState,
        config: &RolloutConfig,
        running: &AtomicBool,
    ) -> Result<bool> {
        config.validate()?;
        let target = config.iterations as u64;

        while self.stats.trials() < target {
            if !running.load(Ordering::SeqCst) {
                debug!("interrupted after {} trials", self.stats.trials());
                return Ok(false);
            }

            let batch_len = (target - self.stats.trials()).min(config.batch_size as u64);
            let mut batch = RolloutSummary::default();
            let mut moves = 0u64;
            for _ in 0..batch_len {
                let mut state = position.clone();
                let outcome = self.evaluator.random_play(&mut state)?;
                moves += (state.turns_taken() - position.turns_taken()) as u64;
                batch.record(outcome);
            }
            self.stats.record_batch(batch, moves);

            if self.stats.should_log(config.log_interval_secs) {
                self.stats.log_progress(config.iterations);
            }
        }
        Ok(true)
    }

    /// Mean outcome so far, in [-1, 1] for the player to move.
    pub fn estimate(&self) -> f32 {
        self.stats.summary.mean()
    }
}

/// Final result of a driver run, printed as text or JSON.
#[derive(Debug, Serialize)]
pub struct Report {
    pub size: u8,
    pub board: String,
    pub to_move: Player,
    pub last_move: Option<Coord>,
    pub status: GameStatus,
    pub seed: u64,
    pub iterations: u32,
    pub completed: bool,
    pub estimate: f32,
    pub elapsed_secs: f64,
    pub stats: RolloutStats,
}

impl Report {
    pub fn new<R: Rng>(
        position: &GameState,
        seed: u64,
        config: &RolloutConfig,
        completed: bool,
        estimator: Estimator<R>,
    ) -> Self {
        Self {
            size: position.size(),
            board: position.board().to_text(),
            to_move: position.current_player(),
            last_move: position.last_move(),
            status: position.status(),
            seed,
            iterations: config.iterations,
            completed,
            estimate: estimator.estimate(),
            elapsed_secs: estimator.stats.elapsed_secs(),
            stats: estimator.stats,
        }
    }

    /// Print the position and estimate for a human reader
    pub fn print(&self) {
        let position = xox_core::Board::from_text(self.size, &self.board);
        if let Ok(board) = position {
            print!("{}", board);
        }
        println!();
        println!("To move: {}", self.to_move);
        if let Some(last) = self.last_move {
            println!("Last move: {}", last);
        }
        println!("Status: {}", describe_status(self.status));
        println!("Seed: {}", self.seed);
        println!();
        self.stats.print_summary();
        println!("Time: {:.2}s", self.elapsed_secs);
        println!();
        if self.completed {
            println!("Estimate for {}: {:+.4}", self.to_move, self.estimate);
        } else {
            println!(
                "Estimate for {}: {:+.4} (interrupted after {} of {} trials)",
                self.to_move,
                self.estimate,
                self.stats.trials(),
                self.iterations
            );
        }
    }
}

fn describe_status(status: GameStatus) -> String {
    match status {
        GameStatus::InProgress => "in progress".to_string(),
        GameStatus::Won(player) => format!("won by {}", player),
        GameStatus::Tie => "tie".to_string(),
    }
}
