//! Rollout statistics tracking.

use std::time::Instant;

use log::info;
use serde::Serialize;
use xox_core::RolloutSummary;

/// Statistics collected while running rollouts.
#[derive(Debug, Default, Serialize)]
pub struct RolloutStats {
    /// Outcome counts from the point of view of the player to move
    pub summary: RolloutSummary,

    /// Batches completed
    pub batches: u64,

    /// Total moves made across all playouts
    pub moves_played: u64,

    /// For rate calculation
    #[serde(skip)]
    start_time: Option<Instant>,
    #[serde(skip)]
    last_log_time: Option<Instant>,
    #[serde(skip)]
    last_log_trials: u64,
}

impl RolloutStats {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            last_log_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Fold a finished batch into the totals
    pub fn record_batch(&mut self, batch: RolloutSummary, moves: u64) {
        self.summary += batch;
        self.batches += 1;
        self.moves_played += moves;
    }

    pub fn trials(&self) -> u64 {
        self.summary.trials()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|s| s.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Get current trials per second
    pub fn trials_per_sec(&self) -> f64 {
        let elapsed = self.elapsed_secs();
        if elapsed > 0.0 {
            self.trials() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Average playout length in moves
    pub fn mean_moves(&self) -> f64 {
        match self.trials() {
            0 => 0.0,
            trials => self.moves_played as f64 / trials as f64,
        }
    }

    /// Check if we should log progress
    pub fn should_log(&self, interval_secs: u64) -> bool {
        if let Some(last) = self.last_log_time {
            last.elapsed().as_secs() >= interval_secs
        } else {
            true
        }
    }

    /// Log progress and reset log timer
    pub fn log_progress(&mut self, target: u32) {
        let now = Instant::now();
        let elapsed_total = self.start_time.map(|s| s.elapsed().as_secs()).unwrap_or(0);

        // Rate since last log
        let rate = if let Some(last) = self.last_log_time {
            let elapsed = last.elapsed().as_secs_f64();
            let trials = self.trials() - self.last_log_trials;
            if elapsed > 0.0 {
                trials as f64 / elapsed
            } else {
                0.0
            }
        } else {
            self.trials_per_sec()
        };

        let done_pct = if target > 0 {
            100.0 * self.trials() as f64 / target as f64
        } else {
            0.0
        };

        info!(
            "[{:02}:{:02}:{:02}] trials={}/{} ({:.1}%) rate={:.0}/s estimate={:+.4}",
            elapsed_total / 3600,
            (elapsed_total % 3600) / 60,
            elapsed_total % 60,
            self.trials(),
            target,
            done_pct,
            rate,
            self.summary.mean(),
        );
        info!(
            "           outcomes: win={} loss={} tie={}",
            self.summary.wins, self.summary.losses, self.summary.ties
        );

        self.last_log_time = Some(now);
        self.last_log_trials = self.trials();
    }

    /// Print final summary
    pub fn print_summary(&self) {
        println!("Trials: {}", self.trials());
        println!("  - Wins: {}", self.summary.wins);
        println!("  - Losses: {}", self.summary.losses);
        println!("  - Ties: {}", self.summary.ties);
        println!("Batches: {}", self.batches);
        println!("Average playout length: {:.1} moves", self.mean_moves());

        let elapsed = self.elapsed_secs();
        if elapsed > 0.0 {
            println!("Average rate: {:.0} trials/sec", self.trials_per_sec());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xox_core::Outcome;

    #[test]
    fn test_record_batch() {
        let mut stats = RolloutStats::new();
        let mut batch = RolloutSummary::default();
        batch.record(Outcome::Win);
        batch.record(Outcome::Tie);
        stats.record_batch(batch, 10);

        let mut batch = RolloutSummary::default();
        batch.record(Outcome::Loss);
        stats.record_batch(batch, 2);

        assert_eq!(stats.trials(), 3);
        assert_eq!(stats.batches, 2);
        assert_eq!(stats.summary.wins, 1);
        assert_eq!(stats.summary.losses, 1);
        assert_eq!(stats.summary.ties, 1);
        assert!((stats.mean_moves() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_should_log() {
        let stats = RolloutStats::new();
        assert!(stats.should_log(0));
        assert!(!stats.should_log(3600));
        assert!(RolloutStats::default().should_log(3600));
    }

    #[test]
    fn test_empty_stats() {
        let stats = RolloutStats::new();
        assert_eq!(stats.trials(), 0);
        assert_eq!(stats.mean_moves(), 0.0);
    }
}
