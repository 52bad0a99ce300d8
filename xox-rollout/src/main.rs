//! XOX rollout driver
//!
//! Estimates the value of a position for the player to move by averaging
//! random playouts.

mod estimate;
mod stats;

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rand::Rng;
use xox_core::{Board, Coord, GameState, Player, RolloutConfig, RolloutEvaluator};

use crate::estimate::{Estimator, Report};

#[derive(Parser, Debug)]
#[command(name = "xox-rollout", version, about = "Monte Carlo estimate of an XOX position")]
struct Args {
    /// Tiles along each side of the board
    #[arg(long, default_value_t = 3)]
    size: u8,

    /// Board text, one X, O or _ per tile in row-major order
    #[arg(long)]
    board: Option<String>,

    /// Player to move (default: X if both have the same number of marks, else O)
    #[arg(long)]
    to_move: Option<Player>,

    /// Most recent move as x,y
    #[arg(long)]
    last_move: Option<Coord>,

    /// Playouts to run
    #[arg(long)]
    iterations: Option<u32>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Playouts between interrupt and progress checks
    #[arg(long)]
    batch_size: Option<u32>,

    /// Seconds between progress log lines
    #[arg(long)]
    log_interval: Option<u64>,

    /// JSON file with rollout settings; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn rollout_config(&self) -> Result<RolloutConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str::<RolloutConfig>(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => RolloutConfig::default(),
        };

        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(interval) = self.log_interval {
            config.log_interval_secs = interval;
        }
        config.validate().context("invalid rollout settings")?;
        Ok(config)
    }

    fn position(&self) -> Result<GameState> {
        let board = match &self.board {
            Some(text) => Board::from_text(self.size, text).context("invalid --board")?,
            None => Board::new(self.size).context("invalid --size")?,
        };

        let to_move = self.to_move.unwrap_or_else(|| {
            let x_count = board.bitset(Player::X).count_ones();
            let o_count = board.bitset(Player::O).count_ones();
            if x_count == o_count {
                Player::X
            } else {
                Player::O
            }
        });

        GameState::from_board(board, to_move, self.last_move).context("invalid position")
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = args.rollout_config()?;
    let position = args.position()?;

    // Pin the seed so it can be reported and replayed
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    config.seed = Some(seed);

    // Set up SIGINT handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        warn!("Interrupt received, stopping after the current batch...");
        r.store(false, Ordering::SeqCst);
    })
    .context("setting Ctrl-C handler")?;

    info!(
        "Estimating {}x{} position for {}: {} iterations, batch size {}, seed {}",
        position.size(),
        position.size(),
        position.current_player(),
        config.iterations,
        config.batch_size,
        seed
    );

    let mut estimator = Estimator::new(RolloutEvaluator::from_config(&config));
    let completed = estimator.run(&position, &config, &running)?;
    if !completed {
        warn!("Rollouts were interrupted before completion.");
    }

    let report = Report::new(&position, seed, &config, completed, estimator);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }
    Ok(())
}
