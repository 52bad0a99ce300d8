//! Monte Carlo position evaluation with random playouts.
//!
//! Every function takes its random stream explicitly, so independent
//! evaluators (one per thread, say) never share generator state and a fixed
//! seed reproduces a run exactly.

use std::ops::{Add, AddAssign};

use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::RolloutConfig;
use crate::error::{GameError, Result};
use crate::game::GameState;

/// Terminal result of a playout, from the point of view of the player who
/// was to move when the playout started.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Tie,
    Loss,
}

impl Outcome {
    /// `+1`, `0` or `-1`.
    #[inline]
    pub fn score(self) -> i8 {
        match self {
            Outcome::Win => 1,
            Outcome::Tie => 0,
            Outcome::Loss => -1,
        }
    }
}

/// Outcome counts over a batch of playouts.
///
/// Summaries add up field by field, so partial results can be merged in any
/// order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct RolloutSummary {
    pub wins: u64,
    pub losses: u64,
    pub ties: u64,
}

impl RolloutSummary {
    #[inline]
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Tie => self.ties += 1,
            Outcome::Loss => self.losses += 1,
        }
    }

    #[inline]
    pub fn trials(&self) -> u64 {
        self.wins + self.losses + self.ties
    }

    /// Mean score in `[-1, 1]`; `0.0` when nothing was recorded.
    pub fn mean(&self) -> f32 {
        let trials = self.trials();
        if trials == 0 {
            return 0.0;
        }
        ((self.wins as f64 - self.losses as f64) / trials as f64) as f32
    }
}

impl AddAssign for RolloutSummary {
    fn add_assign(&mut self, other: RolloutSummary) {
        self.wins += other.wins;
        self.losses += other.losses;
        self.ties += other.ties;
    }
}

impl Add for RolloutSummary {
    type Output = RolloutSummary;

    fn add(mut self, other: RolloutSummary) -> RolloutSummary {
        self += other;
        self
    }
}

/// Play shuffled legal moves on `state` until the game ends.
///
/// Before every move the line through the previous move is checked. A line
/// found while the starting player is to move means they lost; otherwise the
/// starting player's side made it. Once the shuffled moves run out the result
/// is a tie without another check, so a board filled by a winning move scores
/// 0. At most as many moves are made as there were empty tiles on entry.
pub fn random_play<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> Result<Outcome> {
    let starting_player = state.current_player();

    let mut moves = state.legal_moves();
    Board::shuffle_moves(&mut moves, rng);

    let mut outcome = Outcome::Tie;
    for coord in moves {
        if state.is_win() {
            // the player to move had the line completed against them
            outcome = if state.current_player() == starting_player {
                Outcome::Loss
            } else {
                Outcome::Win
            };
            break;
        }
        state.make_move(coord)?;
    }

    trace!(
        "playout finished after {} turns: {:?} for {}",
        state.turns_taken(),
        outcome,
        starting_player
    );
    Ok(outcome)
}

/// Run `iterations` playouts on copies of `position` and count the outcomes.
pub fn summarize<R: Rng + ?Sized>(
    position: &GameState,
    iterations: u32,
    rng: &mut R,
) -> Result<RolloutSummary> {
    if iterations == 0 {
        return Err(GameError::InvalidArgument(
            "rollout needs at least one iteration".to_string(),
        ));
    }

    let mut summary = RolloutSummary::default();
    for _ in 0..iterations {
        let mut game = position.clone();
        summary.record(random_play(&mut game, rng)?);
    }

    debug!(
        "rollout of {} trials: wins={} losses={} ties={} mean={:.4}",
        iterations,
        summary.wins,
        summary.losses,
        summary.ties,
        summary.mean()
    );
    Ok(summary)
}

/// Estimate the value of `position` for the player to move: the mean playout
/// score over `iterations` trials, in `[-1, 1]`. `position` is not modified.
pub fn rollout<R: Rng + ?Sized>(position: &GameState, iterations: u32, rng: &mut R) -> Result<f32> {
    Ok(summarize(position, iterations, rng)?.mean())
}

/// Rollout evaluator that owns its random stream.
pub struct RolloutEvaluator<R: Rng = ChaCha8Rng> {
    rng: R,
}

impl<R: Rng> RolloutEvaluator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// See [`random_play`].
    pub fn random_play(&mut self, state: &mut GameState) -> Result<Outcome> {
        random_play(state, &mut self.rng)
    }

    /// See [`summarize`].
    pub fn summarize(&mut self, position: &GameState, iterations: u32) -> Result<RolloutSummary> {
        summarize(position, iterations, &mut self.rng)
    }

    /// See [`rollout`].
    pub fn rollout(&mut self, position: &GameState, iterations: u32) -> Result<f32> {
        rollout(position, iterations, &mut self.rng)
    }
}

impl RolloutEvaluator<ChaCha8Rng> {
    /// Evaluator with a reproducible ChaCha8 stream.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Evaluator seeded from `config`, or from the thread RNG when the config
    /// has no seed. The seed in use is logged either way.
    pub fn from_config(config: &RolloutConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        debug!("rollout evaluator seed: {}", seed);
        Self::seeded(seed)
    }
}
