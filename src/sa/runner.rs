//! Annealing control loop.
//!
//! # Algorithm
//!
//! 1. Start from the given tour at `T_0`; it is also the first best tour
//! 2. At each iteration `t`:
//!    a. If `t` is a positive multiple of the reheat interval, reset `T = T_0`;
//!       otherwise cool `T` by one schedule step
//!    b. Propose a random 2-opt move and evaluate its delta in O(1)
//!    c. Accept by the Metropolis criterion and apply the reversal
//!    d. Update the best tour if the current one is shorter
//! 3. Stop when the iteration budget is spent or the stop flag is raised

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, trace};
use rand::Rng;

use super::config::{AnnealConfig, StopCondition};
use super::types::{AnnealResult, Phase, Snapshot};
use crate::error::{Error, Result};
use crate::geometry::DistanceOracle;
use crate::tour::{MoveProposer, Tour};

/// Metropolis acceptance test.
///
/// Non-worsening moves (`delta <= 0`) are always accepted and consume no
/// randomness. A worsening move is accepted iff a uniform draw from
/// `[0, 1)` is below `exp(-delta / temperature)`.
pub fn metropolis_accept<R: Rng + ?Sized>(delta: f64, temperature: f64, rng: &mut R) -> bool {
    if delta <= 0.0 {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    let probability = (-delta / temperature).exp();
    rng.random::<f64>() < probability
}

/// Reheating simulated annealing over one tour.
///
/// The annealer is an [`Iterator`] of [`Snapshot`]s: every call to
/// [`next`](Iterator::next) runs exactly one iteration, so callers drive the
/// search at their own pace. [`run`](Annealer::run) drains it and returns the
/// [`AnnealResult`].
pub struct Annealer<'d, D: DistanceOracle + ?Sized, R: Rng> {
    distances: &'d D,
    config: AnnealConfig,
    rng: R,
    proposer: MoveProposer,
    cancel: Option<Arc<AtomicBool>>,

    tour: Tour,
    current_length: f64,
    best: Arc<[usize]>,
    best_length: f64,

    temperature: f64,
    iteration: usize,
    phase: Phase,
    cycle_best: f64,

    accepted_moves: usize,
    improving_moves: usize,
    reheats: usize,
    cancelled: bool,
    cost_history: Vec<f64>,
}

impl<'d, D: DistanceOracle + ?Sized, R: Rng> Annealer<'d, D, R> {
    /// Prepares a run starting from `tour`.
    ///
    /// Fails with [`Error::DegenerateInput`] for fewer than 2 points and with
    /// [`Error::InvalidConfig`] for an invalid configuration or a tour that
    /// does not match the oracle's point count.
    pub fn new(distances: &'d D, tour: Tour, config: AnnealConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let n = distances.len();
        if n < 2 {
            return Err(Error::DegenerateInput(n));
        }
        if tour.len() != n {
            return Err(Error::invalid_config(format!(
                "tour has {} positions but the point set has {n}",
                tour.len()
            )));
        }

        let current_length = tour.length(distances);
        let best: Arc<[usize]> = Arc::from(tour.order());

        Ok(Self {
            distances,
            proposer: MoveProposer::new(n),
            rng,
            cancel: None,
            tour,
            current_length,
            best,
            best_length: current_length,
            temperature: config.initial_temperature,
            iteration: 0,
            phase: Phase::Running,
            cycle_best: current_length,
            accepted_moves: 0,
            improving_moves: 0,
            reheats: 0,
            cancelled: false,
            cost_history: vec![current_length],
            config,
        })
    }

    /// Polls `flag` once per iteration and stops as soon as it is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &AnnealConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of iterations executed so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Temperature of the most recent iteration, or `T_0` before the first.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    pub fn current_length(&self) -> f64 {
        self.current_length
    }

    pub fn best_tour(&self) -> &[usize] {
        &self.best
    }

    pub fn best_length(&self) -> f64 {
        self.best_length
    }

    /// Executes one iteration. Returns `None` once the run is [`Phase::Done`].
    pub fn step(&mut self) -> Option<Snapshot> {
        let accepted = self.advance()?;
        Some(Snapshot {
            iteration: self.iteration - 1,
            phase: self.phase,
            temperature: self.temperature,
            accepted,
            current_length: self.current_length,
            best_length: self.best_length,
            best_tour: Arc::clone(&self.best),
        })
    }

    /// Runs to completion and returns the best tour found.
    ///
    /// With [`StopCondition::External`] and no cancellation flag this never
    /// returns; pull snapshots instead.
    pub fn run(mut self) -> AnnealResult {
        while self.advance().is_some() {}
        self.into_result()
    }

    /// Consumes the annealer and reports the best tour found so far.
    pub fn into_result(self) -> AnnealResult {
        let mut cost_history = self.cost_history;
        if cost_history
            .last()
            .is_none_or(|&last| (last - self.best_length).abs() > 1e-15)
        {
            cost_history.push(self.best_length);
        }

        let best_tour = self.best.to_vec();
        let best_length = self.distances.tour_length(&best_tour);

        AnnealResult {
            best_tour,
            best_length,
            iterations: self.iteration,
            accepted_moves: self.accepted_moves,
            improving_moves: self.improving_moves,
            reheats: self.reheats,
            final_temperature: self.temperature,
            cancelled: self.cancelled,
            cost_history,
        }
    }

    fn should_stop(&mut self) -> bool {
        if let Some(ref flag) = self.cancel {
            if flag.load(Ordering::Relaxed) {
                self.cancelled = true;
                return true;
            }
        }
        match self.config.stop {
            StopCondition::Iterations(budget) => self.iteration >= budget,
            StopCondition::External => false,
        }
    }

    /// One iteration of the state machine. Returns whether the move was
    /// accepted, or `None` when done.
    fn advance(&mut self) -> Option<bool> {
        if self.phase == Phase::Done {
            return None;
        }
        if self.should_stop() {
            self.phase = Phase::Done;
            debug!(
                "annealing done after {} iterations: best {:.6}",
                self.iteration, self.best_length
            );
            return None;
        }

        let t = self.iteration;
        let k = t % self.config.reheat_interval;
        if t == 0 {
            self.phase = Phase::Running;
        } else if k == 0 {
            self.temperature = self.config.initial_temperature;
            self.phase = Phase::Reheating;
            self.reheats += 1;
            // Re-anchor the delta-accumulated length once per cycle.
            self.current_length = self.tour.length(self.distances);
            debug!(
                "reheat #{} at iteration {t}: cycle best {:.6}, overall best {:.6}",
                self.reheats, self.cycle_best, self.best_length
            );
            self.cycle_best = self.current_length;
        } else {
            self.temperature = self.config.cool(self.temperature, k);
            self.phase = Phase::Running;
        }

        let mv = self.proposer.propose(&mut self.rng);
        let delta = self.tour.length_delta(self.distances, mv.a, mv.b);

        let accepted = metropolis_accept(delta, self.temperature, &mut self.rng);
        if accepted {
            self.tour.reverse_segment(mv.a, mv.b);
            self.current_length += delta;
            self.accepted_moves += 1;
            if delta < 0.0 {
                self.improving_moves += 1;
            }
        }

        if self.current_length < self.best_length {
            self.best_length = self.current_length;
            self.best = Arc::from(self.tour.order());
            trace!("new best {:.6} at iteration {t}", self.best_length);
        }
        if self.current_length < self.cycle_best {
            self.cycle_best = self.current_length;
        }

        self.iteration += 1;
        if self.iteration % self.config.history_interval == 0 {
            self.cost_history.push(self.best_length);
        }

        Some(accepted)
    }
}

impl<D: DistanceOracle + ?Sized, R: Rng> Iterator for Annealer<'_, D, R> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        self.step()
    }
}
