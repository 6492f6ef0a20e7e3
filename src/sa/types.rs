//! Controller phases and per-iteration snapshots.

use std::sync::Arc;

/// Phase of the annealing state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Cooling within a reheat cycle.
    Running,
    /// The iteration started a new cycle at the initial temperature.
    Reheating,
    /// Budget exhausted or stop signal observed. No further mutation.
    Done,
}

/// State after one annealing iteration.
///
/// `best_tour` is shared with the controller and only reallocated when the
/// best tour changes, so holding on to many snapshots is cheap.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Zero-based index of the iteration that produced this snapshot.
    pub iteration: usize,
    /// [`Phase::Reheating`] on the first iteration of every cycle after the
    /// first, [`Phase::Running`] otherwise.
    pub phase: Phase,
    /// Temperature used by this iteration.
    pub temperature: f64,
    /// Whether the proposed move was applied.
    pub accepted: bool,
    /// Length of the current tour after this iteration.
    pub current_length: f64,
    /// Length of the best tour seen so far.
    pub best_length: f64,
    /// Best tour seen so far.
    pub best_tour: Arc<[usize]>,
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealResult {
    /// Visiting order of the best tour found.
    pub best_tour: Vec<usize>,

    /// Length of the best tour, recomputed from scratch.
    pub best_length: f64,

    /// Total number of iterations executed.
    pub iterations: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Number of temperature resets.
    pub reheats: usize,

    /// Temperature of the last executed iteration.
    pub final_temperature: f64,

    /// Whether the run stopped on the external signal.
    pub cancelled: bool,

    /// Best length sampled at regular intervals.
    pub cost_history: Vec<f64>,
}
