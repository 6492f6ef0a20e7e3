//! Travelling salesman tours over planar points by simulated annealing
//! with periodic reheating.
//!
//! - **Geometry**: [`Point`] and the [`DistanceOracle`] trait, backed by a
//!   precomputed [`DistanceMatrix`] for moderate instances or computed on
//!   demand for large ones.
//! - **Tour**: a cyclic permutation with in-place 2-opt segment reversal
//!   and O(1) evaluation of the reversal's length change.
//! - **SA**: the annealing controller. Metropolis acceptance, pluggable
//!   cooling schedules, a temperature reset every `reheat_interval`
//!   iterations, and tracking of the best tour across all cycles.
//! - **Driver**: [`Solver`] owns the points and the seed, and exposes runs
//!   either as a final [`AnnealResult`] or as a lazy sequence of
//!   [`Snapshot`]s for progress reporting and animation.
//! - **Points**: delimited-file loading and random instance generation.
//!
//! The optimizer is single-threaded and does no console or file I/O; it
//! only emits [`log`] records.

pub mod driver;
pub mod error;
pub mod geometry;
pub mod points;
pub mod sa;
pub mod tour;

pub use driver::{Snapshots, Solver};
pub use error::{Error, Result};
pub use geometry::{DistanceMatrix, DistanceOracle, Distances, LazyDistances, Point};
pub use points::PointSource;
pub use sa::{
    AnnealConfig, AnnealResult, Annealer, CoolingSchedule, InitialTour, Phase, Snapshot,
    StopCondition,
};
pub use tour::{MoveProposer, Tour, TwoOptMove};
