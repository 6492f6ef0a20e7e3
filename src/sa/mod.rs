//! Simulated Annealing (SA) with periodic reheating.
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Worsening 2-opt moves are accepted with a probability
//! that shrinks as the temperature cools; every `reheat_interval`
//! iterations the temperature is reset so the search can leave the basin it
//! has frozen into, while the best tour across all cycles is retained.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod config;
mod runner;
mod types;

pub use config::{AnnealConfig, CoolingSchedule, InitialTour, StopCondition};
pub use runner::{metropolis_accept, Annealer};
pub use types::{AnnealResult, Phase, Snapshot};
