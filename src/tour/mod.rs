//! Tour representation and the 2-opt neighborhood.
//!
//! A [`Tour`] is a cyclic permutation of point indices. The only mutation
//! it allows is [`Tour::reverse_segment`], the 2-opt move, whose effect on
//! the tour length is available in O(1) through [`Tour::length_delta`].
//! [`MoveProposer`] draws random, non-degenerate moves.
//!
//! # References
//!
//! - Croes (1958), "A Method for Solving Traveling-Salesman Problems"

mod moves;
#[allow(clippy::module_inception)]
mod tour;

pub use moves::{MoveProposer, TwoOptMove};
pub use tour::Tour;
