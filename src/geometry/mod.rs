//! Points and distance evaluation.
//!
//! The optimizer only ever asks for `distance(i, j)` between point indices,
//! through the [`DistanceOracle`] trait. Two implementations exist:
//!
//! - [`DistanceMatrix`]: all pairs precomputed, O(N²) memory, O(1) lookups.
//! - [`LazyDistances`]: Euclidean distance computed on every lookup.
//!
//! [`Distances`] picks one of them from the instance size.

mod distance;
mod point;

pub use distance::{DistanceMatrix, DistanceOracle, Distances, LazyDistances, DEFAULT_MATRIX_LIMIT};
pub use point::Point;
