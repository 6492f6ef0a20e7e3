//! Cyclic permutation of point indices.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::geometry::DistanceOracle;

/// A Hamiltonian cycle over points `0..n`.
///
/// The last index implicitly connects back to the first. The sequence is
/// always a permutation of `0..n`: constructors validate it and the only
/// mutation, [`reverse_segment`](Tour::reverse_segment), preserves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    order: Vec<usize>,
}

impl Tour {
    /// Visits the points in input order.
    pub fn identity(n: usize) -> Self {
        Self {
            order: (0..n).collect(),
        }
    }

    /// Uniformly random visiting order drawn from `rng`.
    pub fn shuffled<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);
        Self { order }
    }

    /// Wraps an explicit visiting order, rejecting anything that is not a
    /// permutation of `0..order.len()`.
    pub fn from_order(order: Vec<usize>) -> Result<Self> {
        let tour = Self { order };
        if !tour.is_permutation() {
            return Err(Error::invalid_input(
                "tour order must contain every index 0..n exactly once",
            ));
        }
        Ok(tour)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Visiting order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn into_order(self) -> Vec<usize> {
        self.order
    }

    /// Total length of the closed tour.
    pub fn length<D: DistanceOracle + ?Sized>(&self, distances: &D) -> f64 {
        distances.tour_length(&self.order)
    }

    /// Length change caused by `reverse_segment(a, b)`, in O(1).
    ///
    /// Only the two edges entering and leaving the segment change:
    ///
    /// ```text
    /// delta = d(t[a-1], t[b]) + d(t[a], t[b+1]) - d(t[a-1], t[a]) - d(t[b], t[b+1])
    /// ```
    ///
    /// with positions taken modulo `n`. Reversing the whole tour only flips
    /// its direction, so that span yields exactly zero.
    ///
    /// # Panics
    ///
    /// If `a >= b` or `b >= n`.
    pub fn length_delta<D: DistanceOracle + ?Sized>(&self, distances: &D, a: usize, b: usize) -> f64 {
        let n = self.order.len();
        assert!(a < b && b < n, "invalid 2-opt segment ({a}, {b}) for n = {n}");
        if b - a + 1 == n {
            return 0.0;
        }

        let prev = self.order[(a + n - 1) % n];
        let first = self.order[a];
        let last = self.order[b];
        let next = self.order[(b + 1) % n];

        let removed = distances.distance(prev, first) + distances.distance(last, next);
        let added = distances.distance(prev, last) + distances.distance(first, next);
        added - removed
    }

    /// Reverses positions `a..=b` in place (the 2-opt move).
    ///
    /// # Panics
    ///
    /// If `a >= b` or `b >= n`.
    pub fn reverse_segment(&mut self, a: usize, b: usize) {
        let n = self.order.len();
        assert!(a < b && b < n, "invalid 2-opt segment ({a}, {b}) for n = {n}");
        self.order[a..=b].reverse();
    }

    /// Whether the order contains every index `0..n` exactly once.
    pub fn is_permutation(&self) -> bool {
        let n = self.order.len();
        let mut seen = vec![false; n];
        for &i in &self.order {
            if i >= n || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        true
    }
}
