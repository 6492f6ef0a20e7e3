//! Distance oracles over a fixed point set.

use super::point::Point;

/// Default instance size up to which [`Distances::new`] precomputes the
/// full matrix. 4096² `f64` entries is 128 MiB.
pub const DEFAULT_MATRIX_LIMIT: usize = 4096;

/// Symmetric distance lookup between point indices.
///
/// Implementations must return a non-negative value with
/// `distance(i, j) == distance(j, i)` and `distance(i, i) == 0`.
/// Indices outside `0..len()` are a contract violation and panic.
pub trait DistanceOracle {
    /// Number of points addressed by this oracle.
    fn len(&self) -> usize;

    /// Distance between points `i` and `j`.
    fn distance(&self, i: usize, j: usize) -> f64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the closed tour visiting `order` and returning to its start.
    fn tour_length(&self, order: &[usize]) -> f64 {
        match order.len() {
            0 | 1 => 0.0,
            n => {
                let open: f64 = order
                    .windows(2)
                    .map(|w| self.distance(w[0], w[1]))
                    .sum();
                open + self.distance(order[n - 1], order[0])
            }
        }
    }
}

/// Precomputed N×N table of pairwise Euclidean distances.
///
/// Stored row-major in a single allocation. Built once, read-only after.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    pub fn from_points(points: &[Point]) -> Self {
        let n = points.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].distance(&points[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { n, data }
    }

    /// Row `i` of the matrix.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

impl DistanceOracle for DistanceMatrix {
    fn len(&self) -> usize {
        self.n
    }

    #[inline]
    fn distance(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "point index out of range");
        self.data[i * self.n + j]
    }
}

/// Computes distances on demand from the coordinates.
#[derive(Debug, Clone)]
pub struct LazyDistances {
    points: Vec<Point>,
}

impl LazyDistances {
    pub fn new(points: &[Point]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }
}

impl DistanceOracle for LazyDistances {
    fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    fn distance(&self, i: usize, j: usize) -> f64 {
        self.points[i].distance(&self.points[j])
    }
}

/// Distance oracle chosen by instance size.
#[derive(Debug, Clone)]
pub enum Distances {
    Matrix(DistanceMatrix),
    Lazy(LazyDistances),
}

impl Distances {
    /// Precomputes the full matrix when `points.len() <= matrix_limit`,
    /// otherwise falls back to lazy evaluation.
    pub fn new(points: &[Point], matrix_limit: usize) -> Self {
        if points.len() <= matrix_limit {
            Distances::Matrix(DistanceMatrix::from_points(points))
        } else {
            Distances::Lazy(LazyDistances::new(points))
        }
    }

    pub fn is_precomputed(&self) -> bool {
        matches!(self, Distances::Matrix(_))
    }
}

impl DistanceOracle for Distances {
    fn len(&self) -> usize {
        match self {
            Distances::Matrix(m) => m.len(),
            Distances::Lazy(l) => l.len(),
        }
    }

    #[inline]
    fn distance(&self, i: usize, j: usize) -> f64 {
        match self {
            Distances::Matrix(m) => m.distance(i, j),
            Distances::Lazy(l) => l.distance(i, j),
        }
    }
}
