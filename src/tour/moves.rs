//! Random 2-opt move generation.

use rand::Rng;

/// Reversal of tour positions `a..=b`, with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoOptMove {
    pub a: usize,
    pub b: usize,
}

/// Draws uniformly random, non-degenerate 2-opt moves for tours of a fixed
/// size.
#[derive(Debug, Clone, Copy)]
pub struct MoveProposer {
    n: usize,
}

impl MoveProposer {
    /// # Panics
    ///
    /// If `n < 2`; no move exists on such a tour.
    pub fn new(n: usize) -> Self {
        assert!(n >= 2, "2-opt moves need at least 2 positions, got {n}");
        Self { n }
    }

    pub fn tour_len(&self) -> usize {
        self.n
    }

    /// Draws two distinct cut positions and orders them.
    ///
    /// The second position is drawn from the remaining `n - 1` slots, so
    /// identical cuts never occur. On tours with more than three points the
    /// whole-tour span `(0, n - 1)` is redrawn, since reversing the entire
    /// cycle leaves every edge in place.
    pub fn propose<R: Rng + ?Sized>(&self, rng: &mut R) -> TwoOptMove {
        loop {
            let x = rng.random_range(0..self.n);
            let mut y = rng.random_range(0..self.n - 1);
            if y >= x {
                y += 1;
            }
            let (a, b) = if x < y { (x, y) } else { (y, x) };

            if self.n > 3 && a == 0 && b == self.n - 1 {
                continue;
            }
            return TwoOptMove { a, b };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_moves_are_ordered_and_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in 2..12 {
            let proposer = MoveProposer::new(n);
            for _ in 0..500 {
                let mv = proposer.propose(&mut rng);
                assert!(mv.a < mv.b, "unordered move {mv:?}");
                assert!(mv.b < n);
                if n > 3 {
                    assert!(!(mv.a == 0 && mv.b == n - 1));
                }
            }
        }
    }

    #[test]
    fn test_two_points_only_move() {
        let mut rng = StdRng::seed_from_u64(1);
        let proposer = MoveProposer::new(2);
        for _ in 0..20 {
            assert_eq!(proposer.propose(&mut rng), TwoOptMove { a: 0, b: 1 });
        }
    }

    #[test]
    fn test_covers_all_valid_pairs() {
        let n = 6;
        let proposer = MoveProposer::new(n);
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = vec![vec![false; n]; n];
        for _ in 0..5000 {
            let mv = proposer.propose(&mut rng);
            seen[mv.a][mv.b] = true;
        }
        for a in 0..n {
            for b in (a + 1)..n {
                let expected = !(a == 0 && b == n - 1);
                assert_eq!(seen[a][b], expected, "pair ({a}, {b})");
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_single_point_rejected() {
        MoveProposer::new(1);
    }
}
