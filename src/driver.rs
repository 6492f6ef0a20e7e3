//! Run driver: owns the point set, the distance oracle and the seed.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::geometry::{Distances, Point};
use crate::sa::{AnnealConfig, AnnealResult, Annealer, InitialTour, StopCondition};
use crate::tour::Tour;

/// Lazy snapshot sequence of one run; see [`Solver::snapshots`].
pub type Snapshots<'a> = Annealer<'a, Distances, StdRng>;

/// Prepares and executes annealing runs over a fixed point set.
///
/// Every run builds its own random source from the solver's seed, so
/// [`run`](Solver::run) and [`snapshots`](Solver::snapshots) are
/// repeatable and independent of each other.
///
/// # Examples
///
/// ```
/// use tsp_anneal::{AnnealConfig, Point, Solver};
///
/// let points = vec![
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ];
/// let config = AnnealConfig::default()
///     .with_reheat_interval(50)
///     .with_max_iterations(500)
///     .with_seed(1);
/// let solver = Solver::new(points, config).unwrap();
/// let result = solver.run().unwrap();
/// assert!(result.best_length <= 4.000001);
/// ```
#[derive(Debug, Clone)]
pub struct Solver {
    points: Vec<Point>,
    distances: Distances,
    config: AnnealConfig,
    seed: u64,
}

impl Solver {
    /// Validates the input and builds the distance oracle.
    ///
    /// Fails with [`Error::DegenerateInput`] when fewer than 2 points are
    /// given. A seed is drawn from OS entropy when the config has none; it is
    /// available through [`seed`](Solver::seed) so the run can be replayed.
    pub fn new(points: Vec<Point>, config: AnnealConfig) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::DegenerateInput(points.len()));
        }
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let distances = Distances::new(&points, config.matrix_limit);
        info!(
            "prepared {} points ({} distances), seed {seed}",
            points.len(),
            if distances.is_precomputed() { "precomputed" } else { "lazy" }
        );

        Ok(Self {
            points,
            distances,
            config,
            seed,
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn distances(&self) -> &Distances {
        &self.distances
    }

    pub fn config(&self) -> &AnnealConfig {
        &self.config
    }

    /// Seed of every run started by this solver.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Starts a fresh run and returns it as a lazy snapshot iterator.
    ///
    /// Nothing is computed until the iterator is polled. Calling this again
    /// restarts from the same seed and yields the same sequence.
    pub fn snapshots(&self) -> Snapshots<'_> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let n = self.points.len();
        let tour = match self.config.initial_tour {
            InitialTour::Identity => Tour::identity(n),
            InitialTour::Shuffled => Tour::shuffled(n, &mut rng),
        };
        match Annealer::new(&self.distances, tour, self.config.clone(), rng) {
            Ok(annealer) => annealer,
            // Point count and config were validated in `new`.
            Err(e) => unreachable!("solver invariants violated: {e}"),
        }
    }

    /// Runs to the iteration budget.
    ///
    /// Fails with [`Error::InvalidConfig`] under [`StopCondition::External`],
    /// which needs [`run_with_cancel`](Solver::run_with_cancel).
    pub fn run(&self) -> Result<AnnealResult> {
        if self.config.stop == StopCondition::External {
            return Err(Error::invalid_config(
                "external stop condition requires a cancellation flag",
            ));
        }
        Ok(self.finish(self.snapshots().run()))
    }

    /// Runs until the budget is spent or `cancel` is raised.
    pub fn run_with_cancel(&self, cancel: Arc<AtomicBool>) -> AnnealResult {
        self.finish(self.snapshots().with_cancel(cancel).run())
    }

    fn finish(&self, result: AnnealResult) -> AnnealResult {
        info!(
            "best length {:.6} after {} iterations ({} reheats, {} accepted){}",
            result.best_length,
            result.iterations,
            result.reheats,
            result.accepted_moves,
            if result.cancelled { ", stopped early" } else { "" }
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DistanceOracle;
    use crate::points::random_points;
    use crate::sa::{CoolingSchedule, Snapshot};
    use std::sync::atomic::Ordering;

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    fn random_instance(n: usize, seed: u64) -> Vec<Point> {
        random_points(n, &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_unit_square_scenario() {
        for seed in [0, 1, 42, 1234] {
            let config = AnnealConfig::default()
                .with_reheat_interval(50)
                .with_max_iterations(500)
                .with_seed(seed);
            let result = Solver::new(unit_square(), config).unwrap().run().unwrap();
            assert!(
                result.best_length <= 4.000001,
                "seed {seed}: got {}",
                result.best_length
            );
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        let err = Solver::new(vec![], AnnealConfig::default()).unwrap_err();
        assert!(matches!(err, Error::DegenerateInput(0)));
        let err = Solver::new(vec![Point::new(1.0, 2.0)], AnnealConfig::default()).unwrap_err();
        assert!(matches!(err, Error::DegenerateInput(1)));
        assert!(err.to_string().contains("at least 2 points"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnnealConfig::default().with_reheat_interval(0);
        assert!(matches!(
            Solver::new(unit_square(), config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_identical_seed_identical_result() {
        let points = random_instance(60, 77);
        let config = AnnealConfig::default()
            .with_reheat_interval(100)
            .with_max_iterations(5_000)
            .with_seed(99);
        let a = Solver::new(points.clone(), config.clone()).unwrap().run().unwrap();
        let b = Solver::new(points, config).unwrap().run().unwrap();

        assert_eq!(a.best_tour, b.best_tour);
        assert_eq!(a.best_length.to_bits(), b.best_length.to_bits());
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn test_snapshots_restartable() {
        let config = AnnealConfig::default()
            .with_reheat_interval(30)
            .with_max_iterations(300)
            .with_seed(5);
        let solver = Solver::new(random_instance(20, 3), config).unwrap();

        let first: Vec<Snapshot> = solver.snapshots().collect();
        let second: Vec<Snapshot> = solver.snapshots().collect();
        assert_eq!(first.len(), 300);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.iteration, b.iteration);
            assert_eq!(a.best_tour, b.best_tour);
            assert_eq!(a.best_length.to_bits(), b.best_length.to_bits());
        }

        let result = solver.run().unwrap();
        let last = first.last().unwrap();
        assert_eq!(&result.best_tour[..], &last.best_tour[..]);
    }

    #[test]
    fn test_snapshots_are_lazy() {
        let config = AnnealConfig::default().with_stop(StopCondition::External).with_seed(2);
        let solver = Solver::new(random_instance(15, 2), config).unwrap();
        let taken: Vec<Snapshot> = solver.snapshots().take(25).collect();
        assert_eq!(taken.len(), 25);
        assert_eq!(taken[24].iteration, 24);
    }

    #[test]
    fn test_external_stop_requires_flag() {
        let config = AnnealConfig::default().with_stop(StopCondition::External);
        let solver = Solver::new(unit_square(), config).unwrap();
        assert!(matches!(solver.run(), Err(Error::InvalidConfig(_))));

        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let handle = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            flag.store(true, Ordering::Relaxed);
        });
        let result = solver.run_with_cancel(cancel);
        handle.join().unwrap();
        assert!(result.cancelled);
        assert!(result.iterations > 0);
        assert!(result.best_length <= 4.000001);
    }

    #[test]
    fn test_lazy_distances_match_matrix_run() {
        let points = random_instance(30, 8);
        let config = AnnealConfig::default()
            .with_cooling(CoolingSchedule::Geometric { alpha: 0.99 })
            .with_max_iterations(2_000)
            .with_seed(4);
        let matrix = Solver::new(points.clone(), config.clone()).unwrap();
        let lazy = Solver::new(points, config.with_matrix_limit(0)).unwrap();
        assert!(matrix.distances().is_precomputed());
        assert!(!lazy.distances().is_precomputed());

        let a = matrix.run().unwrap();
        let b = lazy.run().unwrap();
        assert_eq!(a.best_tour, b.best_tour);
        assert!((lazy.distances().tour_length(&b.best_tour) - b.best_length).abs() < 1e-9);
    }

    #[test]
    fn test_identity_initial_tour() {
        let config = AnnealConfig::default()
            .with_initial_tour(InitialTour::Identity)
            .with_max_iterations(1)
            .with_seed(0);
        let solver = Solver::new(unit_square(), config).unwrap();
        let first = solver.snapshots().next().unwrap();
        assert_eq!(first.iteration, 0);
        // The identity order of the square is already optimal.
        assert!((first.best_length - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_random_seed_is_reported() {
        let solver = Solver::new(unit_square(), AnnealConfig::default()).unwrap();
        let replay = Solver::new(
            unit_square(),
            AnnealConfig::default().with_seed(solver.seed()),
        )
        .unwrap();
        assert_eq!(
            solver.run().unwrap().best_tour,
            replay.run().unwrap().best_tour
        );
    }
}
