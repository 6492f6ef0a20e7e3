//! Annealing configuration and cooling schedules.

use crate::error::{Error, Result};
use crate::geometry::DEFAULT_MATRIX_LIMIT;

/// Cooling schedule applied inside one reheat cycle.
///
/// The schedule is restarted from `initial_temperature` at every reheat, so
/// `k` below is the step index within the current cycle, not the global
/// iteration count.
///
/// # References
///
/// - Geometric: standard textbook approach
/// - Linear: fixed-duration cooling
/// - LundyMees: Lundy & Mees (1986), with convergence proof
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// Harmonic cooling: `T_k = T_0 / (k + 1)`.
    ///
    /// Fast initial drop with a long low-temperature tail.
    Harmonic,

    /// Geometric (exponential) cooling: `T_{k+1} = alpha * T_k`.
    ///
    /// Typical `alpha`: 0.95–0.99.
    Geometric {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// Linear cooling: `T_k = T_0 - k * (T_0 - T_min) / reheat_interval`.
    ///
    /// Reaches `min_temperature` exactly where the next reheat would start,
    /// so every temperature actually used stays above it.
    Linear,

    /// Lundy-Mees cooling: `T_{k+1} = T_k / (1 + beta * T_k)`.
    ///
    /// Reference: Lundy & Mees (1986)
    LundyMees {
        /// Cooling parameter. Typically `(T_0 - T_min) / (reheat_interval * T_0 * T_min)`.
        beta: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Harmonic
    }
}

/// When the annealing loop stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopCondition {
    /// Stop after a fixed number of iterations.
    Iterations(usize),

    /// Run until the caller's cancellation flag is raised, or until the
    /// caller stops pulling snapshots.
    External,
}

/// Starting order of the tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitialTour {
    /// Input order.
    Identity,
    /// Seeded uniform shuffle.
    #[default]
    Shuffled,
}

/// Configuration for a reheating annealing run.
///
/// # Examples
///
/// ```
/// use tsp_anneal::sa::{AnnealConfig, CoolingSchedule, StopCondition};
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(10.0)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.98 })
///     .with_reheat_interval(200)
///     .with_stop(StopCondition::Iterations(50_000))
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Temperature at the first iteration of every reheat cycle.
    pub initial_temperature: f64,

    /// End point of the [`CoolingSchedule::Linear`] schedule, and the floor a
    /// [`CoolingSchedule::Geometric`] cycle must not cool below. Ignored by
    /// the other schedules.
    pub min_temperature: f64,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Number of iterations per reheat cycle. The temperature is reset to
    /// `initial_temperature` at every iteration that is a multiple of this.
    pub reheat_interval: usize,

    /// Stopping rule.
    pub stop: StopCondition,

    /// How the first tour is built.
    pub initial_tour: InitialTour,

    /// Largest instance for which the full distance matrix is precomputed.
    pub matrix_limit: usize,

    /// Best length is sampled into the history every this many iterations.
    pub history_interval: usize,

    /// Random seed for reproducibility. A fresh seed is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1.0,
            min_temperature: 1e-6,
            cooling: CoolingSchedule::default(),
            reheat_interval: 100,
            stop: StopCondition::Iterations(10_000),
            initial_tour: InitialTour::default(),
            matrix_limit: DEFAULT_MATRIX_LIMIT,
            history_interval: 100,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_reheat_interval(mut self, n: usize) -> Self {
        self.reheat_interval = n;
        self
    }

    pub fn with_stop(mut self, stop: StopCondition) -> Self {
        self.stop = stop;
        self
    }

    pub fn with_max_iterations(self, n: usize) -> Self {
        self.with_stop(StopCondition::Iterations(n))
    }

    pub fn with_initial_tour(mut self, initial_tour: InitialTour) -> Self {
        self.initial_tour = initial_tour;
        self
    }

    pub fn with_matrix_limit(mut self, n: usize) -> Self {
        self.matrix_limit = n;
        self
    }

    pub fn with_history_interval(mut self, n: usize) -> Self {
        self.history_interval = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(Error::invalid_config(format!(
                "initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            )));
        }
        if self.reheat_interval == 0 {
            return Err(Error::invalid_config("reheat_interval must be at least 1"));
        }
        if self.stop == StopCondition::Iterations(0) {
            return Err(Error::invalid_config("iteration budget must be at least 1"));
        }
        if self.history_interval == 0 {
            return Err(Error::invalid_config("history_interval must be at least 1"));
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if !(alpha > 0.0 && alpha < 1.0) {
                    return Err(Error::invalid_config(format!(
                        "geometric alpha must be in (0, 1), got {alpha}"
                    )));
                }
                self.check_min_temperature()?;
                // Coldest temperature of a cycle, at step reheat_interval - 1.
                let coldest = self.initial_temperature
                    * alpha.powf((self.reheat_interval - 1) as f64);
                if coldest < self.min_temperature {
                    return Err(Error::invalid_config(format!(
                        "geometric alpha {alpha} cools below min_temperature {} within a \
                         reheat cycle of {} iterations (reaches {coldest:e})",
                        self.min_temperature, self.reheat_interval
                    )));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if beta <= 0.0 || !beta.is_finite() {
                    return Err(Error::invalid_config(format!(
                        "lundy-mees beta must be positive, got {beta}"
                    )));
                }
            }
            CoolingSchedule::Linear => self.check_min_temperature()?,
            CoolingSchedule::Harmonic => {}
        }
        Ok(())
    }

    fn check_min_temperature(&self) -> Result<()> {
        if !(self.min_temperature >= f64::MIN_POSITIVE) {
            return Err(Error::invalid_config(format!(
                "min_temperature must be positive, got {}",
                self.min_temperature
            )));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(Error::invalid_config(
                "min_temperature must be less than initial_temperature",
            ));
        }
        Ok(())
    }

    /// Temperature at step `k >= 1` of a reheat cycle, given the temperature
    /// at step `k - 1`.
    pub(crate) fn cool(&self, previous: f64, k: usize) -> f64 {
        let t0 = self.initial_temperature;
        match self.cooling {
            CoolingSchedule::Harmonic => t0 / (k + 1) as f64,
            CoolingSchedule::Geometric { alpha } => previous * alpha,
            CoolingSchedule::Linear => {
                t0 - k as f64 * (t0 - self.min_temperature) / self.reheat_interval as f64
            }
            CoolingSchedule::LundyMees { beta } => previous / (1.0 + beta * previous),
        }
    }
}
