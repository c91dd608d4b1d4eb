//! Reduction of a production run into the physical estimates and the phonon
//! number distribution.

use rayon::prelude::*;
#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    super::{error::StatisticsError, model::ModelParameters, simulation::RunStatistics, Real},
    mean_with_binned_error,
};

/// Number of bins used for the statistical errors of [`Estimates`].
///
/// Consecutive diagrams of the chain are strongly correlated, the error is the
/// spread of the means of this many consecutive blocks of steps. Runs with fewer
/// steps use one bin per step.
pub const NUMBER_OF_BINS: usize = 100;

/// Estimates of the observables from a production run.
///
/// # Example
/// ```
/// # use std::error::Error;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use holstein_diagmc::diagram::Diagram;
/// use holstein_diagmc::model::ModelParameters;
/// use holstein_diagmc::simulation::{run_production, DiagrammaticMonteCarlo};
/// use holstein_diagmc::statistics::Estimates;
/// use rand::SeedableRng;
///
/// let parameters = ModelParameters::new(0.3_f64, 1_f64, 10_f64)?;
/// let rng = rand::rngs::StdRng::seed_from_u64(0);
/// let mut mc = DiagrammaticMonteCarlo::new(parameters, rng);
/// let (_, statistics) = run_production(
///     Diagram::new(parameters.time()),
///     &mut mc,
///     1_000,
///     parameters.frequency(),
/// )?;
/// let estimates = Estimates::from_statistics(&statistics, &parameters)?;
/// assert_eq!(estimates.number_of_samples(), 1_000);
/// assert!(estimates.phonon_number() >= 0_f64);
/// #     Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Estimates {
    energy: Real,
    energy_error: Real,
    phonon_number: Real,
    phonon_number_error: Real,
    phonons_per_unit_time: Real,
    number_of_samples: usize,
}

impl Estimates {
    /// Reduce the recorded sequences.
    ///
    /// `energy` is the mean of the energy sequence and `phonon_number` is half the
    /// mean order. The errors are binned errors over [`NUMBER_OF_BINS`] blocks,
    /// see [`mean_with_binned_error`].
    ///
    /// # Errors
    /// - [`StatisticsError::EmptySequence`] if nothing was recorded;
    /// - [`StatisticsError::MismatchedLength`] if the two sequences differ in length.
    pub fn from_statistics(
        statistics: &RunStatistics,
        parameters: &ModelParameters,
    ) -> Result<Self, StatisticsError> {
        let orders = statistics.order_sequence();
        let energies = statistics.energy_sequence();
        if orders.len() != energies.len() {
            return Err(StatisticsError::MismatchedLength(
                orders.len(),
                energies.len(),
            ));
        }
        let number_of_bins = NUMBER_OF_BINS.min(orders.len());
        let [energy, energy_error] = mean_with_binned_error(energies, number_of_bins)?;
        #[allow(clippy::cast_precision_loss)] // orders are small
        let phonon_numbers = orders
            .par_iter()
            .map(|order| *order as Real / 2_f64)
            .collect::<Vec<Real>>();
        let [phonon_number, phonon_number_error] =
            mean_with_binned_error(&phonon_numbers, number_of_bins)?;
        let phonons_per_unit_time = phonon_number / (parameters.frequency() * parameters.time());
        debug!(
            energy,
            energy_error, phonon_number, phonon_number_error, "estimates"
        );
        Ok(Self {
            energy,
            energy_error,
            phonon_number,
            phonon_number_error,
            phonons_per_unit_time,
            number_of_samples: orders.len(),
        })
    }

    getter_copy!(
        /// Estimate of the ground state energy, mean of the energy estimator.
        pub const,
        energy,
        Real
    );

    getter_copy!(
        /// Binned statistical error on [`Estimates::energy`].
        pub const,
        energy_error,
        Real
    );

    getter_copy!(
        /// Mean number of internal phonon lines, `mean(order) / 2`.
        pub const,
        phonon_number,
        Real
    );

    getter_copy!(
        /// Binned statistical error on [`Estimates::phonon_number`].
        pub const,
        phonon_number_error,
        Real
    );

    getter_copy!(
        /// [`Estimates::phonon_number`] divided by `ω τ`, it converges to the size
        /// `g²/ω²` of the phonon cloud for a long propagation time.
        pub const,
        phonons_per_unit_time,
        Real
    );

    getter_copy!(
        /// Number of production steps reduced.
        pub const,
        number_of_samples,
        usize
    );
}

/// Histogram of the number of phonons sampled during a production run.
///
/// # Example
/// ```
/// use holstein_diagmc::statistics::PhononHistogram;
///
/// let histogram = PhononHistogram::from_orders(&[0, 2, 2, 6]);
/// assert_eq!(histogram.counts(), &[1, 2, 0, 1]);
/// assert_eq!(histogram.max_phonon_number(), Some(3));
/// assert_eq!(histogram.frequencies(), vec![0.25_f64, 0.5_f64, 0_f64, 0.25_f64]);
/// assert_eq!(histogram.mean(), Some(1.25_f64));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PhononHistogram {
    counts: Vec<u64>,
    total: u64,
}

impl PhononHistogram {
    /// Count the phonon numbers `order / 2` of a sequence of orders.
    pub fn from_orders(orders: &[usize]) -> Self {
        let counts = orders
            .par_iter()
            .fold(Vec::new, |mut counts: Vec<u64>, order| {
                let phonon_number = order / 2;
                if counts.len() <= phonon_number {
                    counts.resize(phonon_number + 1, 0);
                }
                counts[phonon_number] += 1;
                counts
            })
            .reduce(Vec::new, |mut a, b| {
                if a.len() < b.len() {
                    a.resize(b.len(), 0);
                }
                a.iter_mut().zip(b.iter()).for_each(|(a, b)| *a += b);
                a
            });
        Self {
            counts,
            total: orders.len() as u64,
        }
    }

    getter!(
        /// Number of samples with `n` phonons, at index `n`.
        pub,
        counts,
        [u64]
    );

    getter_copy!(
        /// Total number of samples.
        pub const,
        total,
        u64
    );

    /// Number of samples with `phonon_number` phonons.
    pub fn count(&self, phonon_number: usize) -> u64 {
        self.counts.get(phonon_number).copied().unwrap_or(0)
    }

    /// Largest sampled phonon number, [`None`] for an empty histogram.
    pub fn max_phonon_number(&self) -> Option<usize> {
        self.counts.len().checked_sub(1)
    }

    /// Normalised histogram `P(n)`, empty for an empty histogram.
    #[allow(clippy::cast_precision_loss)]
    pub fn frequencies(&self) -> Vec<Real> {
        if self.total == 0 {
            return Vec::new();
        }
        self.counts
            .iter()
            .map(|count| *count as Real / self.total as Real)
            .collect()
    }

    /// Mean phonon number of the histogram, [`None`] for an empty histogram.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Option<Real> {
        if self.total == 0 {
            return None;
        }
        let sum = self
            .counts
            .iter()
            .enumerate()
            .map(|(n, count)| n as Real * *count as Real)
            .sum::<Real>();
        Some(sum / self.total as Real)
    }

    /// Least square distance between the normalised histogram and a Poisson
    /// distribution of parameter `mean`, over the sampled range.
    pub fn poisson_distance(&self, mean: Real) -> Real {
        self.frequencies()
            .iter()
            .enumerate()
            .map(|(n, frequency)| (frequency - poisson_pmf(n, mean)).powi(2))
            .sum()
    }

    /// Parameter of the Poisson distribution closest to the normalised histogram
    /// in the least square sense, [`None`] for an empty histogram.
    ///
    /// The minimum is bracketed on a grid then refined by golden section search.
    pub fn fit_poisson(&self) -> Option<Real> {
        let max = self.max_phonon_number()?;
        #[allow(clippy::cast_precision_loss)]
        let upper = 2_f64 * (max as Real + 1_f64);
        let grid_size = 64_u32;
        let step = upper / Real::from(grid_size);
        let best = (0..=grid_size)
            .map(|i| Real::from(i) * step)
            .map(|lambda| (lambda, self.poisson_distance(lambda)))
            .fold((0_f64, Real::INFINITY), |best, current| {
                if current.1 < best.1 {
                    current
                }
                else {
                    best
                }
            })
            .0;
        let mean = golden_section_minimum(
            |lambda| self.poisson_distance(lambda),
            (best - step).max(0_f64),
            best + step,
        );
        debug!(mean, "poisson fit");
        Some(mean)
    }
}

/// Poisson probability mass function `e^{-mean} mean^n / n!`.
///
/// Computed in log space so that large `n` do not overflow.
///
/// # Example
/// ```
/// use holstein_diagmc::statistics::poisson_pmf;
///
/// assert_eq!(poisson_pmf(0, 0_f64), 1_f64);
/// assert_eq!(poisson_pmf(3, 0_f64), 0_f64);
/// assert!((poisson_pmf(2, 1_f64) - 0.5_f64 * (-1_f64).exp()).abs() < 1E-15_f64);
/// ```
pub fn poisson_pmf(n: usize, mean: Real) -> Real {
    if mean <= 0_f64 {
        return if n == 0 {
            1_f64
        }
        else {
            0_f64
        };
    }
    #[allow(clippy::cast_precision_loss)]
    let log_factorial = (1..=n).map(|k| (k as Real).ln()).sum::<Real>();
    #[allow(clippy::cast_precision_loss)]
    let log_pmf = (n as Real).mul_add(mean.ln(), -mean) - log_factorial;
    log_pmf.exp()
}

/// Minimum of a unimodal function on `[lower, upper]`.
fn golden_section_minimum<F>(function: F, mut lower: Real, mut upper: Real) -> Real
where
    F: Fn(Real) -> Real,
{
    const TOLERANCE: Real = 1E-9_f64;
    let inverse_golden_ratio = (5_f64.sqrt() - 1_f64) / 2_f64;
    let mut left = upper - inverse_golden_ratio * (upper - lower);
    let mut right = lower + inverse_golden_ratio * (upper - lower);
    let mut value_left = function(left);
    let mut value_right = function(right);
    while upper - lower > TOLERANCE {
        if value_left < value_right {
            upper = right;
            right = left;
            value_right = value_left;
            left = upper - inverse_golden_ratio * (upper - lower);
            value_left = function(left);
        }
        else {
            lower = left;
            left = right;
            value_left = value_right;
            right = lower + inverse_golden_ratio * (upper - lower);
            value_right = function(right);
        }
    }
    (lower + upper) / 2_f64
}
