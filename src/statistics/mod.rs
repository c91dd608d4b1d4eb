//! Statistical tools to reduce the sequences recorded during a production run.
//!
//! The samples of a Markov chain are correlated, [`mean_with_error`] gives the
//! naive error `sqrt(variance / len)` while [`mean_with_binned_error`] groups the
//! samples in bins first so that the error accounts for the autocorrelation.

use std::ops::{Div, Mul, Sub};

use num_traits::Zero;
use rayon::prelude::*;

use super::{error::StatisticsError, Real};

pub mod estimator;

pub use estimator::*;

/// Compute the mean from a [`rayon::iter::IndexedParallelIterator`] by value.
///
/// It is particularly useful in combination with a map.
/// Returns [`None`] if the iterator is empty.
///
/// # Example
/// ```
/// use holstein_diagmc::statistics::mean_par_iter_val;
/// use rayon::prelude::*;
///
/// let orders = vec![0_usize, 2, 4, 2];
/// let mean = mean_par_iter_val(orders.par_iter().map(|order| *order as f64 / 2_f64));
/// assert_eq!(mean, Some(1_f64));
/// ```
pub fn mean_par_iter_val<It, T>(data: It) -> Option<T>
where
    T: Div<Real, Output = T> + std::iter::Sum<T> + std::iter::Sum<It::Item> + Send,
    It: IndexedParallelIterator<Item = T>,
{
    let len = data.len();
    if len == 0 {
        return None;
    }
    let sum: T = data.sum();
    #[allow(clippy::cast_precision_loss)]
    Some(sum / len as Real)
}

/// Compute the mean and the unbiased variance from a
/// [`rayon::iter::IndexedParallelIterator`] by value, consuming it only once.
///
/// The variance of a single element is zero. Returns [`None`] if the iterator is empty.
///
/// # Example
/// ```
/// use holstein_diagmc::statistics::mean_and_variance_par_iter_val;
/// use rayon::prelude::*;
///
/// let energies = vec![0_f64, 1_f64, 0_f64, 1_f64];
/// let [mean, variance] = mean_and_variance_par_iter_val(energies.par_iter().copied()).unwrap();
/// assert_eq!(mean, 0.5_f64);
/// assert_eq!(variance, 1_f64 / 3_f64);
/// ```
pub fn mean_and_variance_par_iter_val<It, T>(data: It) -> Option<[T; 2]>
where
    T: Clone
        + Div<Real, Output = T>
        + Send
        + Sub<T, Output = T>
        + Mul<T, Output = T>
        + Zero,
    It: IndexedParallelIterator<Item = T>,
{
    let len = data.len();
    if len == 0 {
        return None;
    }
    let (sum, sum_squared) = data
        .map(|el| (el.clone(), el.clone() * el))
        .reduce(|| (T::zero(), T::zero()), |a, b| (a.0 + b.0, a.1 + b.1));
    #[allow(clippy::cast_precision_loss)]
    let len_real = len as Real;
    let variance = if len > 1 {
        #[allow(clippy::cast_precision_loss)]
        let degrees_of_freedom = (len - 1) as Real;
        (sum_squared - sum.clone() * sum.clone() / len_real) / degrees_of_freedom
    }
    else {
        T::zero()
    };
    Some([sum / len_real, variance])
}

/// Computes the mean and the naive statistical error `sqrt(variance / len)` from a
/// [`rayon::iter::IndexedParallelIterator`] by value.
///
/// # Errors
/// [`StatisticsError::EmptySequence`] if the iterator is empty.
pub fn mean_with_error_par_iter_val<It>(data: It) -> Result<[Real; 2], StatisticsError>
where
    It: IndexedParallelIterator<Item = Real>,
{
    let len = data.len();
    let [mean, variance] =
        mean_and_variance_par_iter_val(data).ok_or(StatisticsError::EmptySequence)?;
    #[allow(clippy::cast_precision_loss)]
    Ok([mean, (variance / len as Real).sqrt()])
}

/// Mean of a slice, [`None`] if it is empty.
///
/// # Example
/// ```
/// use holstein_diagmc::statistics::mean;
///
/// assert_eq!(mean(&[1_f64, 2_f64, 3_f64, 4_f64]), Some(2.5_f64));
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(data: &[Real]) -> Option<Real> {
    if data.is_empty() {
        None
    }
    else {
        #[allow(clippy::cast_precision_loss)]
        Some(data.iter().sum::<Real>() / data.len() as Real)
    }
}

/// Mean and unbiased variance of a slice, [`None`] if it is empty.
///
/// The variance of a single element is zero.
pub fn mean_and_variance(data: &[Real]) -> Option<[Real; 2]> {
    let mean = mean(data)?;
    let len = data.len();
    let variance = if len > 1 {
        #[allow(clippy::cast_precision_loss)]
        let degrees_of_freedom = (len - 1) as Real;
        data.iter().map(|el| (el - mean).powi(2)).sum::<Real>() / degrees_of_freedom
    }
    else {
        0_f64
    };
    Some([mean, variance])
}

/// Mean of a slice and the naive statistical error `sqrt(variance / len)`.
///
/// # Errors
/// [`StatisticsError::EmptySequence`] if the slice is empty.
pub fn mean_with_error(data: &[Real]) -> Result<[Real; 2], StatisticsError> {
    let [mean, variance] = mean_and_variance(data).ok_or(StatisticsError::EmptySequence)?;
    #[allow(clippy::cast_precision_loss)]
    Ok([mean, (variance / data.len() as Real).sqrt()])
}

/// Mean of a slice and the statistical error estimated from `number_of_bins`
/// consecutive bins of equal size.
///
/// Each bin is averaged and the error is the naive error of the bin averages.
/// When the bins are longer than the autocorrelation time of the chain, the bin
/// averages are independent and the error is reliable. The trailing samples
/// that do not fill a bin are ignored for the error but not for the mean.
///
/// # Errors
/// - [`StatisticsError::EmptySequence`] if the slice is empty;
/// - [`StatisticsError::InvalidNumberOfBins`] if `number_of_bins` is 0 or larger
///   than the number of samples.
///
/// # Example
/// ```
/// use holstein_diagmc::statistics::mean_with_binned_error;
///
/// let data = [1_f64, 1_f64, 3_f64, 3_f64];
/// let [mean, error] = mean_with_binned_error(&data, 2).unwrap();
/// assert_eq!(mean, 2_f64);
/// assert_eq!(error, 1_f64);
/// ```
pub fn mean_with_binned_error(
    data: &[Real],
    number_of_bins: usize,
) -> Result<[Real; 2], StatisticsError> {
    if data.is_empty() {
        return Err(StatisticsError::EmptySequence);
    }
    if number_of_bins == 0 || data.len() < number_of_bins {
        return Err(StatisticsError::InvalidNumberOfBins(
            number_of_bins,
            data.len(),
        ));
    }
    let bin_size = data.len() / number_of_bins;
    let bin_means = data
        .par_chunks_exact(bin_size)
        .take(number_of_bins)
        .map(|bin| mean(bin).unwrap_or(0_f64));
    let [_, error] = mean_with_error_par_iter_val(bin_means)?;
    let mean =
        mean_par_iter_val(data.par_iter().copied()).ok_or(StatisticsError::EmptySequence)?;
    Ok([mean, error])
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_distr::Distribution;

    use super::*;

    const SEED_RNG: u64 = 0x45_78_93_f4_4a_b0_67_f0;

    #[test]
    fn mean_var() {
        let a = [1_f64; 100];
        assert_eq!(
            mean_and_variance_par_iter_val(a.par_iter().copied()),
            Some([1_f64, 0_f64])
        );
        assert_eq!(mean_and_variance(&a), Some([1_f64, 0_f64]));
        assert_eq!(mean_par_iter_val(a.par_iter().copied()), Some(1_f64));
        assert_eq!(mean_with_error(&a), Ok([1_f64, 0_f64]));
        assert_eq!(
            mean_with_error_par_iter_val(a.par_iter().copied()),
            Ok([1_f64, 0_f64])
        );

        let a = [0_f64, 1_f64, 0_f64, 1_f64];
        assert_eq!(mean_and_variance(&a), Some([0.5_f64, 1_f64 / 3_f64]));
        assert_eq!(
            mean_with_error(&a),
            Ok([0.5_f64, (1_f64 / 3_f64 / 4_f64).sqrt()])
        );

        let mut rng = rand::rngs::StdRng::seed_from_u64(SEED_RNG);
        let d = rand::distributions::Uniform::new(-1_f64, 1_f64);
        for _ in 0_u32..100_u32 {
            let vec = (0_u32..100_u32)
                .map(|_| d.sample(&mut rng))
                .collect::<Vec<f64>>();
            let [mean_seq, variance_seq] = mean_and_variance(&vec).unwrap();
            let [mean_par, variance_par] =
                mean_and_variance_par_iter_val(vec.par_iter().copied()).unwrap();
            assert!((mean_seq - mean_par).abs() < 0.000_000_01_f64);
            assert!((variance_seq - variance_par).abs() < 0.000_000_01_f64);
        }
    }

    #[test]
    fn empty_and_single() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean_and_variance(&[]), None);
        assert_eq!(mean_with_error(&[]), Err(StatisticsError::EmptySequence));
        assert_eq!(
            mean_par_iter_val(Vec::<f64>::new().into_par_iter()),
            None
        );
        assert_eq!(mean_and_variance(&[3_f64]), Some([3_f64, 0_f64]));
        assert_eq!(
            mean_and_variance_par_iter_val([3_f64].par_iter().copied()),
            Some([3_f64, 0_f64])
        );
    }

    #[test]
    fn binned_error() {
        assert_eq!(
            mean_with_binned_error(&[], 2),
            Err(StatisticsError::EmptySequence)
        );
        assert_eq!(
            mean_with_binned_error(&[1_f64], 2),
            Err(StatisticsError::InvalidNumberOfBins(2, 1))
        );
        assert_eq!(
            mean_with_binned_error(&[1_f64], 0),
            Err(StatisticsError::InvalidNumberOfBins(0, 1))
        );

        // with one sample per bin it is the naive error
        let data = [0.3_f64, -1_f64, 2_f64, 0.5_f64, 4_f64];
        let binned = mean_with_binned_error(&data, data.len()).unwrap();
        let naive = mean_with_error(&data).unwrap();
        assert_relative_eq!(binned[0], naive[0], max_relative = 1E-12_f64);
        assert_relative_eq!(binned[1], naive[1], max_relative = 1E-12_f64);

        // strongly correlated sequence: blocks of 100 equal samples, one bin per block
        let data = (0_u32..1_000_u32)
            .map(|i| if (i / 100) % 2 == 0 { 1_f64 } else { -1_f64 })
            .collect::<Vec<f64>>();
        let [mean, binned_error] = mean_with_binned_error(&data, 10).unwrap();
        let [_, naive_error] = mean_with_error(&data).unwrap();
        assert_relative_eq!(mean, 0_f64);
        // bin means are +1 and -1 five times each
        assert_relative_eq!(
            binned_error,
            (10_f64 / 9_f64 / 10_f64).sqrt(),
            epsilon = 1E-12_f64
        );
        assert!(binned_error > 5_f64 * naive_error);

        // bins spanning whole periods average out the correlation
        let [_, periodic_error] = mean_with_binned_error(&data, 5).unwrap();
        assert_relative_eq!(periodic_error, 0_f64);
    }
}
