//! Proposal densities and Metropolis-Hastings ratios of the two updates.
//!
//! The target weight of a set of `n` phonon lines is
//! `W = g^{2n} exp(-ω Σ_i Δt_i)`. An insertion draws `t_start` uniformly in
//! `[0, τ)` then `t_end` uniformly in `(t_start, τ]`, so the density of the
//! proposed line is `1 / (τ (τ - t_start))`. A removal picks one of the `n`
//! lines uniformly. When the diagram has no phonon the insertion is chosen with
//! probability 1, otherwise insertion and removal are chosen with probability
//! 1/2 each.

use rand_distr::{Distribution, Uniform};

use super::super::super::{diagram::Phonon, model::ModelParameters, Real};

/// Probability to choose an insertion on a diagram with `phonon_count` lines.
pub const fn insert_selection_probability(phonon_count: usize) -> Real {
    if phonon_count == 0 {
        1_f64
    }
    else {
        0.5_f64
    }
}

/// Probability to choose a removal on a diagram with `phonon_count` lines.
pub const fn remove_selection_probability(phonon_count: usize) -> Real {
    if phonon_count == 0 {
        0_f64
    }
    else {
        0.5_f64
    }
}

/// Density of the insertion proposal for `phonon`, `1 / (τ (τ - t_start))`.
pub fn insert_proposal_density(phonon: &Phonon, time: Real) -> Real {
    1_f64 / (time * (time - phonon.t_start()))
}

/// Ratio of weights `W(with phonon) / W(without phonon)`, `g² exp(-ω Δt)`.
pub fn weight_ratio_insert(phonon: &Phonon, parameters: &ModelParameters) -> Real {
    let propagator = (-parameters.frequency() * phonon.interaction_time()).exp();
    parameters.coupling() * parameters.coupling() * propagator
}

/// Metropolis-Hastings ratio for inserting `phonon` into a diagram with `phonon_count` lines.
///
/// It is `g² τ (τ - t_start) exp(-ω Δt) / (phonon_count + 1)`, halved when the
/// diagram is empty because the insertion was then forced.
///
/// # Example
/// ```
/// use holstein_diagmc::diagram::Phonon;
/// use holstein_diagmc::model::ModelParameters;
/// use holstein_diagmc::simulation::{insert_ratio, remove_ratio};
/// # use holstein_diagmc::error::ModelInitializationError;
///
/// let parameters = ModelParameters::new(0.3_f64, 1_f64, 10_f64)?;
/// let phonon = Phonon::new(2_f64, 2.5_f64).unwrap();
/// let forward = insert_ratio(3, &phonon, &parameters);
/// let backward = remove_ratio(4, &phonon, &parameters);
/// assert!((forward * backward - 1_f64).abs() < 1E-12_f64);
/// # Ok::<(), ModelInitializationError>(())
/// ```
pub fn insert_ratio(phonon_count: usize, phonon: &Phonon, parameters: &ModelParameters) -> Real {
    #[allow(clippy::cast_precision_loss)]
    let count_after = (phonon_count + 1) as Real;
    let reverse = remove_selection_probability(phonon_count + 1) / count_after;
    let forward = insert_selection_probability(phonon_count)
        * insert_proposal_density(phonon, parameters.time());
    weight_ratio_insert(phonon, parameters) * reverse / forward
}

/// Metropolis-Hastings ratio for removing `phonon` from a diagram with `phonon_count` lines.
///
/// It is the exact inverse of [`insert_ratio`]`(phonon_count - 1, phonon)`:
/// `phonon_count exp(ω Δt) / (g² τ (τ - t_start))`, doubled when the diagram
/// has a single line.
///
/// If `phonon_count` is 0 the removal is impossible and the ratio is 0.
pub fn remove_ratio(phonon_count: usize, phonon: &Phonon, parameters: &ModelParameters) -> Real {
    if phonon_count == 0 {
        return 0_f64;
    }
    #[allow(clippy::cast_precision_loss)]
    let count_before = phonon_count as Real;
    let reverse = insert_selection_probability(phonon_count - 1)
        * insert_proposal_density(phonon, parameters.time());
    let forward = remove_selection_probability(phonon_count) / count_before;
    reverse / (weight_ratio_insert(phonon, parameters) * forward)
}

/// Draw a new phonon line with the insertion proposal.
///
/// Returns [`None`] when the draw is degenerate (zero length line after rounding),
/// such a proposal is rejected.
pub fn propose_phonon<Rng>(time: Real, rng: &mut Rng) -> Option<Phonon>
where
    Rng: rand::Rng + ?Sized,
{
    let unit = Uniform::new(0_f64, 1_f64);
    let t_start = time * unit.sample(rng);
    // 1 - u lies in (0, 1] so t_end lies in (t_start, time]
    let t_end = (t_start + (time - t_start) * (1_f64 - unit.sample(rng))).min(time);
    Phonon::new(t_start, t_end)
}

/// Pick uniformly the index of the line to remove, [`None`] if there is no line.
pub fn propose_removal_index<Rng>(phonon_count: usize, rng: &mut Rng) -> Option<usize>
where
    Rng: rand::Rng + ?Sized,
{
    if phonon_count == 0 {
        None
    }
    else {
        Some(Uniform::new(0, phonon_count).sample(rng))
    }
}
