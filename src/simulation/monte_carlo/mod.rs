//! Module for Monte-Carlo algorithms, see the trait [`MonteCarlo`].
//!
//! This is the way the diagrams are sampled. A Markov chain takes a diagram and
//! progressively changes it by inserting or removing phonon lines.
//!
//! # Examples
//! see [`DiagrammaticMonteCarlo`].

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

use super::super::{
    diagram::{Diagram, Phonon},
    model::ModelParameters,
    Real,
};

pub mod diagrammatic;
pub mod update;

pub use diagrammatic::*;
pub use update::*;

/// Monte-Carlo algorithm, giving the next element in the simulation.
/// It is also a Markov chain.
///
/// # Example
/// ```
/// # use std::error::Error;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use holstein_diagmc::diagram::Diagram;
/// use holstein_diagmc::model::ModelParameters;
/// use holstein_diagmc::simulation::{DiagrammaticMonteCarlo, MonteCarlo};
/// use rand::SeedableRng;
///
/// let rng = rand::rngs::StdRng::seed_from_u64(0); // change with your seed
/// let parameters = ModelParameters::new(0.5_f64, 1_f64, 10_f64)?;
/// let mut mc = DiagrammaticMonteCarlo::new(parameters, rng);
///
/// let mut diagram = Diagram::new(parameters.time());
/// // Realistically you want more steps than 10
/// for _ in 0..10 {
///     diagram = mc.next_element(diagram)?;
///     // or diagram = diagram.monte_carlo_step(&mut mc)?;
/// }
/// assert_eq!(diagram.order() % 2, 0);
/// #     Ok(())
/// # }
/// ```
pub trait MonteCarlo<State> {
    /// Error returned while getting the next element.
    type Error;

    /// Do one Monte Carlo simulation step.
    ///
    /// # Errors
    /// Return an error if the simulation failed
    fn next_element(&mut self, state: State) -> Result<State, Self::Error>;
}

impl Diagram {
    /// Do one Monte Carlo step with the given algorithm.
    ///
    /// # Errors
    /// Return the error of the Monte Carlo algorithm.
    pub fn monte_carlo_step<MC>(self, mc: &mut MC) -> Result<Self, MC::Error>
    where
        MC: MonteCarlo<Self> + ?Sized,
    {
        mc.next_element(self)
    }
}

/// Kind of update of the diagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum UpdateKind {
    /// Add a phonon line.
    Insert,
    /// Remove a phonon line.
    Remove,
}

/// A proposed change of the diagram.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Update {
    /// Append the given phonon line.
    Insert(Phonon),
    /// Remove the phonon line at `index`, `phonon` is a copy of that line.
    Remove {
        /// position in [`Diagram::phonon_list`]
        index: usize,
        /// the line at `index`
        phonon: Phonon,
    },
}

impl Update {
    /// Get the kind of update.
    pub const fn kind(&self) -> UpdateKind {
        match self {
            Self::Insert(_) => UpdateKind::Insert,
            Self::Remove { .. } => UpdateKind::Remove,
        }
    }

    /// Ratio `W(new) q(new -> old) / (W(old) q(old -> new))` of the update from `diagram`.
    pub fn ratio(&self, diagram: &Diagram, parameters: &ModelParameters) -> Real {
        match self {
            Self::Insert(phonon) => insert_ratio(diagram.phonon_count(), phonon, parameters),
            Self::Remove { phonon, .. } => {
                remove_ratio(diagram.phonon_count(), phonon, parameters)
            }
        }
    }

    /// Probability to accept the update from `diagram`, see [`probability_of_replacement`].
    pub fn acceptance_probability(&self, diagram: &Diagram, parameters: &ModelParameters) -> Real {
        probability_of_replacement(self.ratio(diagram, parameters))
    }

    /// Mutate the diagram.
    ///
    /// # Panics
    /// If a removal does not point to a line of the diagram.
    pub fn apply(self, diagram: &mut Diagram) {
        match self {
            Self::Insert(phonon) => diagram.insert_phonon(phonon),
            Self::Remove { index, phonon } => {
                let removed = diagram.remove_phonon(index);
                assert_eq!(removed, phonon, "removed a different phonon than proposed");
            }
        }
    }
}

/// Metropolis choice `min(1, ratio)`.
///
/// A NaN or negative ratio, coming from a degenerate proposal, gives a probability 0.
///
/// # Example
/// ```
/// use holstein_diagmc::simulation::probability_of_replacement;
///
/// assert_eq!(probability_of_replacement(0.25_f64), 0.25_f64);
/// assert_eq!(probability_of_replacement(3_f64), 1_f64);
/// assert_eq!(probability_of_replacement(f64::INFINITY), 1_f64);
/// assert_eq!(probability_of_replacement(f64::NAN), 0_f64);
/// ```
pub fn probability_of_replacement(ratio: Real) -> Real {
    if ratio.is_nan() {
        0_f64
    }
    else {
        ratio.min(1_f64).max(0_f64)
    }
}
