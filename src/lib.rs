//! # Holstein DiagMC
//!
//! ![](https://img.shields.io/badge/language-Rust-orange)
//!
//! Diagrammatic Monte Carlo (DiagMC) for a single electron coupled to a single
//! dispersionless phonon mode (the Holstein model on one site).
//!
//! The library samples Feynman diagrams of the electron propagator at a fixed
//! imaginary time `τ`. A diagram is a set of internal phonon lines, each one an
//! interval `[t_start, t_end]` attached to the electron line. The Markov chain
//! moves between diagram orders with two reversible updates, inserting or removing
//! one phonon line, accepted with the Metropolis-Hastings rule. From the sampled
//! diagrams we estimate the ground state energy of the polaron and the
//! distribution of the number of phonons.
//!
//! **Features**:
//! - Metropolis-Hastings insert / remove updates with detailed balance;
//! - Thermalization and production drivers;
//! - Estimators for the ground state energy and the mean phonon number;
//! - Phonon number histogram with Poisson fit and SVG plot;
//! - Reproducible runs from a seed;
//! - Serde support;
//!
//! ## Usage
//!
//! ```rust
//! use holstein_diagmc::prelude::*;
//! use rand::SeedableRng;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(1);
//!
//! let coupling = 0.3_f64;
//! let frequency = 1_f64;
//! let time = 50_f64;
//! let parameters = ModelParameters::new(coupling, frequency, time)?;
//!
//! let mut mc = DiagrammaticMonteCarlo::new(parameters, rng);
//! let diagram = run_thermalization(Diagram::new(time), &mut mc, 1_000)?;
//! let (_diagram, statistics) = run_production(diagram, &mut mc, 10_000, frequency)?;
//!
//! let estimates = Estimates::from_statistics(&statistics, &parameters)?;
//! println!("E_GS = {}", estimates.energy());
//! # Ok(())
//! # }
//! ```
//!
//! ## Discussion about Random Number Generators (RNGs)
//!
//! The Monte Carlo code is generic over [`rand::Rng`]. Reproducibility only
//! needs a seedable generator that is consumed by a single chain, in order.
//! The binary uses [`rand_xoshiro::Xoshiro256PlusPlus`] which is fast, has good
//! statistical quality and gives the same stream on every platform, see
//! [`rng`].

#![warn(clippy::cast_sign_loss)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::cast_possible_wrap)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::cognitive_complexity)]
#![warn(clippy::float_cmp_const)]
#![warn(clippy::implicit_saturating_sub)]
#![warn(clippy::imprecise_flops)]
#![warn(clippy::large_types_passed_by_value)]
#![warn(clippy::macro_use_imports)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::suboptimal_flops)]
#![warn(clippy::todo)]
#![warn(clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::unreadable_literal)]
#![warn(clippy::unseparated_literal_suffix)]
#![warn(clippy::unused_self)]
#![warn(clippy::missing_errors_doc)]
#![warn(missing_docs)]

pub use rand::{Rng, SeedableRng};
pub use rand_distr::Distribution;

#[macro_use]
mod macro_def;
pub mod config;
pub mod diagram;
pub mod error;
pub mod model;
pub mod output;
pub mod plot;
pub mod prelude;
pub mod rng;
pub mod simulation;
pub mod statistics;

#[cfg(test)]
mod test;

/// alias for [`f64`]
pub type Real = f64;
