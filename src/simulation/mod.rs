//! Simulation module. Contains the Monte Carlo algorithm and the drivers of a run.

pub mod monte_carlo;
pub mod run;

pub use monte_carlo::*;
pub use run::*;
