//! reexport for easy use,
//! `use holstein_diagmc::prelude::*`

pub use super::{
    config::Config,
    diagram::{Diagram, Phonon},
    error::{ConfigError, ModelInitializationError, OutputError, StatisticsError},
    model::ModelParameters,
    simulation::{
        run_production, run_production_with, run_thermalization, run_thermalization_with,
        DiagrammaticMonteCarlo, MonteCarlo, RunStatistics, Update, UpdateKind,
    },
    statistics::{Estimates, PhononHistogram},
    Real,
};
