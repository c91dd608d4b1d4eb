//! Persisted record of the estimates of each run.
//!
//! The record is a space separated text file with a header line
//! `g omega time nsteps_burn nsteps mean_phonons_DMC mean_energy_DMC`
//! followed by one row per run.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::info;

use super::{config::Settings, error::OutputError, statistics::Estimates, Real};

/// Header line of the data record.
pub const DATA_RECORD_HEADER: &str =
    "g omega time nsteps_burn nsteps mean_phonons_DMC mean_energy_DMC";

/// One row of the data record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataRecord {
    coupling: Real,
    frequency: Real,
    time: Real,
    number_of_burn_steps: usize,
    number_of_steps: usize,
    phonon_number: Real,
    energy: Real,
}

impl DataRecord {
    /// Row for a run with `settings` that gave `estimates`.
    pub const fn new(settings: &Settings, estimates: &Estimates) -> Self {
        Self {
            coupling: settings.coupling(),
            frequency: settings.frequency(),
            time: settings.time(),
            number_of_burn_steps: settings.number_of_burn_steps(),
            number_of_steps: settings.number_of_steps(),
            phonon_number: estimates.phonon_number(),
            energy: estimates.energy(),
        }
    }

    getter_copy!(
        /// Mean phonon number of the row.
        pub const,
        phonon_number,
        Real
    );

    getter_copy!(
        /// Energy of the row.
        pub const,
        energy,
        Real
    );

    /// Text of the row, the estimates with 5 decimals.
    pub fn to_row(&self) -> String {
        format!(
            "{} {} {} {} {} {:.5} {:.5}",
            self.coupling,
            self.frequency,
            self.time,
            self.number_of_burn_steps,
            self.number_of_steps,
            self.phonon_number,
            self.energy
        )
    }

    /// Write the row to the file at `path`.
    ///
    /// The file is (re)written with the header and the row if it does not exist,
    /// if it is empty or if `append` is false. Otherwise the row is appended.
    ///
    /// # Errors
    /// [`OutputError::Io`] if the file cannot be opened or written.
    pub fn write_to_file(&self, path: impl AsRef<Path>, append: bool) -> Result<(), OutputError> {
        let path = path.as_ref();
        let is_empty = std::fs::metadata(path).map_or(true, |metadata| metadata.len() == 0);
        let mut file = if append && !is_empty {
            OpenOptions::new().append(true).open(path)?
        }
        else {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?;
            writeln!(file, "{}", DATA_RECORD_HEADER)?;
            file
        };
        writeln!(file, "{}", self.to_row())?;
        info!(path = %path.display(), "data record written");
        Ok(())
    }
}
