//! Configuration of a run, read from a TOML file.
//!
//! # Example
//! ```toml
//! [settings]
//! NSTEPS = 150000
//! NSTEPS_BURN = 5000
//! OMEGA = 1.0
//! G = 0.3
//! TIME = 50.0
//! INTERACTIVE = false
//!
//! [seed]
//! SEED = 1
//!
//! [path_plot]
//! PLOT_FOLDER = "plots"
//! PHONONS = "plots/phonons_g{G}_omega{OMEGA}_time{TIME}.svg"
//!
//! [path_data]
//! DATA_FOLDER = "data"
//! ENERGY_PHONONS = "data/energy_phonons.txt"
//! APPEND = true
//! ```
//!
//! Paths are templates, the placeholders `{G}`, `{OMEGA}`, `{TIME}`, `{NSTEPS}`,
//! `{NSTEPS_BURN}` and `{SEED}` are replaced by the values of the settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{
    error::{ConfigError, InvalidParameter},
    model::ModelParameters,
    Real,
};

/// `[settings]` section: the physical parameters and the length of the run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "NSTEPS")]
    number_of_steps: usize,
    #[serde(rename = "NSTEPS_BURN", default)]
    number_of_burn_steps: usize,
    #[serde(rename = "OMEGA")]
    frequency: Real,
    #[serde(rename = "G")]
    coupling: Real,
    #[serde(rename = "TIME")]
    time: Real,
    #[serde(rename = "INTERACTIVE", default)]
    interactive: bool,
}

impl Settings {
    /// Create the settings, they are validated by [`Config::validate`].
    pub const fn new(
        number_of_steps: usize,
        number_of_burn_steps: usize,
        frequency: Real,
        coupling: Real,
        time: Real,
        interactive: bool,
    ) -> Self {
        Self {
            number_of_steps,
            number_of_burn_steps,
            frequency,
            coupling,
            time,
            interactive,
        }
    }

    getter_copy!(
        /// Number of recorded production steps (`NSTEPS`).
        pub const,
        number_of_steps,
        usize
    );

    getter_copy!(
        /// Number of thermalization steps (`NSTEPS_BURN`).
        pub const,
        number_of_burn_steps,
        usize
    );

    getter_copy!(
        /// Phonon frequency `ω` (`OMEGA`).
        pub const,
        frequency,
        Real
    );

    getter_copy!(
        /// Electron-phonon coupling `g` (`G`).
        pub const,
        coupling,
        Real
    );

    getter_copy!(
        /// Propagation time `τ` (`TIME`).
        pub const,
        time,
        Real
    );

    getter_copy!(
        /// Whether the histogram is also shown on the console (`INTERACTIVE`).
        pub const,
        interactive,
        bool
    );

    /// Every parameter that would lead to a nonsensical simulation.
    pub fn invalid_parameters(&self) -> Vec<InvalidParameter> {
        let is_positive = |value: Real| value.is_finite() && value > 0_f64;
        let mut invalid = Vec::new();
        if self.number_of_steps == 0 {
            invalid.push(InvalidParameter::NumberOfSteps(self.number_of_steps));
        }
        if !is_positive(self.frequency) {
            invalid.push(InvalidParameter::Frequency(self.frequency));
        }
        if !is_positive(self.coupling) {
            invalid.push(InvalidParameter::Coupling(self.coupling));
        }
        if !is_positive(self.time) {
            invalid.push(InvalidParameter::Time(self.time));
        }
        invalid
    }
}

/// `[seed]` section, an absent seed means the rng is seeded from the entropy of the system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeedSettings {
    #[serde(rename = "SEED", default)]
    seed: Option<u64>,
}

impl SeedSettings {
    /// Create the section.
    pub const fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    getter_copy!(
        /// The seed of the rng, if any.
        pub const,
        seed,
        Option<u64>
    );
}

/// `[path_plot]` section.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlotPaths {
    #[serde(rename = "PLOT_FOLDER")]
    plot_folder: String,
    #[serde(rename = "PHONONS")]
    phonons: String,
}

impl PlotPaths {
    /// Create the section from path templates.
    pub fn new(plot_folder: impl Into<String>, phonons: impl Into<String>) -> Self {
        Self {
            plot_folder: plot_folder.into(),
            phonons: phonons.into(),
        }
    }

    getter!(
        /// Template of the folder of the plots.
        pub const,
        plot_folder,
        String
    );

    getter!(
        /// Template of the path of the phonon histogram.
        pub const,
        phonons,
        String
    );
}

/// `[path_data]` section.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataPaths {
    #[serde(rename = "DATA_FOLDER")]
    data_folder: String,
    #[serde(rename = "ENERGY_PHONONS", alias = "ENERGY+PHONONS")]
    energy_phonons: String,
    #[serde(rename = "APPEND", default = "default_append")]
    append: bool,
}

const fn default_append() -> bool {
    true
}

impl DataPaths {
    /// Create the section from path templates.
    pub fn new(
        data_folder: impl Into<String>,
        energy_phonons: impl Into<String>,
        append: bool,
    ) -> Self {
        Self {
            data_folder: data_folder.into(),
            energy_phonons: energy_phonons.into(),
            append,
        }
    }

    getter!(
        /// Template of the folder of the data files.
        pub const,
        data_folder,
        String
    );

    getter!(
        /// Template of the path of the data record.
        pub const,
        energy_phonons,
        String
    );

    getter_copy!(
        /// Whether a row is appended to an existing record instead of overwriting it.
        pub const,
        append,
        bool
    );
}

/// Full configuration of a run.
///
/// # Example
/// ```
/// use holstein_diagmc::config::Config;
/// # use holstein_diagmc::error::ConfigError;
///
/// let config = Config::from_toml_str(
///     r#"
///     [settings]
///     NSTEPS = 1000
///     NSTEPS_BURN = 100
///     OMEGA = 1.0
///     G = 0.3
///     TIME = 50.0
///
///     [path_plot]
///     PLOT_FOLDER = "plots"
///     PHONONS = "plots/phonons_g{G}_time{TIME}.svg"
///
///     [path_data]
///     DATA_FOLDER = "data"
///     ENERGY_PHONONS = "data/energy_phonons.txt"
///     "#,
/// )?;
/// assert_eq!(config.seed(), None);
/// assert_eq!(
///     config.phonon_plot_path(),
///     std::path::PathBuf::from("plots/phonons_g0.3_time50.svg")
/// );
/// # Ok::<(), ConfigError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    settings: Settings,
    #[serde(default)]
    seed: SeedSettings,
    path_plot: PlotPaths,
    path_data: DataPaths,
}

impl Config {
    /// Create a configuration, it is not validated.
    pub const fn new(
        settings: Settings,
        seed: SeedSettings,
        path_plot: PlotPaths,
        path_data: DataPaths,
    ) -> Self {
        Self {
            settings,
            seed,
            path_plot,
            path_data,
        }
    }

    /// Parse and validate a configuration.
    ///
    /// # Errors
    /// - [`ConfigError::Parse`] if the text is not a valid configuration;
    /// - [`ConfigError::InvalidParameters`] listing every invalid parameter.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate the configuration file at `path`.
    ///
    /// # Errors
    /// - [`ConfigError::Io`] if the file cannot be read;
    /// - otherwise the errors of [`Config::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        if config.seed().is_none() {
            warn!("no seed given, the run will not be reproducible");
        }
        Ok(config)
    }

    /// Check that the settings describe a sensible simulation.
    ///
    /// # Errors
    /// [`ConfigError::InvalidParameters`] listing every invalid parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = self.settings.invalid_parameters();
        if invalid.is_empty() {
            Ok(())
        }
        else {
            Err(ConfigError::InvalidParameters(invalid))
        }
    }

    getter!(
        /// `[settings]` section.
        pub const,
        settings,
        Settings
    );

    getter!(
        /// `[path_plot]` section.
        pub const,
        path_plot,
        PlotPaths
    );

    getter!(
        /// `[path_data]` section.
        pub const,
        path_data,
        DataPaths
    );

    /// The seed of the rng, if any.
    pub const fn seed(&self) -> Option<u64> {
        self.seed.seed()
    }

    /// Parameters of the model.
    ///
    /// # Errors
    /// [`ConfigError::Model`] if the model rejects the parameters.
    pub fn model_parameters(&self) -> Result<ModelParameters, ConfigError> {
        Ok(ModelParameters::new(
            self.settings.coupling(),
            self.settings.frequency(),
            self.settings.time(),
        )?)
    }

    /// Replace the placeholders of `template` by the values of the settings.
    pub fn render_template(&self, template: &str) -> String {
        let seed = self
            .seed()
            .map_or_else(|| "entropy".to_owned(), |seed| seed.to_string());
        template
            .replace("{NSTEPS_BURN}", &self.settings.number_of_burn_steps.to_string())
            .replace("{NSTEPS}", &self.settings.number_of_steps.to_string())
            .replace("{OMEGA}", &self.settings.frequency.to_string())
            .replace("{G}", &self.settings.coupling.to_string())
            .replace("{TIME}", &self.settings.time.to_string())
            .replace("{SEED}", &seed)
    }

    /// Folder of the plots.
    pub fn plot_folder(&self) -> PathBuf {
        PathBuf::from(self.render_template(self.path_plot.plot_folder()))
    }

    /// Path of the phonon histogram plot.
    pub fn phonon_plot_path(&self) -> PathBuf {
        PathBuf::from(self.render_template(self.path_plot.phonons()))
    }

    /// Folder of the data files.
    pub fn data_folder(&self) -> PathBuf {
        PathBuf::from(self.render_template(self.path_data.data_folder()))
    }

    /// Path of the data record.
    pub fn data_file_path(&self) -> PathBuf {
        PathBuf::from(self.render_template(self.path_data.energy_phonons()))
    }

    /// Create the plot and data folders if they do not exist.
    ///
    /// # Errors
    /// [`ConfigError::StorageDirectory`] if a folder cannot be created.
    pub fn ensure_storage_directories_exist(&self) -> Result<(), ConfigError> {
        for folder in [self.plot_folder(), self.data_folder()] {
            std::fs::create_dir_all(&folder)
                .map_err(|error| ConfigError::StorageDirectory(folder.clone(), error))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CONFIG: &str = r#"
        [settings]
        NSTEPS = 150000
        NSTEPS_BURN = 5000
        OMEGA = 1.0
        G = 0.3
        TIME = 50.0
        INTERACTIVE = true

        [seed]
        SEED = 1

        [path_plot]
        PLOT_FOLDER = "plots/g{G}"
        PHONONS = "plots/g{G}/phonons_omega{OMEGA}_time{TIME}_n{NSTEPS}_{NSTEPS_BURN}_s{SEED}.svg"

        [path_data]
        DATA_FOLDER = "data"
        ENERGY_PHONONS = "data/energy_phonons.txt"
        APPEND = false
    "#;

    #[test]
    fn parse() {
        let config = Config::from_toml_str(CONFIG).unwrap();
        let settings = config.settings();
        assert_eq!(settings.number_of_steps(), 150_000);
        assert_eq!(settings.number_of_burn_steps(), 5_000);
        assert_eq!(settings.frequency(), 1_f64);
        assert_eq!(settings.coupling(), 0.3_f64);
        assert_eq!(settings.time(), 50_f64);
        assert!(settings.interactive());
        assert_eq!(config.seed(), Some(1));
        assert!(!config.path_data().append());

        let parameters = config.model_parameters().unwrap();
        assert_eq!(parameters.coupling(), 0.3_f64);
        assert_eq!(parameters.time(), 50_f64);
    }

    #[test]
    fn templates() {
        let config = Config::from_toml_str(CONFIG).unwrap();
        assert_eq!(config.plot_folder(), PathBuf::from("plots/g0.3"));
        assert_eq!(
            config.phonon_plot_path(),
            PathBuf::from("plots/g0.3/phonons_omega1_time50_n150000_5000_s1.svg")
        );
        assert_eq!(config.data_folder(), PathBuf::from("data"));
        assert_eq!(
            config.data_file_path(),
            PathBuf::from("data/energy_phonons.txt")
        );
    }

    #[test]
    fn defaults() {
        let config = Config::from_toml_str(
            r#"
            [settings]
            NSTEPS = 10
            OMEGA = 1.0
            G = 0.3
            TIME = 5.0

            [path_plot]
            PLOT_FOLDER = "plots"
            PHONONS = "plots/p{SEED}.svg"

            [path_data]
            DATA_FOLDER = "data"
            ENERGY_PHONONS = "data/e.txt"
            "#,
        )
        .unwrap();
        assert_eq!(config.settings().number_of_burn_steps(), 0);
        assert!(!config.settings().interactive());
        assert_eq!(config.seed(), None);
        assert!(config.path_data().append());
        assert_eq!(config.phonon_plot_path(), PathBuf::from("plots/pentropy.svg"));
    }

    #[test]
    fn every_invalid_parameter_is_reported() {
        let text = CONFIG
            .replace("NSTEPS = 150000", "NSTEPS = 0")
            .replace("G = 0.3", "G = 0.0")
            .replace("TIME = 50.0", "TIME = -1.0");
        match Config::from_toml_str(&text) {
            Err(ConfigError::InvalidParameters(invalid)) => assert_eq!(
                invalid,
                vec![
                    InvalidParameter::NumberOfSteps(0),
                    InvalidParameter::Coupling(0_f64),
                    InvalidParameter::Time(-1_f64),
                ]
            ),
            other => panic!("unexpected result {:?}", other),
        }

        let text = CONFIG.replace("OMEGA = 1.0", "OMEGA = nan");
        assert!(matches!(
            Config::from_toml_str(&text),
            Err(ConfigError::InvalidParameters(_))
        ));
    }

    #[test]
    fn malformed() {
        assert!(matches!(
            Config::from_toml_str("[settings]\nNSTEPS = \"many\""),
            Err(ConfigError::Parse(_))
        ));
        let text = CONFIG.replace("G = 0.3\n", "");
        assert!(matches!(
            Config::from_toml_str(&text),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::load("this/file/does/not/exist.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn storage_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().display().to_string();
        let config = Config::new(
            Settings::new(10, 0, 1_f64, 0.3_f64, 5_f64, false),
            SeedSettings::new(Some(3)),
            PlotPaths::new(format!("{}/plots/s{{SEED}}", root), "unused.svg"),
            DataPaths::new(format!("{}/data", root), "unused.txt", true),
        );
        config.validate().unwrap();
        config.ensure_storage_directories_exist().unwrap();
        assert!(dir.path().join("plots/s3").is_dir());
        assert!(dir.path().join("data").is_dir());
        // a second call is not an error
        config.ensure_storage_directories_exist().unwrap();
    }
}
