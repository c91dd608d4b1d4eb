//! defines different error types.

use core::fmt::{Debug, Display};
use std::error::Error;

use super::Real;

/// Type that can never be (safely) initialized.
/// This is temporary, until [`never`](https://doc.rust-lang.org/std/primitive.never.html) is accepted into stable rust.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub enum Never {}

impl Display for Never {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for Never {}

/// Error while creating [`crate::model::ModelParameters`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ModelInitializationError {
    /// One of the parameter is NaN or infinite.
    NonFiniteParameter,
    /// The electron-phonon coupling `g` must be positive or zero.
    NegativeCoupling(Real),
    /// The phonon frequency `ω` must be strictly positive.
    NonPositiveFrequency(Real),
    /// The propagation time `τ` must be strictly positive.
    NonPositiveTime(Real),
}

impl Display for ModelInitializationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NonFiniteParameter => {
                write!(f, "model initialization error: parameters must be finite")
            }
            Self::NegativeCoupling(g) => write!(
                f,
                "model initialization error: the coupling must be >= 0 but is {}",
                g
            ),
            Self::NonPositiveFrequency(omega) => write!(
                f,
                "model initialization error: the phonon frequency must be > 0 but is {}",
                omega
            ),
            Self::NonPositiveTime(time) => write!(
                f,
                "model initialization error: the propagation time must be > 0 but is {}",
                time
            ),
        }
    }
}

impl Error for ModelInitializationError {}

/// A parameter of the configuration file that would lead to a nonsensical simulation.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InvalidParameter {
    /// `NSTEPS` must be strictly greater than 0.
    NumberOfSteps(usize),
    /// `OMEGA` must be strictly greater than 0.
    Frequency(Real),
    /// `G` must be strictly greater than 0.
    Coupling(Real),
    /// `TIME` must be strictly greater than 0.
    Time(Real),
}

impl Display for InvalidParameter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NumberOfSteps(n) => write!(
                f,
                "the number of Monte Carlo steps must be > 0 but is {}",
                n
            ),
            Self::Frequency(omega) => {
                write!(f, "the phonon frequency must be > 0.0 but is {}", omega)
            }
            Self::Coupling(g) => write!(
                f,
                "the intensity of electron phonon coupling must be > 0.0 but is {}",
                g
            ),
            Self::Time(time) => write!(
                f,
                "the lifetime of the electron must be > 0.0 but is {}",
                time
            ),
        }
    }
}

impl Error for InvalidParameter {}

/// Error while loading or validating a configuration.
#[non_exhaustive]
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not a valid configuration.
    Parse(toml::de::Error),
    /// Every parameter that failed validation.
    InvalidParameters(Vec<InvalidParameter>),
    /// The parameters are rejected by the model, see [`ModelInitializationError`].
    Model(ModelInitializationError),
    /// A storage directory could not be created.
    StorageDirectory(std::path::PathBuf, std::io::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<ModelInitializationError> for ConfigError {
    fn from(err: ModelInitializationError) -> Self {
        Self::Model(err)
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "cannot read configuration: {}", error),
            Self::Parse(error) => write!(f, "cannot parse configuration: {}", error),
            Self::InvalidParameters(parameters) => {
                write!(f, "invalid configuration:")?;
                for parameter in parameters {
                    write!(f, "\n - {}", parameter)?;
                }
                Ok(())
            }
            Self::Model(error) => write!(f, "{}", error),
            Self::StorageDirectory(path, error) => {
                write!(f, "cannot create directory {}: {}", path.display(), error)
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(error) | Self::StorageDirectory(_, error) => Some(error),
            Self::Parse(error) => Some(error),
            Self::InvalidParameters(parameters) => parameters
                .first()
                .map(|parameter| parameter as &(dyn Error + 'static)),
            Self::Model(error) => Some(error),
        }
    }
}

/// Error while reducing the run statistics.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StatisticsError {
    /// No step was recorded.
    EmptySequence,
    /// The order and energy sequences are not index-aligned.
    MismatchedLength(usize, usize),
    /// A binning asked for `.0` bins of a sequence of `.1` samples, the number of
    /// bins must lie between 1 and the number of samples.
    InvalidNumberOfBins(usize, usize),
}

impl Display for StatisticsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptySequence => write!(f, "statistics error: no step recorded"),
            Self::MismatchedLength(order, energy) => write!(
                f,
                "statistics error: {} orders recorded but {} energies",
                order, energy
            ),
            Self::InvalidNumberOfBins(bins, samples) => write!(
                f,
                "statistics error: cannot split {} samples into {} bins",
                samples, bins
            ),
        }
    }
}

impl Error for StatisticsError {}

/// Error while writing the results of a run.
#[non_exhaustive]
#[derive(Debug)]
pub enum OutputError {
    /// Writing the data record failed.
    Io(std::io::Error),
    /// The plotting backend returned an error.
    Plot(String),
}

impl From<std::io::Error> for OutputError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl Display for OutputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "output error: {}", error),
            Self::Plot(error) => write!(f, "plot error: {}", error),
        }
    }
}

impl Error for OutputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            Self::Plot(_) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn config_error_lists_every_parameter() {
        let error = ConfigError::InvalidParameters(vec![
            InvalidParameter::NumberOfSteps(0),
            InvalidParameter::Coupling(-1_f64),
        ]);
        let message = error.to_string();
        assert!(message.contains("Monte Carlo steps"));
        assert!(message.contains("coupling"));
        assert!(error.source().is_some());
    }

    #[test]
    fn model_error_display() {
        let error = ModelInitializationError::NonPositiveTime(0_f64);
        assert!(error.to_string().contains("propagation time"));
        let error: ConfigError = error.into();
        assert!(matches!(error, ConfigError::Model(_)));
    }
}
