//! Physical parameters of the Holstein model.

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

use super::{error::ModelInitializationError, Real};

/// Parameters of the model: electron-phonon coupling `g`, phonon frequency `ω`
/// and total imaginary propagation time `τ`.
///
/// They are read-only inputs of the Monte Carlo updates.
///
/// # Example
/// ```
/// use holstein_diagmc::model::ModelParameters;
/// # use holstein_diagmc::error::ModelInitializationError;
///
/// let parameters = ModelParameters::new(0.3_f64, 1_f64, 50_f64)?;
/// assert_eq!(parameters.coupling(), 0.3_f64);
/// assert!(ModelParameters::new(0.3_f64, 0_f64, 50_f64).is_err());
/// # Ok::<(), ModelInitializationError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ModelParameters {
    coupling: Real,
    frequency: Real,
    time: Real,
}

impl ModelParameters {
    /// Create the parameters.
    ///
    /// A zero coupling is accepted: it is the free electron, for which no phonon
    /// line can ever be inserted.
    ///
    /// # Errors
    /// - [`ModelInitializationError::NonFiniteParameter`] if a parameter is NaN or infinite;
    /// - [`ModelInitializationError::NegativeCoupling`] if `coupling < 0`;
    /// - [`ModelInitializationError::NonPositiveFrequency`] if `frequency <= 0`;
    /// - [`ModelInitializationError::NonPositiveTime`] if `time <= 0`.
    pub fn new(
        coupling: Real,
        frequency: Real,
        time: Real,
    ) -> Result<Self, ModelInitializationError> {
        if !(coupling.is_finite() && frequency.is_finite() && time.is_finite()) {
            return Err(ModelInitializationError::NonFiniteParameter);
        }
        if coupling < 0_f64 {
            return Err(ModelInitializationError::NegativeCoupling(coupling));
        }
        if frequency <= 0_f64 {
            return Err(ModelInitializationError::NonPositiveFrequency(frequency));
        }
        if time <= 0_f64 {
            return Err(ModelInitializationError::NonPositiveTime(time));
        }
        Ok(Self {
            coupling,
            frequency,
            time,
        })
    }

    getter_copy!(
        /// The electron-phonon coupling `g`.
        pub const,
        coupling,
        Real
    );

    getter_copy!(
        /// The phonon frequency `ω`.
        pub const,
        frequency,
        Real
    );

    getter_copy!(
        /// The total imaginary propagation time `τ`.
        pub const,
        time,
        Real
    );

    /// Ground state energy of the polaron for `τ → ∞`, `-g²/ω`.
    pub fn theoretical_energy(&self) -> Real {
        -self.coupling * self.coupling / self.frequency
    }

    /// Mean number of phonons in the polaron cloud, `g²/ω²`.
    pub fn theoretical_phonon_number(&self) -> Real {
        (self.coupling / self.frequency).powi(2)
    }

    /// Exact `-d ln G / dτ` of the one site model at finite `τ`,
    /// `-(g²/ω)(1 - exp(-ωτ))`.
    pub fn exact_energy_estimator(&self) -> Real {
        self.theoretical_energy() * (1_f64 - (-self.frequency * self.time).exp())
    }

    /// Exact mean number of internal phonon lines at finite `τ`,
    /// `(g²/ω²)(ωτ - 1 + exp(-ωτ))`.
    pub fn exact_mean_line_number(&self) -> Real {
        let omega_tau = self.frequency * self.time;
        self.theoretical_phonon_number() * (omega_tau - 1_f64 + (-omega_tau).exp())
    }
}
