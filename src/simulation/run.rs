//! Thermalization and production drivers of the Markov chain.
//!
//! Both drivers are generic over [`MonteCarlo`] so any algorithm acting on a
//! [`Diagram`] can be driven. Only the production run records statistics.

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    super::{diagram::Diagram, Real},
    MonteCarlo,
};

/// Per step record of a production run.
///
/// The two sequences are append only and index aligned: entry `i` is the state
/// of the diagram after step `i`, whether the proposal was accepted or not.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RunStatistics {
    order_sequence: Vec<usize>,
    energy_sequence: Vec<Real>,
}

impl RunStatistics {
    /// Empty statistics.
    pub const fn new() -> Self {
        Self {
            order_sequence: Vec::new(),
            energy_sequence: Vec::new(),
        }
    }

    /// Empty statistics with room for `capacity` steps.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order_sequence: Vec::with_capacity(capacity),
            energy_sequence: Vec::with_capacity(capacity),
        }
    }

    getter!(
        /// Order of the diagram after each production step.
        pub,
        order_sequence,
        [usize]
    );

    getter!(
        /// Energy estimator of the diagram after each production step.
        pub,
        energy_sequence,
        [Real]
    );

    /// Append the order and the energy estimator of `diagram`.
    pub fn record(&mut self, diagram: &Diagram, frequency: Real) {
        self.order_sequence.push(diagram.order());
        self.energy_sequence.push(diagram.energy(frequency));
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.order_sequence.len()
    }

    /// Whether no step was recorded.
    pub fn is_empty(&self) -> bool {
        self.order_sequence.is_empty()
    }

    /// Number of phonons after each step, `order / 2`.
    pub fn phonon_number_sequence(&self) -> impl Iterator<Item = usize> + '_ {
        self.order_sequence.iter().map(|order| order / 2)
    }
}

/// Run `number_of_steps` steps without recording anything and return the
/// relaxed diagram.
///
/// # Errors
/// Return the first error of the Monte Carlo algorithm.
///
/// # Example
/// ```
/// use holstein_diagmc::diagram::Diagram;
/// use holstein_diagmc::model::ModelParameters;
/// use holstein_diagmc::simulation::{run_thermalization, DiagrammaticMonteCarlo};
/// use rand::SeedableRng;
/// # use std::error::Error;
///
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let parameters = ModelParameters::new(0.3_f64, 1_f64, 50_f64)?;
/// let rng = rand::rngs::StdRng::seed_from_u64(0);
/// let mut mc = DiagrammaticMonteCarlo::new(parameters, rng);
///
/// let diagram = run_thermalization(Diagram::new(parameters.time()), &mut mc, 1_000)?;
/// assert_eq!(
///     mc.insert_counter().proposed() + mc.remove_counter().proposed(),
///     1_000
/// );
/// # Ok(())
/// # }
/// ```
pub fn run_thermalization<MC>(
    diagram: Diagram,
    mc: &mut MC,
    number_of_steps: usize,
) -> Result<Diagram, MC::Error>
where
    MC: MonteCarlo<Diagram> + ?Sized,
{
    run_thermalization_with(diagram, mc, number_of_steps, |_| {})
}

/// Same as [`run_thermalization`] but call `on_step` with the diagram after each
/// step.
///
/// # Errors
/// Return the first error of the Monte Carlo algorithm.
pub fn run_thermalization_with<MC, F>(
    mut diagram: Diagram,
    mc: &mut MC,
    number_of_steps: usize,
    mut on_step: F,
) -> Result<Diagram, MC::Error>
where
    MC: MonteCarlo<Diagram> + ?Sized,
    F: FnMut(&Diagram),
{
    info!(number_of_steps, "thermalization start");
    for _ in 0..number_of_steps {
        diagram = mc.next_element(diagram)?;
        on_step(&diagram);
    }
    info!(order = diagram.order(), "thermalization end");
    Ok(diagram)
}

/// Run `number_of_steps` steps and record the order and the energy estimator
/// after each one.
///
/// # Errors
/// Return the first error of the Monte Carlo algorithm.
///
/// # Example
/// ```
/// use holstein_diagmc::diagram::Diagram;
/// use holstein_diagmc::model::ModelParameters;
/// use holstein_diagmc::simulation::{run_production, DiagrammaticMonteCarlo};
/// use rand::SeedableRng;
/// # use std::error::Error;
///
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let parameters = ModelParameters::new(0.3_f64, 1_f64, 50_f64)?;
/// let rng = rand::rngs::StdRng::seed_from_u64(0);
/// let mut mc = DiagrammaticMonteCarlo::new(parameters, rng);
///
/// let (_diagram, statistics) = run_production(
///     Diagram::new(parameters.time()),
///     &mut mc,
///     500,
///     parameters.frequency(),
/// )?;
/// assert_eq!(statistics.order_sequence().len(), 500);
/// assert_eq!(statistics.energy_sequence().len(), 500);
/// # Ok(())
/// # }
/// ```
pub fn run_production<MC>(
    diagram: Diagram,
    mc: &mut MC,
    number_of_steps: usize,
    frequency: Real,
) -> Result<(Diagram, RunStatistics), MC::Error>
where
    MC: MonteCarlo<Diagram> + ?Sized,
{
    run_production_with(diagram, mc, number_of_steps, frequency, |_| {})
}

/// Same as [`run_production`] but call `on_step` with the diagram after each
/// step, for instance to advance a progress bar.
///
/// # Errors
/// Return the first error of the Monte Carlo algorithm.
pub fn run_production_with<MC, F>(
    mut diagram: Diagram,
    mc: &mut MC,
    number_of_steps: usize,
    frequency: Real,
    mut on_step: F,
) -> Result<(Diagram, RunStatistics), MC::Error>
where
    MC: MonteCarlo<Diagram> + ?Sized,
    F: FnMut(&Diagram),
{
    info!(number_of_steps, "production start");
    let mut statistics = RunStatistics::with_capacity(number_of_steps);
    for _ in 0..number_of_steps {
        diagram = mc.next_element(diagram)?;
        statistics.record(&diagram, frequency);
        on_step(&diagram);
    }
    debug!(
        recorded = statistics.len(),
        last_order = diagram.order(),
        "production end"
    );
    Ok((diagram, statistics))
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use rand::SeedableRng;

    use super::super::DiagrammaticMonteCarlo;
    use super::*;
    use crate::{diagram::Phonon, model::ModelParameters};

    const SEED_RNG: u64 = 0x45_78_93_f4_4a_b0_67_f0;

    fn walker() -> DiagrammaticMonteCarlo<rand::rngs::StdRng> {
        let parameters = ModelParameters::new(0.4_f64, 1_f64, 10_f64).unwrap();
        DiagrammaticMonteCarlo::new(parameters, rand::rngs::StdRng::seed_from_u64(SEED_RNG))
    }

    #[test]
    fn record() {
        let mut statistics = RunStatistics::new();
        assert!(statistics.is_empty());
        let mut diagram = Diagram::new(10_f64);
        statistics.record(&diagram, 1_f64);
        diagram.insert_phonon(Phonon::new(1_f64, 4_f64).unwrap());
        statistics.record(&diagram, 1_f64);
        assert_eq!(statistics.order_sequence(), &[0, 2]);
        assert_eq!(statistics.energy_sequence(), &[0_f64, 0.1_f64]);
        assert_eq!(statistics.phonon_number_sequence().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn sequence_length() -> Result<(), Box<dyn Error>> {
        let mut mc = walker();
        let diagram = run_thermalization(Diagram::new(10_f64), &mut mc, 321)?;
        assert_eq!(
            mc.insert_counter().proposed() + mc.remove_counter().proposed(),
            321
        );
        for number_of_steps in [0_usize, 1, 17, 2_000] {
            let (_, statistics) =
                run_production(diagram.clone(), &mut mc, number_of_steps, 1_f64)?;
            assert_eq!(statistics.len(), number_of_steps);
            assert_eq!(statistics.order_sequence().len(), number_of_steps);
            assert_eq!(statistics.energy_sequence().len(), number_of_steps);
        }
        Ok(())
    }

    #[test]
    fn record_the_state_after_each_step() -> Result<(), Box<dyn Error>> {
        let mut mc = walker();
        let mut orders = Vec::new();
        let (diagram, statistics) = run_production_with(
            Diagram::new(10_f64),
            &mut mc,
            1_000,
            1_f64,
            |diagram| orders.push(diagram.order()),
        )?;
        assert_eq!(statistics.order_sequence(), orders.as_slice());
        assert_eq!(statistics.order_sequence().last(), Some(&diagram.order()));
        assert!(statistics.order_sequence().iter().all(|order| order % 2 == 0));
        Ok(())
    }
}
