//! Diagrammatic Monte Carlo walker.
//!
//! # Example
//! see [`DiagrammaticMonteCarlo`]

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

use super::{
    super::super::{diagram::Diagram, error::Never, model::ModelParameters, Real},
    probability_of_replacement, propose_phonon, propose_removal_index,
    remove_selection_probability, MonteCarlo, Update, UpdateKind,
};

/// Number of proposed and accepted updates of one kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct UpdateCounter {
    proposed: u64,
    accepted: u64,
}

impl UpdateCounter {
    getter_copy!(
        /// Number of proposed updates.
        pub const,
        proposed,
        u64
    );

    getter_copy!(
        /// Number of accepted updates.
        pub const,
        accepted,
        u64
    );

    /// Fraction of accepted updates, [`None`] if nothing was proposed.
    #[allow(clippy::cast_precision_loss)]
    pub fn acceptance_rate(&self) -> Option<Real> {
        if self.proposed == 0 {
            None
        }
        else {
            Some(self.accepted as Real / self.proposed as Real)
        }
    }

    fn record(&mut self, accepted: bool) {
        self.proposed += 1;
        if accepted {
            self.accepted += 1;
        }
    }
}

/// Metropolis-Hastings walker over the Feynman diagrams of the Holstein polaron.
///
/// One step chooses an update kind (insertion forced on an empty diagram, else
/// insertion or removal with probability 1/2), proposes the update, and accepts
/// it if a uniform draw in `[0, 1)` is lower than the acceptance probability.
///
/// The walker owns the random number generator, all the draws of a run come in
/// order from this single stream, so the run is reproducible from a seed.
///
/// # Example
/// ```
/// # use std::error::Error;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use holstein_diagmc::diagram::Diagram;
/// use holstein_diagmc::model::ModelParameters;
/// use holstein_diagmc::simulation::DiagrammaticMonteCarlo;
/// use rand::SeedableRng;
///
/// let rng = rand::rngs::StdRng::seed_from_u64(0); // change with your seed
/// let parameters = ModelParameters::new(0.3_f64, 1_f64, 50_f64)?;
/// let mut mc = DiagrammaticMonteCarlo::new(parameters, rng);
///
/// let mut diagram = Diagram::new(parameters.time());
/// for _ in 0..100 {
///     mc.step(&mut diagram);
///     println!(
///         "order {}, probability of acceptance during last step {}, accepted: {}",
///         diagram.order(),
///         mc.prob_replace_last(),
///         mc.has_replace_last()
///     );
/// }
/// #     Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct DiagrammaticMonteCarlo<Rng: rand::Rng> {
    parameters: ModelParameters,
    prob_replace_last: Real,
    has_replace_last: bool,
    last_update_kind: Option<UpdateKind>,
    insert_counter: UpdateCounter,
    remove_counter: UpdateCounter,
    rng: Rng,
}

impl<Rng: rand::Rng> DiagrammaticMonteCarlo<Rng> {
    getter!(
        /// Get a ref to the rng.
        pub const,
        rng,
        Rng
    );

    getter!(
        /// Parameters of the model.
        pub const,
        parameters,
        ModelParameters
    );

    getter_copy!(
        /// Probability of acceptance of the last proposed update.
        pub const,
        prob_replace_last,
        Real
    );

    getter_copy!(
        /// Whether the last proposed update was accepted.
        pub const,
        has_replace_last,
        bool
    );

    getter_copy!(
        /// Kind of the last proposed update, [`None`] before the first step.
        pub const,
        last_update_kind,
        Option<UpdateKind>
    );

    getter_copy!(
        /// Statistics of the insertions.
        pub const,
        insert_counter,
        UpdateCounter
    );

    getter_copy!(
        /// Statistics of the removals.
        pub const,
        remove_counter,
        UpdateCounter
    );

    /// Create the walker from the model and a rng.
    pub const fn new(parameters: ModelParameters, rng: Rng) -> Self {
        Self {
            parameters,
            prob_replace_last: 0_f64,
            has_replace_last: false,
            last_update_kind: None,
            insert_counter: UpdateCounter {
                proposed: 0,
                accepted: 0,
            },
            remove_counter: UpdateCounter {
                proposed: 0,
                accepted: 0,
            },
            rng,
        }
    }

    /// Absorb self and return the RNG as owned. It essentially deconstruct the structure.
    #[allow(clippy::missing_const_for_fn)] // false positive
    pub fn rng_owned(self) -> Rng {
        self.rng
    }

    /// Get a mutable reference to the rng.
    pub fn rng_mut(&mut self) -> &mut Rng {
        &mut self.rng
    }

    /// Fraction of accepted insertions, [`None`] if none was proposed.
    pub fn acceptance_rate_insert(&self) -> Option<Real> {
        self.insert_counter.acceptance_rate()
    }

    /// Fraction of accepted removals, [`None`] if none was proposed.
    pub fn acceptance_rate_remove(&self) -> Option<Real> {
        self.remove_counter.acceptance_rate()
    }

    /// Choose the kind of update, a removal is never chosen on an empty diagram.
    ///
    /// No random number is drawn when the diagram is empty.
    pub fn choose_update_kind(&mut self, diagram: &Diagram) -> UpdateKind {
        let phonon_count = diagram.phonon_count();
        if phonon_count == 0 {
            UpdateKind::Insert
        }
        else if self
            .rng
            .gen_bool(remove_selection_probability(phonon_count))
        {
            UpdateKind::Remove
        }
        else {
            UpdateKind::Insert
        }
    }

    /// Propose an update of the given kind.
    ///
    /// Returns [`None`] for a degenerate insertion or a removal on an empty diagram.
    pub fn propose_update(&mut self, diagram: &Diagram, kind: UpdateKind) -> Option<Update> {
        match kind {
            UpdateKind::Insert => {
                propose_phonon(self.parameters.time(), &mut self.rng).map(Update::Insert)
            }
            UpdateKind::Remove => {
                let index = propose_removal_index(diagram.phonon_count(), &mut self.rng)?;
                diagram
                    .phonon(index)
                    .map(|phonon| Update::Remove {
                        index,
                        phonon: *phonon,
                    })
            }
        }
    }

    /// Do one Metropolis-Hastings step in place and return whether the diagram changed.
    ///
    /// # Panics
    /// if the total time of the diagram is not the one of the model.
    pub fn step(&mut self, diagram: &mut Diagram) -> bool {
        assert!(
            (diagram.total_time() - self.parameters.time()).abs()
                <= Real::EPSILON * self.parameters.time(),
            "the diagram propagation time {} differs from the model {}",
            diagram.total_time(),
            self.parameters.time()
        );
        let kind = self.choose_update_kind(diagram);
        let update = self.propose_update(diagram, kind);
        let proba = update.map_or(0_f64, |update| {
            update.acceptance_probability(diagram, &self.parameters)
        });
        let accepted = self.rng.gen::<Real>() < proba;

        self.prob_replace_last = probability_of_replacement(proba);
        self.has_replace_last = accepted;
        self.last_update_kind = Some(kind);
        match kind {
            UpdateKind::Insert => self.insert_counter.record(accepted),
            UpdateKind::Remove => self.remove_counter.record(accepted),
        }

        if accepted {
            if let Some(update) = update {
                update.apply(diagram);
            }
        }
        accepted
    }
}

impl<Rng: rand::Rng> AsRef<Rng> for DiagrammaticMonteCarlo<Rng> {
    fn as_ref(&self) -> &Rng {
        self.rng()
    }
}

impl<Rng: rand::Rng> AsMut<Rng> for DiagrammaticMonteCarlo<Rng> {
    fn as_mut(&mut self) -> &mut Rng {
        self.rng_mut()
    }
}

impl<Rng: rand::Rng> MonteCarlo<Diagram> for DiagrammaticMonteCarlo<Rng> {
    type Error = Never;

    #[inline]
    fn next_element(&mut self, mut state: Diagram) -> Result<Diagram, Self::Error> {
        self.step(&mut state);
        Ok(state)
    }
}
