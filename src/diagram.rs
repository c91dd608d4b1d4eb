//! Feynman diagram of the electron propagator, see [`Diagram`].

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

use super::Real;

/// Internal phonon line, both of its vertices attach to the electron line.
///
/// It is created by an accepted insertion and destroyed by an accepted removal,
/// it is never moved.
///
/// # Example
/// ```
/// use holstein_diagmc::diagram::Phonon;
///
/// let phonon = Phonon::new(1_f64, 3.5_f64).unwrap();
/// assert_eq!(phonon.interaction_time(), 2.5_f64);
/// assert!(Phonon::new(2_f64, 1_f64).is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Phonon {
    t_start: Real,
    t_end: Real,
}

impl Phonon {
    /// Create a phonon line between `t_start` and `t_end`.
    ///
    /// Returns [`None`] unless `0 <= t_start < t_end` and both times are finite.
    pub fn new(t_start: Real, t_end: Real) -> Option<Self> {
        if t_start.is_finite() && t_end.is_finite() && 0_f64 <= t_start && t_start < t_end {
            Some(Self { t_start, t_end })
        }
        else {
            None
        }
    }

    getter_copy!(
        /// Imaginary time of the vertex where the phonon is emitted.
        pub const,
        t_start,
        Real
    );

    getter_copy!(
        /// Imaginary time of the vertex where the phonon is absorbed.
        pub const,
        t_end,
        Real
    );

    /// Length of the phonon propagator `t_end - t_start`.
    pub fn interaction_time(&self) -> Real {
        self.t_end - self.t_start
    }
}

/// Diagram sampled by the Markov chain: an electron line over `[0, total_time]`
/// dressed with internal phonon lines.
///
/// The order (number of vertices) is always twice the number of phonons.
/// The only mutations are [`Diagram::insert_phonon`] and [`Diagram::remove_phonon`].
///
/// # Example
/// ```
/// use holstein_diagmc::diagram::{Diagram, Phonon};
///
/// let mut diagram = Diagram::new(10_f64);
/// assert_eq!(diagram.order(), 0);
///
/// diagram.insert_phonon(Phonon::new(1_f64, 2_f64).unwrap());
/// diagram.insert_phonon(Phonon::new(0.5_f64, 8_f64).unwrap());
/// assert_eq!(diagram.order(), 4);
/// assert_eq!(diagram.phonon_count(), 2);
///
/// let removed = diagram.remove_phonon(0);
/// assert_eq!(removed.t_start(), 1_f64);
/// assert_eq!(diagram.order(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Diagram {
    phonon_list: Vec<Phonon>,
    order: usize,
    total_time: Real,
}

impl Diagram {
    /// Diagram of order 0, the bare electron propagating during `total_time`.
    ///
    /// # Panics
    /// if `total_time` is not strictly positive and finite.
    pub fn new(total_time: Real) -> Self {
        assert!(
            total_time.is_finite() && total_time > 0_f64,
            "the propagation time must be > 0 but is {}",
            total_time
        );
        Self {
            phonon_list: Vec::new(),
            order: 0,
            total_time,
        }
    }

    getter!(
        /// Phonon lines of the diagram, in insertion order.
        pub,
        phonon_list,
        [Phonon]
    );

    getter_copy!(
        /// Number of vertices on the electron line.
        pub const,
        order,
        usize
    );

    getter_copy!(
        /// Propagation time of the electron.
        pub const,
        total_time,
        Real
    );

    /// Number of internal phonons, `order / 2`.
    pub const fn phonon_count(&self) -> usize {
        self.order / 2
    }

    /// Get the phonon at `index`, [`None`] if out of bound.
    pub fn phonon(&self, index: usize) -> Option<&Phonon> {
        self.phonon_list.get(index)
    }

    /// `Σ_i (t_end_i - t_start_i)` over all the phonon lines.
    pub fn interaction_time_sum(&self) -> Real {
        self.phonon_list.iter().map(Phonon::interaction_time).sum()
    }

    /// Energy estimator of the diagram `(ω Σ Δt_i - order) / τ`, zero at order 0.
    pub fn energy(&self, frequency: Real) -> Real {
        if self.order == 0 {
            0_f64
        }
        else {
            #[allow(clippy::cast_precision_loss)] // order is small
            let order = self.order as Real;
            (frequency * self.interaction_time_sum() - order) / self.total_time
        }
    }

    /// Append a phonon line and increase the order by 2.
    ///
    /// # Panics
    /// if the phonon ends after [`Diagram::total_time`].
    pub fn insert_phonon(&mut self, phonon: Phonon) {
        assert!(
            phonon.t_end() <= self.total_time,
            "phonon {:?} ends after the propagation time {}",
            phonon,
            self.total_time
        );
        self.phonon_list.push(phonon);
        self.order += 2;
        self.debug_check_invariant();
    }

    /// Remove the phonon line at `index`, decrease the order by 2
    /// and return the removed line. The order of the other lines is kept.
    ///
    /// # Panics
    /// if `index` is out of bound, in particular on a diagram of order 0.
    pub fn remove_phonon(&mut self, index: usize) -> Phonon {
        assert!(
            index < self.phonon_list.len(),
            "cannot remove phonon {} from a diagram with {} phonons",
            index,
            self.phonon_list.len()
        );
        let phonon = self.phonon_list.remove(index);
        self.order -= 2;
        self.debug_check_invariant();
        phonon
    }

    #[inline]
    fn debug_check_invariant(&self) {
        debug_assert_eq!(self.order, 2 * self.phonon_list.len());
    }
}
