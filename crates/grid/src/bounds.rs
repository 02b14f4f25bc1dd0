// external crates
use serde::{Deserialize, Serialize};

// ptools modules
use ptools_utils::f;

// internal modules
use crate::error::{Error, Result};

/// Maximum sanctioned energy-to-start nudge, as a relative factor
const ENERGY_NUDGE_LIMIT: f64 = 1.0e-4;

/// Validated, immutable energy bounds of a table
///
/// The bounds fix the energy range of the primary grid and the two nudge
/// factors that keep rows away from known zeros of the response:
///
/// - the table maximum is pushed up by `max_energy_nudge_factor`, so the
///   response at the true maximum is found by interpolation rather than
///   evaluated on the boundary,
/// - each row start is pushed up from its energy by `energy_nudge_factor`,
///   since the response vanishes on the diagonal.
///
/// A value is validated on construction and never mutated in place. The
/// `set_*` shims consume and re-validate for callers that want setter
/// semantics.
///
/// ```rust
/// # use ptools_grid::TableBounds;
/// let bounds = TableBounds::new(0.001, 20.0).unwrap();
///
/// assert_eq!(bounds.min_energy(), 0.001);
/// assert_eq!(bounds.nudged_max_energy(), 20.2);
///
/// // violated preconditions are configuration errors
/// assert!(TableBounds::new(5.0, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableBounds {
    min_energy: f64,
    max_energy: f64,
    max_energy_nudge_factor: f64,
    energy_nudge_factor: f64,
}

impl TableBounds {
    /// New bounds with the conventional 1% maximum nudge and no row nudge
    pub fn new(min_energy: f64, max_energy: f64) -> Result<Self> {
        Self::with_nudge_factors(min_energy, max_energy, 0.01, 0.0)
    }

    /// New bounds with explicit nudge factors
    pub fn with_nudge_factors(
        min_energy: f64,
        max_energy: f64,
        max_energy_nudge_factor: f64,
        energy_nudge_factor: f64,
    ) -> Result<Self> {
        let bounds = Self {
            min_energy,
            max_energy,
            max_energy_nudge_factor,
            energy_nudge_factor,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Minimum table energy
    pub fn min_energy(&self) -> f64 {
        self.min_energy
    }

    /// Maximum table energy, before the nudge
    pub fn max_energy(&self) -> f64 {
        self.max_energy
    }

    /// Relative nudge applied to the table maximum
    pub fn max_energy_nudge_factor(&self) -> f64 {
        self.max_energy_nudge_factor
    }

    /// Relative nudge applied to each row's starting secondary value
    pub fn energy_nudge_factor(&self) -> f64 {
        self.energy_nudge_factor
    }

    /// The table maximum pushed up by the maximum nudge factor
    pub fn nudged_max_energy(&self) -> f64 {
        self.max_energy * (1.0 + self.max_energy_nudge_factor)
    }

    /// Starting secondary value for the row at `energy`
    ///
    /// The energy nudged up by the row nudge factor, clipped to stay within
    /// the table.
    pub fn nudged_start(&self, energy: f64) -> f64 {
        (energy * (1.0 + self.energy_nudge_factor))
            .max(self.min_energy)
            .min(self.nudged_max_energy())
    }

    /// Replace the minimum table energy, re-validating
    pub fn set_min_energy(self, min_energy: f64) -> Result<Self> {
        Self::with_nudge_factors(
            min_energy,
            self.max_energy,
            self.max_energy_nudge_factor,
            self.energy_nudge_factor,
        )
    }

    /// Replace the maximum table energy, re-validating
    ///
    /// The nudged maximum is derived, so it tracks this change.
    pub fn set_max_energy(self, max_energy: f64) -> Result<Self> {
        Self::with_nudge_factors(
            self.min_energy,
            max_energy,
            self.max_energy_nudge_factor,
            self.energy_nudge_factor,
        )
    }

    /// Replace the maximum energy nudge factor, re-validating
    pub fn set_max_energy_nudge_factor(self, factor: f64) -> Result<Self> {
        Self::with_nudge_factors(self.min_energy, self.max_energy, factor, self.energy_nudge_factor)
    }

    /// Replace the row start nudge factor, re-validating
    pub fn set_energy_nudge_factor(self, factor: f64) -> Result<Self> {
        Self::with_nudge_factors(
            self.min_energy,
            self.max_energy,
            self.max_energy_nudge_factor,
            factor,
        )
    }

    fn validate(&self) -> Result<()> {
        if !(self.min_energy.is_finite() && self.min_energy > 0.0) {
            return Err(Error::Configuration {
                reason: f!("minimum table energy {} must be finite and positive", self.min_energy),
            });
        }
        if !(self.max_energy.is_finite() && self.max_energy > self.min_energy) {
            return Err(Error::Configuration {
                reason: f!(
                    "maximum table energy {} must be finite and above the minimum {}",
                    self.max_energy,
                    self.min_energy
                ),
            });
        }
        if !(self.max_energy_nudge_factor.is_finite() && self.max_energy_nudge_factor >= 0.0) {
            return Err(Error::Configuration {
                reason: f!(
                    "maximum energy nudge factor {} must be non-negative",
                    self.max_energy_nudge_factor
                ),
            });
        }
        if !self.energy_nudge_factor.is_finite()
            || !(0.0..=ENERGY_NUDGE_LIMIT).contains(&self.energy_nudge_factor)
        {
            return Err(Error::Configuration {
                reason: f!(
                    "energy nudge factor {} must be within [0, {ENERGY_NUDGE_LIMIT}]",
                    self.energy_nudge_factor
                ),
            });
        }
        Ok(())
    }
}
