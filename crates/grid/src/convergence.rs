// external crates
use serde::{Deserialize, Serialize};

// ptools modules
use ptools_utils::f;

// internal modules
use crate::error::{Error, Result};

/// Scale-free relative difference between two values
///
/// Defined as `|a - b| / max(|a|, |b|)`, and exactly zero when both values
/// are zero. Used both for interpolation error and for the relative distance
/// of adjacent processed abscissae.
///
/// ```rust
/// # use ptools_grid::relative_error;
/// assert_eq!(relative_error(1.0, 0.5), 0.5);
/// assert_eq!(relative_error(0.0, 0.0), 0.0);
/// ```
pub fn relative_error(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        0.0
    } else {
        (a - b).abs() / scale
    }
}

/// Outcome of testing one interval or abscissa against the tolerances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// Within the convergence tolerance
    Clean,
    /// Accepted by the absolute difference floor only
    AbsoluteDiffValve,
    /// Accepted by the minimum distance valve only
    DistanceValve,
    /// Refinement required
    Failed,
}

/// Counters for safety-valve acceptances during one generate call
///
/// Non-zero counts flag regions of the returned grid where the convergence
/// tolerance was not met and refinement was cut short. Each acceptance is
/// also logged as a warning as it happens.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Intervals accepted because adjacent points hit the distance tolerance
    pub distance_hits: usize,
    /// Checks accepted because the difference hit the absolute floor
    pub absolute_diff_hits: usize,
}

impl Diagnostics {
    /// True when every acceptance met the convergence tolerance
    pub fn is_clean(&self) -> bool {
        self.distance_hits == 0 && self.absolute_diff_hits == 0
    }

    pub(crate) fn absorb(&mut self, other: Diagnostics) {
        self.distance_hits += other.distance_hits;
        self.absolute_diff_hits += other.absolute_diff_hits;
    }
}

/// Tolerances driving grid refinement
///
/// Refinement of an interval stops once the interpolated midpoint value is
/// within `convergence` (relative) of the true response. The two remaining
/// fields are safety valves: `absolute_diff` accepts differences too small
/// to matter in absolute terms, and `distance` accepts intervals whose raw
/// endpoints are already as close as floating point coordinates can usefully
/// get.
///
/// ```rust
/// # use ptools_grid::Tolerances;
/// let tol = Tolerances::default();
/// assert_eq!(tol.convergence(), 1.0e-3);
/// assert_eq!(tol.absolute_diff(), 1.0e-12);
/// assert_eq!(tol.distance(), 1.0e-14);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    convergence: f64,
    absolute_diff: f64,
    distance: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            convergence: 1.0e-3,
            absolute_diff: 1.0e-12,
            distance: 1.0e-14,
        }
    }
}

impl Tolerances {
    /// New validated tolerance set
    pub fn new(convergence: f64, absolute_diff: f64, distance: f64) -> Result<Self> {
        if !(convergence > 0.0 && convergence <= 1.0) {
            return Err(Error::Configuration {
                reason: f!("convergence tolerance {convergence} must be within (0, 1]"),
            });
        }
        if !(0.0..=1.0).contains(&absolute_diff) {
            return Err(Error::Configuration {
                reason: f!("absolute difference tolerance {absolute_diff} must be within [0, 1]"),
            });
        }
        if !(0.0..=1.0).contains(&distance) {
            return Err(Error::Configuration {
                reason: f!("distance tolerance {distance} must be within [0, 1]"),
            });
        }
        Ok(Self {
            convergence,
            absolute_diff,
            distance,
        })
    }

    /// Target relative interpolation error
    pub fn convergence(&self) -> f64 {
        self.convergence
    }

    /// Absolute difference floor for responses near zero
    pub fn absolute_diff(&self) -> f64 {
        self.absolute_diff
    }

    /// Minimum relative separation of adjacent raw grid points
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Test one interval midpoint against the full set of tolerances
    ///
    /// `a` and `b` are the raw abscissae bracketing the midpoint.
    pub(crate) fn interval_verdict(&self, exact: f64, estimate: f64, a: f64, b: f64) -> Verdict {
        match self.value_verdict(exact, estimate) {
            Verdict::Failed if relative_error(a, b) <= self.distance => Verdict::DistanceValve,
            verdict => verdict,
        }
    }

    /// Test an interpolated value alone, without the distance valve
    pub(crate) fn value_verdict(&self, exact: f64, estimate: f64) -> Verdict {
        if relative_error(exact, estimate) <= self.convergence {
            Verdict::Clean
        } else if (exact - estimate).abs() <= self.absolute_diff {
            Verdict::AbsoluteDiffValve
        } else {
            Verdict::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_error_cases() {
        assert_eq!(relative_error(2.0, 1.0), 0.5);
        assert_eq!(relative_error(-2.0, -1.0), 0.5);
        assert_eq!(relative_error(0.0, 0.0), 0.0);
        assert_eq!(relative_error(0.0, 1.0), 1.0);
    }

    #[test]
    fn tolerance_validation() {
        assert!(Tolerances::new(1.0e-3, 1.0e-33, 1.0e-6).is_ok());

        // closed range boundaries are accepted
        assert!(Tolerances::new(1.0, 1.0, 1.0).is_ok());
        assert!(Tolerances::new(1.0e-3, 0.0, 0.0).is_ok());

        assert!(Tolerances::new(0.0, 1.0e-12, 1.0e-14).is_err());
        assert!(Tolerances::new(1.1, 1.0e-12, 1.0e-14).is_err());
        assert!(Tolerances::new(1.0e-3, -1.0, 1.0e-14).is_err());
        assert!(Tolerances::new(1.0e-3, 1.5, 1.0e-14).is_err());
        assert!(Tolerances::new(1.0e-3, 1.0e-12, -0.1).is_err());
        assert!(Tolerances::new(1.0e-3, 1.0e-12, 1.1).is_err());
    }

    #[test]
    fn verdict_precedence() {
        let tol = Tolerances::new(1.0e-3, 1.0e-8, 1.0e-6).unwrap();

        // clean beats both valves
        assert_eq!(tol.interval_verdict(1.0, 1.0, 0.0, 1.0), Verdict::Clean);

        // tiny absolute difference accepted even at 100% relative error
        assert_eq!(
            tol.interval_verdict(1.0e-9, 0.0, 0.0, 1.0),
            Verdict::AbsoluteDiffValve
        );

        // interval too narrow to split further
        assert_eq!(
            tol.interval_verdict(1.0, 0.5, 1.0, 1.0 + 1.0e-7),
            Verdict::DistanceValve
        );

        // otherwise refinement is required
        assert_eq!(tol.interval_verdict(1.0, 0.5, 0.0, 1.0), Verdict::Failed);
    }

    #[test]
    fn diagnostics_absorb() {
        let mut total = Diagnostics::default();
        assert!(total.is_clean());

        total.absorb(Diagnostics {
            distance_hits: 2,
            absolute_diff_hits: 1,
        });
        total.absorb(Diagnostics {
            distance_hits: 1,
            absolute_diff_hits: 0,
        });

        assert_eq!(total.distance_hits, 3);
        assert_eq!(total.absolute_diff_hits, 1);
        assert!(!total.is_clean());
    }
}
