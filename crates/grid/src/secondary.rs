// standard library
use std::collections::VecDeque;

// external crates
use log::warn;
use serde::{Deserialize, Serialize};

// ptools modules
use ptools_utils::{f, SliceExt, ValueExt};

// internal modules
use crate::bounds::TableBounds;
use crate::convergence::{Diagnostics, Tolerances, Verdict};
use crate::error::{Error, Result};
use crate::evaluator::{checked_response, ResponseEvaluator};
use crate::policy::InterpPolicy;

/// One generated row: the secondary grid at a single fixed energy
///
/// Points and values are raw (unprocessed), strictly increasing in the
/// points, and positionally parallel. The first point is the nudged row
/// start and always carries a value of exactly zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryGrid {
    /// Secondary axis points, strictly increasing
    pub points: Vec<f64>,
    /// Response value at each point
    pub values: Vec<f64>,
    /// Safety-valve acceptances recorded while refining this row
    pub diagnostics: Diagnostics,
}

impl SecondaryGrid {
    /// Number of grid points in the row
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True for a row with no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Interpolate the stored values at any secondary within the row
    ///
    /// Uses the same policy form the row was generated under, so the result
    /// is within the generation tolerances of the true response.
    pub fn interpolate(&self, policy: InterpPolicy, secondary: f64) -> Result<f64> {
        let scale = policy.secondary();
        let processed: Vec<f64> = self.points.iter().map(|x| scale.process(*x)).collect();
        let idx = processed.find_interval(scale.process(secondary))?;
        Ok(policy.interpolate(
            self.points[idx],
            self.points[idx + 1],
            secondary,
            self.values[idx],
            self.values[idx + 1],
        ))
    }
}

/// Builds the secondary grid of one row to interpolation accuracy
///
/// For a fixed energy, refines the secondary axis by bisection until linear
/// interpolation (in the processed coordinates of the chosen policy)
/// reproduces the evaluator at every interval midpoint within tolerance.
///
/// Rows are seeded through the response peak where one exists, and the row
/// origin is the nudged energy itself with a forced value of exactly zero,
/// which is never evaluated.
#[derive(Debug)]
pub struct SecondaryGridGenerator<'a, E> {
    evaluator: &'a E,
    bounds: TableBounds,
    policy: InterpPolicy,
    tolerances: Tolerances,
}

impl<'a, E: ResponseEvaluator> SecondaryGridGenerator<'a, E> {
    /// New generator with default tolerances
    pub fn new(evaluator: &'a E, bounds: TableBounds, policy: InterpPolicy) -> Self {
        Self {
            evaluator,
            bounds,
            policy,
            tolerances: Tolerances::default(),
        }
    }

    /// Replace the refinement tolerances
    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Generate the row at the given (raw) energy
    pub fn generate(&self, energy: f64) -> Result<SecondaryGrid> {
        if !energy.is_finite()
            || energy < self.bounds.min_energy()
            || energy > self.bounds.max_energy()
        {
            return Err(Error::Configuration {
                reason: f!(
                    "row energy {energy} outside table bounds [{}, {}]",
                    self.bounds.min_energy(),
                    self.bounds.max_energy()
                ),
            });
        }

        let start = self.bounds.nudged_start(energy);
        let max = self.bounds.nudged_max_energy();

        // row origin, forced to zero and never evaluated
        let mut seeds = vec![(start, 0.0)];

        if let Some(peak) = self.evaluator.peak_location(energy) {
            if start < peak && peak < max {
                seeds.push((peak, checked_response(self.evaluator, energy, peak)?));
            }
        }
        seeds.push((max, checked_response(self.evaluator, energy, max)?));

        let points: Vec<f64> = seeds.iter().map(|s| s.0).collect();
        if !points.is_strictly_increasing() {
            return Err(Error::NumericalDegeneracy {
                reason: f!("seed points for the row at energy {energy} are not strictly increasing"),
            });
        }

        self.refine(energy, seeds.into())
    }

    /// Bisection sweep over an explicit interval worklist
    ///
    /// The front pair of the queue is the interval under test. Converged
    /// intervals retire their lower point to the output, failures insert the
    /// midpoint and retest the lower half.
    fn refine(&self, energy: f64, mut queue: VecDeque<(f64, f64)>) -> Result<SecondaryGrid> {
        let mut points = Vec::new();
        let mut values = Vec::new();
        let mut diagnostics = Diagnostics::default();

        let (mut x0, mut y0) = match queue.pop_front() {
            Some(origin) => origin,
            None => {
                return Err(Error::NumericalDegeneracy {
                    reason: f!("no seed points for the row at energy {energy}"),
                })
            }
        };

        while let Some(&(x1, y1)) = queue.front() {
            let mid = self.policy.secondary_midpoint(x0, x1);
            let estimate = self.policy.interpolate(x0, x1, mid, y0, y1);
            let exact = checked_response(self.evaluator, energy, mid)?;

            match self.tolerances.interval_verdict(exact, estimate, x0, x1) {
                Verdict::Failed => {
                    if !(x0 < mid && mid < x1) {
                        return Err(Error::NumericalDegeneracy {
                            reason: f!(
                                "midpoint of [{}, {}] is not representable between its neighbours",
                                x0.sci(6, 2),
                                x1.sci(6, 2)
                            ),
                        });
                    }
                    queue.push_front((mid, exact));
                }
                verdict => {
                    match verdict {
                        Verdict::DistanceValve => {
                            diagnostics.distance_hits += 1;
                            warn!(
                                "dirty convergence: secondary interval [{}, {}] at energy {} accepted on distance",
                                x0.sci(6, 2),
                                x1.sci(6, 2),
                                energy.sci(6, 2)
                            );
                        }
                        Verdict::AbsoluteDiffValve => {
                            diagnostics.absolute_diff_hits += 1;
                            warn!(
                                "dirty convergence: secondary interval [{}, {}] at energy {} accepted on absolute difference",
                                x0.sci(6, 2),
                                x1.sci(6, 2),
                                energy.sci(6, 2)
                            );
                        }
                        _ => {}
                    }
                    points.push(x0);
                    values.push(y0);
                    if let Some(next) = queue.pop_front() {
                        (x0, y0) = next;
                    }
                }
            }
        }

        points.push(x0);
        values.push(y0);

        Ok(SecondaryGrid {
            points,
            values,
            diagnostics,
        })
    }
}
