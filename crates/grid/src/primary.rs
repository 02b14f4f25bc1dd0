// standard library
use std::collections::{HashMap, VecDeque};

// external crates
use itertools::Itertools;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

// ptools modules
use ptools_utils::{f, SliceExt, ValueExt};

// internal modules
use crate::bounds::TableBounds;
use crate::convergence::{relative_error, Diagnostics, Tolerances, Verdict};
use crate::error::{Error, Result};
use crate::evaluator::{checked_response, ResponseEvaluator};
use crate::policy::{InterpPolicy, Scaling};
use crate::secondary::{SecondaryGrid, SecondaryGridGenerator};

/// The full 2-D product: an energy grid with one row per energy
///
/// Rows at different energies generally have different point counts and
/// spacing, so the table is ragged by design. Consumers must not assume a
/// shared secondary abscissa set across rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaggedTable {
    /// Energy grid, strictly increasing
    pub energies: Vec<f64>,
    /// One secondary grid per energy, positionally parallel
    pub rows: Vec<SecondaryGrid>,
    /// Safety-valve acceptances recorded by the energy axis sweep
    pub diagnostics: Diagnostics,
}

impl RaggedTable {
    /// Number of energies in the table
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    /// True for a table with no energies
    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Energy axis diagnostics combined with those of every row
    pub fn total_diagnostics(&self) -> Diagnostics {
        let mut total = self.diagnostics;
        for row in &self.rows {
            total.absorb(row.diagnostics);
        }
        total
    }

    /// Interpolate the table at any (energy, secondary) within its range
    ///
    /// Linear in processed energy between the two bracketing rows, with the
    /// secondary coordinate mapped through unit-base coordinates so rows
    /// with different kinematic lower bounds compare like-for-like. This is
    /// the consumer-side scheme the generator's cross-energy convergence
    /// test holds to the requested tolerance, outside each row's forced
    /// zero first interval.
    pub fn interpolate(&self, policy: InterpPolicy, energy: f64, secondary: f64) -> Result<f64> {
        let primary = policy.primary();
        let scale = policy.secondary();

        let energies: Vec<f64> = self.energies.iter().map(|e| primary.process(*e)).collect();
        let pe = primary.process(energy);
        let idx = energies.find_interval(pe)?;
        let beta = (pe - energies[idx]) / (energies[idx + 1] - energies[idx]);

        let (r0, r1) = (&self.rows[idx], &self.rows[idx + 1]);
        let p0: Vec<f64> = r0.points.iter().map(|x| scale.process(*x)).collect();
        let p1: Vec<f64> = r1.points.iter().map(|x| scale.process(*x)).collect();
        if p0.len() < 2 || p1.len() < 2 {
            return Err(Error::Lookup(ptools_utils::Error::BelowMinimumSliceLength {
                length: p0.len().min(p1.len()),
                minimum_required: 2,
            }));
        }

        // unit-base frame at the requested energy
        let (s0, s1) = (p0[0], p1[0]);
        let top = p0[p0.len() - 1];
        let s_x = s0 + beta * (s1 - s0);
        let eta = ((scale.process(secondary) - s_x) / (top - s_x)).clamp(0.0, 1.0);

        let v0 = lerp_processed(&p0, &r0.values, s0 + eta * (top - s0))?;
        let v1 = lerp_processed(&p1, &r1.values, s1 + eta * (top - s1))?;
        Ok((1.0 - beta) * v0 + beta * v1)
    }
}

/// Linear interpolation of stored values at a processed abscissa, clamped
/// at the grid edges
fn lerp_processed(processed: &[f64], values: &[f64], p: f64) -> Result<f64> {
    let n = processed.len();
    if p <= processed[0] {
        return Ok(values[0]);
    }
    if p >= processed[n - 1] {
        return Ok(values[n - 1]);
    }
    let idx = processed.find_interval(p)?;
    let frac = (p - processed[idx]) / (processed[idx + 1] - processed[idx]);
    Ok(values[idx] + frac * (values[idx + 1] - values[idx]))
}

/// Builds the energy grid, refining wherever cross-energy interpolation fails
///
/// Bisects the energy axis until, for every adjacent energy pair, values
/// interpolated *between* the two rows reproduce the evaluator at the
/// midpoint energy. This is what lets a consumer interpolate the returned
/// table in both dimensions to the requested accuracy, rather than only
/// along each row.
///
/// Every visited energy gets its row from a [SecondaryGridGenerator], cached
/// and never recomputed.
#[derive(Debug)]
pub struct PrimaryGridGenerator<'a, E> {
    evaluator: &'a E,
    bounds: TableBounds,
    policy: InterpPolicy,
    tolerances: Tolerances,
    verbose: bool,
}

impl<'a, E: ResponseEvaluator> PrimaryGridGenerator<'a, E> {
    /// New generator with default tolerances
    pub fn new(evaluator: &'a E, bounds: TableBounds, policy: InterpPolicy) -> Self {
        Self {
            evaluator,
            bounds,
            policy,
            tolerances: Tolerances::default(),
            verbose: false,
        }
    }

    /// Replace the refinement tolerances
    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Promote per-point progress logging from debug to info level
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Evaluate the response at processed coordinates
    ///
    /// Recovers raw coordinates under the active policy before calling the
    /// evaluator. This is the verification path for consumers working in
    /// processed space.
    pub fn evaluate_processed(&self, processed_energy: f64, processed_secondary: f64) -> Result<f64> {
        let energy = self.policy.primary().recover(processed_energy);
        let secondary = self.policy.secondary().recover(processed_secondary);
        self.evaluator.evaluate(energy, secondary)
    }

    /// Generate the full table between the configured bounds
    pub fn generate(&self) -> Result<RaggedTable> {
        let row_generator = SecondaryGridGenerator::new(self.evaluator, self.bounds, self.policy)
            .with_tolerances(self.tolerances);

        let mut cache: HashMap<u64, Row> = HashMap::new();
        let mut diagnostics = Diagnostics::default();
        let mut energies = Vec::new();

        let mut queue = VecDeque::from([self.bounds.min_energy(), self.bounds.max_energy()]);

        let mut e0 = match queue.pop_front() {
            Some(energy) => energy,
            None => {
                return Err(Error::NumericalDegeneracy {
                    reason: "no seed energies".to_string(),
                })
            }
        };
        self.ensure_row(&row_generator, &mut cache, e0)?;

        while let Some(&e1) = queue.front() {
            self.ensure_row(&row_generator, &mut cache, e1)?;

            if self.pair_converged(e0, e1, &row_generator, &mut cache, &mut diagnostics)? {
                energies.push(e0);
                if let Some(next) = queue.pop_front() {
                    e0 = next;
                }
            } else {
                let mid = self.policy.primary_midpoint(e0, e1);
                if !(e0 < mid && mid < e1) {
                    return Err(Error::NumericalDegeneracy {
                        reason: f!(
                            "energy midpoint of [{}, {}] is not representable between its neighbours",
                            e0.sci(6, 2),
                            e1.sci(6, 2)
                        ),
                    });
                }
                self.ensure_row(&row_generator, &mut cache, mid)?;
                queue.push_front(mid);
            }
        }
        energies.push(e0);

        if !energies.is_strictly_increasing() {
            return Err(Error::NumericalDegeneracy {
                reason: "generated energy grid is not strictly increasing".to_string(),
            });
        }

        // hand each kept energy its cached row, in grid order
        let mut rows = Vec::with_capacity(energies.len());
        for energy in &energies {
            match cache.remove(&energy.to_bits()) {
                Some(row) => rows.push(row.inner),
                None => {
                    return Err(Error::NumericalDegeneracy {
                        reason: f!("missing cached row for energy {}", energy.sci(6, 2)),
                    })
                }
            }
        }

        Ok(RaggedTable {
            energies,
            rows,
            diagnostics,
        })
    }

    /// Build and cache the row at an energy, if not already present
    fn ensure_row(
        &self,
        row_generator: &SecondaryGridGenerator<'a, E>,
        cache: &mut HashMap<u64, Row>,
        energy: f64,
    ) -> Result<()> {
        if cache.contains_key(&energy.to_bits()) {
            return Ok(());
        }
        let grid = row_generator.generate(energy)?;
        if self.verbose {
            info!(
                "added energy grid point {} ({} secondary points)",
                energy.sci(6, 2),
                grid.len()
            );
        } else {
            debug!(
                "added energy grid point {} ({} secondary points)",
                energy.sci(6, 2),
                grid.len()
            );
        }
        cache.insert(energy.to_bits(), Row::new(grid, self.policy.secondary()));
        Ok(())
    }

    /// Cross-energy convergence test for one adjacent energy pair
    ///
    /// Abscissae are drawn from three rows: the two under test and the row
    /// at the midpoint energy, whose own refinement follows the response
    /// knee as it moves with energy. Points alone leave the regions between
    /// them unchecked, so the midpoints of consecutive abscissae are tested
    /// as well.
    ///
    /// Each abscissa is mapped through unit-base coordinates relative to
    /// the midpoint row span so the moving kinematic lower bound compares
    /// like-for-like. Positions landing in either row's first (forced zero)
    /// interval are owned by the row's own 1-D test and skipped here, since
    /// their relative interpolation error cannot be reduced by energy
    /// bisection.
    fn pair_converged(
        &self,
        e0: f64,
        e1: f64,
        row_generator: &SecondaryGridGenerator<'a, E>,
        cache: &mut HashMap<u64, Row>,
        diagnostics: &mut Diagnostics,
    ) -> Result<bool> {
        if relative_error(e0, e1) <= self.tolerances.distance() {
            diagnostics.distance_hits += 1;
            warn!(
                "dirty convergence: energy interval [{}, {}] accepted on distance",
                e0.sci(6, 2),
                e1.sci(6, 2)
            );
            return Ok(true);
        }

        let primary = self.policy.primary();
        let mid_energy = primary.recover(0.5 * (primary.process(e0) + primary.process(e1)));

        // the midpoint row is reused from the cache if this pair bisects
        self.ensure_row(row_generator, cache, mid_energy)?;

        let rows = (
            cache.get(&e0.to_bits()),
            cache.get(&e1.to_bits()),
            cache.get(&mid_energy.to_bits()),
        );
        let (r0, r1, rm) = match rows {
            (Some(r0), Some(r1), Some(rm)) => (r0, r1, rm),
            _ => {
                return Err(Error::NumericalDegeneracy {
                    reason: f!(
                        "missing cached rows for energy pair [{}, {}]",
                        e0.sci(6, 2),
                        e1.sci(6, 2)
                    ),
                })
            }
        };

        let secondary = self.policy.secondary();

        // unit-base frame: all rows share the nudged table maximum
        let s0 = r0.start();
        let s1 = r1.start();
        let top = r0.top();
        let span0 = top - s0;
        let span1 = top - s1;
        let s_mid = 0.5 * (s0 + s1);
        let span_mid = top - s_mid;

        let union: Vec<f64> = r0
            .inner
            .points
            .iter()
            .merge(r1.inner.points.iter())
            .merge(rm.inner.points.iter())
            .dedup()
            .copied()
            .collect();

        let mut checked = Vec::with_capacity(2 * union.len());
        for pair in union.windows(2) {
            checked.push(pair[0]);
            checked.push(self.policy.secondary_midpoint(pair[0], pair[1]));
        }
        checked.extend(union.last().copied());

        for abscissa in checked {
            let eta = (secondary.process(abscissa) - s_mid) / span_mid;
            if !(0.0..=1.0).contains(&eta) {
                continue;
            }

            let p0 = s0 + eta * span0;
            let p1 = s1 + eta * span1;

            // the zero-adjacent interval is owned by the 1-D test
            if p0 < r0.second() || p1 < r1.second() {
                continue;
            }

            let estimate = 0.5 * (r0.value_at(p0)? + r1.value_at(p1)?);
            let exact = checked_response(self.evaluator, mid_energy, abscissa)?;

            match self.tolerances.value_verdict(exact, estimate) {
                Verdict::Clean => {}
                Verdict::AbsoluteDiffValve => {
                    diagnostics.absolute_diff_hits += 1;
                    warn!(
                        "dirty convergence: abscissa {} between energies [{}, {}] accepted on absolute difference",
                        abscissa.sci(6, 2),
                        e0.sci(6, 2),
                        e1.sci(6, 2)
                    );
                }
                _ => return Ok(false),
            }
        }

        Ok(true)
    }
}

/// A cached row with its processed abscissae
#[derive(Debug, Clone)]
struct Row {
    inner: SecondaryGrid,
    processed: Vec<f64>,
}

impl Row {
    fn new(inner: SecondaryGrid, scale: Scaling) -> Self {
        let processed = inner.points.iter().map(|x| scale.process(*x)).collect();
        Self { inner, processed }
    }

    /// Processed row origin
    fn start(&self) -> f64 {
        self.processed[0]
    }

    /// Processed second point, closing the forced zero interval
    fn second(&self) -> f64 {
        self.processed[1]
    }

    /// Processed row end, the nudged table maximum
    fn top(&self) -> f64 {
        self.processed[self.processed.len() - 1]
    }

    /// Stored values interpolated at a processed abscissa, clamped at the
    /// row edges
    fn value_at(&self, p: f64) -> Result<f64> {
        lerp_processed(&self.processed, &self.inner.values, p)
    }
}
