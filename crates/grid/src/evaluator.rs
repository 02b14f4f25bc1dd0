// ptools modules
use ptools_utils::f;

// internal modules
use crate::error::{Error, Result};

/// The bivariate response a table is generated for
///
/// Implementations are injected into the generators and treated as pure
/// functions of `(energy, secondary)`. The two peak helpers describe the
/// shape of the response so that rows can be seeded through their maximum,
/// which is where refinement effort is otherwise concentrated.
///
/// The response is expected to vanish on the diagonal `secondary <= energy`,
/// which is why the first point of every generated row carries a forced zero
/// rather than an evaluated value.
pub trait ResponseEvaluator {
    /// Response at the given energy and secondary upper bound
    fn evaluate(&self, energy: f64, secondary: f64) -> Result<f64>;

    /// Secondary location of the response maximum at this energy
    ///
    /// `None` when the response has no interior maximum at this energy, in
    /// which case rows are seeded with their endpoints only.
    fn peak_location(&self, energy: f64) -> Option<f64>;

    /// The energy whose response maximum falls at the given secondary value
    ///
    /// Inverse of [ResponseEvaluator::peak_location], useful to callers
    /// choosing energies of interest for a table covering a secondary range.
    fn energy_of_peak(&self, secondary: f64) -> f64;
}

/// Evaluate the response, rejecting non-finite output
///
/// A NaN or infinite response is a contract violation by the evaluator and
/// fails the whole generate call rather than being accepted into a grid.
pub(crate) fn checked_response<E: ResponseEvaluator>(
    evaluator: &E,
    energy: f64,
    secondary: f64,
) -> Result<f64> {
    let value = evaluator.evaluate(energy, secondary)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NumericalDegeneracy {
            reason: f!("response at energy {energy}, secondary {secondary} is not finite"),
        })
    }
}
