//! Result and Error types for ptools-grid

/// Type alias for Result<T, grid::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `ptools-grid` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A configuration value failed its validity checks
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    /// Refinement is required but floating point precision is exhausted, or a
    /// response value is not a finite number
    #[error("numerical degeneracy: {reason}")]
    NumericalDegeneracy { reason: String },

    /// The injected response evaluator could not produce a value
    #[error("evaluator failure at energy {energy}, secondary {secondary}: {reason}")]
    Evaluator {
        energy: f64,
        secondary: f64,
        reason: String,
    },

    /// An interval search on a generated grid failed
    #[error("grid lookup failed")]
    Lookup(#[from] ptools_utils::Error),
}
