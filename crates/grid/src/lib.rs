//! Adaptive grid generation to interpolation accuracy
//!
#![doc = include_str!("../readme.md")]

// Modules
mod bounds;
mod convergence;
mod error;
mod evaluator;
mod policy;
mod primary;
mod secondary;

// Flatten
#[doc(inline)]
pub use crate::bounds::TableBounds;

#[doc(inline)]
pub use crate::convergence::{relative_error, Diagnostics, Tolerances};

#[doc(inline)]
pub use crate::error::{Error, Result};

#[doc(inline)]
pub use crate::evaluator::ResponseEvaluator;

#[doc(inline)]
pub use crate::policy::{InterpPolicy, Scaling};

#[doc(inline)]
pub use crate::primary::{PrimaryGridGenerator, RaggedTable};

#[doc(inline)]
pub use crate::secondary::{SecondaryGrid, SecondaryGridGenerator};
