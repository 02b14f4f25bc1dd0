//! Adjoint photon physics for cross section table generation
//!
#![doc = include_str!("../readme.md")]

// Modules
mod constants;
pub mod kinematics;
mod klein_nishina;

// Flatten
#[doc(inline)]
pub use crate::constants::{CLASSICAL_ELECTRON_RADIUS, ELECTRON_REST_MASS_ENERGY};

#[doc(inline)]
pub use crate::klein_nishina::KleinNishinaAdjoint;
