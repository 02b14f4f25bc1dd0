//! `ptools` is a semi-modular toolkit for adaptive cross section grid
//! generation
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use ptools_utils as utils;

#[cfg(feature = "grid")]
#[cfg_attr(docsrs, doc(cfg(feature = "grid")))]
#[doc(inline)]
pub use ptools_grid as grid;

#[cfg(feature = "adjoint")]
#[cfg_attr(docsrs, doc(cfg(feature = "adjoint")))]
#[doc(inline)]
pub use ptools_adjoint as adjoint;
