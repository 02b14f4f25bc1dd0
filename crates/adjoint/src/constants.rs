//! Physical constants used by the adjoint photon calculations
//!
//! CODATA 2010 values, consistent with the data the generated tables are
//! compared against.

/// Electron rest mass energy [MeV]
pub const ELECTRON_REST_MASS_ENERGY: f64 = 0.51099891013;

/// Classical electron radius [cm]
pub const CLASSICAL_ELECTRON_RADIUS: f64 = 2.8179403267e-13;
