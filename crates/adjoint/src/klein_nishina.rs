// standard library
use std::f64::consts::PI;

// ptools modules
use ptools_grid::{Error, ResponseEvaluator, Result};
use ptools_utils::f;

// internal modules
use crate::constants::{CLASSICAL_ELECTRON_RADIUS, ELECTRON_REST_MASS_ENERGY};
use crate::kinematics::{
    adjoint_compton_line_energy, energy_of_max_cross_section, max_energy_of_max_cross_section,
    min_scattering_angle_cosine,
};

/// Free electron adjoint incoherent cross section evaluator
///
/// The integrated adjoint Klein-Nishina cross section has a closed form, so
/// evaluation needs no quadrature. As a function of the maximum outgoing
/// energy at fixed incoming energy it rises from zero on the diagonal to a
/// peak at the backscatter limit, then stays flat, which is the shape the
/// grid generators seed their rows around.
///
/// Implements [ResponseEvaluator] with the incoming energy as the primary
/// axis and the maximum outgoing energy as the secondary axis.
///
/// ```rust
/// # use ptools_adjoint::KleinNishinaAdjoint;
/// let evaluator = KleinNishinaAdjoint;
///
/// // cm^2, so roughly 0.7 barns
/// let cs = evaluator.cross_section(0.1, 20.2);
/// assert!((cs * 1e24 - 0.7016975606278663).abs() < 1e-9);
///
/// // nothing to gain below the incoming energy
/// assert_eq!(evaluator.cross_section(0.1, 0.05), 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KleinNishinaAdjoint;

impl KleinNishinaAdjoint {
    /// Integrated adjoint Klein-Nishina cross section [cm^2]
    ///
    /// Incoming energy and maximum outgoing energy in MeV. Zero whenever the
    /// maximum outgoing energy offers no room for an energy gain.
    pub fn cross_section(&self, energy: f64, max_energy: f64) -> f64 {
        if max_energy <= energy {
            return 0.0;
        }

        let alpha = energy / ELECTRON_REST_MASS_ENERGY;
        let x = (1.0 - 2.0 * alpha).max(energy / max_energy);
        let u = 1.0 - x;

        let term =
            (1.0 - x * x) / 2.0 - x.ln() - u * u / alpha + u * u * u / (3.0 * alpha * alpha);

        PI * CLASSICAL_ELECTRON_RADIUS * CLASSICAL_ELECTRON_RADIUS / alpha * term
    }

    /// Adjoint Klein-Nishina cross section differential in the scattering
    /// angle cosine [cm^2]
    ///
    /// Zero below the minimum angle cosine that keeps the outgoing energy
    /// within `max_energy`.
    pub fn angular_cross_section(&self, energy: f64, max_energy: f64, mu: f64) -> f64 {
        if mu < min_scattering_angle_cosine(energy, max_energy) {
            return 0.0;
        }

        let outgoing = adjoint_compton_line_energy(energy, mu);
        PI * CLASSICAL_ELECTRON_RADIUS
            * CLASSICAL_ELECTRON_RADIUS
            * (outgoing / energy + energy / outgoing - 1.0 + mu * mu)
    }
}

impl ResponseEvaluator for KleinNishinaAdjoint {
    fn evaluate(&self, energy: f64, secondary: f64) -> Result<f64> {
        if !(energy.is_finite() && energy > 0.0) || !secondary.is_finite() {
            return Err(Error::Evaluator {
                energy,
                secondary,
                reason: f!("cross section arguments must be finite, with a positive energy"),
            });
        }
        Ok(self.cross_section(energy, secondary))
    }

    fn peak_location(&self, energy: f64) -> Option<f64> {
        max_energy_of_max_cross_section(energy)
    }

    fn energy_of_peak(&self, secondary: f64) -> f64 {
        energy_of_max_cross_section(secondary)
    }
}
