//! Adjoint Compton scattering kinematics
//!
//! In the adjoint picture the photon gains energy, so the scattering angle
//! and energy gain are bounded by a maximum outgoing energy rather than a
//! minimum. All energies are in MeV.

// internal modules
use crate::constants::ELECTRON_REST_MASS_ENERGY;

/// Outgoing adjoint Compton line energy for a given scattering angle cosine
///
/// The incoming energy must stay clear of the singular angle, i.e.
/// `energy < me / (1 - mu)` for `mu < 1`.
pub fn adjoint_compton_line_energy(energy: f64, mu: f64) -> f64 {
    debug_assert!(energy > 0.0);
    debug_assert!((-1.0..=1.0).contains(&mu));

    energy / (1.0 - energy * (1.0 - mu) / ELECTRON_REST_MASS_ENERGY)
}

/// Minimum scattering angle cosine reaching at most `max_energy`
///
/// Angles below this would boost the photon beyond the maximum outgoing
/// energy. Clipped to the physical range.
pub fn min_scattering_angle_cosine(energy: f64, max_energy: f64) -> f64 {
    debug_assert!(energy > 0.0 && energy <= max_energy);

    let mu = 1.0 - ELECTRON_REST_MASS_ENERGY * (1.0 / energy - 1.0 / max_energy);
    mu.max(-1.0)
}

/// Minimum scattering angle cosine with no outgoing energy limit
pub fn absolute_min_scattering_angle_cosine(energy: f64) -> f64 {
    debug_assert!(energy > 0.0);

    if energy <= 0.5 * ELECTRON_REST_MASS_ENERGY {
        -1.0
    } else {
        1.0 - ELECTRON_REST_MASS_ENERGY / energy
    }
}

/// Minimum ratio of incoming to outgoing energy reaching at most `max_energy`
pub fn min_inverse_energy_gain_ratio(energy: f64, max_energy: f64) -> f64 {
    debug_assert!(energy > 0.0 && energy <= max_energy);

    (1.0 - 2.0 * energy / ELECTRON_REST_MASS_ENERGY).max(energy / max_energy)
}

/// Minimum ratio of incoming to outgoing energy with no energy limit
pub fn absolute_min_inverse_energy_gain_ratio(energy: f64) -> f64 {
    debug_assert!(energy > 0.0);

    (1.0 - 2.0 * energy / ELECTRON_REST_MASS_ENERGY).max(0.0)
}

/// Incoming energy at which the integrated cross section peaks, for a given
/// maximum outgoing energy
pub fn energy_of_max_cross_section(max_energy: f64) -> f64 {
    debug_assert!(max_energy > 0.0);

    max_energy / (1.0 + 2.0 * max_energy / ELECTRON_REST_MASS_ENERGY)
}

/// Maximum outgoing energy at which the cross section at this incoming
/// energy peaks
///
/// Above the peak the backscatter limit takes over and the integrated cross
/// section is flat in the maximum energy. `None` when the incoming energy is
/// at or above half the electron rest mass energy, where no finite peak
/// exists.
pub fn max_energy_of_max_cross_section(energy: f64) -> Option<f64> {
    debug_assert!(energy > 0.0);

    let alpha = energy / ELECTRON_REST_MASS_ENERGY;
    if alpha >= 0.5 {
        None
    } else {
        Some(energy / (1.0 - 2.0 * alpha))
    }
}

/// Whether the cross section at this incoming energy has a finite peak
pub fn has_max_cross_section(energy: f64) -> bool {
    energy < 0.5 * ELECTRON_REST_MASS_ENERGY
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptools_grid::relative_error;

    #[test]
    fn compton_line_energies() {
        let line = adjoint_compton_line_energy(0.1, -1.0);
        assert!(relative_error(line, 0.16430890703649043) < 1e-14);

        let line = adjoint_compton_line_energy(0.1, 0.0);
        assert!(relative_error(line, 0.12433096476298923) < 1e-14);

        let line = adjoint_compton_line_energy(1.0, 0.9);
        assert!(relative_error(line, 1.243309647629892) < 1e-14);

        // forward scattering leaves the energy unchanged
        assert_eq!(adjoint_compton_line_energy(0.1, 1.0), 0.1);
    }

    #[test]
    fn min_scattering_angle_cosines() {
        let mu = min_scattering_angle_cosine(0.09, 0.1);
        assert!(relative_error(mu, 0.4322234331888879) < 1e-14);

        let mu = min_scattering_angle_cosine(0.3, 10.0);
        assert!(relative_error(mu, -0.6522298094203334) < 1e-14);

        // tight window forces forward scattering only
        assert_eq!(min_scattering_angle_cosine(0.1, 0.1), 1.0);
    }

    #[test]
    fn absolute_min_scattering_angle_cosines() {
        // below me/2 every angle is reachable
        assert_eq!(absolute_min_scattering_angle_cosine(0.1), -1.0);

        let mu = absolute_min_scattering_angle_cosine(1.0);
        assert!(relative_error(mu, 0.48900108987) < 1e-11);

        let mu = absolute_min_scattering_angle_cosine(10.0);
        assert!(relative_error(mu, 0.948900108987) < 1e-11);
    }

    #[test]
    fn min_inverse_energy_gain_ratios() {
        let ratio = min_inverse_energy_gain_ratio(0.01, 0.1);
        assert!(relative_error(ratio, 0.9608609732750468) < 1e-14);

        // the energy limit dominates far above the backscatter bound
        assert_eq!(min_inverse_energy_gain_ratio(0.3, 10.0), 0.03);

        let ratio = absolute_min_inverse_energy_gain_ratio(0.1);
        assert!(relative_error(ratio, 0.6086097327504685) < 1e-14);
        assert_eq!(absolute_min_inverse_energy_gain_ratio(0.3), 0.0);
    }

    #[test]
    fn peak_energies() {
        let energy = energy_of_max_cross_section(0.001);
        assert!(relative_error(energy, 0.0009961013562397372) < 1e-14);

        let energy = energy_of_max_cross_section(20.0);
        assert!(relative_error(energy, 0.25227662801581613) < 1e-14);

        let max = max_energy_of_max_cross_section(0.1).unwrap();
        assert!(relative_error(max, 0.16430890703649043) < 1e-14);

        let max = max_energy_of_max_cross_section(0.255).unwrap();
        assert!(relative_error(max, 130.44689223759954) < 1e-14);

        // no finite peak at or above me/2
        assert!(max_energy_of_max_cross_section(0.3).is_none());
        assert!(has_max_cross_section(0.19));
        assert!(!has_max_cross_section(0.3));
    }
}
