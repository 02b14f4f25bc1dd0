//! Integration tests for adaptive grid generation over a synthetic response

use std::f64::consts::FRAC_PI_2;

use ptools_grid::{
    relative_error, Error, InterpPolicy, PrimaryGridGenerator, ResponseEvaluator, Result,
    SecondaryGridGenerator, TableBounds, Tolerances,
};
use ptools_utils::SliceExt;
use rstest::{fixture, rstest};

/// Smooth synthetic response vanishing on the diagonal, peaked a quarter
/// period above it
struct SineResponse;

impl ResponseEvaluator for SineResponse {
    fn evaluate(&self, energy: f64, secondary: f64) -> Result<f64> {
        if secondary <= energy {
            Ok(0.0)
        } else {
            Ok((secondary - energy).sin())
        }
    }

    fn peak_location(&self, energy: f64) -> Option<f64> {
        Some(energy + FRAC_PI_2)
    }

    fn energy_of_peak(&self, secondary: f64) -> f64 {
        secondary - FRAC_PI_2
    }
}

/// Response that violates the finite-output contract
struct NanResponse;

impl ResponseEvaluator for NanResponse {
    fn evaluate(&self, _energy: f64, _secondary: f64) -> Result<f64> {
        Ok(f64::NAN)
    }

    fn peak_location(&self, _energy: f64) -> Option<f64> {
        None
    }

    fn energy_of_peak(&self, secondary: f64) -> f64 {
        secondary
    }
}

/// Response whose evaluator fails outright
struct FailingResponse;

impl ResponseEvaluator for FailingResponse {
    fn evaluate(&self, energy: f64, secondary: f64) -> Result<f64> {
        Err(Error::Evaluator {
            energy,
            secondary,
            reason: "unavailable".to_string(),
        })
    }

    fn peak_location(&self, _energy: f64) -> Option<f64> {
        None
    }

    fn energy_of_peak(&self, secondary: f64) -> f64 {
        secondary
    }
}

#[fixture]
fn bounds() -> TableBounds {
    TableBounds::new(0.5, 3.0).unwrap()
}

#[rstest]
#[case(InterpPolicy::LinLin)] // case 1
#[case(InterpPolicy::LinLog)] // case 2
#[case(InterpPolicy::LogLin)] // case 3
#[case(InterpPolicy::LogLog)] // case 4
fn row_structure(bounds: TableBounds, #[case] policy: InterpPolicy) {
    let generator = SecondaryGridGenerator::new(&SineResponse, bounds, policy);
    let row = generator.generate(1.0).unwrap();

    // forced zero origin at the (un-nudged) energy itself
    assert_eq!(row.points[0], 1.0);
    assert_eq!(row.values[0], 0.0);

    // last point is the nudged table maximum with its true value
    let top_point = bounds.nudged_max_energy();
    assert_eq!(*row.points.last().unwrap(), top_point);
    let top = (top_point - 1.0).sin();
    assert!(relative_error(*row.values.last().unwrap(), top) < 1e-14);

    // the seeded peak survives refinement
    assert!(row.points.contains(&(1.0 + FRAC_PI_2)));

    assert!(row.points.is_strictly_increasing());
    assert_eq!(row.points.len(), row.values.len());
    assert!(row.diagnostics.is_clean());
}

#[rstest]
#[case(InterpPolicy::LinLin)] // case 1
#[case(InterpPolicy::LogLog)] // case 2
fn row_meets_stopping_rule(bounds: TableBounds, #[case] policy: InterpPolicy) {
    let tolerances = Tolerances::default();
    let generator =
        SecondaryGridGenerator::new(&SineResponse, bounds, policy).with_tolerances(tolerances);
    let row = generator.generate(0.8).unwrap();

    // every adjacent pair interpolates the true response at its midpoint
    // within the tolerances that drove refinement
    for (pair_x, pair_y) in row.points.windows(2).zip(row.values.windows(2)) {
        let mid = policy.secondary_midpoint(pair_x[0], pair_x[1]);
        let estimate = policy.interpolate(pair_x[0], pair_x[1], mid, pair_y[0], pair_y[1]);
        let exact = SineResponse.evaluate(0.8, mid).unwrap();

        let accepted = relative_error(exact, estimate) <= tolerances.convergence()
            || (exact - estimate).abs() <= tolerances.absolute_diff()
            || relative_error(pair_x[0], pair_x[1]) <= tolerances.distance();
        assert!(accepted, "interval [{}, {}] fails", pair_x[0], pair_x[1]);
    }
}

#[rstest]
fn row_interpolation_reproduces_stored_values(bounds: TableBounds) {
    let generator = SecondaryGridGenerator::new(&SineResponse, bounds, InterpPolicy::LinLin);
    let row = generator.generate(1.2).unwrap();

    for (point, value) in row.points.iter().zip(row.values.iter()) {
        let interpolated = row.interpolate(InterpPolicy::LinLin, *point).unwrap();
        assert!((interpolated - value).abs() < 1e-15);
    }

    // midpoints are within the convergence tolerance of the truth
    for pair in row.points.windows(2) {
        let mid = 0.5 * (pair[0] + pair[1]);
        let estimate = row.interpolate(InterpPolicy::LinLin, mid).unwrap();
        let exact = SineResponse.evaluate(1.2, mid).unwrap();
        assert!(relative_error(exact, estimate) <= 1e-3);
    }
}

#[rstest]
#[case(InterpPolicy::LinLin, true)] // case 1
#[case(InterpPolicy::LogLog, false)] // case 2
fn table_structure(bounds: TableBounds, #[case] policy: InterpPolicy, #[case] clean: bool) {
    let generator = PrimaryGridGenerator::new(&SineResponse, bounds, policy);
    let table = generator.generate().unwrap();

    // energy endpoints are the exact configured bounds
    assert_eq!(table.energies[0], 0.5);
    assert_eq!(*table.energies.last().unwrap(), 3.0);
    assert!(table.energies.is_strictly_increasing());

    // one row per energy, each spanning [energy, nudged max]
    assert_eq!(table.rows.len(), table.energies.len());
    for (energy, row) in table.energies.iter().zip(table.rows.iter()) {
        assert_eq!(row.points[0], *energy);
        assert_eq!(row.values[0], 0.0);
        assert_eq!(*row.points.last().unwrap(), bounds.nudged_max_energy());
        assert!(row.points.is_strictly_increasing());
    }

    // the moving response peak pushes log-axis refinement into the distance
    // valve, while the linear table resolves cleanly
    assert_eq!(table.total_diagnostics().is_clean(), clean);
}

#[rstest]
fn table_interpolation_reproduces_stored_values(bounds: TableBounds) {
    let generator = PrimaryGridGenerator::new(&SineResponse, bounds, InterpPolicy::LinLin);
    let table = generator.generate().unwrap();

    // at grid nodes the unit-base mapping is the identity up to rounding
    for (energy, row) in table.energies.iter().zip(table.rows.iter()) {
        for (point, value) in row.points.iter().zip(row.values.iter()) {
            let interpolated = table.interpolate(InterpPolicy::LinLin, *energy, *point).unwrap();
            assert!((interpolated - value).abs() < 1e-12);
        }
    }
}

#[rstest]
fn table_interpolation_accurate_between_rows(bounds: TableBounds) {
    let generator = PrimaryGridGenerator::new(&SineResponse, bounds, InterpPolicy::LinLin);
    let table = generator.generate().unwrap();
    assert!(table.total_diagnostics().is_clean());

    // sample energies between rows and abscissae between points; values in a
    // row's first interval rest on the forced zero origin and carry no
    // accuracy guarantee, so sampling starts above both first intervals
    let mut worst: f64 = 0.0;
    for (pair, rows) in table.energies.windows(2).zip(table.rows.windows(2)) {
        let top = *rows[0].points.last().unwrap();
        let lower = rows[0].points[1].max(rows[1].points[1]) + (pair[1] - pair[0]);
        if lower >= top {
            continue;
        }
        for beta in [0.25, 0.5, 0.75] {
            let energy = pair[0] + beta * (pair[1] - pair[0]);
            for k in 1..100 {
                let y = lower + (k as f64 / 100.0) * (top - lower);
                let estimate = table.interpolate(InterpPolicy::LinLin, energy, y).unwrap();
                let exact = SineResponse.evaluate(energy, y).unwrap();
                worst = worst.max(relative_error(exact, estimate));
            }
        }
    }
    assert!(worst <= 1.1e-3, "worst off-grid relative error {worst:e}");
}

#[rstest]
fn processed_evaluation_round_trip(bounds: TableBounds) {
    let generator = PrimaryGridGenerator::new(&SineResponse, bounds, InterpPolicy::LinLin);
    let table = generator.generate().unwrap();

    // linear processing is the identity, so stored values round-trip exactly
    for (energy, row) in table.energies.iter().zip(table.rows.iter()) {
        for (point, value) in row.points.iter().zip(row.values.iter()) {
            assert_eq!(generator.evaluate_processed(*energy, *point).unwrap(), *value);
        }
    }

    let generator = PrimaryGridGenerator::new(&SineResponse, bounds, InterpPolicy::LogLog);
    let table = generator.generate().unwrap();

    // log processing recovers coordinates to within rounding; the forced
    // zero origin is skipped since recovery can land an ulp off the diagonal
    for (energy, row) in table.energies.iter().zip(table.rows.iter()) {
        for (point, value) in row.points.iter().zip(row.values.iter()).skip(1) {
            let processed = generator
                .evaluate_processed(energy.ln(), point.ln())
                .unwrap();
            assert!(relative_error(processed, *value) < 1e-12);
        }
    }
}

#[rstest]
fn row_energy_outside_bounds_rejected(bounds: TableBounds) {
    let generator = SecondaryGridGenerator::new(&SineResponse, bounds, InterpPolicy::LinLin);
    assert!(matches!(
        generator.generate(0.1),
        Err(Error::Configuration { .. })
    ));
    assert!(matches!(
        generator.generate(5.0),
        Err(Error::Configuration { .. })
    ));
}

#[rstest]
fn non_finite_response_is_degenerate(bounds: TableBounds) {
    let generator = SecondaryGridGenerator::new(&NanResponse, bounds, InterpPolicy::LinLin);
    assert!(matches!(
        generator.generate(1.0),
        Err(Error::NumericalDegeneracy { .. })
    ));
}

#[rstest]
fn evaluator_failure_propagates(bounds: TableBounds) {
    let generator = PrimaryGridGenerator::new(&FailingResponse, bounds, InterpPolicy::LinLin);
    assert!(matches!(generator.generate(), Err(Error::Evaluator { .. })));
}
