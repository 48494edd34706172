use matrixcompare::assert_scalar_eq;
use proptest::prelude::*;
use sneddon::norms::{
    area_weighted_norm, estimate_convergence_orders, interior_l2_error, l2_relative_error, max_relative_error,
    weighted_error, ConvergenceRecord,
};

#[test]
fn area_weighted_norm_of_simple_vector() {
    assert_scalar_eq!(area_weighted_norm(&[3.0, 4.0], &[1.0, 1.0]), 5.0, comp = abs, tol = 1e-15);
    assert_scalar_eq!(area_weighted_norm(&[2.0], &[0.25]), 1.0, comp = abs, tol = 1e-15);
}

#[test]
fn identical_profiles_have_zero_relative_error() {
    let profile = [1.0, 1.5, 2.0, 1.5, 1.0];
    let area = [0.5, 0.5, 0.5, 0.5, 0.5];
    assert_eq!(l2_relative_error(&profile, &profile, &area).unwrap(), 0.0);
    assert_eq!(max_relative_error(&profile, &profile).unwrap(), 0.0);
}

#[test]
fn zero_reference_profile_is_rejected() {
    let zeros = [0.0, 0.0];
    let approx = [1.0, 1.0];
    let area = [1.0, 1.0];
    assert!(l2_relative_error(&zeros, &approx, &area).is_err());
    assert!(max_relative_error(&zeros, &approx).is_err());
    assert!(weighted_error(&zeros, &approx, &area).is_err());
}

#[test]
fn max_relative_error_of_known_profiles() {
    let reference = [1.0, 2.0, 4.0];
    let approx = [1.0, 3.0, 4.0];
    assert_scalar_eq!(
        max_relative_error(&reference, &approx).unwrap(),
        0.25,
        comp = abs,
        tol = 1e-15
    );
}

#[test]
fn interior_error_ignores_tip_cells() {
    // Tip-concentrated error: exact in the interior, badly wrong at |eta| near a.
    let eta = [0.0, 0.5, 0.95];
    let reference = [2.0, 1.8, 0.6];
    let approx = [2.0, 1.8, 1.2];
    let area = [0.1, 0.1, 0.1];

    let global = l2_relative_error(&reference, &approx, &area).unwrap();
    let interior = interior_l2_error(&reference, &approx, &area, &eta, 0.9).unwrap();
    assert!(global > 0.0);
    assert_eq!(interior, 0.0);
    assert!(interior <= global);
}

#[test]
fn interior_error_with_no_interior_cells_is_an_error() {
    let eta = [0.95, 0.99];
    let values = [1.0, 1.0];
    let area = [1.0, 1.0];
    assert!(interior_l2_error(&values, &values, &area, &eta, 0.9).is_err());
}

#[test]
fn weighted_error_matches_hand_computation() {
    let reference = [2.0, 2.0];
    let approx = [2.5, 2.0];
    let area = [1.0, 1.0];
    // ||diff||_area = 0.5, sum(area) = 2, max(ref) = 2.
    assert_scalar_eq!(
        weighted_error(&reference, &approx, &area).unwrap(),
        0.125,
        comp = abs,
        tol = 1e-15
    );
}

fn record(resolution: f64, l2_error: f64) -> ConvergenceRecord {
    ConvergenceRecord {
        resolution,
        fracture_cells: 10,
        l2_error,
        max_error: l2_error,
        interior_error: l2_error,
        weighted_error: l2_error,
    }
}

#[test]
fn second_order_errors_give_slope_two() {
    let records: Vec<_> = [1.0, 0.5, 0.25].iter().map(|&h| record(h, h * h)).collect();
    let orders = estimate_convergence_orders(&records);
    assert_eq!(orders.len(), 2);
    for order in orders {
        assert_scalar_eq!(order, 2.0, comp = abs, tol = 1e-12);
    }
}

proptest! {
    /// Relative L2 error is invariant to uniform positive rescaling of the weights.
    #[test]
    fn relative_error_invariant_under_weight_rescaling(scale in 0.1..10.0f64) {
        let reference = [2.0, 1.6, 1.1, 0.4];
        let approx = [2.1, 1.5, 1.15, 0.35];
        let area = [0.5, 0.4, 0.4, 0.5];
        let scaled: Vec<f64> = area.iter().map(|a| a * scale).collect();

        let original = l2_relative_error(&reference, &approx, &area).unwrap();
        let rescaled = l2_relative_error(&reference, &approx, &scaled).unwrap();
        prop_assert!((original - rescaled).abs() <= 1e-12 * original);
    }
}
