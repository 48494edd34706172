//! Area-weighted error norms and convergence-record aggregation.
use eyre::eyre;
use itertools::izip;
use serde::{Deserialize, Serialize};

/// Area-weighted L2 norm `sqrt(sum(area_i * v_i^2))`.
pub fn area_weighted_norm(values: &[f64], area: &[f64]) -> f64 {
    assert_eq!(values.len(), area.len(), "value and area arrays must have equal length");
    izip!(values, area).map(|(v, a)| a * v * v).sum::<f64>().sqrt()
}

/// Relative L2 error `||approx - ref||_area / ||ref||_area`.
///
/// The reference profile must not be identically zero; for the aperture profiles
/// compared here that holds whenever the applied traction is nonzero.
pub fn l2_relative_error(reference: &[f64], approx: &[f64], area: &[f64]) -> eyre::Result<f64> {
    assert_eq!(reference.len(), approx.len());
    let diff: Vec<f64> = izip!(approx, reference).map(|(a, r)| a - r).collect();
    let denominator = area_weighted_norm(reference, area);
    if denominator == 0.0 {
        return Err(eyre!("reference profile has zero norm; relative error is undefined"));
    }
    Ok(area_weighted_norm(&diff, area) / denominator)
}

/// Max pointwise relative error `max|approx_i - ref_i| / max|ref_i|`.
pub fn max_relative_error(reference: &[f64], approx: &[f64]) -> eyre::Result<f64> {
    assert_eq!(reference.len(), approx.len());
    let max_ref = reference.iter().map(|r| r.abs()).fold(0.0_f64, f64::max);
    if max_ref == 0.0 {
        return Err(eyre!("reference profile is identically zero; relative error is undefined"));
    }
    let max_diff = izip!(approx, reference).map(|(a, r)| (a - r).abs()).fold(0.0_f64, f64::max);
    Ok(max_diff / max_ref)
}

/// Relative L2 error restricted to fracture cells with `|eta| < radius`.
///
/// Excluding the near-tip cells, where the square-root singularity of the
/// reference profile dominates the discretization error, isolates the bulk
/// convergence order.
pub fn interior_l2_error(
    reference: &[f64],
    approx: &[f64],
    area: &[f64],
    eta: &[f64],
    radius: f64,
) -> eyre::Result<f64> {
    assert!(reference.len() == approx.len() && approx.len() == area.len() && area.len() == eta.len());
    let mut interior_ref = Vec::new();
    let mut interior_approx = Vec::new();
    let mut interior_area = Vec::new();
    for (r, a, w, e) in izip!(reference, approx, area, eta) {
        if e.abs() < radius {
            interior_ref.push(*r);
            interior_approx.push(*a);
            interior_area.push(*w);
        }
    }
    if interior_ref.is_empty() {
        return Err(eyre!("no fracture cells with |eta| < {}", radius));
    }
    l2_relative_error(&interior_ref, &interior_approx, &interior_area)
}

/// The interior-weighted error `||approx - ref||_area / (sum(area) * max(ref))`.
pub fn weighted_error(reference: &[f64], approx: &[f64], area: &[f64]) -> eyre::Result<f64> {
    assert_eq!(reference.len(), approx.len());
    let max_ref = reference.iter().map(|r| r.abs()).fold(0.0_f64, f64::max);
    let total_area: f64 = area.iter().sum();
    if max_ref == 0.0 || total_area == 0.0 {
        return Err(eyre!("degenerate reference profile or weight array"));
    }
    let diff: Vec<f64> = izip!(approx, reference).map(|(a, r)| a - r).collect();
    Ok(area_weighted_norm(&diff, area) / (total_area * max_ref))
}

/// Error metrics for one mesh resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceRecord {
    /// Characteristic mesh size.
    pub resolution: f64,
    /// Number of fracture cells at this resolution.
    pub fracture_cells: usize,
    pub l2_error: f64,
    pub max_error: f64,
    pub interior_error: f64,
    pub weighted_error: f64,
}

/// Empirical convergence orders: the slope of `log(l2_error)` against
/// `log(resolution)` between consecutive records. Records must be ordered by
/// decreasing mesh size (increasing resolution).
pub fn estimate_convergence_orders(records: &[ConvergenceRecord]) -> Vec<f64> {
    records
        .windows(2)
        .map(|pair| {
            let (coarse, fine) = (&pair[0], &pair[1]);
            (coarse.l2_error / fine.l2_error).ln() / (coarse.resolution / fine.resolution).ln()
        })
        .collect()
}
