//! Displacement-correlation extraction of fracture apertures.
//!
//! Given the solved displacement vector and the dof layout of the fracture-face
//! unknowns, the aperture at each fracture cell is the displacement jump between
//! the paired "+" and "−" faces.
use crate::grid::{BulkGrid, FacePairing};
use eyre::eyre;
use itertools::izip;
use nalgebra::{DVector, Point2};
use std::f64::consts::FRAC_PI_2;

/// How the fracture is oriented relative to the principal axes, which decides how
/// the displacement jump is combined into an aperture.
///
/// For an axis-aligned fracture the jump is purely normal and a single component
/// carries the aperture; for an oblique fracture both in-plane components
/// contribute and the Euclidean norm of the jump approximates the crack-opening
/// distance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Orientation {
    AxisAligned,
    Oblique,
}

impl Orientation {
    /// Classify an inclination angle, measured from the vertical axis, against
    /// the given tolerance. `pi/2` (within tolerance) is the axis-aligned case.
    pub fn from_inclination(beta: f64, tolerance: f64) -> Self {
        if (beta - FRAC_PI_2).abs() <= tolerance {
            Orientation::AxisAligned
        } else {
            Orientation::Oblique
        }
    }
}

/// Layout of mechanical degrees of freedom in the displacement vector.
///
/// The convention is component-major by cell: the first `dim * num_cells` entries
/// are the bulk cell-center displacements, followed by one `dim`-sized block per
/// "+" face and then one per "−" face, in fracture-cell order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DofLayout {
    dim: usize,
    bulk_cells: usize,
    num_pairs: usize,
}

impl DofLayout {
    pub fn new(dim: usize, bulk_cells: usize, num_pairs: usize) -> Self {
        Self {
            dim,
            bulk_cells,
            num_pairs,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn num_pairs(&self) -> usize {
        self.num_pairs
    }

    /// Offset of the fracture-face dofs within the displacement vector.
    pub fn fracture_offset(&self) -> usize {
        self.dim * self.bulk_cells
    }

    pub fn total_dofs(&self) -> usize {
        self.fracture_offset() + 2 * self.num_pairs * self.dim
    }

    pub fn plus_dof(&self, pair: usize, component: usize) -> usize {
        debug_assert!(pair < self.num_pairs && component < self.dim);
        self.fracture_offset() + pair * self.dim + component
    }

    pub fn minus_dof(&self, pair: usize, component: usize) -> usize {
        debug_assert!(pair < self.num_pairs && component < self.dim);
        self.fracture_offset() + (self.num_pairs + pair) * self.dim + component
    }
}

/// Compute the aperture at every fracture cell from the displacement jump across
/// the paired faces.
///
/// A non-finite or non-positive aperture at any fracture cell signals a
/// face-pairing or dof-layout defect upstream and is reported as an error; no
/// partial result is returned in that case.
pub fn extract_aperture(
    u: &DVector<f64>,
    layout: &DofLayout,
    orientation: Orientation,
) -> eyre::Result<Vec<f64>> {
    if u.len() != layout.total_dofs() {
        return Err(eyre!(
            "displacement vector has {} entries, dof layout requires {}",
            u.len(),
            layout.total_dofs()
        ));
    }

    let mut apertures = Vec::with_capacity(layout.num_pairs());
    for pair in 0..layout.num_pairs() {
        let aperture = match orientation {
            Orientation::AxisAligned => {
                // Only the component normal to the fracture plane carries the jump.
                let component = layout.dim() - 1;
                (u[layout.plus_dof(pair, component)] - u[layout.minus_dof(pair, component)]).abs()
            }
            Orientation::Oblique => {
                let mut norm_squared = 0.0;
                for component in 0..layout.dim() {
                    let jump = u[layout.plus_dof(pair, component)] - u[layout.minus_dof(pair, component)];
                    norm_squared += jump * jump;
                }
                norm_squared.sqrt()
            }
        };
        if !aperture.is_finite() || aperture <= 0.0 {
            return Err(eyre!(
                "non-positive aperture {} at fracture cell {}; \
                 face pairing or dof layout is inconsistent",
                aperture,
                pair
            ));
        }
        apertures.push(aperture);
    }
    Ok(apertures)
}

/// Arc-length coordinate of every fracture cell: the distance from the fracture
/// center to the cell's "+" face center.
pub fn compute_eta(bulk: &BulkGrid, pairing: &FacePairing, center: &Point2<f64>) -> Vec<f64> {
    pairing
        .plus()
        .iter()
        .map(|&face| (bulk.face_center(face) - center).norm())
        .collect()
}

/// Drop fracture cells whose arc-length position falls outside the nominal crack.
///
/// Such cells are meshing artifacts; the analytical model is undefined there, so
/// they are excluded from all per-cell arrays before the profile comparison. The
/// retained index set is applied consistently to apertures, positions and areas.
pub fn exclude_outside_crack(
    aperture: &mut Vec<f64>,
    eta: &mut Vec<f64>,
    area: &mut Vec<f64>,
    half_length: f64,
) -> usize {
    debug_assert!(aperture.len() == eta.len() && eta.len() == area.len());
    let keep: Vec<bool> = eta.iter().map(|e| e.abs() < half_length).collect();
    let excluded = keep.iter().filter(|&&k| !k).count();
    if excluded > 0 {
        let retain = |values: &mut Vec<f64>| {
            let mut it = keep.iter();
            values.retain(|_| *it.next().unwrap());
        };
        retain(aperture);
        retain(eta);
        retain(area);
        log::warn!(
            "excluded {} fracture cells outside the nominal crack (|eta| >= {})",
            excluded,
            half_length
        );
    }
    excluded
}

/// Pointwise relative error `|approx - ref| / max(ref)` per fracture cell.
pub fn pointwise_errors(reference: &[f64], approx: &[f64]) -> Vec<f64> {
    let max_ref = reference.iter().cloned().fold(0.0_f64, f64::max);
    izip!(reference, approx).map(|(r, a)| (a - r).abs() / max_ref).collect()
}
