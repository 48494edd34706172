//! Mixed-dimensional grid data model and the meshing contract.
//!
//! A [`GridBucket`] couples one full-dimensional bulk grid with the
//! lower-dimensional fracture grids and the per-grid parameter records. Buckets
//! are produced by a [`Mesher`], consumed by the convergence driver, and
//! discarded after error extraction for the resolution they belong to.
use crate::geometry::{Domain, FractureTrace};
use crate::params::MechanicsParameters;
use eyre::eyre;
use nalgebra::Point2;
use std::f64::consts::FRAC_PI_2;

/// Geometric face data of the full-dimensional grid.
#[derive(Clone, Debug)]
pub struct BulkGrid {
    dim: usize,
    num_cells: usize,
    face_centers: Vec<Point2<f64>>,
    face_areas: Vec<f64>,
}

impl BulkGrid {
    pub fn new(dim: usize, num_cells: usize, face_centers: Vec<Point2<f64>>, face_areas: Vec<f64>) -> Self {
        assert_eq!(
            face_centers.len(),
            face_areas.len(),
            "face centers and face areas must have equal length"
        );
        Self {
            dim,
            num_cells,
            face_centers,
            face_areas,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    pub fn num_faces(&self) -> usize {
        self.face_areas.len()
    }

    pub fn face_center(&self, face: usize) -> Point2<f64> {
        self.face_centers[face]
    }

    pub fn face_area(&self, face: usize) -> f64 {
        self.face_areas[face]
    }
}

/// For each fracture cell, the two bulk faces coinciding with that fracture
/// location: one on the "+" side, one on the "−" side.
///
/// Both index arrays follow the same fracture-cell ordering, so index `i` refers
/// to the same physical location on either side.
#[derive(Clone, Debug, Default)]
pub struct FacePairing {
    plus: Vec<usize>,
    minus: Vec<usize>,
}

impl FacePairing {
    pub fn new(plus: Vec<usize>, minus: Vec<usize>) -> Self {
        assert_eq!(
            plus.len(),
            minus.len(),
            "'+' and '−' face index arrays must have equal length"
        );
        Self { plus, minus }
    }

    /// Number of fracture cells.
    pub fn len(&self) -> usize {
        self.plus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plus.is_empty()
    }

    pub fn plus(&self) -> &[usize] {
        &self.plus
    }

    pub fn minus(&self) -> &[usize] {
        &self.minus
    }
}

/// A lower-dimensional grid representing the fracture itself.
#[derive(Clone, Debug)]
pub struct FractureGrid {
    cell_centers: Vec<Point2<f64>>,
}

impl FractureGrid {
    pub fn new(cell_centers: Vec<Point2<f64>>) -> Self {
        Self { cell_centers }
    }

    pub fn num_cells(&self) -> usize {
        self.cell_centers.len()
    }

    pub fn cell_centers(&self) -> &[Point2<f64>] {
        &self.cell_centers
    }
}

/// Container for one bulk grid, its fracture grids, the fracture face pairing and
/// the per-grid parameter records.
#[derive(Clone, Debug)]
pub struct GridBucket {
    bulk: BulkGrid,
    pairing: FacePairing,
    fractures: Vec<FractureGrid>,
    bulk_parameters: Option<MechanicsParameters>,
    fracture_parameters: Vec<Option<MechanicsParameters>>,
}

impl GridBucket {
    pub fn new(bulk: BulkGrid, pairing: FacePairing, fractures: Vec<FractureGrid>) -> Self {
        let num_fractures = fractures.len();
        Self {
            bulk,
            pairing,
            fractures,
            bulk_parameters: None,
            fracture_parameters: vec![None; num_fractures],
        }
    }

    pub fn bulk(&self) -> &BulkGrid {
        &self.bulk
    }

    pub fn pairing(&self) -> &FacePairing {
        &self.pairing
    }

    pub fn fractures(&self) -> &[FractureGrid] {
        &self.fractures
    }

    pub fn num_fracture_grids(&self) -> usize {
        self.fractures.len()
    }

    pub fn set_bulk_parameters(&mut self, params: MechanicsParameters) {
        self.bulk_parameters = Some(params);
    }

    pub fn set_fracture_parameters(&mut self, fracture: usize, params: MechanicsParameters) {
        self.fracture_parameters[fracture] = Some(params);
    }

    pub fn bulk_parameters(&self) -> Option<&MechanicsParameters> {
        self.bulk_parameters.as_ref()
    }

    /// Whether every grid in the bucket carries a parameter record.
    ///
    /// Must hold before the discretization is invoked.
    pub fn has_all_parameters(&self) -> bool {
        self.bulk_parameters.is_some() && self.fracture_parameters.iter().all(|p| p.is_some())
    }

    /// Face areas of the "+" side faces, one per fracture cell. Used as the
    /// weight array for area-weighted error norms.
    pub fn fracture_face_areas(&self) -> Vec<f64> {
        self.pairing.plus().iter().map(|&f| self.bulk.face_area(f)).collect()
    }
}

/// Meshing contract.
///
/// Implementations must guarantee that the returned bucket exposes, for the bulk
/// grid, the cell count, face areas and face centers, and a face pairing that
/// identifies the face pairs coinciding with the fracture.
pub trait Mesher {
    fn mesh(&self, fractures: &[FractureTrace], domain: &Domain, h: f64) -> eyre::Result<GridBucket>;
}

/// Structured mesher for a single axis-aligned fracture.
///
/// Builds a uniform `nx x ny` cartesian grid over the domain. The fracture must
/// run along the horizontal axis through the domain center (inclination `pi/2`
/// from vertical, within `orientation_tolerance`); the fracture faces are the
/// horizontal faces on the centerline whose centers fall inside the trace, and
/// each is duplicated so that the "+"/"−" sides are distinct faces.
#[derive(Copy, Clone, Debug)]
pub struct CartesianMesher {
    pub orientation_tolerance: f64,
}

impl Default for CartesianMesher {
    fn default() -> Self {
        Self {
            orientation_tolerance: 1e-8,
        }
    }
}

impl Mesher for CartesianMesher {
    fn mesh(&self, fractures: &[FractureTrace], domain: &Domain, h: f64) -> eyre::Result<GridBucket> {
        if h <= 0.0 {
            return Err(eyre!("mesh size must be positive, got {}", h));
        }

        let nx = ((domain.length / h).round() as usize).max(1);
        // The fracture centerline must coincide with a face row, so the vertical
        // cell count is rounded to the nearest even number.
        let ny = 2 * (((domain.height / (2.0 * h)).round() as usize).max(1));
        let dx = domain.length / nx as f64;
        let dy = domain.height / ny as f64;

        // Vertical faces first, then horizontal faces, matching a column-by-column
        // sweep of the grid lines.
        let mut face_centers = Vec::with_capacity((nx + 1) * ny + nx * (ny + 1));
        let mut face_areas = Vec::with_capacity(face_centers.capacity());
        for i in 0..=nx {
            for j in 0..ny {
                face_centers.push(Point2::new(i as f64 * dx, (j as f64 + 0.5) * dy));
                face_areas.push(dy);
            }
        }
        let horizontal_offset = face_centers.len();
        for j in 0..=ny {
            for i in 0..nx {
                face_centers.push(Point2::new((i as f64 + 0.5) * dx, j as f64 * dy));
                face_areas.push(dx);
            }
        }

        let (pairing, fracture_grids) = match fractures {
            [] => (FacePairing::default(), Vec::new()),
            [fracture] => {
                if (fracture.inclination() - FRAC_PI_2).abs() > self.orientation_tolerance {
                    return Err(eyre!(
                        "cartesian mesher requires an axis-aligned fracture, got inclination {}",
                        fracture.inclination()
                    ));
                }
                let center = fracture.center();
                let a = fracture.half_length();

                // Horizontal faces on the centerline row whose centers lie strictly
                // inside the trace. The open inequality keeps every fracture cell
                // inside the nominal crack, so |eta| < a holds by construction.
                let mut plus = Vec::new();
                let mut cell_centers = Vec::new();
                let row = ny / 2;
                for i in 0..nx {
                    let face = horizontal_offset + row * nx + i;
                    let c = face_centers[face];
                    if (c.x - center.x).abs() < a {
                        plus.push(face);
                        cell_centers.push(c);
                    }
                }
                if plus.is_empty() {
                    return Err(eyre!(
                        "no fracture faces at mesh size {}; fracture shorter than one cell",
                        h
                    ));
                }

                // Duplicate the fracture faces; the duplicates form the "−" side.
                let mut minus = Vec::with_capacity(plus.len());
                for &face in &plus {
                    minus.push(face_centers.len());
                    let center = face_centers[face];
                    let area = face_areas[face];
                    face_centers.push(center);
                    face_areas.push(area);
                }

                (FacePairing::new(plus, minus), vec![FractureGrid::new(cell_centers)])
            }
            _ => {
                return Err(eyre!(
                    "cartesian mesher supports at most one fracture, got {}",
                    fractures.len()
                ))
            }
        };

        let bulk = BulkGrid::new(2, nx * ny, face_centers, face_areas);
        Ok(GridBucket::new(bulk, pairing, fracture_grids))
    }
}
