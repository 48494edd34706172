//! The convergence driver: runs the full pipeline for a sequence of mesh
//! resolutions and aggregates error records.
use crate::analytical::{CrackRegime, SneddonAperture};
use crate::correlation::{self, DofLayout, Orientation};
use crate::export::{self, ProfileReport, SummaryReport};
use crate::geometry::{fracture_set, Domain};
use crate::grid::{GridBucket, Mesher};
use crate::norms::{self, ConvergenceRecord};
use crate::params::{ParameterAssignment, ShearPoisson, TractionBc};
use crate::solver::SolverKind;
use eyre::eyre;
use log::{debug, info, warn};
use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Discretization contract: assemble the sparse system matrix and right-hand side
/// of the mechanical problem for a bucket whose parameter records have been
/// assigned.
///
/// The resulting displacement vector (after the solve) must follow the
/// component-major-by-cell dof convention described by
/// [`DofLayout`](crate::correlation::DofLayout).
pub trait Discretization {
    fn assemble(&self, bucket: &GridBucket) -> eyre::Result<(CsrMatrix<f64>, DVector<f64>)>;
}

/// Complete configuration of a convergence run.
///
/// One value of this struct fully determines a run; the driver holds no other
/// state between invocations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SneddonConfig {
    pub domain: Domain,
    /// Fracture half-length `a`.
    pub half_length: f64,
    /// Inclination angle `beta`, measured from the vertical axis.
    pub inclination: f64,
    /// Magnitude of the applied normal traction.
    pub traction: f64,
    pub moduli: ShearPoisson,
    pub regime: CrackRegime,
    /// Mesh sizes, ordered from coarse to fine.
    pub resolutions: Vec<f64>,
    /// Tolerance for classifying the inclination as axis-aligned.
    pub orientation_tolerance: f64,
    /// Interior cells are those with `|eta| < interior_fraction * a`.
    pub interior_fraction: f64,
    pub solver: SolverKind,
    /// Directory for JSON profile/summary output; `None` disables export.
    pub export_dir: Option<PathBuf>,
}

impl SneddonConfig {
    pub fn orientation(&self) -> Orientation {
        Orientation::from_inclination(self.inclination, self.orientation_tolerance)
    }

    pub fn traction_bc(&self) -> TractionBc {
        TractionBc { p0: self.traction }
    }

    pub fn aperture_model(&self) -> SneddonAperture {
        SneddonAperture::new(self.moduli, self.traction, self.half_length, self.regime)
    }
}

/// The pipeline stage at which a run failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    Mesh,
    AssignParameters,
    Assemble,
    Solve,
    Extract,
    Norms,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Mesh => "meshing",
            Stage::AssignParameters => "parameter assignment",
            Stage::Assemble => "discretization",
            Stage::Solve => "linear solve",
            Stage::Extract => "aperture extraction",
            Stage::Norms => "error computation",
        };
        f.write_str(name)
    }
}

/// A convergence run that terminated early.
///
/// Records from resolutions completed before the failure remain valid and are
/// carried along; no results from the failing resolution are.
#[derive(Debug)]
pub struct ConvergenceFailure {
    pub completed: Vec<ConvergenceRecord>,
    pub resolution: f64,
    pub stage: Stage,
    pub source: eyre::Report,
}

impl fmt::Display for ConvergenceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed at resolution h = {}: {}",
            self.stage, self.resolution, self.source
        )
    }
}

/// Output of a completed convergence run.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvergenceReport {
    /// One record per resolution, ordered as configured (coarse to fine).
    pub records: Vec<ConvergenceRecord>,
    /// Per-resolution aperture profiles, for error-vs-position analysis.
    pub profiles: Vec<ProfileReport>,
}

impl ConvergenceReport {
    pub fn estimated_orders(&self) -> Vec<f64> {
        norms::estimate_convergence_orders(&self.records)
    }

    pub fn summary(&self) -> SummaryReport {
        SummaryReport {
            records: self.records.clone(),
            estimated_orders: self.estimated_orders(),
        }
    }
}

/// Orchestrates, per mesh resolution, grid construction, parameter assignment,
/// assembly, solve, aperture extraction and error computation, and aggregates
/// the records across resolutions.
pub struct ConvergenceDriver<M, A, D> {
    config: SneddonConfig,
    mesher: M,
    assignment: A,
    discretization: D,
}

impl<M, A, D> ConvergenceDriver<M, A, D>
where
    M: Mesher,
    A: ParameterAssignment,
    D: Discretization,
{
    pub fn new(config: SneddonConfig, mesher: M, assignment: A, discretization: D) -> Self {
        Self {
            config,
            mesher,
            assignment,
            discretization,
        }
    }

    pub fn config(&self) -> &SneddonConfig {
        &self.config
    }

    /// Run the full sequence of resolutions.
    ///
    /// Each resolution is processed to completion before the next one starts. A
    /// failure at any stage aborts the run; records from earlier resolutions are
    /// returned inside the failure.
    pub fn run(&self) -> Result<ConvergenceReport, ConvergenceFailure> {
        let mut records = Vec::with_capacity(self.config.resolutions.len());
        let mut profiles = Vec::with_capacity(self.config.resolutions.len());

        for &h in &self.config.resolutions {
            let (record, profile) = self.process_resolution(h).map_err(|(stage, source)| ConvergenceFailure {
                completed: records.clone(),
                resolution: h,
                stage,
                source,
            })?;
            info!(
                "h = {}: {} fracture cells, L2 error {:.3e}",
                h, record.fracture_cells, record.l2_error
            );

            if let Some(dir) = &self.config.export_dir {
                if let Err(err) = export::write_profile(dir, &profile) {
                    warn!("failed to export aperture profile for h = {}: {:#}", h, err);
                }
            }
            records.push(record);
            profiles.push(profile);
        }

        let report = ConvergenceReport { records, profiles };
        if let Some(dir) = &self.config.export_dir {
            if let Err(err) = export::write_summary(dir, &report.summary()) {
                warn!("failed to export convergence summary: {:#}", err);
            }
        }
        Ok(report)
    }

    fn process_resolution(&self, h: f64) -> Result<(ConvergenceRecord, ProfileReport), (Stage, eyre::Report)> {
        let config = &self.config;
        let fractures = fracture_set(&config.domain, config.half_length, config.inclination, true);

        let mut bucket = self
            .mesher
            .mesh(&fractures, &config.domain, h)
            .map_err(|e| (Stage::Mesh, e))?;
        if bucket.pairing().is_empty() {
            return Err((Stage::Mesh, eyre!("mesher produced no fracture cells")));
        }
        debug!(
            "h = {}: {} bulk cells, {} fracture cells",
            h,
            bucket.bulk().num_cells(),
            bucket.pairing().len()
        );

        self.assignment
            .assign(&mut bucket)
            .map_err(|e| (Stage::AssignParameters, e))?;
        if !bucket.has_all_parameters() {
            return Err((
                Stage::AssignParameters,
                eyre!("not every grid in the bucket has a parameter record"),
            ));
        }

        let (matrix, rhs) = self
            .discretization
            .assemble(&bucket)
            .map_err(|e| (Stage::Assemble, e))?;
        let solver = config.solver.instantiate();
        let u = solver.solve(&matrix, &rhs).map_err(|e| (Stage::Solve, e))?;

        let bulk = bucket.bulk();
        let pairing = bucket.pairing();
        let layout = DofLayout::new(bulk.dim(), bulk.num_cells(), pairing.len());
        let mut aperture =
            correlation::extract_aperture(&u, &layout, config.orientation()).map_err(|e| (Stage::Extract, e))?;
        let center = config.domain.center();
        let mut eta = correlation::compute_eta(bulk, pairing, &center);
        let mut area = bucket.fracture_face_areas();
        correlation::exclude_outside_crack(&mut aperture, &mut eta, &mut area, config.half_length);
        if aperture.is_empty() {
            return Err((Stage::Extract, eyre!("all fracture cells lie outside the nominal crack")));
        }

        let aperture_analytical = config.aperture_model().evaluate(&eta);

        let record = (|| -> eyre::Result<ConvergenceRecord> {
            Ok(ConvergenceRecord {
                resolution: h,
                fracture_cells: aperture.len(),
                l2_error: norms::l2_relative_error(&aperture_analytical, &aperture, &area)?,
                max_error: norms::max_relative_error(&aperture_analytical, &aperture)?,
                interior_error: norms::interior_l2_error(
                    &aperture_analytical,
                    &aperture,
                    &area,
                    &eta,
                    config.interior_fraction * config.half_length,
                )?,
                weighted_error: norms::weighted_error(&aperture_analytical, &aperture, &area)?,
            })
        })()
        .map_err(|e| (Stage::Norms, e))?;

        let profile = ProfileReport {
            resolution: h,
            pointwise_error: correlation::pointwise_errors(&aperture_analytical, &aperture),
            eta,
            aperture,
            aperture_analytical,
        };
        Ok((record, profile))
    }
}
