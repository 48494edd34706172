//! JSON export of aperture profiles and convergence summaries.
//!
//! Export is off the critical path: a failure here is logged and skipped by the
//! driver and never invalidates convergence records that have already been
//! computed.
use crate::norms::ConvergenceRecord;
use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

/// Per-resolution aperture data for error-vs-position analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    pub resolution: f64,
    /// Arc-length position of each fracture cell.
    pub eta: Vec<f64>,
    /// Numerically extracted aperture per fracture cell.
    pub aperture: Vec<f64>,
    /// Analytical aperture evaluated at the same positions.
    pub aperture_analytical: Vec<f64>,
    /// Pointwise relative error per fracture cell.
    pub pointwise_error: Vec<f64>,
}

/// The full outcome of a convergence run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub records: Vec<ConvergenceRecord>,
    /// Log-log slopes of the L2 error between consecutive resolutions.
    pub estimated_orders: Vec<f64>,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> eyre::Result<()> {
    if let Some(dir) = path.parent() {
        create_dir_all(dir).wrap_err_with(|| format!("failed to create output directory {}", dir.display()))?;
    }
    let file = File::create(path).wrap_err_with(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, value).wrap_err_with(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

pub fn profile_path(dir: &Path, resolution: f64) -> PathBuf {
    dir.join(format!("aperture_profile_h_{}.json", resolution))
}

pub fn summary_path(dir: &Path) -> PathBuf {
    dir.join("convergence_summary.json")
}

pub fn write_profile(dir: &Path, report: &ProfileReport) -> eyre::Result<()> {
    write_json(&profile_path(dir, report.resolution), report)
}

pub fn write_summary(dir: &Path, report: &SummaryReport) -> eyre::Result<()> {
    write_json(&summary_path(dir), report)
}
