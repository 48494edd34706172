//! Material parameters and boundary data for the mechanical problem.
use crate::grid::GridBucket;
use serde::{Deserialize, Serialize};

/// Lamé parameters for a linear-elastic material.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LameParameters {
    pub mu: f64,
    pub lambda: f64,
}

/// Shear modulus and Poisson ratio, the parameterization used by the analytical
/// aperture model.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShearPoisson {
    pub mu: f64,
    pub nu: f64,
}

impl From<ShearPoisson> for LameParameters {
    fn from(moduli: ShearPoisson) -> Self {
        let ShearPoisson { mu, nu } = moduli;
        let lambda = 2.0 * mu * nu / (1.0 - 2.0 * nu);
        Self { mu, lambda }
    }
}

/// Young's modulus and Poisson ratio.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YoungPoisson {
    pub young: f64,
    pub poisson: f64,
}

impl From<YoungPoisson> for LameParameters {
    fn from(params: YoungPoisson) -> Self {
        let YoungPoisson { young, poisson } = params;
        let mu = 0.5 * young / (1.0 + poisson);
        let lambda = 2.0 * mu * poisson / (1.0 - 2.0 * poisson);
        Self { mu, lambda }
    }
}

/// Normal traction of magnitude `p0` applied on two opposing domain boundaries.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TractionBc {
    pub p0: f64,
}

/// Per-grid parameter record stored in the grid bucket.
///
/// Every grid in a bucket must carry one of these before the discretization is
/// invoked.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MechanicsParameters {
    pub moduli: ShearPoisson,
    pub traction: TractionBc,
}

/// Assigns parameter records to every grid in a bucket prior to discretization.
///
/// Boundary-condition assignment proper is the responsibility of the external
/// discretization; this contract only guarantees the bucket invariant that every
/// grid carries a parameter record.
pub trait ParameterAssignment {
    fn assign(&self, bucket: &mut GridBucket) -> eyre::Result<()>;
}

/// Uniform tension setup: identical elastic moduli everywhere and a constant
/// normal traction pulling on two opposing sides.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UniformTension {
    pub moduli: ShearPoisson,
    pub traction: TractionBc,
}

impl ParameterAssignment for UniformTension {
    fn assign(&self, bucket: &mut GridBucket) -> eyre::Result<()> {
        let record = MechanicsParameters {
            moduli: self.moduli,
            traction: self.traction,
        };
        bucket.set_bulk_parameters(record);
        for i in 0..bucket.num_fracture_grids() {
            bucket.set_fracture_parameters(i, record);
        }
        Ok(())
    }
}
