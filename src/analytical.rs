//! Closed-form Sneddon aperture profile for a pressurized crack.
use crate::params::ShearPoisson;
use serde::{Deserialize, Serialize};

/// Distinguishes the 2D plane-strain through-crack from the 3D axisymmetric
/// penny-shaped crack.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrackRegime {
    ThroughCrack,
    PennyShaped,
}

/// The classical elliptical aperture profile of a crack of half-length `a` under
/// remote normal traction `p0`:
///
/// ```text
/// aperture(eta) = C * sqrt(1 - (eta/a)^2),    C = 2 (1 - nu) / mu * p0 * a,
/// ```
///
/// with an additional factor `2/pi` for the penny-shaped regime. This is the
/// ground truth against which numerically extracted apertures are compared; it is
/// evaluated identically regardless of mesh.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SneddonAperture {
    moduli: ShearPoisson,
    p0: f64,
    half_length: f64,
    regime: CrackRegime,
}

impl SneddonAperture {
    pub fn new(moduli: ShearPoisson, p0: f64, half_length: f64, regime: CrackRegime) -> Self {
        Self {
            moduli,
            p0,
            half_length,
            regime,
        }
    }

    pub fn half_length(&self) -> f64 {
        self.half_length
    }

    /// The maximum aperture `C`, attained at the crack center.
    pub fn magnitude(&self) -> f64 {
        let ShearPoisson { mu, nu } = self.moduli;
        let mut c = 2.0 * (1.0 - nu) / mu * self.p0 * self.half_length;
        if self.regime == CrackRegime::PennyShaped {
            c *= 2.0 / std::f64::consts::PI;
        }
        c
    }

    /// Aperture at arc-length position `eta` from the crack center.
    ///
    /// Requires `|eta| <= a`. Positions outside the nominal crack (a meshing
    /// artifact) must be clipped or excluded by the caller before evaluation;
    /// they would place the square root outside its domain.
    pub fn aperture(&self, eta: f64) -> f64 {
        debug_assert!(
            eta.abs() <= self.half_length,
            "arc-length position {} outside crack of half-length {}",
            eta,
            self.half_length
        );
        let relative = eta / self.half_length;
        self.magnitude() * (1.0 - relative * relative).sqrt()
    }

    /// Evaluate the profile at each of the given arc-length positions.
    pub fn evaluate(&self, eta: &[f64]) -> Vec<f64> {
        eta.iter().map(|&e| self.aperture(e)).collect()
    }
}
