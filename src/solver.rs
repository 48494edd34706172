//! Pluggable linear solvers for the assembled mechanical system.
//!
//! The discretization produces a sparse system matrix and right-hand side; which
//! solver consumes them is selected by configuration rather than hard-coded into
//! the pipeline.
use eyre::eyre;
use nalgebra::{DVector, DimName, Dynamic, U1};
use nalgebra_sparse::factorization::CscCholesky;
use nalgebra_sparse::CsrMatrix;
use serde::{Deserialize, Serialize};

pub trait LinearSolver {
    fn solve(&self, matrix: &CsrMatrix<f64>, rhs: &DVector<f64>) -> eyre::Result<DVector<f64>>;
}

/// Direct sparse Cholesky factorization.
///
/// The assembled mechanical system is symmetric positive definite under the
/// traction boundary conditions used here.
#[derive(Copy, Clone, Debug, Default)]
pub struct DirectCholesky;

impl LinearSolver for DirectCholesky {
    fn solve(&self, matrix: &CsrMatrix<f64>, rhs: &DVector<f64>) -> eyre::Result<DVector<f64>> {
        let cholesky =
            CscCholesky::factor(&matrix.into()).map_err(|err| eyre!("failed to factorize system matrix: {}", err))?;
        let u = cholesky.solve(rhs);
        Ok(u.reshape_generic(Dynamic::new(rhs.len()), U1::name()))
    }
}

/// Jacobi-preconditioned conjugate gradient iteration.
#[derive(Copy, Clone, Debug)]
pub struct ConjugateGradient {
    max_iterations: usize,
    tolerance: f64,
    use_jacobi: bool,
}

impl Default for ConjugateGradient {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-10,
            use_jacobi: true,
        }
    }
}

impl ConjugateGradient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_jacobi_preconditioner(mut self, use_jacobi: bool) -> Self {
        self.use_jacobi = use_jacobi;
        self
    }
}

fn jacobi_diagonal(matrix: &CsrMatrix<f64>) -> DVector<f64> {
    let mut diagonal = DVector::from_element(matrix.nrows(), 1.0);
    for (i, j, value) in matrix.triplet_iter() {
        if i == j && *value != 0.0 {
            diagonal[i] = *value;
        }
    }
    diagonal
}

impl LinearSolver for ConjugateGradient {
    fn solve(&self, matrix: &CsrMatrix<f64>, rhs: &DVector<f64>) -> eyre::Result<DVector<f64>> {
        let n = rhs.len();
        if matrix.nrows() != n || matrix.ncols() != n {
            return Err(eyre!(
                "system matrix is {}x{}, right-hand side has {} entries",
                matrix.nrows(),
                matrix.ncols(),
                n
            ));
        }

        let rhs_norm = rhs.norm();
        if rhs_norm == 0.0 {
            return Ok(DVector::zeros(n));
        }

        let diagonal_inv = if self.use_jacobi {
            jacobi_diagonal(matrix).map(|d| 1.0 / d)
        } else {
            DVector::from_element(n, 1.0)
        };

        let mut x = DVector::zeros(n);
        let mut r = rhs.clone();
        let mut z = diagonal_inv.component_mul(&r);
        let mut p = z.clone();
        let mut rz = r.dot(&z);

        for _ in 0..self.max_iterations {
            let ap: DVector<f64> = matrix * &p;
            let p_ap = p.dot(&ap);
            if p_ap <= 0.0 {
                return Err(eyre!("system matrix is not positive definite (p'Ap = {})", p_ap));
            }
            let alpha = rz / p_ap;
            x.axpy(alpha, &p, 1.0);
            r.axpy(-alpha, &ap, 1.0);

            if r.norm() <= self.tolerance * rhs_norm {
                return Ok(x);
            }

            z = diagonal_inv.component_mul(&r);
            let rz_next = r.dot(&z);
            let beta = rz_next / rz;
            rz = rz_next;
            p = &z + &p * beta;
        }

        Err(eyre!(
            "conjugate gradient did not converge within {} iterations (relative residual {:.3e})",
            self.max_iterations,
            r.norm() / rhs_norm
        ))
    }
}

/// Solver backend selection, carried by the run configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverKind {
    Direct,
    Iterative,
}

impl SolverKind {
    pub fn instantiate(&self) -> Box<dyn LinearSolver> {
        match self {
            SolverKind::Direct => Box::new(DirectCholesky),
            SolverKind::Iterative => Box::new(ConjugateGradient::default()),
        }
    }
}
