//! Linear algebra operations
//!
//! Unified interface for the dense matrix operations the crate needs.
//! nalgebra is the backend; all ndarray<->nalgebra conversions are
//! contained here so callers only ever see ndarray types.

use nalgebra::DMatrix;
use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;

// ============================================================================
// Conversion helpers (internal)
// ============================================================================

/// Convert an ndarray complex view to nalgebra DMatrix<Complex<f64>>
#[inline]
fn to_na_complex(a: &ArrayView2<Complex64>) -> DMatrix<Complex64> {
    let (m, n) = a.dim();
    DMatrix::from_fn(m, n, |i, j| a[[i, j]])
}

/// Convert nalgebra DMatrix<Complex<f64>> to ndarray Array2<Complex64>
#[inline]
fn from_na_complex(m: &DMatrix<Complex64>) -> Array2<Complex64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Convert ndarray Array2<f64> to nalgebra DMatrix<f64>
#[inline]
fn to_na_real(a: &Array2<f64>) -> DMatrix<f64> {
    let (m, n) = a.dim();
    DMatrix::from_fn(m, n, |i, j| a[[i, j]])
}

/// Convert nalgebra DMatrix<f64> to ndarray Array2<f64>
#[inline]
fn from_na_real(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

// ============================================================================
// Matrix inversion and linear solves
// ============================================================================

/// Invert a complex matrix
///
/// Returns None if matrix is singular or non-square.
pub fn inv_complex(a: &ArrayView2<Complex64>) -> Option<Array2<Complex64>> {
    let (m, n) = a.dim();
    if m != n || m == 0 {
        return None;
    }

    to_na_complex(a)
        .try_inverse()
        .map(|inv| from_na_complex(&inv))
}

/// Invert a real matrix
///
/// Returns None if matrix is singular or non-square.
pub fn inv_real(a: &Array2<f64>) -> Option<Array2<f64>> {
    let (m, n) = a.dim();
    if m != n || m == 0 {
        return None;
    }

    to_na_real(a).try_inverse().map(|inv| from_na_real(&inv))
}

/// Solve `A X = B` for complex matrices using LU decomposition
///
/// Returns None if `A` is singular or the shapes are incompatible.
pub fn solve_complex(
    a: &ArrayView2<Complex64>,
    b: &ArrayView2<Complex64>,
) -> Option<Array2<Complex64>> {
    let (m, n) = a.dim();
    if m != n || b.nrows() != m {
        return None;
    }
    if m == 0 {
        return Some(Array2::zeros((0, b.ncols())));
    }

    let lu = to_na_complex(a).lu();
    lu.solve(&to_na_complex(b)).map(|x| from_na_complex(&x))
}

// ============================================================================
// Eigenvalue decomposition
// ============================================================================

/// Compute complex eigenvalues of a real matrix
///
/// Returns error if matrix is not square.
pub fn eigenvalues(a: &Array2<f64>) -> Result<Vec<Complex64>, &'static str> {
    let (m, n) = a.dim();
    if m != n {
        return Err("Matrix must be square");
    }
    if m == 0 {
        return Ok(Vec::new());
    }

    let eigs = to_na_real(a).complex_eigenvalues();
    Ok(eigs.iter().map(|e| Complex64::new(e.re, e.im)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inv_complex() {
        let mut a = Array2::<Complex64>::zeros((2, 2));
        a[[0, 0]] = Complex64::new(1.0, 0.0);
        a[[0, 1]] = Complex64::new(2.0, 0.0);
        a[[1, 0]] = Complex64::new(3.0, 0.0);
        a[[1, 1]] = Complex64::new(4.0, 0.0);

        let inv = inv_complex(&a.view()).unwrap();

        // A * A^(-1) should be identity
        let product = a.dot(&inv);
        assert_relative_eq!(product[[0, 0]].re, 1.0, epsilon = 1e-10);
        assert_relative_eq!(product[[1, 1]].re, 1.0, epsilon = 1e-10);
        assert_relative_eq!(product[[0, 1]].norm(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(product[[1, 0]].norm(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_inv_real_identity() {
        let eye = Array2::<f64>::eye(3);
        let inv = inv_real(&eye).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(inv[[i, j]], expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_inv_complex_singular() {
        let a = Array2::from_elem((2, 2), Complex64::new(1.0, 1.0));
        assert!(inv_complex(&a.view()).is_none());
    }

    #[test]
    fn test_solve_complex() {
        // (j 0; 0 2) x = (1; 1)  ->  x = (-j; 0.5)
        let mut a = Array2::<Complex64>::zeros((2, 2));
        a[[0, 0]] = Complex64::new(0.0, 1.0);
        a[[1, 1]] = Complex64::new(2.0, 0.0);
        let b = Array2::from_elem((2, 1), Complex64::new(1.0, 0.0));

        let x = solve_complex(&a.view(), &b.view()).unwrap();
        assert_relative_eq!(x[[0, 0]].im, -1.0, epsilon = 1e-12);
        assert_relative_eq!(x[[1, 0]].re, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_eigenvalues() {
        // Eigenvalues of an upper triangular matrix are its diagonal
        let a = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 0.0, 3.0]).unwrap();
        let eigs = eigenvalues(&a).unwrap();
        let mut reals: Vec<f64> = eigs.iter().map(|e| e.re).collect();
        reals.sort_by(|a, b| a.total_cmp(b));
        assert_relative_eq!(reals[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(reals[1], 3.0, epsilon = 1e-10);
    }
}
