//! Batched per-frequency matrix operations
//!
//! Response tensors are stored as `[noutputs, ninputs, nfreq]`. The helpers
//! here move the frequency axis to the front so that every frequency slice
//! is a standalone matrix, apply the operation slice by slice, and move the
//! axis back. Slices are independent of each other.

use ndarray::{Array2, Array3, ArrayView3, Axis};
use num_complex::Complex64;

use super::linalg::inv_complex;

/// View a `[p, m, nfreq]` tensor as `[nfreq, p, m]`
#[inline]
pub fn freq_first(a: &Array3<Complex64>) -> ArrayView3<'_, Complex64> {
    a.view().permuted_axes([2, 0, 1])
}

/// Move the frequency axis of a `[nfreq, p, m]` tensor back to the end
#[inline]
pub fn freq_last(a: Array3<Complex64>) -> Array3<Complex64> {
    a.permuted_axes([1, 2, 0]).as_standard_layout().into_owned()
}

/// Per-frequency matrix product: `result[:, :, k] = a[:, :, k] @ b[:, :, k]`
///
/// Caller guarantees `a.ninputs == b.noutputs` and matching frequency counts.
pub fn batch_matmul(a: &Array3<Complex64>, b: &Array3<Complex64>) -> Array3<Complex64> {
    debug_assert_eq!(a.shape()[1], b.shape()[0]);
    debug_assert_eq!(a.shape()[2], b.shape()[2]);

    let (p, _, nfreq) = a.dim();
    let m = b.shape()[1];
    let a_f = freq_first(a);
    let b_f = freq_first(b);

    let mut result = Array3::<Complex64>::zeros((nfreq, p, m));
    for (k, mut slice) in result.outer_iter_mut().enumerate() {
        let product = a_f.index_axis(Axis(0), k).dot(&b_f.index_axis(Axis(0), k));
        slice.assign(&product);
    }

    freq_last(result)
}

/// Per-frequency matrix inverse of a square response tensor
///
/// Returns the index of the first singular frequency slice on failure.
pub fn batch_inverse(a: &Array3<Complex64>) -> Result<Array3<Complex64>, usize> {
    let (p, m, nfreq) = a.dim();
    debug_assert_eq!(p, m);

    let a_f = freq_first(a);
    let mut result = Array3::<Complex64>::zeros((nfreq, p, m));
    for (k, mut slice) in result.outer_iter_mut().enumerate() {
        let inv = inv_complex(&a_f.index_axis(Axis(0), k)).ok_or(k)?;
        slice.assign(&inv);
    }

    Ok(freq_last(result))
}

/// Per-frequency closed loop `G · inv(I - sign · K · G)`
///
/// `plant` is `[p, m, nfreq]`, `controller` is `[m, p, nfreq]`. Returns the
/// index of the first frequency where `I - sign · K · G` is singular.
pub fn batch_feedback(
    plant: &Array3<Complex64>,
    controller: &Array3<Complex64>,
    sign: f64,
) -> Result<Array3<Complex64>, usize> {
    let (p, m, nfreq) = plant.dim();
    debug_assert_eq!(controller.dim(), (m, p, nfreq));

    let g_f = freq_first(plant);
    let k_f = freq_first(controller);
    let eye = Array2::<Complex64>::eye(m);
    let sign = Complex64::new(sign, 0.0);

    let mut result = Array3::<Complex64>::zeros((nfreq, p, m));
    for (k, mut slice) in result.outer_iter_mut().enumerate() {
        let g = g_f.index_axis(Axis(0), k);
        let loop_gain = k_f.index_axis(Axis(0), k).dot(&g);
        let i_kg = &eye - &loop_gain.mapv(|x| x * sign);
        let inv = inv_complex(&i_kg.view()).ok_or(k)?;
        slice.assign(&g.dot(&inv));
    }

    Ok(freq_last(result))
}
