//! Operand coercion and frequency-grid reconciliation
//!
//! Binary operations accept scalars, constant matrices, analytic models or
//! other frequency response data on the right-hand side. Each of these is
//! turned into frequency response data on the left operand's grid before
//! the per-frequency arithmetic runs.

use std::borrow::Cow;

use ndarray::{Array2, Array3, ArrayD, Ix2};
use num_complex::Complex64;

use super::core::{sorted_frequencies, FrequencyResponseData};
use super::options::FrdOptions;
use crate::constants::FREQUENCY_MATCH_TOL;
use crate::error::{FrdError, Result};
use crate::lti::{LtiSystem, StateSpace, TransferFunction};

/// Right-hand operand of an algebraic operation
#[derive(Clone)]
pub enum Operand<'a> {
    /// Constant gain broadcast over every channel and frequency
    Scalar(Complex64),
    /// Constant gain matrix `[noutputs, ninputs]`; other ranks are rejected
    Matrix(ArrayD<Complex64>),
    /// Analytic model, sampled on the target grid
    System(&'a dyn LtiSystem),
    /// Existing frequency response data; its grid must match
    Response(&'a FrequencyResponseData),
}

impl std::fmt::Debug for Operand<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Scalar(k) => write!(f, "Scalar({})", k),
            Operand::Matrix(a) => write!(f, "Matrix({:?})", a.shape()),
            Operand::System(sys) => write!(f, "System({}x{})", sys.noutputs(), sys.ninputs()),
            Operand::Response(frd) => write!(f, "Response({})", frd.name()),
        }
    }
}

impl From<f64> for Operand<'_> {
    fn from(k: f64) -> Self {
        Operand::Scalar(Complex64::new(k, 0.0))
    }
}

impl From<Complex64> for Operand<'_> {
    fn from(k: Complex64) -> Self {
        Operand::Scalar(k)
    }
}

impl From<Array2<f64>> for Operand<'_> {
    fn from(a: Array2<f64>) -> Self {
        Operand::Matrix(a.mapv(|x| Complex64::new(x, 0.0)).into_dyn())
    }
}

impl From<&Array2<f64>> for Operand<'_> {
    fn from(a: &Array2<f64>) -> Self {
        Operand::Matrix(a.mapv(|x| Complex64::new(x, 0.0)).into_dyn())
    }
}

impl From<Array2<Complex64>> for Operand<'_> {
    fn from(a: Array2<Complex64>) -> Self {
        Operand::Matrix(a.into_dyn())
    }
}

impl From<ArrayD<Complex64>> for Operand<'_> {
    fn from(a: ArrayD<Complex64>) -> Self {
        Operand::Matrix(a)
    }
}

impl<'a> From<&'a TransferFunction> for Operand<'a> {
    fn from(sys: &'a TransferFunction) -> Self {
        Operand::System(sys)
    }
}

impl<'a> From<&'a StateSpace> for Operand<'a> {
    fn from(sys: &'a StateSpace) -> Self {
        Operand::System(sys)
    }
}

impl<'a> From<&'a FrequencyResponseData> for Operand<'a> {
    fn from(frd: &'a FrequencyResponseData) -> Self {
        Operand::Response(frd)
    }
}

/// Convert an operand to frequency response data on `omega`
///
/// Scalars are broadcast to `noutputs x ninputs`; matrices and models keep
/// their own dimensions. Frequency response data is returned unchanged
/// (borrowed) if its grid matches `omega` within
/// [`FREQUENCY_MATCH_TOL`]; otherwise conversion fails, since resampling
/// onto a different grid is not implemented. Converted scalars, matrices
/// and models are smooth, except models with a pole on the grid.
pub fn convert_to_frd<'a>(
    operand: Operand<'a>,
    omega: &[f64],
    noutputs: usize,
    ninputs: usize,
) -> Result<Cow<'a, FrequencyResponseData>> {
    match operand {
        Operand::Response(frd) => {
            let sorted = sorted_frequencies(omega)?;
            let own = frd.frequency();
            if own.len() != sorted.len() || own.iter().zip(&sorted).any(|(a, b)| a != b) {
                tracing::warn!(
                    system = frd.name(),
                    "frequency points do not match; expect truncation and interpolation"
                );
            }
            if own.len() == sorted.len()
                && own
                    .iter()
                    .zip(&sorted)
                    .all(|(a, b)| (a - b).abs() < FREQUENCY_MATCH_TOL)
            {
                tracing::debug!(system = frd.name(), "reusing matching frequency grid");
                return Ok(Cow::Borrowed(frd));
            }
            Err(FrdError::GridMismatch(
                "frequency ranges of FRD do not match, conversion not implemented".to_string(),
            ))
        }
        Operand::System(sys) => {
            let sampled = FrequencyResponseData::from_system(sys, omega, FrdOptions::new())?;
            Ok(Cow::Owned(sampled.smoothed_if_finite()?))
        }
        Operand::Scalar(k) => {
            let fresp = Array3::from_elem((noutputs, ninputs, omega.len()), k);
            constant_response(fresp, omega)
        }
        Operand::Matrix(a) => {
            let ndim = a.ndim();
            let a = a.into_dimensionality::<Ix2>().map_err(|_| {
                FrdError::Conversion(format!(
                    "can't convert given type \"{}-d array\" to FRD system",
                    ndim
                ))
            })?;
            let (p, m) = a.dim();
            let fresp = Array3::from_shape_fn((p, m, omega.len()), |(i, j, _)| a[[i, j]]);
            constant_response(fresp, omega)
        }
    }
}

fn constant_response<'a>(
    fresp: Array3<Complex64>,
    omega: &[f64],
) -> Result<Cow<'a, FrequencyResponseData>> {
    let sorted = sorted_frequencies(omega)?;
    Ok(Cow::Owned(FrequencyResponseData::with_options(
        fresp,
        &sorted,
        FrdOptions::new().smooth(true),
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, IxDyn};

    fn omega() -> Vec<f64> {
        vec![0.1, 1.0, 10.0]
    }

    #[test]
    fn test_scalar_broadcast() {
        let frd = convert_to_frd(Operand::from(3.0), &omega(), 2, 3).unwrap();
        assert_eq!(frd.noutputs(), 2);
        assert_eq!(frd.ninputs(), 3);
        assert!(frd.is_smooth());
        assert!(frd.response().iter().all(|&z| z == Complex64::new(3.0, 0.0)));
    }

    #[test]
    fn test_matrix_broadcast() {
        let k = array![[1.0, 2.0], [3.0, 4.0]];
        let frd = convert_to_frd(Operand::from(k), &omega(), 1, 1).unwrap();
        assert_eq!(frd.response().dim(), (2, 2, 3));
        assert_eq!(frd.response()[[1, 0, 2]], Complex64::new(3.0, 0.0));
    }

    #[test]
    fn test_bad_rank_rejected() {
        let a = ArrayD::from_elem(IxDyn(&[2, 2, 2]), Complex64::new(1.0, 0.0));
        let err = convert_to_frd(Operand::from(a), &omega(), 1, 1).unwrap_err();
        assert!(matches!(err, FrdError::Conversion(_)));
    }

    #[test]
    fn test_system_sampled() {
        let h = TransferFunction::new(&[1.0], &[1.0, 1.0]).unwrap();
        let frd = convert_to_frd(Operand::from(&h), &[10.0, 1.0], 1, 1).unwrap();
        assert_eq!(frd.frequency().to_vec(), vec![1.0, 10.0]);
        assert!(frd.is_smooth());
    }

    #[test]
    fn test_system_pole_on_grid_not_smoothed() {
        let h = TransferFunction::new(&[1.0], &[1.0, 0.0]).unwrap();
        let frd = convert_to_frd(Operand::from(&h), &[0.0, 1.0, 2.0], 1, 1).unwrap();
        assert!(!frd.is_smooth());
        assert_eq!(frd.response()[[0, 0, 1]], Complex64::new(0.0, -1.0));
    }

    #[test]
    fn test_matching_grid_is_borrowed() {
        let sys = FrequencyResponseData::siso(
            &[Complex64::new(1.0, 0.0); 3],
            &omega(),
        )
        .unwrap();
        let shifted: Vec<f64> = omega().iter().map(|w| w + 1e-10).collect();
        let frd = convert_to_frd(Operand::from(&sys), &shifted, 1, 1).unwrap();
        assert!(matches!(frd, Cow::Borrowed(_)));
    }

    #[test]
    fn test_grid_mismatch() {
        let sys = FrequencyResponseData::siso(&[Complex64::new(1.0, 0.0); 3], &omega()).unwrap();
        let err = convert_to_frd(Operand::from(&sys), &[0.1, 1.0], 1, 1).unwrap_err();
        assert!(matches!(err, FrdError::GridMismatch(_)));
        let err = convert_to_frd(Operand::from(&sys), &[0.1, 1.0, 11.0], 1, 1).unwrap_err();
        assert!(err.to_string().contains("do not match"));
    }
}
