//! The `frd` factory function

use ndarray::{Array1, Array3, ArrayD};
use num_complex::Complex64;

use super::core::FrequencyResponseData;
use super::options::FrdOptions;
use crate::error::{FrdError, Result};
use crate::lti::{LtiSystem, StateSpace, TransferFunction};

/// What to build frequency response data from
pub enum FrdSource<'a> {
    /// Response array, 1-D (SISO) or `[noutputs, ninputs, nfreq]`
    Response(ArrayD<Complex64>),
    /// Analytic model sampled at the given frequencies
    System(&'a dyn LtiSystem),
    /// Existing data (copy constructor); takes no frequency vector
    Data(&'a FrequencyResponseData),
}

impl From<Vec<Complex64>> for FrdSource<'_> {
    fn from(v: Vec<Complex64>) -> Self {
        FrdSource::Response(Array1::from_vec(v).into_dyn())
    }
}

impl From<&[Complex64]> for FrdSource<'_> {
    fn from(v: &[Complex64]) -> Self {
        FrdSource::from(v.to_vec())
    }
}

impl From<&[f64]> for FrdSource<'_> {
    fn from(v: &[f64]) -> Self {
        FrdSource::from(v.iter().map(|&x| Complex64::new(x, 0.0)).collect::<Vec<_>>())
    }
}

impl From<Vec<f64>> for FrdSource<'_> {
    fn from(v: Vec<f64>) -> Self {
        FrdSource::from(v.as_slice())
    }
}

impl<const N: usize> From<[f64; N]> for FrdSource<'_> {
    fn from(v: [f64; N]) -> Self {
        FrdSource::from(&v[..])
    }
}

impl From<Array3<Complex64>> for FrdSource<'_> {
    fn from(a: Array3<Complex64>) -> Self {
        FrdSource::Response(a.into_dyn())
    }
}

impl From<ArrayD<Complex64>> for FrdSource<'_> {
    fn from(a: ArrayD<Complex64>) -> Self {
        FrdSource::Response(a)
    }
}

impl<'a> From<&'a TransferFunction> for FrdSource<'a> {
    fn from(sys: &'a TransferFunction) -> Self {
        FrdSource::System(sys)
    }
}

impl<'a> From<&'a StateSpace> for FrdSource<'a> {
    fn from(sys: &'a StateSpace) -> Self {
        FrdSource::System(sys)
    }
}

impl<'a> From<&'a FrequencyResponseData> for FrdSource<'a> {
    fn from(sys: &'a FrequencyResponseData) -> Self {
        FrdSource::Data(sys)
    }
}

/// Construct frequency response data
///
/// `frd(response, omega, opts)` wraps measured data, `frd(&sys, omega, opts)`
/// samples an analytic model, and `frd(&data, &[], opts)` copies.
///
/// # Example
/// ```
/// use frd_core::{frd, FrdOptions};
///
/// let sys = frd([1.0, 1.0, 0.5], &[1.0, 10.0, 100.0], FrdOptions::new()).unwrap();
/// assert!(sys.is_siso());
/// ```
pub fn frd<'a>(
    source: impl Into<FrdSource<'a>>,
    omega: &[f64],
    opts: FrdOptions,
) -> Result<FrequencyResponseData> {
    match source.into() {
        FrdSource::Response(response) => FrequencyResponseData::from_response(response, omega, opts),
        FrdSource::System(sys) => FrequencyResponseData::from_system(sys, omega, opts),
        FrdSource::Data(data) if omega.is_empty() => FrequencyResponseData::from_data(data, opts),
        FrdSource::Data(_) => Err(FrdError::Construction(
            "the copy constructor takes no frequency vector".to_string(),
        )),
    }
}
