//! Evaluation at frequencies
//!
//! Non-smooth data can only be looked up at stored frequencies; smooth data
//! evaluates the per-channel interpolants anywhere.

use ndarray::{Array1, Array3, ArrayD, Axis};
use num_complex::Complex64;

use super::core::{sorted_frequencies, FrequencyResponseData};
use super::options::{FrdOptions, Squeeze};
use crate::error::{FrdError, Result};
use crate::signals::SignalSpec;

/// Frequency argument: a single point or a 1-D list of points
#[derive(Debug, Clone, PartialEq)]
pub enum FrequencyArg {
    Scalar(Complex64),
    Array(Vec<Complex64>),
}

impl FrequencyArg {
    fn points(&self) -> &[Complex64] {
        match self {
            FrequencyArg::Scalar(w) => std::slice::from_ref(w),
            FrequencyArg::Array(ws) => ws,
        }
    }

    fn is_scalar(&self) -> bool {
        matches!(self, FrequencyArg::Scalar(_))
    }
}

impl From<f64> for FrequencyArg {
    fn from(w: f64) -> Self {
        FrequencyArg::Scalar(Complex64::new(w, 0.0))
    }
}

impl From<Complex64> for FrequencyArg {
    fn from(w: Complex64) -> Self {
        FrequencyArg::Scalar(w)
    }
}

impl From<&[f64]> for FrequencyArg {
    fn from(ws: &[f64]) -> Self {
        FrequencyArg::Array(ws.iter().map(|&w| Complex64::new(w, 0.0)).collect())
    }
}

impl<const N: usize> From<[f64; N]> for FrequencyArg {
    fn from(ws: [f64; N]) -> Self {
        FrequencyArg::from(&ws[..])
    }
}

impl From<Vec<f64>> for FrequencyArg {
    fn from(ws: Vec<f64>) -> Self {
        FrequencyArg::from(ws.as_slice())
    }
}

impl From<&Array1<f64>> for FrequencyArg {
    fn from(ws: &Array1<f64>) -> Self {
        FrequencyArg::Array(ws.iter().map(|&w| Complex64::new(w, 0.0)).collect())
    }
}

impl From<&[Complex64]> for FrequencyArg {
    fn from(ws: &[Complex64]) -> Self {
        FrequencyArg::Array(ws.to_vec())
    }
}

impl From<Vec<Complex64>> for FrequencyArg {
    fn from(ws: Vec<Complex64>) -> Self {
        FrequencyArg::Array(ws)
    }
}

/// Positional view of a system: `(omega, response)` or `(magnitude, phase, omega)`
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyTuple {
    Response {
        omega: Array1<f64>,
        response: ArrayD<Complex64>,
    },
    MagPhase {
        magnitude: ArrayD<f64>,
        phase: ArrayD<f64>,
        omega: Array1<f64>,
    },
}

/// One element of a [`LegacyTuple`]
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyItem {
    Frequency(Array1<f64>),
    Response(ArrayD<Complex64>),
    Real(ArrayD<f64>),
}

impl LegacyTuple {
    /// 2 for `(omega, response)`, 3 for `(magnitude, phase, omega)`
    pub fn len(&self) -> usize {
        match self {
            LegacyTuple::Response { .. } => 2,
            LegacyTuple::MagPhase { .. } => 3,
        }
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Positional access
    pub fn item(&self, index: usize) -> Option<LegacyItem> {
        match (self, index) {
            (LegacyTuple::Response { omega, .. }, 0) => Some(LegacyItem::Frequency(omega.clone())),
            (LegacyTuple::Response { response, .. }, 1) => {
                Some(LegacyItem::Response(response.clone()))
            }
            (LegacyTuple::MagPhase { magnitude, .. }, 0) => Some(LegacyItem::Real(magnitude.clone())),
            (LegacyTuple::MagPhase { phase, .. }, 1) => Some(LegacyItem::Real(phase.clone())),
            (LegacyTuple::MagPhase { omega, .. }, 2) => Some(LegacyItem::Frequency(omega.clone())),
            _ => None,
        }
    }
}

/// Apply the squeeze policy to a `[noutputs, ninputs, nfreq]` result
///
/// A scalar frequency argument always drops the frequency axis.
pub(crate) fn process_frequency_response(
    out: Array3<Complex64>,
    scalar: bool,
    squeeze: Squeeze,
    siso: bool,
) -> ArrayD<Complex64> {
    let mut out = out.into_dyn();
    if scalar {
        out = out.index_axis_move(Axis(2), 0);
    }
    match squeeze {
        Squeeze::Auto if siso => out.index_axis_move(Axis(0), 0).index_axis_move(Axis(0), 0),
        Squeeze::Always => {
            while let Some(axis) = out.shape().iter().position(|&n| n == 1) {
                out = out.index_axis_move(Axis(axis), 0);
            }
            out
        }
        _ => out,
    }
}

impl FrequencyResponseData {
    /// Response tensor at real frequencies, in query order
    pub(crate) fn response_at(&self, omega: &[f64]) -> Result<Array3<Complex64>> {
        if let Some(bad) = omega.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(FrdError::Domain(format!(
                "frequencies must be finite and non-negative, got {}",
                bad
            )));
        }

        match &self.interpolants {
            None => {
                let mut indices = Vec::with_capacity(omega.len());
                for &w in omega {
                    match self.omega.iter().position(|&x| x == w) {
                        Some(k) => indices.push(k),
                        None => {
                            return Err(FrdError::Domain(
                                "not all frequencies omega are in frequency list of FRD system. \
                                 Try an interpolating FRD for additional points."
                                    .to_string(),
                            ))
                        }
                    }
                }
                Ok(self.fresp.select(Axis(2), &indices))
            }
            Some(splines) => {
                let m = self.ninputs();
                Ok(Array3::from_shape_fn(
                    (self.noutputs(), m, omega.len()),
                    |(i, j, k)| splines[i * m + j].eval(omega[k]),
                ))
            }
        }
    }

    /// Evaluate at real angular frequencies (rad/s)
    ///
    /// `squeeze = None` uses this system's own setting. Frequencies with a
    /// non-zero imaginary part are rejected.
    ///
    /// # Example
    /// ```
    /// use frd_core::FrequencyResponseData;
    /// use num_complex::Complex64;
    ///
    /// let one = Complex64::new(1.0, 0.0);
    /// let sys = FrequencyResponseData::siso(&[one, one, one * 0.5], &[1.0, 10.0, 100.0]).unwrap();
    /// let h = sys.eval(10.0, None).unwrap();
    /// assert_eq!(h.ndim(), 0);
    /// assert_eq!(h.first(), Some(&one));
    /// assert!(sys.eval(2.0, None).is_err());
    /// ```
    pub fn eval(
        &self,
        omega: impl Into<FrequencyArg>,
        squeeze: Option<Squeeze>,
    ) -> Result<ArrayD<Complex64>> {
        let arg = omega.into();
        if arg.points().iter().any(|w| w.im != 0.0) {
            return Err(FrdError::Domain(
                "FRD.eval can only accept real-valued omega".to_string(),
            ));
        }
        let real: Vec<f64> = arg.points().iter().map(|w| w.re).collect();
        let out = self.response_at(&real)?;
        Ok(process_frequency_response(
            out,
            arg.is_scalar(),
            squeeze.unwrap_or(self.squeeze),
            self.is_siso(),
        ))
    }

    /// Evaluate at purely imaginary points `s = jω`
    pub fn call(
        &self,
        s: impl Into<FrequencyArg>,
        squeeze: Option<Squeeze>,
    ) -> Result<ArrayD<Complex64>> {
        let arg = s.into();
        if arg.points().iter().any(|s| s.re != 0.0) {
            return Err(FrdError::Domain(
                "FRD systems can only accept purely imaginary frequencies".to_string(),
            ));
        }
        let omega = match arg {
            FrequencyArg::Scalar(s) => FrequencyArg::Scalar(Complex64::new(s.im, 0.0)),
            FrequencyArg::Array(ss) => {
                FrequencyArg::Array(ss.iter().map(|s| Complex64::new(s.im, 0.0)).collect())
            }
        };
        self.eval(omega, squeeze)
    }

    /// Copy with different output settings; the samples are unchanged
    pub fn reconfigured(&self, squeeze: Option<Squeeze>, return_magphase: Option<bool>) -> Self {
        let mut copy = self.clone();
        if let Some(squeeze) = squeeze {
            copy.squeeze = squeeze;
        }
        if let Some(return_magphase) = return_magphase {
            copy.return_magphase = return_magphase;
        }
        copy
    }

    /// `(omega, response)`, or `(magnitude, phase, omega)` if `return_magphase` is set
    pub fn as_legacy_tuple(&self) -> LegacyTuple {
        let response =
            process_frequency_response(self.fresp.clone(), false, self.squeeze, self.is_siso());
        if self.return_magphase {
            LegacyTuple::MagPhase {
                magnitude: response.mapv(|z| z.norm()),
                phase: response.mapv(|z| z.arg()),
                omega: self.omega.clone(),
            }
        } else {
            LegacyTuple::Response {
                omega: self.omega.clone(),
                response,
            }
        }
    }

    /// Frequency response at `omega`, as new data that unpacks to magnitude and phase
    pub fn frequency_response(&self, omega: &[f64]) -> Result<Self> {
        let sorted = sorted_frequencies(omega)?;
        let fresp = self.response_at(&sorted)?;
        let opts = FrdOptions::new()
            .name(&self.name)
            .inputs(SignalSpec::Names(self.input_labels.clone()))
            .outputs(SignalSpec::Names(self.output_labels.clone()))
            .dt(self.dt)
            .squeeze(self.squeeze)
            .return_magphase(true);
        Self::with_options(fresp, &sorted, opts)
    }

    /// Old name of [`FrequencyResponseData::frequency_response`]
    #[deprecated(note = "use `frequency_response` instead")]
    pub fn freqresp(&self, omega: &[f64]) -> Result<Self> {
        tracing::warn!(
            "FrequencyResponseData::freqresp will be removed in a future release; \
             use FrequencyResponseData::frequency_response instead"
        );
        self.frequency_response(omega)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lti::TransferFunction;
    use approx::assert_relative_eq;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    fn scalar(a: ArrayD<Complex64>) -> Complex64 {
        assert_eq!(a.ndim(), 0);
        *a.first().unwrap()
    }

    fn mimo() -> FrequencyResponseData {
        let fresp = Array3::from_shape_fn((2, 3, 4), |(i, j, k)| c((i * 100 + j * 10 + k) as f64));
        FrequencyResponseData::new(fresp, &[1.0, 2.0, 3.0, 4.0]).unwrap()
    }

    #[test]
    fn test_exact_lookup() {
        let sys = FrequencyResponseData::siso(&[c(1.0), c(1.0), c(0.5)], &[1.0, 10.0, 100.0]).unwrap();
        assert_eq!(scalar(sys.eval(100.0, None).unwrap()), c(0.5));
        let v = sys.eval([100.0, 1.0], None).unwrap();
        assert_eq!(v.shape(), &[2]);
        assert_eq!(v[[0]], c(0.5));
        assert_eq!(v[[1]], c(1.0));

        let err = sys.eval(2.0, None).unwrap_err();
        assert!(err.to_string().contains("not all frequencies"));
    }

    #[test]
    fn test_rejects_complex_and_negative() {
        let sys = FrequencyResponseData::siso(&[c(1.0)], &[1.0]).unwrap();
        let err = sys.eval(Complex64::new(1.0, 1.0), None).unwrap_err();
        assert!(err.to_string().contains("real-valued omega"));
        assert!(matches!(sys.eval(-1.0, None), Err(FrdError::Domain(_))));
    }

    #[test]
    fn test_squeeze_shapes() {
        let sys = mimo();
        assert_eq!(sys.eval(2.0, None).unwrap().shape(), &[2, 3]);
        assert_eq!(sys.eval([2.0], None).unwrap().shape(), &[2, 3, 1]);
        assert_eq!(sys.eval([2.0], Some(Squeeze::Always)).unwrap().shape(), &[2, 3]);
        assert_eq!(sys.eval(2.0, Some(Squeeze::Never)).unwrap().shape(), &[2, 3]);

        let siso = FrequencyResponseData::siso(&[c(1.0), c(2.0)], &[1.0, 2.0]).unwrap();
        assert_eq!(siso.eval([1.0, 2.0], None).unwrap().shape(), &[2]);
        assert_eq!(siso.eval([1.0, 2.0], Some(Squeeze::Never)).unwrap().shape(), &[1, 1, 2]);
        assert_eq!(siso.eval(1.0, Some(Squeeze::Never)).unwrap().shape(), &[1, 1]);
        assert_eq!(siso.eval(1.0, Some(Squeeze::Always)).unwrap().shape(), &[] as &[usize]);

        let never = siso.reconfigured(Some(Squeeze::Never), None);
        assert_eq!(never.eval([1.0], None).unwrap().shape(), &[1, 1, 1]);
    }

    #[test]
    fn test_mimo_values() {
        let sys = mimo();
        let v = sys.eval(3.0, None).unwrap();
        assert_eq!(v[[1, 2]], c(122.0));
    }

    #[test]
    fn test_call() {
        let sys = FrequencyResponseData::siso(&[c(1.0), c(2.0)], &[1.0, 2.0]).unwrap();
        assert_eq!(scalar(sys.call(Complex64::new(0.0, 2.0), None).unwrap()), c(2.0));
        let err = sys.call(Complex64::new(1.0, 2.0), None).unwrap_err();
        assert!(err.to_string().contains("purely imaginary"));
    }

    #[test]
    fn test_smooth_interpolation() {
        let h = TransferFunction::new(&[1.0], &[1.0, 2.0, 2.0]).unwrap();
        let omega: Vec<f64> = (0..200).map(|k| 0.1 + 0.05 * k as f64).collect();
        let sys = FrequencyResponseData::from_system(&h, &omega, FrdOptions::new().smooth(true)).unwrap();
        let w = 1.2345;
        let v = scalar(sys.eval(w, None).unwrap());
        let expected = h.evaluate(Complex64::new(0.0, w));
        assert_relative_eq!((v - expected).norm(), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_legacy_tuple() {
        let sys = FrequencyResponseData::siso(&[c(-2.0), c(1.0)], &[1.0, 2.0]).unwrap();
        let t = sys.as_legacy_tuple();
        assert_eq!(t.len(), 2);
        assert!(matches!(t.item(0), Some(LegacyItem::Frequency(_))));
        assert!(t.item(2).is_none());

        let mp = sys.reconfigured(None, Some(true)).as_legacy_tuple();
        assert_eq!(mp.len(), 3);
        match mp.item(0) {
            Some(LegacyItem::Real(mag)) => assert_relative_eq!(mag[[0]], 2.0),
            other => panic!("unexpected item {:?}", other),
        }
        match mp.item(1) {
            Some(LegacyItem::Real(phase)) => {
                assert_relative_eq!(phase[[0]], std::f64::consts::PI)
            }
            other => panic!("unexpected item {:?}", other),
        }
    }

    #[test]
    fn test_frequency_response() {
        let sys = FrequencyResponseData::siso(&[c(1.0), c(2.0), c(3.0)], &[1.0, 2.0, 3.0]).unwrap();
        let fr = sys.frequency_response(&[3.0, 1.0]).unwrap();
        assert!(fr.return_magphase());
        assert_eq!(fr.frequency().to_vec(), vec![1.0, 3.0]);
        assert_eq!(fr.response()[[0, 0, 1]], c(3.0));
        assert_eq!(fr.name(), sys.name());

        #[allow(deprecated)]
        let old = sys.freqresp(&[2.0]).unwrap();
        assert_eq!(old.response()[[0, 0, 0]], c(2.0));
    }
}
