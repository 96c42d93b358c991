//! Core FrequencyResponseData struct and constructors

use ndarray::{Array1, Array3, ArrayD, Axis, Ix1, Ix3};
use num_complex::Complex64;

use super::options::{FrdOptions, Squeeze};
use crate::error::{FrdError, Result};
use crate::lti::LtiSystem;
use crate::math::ComplexSpline;
use crate::signals::{default_labels, generate_system_name, resolve_labels};
use crate::timebase::{common_timebase, Timebase};

/// Sampled frequency response of a linear time-invariant system
///
/// `fresp[[i, j, k]]` is the response from input `j` to output `i` at
/// frequency `omega[k]` (rad/s). Frequencies are stored in strictly
/// increasing order. The data is never modified after construction; every
/// operation returns a new value.
#[derive(Debug, Clone)]
pub struct FrequencyResponseData {
    pub(crate) omega: Array1<f64>,
    pub(crate) fresp: Array3<Complex64>,
    pub(crate) dt: Timebase,
    pub(crate) name: String,
    pub(crate) input_labels: Vec<String>,
    pub(crate) output_labels: Vec<String>,
    /// One interpolant per channel, indexed `i * ninputs + j`
    pub(crate) interpolants: Option<Vec<ComplexSpline>>,
    pub(crate) squeeze: Squeeze,
    pub(crate) return_magphase: bool,
    pub(crate) title: Option<String>,
    pub(crate) plot_type: String,
    pub(crate) plot_phase: Option<bool>,
}

/// Short alias
pub type FRD = FrequencyResponseData;

impl FrequencyResponseData {
    /// Create from a `[noutputs, ninputs, nfreq]` response tensor
    ///
    /// # Example
    /// ```
    /// use frd_core::FrequencyResponseData;
    /// use ndarray::Array3;
    /// use num_complex::Complex64;
    ///
    /// let fresp = Array3::from_elem((2, 1, 3), Complex64::new(1.0, 0.0));
    /// let sys = FrequencyResponseData::new(fresp, &[1.0, 10.0, 100.0]).unwrap();
    /// assert_eq!(sys.noutputs(), 2);
    /// assert_eq!(sys.ninputs(), 1);
    /// ```
    pub fn new(fresp: Array3<Complex64>, omega: &[f64]) -> Result<Self> {
        Self::with_options(fresp, omega, FrdOptions::default())
    }

    /// Create a SISO model from a response vector
    pub fn siso(response: &[Complex64], omega: &[f64]) -> Result<Self> {
        let fresp = Array3::from_shape_fn((1, 1, response.len()), |(_, _, k)| response[k]);
        Self::new(fresp, omega)
    }

    /// Create from a response tensor with explicit options
    pub fn with_options(fresp: Array3<Complex64>, omega: &[f64], opts: FrdOptions) -> Result<Self> {
        Self::build(fresp, omega, opts, Timebase::Unspecified)
    }

    /// Create from a 1-D (SISO) or 3-D response array
    pub fn from_response(response: ArrayD<Complex64>, omega: &[f64], opts: FrdOptions) -> Result<Self> {
        let fresp = match response.ndim() {
            1 => {
                let v = response
                    .into_dimensionality::<Ix1>()
                    .map_err(|e| FrdError::Construction(e.to_string()))?;
                let n = v.len();
                v.into_shape_with_order((1, 1, n))
                    .map_err(|e| FrdError::Construction(e.to_string()))?
            }
            3 => response
                .into_dimensionality::<Ix3>()
                .map_err(|e| FrdError::Construction(e.to_string()))?,
            n => {
                return Err(FrdError::Construction(format!(
                    "the frequency data constructor needs a 1-d or 3-d response \
                     data array and a matching frequency vector size, got {}-d data",
                    n
                )))
            }
        };
        Self::with_options(fresp, omega, opts)
    }

    /// Sample an analytic model at the given frequencies
    ///
    /// Continuous-time models are evaluated at `s = jω`, discrete-time
    /// models at `z = exp(jωT)`. The model's timebase is inherited.
    pub fn from_system(sys: &dyn LtiSystem, omega: &[f64], opts: FrdOptions) -> Result<Self> {
        let sorted = sorted_frequencies(omega)?;
        let fresp = sys.frequency_response_at(&sorted)?;
        if fresp.dim() != (sys.noutputs(), sys.ninputs(), sorted.len()) {
            return Err(FrdError::Construction(format!(
                "model evaluation returned shape {:?}, expected ({}, {}, {})",
                fresp.shape(),
                sys.noutputs(),
                sys.ninputs(),
                sorted.len()
            )));
        }
        Self::build(fresp, &sorted, opts, sys.timebase())
    }

    /// Copy constructor
    ///
    /// Copies frequencies, response and timebase. Signal labels and the
    /// name come from `opts` (or defaults), as for any new system.
    pub fn from_data(other: &FrequencyResponseData, opts: FrdOptions) -> Result<Self> {
        Self::build(other.fresp.clone(), &other.omega.to_vec(), opts, other.dt)
    }

    fn build(
        fresp: Array3<Complex64>,
        omega: &[f64],
        opts: FrdOptions,
        source_dt: Timebase,
    ) -> Result<Self> {
        let (p, m, nfreq) = fresp.dim();
        if nfreq != omega.len() {
            return Err(FrdError::Construction(format!(
                "response data has {} frequency points but the frequency vector has {}",
                nfreq,
                omega.len()
            )));
        }

        let order = frequency_order(omega)?;
        let omega: Array1<f64> = order.iter().map(|&k| omega[k]).collect();
        let fresp = if order.iter().enumerate().all(|(i, &k)| i == k) {
            fresp
        } else {
            fresp.select(Axis(2), &order)
        };

        let dt = match opts.dt {
            Some(explicit) => common_timebase(explicit, source_dt)?,
            None => source_dt,
        };
        let output_labels = resolve_labels(opts.outputs.as_ref(), "y", p, "outputs")?;
        let input_labels = resolve_labels(opts.inputs.as_ref(), "u", m, "inputs")?;
        let name = opts.name.unwrap_or_else(generate_system_name);

        let interpolants = if opts.smooth {
            Some(fit_interpolants(&fresp, &omega)?)
        } else {
            None
        };

        tracing::debug!(
            name = %name,
            noutputs = p,
            ninputs = m,
            nfreq,
            smooth = opts.smooth,
            "built frequency response data"
        );

        Ok(Self {
            omega,
            fresp,
            dt,
            name,
            input_labels,
            output_labels,
            interpolants,
            squeeze: opts.squeeze.unwrap_or_default(),
            return_magphase: opts.return_magphase.unwrap_or(false),
            title: opts.title,
            plot_type: opts.plot_type.unwrap_or_else(|| "bode".to_string()),
            plot_phase: opts.plot_phase,
        })
    }

    /// Attach interpolants when every sample is finite
    pub(crate) fn smoothed_if_finite(mut self) -> Result<Self> {
        if self.fresp.iter().all(|z| z.is_finite()) {
            self.interpolants = Some(fit_interpolants(&self.fresp, &self.omega)?);
        }
        Ok(self)
    }

    /// Result of an operation on this frequency grid
    ///
    /// The grid is already validated, so only the interpolants can fail.
    pub(crate) fn derived(&self, fresp: Array3<Complex64>, dt: Timebase, smooth: bool) -> Result<Self> {
        let interpolants = if smooth {
            Some(fit_interpolants(&fresp, &self.omega)?)
        } else {
            None
        };
        let (p, m, _) = fresp.dim();
        Ok(Self {
            omega: self.omega.clone(),
            fresp,
            dt,
            name: generate_system_name(),
            input_labels: default_labels("u", m),
            output_labels: default_labels("y", p),
            interpolants,
            squeeze: Squeeze::Auto,
            return_magphase: false,
            title: None,
            plot_type: "bode".to_string(),
            plot_phase: None,
        })
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Number of frequency points
    #[inline]
    pub fn nfreq(&self) -> usize {
        self.omega.len()
    }

    #[inline]
    pub fn ninputs(&self) -> usize {
        self.fresp.shape()[1]
    }

    #[inline]
    pub fn noutputs(&self) -> usize {
        self.fresp.shape()[0]
    }

    #[inline]
    pub fn is_siso(&self) -> bool {
        self.ninputs() == 1 && self.noutputs() == 1
    }

    /// Frequencies in rad/s (ascending)
    #[inline]
    pub fn frequency(&self) -> &Array1<f64> {
        &self.omega
    }

    /// Complex response tensor `[noutputs, ninputs, nfreq]`
    #[inline]
    pub fn response(&self) -> &Array3<Complex64> {
        &self.fresp
    }

    /// Elementwise magnitude of the response
    pub fn magnitude(&self) -> Array3<f64> {
        self.fresp.mapv(|z| z.norm())
    }

    /// Elementwise phase of the response (radians, wrapped to (-π, π])
    pub fn phase(&self) -> Array3<f64> {
        self.fresp.mapv(|z| z.arg())
    }

    #[inline]
    pub fn timebase(&self) -> Timebase {
        self.dt
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn input_labels(&self) -> &[String] {
        &self.input_labels
    }

    #[inline]
    pub fn output_labels(&self) -> &[String] {
        &self.output_labels
    }

    /// True if the model can be evaluated between its samples
    #[inline]
    pub fn is_smooth(&self) -> bool {
        self.interpolants.is_some()
    }

    #[inline]
    pub fn squeeze(&self) -> Squeeze {
        self.squeeze
    }

    #[inline]
    pub fn return_magphase(&self) -> bool {
        self.return_magphase
    }

    #[inline]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[inline]
    pub fn plot_type(&self) -> &str {
        &self.plot_type
    }

    #[inline]
    pub fn plot_phase(&self) -> Option<bool> {
        self.plot_phase
    }

    /// True for continuous (or unspecified) timebases
    #[inline]
    pub fn is_continuous_time(&self) -> bool {
        self.dt.is_continuous()
    }

    #[inline]
    pub fn is_discrete_time(&self) -> bool {
        self.dt.is_discrete()
    }
}

/// Check a frequency vector and return it sorted
pub(crate) fn sorted_frequencies(omega: &[f64]) -> Result<Vec<f64>> {
    Ok(frequency_order(omega)?.into_iter().map(|k| omega[k]).collect())
}

/// Permutation that sorts `omega`, rejecting invalid or repeated entries
fn frequency_order(omega: &[f64]) -> Result<Vec<usize>> {
    if omega.is_empty() {
        return Err(FrdError::Construction(
            "frequency vector must not be empty".to_string(),
        ));
    }
    if let Some(bad) = omega.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(FrdError::Construction(format!(
            "frequencies must be real, finite and non-negative, got {}",
            bad
        )));
    }

    let mut order: Vec<usize> = (0..omega.len()).collect();
    order.sort_by(|&a, &b| omega[a].total_cmp(&omega[b]));
    if let Some(pair) = order.windows(2).find(|p| omega[p[0]] == omega[p[1]]) {
        return Err(FrdError::Construction(format!(
            "duplicate frequency {} in frequency vector",
            omega[pair[0]]
        )));
    }
    Ok(order)
}

fn fit_interpolants(fresp: &Array3<Complex64>, omega: &Array1<f64>) -> Result<Vec<ComplexSpline>> {
    let (p, m, _) = fresp.dim();
    let omega = omega.to_vec();
    let mut splines = Vec::with_capacity(p * m);
    for i in 0..p {
        for j in 0..m {
            let channel: Vec<Complex64> = fresp.slice(ndarray::s![i, j, ..]).to_vec();
            if let Some(k) = channel.iter().position(|z| !z.is_finite()) {
                return Err(FrdError::Numeric(format!(
                    "response from input {} to output {} is not finite at {} rad/s; cannot interpolate",
                    j, i, omega[k]
                )));
            }
            splines.push(ComplexSpline::fit(&omega, &channel)?);
        }
    }
    Ok(splines)
}
