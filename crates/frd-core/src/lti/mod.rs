//! Analytic LTI models
//!
//! Frequency response data consumes analytic models only through the
//! [`LtiSystem`] trait: dimensions, timebase, and evaluation at complex
//! points. Two concrete models are provided.

mod state_space;
mod transfer_function;

use ndarray::Array3;
use num_complex::Complex64;

use crate::error::Result;
use crate::timebase::Timebase;

pub use state_space::StateSpace;
pub use transfer_function::TransferFunction;

/// An analytic linear time-invariant model
pub trait LtiSystem {
    /// Number of inputs
    fn ninputs(&self) -> usize;

    /// Number of outputs
    fn noutputs(&self) -> usize;

    /// System timebase
    fn timebase(&self) -> Timebase;

    /// Evaluate the model at complex points
    ///
    /// Returns a `[noutputs, ninputs, npoints]` tensor.
    fn evaluate_at(&self, points: &[Complex64]) -> Result<Array3<Complex64>>;

    /// True for continuous (or unspecified) timebases
    fn is_continuous_time(&self) -> bool {
        self.timebase().is_continuous()
    }

    /// True for discrete timebases
    fn is_discrete_time(&self) -> bool {
        self.timebase().is_discrete()
    }

    /// Evaluate on the frequency axis: `s = jω` or `z = exp(jωT)`
    fn frequency_response_at(&self, omega: &[f64]) -> Result<Array3<Complex64>> {
        self.evaluate_at(&self.timebase().frequency_points(omega))
    }
}
