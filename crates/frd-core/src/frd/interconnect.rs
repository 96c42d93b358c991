//! Feedback interconnection

use super::convert::Operand;
use super::core::FrequencyResponseData;
use crate::error::{FrdError, Result};
use crate::math::matrix_ops::batch_feedback;
use crate::timebase::common_timebase;

impl FrequencyResponseData {
    /// Closed loop with `other` in the feedback path
    ///
    /// Computes `self · inv(I - sign · other · self)` at every frequency;
    /// `sign = -1.0` is negative feedback. Scalars are taken as a 1x1 gain.
    ///
    /// # Example
    /// ```
    /// use frd_core::lti::TransferFunction;
    /// use frd_core::{FrdOptions, FrequencyResponseData};
    ///
    /// let h = TransferFunction::new(&[1.0], &[1.0, 2.0, 2.0]).unwrap();
    /// let g = FrequencyResponseData::from_system(&h, &[1.0, 10.0], FrdOptions::new()).unwrap();
    /// let cl = g.feedback(1.0, -1.0).unwrap();
    /// assert_eq!(cl.nfreq(), 2);
    /// ```
    pub fn feedback<'b>(&self, other: impl Into<Operand<'b>>, sign: f64) -> Result<Self> {
        let other = self.coerce(other.into(), 1, 1)?;

        if self.noutputs() != other.ninputs() || self.ninputs() != other.noutputs() {
            return Err(FrdError::SizeMismatch(format!(
                "feedback inputs/outputs mismatch: system has {} output(s) and {} input(s), \
                 feedback path has {} output(s) and {} input(s)",
                self.noutputs(),
                self.ninputs(),
                other.noutputs(),
                other.ninputs()
            )));
        }

        let dt = common_timebase(self.dt, other.dt)?;
        let fresp = batch_feedback(&self.fresp, &other.fresp, sign).map_err(|k| {
            FrdError::Numeric(format!(
                "singular matrix in feedback loop at frequency {} rad/s",
                self.omega[k]
            ))
        })?;
        self.derived(fresp, dt, self.is_smooth())
    }

    /// Negative feedback, `feedback(other, -1.0)`
    pub fn negative_feedback<'b>(&self, other: impl Into<Operand<'b>>) -> Result<Self> {
        self.feedback(other, -1.0)
    }
}
