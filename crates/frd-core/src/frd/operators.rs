//! Algebraic operators
//!
//! Parallel (`+`, `-`), series (`*`), SISO division and integer powers.
//! Right-hand operands are coerced onto this system's frequency grid first;
//! results are new systems on the same grid.

use std::ops::{Add, Div, Mul, Neg, Sub};

use ndarray::Array3;
use num_complex::Complex64;

use super::convert::{convert_to_frd, Operand};
use super::core::FrequencyResponseData;
use crate::error::{FrdError, Result};
use crate::lti::{StateSpace, TransferFunction};
use crate::math::matrix_ops::{batch_inverse, batch_matmul};
use crate::timebase::common_timebase;

impl FrequencyResponseData {
    /// Coerce `other` onto this grid, broadcasting scalars to this system's shape
    pub(super) fn coerce<'b>(
        &self,
        other: Operand<'b>,
        noutputs: usize,
        ninputs: usize,
    ) -> Result<std::borrow::Cow<'b, FrequencyResponseData>> {
        convert_to_frd(other, &self.omega.to_vec(), noutputs, ninputs)
    }

    fn parallel(&self, other: Operand<'_>, sign: f64) -> Result<Self> {
        let other = self.coerce(other, self.noutputs(), self.ninputs())?;

        if self.ninputs() != other.ninputs() {
            return Err(FrdError::SizeMismatch(format!(
                "the first summand has {} input(s), but the second has {}",
                self.ninputs(),
                other.ninputs()
            )));
        }
        if self.noutputs() != other.noutputs() {
            return Err(FrdError::SizeMismatch(format!(
                "the first summand has {} output(s), but the second has {}",
                self.noutputs(),
                other.noutputs()
            )));
        }

        let dt = common_timebase(self.dt, other.dt)?;
        let fresp = &self.fresp + &other.fresp.mapv(|z| z * sign);
        self.derived(fresp, dt, false)
    }

    /// Parallel connection `self + other`
    pub fn try_add<'b>(&self, other: impl Into<Operand<'b>>) -> Result<Self> {
        self.parallel(other.into(), 1.0)
    }

    /// `self - other`
    pub fn try_sub<'b>(&self, other: impl Into<Operand<'b>>) -> Result<Self> {
        self.parallel(other.into(), -1.0)
    }

    /// `other + self`
    pub fn try_radd<'b>(&self, other: impl Into<Operand<'b>>) -> Result<Self> {
        self.try_add(other)
    }

    /// `other - self`
    pub fn try_rsub<'b>(&self, other: impl Into<Operand<'b>>) -> Result<Self> {
        (-self).try_add(other)
    }

    fn scaled(&self, fresp: Array3<Complex64>) -> Result<Self> {
        self.derived(fresp, self.dt, self.is_smooth())
    }

    /// Series connection `self * other`: `other`'s output drives `self`
    pub fn try_mul<'b>(&self, other: impl Into<Operand<'b>>) -> Result<Self> {
        let other = match other.into() {
            Operand::Scalar(k) => return self.scaled(self.fresp.mapv(|z| z * k)),
            operand => self.coerce(operand, 1, 1)?,
        };

        if self.ninputs() != other.noutputs() {
            return Err(FrdError::SizeMismatch(format!(
                "H = G1*G2: input-output size mismatch: G1 has {} input(s), G2 has {} output(s)",
                self.ninputs(),
                other.noutputs()
            )));
        }

        let dt = common_timebase(self.dt, other.dt)?;
        let fresp = batch_matmul(&self.fresp, &other.fresp);
        self.derived(fresp, dt, self.is_smooth() && other.is_smooth())
    }

    /// Series connection `other * self`: `self`'s output drives `other`
    pub fn try_rmul<'b>(&self, other: impl Into<Operand<'b>>) -> Result<Self> {
        let other = match other.into() {
            Operand::Scalar(k) => return self.scaled(self.fresp.mapv(|z| z * k)),
            operand => self.coerce(operand, 1, 1)?,
        };

        if self.noutputs() != other.ninputs() {
            return Err(FrdError::SizeMismatch(format!(
                "H = G1*G2: input-output size mismatch: G1 has {} input(s), G2 has {} output(s)",
                other.ninputs(),
                self.noutputs()
            )));
        }

        let dt = common_timebase(self.dt, other.dt)?;
        let fresp = batch_matmul(&other.fresp, &self.fresp);
        self.derived(fresp, dt, self.is_smooth() && other.is_smooth())
    }

    fn require_siso(&self, other: Option<&FrequencyResponseData>, op: &str) -> Result<()> {
        if !self.is_siso() || other.is_some_and(|o| !o.is_siso()) {
            return Err(FrdError::Domain(format!(
                "{} is currently only implemented for SISO systems",
                op
            )));
        }
        Ok(())
    }

    /// `self / other`; only SISO systems can be divided by systems
    pub fn try_div<'b>(&self, other: impl Into<Operand<'b>>) -> Result<Self> {
        let other = match other.into() {
            Operand::Scalar(k) => {
                let inv_k = Complex64::new(1.0, 0.0) / k;
                return self.scaled(self.fresp.mapv(|z| z * inv_k));
            }
            operand => self.coerce(operand, 1, 1)?,
        };
        self.require_siso(Some(&other), "division")?;

        let dt = common_timebase(self.dt, other.dt)?;
        let fresp = &self.fresp / &other.fresp;
        self.derived(fresp, dt, self.is_smooth() && other.is_smooth())
    }

    /// `other / self` (SISO only)
    pub fn try_rdiv<'b>(&self, other: impl Into<Operand<'b>>) -> Result<Self> {
        let other = match other.into() {
            Operand::Scalar(k) => {
                self.require_siso(None, "right division")?;
                return self.scaled(self.fresp.mapv(|z| k / z));
            }
            operand => self.coerce(operand, 1, 1)?,
        };
        self.require_siso(Some(&other), "right division")?;
        other.try_div(self)
    }

    /// Per-frequency matrix inverse of a square system
    pub fn inv(&self) -> Result<Self> {
        if self.noutputs() != self.ninputs() {
            return Err(FrdError::SizeMismatch(format!(
                "inverse requires a square system, got {} output(s) and {} input(s)",
                self.noutputs(),
                self.ninputs()
            )));
        }
        let fresp = batch_inverse(&self.fresp).map_err(|k| {
            FrdError::Numeric(format!(
                "singular matrix at frequency {} rad/s",
                self.omega[k]
            ))
        })?;
        self.derived(fresp, self.dt, self.is_smooth())
    }

    /// Integer power
    ///
    /// `n = 0` gives the all-ones response, negative powers repeat the
    /// inverse. Negative powers are never smooth.
    ///
    /// # Example
    /// ```
    /// use frd_core::FrequencyResponseData;
    /// use num_complex::Complex64;
    ///
    /// let g = FrequencyResponseData::siso(&[Complex64::new(2.0, 0.0)], &[1.0]).unwrap();
    /// assert_eq!(g.powi(2).unwrap().response()[[0, 0, 0]], Complex64::new(4.0, 0.0));
    /// ```
    pub fn powi(&self, n: i32) -> Result<Self> {
        if n == 0 {
            let ones = Array3::from_elem(self.fresp.dim(), Complex64::new(1.0, 0.0));
            return self.derived(ones, self.dt, self.is_smooth());
        }

        let base = if n < 0 {
            let mut reciprocal = self.inv()?;
            reciprocal.interpolants = None;
            reciprocal
        } else {
            self.clone()
        };
        let mut result = base.clone();
        for _ in 1..n.unsigned_abs() {
            result = base.try_mul(&result)?;
        }
        Ok(result)
    }

    /// Power with a real exponent, which must be an integer
    pub fn pow(&self, exponent: f64) -> Result<Self> {
        if !exponent.is_finite() || exponent.fract() != 0.0 || exponent.abs() > i32::MAX as f64 {
            return Err(FrdError::Domain(format!(
                "exponent must be an integer, got {}",
                exponent
            )));
        }
        self.powi(exponent as i32)
    }
}

impl Neg for &FrequencyResponseData {
    type Output = FrequencyResponseData;

    fn neg(self) -> FrequencyResponseData {
        let mut result = self.clone();
        result.fresp.mapv_inplace(|z| -z);
        result.interpolants = None;
        result.name = crate::signals::generate_system_name();
        result
    }
}

impl Neg for FrequencyResponseData {
    type Output = FrequencyResponseData;

    fn neg(self) -> FrequencyResponseData {
        -&self
    }
}

impl<'a, T: Into<Operand<'a>>> Add<T> for &FrequencyResponseData {
    type Output = Result<FrequencyResponseData>;

    fn add(self, other: T) -> Self::Output {
        self.try_add(other)
    }
}

impl<'a, T: Into<Operand<'a>>> Sub<T> for &FrequencyResponseData {
    type Output = Result<FrequencyResponseData>;

    fn sub(self, other: T) -> Self::Output {
        self.try_sub(other)
    }
}

impl<'a, T: Into<Operand<'a>>> Mul<T> for &FrequencyResponseData {
    type Output = Result<FrequencyResponseData>;

    fn mul(self, other: T) -> Self::Output {
        self.try_mul(other)
    }
}

impl<'a, T: Into<Operand<'a>>> Div<T> for &FrequencyResponseData {
    type Output = Result<FrequencyResponseData>;

    fn div(self, other: T) -> Self::Output {
        self.try_div(other)
    }
}

/// `lhs op frd` for left operands that coerce into an [`Operand`]
macro_rules! impl_reverse_ops {
    ($($lhs:ty),*) => {
        $(
            impl Add<&FrequencyResponseData> for $lhs {
                type Output = Result<FrequencyResponseData>;

                fn add(self, frd: &FrequencyResponseData) -> Self::Output {
                    frd.try_radd(self)
                }
            }

            impl Sub<&FrequencyResponseData> for $lhs {
                type Output = Result<FrequencyResponseData>;

                fn sub(self, frd: &FrequencyResponseData) -> Self::Output {
                    frd.try_rsub(self)
                }
            }

            impl Mul<&FrequencyResponseData> for $lhs {
                type Output = Result<FrequencyResponseData>;

                fn mul(self, frd: &FrequencyResponseData) -> Self::Output {
                    frd.try_rmul(self)
                }
            }

            impl Div<&FrequencyResponseData> for $lhs {
                type Output = Result<FrequencyResponseData>;

                fn div(self, frd: &FrequencyResponseData) -> Self::Output {
                    frd.try_rdiv(self)
                }
            }
        )*
    };
}

impl_reverse_ops!(f64, Complex64, &TransferFunction, &StateSpace);
