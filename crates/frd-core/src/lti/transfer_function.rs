//! SISO transfer functions
//!
//! Rational functions `num(s) / den(s)` with real coefficients, highest
//! power first.

use std::ops::{Add, Div, Mul, Neg, Sub};

use ndarray::Array3;
use num_complex::Complex64;

use super::LtiSystem;
use crate::error::{FrdError, Result};
use crate::math::polynomial::{is_zero, polyadd, polymul, polyscale, polyval, roots, trim_leading_zeros};
use crate::timebase::{common_timebase, Timebase};

/// A single-input single-output transfer function
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    num: Vec<f64>,
    den: Vec<f64>,
    dt: Timebase,
    name: Option<String>,
}

impl TransferFunction {
    /// Create a transfer function from numerator and denominator coefficients
    ///
    /// # Example
    /// ```
    /// use frd_core::lti::TransferFunction;
    /// // 1 / (s^2 + 2s + 2)
    /// let h = TransferFunction::new(&[1.0], &[1.0, 2.0, 2.0]).unwrap();
    /// assert_eq!(h.den(), &[1.0, 2.0, 2.0]);
    /// ```
    pub fn new(num: &[f64], den: &[f64]) -> Result<Self> {
        if num.is_empty() || den.is_empty() {
            return Err(FrdError::Construction(
                "numerator and denominator need at least one coefficient".to_string(),
            ));
        }
        if is_zero(den) {
            return Err(FrdError::Construction(
                "denominator polynomial is zero".to_string(),
            ));
        }
        Ok(Self {
            num: trim_leading_zeros(num),
            den: trim_leading_zeros(den),
            dt: Timebase::Unspecified,
            name: None,
        })
    }

    /// Static gain `k`
    pub fn gain(k: f64) -> Self {
        Self {
            num: vec![k],
            den: vec![1.0],
            dt: Timebase::Unspecified,
            name: None,
        }
    }

    /// Set the timebase
    pub fn with_dt(mut self, dt: Timebase) -> Self {
        self.dt = dt;
        self
    }

    /// Set the system name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    #[inline]
    pub fn num(&self) -> &[f64] {
        &self.num
    }

    #[inline]
    pub fn den(&self) -> &[f64] {
        &self.den
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Evaluate at a single complex point
    #[inline]
    pub fn evaluate(&self, s: Complex64) -> Complex64 {
        polyval(&self.num, s) / polyval(&self.den, s)
    }

    /// `1 / self`
    pub fn reciprocal(&self) -> Result<Self> {
        if is_zero(&self.num) {
            return Err(FrdError::Domain(
                "cannot invert a transfer function with zero numerator".to_string(),
            ));
        }
        Ok(Self {
            num: self.den.clone(),
            den: self.num.clone(),
            dt: self.dt,
            name: None,
        })
    }

    /// Integer power; negative exponents invert first
    pub fn powi(&self, n: i32) -> Result<Self> {
        let base = if n < 0 { self.reciprocal()? } else { self.clone() };
        let mut result = Self::gain(1.0).with_dt(self.dt);
        for _ in 0..n.unsigned_abs() {
            result = (&result * &base)?;
        }
        Ok(result)
    }

    /// Feedback interconnection `self / (1 - sign * self * other)`
    ///
    /// `sign = -1.0` is negative feedback.
    pub fn feedback(&self, other: &TransferFunction, sign: f64) -> Result<Self> {
        let dt = common_timebase(self.dt, other.dt)?;
        let num = polymul(&self.num, &other.den);
        let den = polyadd(
            &polymul(&self.den, &other.den),
            &polyscale(&polymul(&self.num, &other.num), -sign),
        );
        Ok(Self::new(&num, &den)?.with_dt(dt))
    }

    /// Poles: roots of the denominator
    pub fn poles(&self) -> Vec<Complex64> {
        roots(&self.den)
    }

    /// Zeros: roots of the numerator
    pub fn zeros(&self) -> Vec<Complex64> {
        roots(&self.num)
    }
}

impl LtiSystem for TransferFunction {
    fn ninputs(&self) -> usize {
        1
    }

    fn noutputs(&self) -> usize {
        1
    }

    fn timebase(&self) -> Timebase {
        self.dt
    }

    fn evaluate_at(&self, points: &[Complex64]) -> Result<Array3<Complex64>> {
        Ok(Array3::from_shape_fn((1, 1, points.len()), |(_, _, k)| {
            self.evaluate(points[k])
        }))
    }
}

impl Add for &TransferFunction {
    type Output = Result<TransferFunction>;

    /// Parallel connection
    fn add(self, other: &TransferFunction) -> Result<TransferFunction> {
        let dt = common_timebase(self.dt, other.dt)?;
        let num = polyadd(
            &polymul(&self.num, &other.den),
            &polymul(&other.num, &self.den),
        );
        let den = polymul(&self.den, &other.den);
        Ok(TransferFunction::new(&num, &den)?.with_dt(dt))
    }
}

impl Sub for &TransferFunction {
    type Output = Result<TransferFunction>;

    fn sub(self, other: &TransferFunction) -> Result<TransferFunction> {
        self + &(-other)
    }
}

impl Mul for &TransferFunction {
    type Output = Result<TransferFunction>;

    /// Series connection
    fn mul(self, other: &TransferFunction) -> Result<TransferFunction> {
        let dt = common_timebase(self.dt, other.dt)?;
        let num = polymul(&self.num, &other.num);
        let den = polymul(&self.den, &other.den);
        Ok(TransferFunction::new(&num, &den)?.with_dt(dt))
    }
}

impl Div for &TransferFunction {
    type Output = Result<TransferFunction>;

    fn div(self, other: &TransferFunction) -> Result<TransferFunction> {
        self * &other.reciprocal()?
    }
}

impl Neg for &TransferFunction {
    type Output = TransferFunction;

    fn neg(self) -> TransferFunction {
        TransferFunction {
            num: polyscale(&self.num, -1.0),
            den: self.den.clone(),
            dt: self.dt,
            name: None,
        }
    }
}

impl Add<f64> for &TransferFunction {
    type Output = TransferFunction;

    fn add(self, k: f64) -> TransferFunction {
        TransferFunction {
            num: polyadd(&self.num, &polyscale(&self.den, k)),
            den: self.den.clone(),
            dt: self.dt,
            name: None,
        }
    }
}

impl Sub<f64> for &TransferFunction {
    type Output = TransferFunction;

    fn sub(self, k: f64) -> TransferFunction {
        self + (-k)
    }
}

impl Mul<f64> for &TransferFunction {
    type Output = TransferFunction;

    fn mul(self, k: f64) -> TransferFunction {
        TransferFunction {
            num: polyscale(&self.num, k),
            den: self.den.clone(),
            dt: self.dt,
            name: None,
        }
    }
}

impl Div<f64> for &TransferFunction {
    type Output = TransferFunction;

    fn div(self, k: f64) -> TransferFunction {
        self * (1.0 / k)
    }
}

impl Mul<&TransferFunction> for f64 {
    type Output = TransferFunction;

    fn mul(self, tf: &TransferFunction) -> TransferFunction {
        tf * self
    }
}

impl Div<&TransferFunction> for f64 {
    type Output = Result<TransferFunction>;

    fn div(self, tf: &TransferFunction) -> Result<TransferFunction> {
        Ok(&tf.reciprocal()? * self)
    }
}
