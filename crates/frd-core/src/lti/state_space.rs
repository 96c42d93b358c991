//! State-space models
//!
//! `dx = A x + B u`, `y = C x + D u` with real matrices.

use std::ops::Mul;

use ndarray::{concatenate, s, Array2, Array3, Axis};
use num_complex::Complex64;

use super::{LtiSystem, TransferFunction};
use crate::error::{FrdError, Result};
use crate::math::linalg::{eigenvalues, inv_real, solve_complex};
use crate::timebase::{common_timebase, Timebase};

/// A state-space model
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace {
    a: Array2<f64>,
    b: Array2<f64>,
    c: Array2<f64>,
    d: Array2<f64>,
    dt: Timebase,
    name: Option<String>,
}

impl StateSpace {
    /// Create a state-space model, checking that the matrix sizes agree
    pub fn new(a: Array2<f64>, b: Array2<f64>, c: Array2<f64>, d: Array2<f64>) -> Result<Self> {
        let n = a.nrows();
        if a.ncols() != n {
            return Err(FrdError::Construction(format!(
                "A must be square, got {}x{}",
                a.nrows(),
                a.ncols()
            )));
        }
        if b.nrows() != n {
            return Err(FrdError::Construction(format!(
                "B must have {} rows, got {}",
                n,
                b.nrows()
            )));
        }
        if c.ncols() != n {
            return Err(FrdError::Construction(format!(
                "C must have {} columns, got {}",
                n,
                c.ncols()
            )));
        }
        if d.dim() != (c.nrows(), b.ncols()) {
            return Err(FrdError::Construction(format!(
                "D must be {}x{}, got {}x{}",
                c.nrows(),
                b.ncols(),
                d.nrows(),
                d.ncols()
            )));
        }
        Ok(Self {
            a,
            b,
            c,
            d,
            dt: Timebase::Unspecified,
            name: None,
        })
    }

    /// Static gain matrix (no states)
    pub fn static_gain(d: Array2<f64>) -> Self {
        let (p, m) = d.dim();
        Self {
            a: Array2::zeros((0, 0)),
            b: Array2::zeros((0, m)),
            c: Array2::zeros((p, 0)),
            d,
            dt: Timebase::Unspecified,
            name: None,
        }
    }

    pub fn with_dt(mut self, dt: Timebase) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    #[inline]
    pub fn nstates(&self) -> usize {
        self.a.nrows()
    }

    #[inline]
    pub fn a(&self) -> &Array2<f64> {
        &self.a
    }

    #[inline]
    pub fn b(&self) -> &Array2<f64> {
        &self.b
    }

    #[inline]
    pub fn c(&self) -> &Array2<f64> {
        &self.c
    }

    #[inline]
    pub fn d(&self) -> &Array2<f64> {
        &self.d
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Evaluate `C (sI - A)^{-1} B + D` at a single complex point
    pub fn evaluate(&self, s: Complex64) -> Result<Array2<Complex64>> {
        let n = self.nstates();
        let to_c = |x: &f64| Complex64::new(*x, 0.0);
        let d = self.d.map(to_c);
        if n == 0 {
            return Ok(d);
        }

        let si_a = Array2::from_shape_fn((n, n), |(i, j)| {
            let diag = if i == j { s } else { Complex64::new(0.0, 0.0) };
            diag - self.a[[i, j]]
        });
        let x = solve_complex(&si_a.view(), &self.b.map(to_c).view()).ok_or_else(|| {
            FrdError::Numeric(format!("sI - A is singular at s = {}", s))
        })?;
        Ok(self.c.map(to_c).dot(&x) + d)
    }

    /// `K * self` for a constant output gain `K`
    pub fn output_gain(&self, k: &Array2<f64>) -> Result<Self> {
        if k.ncols() != self.noutputs() {
            return Err(FrdError::SizeMismatch(format!(
                "gain has {} columns but system has {} outputs",
                k.ncols(),
                self.noutputs()
            )));
        }
        Ok(Self {
            a: self.a.clone(),
            b: self.b.clone(),
            c: k.dot(&self.c),
            d: k.dot(&self.d),
            dt: self.dt,
            name: None,
        })
    }

    /// Closed loop with a static gain `K` in the feedback path
    ///
    /// `u = r + sign * K y`; `sign = -1.0` is negative feedback.
    pub fn feedback(&self, k: &Array2<f64>, sign: f64) -> Result<Self> {
        let (p, m) = (self.noutputs(), self.ninputs());
        if k.dim() != (m, p) {
            return Err(FrdError::SizeMismatch(format!(
                "feedback gain must be {}x{}, got {}x{}",
                m,
                p,
                k.nrows(),
                k.ncols()
            )));
        }

        // y = E (C x + D r), E = inv(I - sign D K)
        let e = inv_real(&(Array2::eye(p) - &(self.d.dot(k) * sign))).ok_or_else(|| {
            FrdError::Numeric("algebraic loop I - sign * D * K is singular".to_string())
        })?;
        let bk = self.b.dot(k) * sign;
        let ec = e.dot(&self.c);
        let ed = e.dot(&self.d);

        Ok(Self {
            a: &self.a + &bk.dot(&ec),
            b: &self.b + &bk.dot(&ed),
            c: ec,
            d: ed,
            dt: self.dt,
            name: None,
        })
    }

    /// Eigenvalues of `A`
    pub fn poles(&self) -> Result<Vec<Complex64>> {
        eigenvalues(&self.a).map_err(|e| FrdError::Numeric(e.to_string()))
    }

    /// Convert a SISO model to a transfer function
    pub fn to_transfer_function(&self) -> Result<TransferFunction> {
        if !self.is_siso() {
            return Err(FrdError::Domain(
                "transfer function conversion is only implemented for SISO systems".to_string(),
            ));
        }
        let n = self.nstates();
        let d = self.d[[0, 0]];

        // Faddeev-LeVerrier: det(sI - A) = sum c[k] s^(n-k), adj(sI - A) = sum M_k s^(n-k)
        let mut den = vec![0.0; n + 1];
        let mut num = vec![0.0; n + 1];
        den[0] = 1.0;
        num[0] = d;
        let mut m_prev = Array2::<f64>::zeros((n, n));
        for k in 1..=n {
            let m_k = self.a.dot(&m_prev) + &(Array2::<f64>::eye(n) * den[k - 1]);
            let am = self.a.dot(&m_k);
            den[k] = -am.diag().sum() / k as f64;
            num[k] = self.c.dot(&m_k).dot(&self.b)[[0, 0]] + d * den[k];
            m_prev = m_k;
        }

        let mut tf = TransferFunction::new(&num, &den)?.with_dt(self.dt);
        if let Some(name) = &self.name {
            tf = tf.with_name(name);
        }
        Ok(tf)
    }

    /// Zeros of a SISO model
    pub fn zeros(&self) -> Result<Vec<Complex64>> {
        Ok(self.to_transfer_function()?.zeros())
    }

    #[inline]
    pub fn is_siso(&self) -> bool {
        self.ninputs() == 1 && self.noutputs() == 1
    }
}

impl LtiSystem for StateSpace {
    fn ninputs(&self) -> usize {
        self.b.ncols()
    }

    fn noutputs(&self) -> usize {
        self.c.nrows()
    }

    fn timebase(&self) -> Timebase {
        self.dt
    }

    fn evaluate_at(&self, points: &[Complex64]) -> Result<Array3<Complex64>> {
        let mut out = Array3::zeros((self.noutputs(), self.ninputs(), points.len()));
        for (k, &s) in points.iter().enumerate() {
            out.slice_mut(s![.., .., k]).assign(&self.evaluate(s)?);
        }
        Ok(out)
    }
}

impl Mul for &StateSpace {
    type Output = Result<StateSpace>;

    /// Series connection: `self * other` feeds `other`'s output into `self`
    fn mul(self, other: &StateSpace) -> Result<StateSpace> {
        if self.ninputs() != other.noutputs() {
            return Err(FrdError::SizeMismatch(format!(
                "first system has {} inputs, second has {} outputs",
                self.ninputs(),
                other.noutputs()
            )));
        }
        let dt = common_timebase(self.dt, other.dt)?;
        let (n1, n2) = (self.nstates(), other.nstates());

        let a = concatenate![
            Axis(0),
            concatenate![Axis(1), self.a, self.b.dot(&other.c)],
            concatenate![Axis(1), Array2::<f64>::zeros((n2, n1)), other.a]
        ];
        let b = concatenate![Axis(0), self.b.dot(&other.d), other.b];
        let c = concatenate![Axis(1), self.c, self.d.dot(&other.c)];
        let d = self.d.dot(&other.d);

        Ok(StateSpace {
            a,
            b,
            c,
            d,
            dt,
            name: None,
        })
    }
}
