//! Interpolating cubic splines
//!
//! A smoothing FRD fits one [`ComplexSpline`] per (output, input) channel:
//! a two-curve parametric spline through the real and imaginary parts of the
//! response, parameterized by frequency. The fit uses a zero smoothing
//! factor, so it passes through every sample.
//!
//! End conditions are "not-a-knot" (third derivative continuous across the
//! second and second-to-last knots). With fewer than four samples the spline
//! degrades to the interpolating quadratic, line, or constant.

use num_complex::Complex64;

use crate::error::{FrdError, Result};

/// Interpolating cubic spline through `(x[i], y[i])`
///
/// Stored in second-derivative form: `m[i]` is the spline's second
/// derivative at knot `x[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    m: Vec<f64>,
}

impl CubicSpline {
    /// Fit an interpolating spline
    ///
    /// `x` must be finite and strictly increasing; `y` must be finite and
    /// have the same length.
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(FrdError::Construction(format!(
                "spline needs matching sample counts, got {} abscissae and {} values",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(FrdError::Construction(
                "spline needs at least one sample".to_string(),
            ));
        }
        if x.iter().chain(y).any(|v| !v.is_finite()) {
            return Err(FrdError::Construction(
                "spline samples must be finite".to_string(),
            ));
        }
        if x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FrdError::Construction(
                "spline abscissae must be strictly increasing".to_string(),
            ));
        }

        let m = match x.len() {
            1 | 2 => vec![0.0; x.len()],
            3 => {
                let h0 = x[1] - x[0];
                let h1 = x[2] - x[1];
                let curvature = 2.0 * ((y[2] - y[1]) / h1 - (y[1] - y[0]) / h0) / (h0 + h1);
                vec![curvature; 3]
            }
            _ => not_a_knot_curvatures(x, y),
        };

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    /// Evaluate the spline; outside the knot range the end cubics extrapolate
    pub fn eval(&self, t: f64) -> f64 {
        let n = self.x.len();
        if n == 1 {
            return self.y[0];
        }

        let i = self.x.partition_point(|&xi| xi <= t).clamp(1, n - 1) - 1;
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);
        let (m0, m1) = (self.m[i], self.m[i + 1]);
        let h = x1 - x0;
        let a = x1 - t;
        let b = t - x0;

        m0 * a.powi(3) / (6.0 * h)
            + m1 * b.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * a
            + (y1 / h - m1 * h / 6.0) * b
    }
}

/// Second derivatives of the not-a-knot spline (needs at least 4 samples)
///
/// The two end conditions are used to eliminate `m[0]` and `m[n-1]`, which
/// leaves a diagonally dominant tridiagonal system in `m[1..n-1]`.
fn not_a_knot_curvatures(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let k = n - 2;

    let mut sub = vec![0.0; k];
    let mut diag = vec![0.0; k];
    let mut sup = vec![0.0; k];
    let mut rhs = vec![0.0; k];

    for row in 0..k {
        let i = row + 1;
        sub[row] = h[i - 1];
        diag[row] = 2.0 * (h[i - 1] + h[i]);
        sup[row] = h[i];
        rhs[row] = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
    }

    // m0 = ((h0 + h1) m1 - h0 m2) / h1
    diag[0] += h[0] * (h[0] + h[1]) / h[1];
    sup[0] -= h[0] * h[0] / h[1];
    sub[0] = 0.0;

    // m[n-1] = ((h[n-3] + h[n-2]) m[n-2] - h[n-2] m[n-3]) / h[n-3]
    let (hl, hr) = (h[n - 3], h[n - 2]);
    diag[k - 1] += hr * (hl + hr) / hl;
    sub[k - 1] -= hr * hr / hl;
    sup[k - 1] = 0.0;

    let inner = solve_tridiagonal(&sub, &diag, &sup, &rhs);

    let mut m = Vec::with_capacity(n);
    m.push(((h[0] + h[1]) * inner[0] - h[0] * inner[1]) / h[1]);
    m.extend_from_slice(&inner);
    m.push(((hl + hr) * inner[k - 1] - hr * inner[k - 2]) / hl);
    m
}

/// Thomas algorithm for a tridiagonal system
///
/// `sub[0]` and `sup[len-1]` are ignored.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - sub[i] * c[i - 1];
        c[i] = if i + 1 < n { sup[i] / denom } else { 0.0 };
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / denom;
    }

    let mut out = vec![0.0; n];
    out[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        out[i] = d[i] - c[i] * out[i + 1];
    }
    out
}

/// Parametric spline through the real and imaginary parts of a response
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSpline {
    re: CubicSpline,
    im: CubicSpline,
}

impl ComplexSpline {
    /// Fit both parts of `values` over the frequency parameter `omega`
    pub fn fit(omega: &[f64], values: &[Complex64]) -> Result<Self> {
        let re: Vec<f64> = values.iter().map(|v| v.re).collect();
        let im: Vec<f64> = values.iter().map(|v| v.im).collect();
        Ok(Self {
            re: CubicSpline::fit(omega, &re)?,
            im: CubicSpline::fit(omega, &im)?,
        })
    }

    /// Evaluate the complex response at frequency `w`
    #[inline]
    pub fn eval(&self, w: f64) -> Complex64 {
        Complex64::new(self.re.eval(w), self.im.eval(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_not_a_knot_reproduces_cubic() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v: &f64| v.powi(3) - 2.0 * v).collect();
        let s = CubicSpline::fit(&x, &y).unwrap();

        for &t in &[0.5, 1.7, 2.5, 3.9] {
            assert_relative_eq!(s.eval(t), t.powi(3) - 2.0 * t, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_not_a_knot_nonuniform_grid() {
        let x = [0.1, 0.3, 1.0, 2.5, 10.0, 11.0];
        let y: Vec<f64> = x.iter().map(|v: &f64| 0.5 * v.powi(3) + v * v - 1.0).collect();
        let s = CubicSpline::fit(&x, &y).unwrap();

        for &t in &[0.2, 0.7, 5.0, 10.5] {
            assert_relative_eq!(s.eval(t), 0.5 * t.powi(3) + t * t - 1.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_passes_through_samples() {
        let x = [1.0, 2.0, 4.0, 8.0, 16.0];
        let y = [0.3, -1.0, 2.5, 0.0, 7.0];
        let s = CubicSpline::fit(&x, &y).unwrap();
        for (xi, yi) in x.iter().zip(y.iter()) {
            assert_relative_eq!(s.eval(*xi), *yi, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_short_inputs() {
        let c = CubicSpline::fit(&[1.0], &[3.0]).unwrap();
        assert_relative_eq!(c.eval(100.0), 3.0);

        let l = CubicSpline::fit(&[0.0, 2.0], &[0.0, 4.0]).unwrap();
        assert_relative_eq!(l.eval(1.0), 2.0, epsilon = 1e-12);

        // parabola y = x^2
        let q = CubicSpline::fit(&[0.0, 1.0, 3.0], &[0.0, 1.0, 9.0]).unwrap();
        assert_relative_eq!(q.eval(2.0), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fit_rejects_bad_abscissae() {
        assert!(CubicSpline::fit(&[1.0, 1.0], &[0.0, 1.0]).is_err());
        assert!(CubicSpline::fit(&[], &[]).is_err());
        assert!(CubicSpline::fit(&[0.0, 1.0], &[0.0]).is_err());
    }

    #[test]
    fn test_complex_spline() {
        let w = [1.0, 2.0, 3.0, 4.0];
        let v: Vec<Complex64> = w.iter().map(|&x| Complex64::new(x, -2.0 * x)).collect();
        let s = ComplexSpline::fit(&w, &v).unwrap();
        let z = s.eval(2.5);
        assert_relative_eq!(z.re, 2.5, epsilon = 1e-12);
        assert_relative_eq!(z.im, -5.0, epsilon = 1e-12);
    }
}
