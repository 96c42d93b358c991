//! Real polynomial helpers
//!
//! Coefficients are ordered from the highest power down to the constant
//! term, e.g. `[1.0, 2.0, 2.0]` is `s^2 + 2s + 2`.

use ndarray::Array2;
use num_complex::Complex64;

use super::linalg::eigenvalues;

/// Evaluate a polynomial at a complex point (Horner's scheme)
#[inline]
pub fn polyval(coeffs: &[f64], s: Complex64) -> Complex64 {
    coeffs
        .iter()
        .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * s + c)
}

/// Drop leading zero coefficients, keeping at least one coefficient
pub fn trim_leading_zeros(coeffs: &[f64]) -> Vec<f64> {
    match coeffs.iter().position(|&c| c != 0.0) {
        Some(first) => coeffs[first..].to_vec(),
        None => vec![0.0],
    }
}

/// Sum of two polynomials
pub fn polyadd(a: &[f64], b: &[f64]) -> Vec<f64> {
    let n = a.len().max(b.len());
    let mut result = vec![0.0; n];
    for (i, &c) in a.iter().enumerate() {
        result[n - a.len() + i] += c;
    }
    for (i, &c) in b.iter().enumerate() {
        result[n - b.len() + i] += c;
    }
    trim_leading_zeros(&result)
}

/// Product of two polynomials (coefficient convolution)
pub fn polymul(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return vec![0.0];
    }
    let mut result = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            result[i + j] += x * y;
        }
    }
    trim_leading_zeros(&result)
}

/// Multiply every coefficient by a scalar
#[inline]
pub fn polyscale(a: &[f64], k: f64) -> Vec<f64> {
    trim_leading_zeros(&a.iter().map(|&c| c * k).collect::<Vec<_>>())
}

/// True if every coefficient is zero
#[inline]
pub fn is_zero(a: &[f64]) -> bool {
    a.iter().all(|&c| c == 0.0)
}

/// Balanced companion matrix of a polynomial with non-zero leading coefficient
///
/// Before balancing the first row holds `-a[i] / a[0]` and the subdiagonal
/// holds ones.
fn companion(coeffs: &[f64]) -> Array2<f64> {
    let n = coeffs.len() - 1;
    let a0 = coeffs[0];
    let mut m = Array2::<f64>::zeros((n, n));
    for (i, &c) in coeffs.iter().skip(1).enumerate() {
        m[[0, i]] = -c / a0;
    }
    for i in 0..n.saturating_sub(1) {
        m[[i + 1, i]] = 1.0;
    }
    balance(&mut m);
    m
}

/// Scale rows and columns by powers of two until their norms are comparable
///
/// Similarity transform; the eigenvalues are unchanged.
fn balance(m: &mut Array2<f64>) {
    const RADIX: f64 = 2.0;
    let n = m.nrows();
    let mut converged = false;
    while !converged {
        converged = true;
        for i in 0..n {
            let mut c: f64 = (0..n).filter(|&j| j != i).map(|j| m[[j, i]].abs()).sum();
            let r: f64 = (0..n).filter(|&j| j != i).map(|j| m[[i, j]].abs()).sum();
            if c == 0.0 || r == 0.0 {
                continue;
            }
            let s = c + r;
            let mut f = 1.0;
            while c < r / RADIX {
                f *= RADIX;
                c *= RADIX * RADIX;
            }
            while c > r * RADIX {
                f /= RADIX;
                c /= RADIX * RADIX;
            }
            if (c + r) / f < 0.95 * s {
                converged = false;
                m.row_mut(i).mapv_inplace(|x| x / f);
                m.column_mut(i).mapv_inplace(|x| x * f);
            }
        }
    }
}

/// Roots of a polynomial
///
/// Trailing zero coefficients contribute roots at the origin; the rest are
/// eigenvalues of the companion matrix. A constant polynomial has no roots.
pub fn roots(coeffs: &[f64]) -> Vec<Complex64> {
    let coeffs = trim_leading_zeros(coeffs);
    let nonzero_len = coeffs
        .iter()
        .rposition(|&c| c != 0.0)
        .map_or(0, |last| last + 1);
    if nonzero_len == 0 {
        return Vec::new();
    }

    let zero_roots = coeffs.len() - nonzero_len;
    let reduced = &coeffs[..nonzero_len];

    let mut result = if reduced.len() > 1 {
        eigenvalues(&companion(reduced)).unwrap_or_default()
    } else {
        Vec::new()
    };
    result.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(zero_roots));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polyval() {
        // s^2 + 2s + 2 at s = j: -1 + 2j + 2 = 1 + 2j
        let v = polyval(&[1.0, 2.0, 2.0], Complex64::new(0.0, 1.0));
        assert_relative_eq!(v.re, 1.0);
        assert_relative_eq!(v.im, 2.0);
    }

    #[test]
    fn test_polyadd_and_polymul() {
        assert_eq!(polyadd(&[1.0, 2.0], &[1.0, 0.0, 3.0]), vec![1.0, 2.0, 5.0]);
        assert_eq!(polymul(&[1.0, 1.0], &[1.0, -1.0]), vec![1.0, 0.0, -1.0]);
        // cancellation of the leading term is trimmed
        assert_eq!(polyadd(&[1.0, 2.0], &[-1.0, 1.0]), vec![3.0]);
    }

    #[test]
    fn test_roots_quadratic() {
        // s^2 + 2s + 2 -> -1 +/- j
        let mut r = roots(&[1.0, 2.0, 2.0]);
        r.sort_by(|a, b| a.im.total_cmp(&b.im));
        assert_relative_eq!(r[0].re, -1.0, epsilon = 1e-10);
        assert_relative_eq!(r[0].im, -1.0, epsilon = 1e-10);
        assert_relative_eq!(r[1].im, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_roots_with_zero_root_and_constant() {
        // s^2 + 3s = s (s + 3)
        let mut r = roots(&[1.0, 3.0, 0.0]);
        r.sort_by(|a, b| a.re.total_cmp(&b.re));
        assert_relative_eq!(r[0].re, -3.0, epsilon = 1e-10);
        assert_relative_eq!(r[1].norm(), 0.0);
        assert!(roots(&[5.0]).is_empty());
        assert!(roots(&[0.0, 0.0, 2.0]).is_empty());
    }
}
