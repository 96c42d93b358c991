//! Mathematical building blocks
//!
//! Dense and batched linear algebra, polynomials, and interpolating splines.

pub mod linalg;
pub mod matrix_ops;
pub mod polynomial;
pub mod spline;

pub use spline::{ComplexSpline, CubicSpline};
