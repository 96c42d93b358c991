//! Numerical constants for frequency response calculations
//!
//! Provides standardized tolerance values used throughout the library.

/// Absolute tolerance for treating two frequency grids as the same grid.
/// Two samples match when `|omega_a - omega_b| < FREQUENCY_MATCH_TOL`.
pub const FREQUENCY_MATCH_TOL: f64 = 1e-8;

/// Sampling period assumed for discrete-time systems with an unspecified step.
pub const DEFAULT_SAMPLING_PERIOD: f64 = 1.0;
