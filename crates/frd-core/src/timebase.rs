//! System timebase
//!
//! A timebase marks a model as continuous-time, discrete-time (with or
//! without a known sampling period) or unspecified. Unspecified timebases
//! combine with anything; the others must agree.

use std::fmt;

use num_complex::Complex64;

use crate::constants::DEFAULT_SAMPLING_PERIOD;
use crate::error::{FrdError, Result};

/// Timebase of a linear time-invariant system
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Timebase {
    /// No timebase given; compatible with every other timebase
    #[default]
    Unspecified,
    /// Continuous time (`dt = 0`)
    Continuous,
    /// Discrete time with an unspecified sampling period (`dt = True`)
    Discrete,
    /// Discrete time with a known, positive sampling period
    Sampled(f64),
}

impl Timebase {
    /// Create a sampled timebase, rejecting non-positive or non-finite periods
    pub fn sampled(dt: f64) -> Result<Self> {
        if dt.is_finite() && dt > 0.0 {
            Ok(Timebase::Sampled(dt))
        } else {
            Err(FrdError::Construction(format!(
                "sampling period must be positive and finite, got {}",
                dt
            )))
        }
    }

    /// True for continuous or unspecified timebases
    #[inline]
    pub fn is_continuous(&self) -> bool {
        matches!(self, Timebase::Unspecified | Timebase::Continuous)
    }

    /// True for discrete timebases (known or unknown period)
    #[inline]
    pub fn is_discrete(&self) -> bool {
        matches!(self, Timebase::Discrete | Timebase::Sampled(_))
    }

    /// Sampling period used to map frequencies onto the unit circle
    pub fn sampling_period(&self) -> Option<f64> {
        match self {
            Timebase::Sampled(dt) => Some(*dt),
            Timebase::Discrete => Some(DEFAULT_SAMPLING_PERIOD),
            _ => None,
        }
    }

    /// Map real frequencies (rad/s) onto the complex plane of this timebase
    ///
    /// Continuous: `s = jω`. Discrete: `z = exp(jωT)`.
    pub fn frequency_points(&self, omega: &[f64]) -> Vec<Complex64> {
        match self.sampling_period() {
            None => omega.iter().map(|&w| Complex64::new(0.0, w)).collect(),
            Some(dt) => omega
                .iter()
                .map(|&w| Complex64::new(0.0, w * dt).exp())
                .collect(),
        }
    }
}

impl fmt::Display for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timebase::Unspecified => write!(f, "None"),
            Timebase::Continuous => write!(f, "0"),
            Timebase::Discrete => write!(f, "True"),
            Timebase::Sampled(dt) => write!(f, "{}", dt),
        }
    }
}

/// Find a timebase compatible with both arguments
///
/// `Unspecified` yields the other timebase, `Discrete` adopts a known
/// sampling period, equal timebases are kept. Everything else fails.
pub fn common_timebase(left: Timebase, right: Timebase) -> Result<Timebase> {
    use Timebase::*;

    match (left, right) {
        (Unspecified, other) | (other, Unspecified) => Ok(other),
        (Continuous, Continuous) => Ok(Continuous),
        (Discrete, Discrete) => Ok(Discrete),
        (Discrete, Sampled(dt)) | (Sampled(dt), Discrete) => Ok(Sampled(dt)),
        (Sampled(a), Sampled(b)) if (a - b).abs() <= 1e-9 * a.abs().max(b.abs()) => {
            Ok(Sampled(a))
        }
        _ => Err(FrdError::IncompatibleTimebase { left, right }),
    }
}
