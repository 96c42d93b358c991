//! frd-core: Frequency response data for linear time-invariant systems
//!
//! Models a system by its complex frequency response sampled on a grid of
//! frequencies, and provides the algebra of LTI models (parallel and series
//! connection, feedback, inverse, powers) computed frequency by frequency.
//!
//! ## Modules
//!
//! - `frd` - Frequency response data, its operators and evaluation
//! - `lti` - Analytic models (transfer function, state space)
//! - `timebase` - Continuous/discrete timebases
//! - `math` - Batched linear algebra, polynomials, splines
//! - `pzmap` - Pole/zero maps

pub mod constants;
pub mod error;
pub mod frd;
pub mod lti;
pub mod math;
pub mod pzmap;
pub mod signals;
pub mod timebase;

pub use error::{FrdError, Result};
pub use frd::{frd, FrdOptions, FrequencyResponseData, Squeeze, FRD};
pub use lti::{LtiSystem, StateSpace, TransferFunction};
pub use timebase::{common_timebase, Timebase};
