//! Frequency response data
//!
//! A system model stored as complex gain matrices sampled at a set of
//! frequencies, with the algebra of analytic LTI models (parallel, series,
//! feedback, inverse, powers) carried out frequency by frequency.

mod convert;
mod core;
mod display;
mod eval;
mod factory;
mod interconnect;
mod io;
mod operators;
mod options;

pub use convert::{convert_to_frd, Operand};
pub use self::core::{FrequencyResponseData, FRD};
pub use eval::{FrequencyArg, LegacyItem, LegacyTuple};
pub use factory::{frd, FrdSource};
pub use io::ResponseTable;
pub use options::{FrdOptions, OptionValue, Squeeze};
