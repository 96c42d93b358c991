//! Signal and system naming
//!
//! Input/output labels default to `u[i]` / `y[i]`; systems without an
//! explicit name get a generated `sys[N]` name.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{FrdError, Result};

static SYSTEM_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Signal specification given at construction
#[derive(Debug, Clone, PartialEq)]
pub enum SignalSpec {
    /// Number of signals, labelled with the default prefix
    Count(usize),
    /// Explicit signal names
    Names(Vec<String>),
}

impl From<usize> for SignalSpec {
    fn from(n: usize) -> Self {
        SignalSpec::Count(n)
    }
}

impl From<&str> for SignalSpec {
    fn from(name: &str) -> Self {
        SignalSpec::Names(vec![name.to_string()])
    }
}

impl From<Vec<String>> for SignalSpec {
    fn from(names: Vec<String>) -> Self {
        SignalSpec::Names(names)
    }
}

impl From<&[&str]> for SignalSpec {
    fn from(names: &[&str]) -> Self {
        SignalSpec::Names(names.iter().map(|s| s.to_string()).collect())
    }
}

/// Default labels `prefix[0]`, `prefix[1]`, ...
pub fn default_labels(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{}[{}]", prefix, i)).collect()
}

/// Resolve a signal specification against the actual number of signals
pub fn resolve_labels(
    spec: Option<&SignalSpec>,
    prefix: &str,
    n: usize,
    kind: &str,
) -> Result<Vec<String>> {
    match spec {
        None => Ok(default_labels(prefix, n)),
        Some(SignalSpec::Count(count)) if *count == n => Ok(default_labels(prefix, n)),
        Some(SignalSpec::Count(count)) => Err(FrdError::Construction(format!(
            "{} count {} does not match response data with {} {}",
            kind, count, n, kind
        ))),
        Some(SignalSpec::Names(names)) if names.len() == n => Ok(names.clone()),
        Some(SignalSpec::Names(names)) => Err(FrdError::Construction(format!(
            "{} {} names given for response data with {} {}",
            names.len(),
            kind,
            n,
            kind
        ))),
    }
}

/// True if `labels` are the defaults for their prefix
pub fn is_default_labels(labels: &[String], prefix: &str) -> bool {
    labels
        .iter()
        .enumerate()
        .all(|(i, l)| *l == format!("{}[{}]", prefix, i))
}

/// Generate a unique system name of the form `sys[N]`
pub fn generate_system_name() -> String {
    let id = SYSTEM_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("sys[{}]", id)
}
