//! Construction options
//!
//! Options are given either through the typed builder on [`FrdOptions`] or
//! as `(keyword, value)` pairs through [`FrdOptions::from_keywords`], which
//! rejects anything it does not recognize.

use crate::error::{FrdError, Result};
use crate::signals::SignalSpec;
use crate::timebase::Timebase;

/// Policy for dropping singleton axes from evaluation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Squeeze {
    /// Collapse SISO results to the shape of the frequency argument
    #[default]
    Auto,
    /// Drop every axis of length one
    Always,
    /// Keep the output and input axes
    Never,
}

/// Value of a keyword option
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<String>),
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(v: Vec<String>) -> Self {
        OptionValue::List(v)
    }
}

const KEYWORDS: &[&str] = &[
    "smooth",
    "name",
    "sysname",
    "inputs",
    "outputs",
    "dt",
    "squeeze",
    "return_magphase",
    "title",
    "plot_type",
    "plot_phase",
];

/// Options accepted when constructing frequency response data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrdOptions {
    pub(crate) smooth: bool,
    pub(crate) name: Option<String>,
    pub(crate) inputs: Option<SignalSpec>,
    pub(crate) outputs: Option<SignalSpec>,
    pub(crate) dt: Option<Timebase>,
    pub(crate) squeeze: Option<Squeeze>,
    pub(crate) return_magphase: Option<bool>,
    pub(crate) title: Option<String>,
    pub(crate) plot_type: Option<String>,
    pub(crate) plot_phase: Option<bool>,
}

impl FrdOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build per-channel interpolants so the data can be evaluated between samples
    pub fn smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn inputs(mut self, inputs: impl Into<SignalSpec>) -> Self {
        self.inputs = Some(inputs.into());
        self
    }

    pub fn outputs(mut self, outputs: impl Into<SignalSpec>) -> Self {
        self.outputs = Some(outputs.into());
        self
    }

    /// Explicit timebase; must be compatible with the source's timebase
    pub fn dt(mut self, dt: Timebase) -> Self {
        self.dt = Some(dt);
        self
    }

    pub fn squeeze(mut self, squeeze: Squeeze) -> Self {
        self.squeeze = Some(squeeze);
        self
    }

    pub fn return_magphase(mut self, return_magphase: bool) -> Self {
        self.return_magphase = Some(return_magphase);
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn plot_type(mut self, plot_type: &str) -> Self {
        self.plot_type = Some(plot_type.to_string());
        self
    }

    pub fn plot_phase(mut self, plot_phase: bool) -> Self {
        self.plot_phase = Some(plot_phase);
        self
    }

    /// Build options from keyword/value pairs
    ///
    /// # Example
    /// ```
    /// use frd_core::frd::{FrdOptions, OptionValue};
    ///
    /// let opts = FrdOptions::from_keywords([("smooth", OptionValue::Bool(true))]).unwrap();
    /// assert!(FrdOptions::from_keywords([("unknown", OptionValue::None)]).is_err());
    /// # let _ = opts;
    /// ```
    pub fn from_keywords<'a, I>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, OptionValue)>,
    {
        let mut opts = Self::default();
        let mut unknown = Vec::new();

        for (key, value) in keywords {
            match key {
                "smooth" => opts.smooth = parse_bool(key, &value)?,
                "name" | "sysname" => opts.name = parse_optional_string(key, &value)?,
                "inputs" => opts.inputs = parse_signals(key, &value)?,
                "outputs" => opts.outputs = parse_signals(key, &value)?,
                "dt" => opts.dt = Some(parse_timebase(&value)?),
                "squeeze" => opts.squeeze = Some(parse_squeeze(&value)?),
                "return_magphase" => match value {
                    OptionValue::Bool(b) => opts.return_magphase = Some(b),
                    _ => {
                        return Err(FrdError::Construction(
                            "unknown return_magphase value".to_string(),
                        ))
                    }
                },
                "title" => opts.title = parse_optional_string(key, &value)?,
                "plot_type" => opts.plot_type = parse_optional_string(key, &value)?,
                "plot_phase" => {
                    opts.plot_phase = match value {
                        OptionValue::None => None,
                        other => Some(parse_bool(key, &other)?),
                    }
                }
                _ => unknown.push(key.to_string()),
            }
        }

        if !unknown.is_empty() {
            return Err(FrdError::Construction(format!(
                "unrecognized keyword(s): {}",
                unknown.join(", ")
            )));
        }
        Ok(opts)
    }

    /// Keywords understood by [`FrdOptions::from_keywords`]
    pub fn keywords() -> &'static [&'static str] {
        KEYWORDS
    }
}

fn parse_bool(key: &str, value: &OptionValue) -> Result<bool> {
    match value {
        OptionValue::Bool(b) => Ok(*b),
        _ => Err(FrdError::Construction(format!(
            "keyword '{}' expects a boolean",
            key
        ))),
    }
}

fn parse_optional_string(key: &str, value: &OptionValue) -> Result<Option<String>> {
    match value {
        OptionValue::None => Ok(None),
        OptionValue::Str(s) => Ok(Some(s.clone())),
        _ => Err(FrdError::Construction(format!(
            "keyword '{}' expects a string",
            key
        ))),
    }
}

fn parse_signals(key: &str, value: &OptionValue) -> Result<Option<SignalSpec>> {
    match value {
        OptionValue::None => Ok(None),
        OptionValue::Int(n) if *n >= 0 => Ok(Some(SignalSpec::Count(*n as usize))),
        OptionValue::Str(s) => Ok(Some(SignalSpec::from(s.as_str()))),
        OptionValue::List(names) => Ok(Some(SignalSpec::Names(names.clone()))),
        _ => Err(FrdError::Construction(format!(
            "keyword '{}' expects a signal count or list of names",
            key
        ))),
    }
}

/// `None` is unspecified, `False`/`0` continuous, `True` discrete, `dt > 0` sampled
pub(crate) fn parse_timebase(value: &OptionValue) -> Result<Timebase> {
    match value {
        OptionValue::None => Ok(Timebase::Unspecified),
        OptionValue::Bool(false) => Ok(Timebase::Continuous),
        OptionValue::Bool(true) => Ok(Timebase::Discrete),
        OptionValue::Int(0) => Ok(Timebase::Continuous),
        OptionValue::Int(n) => Timebase::sampled(*n as f64),
        OptionValue::Float(dt) if *dt == 0.0 => Ok(Timebase::Continuous),
        OptionValue::Float(dt) => Timebase::sampled(*dt),
        _ => Err(FrdError::Construction("unknown dt value".to_string())),
    }
}

fn parse_squeeze(value: &OptionValue) -> Result<Squeeze> {
    match value {
        OptionValue::None => Ok(Squeeze::Auto),
        OptionValue::Bool(true) => Ok(Squeeze::Always),
        OptionValue::Bool(false) => Ok(Squeeze::Never),
        _ => Err(FrdError::Construction("unknown squeeze value".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let opts = FrdOptions::new()
            .smooth(true)
            .name("plant")
            .inputs(2)
            .outputs(&["a", "b"][..])
            .squeeze(Squeeze::Never);
        assert!(opts.smooth);
        assert_eq!(opts.name.as_deref(), Some("plant"));
        assert_eq!(opts.inputs, Some(SignalSpec::Count(2)));
        assert_eq!(
            opts.outputs,
            Some(SignalSpec::Names(vec!["a".to_string(), "b".to_string()]))
        );
        assert_eq!(opts.squeeze, Some(Squeeze::Never));
    }

    #[test]
    fn test_keywords() {
        let opts = FrdOptions::from_keywords([
            ("smooth", OptionValue::Bool(true)),
            ("sysname", OptionValue::from("g")),
            ("dt", OptionValue::Float(0.1)),
            ("squeeze", OptionValue::Bool(false)),
            ("inputs", OptionValue::from("u0")),
        ])
        .unwrap();
        assert!(opts.smooth);
        assert_eq!(opts.name.as_deref(), Some("g"));
        assert_eq!(opts.dt, Some(Timebase::Sampled(0.1)));
        assert_eq!(opts.squeeze, Some(Squeeze::Never));
        assert_eq!(opts.inputs, Some(SignalSpec::Names(vec!["u0".to_string()])));
    }

    #[test]
    fn test_unrecognized_keyword() {
        let err = FrdOptions::from_keywords([
            ("smooth", OptionValue::Bool(true)),
            ("unknown", OptionValue::None),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("unrecognized keyword"));
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_bad_values() {
        let err = FrdOptions::from_keywords([("squeeze", OptionValue::from("x"))]).unwrap_err();
        assert!(err.to_string().contains("unknown squeeze value"));
        let err =
            FrdOptions::from_keywords([("return_magphase", OptionValue::Int(3))]).unwrap_err();
        assert!(err.to_string().contains("unknown return_magphase value"));
        assert!(FrdOptions::from_keywords([("dt", OptionValue::Float(-1.0))]).is_err());
    }

    #[test]
    fn test_timebase_values() {
        assert_eq!(parse_timebase(&OptionValue::Bool(true)).unwrap(), Timebase::Discrete);
        assert_eq!(parse_timebase(&OptionValue::Int(0)).unwrap(), Timebase::Continuous);
        assert_eq!(parse_timebase(&OptionValue::None).unwrap(), Timebase::Unspecified);
    }
}
