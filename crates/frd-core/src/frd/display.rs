//! Text representations
//!
//! `Display` prints a frequency/response table per channel. `to_repr`
//! produces a constructor-like text that `FromStr` reads back.

use std::fmt;
use std::str::FromStr;

use ndarray::Array3;
use num_complex::Complex64;

use super::core::FrequencyResponseData;
use super::options::{FrdOptions, OptionValue};
use crate::error::{FrdError, Result};
use crate::signals::is_default_labels;
use crate::timebase::Timebase;

/// Format like C's `%.{precision}g`
pub(crate) fn format_g(x: f64, precision: usize) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    let sci = format!("{:.*e}", precision - 1, x);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, x)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// `%+.{precision}g`
fn format_g_signed(x: f64, precision: usize) -> String {
    let s = format_g(x, precision);
    if s.starts_with('-') {
        s
    } else {
        format!("+{}", s)
    }
}

/// Exact text for a float, readable by `f64::from_str`
fn float_literal(x: f64) -> String {
    format!("{:?}", x)
}

fn complex_literal(z: Complex64) -> String {
    let im = float_literal(z.im);
    if im.starts_with('-') {
        format!("{}{}j", float_literal(z.re), im)
    } else {
        format!("{}+{}j", float_literal(z.re), im)
    }
}

/// Single-quoted literal; backslashes and quotes are escaped
fn quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        if ch == '\\' || ch == '\'' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

fn label_list(labels: &[String]) -> String {
    let items: Vec<String> = labels.iter().map(|l| quoted(l)).collect();
    format!("[{}]", items.join(", "))
}

impl fmt::Display for FrequencyResponseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<FrequencyResponseData>: {}", self.name)?;
        write!(f, "\nInputs ({}): {}", self.ninputs(), label_list(&self.input_labels))?;
        write!(f, "\nOutputs ({}): {}", self.noutputs(), label_list(&self.output_labels))?;
        if self.dt.is_discrete() {
            write!(f, "\ndt = {}", self.dt)?;
        }

        let mimo = !self.is_siso();
        let indent = if mimo { "  " } else { "" };
        for j in 0..self.ninputs() {
            for i in 0..self.noutputs() {
                if mimo {
                    write!(f, "\n\nInput {} to output {}:", j + 1, i + 1)?;
                }
                write!(f, "\n\n{}Freq [rad/s]  Response", indent)?;
                write!(f, "\n{}------------  ---------------------", indent)?;
                for (k, w) in self.omega.iter().enumerate() {
                    let z = self.fresp[[i, j, k]];
                    write!(
                        f,
                        "\n{}{:12.3}  {:>10}{:>10}j",
                        indent,
                        w,
                        format_g(z.re, 4),
                        format_g_signed(z.im, 4)
                    )?;
                }
            }
        }
        Ok(())
    }
}

impl FrequencyResponseData {
    /// Loadable text representation
    ///
    /// Frequencies and response values are written exactly, so parsing the
    /// text back with [`FromStr`] reproduces them bit for bit. Smooth data
    /// is refitted on load.
    pub fn to_repr(&self) -> String {
        let rows: Vec<String> = (0..self.noutputs())
            .map(|i| {
                let cols: Vec<String> = (0..self.ninputs())
                    .map(|j| {
                        let values: Vec<String> = (0..self.nfreq())
                            .map(|k| complex_literal(self.fresp[[i, j, k]]))
                            .collect();
                        format!("[{}]", values.join(", "))
                    })
                    .collect();
                format!("[{}]", cols.join(", "))
            })
            .collect();
        let omega: Vec<String> = self.omega.iter().map(|&w| float_literal(w)).collect();

        let outputs = if is_default_labels(&self.output_labels, "y") {
            self.noutputs().to_string()
        } else {
            label_list(&self.output_labels)
        };
        let inputs = if is_default_labels(&self.input_labels, "u") {
            self.ninputs().to_string()
        } else {
            label_list(&self.input_labels)
        };
        let dt = match self.dt {
            Timebase::Unspecified => String::new(),
            Timebase::Continuous => ", dt=0".to_string(),
            Timebase::Discrete => ", dt=True".to_string(),
            Timebase::Sampled(dt) => format!(", dt={}", float_literal(dt)),
        };

        format!(
            "FrequencyResponseData(\n[{}],\n[{}],{}\nname={}, outputs={}, inputs={}{})",
            rows.join(", "),
            omega.join(", "),
            if self.is_smooth() { " smooth=True," } else { "" },
            quoted(&self.name),
            outputs,
            inputs,
            dt
        )
    }
}

/// Parsed value in the representation text
#[derive(Debug, Clone, PartialEq)]
enum Node {
    List(Vec<Node>),
    Atom(String),
    /// Quoted string with escapes resolved
    Str(String),
}

struct ReprParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> ReprParser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn error(&self, what: &str) -> FrdError {
        FrdError::Construction(format!(
            "invalid representation at offset {}: {}",
            self.pos, what
        ))
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.rest().chars().next()
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", token)))
        }
    }

    fn node(&mut self) -> Result<Node> {
        match self.peek() {
            Some('[') => {
                self.pos += 1;
                let mut items = Vec::new();
                if self.peek() == Some(']') {
                    self.pos += 1;
                    return Ok(Node::List(items));
                }
                loop {
                    items.push(self.node()?);
                    match self.peek() {
                        Some(',') => self.pos += 1,
                        Some(']') => {
                            self.pos += 1;
                            return Ok(Node::List(items));
                        }
                        _ => return Err(self.error("expected ',' or ']'")),
                    }
                }
            }
            Some(quote @ ('\'' | '"')) => {
                self.pos += 1;
                let mut text = String::new();
                let mut chars = self.rest().char_indices();
                loop {
                    match chars.next() {
                        Some((i, c)) if c == quote => {
                            self.pos += i + 1;
                            return Ok(Node::Str(text));
                        }
                        Some((_, '\\')) => match chars.next() {
                            Some((_, escaped)) => text.push(escaped),
                            None => return Err(self.error("unterminated string")),
                        },
                        Some((_, c)) => text.push(c),
                        None => return Err(self.error("unterminated string")),
                    }
                }
            }
            Some(_) => {
                let end = self
                    .rest()
                    .find(|c: char| c == ',' || c == ']' || c == ')' || c.is_whitespace())
                    .unwrap_or(self.rest().len());
                if end == 0 {
                    return Err(self.error("expected a value"));
                }
                let text = self.rest()[..end].to_string();
                self.pos += end;
                Ok(Node::Atom(text))
            }
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn identifier(&mut self) -> Result<String> {
        self.skip_ws();
        let end = self
            .rest()
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(self.rest().len());
        if end == 0 {
            return Err(self.error("expected a keyword"));
        }
        let ident = self.rest()[..end].to_string();
        self.pos += end;
        Ok(ident)
    }
}

fn parse_complex(text: &str) -> Result<Complex64> {
    let bad = || FrdError::Construction(format!("invalid complex value '{}'", text));
    let parse = |s: &str| s.parse::<f64>().map_err(|_| bad());

    let Some(body) = text.strip_suffix('j') else {
        return Ok(Complex64::new(parse(text)?, 0.0));
    };
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&i| (bytes[i] == b'+' || bytes[i] == b'-') && !matches!(bytes[i - 1], b'e' | b'E'));
    match split {
        Some(i) => Ok(Complex64::new(parse(&body[..i])?, parse(&body[i..])?)),
        None => Ok(Complex64::new(0.0, parse(body)?)),
    }
}

fn tensor_from_node(node: &Node) -> Result<Array3<Complex64>> {
    let bad = |what: &str| FrdError::Construction(format!("invalid response tensor: {}", what));
    let as_list = |n: &Node| match n {
        Node::List(items) => Ok(items.clone()),
        Node::Atom(_) | Node::Str(_) => Err(bad("expected a nested list of depth 3")),
    };

    let rows = as_list(node)?;
    let mut values = Vec::new();
    let mut shape: Option<(usize, usize)> = None;
    for row in &rows {
        let cols = as_list(row)?;
        for col in &cols {
            let entries = as_list(col)?;
            let dims = (cols.len(), entries.len());
            if *shape.get_or_insert(dims) != dims {
                return Err(bad("ragged nested list"));
            }
            for entry in &entries {
                match entry {
                    Node::Atom(text) => values.push(parse_complex(text)?),
                    Node::Str(_) => return Err(bad("quoted string in response")),
                    Node::List(_) => return Err(bad("nested list deeper than 3")),
                }
            }
        }
    }
    let (m, n) = shape.unwrap_or((0, 0));
    Array3::from_shape_vec((rows.len(), m, n), values).map_err(|e| bad(&e.to_string()))
}

fn option_value(node: &Node) -> Result<OptionValue> {
    match node {
        Node::List(items) => items
            .iter()
            .map(|item| match item {
                Node::Str(text) => Ok(text.clone()),
                _ => Err(FrdError::Construction(
                    "signal lists must contain quoted names".to_string(),
                )),
            })
            .collect::<Result<Vec<_>>>()
            .map(OptionValue::List),
        Node::Atom(text) => Ok(match text.as_str() {
            "None" => OptionValue::None,
            "True" => OptionValue::Bool(true),
            "False" => OptionValue::Bool(false),
            number => match number.parse::<i64>() {
                Ok(n) => OptionValue::Int(n),
                Err(_) => OptionValue::Float(number.parse::<f64>().map_err(|_| {
                    FrdError::Construction(format!("invalid keyword value '{}'", number))
                })?),
            },
        }),
        Node::Str(text) => Ok(OptionValue::Str(text.clone())),
    }
}

impl FromStr for FrequencyResponseData {
    type Err = FrdError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parser = ReprParser::new(s);
        parser.expect("FrequencyResponseData(")?;
        let fresp = tensor_from_node(&parser.node()?)?;
        parser.expect(",")?;

        let omega = match parser.node()? {
            Node::List(items) => items
                .iter()
                .map(|item| match item {
                    Node::Atom(text) => text.parse::<f64>().map_err(|_| {
                        FrdError::Construction(format!("invalid frequency '{}'", text))
                    }),
                    Node::List(_) | Node::Str(_) => Err(FrdError::Construction(
                        "frequency vector must be 1-d".to_string(),
                    )),
                })
                .collect::<Result<Vec<f64>>>()?,
            Node::Atom(_) | Node::Str(_) => {
                return Err(FrdError::Construction(
                    "frequency vector must be a list".to_string(),
                ))
            }
        };

        let mut keywords = Vec::new();
        loop {
            match parser.peek() {
                Some(',') => parser.pos += 1,
                Some(')') => break,
                _ => return Err(parser.error("expected ',' or ')'")),
            }
            if parser.peek() == Some(')') {
                break;
            }
            let key = parser.identifier()?;
            parser.expect("=")?;
            keywords.push((key, option_value(&parser.node()?)?));
        }
        parser.expect(")")?;
        parser.skip_ws();
        if !parser.rest().is_empty() {
            return Err(parser.error("trailing characters"));
        }

        let opts = FrdOptions::from_keywords(keywords.iter().map(|(k, v)| (k.as_str(), v.clone())))?;
        FrequencyResponseData::with_options(fresp, &omega, opts)
    }
}
