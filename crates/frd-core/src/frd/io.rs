//! Tabular export
//!
//! One row per frequency, one column per (output, input) channel labelled
//! `H_{<output>, <input>}`.

use std::path::Path;

use anyhow::{Context, Result};
use num_complex::Complex64;

use super::core::FrequencyResponseData;

/// Frequency response as labelled columns
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTable {
    /// Frequencies (first column, labelled `omega`)
    pub omega: Vec<f64>,
    /// Channel labels, output-major
    pub labels: Vec<String>,
    /// Channel columns, parallel to `labels`
    pub columns: Vec<Vec<Complex64>>,
}

impl ResponseTable {
    /// Number of rows (frequencies)
    pub fn nrows(&self) -> usize {
        self.omega.len()
    }

    /// Column with the given label
    pub fn column(&self, label: &str) -> Option<&[Complex64]> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|k| self.columns[k].as_slice())
    }

    /// Comma-separated text with a header row
    ///
    /// Complex values are written as `re+imj`.
    pub fn to_csv_string(&self) -> String {
        let mut header = vec!["omega".to_string()];
        header.extend(self.labels.iter().map(|l| csv_field(l)));

        let mut lines = vec![header.join(",")];
        for (k, w) in self.omega.iter().enumerate() {
            let mut row = vec![w.to_string()];
            row.extend(self.columns.iter().map(|col| {
                let z = col[k];
                format!("{}{}{}j", z.re, if z.im.is_sign_negative() { "" } else { "+" }, z.im)
            }));
            lines.push(row.join(","));
        }
        lines.join("\n") + "\n"
    }
}

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

impl FrequencyResponseData {
    /// Convert to a labelled table
    pub fn to_table(&self) -> ResponseTable {
        let mut labels = Vec::with_capacity(self.noutputs() * self.ninputs());
        let mut columns = Vec::with_capacity(labels.capacity());
        for (i, out) in self.output_labels.iter().enumerate() {
            for (j, inp) in self.input_labels.iter().enumerate() {
                labels.push(format!("H_{{{}, {}}}", out, inp));
                columns.push(self.fresp.slice(ndarray::s![i, j, ..]).to_vec());
            }
        }
        ResponseTable {
            omega: self.omega.to_vec(),
            labels,
            columns,
        }
    }

    /// Write the table as CSV
    ///
    /// # Example
    /// ```ignore
    /// sys.write_csv("response.csv")?;
    /// ```
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_table().to_csv_string())
            .with_context(|| format!("failed to write frequency response to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frd::FrdOptions;
    use ndarray::Array3;

    #[test]
    fn test_to_table() {
        let fresp = Array3::from_shape_fn((2, 1, 2), |(i, _, k)| Complex64::new((i * 10 + k) as f64, -1.0));
        let sys = FrequencyResponseData::with_options(
            fresp,
            &[1.0, 2.0],
            FrdOptions::new().outputs(&["a", "b"][..]),
        )
        .unwrap();
        let table = sys.to_table();
        assert_eq!(table.nrows(), 2);
        assert_eq!(table.labels, vec!["H_{a, u[0]}", "H_{b, u[0]}"]);
        assert_eq!(table.column("H_{b, u[0]}").unwrap()[1], Complex64::new(11.0, -1.0));
        assert!(table.column("missing").is_none());
    }

    #[test]
    fn test_csv() {
        let sys = FrequencyResponseData::siso(
            &[Complex64::new(1.0, 0.5), Complex64::new(2.0, -0.5)],
            &[0.5, 1.0],
        )
        .unwrap();
        let csv = sys.to_table().to_csv_string();
        assert_eq!(csv, "omega,\"H_{y[0], u[0]}\"\n0.5,1+0.5j\n1,2-0.5j\n");

        let path = std::env::temp_dir().join(format!("frd_core_csv_{}.csv", std::process::id()));
        sys.write_csv(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), csv);
        let _ = std::fs::remove_file(&path);
    }
}
