//! Pole/zero maps
//!
//! Pole and zero locations of analytic models, packaged for plotting.
//! Root-locus data (`gains`, `loci`) is carried when supplied but never
//! computed here.

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{FrdError, Result};
use crate::lti::{LtiSystem, StateSpace, TransferFunction};
use crate::timebase::Timebase;

/// Poles, zeros and plot metadata of one system
#[derive(Debug, Clone, PartialEq)]
pub struct PoleZeroData {
    pub poles: Vec<Complex64>,
    pub zeros: Vec<Complex64>,
    /// Root-locus gains
    pub gains: Option<Vec<f64>>,
    /// Root-locus traces, `[ngains, norder]`
    pub loci: Option<Array2<Complex64>>,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub dt: Timebase,
    pub sysname: Option<String>,
}

impl PoleZeroData {
    pub fn new(poles: Vec<Complex64>, zeros: Vec<Complex64>) -> Self {
        Self {
            poles,
            zeros,
            gains: None,
            loci: None,
            xlim: None,
            ylim: None,
            dt: Timebase::Unspecified,
            sysname: None,
        }
    }

    /// `(poles, zeros)`
    pub fn as_legacy_tuple(&self) -> (&[Complex64], &[Complex64]) {
        (&self.poles, &self.zeros)
    }
}

/// Models whose poles and zeros can be computed
pub trait PoleZeroSource {
    fn system_poles(&self) -> Result<Vec<Complex64>>;
    fn system_zeros(&self) -> Result<Vec<Complex64>>;
    fn system_timebase(&self) -> Timebase;
    fn system_name(&self) -> Option<String>;
}

impl PoleZeroSource for TransferFunction {
    fn system_poles(&self) -> Result<Vec<Complex64>> {
        Ok(self.poles())
    }

    fn system_zeros(&self) -> Result<Vec<Complex64>> {
        Ok(self.zeros())
    }

    fn system_timebase(&self) -> Timebase {
        self.timebase()
    }

    fn system_name(&self) -> Option<String> {
        self.name().map(str::to_string)
    }
}

impl PoleZeroSource for StateSpace {
    fn system_poles(&self) -> Result<Vec<Complex64>> {
        self.poles()
    }

    fn system_zeros(&self) -> Result<Vec<Complex64>> {
        self.zeros()
    }

    fn system_timebase(&self) -> Timebase {
        self.timebase()
    }

    fn system_name(&self) -> Option<String> {
        self.name().map(str::to_string)
    }
}

/// Poles and zeros of a system
pub fn pole_zero_map(sys: &dyn PoleZeroSource) -> Result<PoleZeroData> {
    let mut data = PoleZeroData::new(sys.system_poles()?, sys.system_zeros()?);
    data.dt = sys.system_timebase();
    data.sysname = sys.system_name();
    Ok(data)
}

/// Poles and zeros of several systems
pub fn pole_zero_map_list(systems: &[&dyn PoleZeroSource]) -> Result<Vec<PoleZeroData>> {
    systems.iter().map(|sys| pole_zero_map(*sys)).collect()
}

/// Background grid for a pole/zero plot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotGrid {
    /// Damping/natural-frequency grid in the s-plane
    SPlane,
    /// Damping/natural-frequency grid inside the unit circle
    ZPlane,
}

/// Choose the grid for a set of maps; continuous and discrete maps can't share one
pub fn plot_grid(data: &[PoleZeroData]) -> Result<PlotGrid> {
    if data.iter().all(|d| d.dt.is_continuous()) {
        Ok(PlotGrid::SPlane)
    } else if data.iter().all(|d| d.dt.is_discrete()) {
        Ok(PlotGrid::ZPlane)
    } else {
        Err(FrdError::Domain(
            "incompatible time bases; don't know how to grid".to_string(),
        ))
    }
}

/// Union of the axis limits carried by the maps
pub fn plot_limits(data: &[PoleZeroData]) -> (Option<(f64, f64)>, Option<(f64, f64)>) {
    let merge = |acc: Option<(f64, f64)>, lim: Option<(f64, f64)>| match (acc, lim) {
        (Some(a), Some(b)) => Some((a.0.min(b.0), a.1.max(b.1))),
        (a, b) => a.or(b),
    };
    data.iter().fold((None, None), |(x, y), d| {
        (merge(x, d.xlim), merge(y, d.ylim))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_transfer_function_map() {
        let h = TransferFunction::new(&[1.0, 2.0], &[1.0, 3.0, 2.0])
            .unwrap()
            .with_name("h");
        let data = pole_zero_map(&h).unwrap();
        assert_eq!(data.poles.len(), 2);
        assert_eq!(data.zeros.len(), 1);
        assert_eq!(data.sysname.as_deref(), Some("h"));
        let (p, z) = data.as_legacy_tuple();
        assert_eq!(p, data.poles.as_slice());
        assert_eq!(z, data.zeros.as_slice());
    }

    #[test]
    fn test_state_space_map() {
        let ss = StateSpace::new(
            array![[-1.0, 0.0], [0.0, -2.0]],
            array![[1.0], [1.0]],
            array![[1.0, 1.0]],
            array![[0.0]],
        )
        .unwrap();
        let data = pole_zero_map(&ss).unwrap();
        let mut poles: Vec<f64> = data.poles.iter().map(|p| p.re).collect();
        poles.sort_by(|a, b| a.total_cmp(b));
        assert!((poles[0] + 2.0).abs() < 1e-12);
        assert!((poles[1] + 1.0).abs() < 1e-12);
        // (2s + 3) / ((s + 1)(s + 2))
        assert_eq!(data.zeros.len(), 1);
        assert!((data.zeros[0].re + 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_plot_grid() {
        let c = TransferFunction::gain(1.0).with_dt(Timebase::Continuous);
        let d = TransferFunction::gain(1.0).with_dt(Timebase::Sampled(0.1));
        let maps = pole_zero_map_list(&[&c, &d]).unwrap();
        let err = plot_grid(&maps).unwrap_err();
        assert!(err.to_string().contains("incompatible time bases"));
        assert_eq!(plot_grid(&maps[..1]).unwrap(), PlotGrid::SPlane);
        assert_eq!(plot_grid(&maps[1..]).unwrap(), PlotGrid::ZPlane);
    }

    #[test]
    fn test_plot_limits() {
        let mut a = PoleZeroData::new(vec![], vec![]);
        a.xlim = Some((-1.0, 1.0));
        let mut b = PoleZeroData::new(vec![], vec![]);
        b.xlim = Some((-2.0, 0.5));
        b.ylim = Some((-1.3, 1.3));
        assert_eq!(plot_limits(&[a, b]), (Some((-2.0, 1.0)), Some((-1.3, 1.3))));
    }
}
