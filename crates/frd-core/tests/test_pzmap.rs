//! Pole/Zero Map Tests
//!
//! Roots of the nested PVTOL loop transfer function, in continuous and
//! discrete time.

use frd_core::pzmap::{plot_grid, pole_zero_map, pole_zero_map_list, PlotGrid};
use frd_core::{Timebase, TransferFunction};
use num_complex::Complex64;

fn pvtol(dt: Timebase) -> TransferFunction {
    TransferFunction::new(
        &[
            -9.0250000e-01,
            -4.7200750e+01,
            -8.6812900e+02,
            5.6261850e+03,
            2.1258472e+05,
            8.4724600e+05,
            1.0192000e+06,
            2.3520000e+05,
        ],
        &[
            9.02500000e-03,
            9.92862812e-01,
            4.96974094e+01,
            1.35705659e+03,
            2.09294163e+04,
            1.64898435e+05,
            6.54572220e+05,
            1.25274600e+06,
            1.02420000e+06,
            2.35200000e+05,
        ],
    )
    .unwrap()
    .with_dt(dt)
}

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Every reference root has a computed root within `rtol` of it, and the counts agree
fn assert_roots_close(actual: &[Complex64], expected: &[Complex64], rtol: f64) {
    assert_eq!(actual.len(), expected.len());
    for r in expected {
        let nearest = actual
            .iter()
            .map(|a| (a - r).norm())
            .fold(f64::INFINITY, f64::min);
        assert!(
            nearest <= rtol * r.norm(),
            "no root near {} (closest at distance {})",
            r,
            nearest
        );
    }
}

fn reference_poles() -> Vec<Complex64> {
    vec![
        c(-23.8877, 19.3837),
        c(-23.8877, -19.3837),
        c(-23.8349, 15.7846),
        c(-23.8349, -15.7846),
        c(-5.2320, 0.4117),
        c(-5.2320, -0.4117),
        c(-2.2246, 0.0),
        c(-1.5160, 0.0),
        c(-0.3627, 0.0),
    ]
}

fn reference_zeros() -> Vec<Complex64> {
    vec![
        c(-23.8877, 19.3837),
        c(-23.8877, -19.3837),
        c(14.3637, 0.0),
        c(-14.3637, 0.0),
        c(-2.2246, 0.0),
        c(-2.0, 0.0),
        c(-0.3, 0.0),
    ]
}

#[test]
fn test_pzmap_continuous() {
    let data = pole_zero_map(&pvtol(Timebase::Continuous)).unwrap();
    let (p, z) = data.as_legacy_tuple();
    assert_roots_close(p, &reference_poles(), 1e-3);
    assert_roots_close(z, &reference_zeros(), 1e-3);
    assert_eq!(data.dt, Timebase::Continuous);
}

#[test]
fn test_pzmap_discrete() {
    let data = pole_zero_map(&pvtol(Timebase::Sampled(1.0))).unwrap();
    assert_roots_close(&data.poles, &reference_poles(), 1e-3);
    assert_roots_close(&data.zeros, &reference_zeros(), 1e-3);
    assert_eq!(plot_grid(&[data]).unwrap(), PlotGrid::ZPlane);
}

#[test]
fn test_pzmap_list_grid() {
    let s = pvtol(Timebase::Continuous);
    let z = pvtol(Timebase::Sampled(1.0));
    let maps = pole_zero_map_list(&[&s, &s]).unwrap();
    assert_eq!(maps.len(), 2);
    assert_eq!(plot_grid(&maps).unwrap(), PlotGrid::SPlane);

    let mixed = pole_zero_map_list(&[&s, &z]).unwrap();
    assert!(plot_grid(&mixed).is_err());
}
