//! FRD Feedback Tests
//!
//! Closed loops computed frequency by frequency must match the closed loop
//! formed analytically on the model and then sampled.

use approx::assert_relative_eq;
use frd_core::{
    FrdError, FrdOptions, FrequencyResponseData, LtiSystem, Squeeze, StateSpace, TransferFunction,
};
use ndarray::{array, Array2, Array3};
use num_complex::Complex64;

fn logspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|k| 10f64.powf(a + (b - a) * k as f64 / (n - 1) as f64))
        .collect()
}

fn assert_matches_system(data: &FrequencyResponseData, sys: &dyn LtiSystem, chk: &[f64]) {
    let actual = data.eval(chk, Some(Squeeze::Never)).unwrap();
    let expected = sys.frequency_response_at(chk).unwrap();
    assert_eq!(actual.shape(), expected.shape());
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert_relative_eq!(a.re, e.re, epsilon = 1e-8, max_relative = 1e-6);
        assert_relative_eq!(a.im, e.im, epsilon = 1e-8, max_relative = 1e-6);
    }
}

// ============================================================================
// SISO
// ============================================================================

#[test]
fn test_unity_feedback_matches_transfer_function() {
    let h1 = TransferFunction::new(&[1.0], &[1.0, 2.0, 2.0]).unwrap();
    let omega = [1.0, 10.0, 100.0];
    let f1 = FrequencyResponseData::from_system(&h1, &omega, FrdOptions::new()).unwrap();

    let closed = f1.negative_feedback(1.0).unwrap();
    let expected = h1.feedback(&TransferFunction::gain(1.0), -1.0).unwrap();
    assert_matches_system(&closed, &expected, &omega);

    let explicit = f1.feedback(1.0, -1.0).unwrap();
    assert_eq!(explicit.response(), closed.response());
}

#[test]
fn test_feedback_through_model() {
    let h1 = TransferFunction::new(&[1.0], &[1.0, 2.0, 2.0]).unwrap();
    let h2 = TransferFunction::new(&[1.0], &[0.1, 1.0]).unwrap();
    let omega = logspace(-1.0, 2.0, 10);
    let chk: Vec<f64> = omega.iter().step_by(3).copied().collect();
    let f1 = FrequencyResponseData::from_system(&h1, &omega, FrdOptions::new()).unwrap();

    let closed = f1.negative_feedback(&h2).unwrap();
    assert_matches_system(&closed, &h1.feedback(&h2, -1.0).unwrap(), &chk);
}

#[test]
fn test_positive_feedback() {
    let g = FrequencyResponseData::siso(&[Complex64::new(0.5, 0.0)], &[1.0]).unwrap();
    let closed = g.feedback(1.0, 1.0).unwrap();
    // 0.5 / (1 - 0.5)
    assert_relative_eq!(closed.response()[[0, 0, 0]].re, 1.0, epsilon = 1e-12);
}

// ============================================================================
// MIMO
// ============================================================================

#[test]
fn test_mimo_feedback_matches_state_space() {
    let sys = StateSpace::new(
        array![[-0.5, 0.0], [0.0, -1.0]],
        Array2::eye(2),
        Array2::eye(2),
        Array2::zeros((2, 2)),
    )
    .unwrap();
    let k = array![[0.1, 0.3], [0.0, 1.0]];
    let omega = logspace(-1.0, 2.0, 10);
    let chk: Vec<f64> = omega.iter().step_by(3).copied().collect();

    let f1 = FrequencyResponseData::from_system(&sys, &omega, FrdOptions::new())
        .unwrap()
        .feedback(&k, -1.0)
        .unwrap();
    assert_matches_system(&f1, &sys.feedback(&k, -1.0).unwrap(), &chk);
}

#[test]
fn test_mimo_feedback_non_square() {
    let sys = StateSpace::new(
        array![[-2.0, 0.0, 0.0], [0.0, -1.0, 1.0], [0.0, 0.0, -3.0]],
        array![[1.0, 0.0], [0.0, 0.0], [0.0, 1.0]],
        Array2::eye(3),
        Array2::zeros((3, 2)),
    )
    .unwrap();
    let k = array![[1.0, 0.3, 0.0], [0.1, 0.0, 0.0]];
    let omega = logspace(-1.0, 2.0, 10);
    let chk: Vec<f64> = omega.iter().step_by(3).copied().collect();

    let f1 = FrequencyResponseData::from_system(&sys, &omega, FrdOptions::new())
        .unwrap()
        .feedback(&k, -1.0)
        .unwrap();
    assert_eq!((f1.noutputs(), f1.ninputs()), (3, 2));
    assert_matches_system(&f1, &sys.feedback(&k, -1.0).unwrap(), &chk);
}

#[test]
fn test_feedback_dimension_mismatch() {
    let sys = StateSpace::new(
        array![[-0.5, 0.0], [0.0, -1.0]],
        Array2::eye(2),
        Array2::eye(2),
        Array2::zeros((2, 2)),
    )
    .unwrap();
    let f1 = FrequencyResponseData::from_system(&sys, &[1.0], FrdOptions::new()).unwrap();
    let k = array![[1.0, 0.0, 0.0]];
    assert!(matches!(f1.feedback(&k, -1.0), Err(FrdError::SizeMismatch(_))));
}

#[test]
fn test_singular_loop_reports_frequency() {
    let mut fresp = Array3::<Complex64>::zeros((1, 1, 2));
    fresp[[0, 0, 0]] = Complex64::new(0.5, 0.0);
    fresp[[0, 0, 1]] = Complex64::new(-1.0, 0.0);
    let g = FrequencyResponseData::new(fresp, &[1.0, 2.0]).unwrap();

    let err = g.negative_feedback(1.0).unwrap_err();
    assert!(matches!(err, FrdError::Numeric(_)));
    assert!(err.to_string().contains("2 rad/s"));
}
