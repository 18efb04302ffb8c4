//! Elementwise comparison of operator output against a reference.
use crate::errors::CheckError;
use crate::ndarray_ext::NdArrayView;
use crate::Float;
use ndarray::Dimension;
use std::fmt;

/// Default absolute and relative tolerance.
pub const DEFAULT_THRESHOLD: f64 = 1e-4;

/// Elements `a` (actual) and `e` (expected) match when `|a - e| <= atol + rtol * |e|`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    pub atol: f64,
    pub rtol: f64,
}

impl Tolerance {
    pub fn new(atol: f64, rtol: f64) -> Self {
        Tolerance { atol, rtol }
    }

    /// Zero tolerance.
    pub fn exact() -> Self {
        Tolerance::new(0., 0.)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::new(DEFAULT_THRESHOLD, DEFAULT_THRESHOLD)
    }
}

/// Result of one comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
    pub passed: bool,
    pub max_abs_diff: f64,
    pub max_rel_diff: f64,
    pub num_mismatched: usize,
    pub num_elements: usize,
    /// Multi-index of the first mismatching element in row-major order.
    pub first_mismatch: Option<Vec<usize>>,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.passed {
            write!(
                f,
                "pass ({} elements, max abs diff {:e})",
                self.num_elements, self.max_abs_diff
            )
        } else {
            write!(
                f,
                "fail ({}/{} elements mismatched, first at {:?}, max abs diff {:e}, max rel diff {:e})",
                self.num_mismatched,
                self.num_elements,
                self.first_mismatch.as_deref().unwrap_or(&[]),
                self.max_abs_diff,
                self.max_rel_diff
            )
        }
    }
}

/// Compares `actual` against `expected` within `tol`.
///
/// Different shapes are an error rather than a failing verdict. NaN matches
/// NaN at the same position, and an infinity matches only the same infinity.
pub fn compare<T: Float>(
    actual: &NdArrayView<T>,
    expected: &NdArrayView<T>,
    tol: &Tolerance,
) -> Result<Verdict, CheckError> {
    if actual.shape() != expected.shape() {
        return Err(CheckError::ShapeMismatch {
            expected: expected.shape().to_vec(),
            actual: actual.shape().to_vec(),
        });
    }

    let mut verdict = Verdict {
        passed: true,
        max_abs_diff: 0.,
        max_rel_diff: 0.,
        num_mismatched: 0,
        num_elements: actual.len(),
        first_mismatch: None,
    };
    for ((idx, &a), &e) in actual.indexed_iter().zip(expected.iter()) {
        let a = a.to_f64().unwrap_or(f64::NAN);
        let e = e.to_f64().unwrap_or(f64::NAN);
        if a.is_nan() && e.is_nan() {
            continue;
        }
        let abs = if a == e { 0. } else { (a - e).abs() };
        let abs = if abs.is_nan() { f64::INFINITY } else { abs };
        let rel = if abs == 0. {
            0.
        } else if e == 0. || e.is_infinite() {
            f64::INFINITY
        } else {
            abs / e.abs()
        };
        verdict.max_abs_diff = verdict.max_abs_diff.max(abs);
        verdict.max_rel_diff = verdict.max_rel_diff.max(rel);

        // An infinite expected value is matched only by the same infinity.
        let within = if e.is_infinite() {
            a == e
        } else {
            abs <= tol.atol + tol.rtol * e.abs()
        };
        if !within {
            verdict.passed = false;
            verdict.num_mismatched += 1;
            if verdict.first_mismatch.is_none() {
                verdict.first_mismatch = Some(idx.slice().to_vec());
            }
        }
    }
    Ok(verdict)
}

/// `compare` with zero tolerance.
pub fn compare_exact<T: Float>(
    actual: &NdArrayView<T>,
    expected: &NdArrayView<T>,
) -> Result<Verdict, CheckError> {
    compare(actual, expected, &Tolerance::exact())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn within_tolerance() {
        let a = array![1.0, 2.0, 3.0].into_dyn();
        let b = array![1.0, 2.00001, 3.0].into_dyn();
        let v = compare(&a.view(), &b.view(), &Tolerance::default()).unwrap();
        assert!(v.passed);
        assert!(v.max_abs_diff > 0.);
        assert_eq!(v.num_mismatched, 0);
    }

    #[test]
    fn reports_max_deviation() {
        let a = array![[1.0, 2.0], [3.0, 5.0]].into_dyn();
        let b = array![[1.0, 2.5], [3.0, 4.0]].into_dyn();
        let v = compare(&a.view(), &b.view(), &Tolerance::default()).unwrap();
        assert!(!v.passed);
        assert_eq!(v.num_mismatched, 2);
        assert_eq!(v.first_mismatch, Some(vec![0, 1]));
        assert_eq!(v.max_abs_diff, 1.0);
        assert_eq!(v.max_rel_diff, 0.25);
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let a = array![[1.0, 2.0]].into_dyn();
        let b = array![[1.0], [2.0]].into_dyn();
        match compare(&a.view(), &b.view(), &Tolerance::default()) {
            Err(CheckError::ShapeMismatch { expected, actual }) => {
                assert_eq!(expected, vec![2, 1]);
                assert_eq!(actual, vec![1, 2]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn nan_handling() {
        let a = array![f64::NAN, 1.0].into_dyn();
        let b = array![f64::NAN, 1.0].into_dyn();
        assert!(compare_exact(&a.view(), &b.view()).unwrap().passed);

        let c = array![0.0, 1.0].into_dyn();
        let v = compare(&a.view(), &c.view(), &Tolerance::default()).unwrap();
        assert!(!v.passed);
        assert_eq!(v.max_abs_diff, f64::INFINITY);
    }

    #[test]
    fn exact_rejects_tiny_differences() {
        let a = array![1.0f32, 2.0].into_dyn();
        let b = array![1.0f32, 2.0 + f32::EPSILON * 2.].into_dyn();
        assert!(!compare_exact(&a.view(), &b.view()).unwrap().passed);
        assert!(compare(&a.view(), &b.view(), &Tolerance::default()).unwrap().passed);
    }

    #[test]
    fn infinities_match_only_themselves() {
        let a = array![0.0, 1.0].into_dyn();
        let b = array![f64::INFINITY, f64::NEG_INFINITY].into_dyn();
        let v = compare(&a.view(), &b.view(), &Tolerance::default()).unwrap();
        assert!(!v.passed);
        assert_eq!(v.num_mismatched, 2);
        assert!(!compare_exact(&a.view(), &b.view()).unwrap().passed);

        let c = array![f64::NEG_INFINITY, f64::INFINITY].into_dyn();
        let v = compare(&b.view(), &c.view(), &Tolerance::default()).unwrap();
        assert!(!v.passed);
        assert_eq!(v.first_mismatch, Some(vec![0]));

        let v = compare_exact(&b.view(), &b.view()).unwrap();
        assert!(v.passed);
        assert_eq!(v.max_abs_diff, 0.);
        assert!(compare(&b.view(), &b.view(), &Tolerance::default()).unwrap().passed);
    }
}
