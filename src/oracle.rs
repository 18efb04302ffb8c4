//! Reference implementation of axis reversal.
//!
//! Built only on ndarray's stride manipulation, so it shares nothing with the
//! block-copy kernels in [crate::ops::flip].
use crate::axes::AxisSpec;
use crate::ndarray_ext::{NdArray, NdArrayView};
use crate::Float;
use ndarray::Axis;

/// Returns `x` reversed along exactly the axes in `axes`.
///
/// `axes` must be valid for `x`'s rank (see `AxisSpec::for_rank`).
pub fn reference_flip<T: Float>(x: &NdArrayView<T>, axes: &AxisSpec) -> NdArray<T> {
    let mut v = x.view();
    for &axis in axes.as_slice() {
        v.invert_axis(Axis(axis));
    }
    v.as_standard_layout().into_owned()
}

/// `reference_flip` along the last axis. Rank-0 input is returned unchanged.
pub fn reference_flip_last<T: Float>(x: &NdArrayView<T>) -> NdArray<T> {
    let mut v = x.view();
    if let Some(last) = v.ndim().checked_sub(1) {
        v.invert_axis(Axis(last));
    }
    v.as_standard_layout().into_owned()
}
