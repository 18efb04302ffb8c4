//! Defining things related to `flipcheck::op::Op`.
//!
//! # Implementing operations
//!
//! The `Flip` operator in [crate::ops] is the one the checker exercises, but any
//! type implementing `Op` can be run with [run_op].
//!
//! ```
//! use flipcheck as fc;
//! use fc::op::{ComputeContext, Op, OpError};
//!
//! // Doubles every element.
//! struct Double;
//!
//! impl<T: fc::Float> Op<T> for Double {
//!     fn compute(&self, ctx: &mut ComputeContext<T>) -> Result<(), OpError> {
//!         let x = ctx.input(0);
//!         let two = T::from(2.).unwrap();
//!         ctx.append_output(x.mapv(move |a| a * two));
//!         Ok(())
//!     }
//! }
//!
//! let x = fc::ndarray::arr1(&[1f32, 2.]).into_dyn();
//! let ys = fc::op::run_op(&Double, &[x.view()]).unwrap();
//! assert_eq!(ys[0], fc::ndarray::arr1(&[2f32, 4.]).into_dyn());
//! ```
use std::any::type_name;
use std::fmt;

use crate::ndarray_ext::{NdArray, NdArrayView};
use crate::smallvec::SmallVec;
use crate::Float;

// Flip has exactly one input and one output; a little headroom for other ops.
pub(crate) const NUM_MAX_OUTPUT: usize = 2;
pub(crate) const NUM_MAX_INPUT: usize = 2;

pub(crate) type InputArray<T> = SmallVec<[T; NUM_MAX_INPUT]>;
pub(crate) type OutputArray<T> = SmallVec<[T; NUM_MAX_OUTPUT]>;

/// Error in `Op`'s computation.
#[derive(Clone, Debug, PartialEq)]
pub enum OpError {
    NdArrayError(String, ndarray::ShapeError),
    IncompatibleShape(String),
    InvalidDims(String),
    OutOfBounds(String),
}

impl std::error::Error for OpError {}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OpError::NdArrayError(pref, e) => write!(f, "{}: ", pref).and_then(|()| e.fmt(f)),
            OpError::IncompatibleShape(s) => write!(f, "incompatible shape: {}", s),
            OpError::InvalidDims(s) => write!(f, "invalid dims: {}", s),
            OpError::OutOfBounds(s) => write!(f, "out of bounds: {}", s),
        }
    }
}

/// Trait for tensor operations.
pub trait Op<F: Float> {
    /// Name of this op
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }

    /// Runs this op with `ComputeContext`.
    fn compute(&self, ctx: &mut ComputeContext<F>) -> Result<(), OpError>;
}

/// Context of an `Op`'s computation phase.
pub struct ComputeContext<'v, T: Float> {
    // Input arrays
    xs: InputArray<Option<NdArrayView<'v, T>>>,
    // Output arrays
    pub(crate) ys: OutputArray<NdArray<T>>,
}

impl<'v, T: Float> ComputeContext<'v, T> {
    #[inline]
    pub(crate) fn new(xs: InputArray<Option<NdArrayView<'v, T>>>) -> Self {
        ComputeContext {
            xs,
            ys: OutputArray::new(),
        }
    }

    /// Grabs the `i` th input array as a read-only array view.
    ///
    /// Calling `input(i)` more than once causes panic.
    #[inline]
    pub fn input(&mut self, i: usize) -> NdArrayView<'v, T> {
        let x = match self.xs.get_mut(i) {
            Some(x) => x,
            None => panic!("Bad op impl: input index out of range."),
        };
        match x.take() {
            Some(ret) => ret,
            None => panic!("Bad op impl: input({}) cannot be called twice", i),
        }
    }

    /// Appends an ndarray to the back of the output list of the current op.
    ///
    /// NOTE: Implementor of `Op::compute` must call this as many times as the number of its outputs.
    #[inline]
    pub fn append_output(&mut self, y: NdArray<T>) {
        self.ys.push(y);
    }

    /// Returns a number of input arrays.
    #[inline]
    pub fn num_inputs(&self) -> usize {
        self.xs.len()
    }
}

/// Runs `op` on `xs` and returns its outputs.
pub fn run_op<T, O>(op: &O, xs: &[NdArrayView<T>]) -> Result<Vec<NdArray<T>>, OpError>
where
    T: Float,
    O: Op<T> + ?Sized,
{
    let inputs = xs.iter().map(|x| Some(x.view())).collect::<InputArray<_>>();
    let mut ctx = ComputeContext::new(inputs);
    op.compute(&mut ctx)?;
    if ctx.ys.is_empty() {
        return Err(OpError::InvalidDims(format!(
            "{} produced no output",
            op.name()
        )));
    }
    Ok(ctx.ys.into_iter().collect())
}
