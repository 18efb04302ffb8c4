use crate::axes::AxisSpec;
use crate::ndarray_ext::NdArray;
use crate::op::{self, OpError};
use crate::Float;
use rayon::prelude::*;

// Below this many blocks per rayon task, splitting costs more than copying.
const MIN_BLOCKS_PER_TASK: usize = 64;

/// How `Flip` copies blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kernel {
    Sequential,
    Parallel,
}

/// Reverses the input along `axes`.
///
/// `axes == None` reverses the last axis.
pub struct Flip {
    pub axes: Option<Vec<usize>>,
    pub kernel: Kernel,
}

impl Flip {
    pub fn new(axes: Option<Vec<usize>>) -> Self {
        Flip {
            axes,
            kernel: Kernel::Sequential,
        }
    }

    pub fn parallel(axes: Option<Vec<usize>>) -> Self {
        Flip {
            axes,
            kernel: Kernel::Parallel,
        }
    }
}

/// Validates `axes` against an array of rank `rank`.
fn resolve_axes(axes: Option<&[usize]>, rank: usize) -> Result<AxisSpec, OpError> {
    let axes = match axes {
        Some(axes) => axes.to_vec(),
        None if rank == 0 => {
            return Err(OpError::OutOfBounds(
                "flip: a rank-0 array has no last axis".to_string(),
            ))
        }
        None => vec![rank - 1],
    };
    if let Some(a) = axes.iter().find(|&&a| a >= rank) {
        return Err(OpError::OutOfBounds(format!(
            "flip: axis {} for an array of rank {}",
            a, rank
        )));
    }
    AxisSpec::new(axes).map_err(|e| OpError::InvalidDims(format!("flip: {}", e)))
}

/// Shape of `Flip`'s output for an input of shape `shape`.
///
/// Fails when `axes` is invalid for that shape.
pub fn infer_flip_shape(shape: &[usize], axes: Option<&[usize]>) -> Result<Vec<usize>, OpError> {
    resolve_axes(axes, shape.len())?;
    Ok(shape.to_vec())
}

/// `(stride, blocksize)` for reversing the axes `first..=last` of `shape` jointly.
///
/// Within every chunk of `stride` elements, the blocks of `blocksize`
/// elements appear in reverse order in the output.
#[inline]
fn run_geometry(shape: &[usize], first: usize, last: usize) -> (usize, usize) {
    let blocksize = shape[last + 1..].iter().product();
    let stride = shape[first..].iter().product();
    (stride, blocksize)
}

fn flip_run_sequential<T: Copy>(src: &[T], dst: &mut [T], stride: usize, blocksize: usize) {
    for (from, to) in src.chunks(stride).zip(dst.chunks_mut(stride)) {
        if blocksize > 1 {
            for (d, s) in to.chunks_mut(blocksize).zip(from.chunks(blocksize).rev()) {
                d.copy_from_slice(s);
            }
        } else {
            for (d, s) in to.iter_mut().zip(from.iter().rev()) {
                *d = *s;
            }
        }
    }
}

fn flip_run_parallel<T: Copy + Send + Sync>(
    src: &[T],
    dst: &mut [T],
    stride: usize,
    blocksize: usize,
) {
    let nblocks = stride / blocksize;
    dst.par_chunks_mut(blocksize)
        .enumerate()
        .with_min_len(MIN_BLOCKS_PER_TASK)
        .for_each(|(j, to)| {
            let (outer, i) = (j / nblocks, j % nblocks);
            let k = outer * nblocks + (nblocks - 1 - i);
            to.copy_from_slice(&src[k * blocksize..(k + 1) * blocksize]);
        });
}

impl<T: Float> op::Op<T> for Flip {
    fn name(&self) -> &'static str {
        "Flip"
    }

    fn compute(&self, ctx: &mut op::ComputeContext<T>) -> Result<(), OpError> {
        let x = ctx.input(0);
        let shape = x.shape().to_vec();
        let spec = resolve_axes(self.axes.as_deref(), shape.len())?;

        let x = x.as_standard_layout();
        let mut buf = match x.as_slice() {
            Some(src) => src.to_vec(),
            None => {
                return Err(OpError::IncompatibleShape(
                    "flip: input is not contiguous".to_string(),
                ))
            }
        };

        // Zero-sized arrays have nothing to move.
        if !buf.is_empty() {
            let mut tmp = vec![T::zero(); buf.len()];
            for (first, last) in spec.contiguous_runs() {
                let (stride, blocksize) = run_geometry(&shape, first, last);
                match self.kernel {
                    Kernel::Sequential => flip_run_sequential(&buf, &mut tmp, stride, blocksize),
                    Kernel::Parallel => flip_run_parallel(&buf, &mut tmp, stride, blocksize),
                }
                std::mem::swap(&mut buf, &mut tmp);
            }
        }

        let y = NdArray::from_shape_vec(ndarray::IxDyn(&shape), buf)
            .map_err(|e| OpError::NdArrayError("flip".to_string(), e))?;
        ctx.append_output(y);
        Ok(())
    }
}
