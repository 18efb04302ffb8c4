//! Axis specifications for `Flip`.
use crate::errors::CheckError;
use std::fmt;

/// Axes argument as written in a case table or operator definition.
///
/// A scalar is coerced to a one-element sequence. An absent argument
/// (`Option::None` wherever an `AxisArg` is optional) means "the last axis".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisArg {
    Scalar(usize),
    Seq(Vec<usize>),
}

impl AxisArg {
    /// Coerces this into a plain list of axes, in the order given.
    pub fn to_vec(&self) -> Vec<usize> {
        match self {
            AxisArg::Scalar(a) => vec![*a],
            AxisArg::Seq(v) => v.clone(),
        }
    }
}

impl From<usize> for AxisArg {
    fn from(a: usize) -> Self {
        AxisArg::Scalar(a)
    }
}

impl From<Vec<usize>> for AxisArg {
    fn from(v: Vec<usize>) -> Self {
        AxisArg::Seq(v)
    }
}

/// Ordered set of distinct axes to reverse.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AxisSpec {
    axes: Vec<usize>,
}

impl AxisSpec {
    /// Creates a spec, rejecting duplicated axes.
    pub fn new(axes: Vec<usize>) -> Result<Self, CheckError> {
        for (i, a) in axes.iter().enumerate() {
            if axes[..i].contains(a) {
                return Err(CheckError::InvalidAxes(format!(
                    "axis {} appears more than once in {:?}",
                    a, axes
                )));
            }
        }
        Ok(AxisSpec { axes })
    }

    /// Resolves an optional `AxisArg` for an array of rank `rank`.
    ///
    /// `None` selects the last axis.
    pub fn resolve(arg: Option<&AxisArg>, rank: usize) -> Result<Self, CheckError> {
        let spec = match arg {
            Some(arg) => AxisSpec::new(arg.to_vec())?,
            None => {
                if rank == 0 {
                    return Err(CheckError::InvalidAxes(
                        "a rank-0 array has no last axis".to_string(),
                    ));
                }
                AxisSpec { axes: vec![rank - 1] }
            }
        };
        spec.for_rank(rank)
    }

    /// Checks that every axis is in `0..rank`.
    pub fn for_rank(self, rank: usize) -> Result<Self, CheckError> {
        match self.axes.iter().find(|&&a| a >= rank) {
            Some(a) => Err(CheckError::InvalidAxes(format!(
                "axis {} is out of range for rank {}",
                a, rank
            ))),
            None => Ok(self),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.axes
    }

    /// Groups the axes into maximal runs of consecutive indices, ascending.
    ///
    /// `{3, 0, 1}` gives `[(0, 1), (3, 3)]` as inclusive `(first, last)` pairs.
    pub fn contiguous_runs(&self) -> Vec<(usize, usize)> {
        let mut sorted = self.axes.clone();
        sorted.sort_unstable();
        let mut runs: Vec<(usize, usize)> = Vec::with_capacity(sorted.len());
        for a in sorted {
            match runs.last_mut() {
                Some((_, last)) if *last + 1 == a => *last = a,
                _ => runs.push((a, a)),
            }
        }
        runs
    }
}

impl fmt::Display for AxisSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.axes)
    }
}
