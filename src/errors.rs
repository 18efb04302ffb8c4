//! Errors raised while building and running conformance checks.
//!
//! Failures inside `Op::compute` are reported with [`crate::op::OpError`] instead.
use crate::ops::Engine;
use std::fmt;

/// Error in case generation, operator construction, configuration or comparison.
#[derive(Clone, Debug, PartialEq)]
pub enum CheckError {
    /// A candidate list of the case table is empty. Holds the list's name.
    EmptyCandidates(String),
    /// Axis indices out of range for the rank, or duplicated.
    InvalidAxes(String),
    /// No operator is registered under this type name.
    UnknownOperator(String),
    /// The operator exists but not for the requested engine.
    EngineUnavailable { op_type: String, engine: Engine },
    /// An operator argument has a bad value.
    InvalidArgument(String),
    /// Operator output and reference output have different shapes.
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    /// Malformed configuration.
    Config(String),
    /// Failure reading a configuration file.
    Io(String),
}

impl CheckError {
    /// True for errors meaning "this case cannot run here" rather than "this case is wrong".
    #[inline]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CheckError::EngineUnavailable { .. })
    }
}

impl std::error::Error for CheckError {}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CheckError::EmptyCandidates(s) => write!(f, "no candidates given for {}", s),
            CheckError::InvalidAxes(s) => write!(f, "invalid axes: {}", s),
            CheckError::UnknownOperator(s) => write!(f, "unknown operator type `{}`", s),
            CheckError::EngineUnavailable { op_type, engine } => write!(
                f,
                "engine `{}` is not available for operator `{}`",
                engine, op_type
            ),
            CheckError::InvalidArgument(s) => write!(f, "invalid argument: {}", s),
            CheckError::ShapeMismatch { expected, actual } => write!(
                f,
                "shape mismatch: expected {:?}, got {:?}",
                expected, actual
            ),
            CheckError::Config(s) => write!(f, "bad config: {}", s),
            CheckError::Io(s) => write!(f, "io error: {}", s),
        }
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(e: serde_json::Error) -> Self {
        CheckError::Config(e.to_string())
    }
}

impl From<std::io::Error> for CheckError {
    fn from(e: std::io::Error) -> Self {
        CheckError::Io(e.to_string())
    }
}
