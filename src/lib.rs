//! Tensor `Flip` operator together with a randomized conformance checker.
//!
//! The checker generates random input arrays from a declarative case table,
//! runs the operator through one of its engines, computes the expected output
//! with an independent reference implementation and compares the two.
//!
//! ```
//! use flipcheck::{CheckConfig, Checker};
//!
//! let checker = Checker::new(CheckConfig::default()).unwrap();
//! let report = checker.run();
//! assert!(report.passed());
//! ```
#[macro_use]
extern crate serde_derive;

pub extern crate ndarray;
pub(crate) extern crate rustc_hash;
pub(crate) extern crate smallvec;

#[macro_use]
#[doc(hidden)]
pub mod test_helper;

pub mod axes;
pub mod cases;
pub mod checker;
pub mod compare;
pub mod config;
pub mod errors;
pub mod ndarray_ext;
pub mod op;
pub mod ops;
pub mod oracle;

use std::fmt;

pub(crate) type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

pub use crate::axes::{AxisArg, AxisSpec};
pub use crate::cases::{Case, CaseGenerator, Strategy};
pub use crate::checker::{Checker, Outcome, Report};
pub use crate::compare::{compare, compare_exact, Tolerance, Verdict};
pub use crate::config::CheckConfig;
pub use crate::errors::CheckError;
pub use crate::ndarray_ext::{ArrayRng, NdArray, NdArrayView};
pub use crate::ops::{create_operator, Argument, Engine, OperatorDef};
pub use crate::oracle::reference_flip;

/// Primitive type of array elements handled by the operators and the checker.
pub trait Float:
    num_traits::Float
    + num_traits::NumAssignOps
    + Copy
    + Send
    + Sync
    + fmt::Display
    + fmt::Debug
    + Sized
    + serde::Serialize
    + serde::de::DeserializeOwned
    + 'static
{
}

impl<T> Float for T where
    T: num_traits::Float
        + num_traits::NumAssignOps
        + Copy
        + Send
        + Sync
        + fmt::Display
        + fmt::Debug
        + Sized
        + serde::Serialize
        + serde::de::DeserializeOwned
        + 'static
{
}
