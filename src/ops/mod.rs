//! Operators and their construction from operator definitions.
//!
//! An [OperatorDef] names an operator type, carries its arguments and selects
//! an [Engine]. [create_operator] turns a definition into a runnable [Op].
//!
//! ```
//! use flipcheck as fc;
//! use fc::ops::{create_operator, Argument, Engine, OperatorDef};
//!
//! let def = OperatorDef::new("Flip")
//!     .arg("axes", Argument::Ints(vec![1]))
//!     .engine(Engine::Default);
//! let op = create_operator::<f32>(&def).unwrap();
//!
//! let x = fc::ndarray::arr2(&[[1f32, 2., 3.]]).into_dyn();
//! let y = fc::op::run_op(op.as_ref(), &[x.view()]).unwrap();
//! assert_eq!(y[0], fc::ndarray::arr2(&[[3f32, 2., 1.]]).into_dyn());
//! ```
use crate::axes::AxisArg;
use crate::errors::CheckError;
use crate::ndarray_ext::{NdArray, NdArrayView};
use crate::op::{self, Op, OpError};
use crate::{Float, FxHashMap};
use std::fmt;

pub mod flip;

pub use self::flip::{infer_flip_shape, Flip, Kernel};

/// Execution strategy requested for an operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// The plain CPU implementation.
    Default,
    /// CPU implementation copying blocks on the rayon thread pool.
    Parallel,
    /// Accelerated implementation; not built into this crate.
    Cudnn,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Default => "default",
            Engine::Parallel => "parallel",
            Engine::Cudnn => "cudnn",
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::Default
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a named operator argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Argument {
    Int(i64),
    Ints(Vec<i64>),
}

impl Argument {
    /// Reads this as a list of non-negative integers; a scalar becomes a one-element list.
    pub fn as_indices(&self, name: &str) -> Result<Vec<usize>, CheckError> {
        let ints = match self {
            Argument::Int(i) => vec![*i],
            Argument::Ints(v) => v.clone(),
        };
        ints.into_iter()
            .map(|i| {
                if i < 0 {
                    Err(CheckError::InvalidArgument(format!(
                        "`{}` has a negative value {}",
                        name, i
                    )))
                } else {
                    Ok(i as usize)
                }
            })
            .collect()
    }
}

impl<'a> From<&'a AxisArg> for Argument {
    fn from(arg: &'a AxisArg) -> Self {
        match arg {
            AxisArg::Scalar(a) => Argument::Int(*a as i64),
            AxisArg::Seq(v) => Argument::Ints(v.iter().map(|&a| a as i64).collect()),
        }
    }
}

/// Declarative description of an operator instance.
#[derive(Clone, Debug, PartialEq)]
pub struct OperatorDef {
    pub op_type: String,
    pub args: FxHashMap<String, Argument>,
    pub engine: Engine,
}

impl OperatorDef {
    pub fn new(op_type: &str) -> Self {
        OperatorDef {
            op_type: op_type.to_string(),
            args: FxHashMap::default(),
            engine: Engine::Default,
        }
    }

    /// Sets the argument `name`.
    pub fn arg(mut self, name: &str, value: Argument) -> Self {
        self.args.insert(name.to_string(), value);
        self
    }

    /// Selects the engine.
    pub fn engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    #[inline]
    pub fn get_arg(&self, name: &str) -> Option<&Argument> {
        self.args.get(name)
    }
}

/// Engines registered for `op_type`, or `None` for an unknown operator type.
pub fn registered_engines(op_type: &str) -> Option<&'static [Engine]> {
    match op_type {
        "Flip" => Some(&[Engine::Default, Engine::Parallel]),
        _ => None,
    }
}

/// Creates the operator described by `def`.
///
/// Fails with `CheckError::EngineUnavailable` when the operator type is known
/// but no implementation is registered for the requested engine.
pub fn create_operator<T: Float>(def: &OperatorDef) -> Result<Box<dyn Op<T>>, CheckError> {
    let engines = registered_engines(&def.op_type)
        .ok_or_else(|| CheckError::UnknownOperator(def.op_type.clone()))?;
    if !engines.contains(&def.engine) {
        return Err(CheckError::EngineUnavailable {
            op_type: def.op_type.clone(),
            engine: def.engine,
        });
    }
    match def.op_type.as_str() {
        "Flip" => {
            let axes = match def.get_arg("axes") {
                Some(arg) => Some(arg.as_indices("axes")?),
                None => None,
            };
            let op = match def.engine {
                Engine::Parallel => Flip::parallel(axes),
                _ => Flip::new(axes),
            };
            Ok(Box::new(op))
        }
        other => Err(CheckError::UnknownOperator(other.to_string())),
    }
}

/// Reverses `x` along `axes` with the default engine; `None` reverses the last axis.
pub fn flip<T: Float>(x: &NdArrayView<T>, axes: Option<&[usize]>) -> Result<NdArray<T>, OpError> {
    let op = Flip::new(axes.map(|a| a.to_vec()));
    let mut ys = op::run_op(&op, &[x.view()])?;
    Ok(ys.remove(0))
}
