use crate::axes::AxisSpec;
use crate::compare::{compare, Tolerance};
use crate::ndarray_ext::NdArray;
use crate::op::run_op;
use crate::ops::{create_operator, Argument, Engine, OperatorDef};
use crate::oracle::reference_flip;

/// Checks `Flip` on `x` along `axes` with `engine` against the reference.
///
/// Panics with the verdict if the outputs differ or the operator fails.
pub fn flip_check(x: &NdArray<f32>, axes: &[usize], engine: Engine) -> NdArray<f32> {
    let def = OperatorDef::new("Flip")
        .arg("axes", Argument::Ints(axes.iter().map(|&a| a as i64).collect()))
        .engine(engine);
    let op = create_operator::<f32>(&def).expect("operator creation failed");
    let mut ys = run_op(op.as_ref(), &[x.view()]).expect("flip failed");
    let y = ys.remove(0);

    let spec = AxisSpec::new(axes.to_vec())
        .and_then(|s| s.for_rank(x.ndim()))
        .expect("bad axes");
    let expected = reference_flip(&x.view(), &spec);
    let verdict = compare(&y.view(), &expected.view(), &Tolerance::default())
        .expect("shape mismatch");
    if !verdict.passed {
        panic!(
            "Flip{:?} with engine {} disagrees with the reference: {}",
            axes, engine, verdict
        );
    }
    y
}

#[doc(hidden)]
#[macro_export]
macro_rules! eval_with_time {
  ( $x:expr) => {
    {
      use std::time::Instant;
      let start = Instant::now();
      let result = $x;
      let end = start.elapsed();
      println!("{}.{:03} sec", end.as_secs(), end.subsec_nanos() / 1_000_000);
      result
    }
  };
}
