extern crate flipcheck as fc;
extern crate ndarray;

use fc::ops::{self, create_operator, Argument, Engine, OperatorDef};
use fc::op::{run_op, OpError};
use fc::test_helper::flip_check;
use fc::{eval_with_time, ArrayRng, CheckError, NdArray};
use ndarray::{array, s, Axis};

fn flip_with(def: &OperatorDef, x: &NdArray<f32>) -> Result<NdArray<f32>, OpError> {
    let op = create_operator::<f32>(def).unwrap();
    let mut ys = run_op(op.as_ref(), &[x.view()])?;
    Ok(ys.remove(0))
}

fn flip_def(axes: &[i64], engine: Engine) -> OperatorDef {
    OperatorDef::new("Flip")
        .arg("axes", Argument::Ints(axes.to_vec()))
        .engine(engine)
}

#[test]
fn single_row_reversed() {
    let x = array![[1f32, 2., 3.]].into_dyn();
    let y = flip_check(&x, &[1], Engine::Default);
    assert_eq!(y, array![[3f32, 2., 1.]].into_dyn());
}

#[test]
fn rows_reversed_columns_kept() {
    let x = array![[1f32, 2.], [3., 4.], [5., 6.]].into_dyn();
    let y = flip_check(&x, &[0], Engine::Default);
    assert_eq!(y, array![[5f32, 6.], [3., 4.], [1., 2.]].into_dyn());
}

#[test]
fn mirrors_left_right_and_top_bottom() {
    let rng = ArrayRng::<f32>::from_seed(1);
    for &engine in &[Engine::Default, Engine::Parallel] {
        let x = rng.standard_uniform(&[19, 19]);
        let lr = flip_check(&x, &[1], engine);
        let ud = flip_check(&x, &[0], engine);
        for i in 0..19 {
            for j in 0..19 {
                assert_eq!(lr[[i, j].as_slice()], x[[i, 18 - j].as_slice()]);
                assert_eq!(ud[[i, j].as_slice()], x[[18 - i, j].as_slice()]);
            }
        }
    }
}

#[test]
fn flipping_twice_restores_input() {
    let rng = ArrayRng::<f32>::from_seed(2);
    let x = rng.standard_uniform(&[4, 5, 6]);
    for axes in &[vec![0], vec![1, 2], vec![0, 2], vec![0, 1, 2]] {
        let once = flip_check(&x, axes, Engine::Default);
        let twice = flip_check(&once, axes, Engine::Default);
        assert_eq!(twice, x);
        assert_eq!(once.shape(), x.shape());
    }
}

#[test]
fn size_one_axis_is_unchanged() {
    let x = ArrayRng::<f32>::from_seed(3).standard_uniform(&[1, 7]);
    assert_eq!(flip_check(&x, &[0], Engine::Default), x);
    assert_eq!(flip_check(&x, &[0], Engine::Parallel), x);
}

#[test]
fn non_adjacent_axes_match_reference() {
    let rng = ArrayRng::<f32>::from_seed(4);
    let x = rng.standard_uniform(&[2, 3, 4, 5]);
    for &engine in &[Engine::Default, Engine::Parallel] {
        flip_check(&x, &[0, 2], engine);
        flip_check(&x, &[3, 1], engine);
        flip_check(&x, &[0, 1, 3], engine);
    }
}

#[test]
fn engines_agree_bitwise() {
    let rng = ArrayRng::<f32>::from_seed(5);
    let x = rng.standard_uniform(&[3, 64, 17]);
    let cases: [&[i64]; 6] = [&[0], &[1], &[2], &[0, 1], &[1, 2], &[0, 2]];
    for axes in cases.iter() {
        let a = flip_with(&flip_def(axes, Engine::Default), &x).unwrap();
        let b = flip_with(&flip_def(axes, Engine::Parallel), &x).unwrap();
        assert_eq!(a, b, "axes {:?}", axes);
    }
}

#[test]
fn scalar_axes_equals_single_element_sequence() {
    let x = ArrayRng::<f32>::from_seed(6).standard_uniform(&[5, 4]);
    let scalar = OperatorDef::new("Flip").arg("axes", Argument::Int(1));
    let seq = OperatorDef::new("Flip").arg("axes", Argument::Ints(vec![1]));
    assert_eq!(flip_with(&scalar, &x), flip_with(&seq, &x));
}

#[test]
fn missing_axes_flips_last_axis() {
    let x = array![[[1f32, 2.], [3., 4.]]].into_dyn();
    let y = flip_with(&OperatorDef::new("Flip"), &x).unwrap();
    assert_eq!(y, array![[[2f32, 1.], [4., 3.]]].into_dyn());
}

#[test]
fn empty_axes_is_identity() {
    let x = ArrayRng::<f32>::from_seed(7).standard_uniform(&[3, 3]);
    assert_eq!(flip_with(&flip_def(&[], Engine::Default), &x).unwrap(), x);
}

#[test]
fn non_standard_layout_input() {
    let x = ArrayRng::<f32>::from_seed(8).standard_uniform(&[6, 4]);
    let t = x.t().to_owned();
    let y = ops::flip(&t.view(), Some(&[0])).unwrap();
    let mut expected = t.view();
    expected.invert_axis(Axis(0));
    assert_eq!(y, expected.to_owned());

    let strided = x.slice(s![..;2, ..]).into_dyn();
    let y = ops::flip(&strided, Some(&[1])).unwrap();
    assert_eq!(y.shape(), &[3, 4]);
    assert_eq!(y[[1, 0].as_slice()], x[[2, 3].as_slice()]);
}

#[test]
fn zero_sized_input() {
    let x = NdArray::<f32>::zeros(ndarray::IxDyn(&[0, 4]));
    for &engine in &[Engine::Default, Engine::Parallel] {
        let y = flip_with(&flip_def(&[0, 1], engine), &x).unwrap();
        assert_eq!(y.shape(), &[0, 4]);
    }
}

#[test]
fn out_of_range_axis_fails() {
    let x = NdArray::<f32>::zeros(ndarray::IxDyn(&[2, 2]));
    let err = flip_with(&flip_def(&[2], Engine::Default), &x).unwrap_err();
    assert!(matches!(err, OpError::OutOfBounds(_)));
    let err = flip_with(&flip_def(&[1, 1], Engine::Default), &x).unwrap_err();
    assert!(matches!(err, OpError::InvalidDims(_)));
}

#[test]
fn scalar_input_without_axes_fails() {
    let x = NdArray::<f32>::from_elem(ndarray::IxDyn(&[]), 1.);
    let err = flip_with(&OperatorDef::new("Flip"), &x).unwrap_err();
    assert!(matches!(err, OpError::OutOfBounds(_)));
}

#[test]
fn registry_errors() {
    assert!(matches!(
        create_operator::<f32>(&OperatorDef::new("Mirror")),
        Err(CheckError::UnknownOperator(_))
    ));
    match create_operator::<f32>(&OperatorDef::new("Flip").engine(Engine::Cudnn)) {
        Err(e) => assert!(e.is_unavailable()),
        Ok(_) => panic!("cudnn engine should not be registered"),
    }
    assert!(matches!(
        create_operator::<f32>(&flip_def(&[-1], Engine::Default)),
        Err(CheckError::InvalidArgument(_))
    ));
}

#[test]
fn works_for_f64() {
    let x = array![[1f64, 2.], [3., 4.]].into_dyn();
    let y = ops::flip(&x.view(), Some(&[0, 1])).unwrap();
    assert_eq!(y, array![[4f64, 3.], [2., 1.]].into_dyn());
}

#[test]
fn large_input() {
    let x = ArrayRng::<f32>::from_seed(9).standard_uniform(&[64, 128, 32]);
    let y = eval_with_time!(flip_check(&x, &[1], Engine::Parallel));
    approx::assert_abs_diff_eq!(
        y.sum_axis(Axis(1)),
        x.sum_axis(Axis(1)),
        epsilon = 1e-3
    );
}

#[test]
fn nchw_channel_and_height_flip() {
    let x = fc::ndarray_ext::range::<f32>(&[2, 3, 4, 5]);
    let y = flip_check(&x, &[1, 2], Engine::Default);
    // element (n, c, h, w) comes from (n, 2 - c, 3 - h, w)
    assert_eq!(y[[1, 0, 0, 2].as_slice()], x[[1, 2, 3, 2].as_slice()]);
    assert_eq!(y[[0, 2, 1, 4].as_slice()], x[[0, 0, 2, 4].as_slice()]);
}
