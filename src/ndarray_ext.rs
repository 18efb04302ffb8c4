//! A small extension of rust-ndarray
//!
//! Mainly provides `ArrayRng`, a seedable generator of random arrays.
use crate::Float;
use rand::distributions::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use std::cell::RefCell;
use std::marker::PhantomData;

pub type NdArray<T> = ndarray::Array<T, ndarray::IxDyn>;

pub type NdArrayView<'a, T> = ndarray::ArrayView<'a, T, ndarray::IxDyn>;

/// Seed used by `ArrayRng::default` and `get_default_rng`.
pub const DEFAULT_SEED: u64 = 42;

/// Returns a `XorShiftRng` seeded with `DEFAULT_SEED`.
#[inline]
pub fn get_default_rng() -> XorShiftRng {
    XorShiftRng::seed_from_u64(DEFAULT_SEED)
}

/// Returns a `XorShiftRng` seeded with `seed`.
#[inline]
pub fn seeded_rng(seed: u64) -> XorShiftRng {
    XorShiftRng::seed_from_u64(seed)
}

/// Number of elements of an array with the given shape.
#[inline]
pub fn size_of_shape(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Range.
pub fn range<T: Float>(shape: &[usize]) -> NdArray<T> {
    let prod = size_of_shape(shape);
    let data = (0..prod).map(|a| T::from(a).unwrap()).collect::<Vec<_>>();
    // safe unwrap: the buffer length is the product of `shape`
    NdArray::from_shape_vec(ndarray::IxDyn(shape), data).unwrap()
}

/// Internal object to create ndarrays whose elements are random numbers.
///
/// This is a wrapper of an arbitrary `rand::Rng`; `default` uses a `XorShiftRng`
/// seeded with `DEFAULT_SEED`, so two default instances produce the same arrays.
pub struct ArrayRng<T: Float, R: Rng = XorShiftRng> {
    phantom: PhantomData<T>,
    rng: RefCell<R>,
}

impl<T: Float> Default for ArrayRng<T, XorShiftRng> {
    fn default() -> Self {
        ArrayRng::new(get_default_rng())
    }
}

impl<T: Float> ArrayRng<T, XorShiftRng> {
    /// Creates `ArrayRng` backed by a `XorShiftRng` seeded with `seed`.
    pub fn from_seed(seed: u64) -> Self {
        ArrayRng::new(seeded_rng(seed))
    }
}

impl<T: Float, R: Rng> ArrayRng<T, R> {
    /// Creates `ArrayRng` object with `Rng` object.
    pub fn new(rng: R) -> Self {
        ArrayRng {
            phantom: PhantomData,
            rng: RefCell::new(rng),
        }
    }

    /// Generates `ndarray::Array<T, ndarray::IxDyn>` whose elements are random numbers.
    pub fn gen_random_array<D>(&self, shape: &[usize], dist: D) -> NdArray<T>
    where
        D: Distribution<f64>,
    {
        let size = size_of_shape(shape);
        let mut rng = self.rng.borrow_mut();
        let buf = (0..size)
            .map(|_| T::from(dist.sample(&mut *rng)).unwrap())
            .collect::<Vec<_>>();
        NdArray::from_shape_vec(ndarray::IxDyn(shape), buf).unwrap()
    }

    /// Picks one index in `0..len` uniformly.
    ///
    /// `len` must be positive.
    pub fn choose_index(&self, len: usize) -> usize {
        self.rng.borrow_mut().gen_range(0..len)
    }

    /// Elements drawn uniformly from `[0, 1)`.
    pub fn standard_uniform(&self, shape: &[usize]) -> NdArray<T> {
        let dist = Uniform::new(0., 1.);
        // Narrowing from f64 may round samples just below 1 up to 1.
        let below_one = T::one() - T::epsilon();
        self.gen_random_array(shape, dist)
            .mapv_into(|x| if x >= T::one() { below_one } else { x })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_uniform_is_in_unit_interval() {
        let rng = ArrayRng::<f32>::from_seed(7);
        let a = rng.standard_uniform(&[4, 5]);
        assert_eq!(a.shape(), &[4, 5]);
        assert!(a.iter().all(|&x| (0. ..1.).contains(&x)));
    }

    #[test]
    fn same_seed_same_array() {
        let a = ArrayRng::<f64>::from_seed(3).standard_uniform(&[6]);
        let b = ArrayRng::<f64>::from_seed(3).standard_uniform(&[6]);
        let c = ArrayRng::<f64>::from_seed(4).standard_uniform(&[6]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn range_is_row_major() {
        let a = range::<f32>(&[2, 3]);
        assert_eq!(a[ndarray::IxDyn(&[1, 0])], 3.);
        assert_eq!(a[ndarray::IxDyn(&[1, 2])], 5.);
    }

    #[test]
    fn zero_sized_shape() {
        let a = ArrayRng::<f32>::default().standard_uniform(&[0, 3]);
        assert_eq!(a.len(), 0);
        assert_eq!(a.shape(), &[0, 3]);
    }
}
