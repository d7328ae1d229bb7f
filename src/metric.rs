//! Distance functions the tree can be built over.
//!
//! A metric must be pure, symmetric and non-negative. Pruning during search
//! is only sound when it also satisfies the triangle inequality; this is
//! the caller's obligation and is never checked.

use std::fmt::{Debug, Display};

pub use num::Float;

/// Numeric type a metric measures distances in.
pub trait Scalar: Float + Debug + Display {}
impl<T: Float + Debug + Display> Scalar for T {}

pub trait Metric<P: ?Sized, F: Scalar> {
    /// Distance between `a` and `b`.
    fn distance(&self, a: &P, b: &P) -> F;
}

impl<P: ?Sized, F: Scalar, C> Metric<P, F> for C
    where C: Fn(&P, &P) -> F {

    fn distance(&self, a: &P, b: &P) -> F {
        self(a, b)
    }
}

/// 64-bit perceptual hash of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PHash(pub u64);

impl PHash {
    /// Number of differing bits between the two hashes.
    pub fn hamming(self, other: PHash) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

impl From<u64> for PHash {
    fn from(bits: u64) -> Self {
        PHash(bits)
    }
}

/// Hamming distance between perceptual hashes, scaled into `[0, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedHamming;

impl Metric<PHash, f64> for NormalizedHamming {
    fn distance(&self, a: &PHash, b: &PHash) -> f64 {
        f64::from(a.hamming(*b)) / 64.0
    }
}
