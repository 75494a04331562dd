//! Scalar types for intersection numbers: `f64` and exact `Rational64`.

use std::fmt;
use std::ops::AddAssign;

use num_rational::Rational64;
use num_traits::Signed;

/// Coefficient of a symmetric tensor.
pub trait Coeff: Copy + fmt::Debug + PartialEq + Signed + AddAssign + 'static {
    fn from_i64(v: i64) -> Self;
    fn to_f64(self) -> f64;
    /// Nearest integer (ties away from zero).
    fn round_int(self) -> Self;
}

impl Coeff for f64 {
    #[inline]
    fn from_i64(v: i64) -> Self {
        v as f64
    }
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
    #[inline]
    fn round_int(self) -> Self {
        self.round()
    }
}

impl Coeff for Rational64 {
    #[inline]
    fn from_i64(v: i64) -> Self {
        Rational64::from_integer(v)
    }
    #[inline]
    fn to_f64(self) -> f64 {
        *self.numer() as f64 / *self.denom() as f64
    }
    #[inline]
    fn round_int(self) -> Self {
        self.round()
    }
}
