//! Symmetric tensors for intersection numbers.
//!
//! Purpose
//! - `SymTensor`: sparse storage keyed by sorted index tuples, the form in
//!   which ambient and Calabi–Yau intersection numbers are produced.
//! - `DenseTensor`: full storage used once a generic (matrix) basis mixes
//!   every index with every other.
//!
//! Conventions
//! - Sparse keys are canonical (sorted). `for_each_permutation` expands a key
//!   into all of its distinct orderings, so volume, divisor-volume and AA
//!   contractions are written once against the full symmetric tensor.

mod coeff;
mod dense;
mod sparse;

pub use coeff::Coeff;
pub use dense::DenseTensor;
pub use sparse::{factorial, index_counts, SymTensor};
pub(crate) use sparse::odometer;

/// Intersection numbers in either storage form.
#[derive(Clone, Debug, PartialEq)]
pub enum IntNums<T> {
    /// Canonical sorted keys (raw divisors or an index basis).
    Sparse(SymTensor<T>),
    /// Dense tensor in a matrix basis.
    Dense(DenseTensor<T>),
}

impl<T: Coeff> IntNums<T> {
    pub fn as_sparse(&self) -> Option<&SymTensor<T>> {
        match self {
            Self::Sparse(t) => Some(t),
            Self::Dense(_) => None,
        }
    }

    pub fn as_dense(&self) -> Option<&DenseTensor<T>> {
        match self {
            Self::Dense(t) => Some(t),
            Self::Sparse(_) => None,
        }
    }

    /// Entry lookup in either form; `idx` may be in any order.
    pub fn get(&self, idx: &[usize]) -> T {
        match self {
            Self::Sparse(t) => t.get(idx),
            Self::Dense(t) => t.get(idx),
        }
    }
}
