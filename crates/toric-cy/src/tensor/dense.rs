//! Dense tensor with equal side lengths (row-major).

use nalgebra::{DMatrix, DVector};

use super::coeff::Coeff;

#[derive(Clone, Debug, PartialEq)]
pub struct DenseTensor<T> {
    side: usize,
    rank: usize,
    data: Vec<T>,
}

impl<T: Coeff> DenseTensor<T> {
    pub fn zeros(side: usize, rank: usize) -> Self {
        Self {
            side,
            rank,
            data: vec![T::zero(); side.pow(rank as u32)],
        }
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Entries in row-major order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    fn offset(&self, idx: &[usize]) -> usize {
        debug_assert_eq!(idx.len(), self.rank);
        idx.iter().fold(0, |acc, &i| acc * self.side + i)
    }

    pub fn get(&self, idx: &[usize]) -> T {
        self.data[self.offset(idx)]
    }

    pub fn get_mut(&mut self, idx: &[usize]) -> &mut T {
        let o = self.offset(idx);
        &mut self.data[o]
    }

    /// Contract the last axis against `v`; rank drops by one.
    pub fn contract_last(&self, v: &[T]) -> Self {
        debug_assert_eq!(v.len(), self.side);
        let mut out = Self::zeros(self.side, self.rank.saturating_sub(1));
        for (o, chunk) in out.data.iter_mut().zip(self.data.chunks(self.side)) {
            *o = chunk
                .iter()
                .zip(v)
                .fold(T::zero(), |acc, (&a, &b)| acc + a * b);
        }
        out
    }

    /// Value of a rank-0 tensor.
    pub fn scalar(&self) -> Option<T> {
        (self.rank == 0).then(|| self.data[0])
    }
}

impl DenseTensor<f64> {
    pub fn to_vector(&self) -> Option<DVector<f64>> {
        (self.rank == 1).then(|| DVector::from_column_slice(&self.data))
    }

    pub fn to_matrix(&self) -> Option<DMatrix<f64>> {
        (self.rank == 2).then(|| DMatrix::from_row_slice(self.side, self.side, &self.data))
    }
}
