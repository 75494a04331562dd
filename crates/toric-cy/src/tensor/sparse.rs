//! Sparse symmetric tensor keyed by sorted index tuples.

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::DMatrix;

use super::coeff::Coeff;
use super::dense::DenseTensor;

/// Symmetric tensor of fixed rank stored by canonical (sorted) index tuples.
///
/// Invariants:
/// - Every key has length `rank` and is sorted ascending.
/// - A stored entry represents all distinct permutations of its key.
#[derive(Clone, Debug, PartialEq)]
pub struct SymTensor<T> {
    rank: usize,
    entries: BTreeMap<Vec<usize>, T>,
}

impl<T: Coeff> SymTensor<T> {
    pub fn new(rank: usize) -> Self {
        Self {
            rank,
            entries: BTreeMap::new(),
        }
    }

    /// Build from `(key, value)` pairs; keys are canonicalized and duplicates summed.
    pub fn from_entries<I>(rank: usize, entries: I) -> Self
    where
        I: IntoIterator<Item = (Vec<usize>, T)>,
    {
        let mut out = Self::new(rank);
        for (k, v) in entries {
            out.add(&k, v);
        }
        out
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted representative of `key`.
    pub fn canonical(key: &[usize]) -> Vec<usize> {
        let mut k = key.to_vec();
        k.sort_unstable();
        k
    }

    /// Value at `key` in any order; zero when absent.
    pub fn get(&self, key: &[usize]) -> T {
        self.entries
            .get(&Self::canonical(key))
            .copied()
            .unwrap_or_else(T::zero)
    }

    /// Overwrite the entry at `key`.
    pub fn insert(&mut self, key: &[usize], v: T) {
        debug_assert_eq!(key.len(), self.rank);
        self.entries.insert(Self::canonical(key), v);
    }

    /// Accumulate `v` into the entry at `key`.
    pub fn add(&mut self, key: &[usize], v: T) {
        debug_assert_eq!(key.len(), self.rank);
        *self
            .entries
            .entry(Self::canonical(key))
            .or_insert_with(T::zero) += v;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[usize], T)> + '_ {
        self.entries.iter().map(|(k, &v)| (k.as_slice(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = T> + '_ {
        self.entries.values().copied()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&[usize], T) -> bool) {
        self.entries.retain(|k, v| keep(k, *v));
    }

    pub fn map_values(&self, mut f: impl FnMut(&[usize], T) -> T) -> Self {
        Self {
            rank: self.rank,
            entries: self
                .entries
                .iter()
                .map(|(k, &v)| (k.clone(), f(k, v)))
                .collect(),
        }
    }

    /// Convert coefficients, keeping keys.
    pub fn convert<U: Coeff>(&self, mut f: impl FnMut(T) -> U) -> SymTensor<U> {
        SymTensor {
            rank: self.rank,
            entries: self.entries.iter().map(|(k, &v)| (k.clone(), f(v))).collect(),
        }
    }

    /// All indices appearing in some stored key.
    pub fn support(&self) -> BTreeSet<usize> {
        self.entries.keys().flatten().copied().collect()
    }

    /// Number of distinct orderings of `key`: `rank! / Π count!`.
    pub fn multiplicity(key: &[usize]) -> u64 {
        let denom: u64 = index_counts(key).iter().map(|&(_, c)| factorial(c)).product();
        factorial(key.len()) / denom
    }

    /// Visit every distinct permutation of every stored key with its value.
    ///
    /// This is the dense symmetric tensor restricted to its nonzero entries;
    /// contractions written against it need no coincidence-pattern logic.
    pub fn for_each_permutation(&self, mut f: impl FnMut(&[usize], T)) {
        for (key, &v) in &self.entries {
            let mut perm = key.clone();
            loop {
                f(&perm, v);
                if !next_permutation(&mut perm) {
                    break;
                }
            }
        }
    }

    /// Keep entries whose indices all lie in `basis`, relabeled to their
    /// positions in `basis`.
    pub fn filter_to_basis(&self, basis: &[usize]) -> Self {
        let pos: BTreeMap<usize, usize> = basis.iter().enumerate().map(|(p, &i)| (i, p)).collect();
        let mut out = Self::new(self.rank);
        for (key, &v) in &self.entries {
            let relabeled: Option<Vec<usize>> = key.iter().map(|i| pos.get(i).copied()).collect();
            if let Some(k) = relabeled {
                out.insert(&k, v);
            }
        }
        out
    }

    /// Dense tensor in the basis whose rows are given by `basis`
    /// (one column per index of this tensor).
    pub fn to_dense_in_basis(&self, basis: &DMatrix<i64>) -> DenseTensor<T> {
        let h = basis.nrows();
        let mut out = DenseTensor::zeros(h, self.rank);
        let mut slot = vec![0usize; self.rank];
        self.for_each_permutation(|key, v| {
            slot.iter_mut().for_each(|s| *s = 0);
            loop {
                let mut prod = v;
                for (pos, &a) in slot.iter().enumerate() {
                    let b = basis[(a, key[pos])];
                    if b == 0 {
                        prod = T::zero();
                        break;
                    }
                    prod = prod * T::from_i64(b);
                }
                if !prod.is_zero() {
                    *out.get_mut(&slot) += prod;
                }
                if !odometer(&mut slot, h) {
                    break;
                }
            }
        });
        out
    }
}

/// `(index, multiplicity)` pairs of a key, sorted by index.
pub fn index_counts(key: &[usize]) -> Vec<(usize, usize)> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for &i in key {
        *counts.entry(i).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

pub fn factorial(n: usize) -> u64 {
    (1..=n as u64).product()
}

/// Lexicographic successor; returns false after the last permutation.
fn next_permutation(v: &mut [usize]) -> bool {
    if v.len() < 2 {
        return false;
    }
    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = v.len() - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}

/// Advance a base-`base` counter stored little-endian from the back.
pub(crate) fn odometer(slot: &mut [usize], base: usize) -> bool {
    for s in slot.iter_mut().rev() {
        *s += 1;
        if *s < base {
            return true;
        }
        *s = 0;
    }
    false
}
