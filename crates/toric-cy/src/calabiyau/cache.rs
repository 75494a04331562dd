//! Named cache slots for derived Calabi–Yau data.
//!
//! Every derived quantity lives in exactly one slot. Views of the same data
//! (origin conventions, bases) are separate slots filled from the canonical
//! slot, so clearing can target the basis-dependent ones alone.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use nalgebra::DMatrix;
use num_rational::Rational64;

use crate::cfg::SolverOpts;
use crate::error::CyError;
use crate::tensor::{Coeff, IntNums, SymTensor};
use crate::toric::ToricVariety;

use super::basis::BasisState;

/// Coordinate view of the intersection numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntNumsView {
    /// Raw divisor indices, origin = canonical class.
    Canonical,
    /// Raw divisor indices, origin = anticanonical class.
    Anticanonical,
    /// Current divisor basis.
    Basis,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arithmetic {
    Float,
    Exact,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntNumsKey {
    pub view: IntNumsView,
    pub arithmetic: Arithmetic,
}

/// Coordinate view of the toric Mori cone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConeView {
    WithOrigin,
    NoOrigin,
    InBasis,
}

#[derive(Clone, Debug)]
pub(crate) enum IntNumsSlot {
    Float(IntNums<f64>),
    Exact(IntNums<Rational64>),
}

/// Coefficient types that have their own intersection-number slots.
pub(crate) trait Slotted: Coeff {
    const ARITHMETIC: Arithmetic;
    fn wrap(t: IntNums<Self>) -> IntNumsSlot;
    fn peek(slot: &IntNumsSlot) -> Option<&IntNums<Self>>;
    fn ambient<V: ToricVariety>(v: &V, opts: &SolverOpts) -> Result<SymTensor<Self>, CyError>;
}

impl Slotted for f64 {
    const ARITHMETIC: Arithmetic = Arithmetic::Float;
    fn wrap(t: IntNums<Self>) -> IntNumsSlot {
        IntNumsSlot::Float(t)
    }
    fn peek(slot: &IntNumsSlot) -> Option<&IntNums<Self>> {
        match slot {
            IntNumsSlot::Float(t) => Some(t),
            IntNumsSlot::Exact(_) => None,
        }
    }
    fn ambient<V: ToricVariety>(v: &V, opts: &SolverOpts) -> Result<SymTensor<Self>, CyError> {
        v.intersection_numbers(opts)
    }
}

impl Slotted for Rational64 {
    const ARITHMETIC: Arithmetic = Arithmetic::Exact;
    fn wrap(t: IntNums<Self>) -> IntNumsSlot {
        IntNumsSlot::Exact(t)
    }
    fn peek(slot: &IntNumsSlot) -> Option<&IntNums<Self>> {
        match slot {
            IntNumsSlot::Exact(t) => Some(t),
            IntNumsSlot::Float(_) => None,
        }
    }
    fn ambient<V: ToricVariety>(v: &V, opts: &SolverOpts) -> Result<SymTensor<Self>, CyError> {
        v.intersection_numbers_exact(opts)
    }
}

/// Keyed slots of one kind.
#[derive(Clone, Debug)]
pub(crate) struct Slots<K, T> {
    map: HashMap<K, T>,
}

impl<K: Eq + Hash, T> Default for Slots<K, T> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, T> Slots<K, T> {
    pub fn get(&self, k: &K) -> Option<&T> {
        self.map.get(k)
    }
    pub fn insert(&mut self, k: K, v: T) {
        self.map.insert(k, v);
    }
    pub fn remove_where(&mut self, mut drop: impl FnMut(&K) -> bool) {
        self.map.retain(|k, _| !drop(k));
    }
}

/// Hodge numbers of a complete intersection, from a nef-partition record.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct HodgeData {
    pub hpq: BTreeMap<(usize, usize), i64>,
    pub chi: Option<i64>,
}

/// All derived state of one Calabi–Yau.
#[derive(Debug)]
pub(crate) struct CyCache<C> {
    pub hodge: Option<HodgeData>,
    /// Compact charge matrix over `[0] + prime divisors`.
    pub glsm_charge: Option<DMatrix<i64>>,
    pub glsm_relations: Option<DMatrix<i64>>,
    pub basis: Option<BasisState>,
    pub mori: Slots<ConeView, C>,
    pub intnums: Slots<IntNumsKey, IntNumsSlot>,
    pub prime_divisors: Option<Vec<usize>>,
    pub c2: Option<Vec<i64>>,
    pub smooth: Option<bool>,
    pub effective: Option<C>,
    pub hash: Option<u64>,
}

impl<C> Default for CyCache<C> {
    fn default() -> Self {
        Self {
            hodge: None,
            glsm_charge: None,
            glsm_relations: None,
            basis: None,
            mori: Slots::default(),
            intnums: Slots::default(),
            prime_divisors: None,
            c2: None,
            smooth: None,
            effective: None,
            hash: None,
        }
    }
}

impl<C> CyCache<C> {
    /// Drop everything derived from the current basis, keeping the basis.
    pub fn clear_in_basis(&mut self) {
        self.mori.remove_where(|v| *v == ConeView::InBasis);
        self.intnums.remove_where(|k| k.view == IntNumsView::Basis);
        self.effective = None;
    }
}
