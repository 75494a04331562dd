//! Restriction of ambient intersection numbers to the Calabi–Yau, and the
//! quantities read straight off them: prime divisors, c2, smoothness.
//!
//! Flow
//! - Ambient numbers (origin = canonical class) come from the variety.
//! - Hypersurface: `κ_CY(i..) = -κ_amb(0, i..)`.
//! - Complete intersection: one part at a time, each ambient key contributes
//!   to every distinct key obtained by dropping one position whose divisor
//!   lies in the part. Small entries are dropped after each step; if every
//!   final value is near an integer they are all rounded and the CY is
//!   recorded as smooth.
//! - Other views (anticanonical origin, divisor basis) are derived from the
//!   canonical slot of the same arithmetic.

use std::collections::BTreeSet;
use std::rc::Rc;

use num_rational::Rational64;
use tracing::{debug, info};

use crate::cfg::{IntNumsCfg, SolverOpts};
use crate::error::CyError;
use crate::linalg::from_rows;
use crate::tensor::{Coeff, IntNums, SymTensor};
use crate::toric::{Cone, Polytope, ToricVariety, Triangulation};

use super::basis::Basis;
use super::cache::{IntNumsKey, IntNumsView, Slotted};
use super::CalabiYau;

/// `κ_CY(i..) = -κ_amb(0, i..)`.
pub fn restrict_hypersurface<T: Coeff>(ambient: &SymTensor<T>) -> SymTensor<T> {
    let mut out = SymTensor::new(ambient.rank().saturating_sub(1));
    for (key, v) in ambient.iter() {
        if key[0] == 0 {
            out.insert(&key[1..], -v);
        }
    }
    out
}

/// Restrict along each part of a nef-partition in turn.
///
/// Returns the tensor and whether all entries were within
/// `round_to_integer_tol` of an integer (in which case they are rounded).
pub fn restrict_cicy<T: Coeff>(
    ambient: &SymTensor<T>,
    parts: &[Vec<usize>],
    round_to_zero_threshold: f64,
    round_to_integer_tol: f64,
) -> (SymTensor<T>, bool) {
    let mut cur = ambient.clone();
    for part in parts {
        let members: BTreeSet<usize> = part.iter().copied().collect();
        let mut next = SymTensor::new(cur.rank().saturating_sub(1));
        for (key, v) in cur.iter() {
            let reduced: BTreeSet<Vec<usize>> = key
                .iter()
                .enumerate()
                .filter(|(_, i)| members.contains(*i))
                .map(|(j, _)| {
                    let mut k = key.to_vec();
                    k.remove(j);
                    k
                })
                .collect();
            for k in reduced {
                next.add(&k, v);
            }
        }
        next.retain(|_, v| v.abs().to_f64() > round_to_zero_threshold);
        cur = next;
    }
    let smooth = cur
        .values()
        .all(|v| (v.round_int() - v).abs().to_f64() < round_to_integer_tol);
    if smooth {
        cur = cur.map_values(|_, v| v.round_int());
    }
    (cur, smooth)
}

/// Switch index 0 between canonical and anticanonical class.
///
/// Entries with an odd number of zeros change sign; the map is an involution.
pub fn flip_anticanonical<T: Coeff>(t: &SymTensor<T>) -> SymTensor<T> {
    t.map_values(|key, v| {
        if key.iter().filter(|&&i| i == 0).count() % 2 == 1 {
            -v
        } else {
            v
        }
    })
}

impl<V: ToricVariety> CalabiYau<V> {
    /// Floating-point intersection numbers in the requested view.
    ///
    /// Raw views are sparse over triangulation indices. In a basis the result
    /// is sparse for an index basis and dense for a matrix basis.
    pub fn intersection_numbers(&self, cfg: &IntNumsCfg) -> Result<IntNums<f64>, CyError> {
        self.intnums_view::<f64>(cfg)
    }

    /// Exact rational intersection numbers; experimental.
    pub fn intersection_numbers_exact(
        &self,
        cfg: &IntNumsCfg,
    ) -> Result<IntNums<Rational64>, CyError> {
        if !self.cfg.experimental {
            return Err(CyError::FeatureGate {
                feature: "exact intersection numbers",
            });
        }
        self.intnums_view::<Rational64>(cfg)
    }

    fn intnums_view<T: Slotted>(&self, cfg: &IntNumsCfg) -> Result<IntNums<T>, CyError> {
        let view = if cfg.in_basis {
            IntNumsView::Basis
        } else if cfg.zero_as_anticanonical {
            IntNumsView::Anticanonical
        } else {
            IntNumsView::Canonical
        };
        let key = IntNumsKey {
            view,
            arithmetic: T::ARITHMETIC,
        };
        let cached = self.cache.borrow().intnums.get(&key).and_then(T::peek).cloned();
        if let Some(t) = cached {
            return Ok(t);
        }
        let canonical = self.canonical_intnums::<T>(&cfg.solver)?;
        let out = match view {
            IntNumsView::Canonical => return Ok(IntNums::Sparse(canonical)),
            IntNumsView::Anticanonical => IntNums::Sparse(flip_anticanonical(&canonical)),
            IntNumsView::Basis => {
                let state = self.basis_state()?;
                match &state.divisor {
                    Basis::Indices(idx) => IntNums::Sparse(canonical.filter_to_basis(idx)),
                    Basis::Matrix(_) => {
                        IntNums::Dense(canonical.to_dense_in_basis(&state.divisor_mat))
                    }
                }
            }
        };
        self.cache.borrow_mut().intnums.insert(key, T::wrap(out.clone()));
        Ok(out)
    }

    /// Canonical-view slot, filled on first use.
    fn canonical_intnums<T: Slotted>(&self, opts: &SolverOpts) -> Result<SymTensor<T>, CyError> {
        let key = IntNumsKey {
            view: IntNumsView::Canonical,
            arithmetic: T::ARITHMETIC,
        };
        let cached = self
            .cache
            .borrow()
            .intnums
            .get(&key)
            .and_then(T::peek)
            .and_then(IntNums::as_sparse)
            .cloned();
        if let Some(t) = cached {
            return Ok(t);
        }
        let ambient = T::ambient(&*self.ambient, opts)?;
        let restricted = match self.nef_partition.as_deref() {
            Some(parts) if !self.is_hypersurface() => {
                let (t, smooth) = restrict_cicy(
                    &ambient,
                    parts,
                    opts.round_to_zero_threshold,
                    opts.round_to_integer_error_tol,
                );
                self.cache.borrow_mut().smooth = Some(smooth);
                t
            }
            _ => restrict_hypersurface(&ambient),
        };
        debug!(
            target: "toric_cy::intnums",
            arithmetic = ?T::ARITHMETIC,
            entries = restricted.len(),
            "restricted ambient intersection numbers"
        );
        self.cache
            .borrow_mut()
            .intnums
            .insert(key, T::wrap(IntNums::Sparse(restricted.clone())));
        Ok(restricted)
    }

    /// Triangulation indices of the prime toric divisors meeting the CY.
    ///
    /// When some divisor misses the CY, a variety on the remaining points is
    /// built once and used for the Mori cone.
    pub fn prime_toric_divisors(&self) -> Result<Vec<usize>, CyError> {
        let cached = self.cache.borrow().prime_divisors.clone();
        if let Some(p) = cached {
            return Ok(p);
        }
        let canonical = self.canonical_intnums::<f64>(&SolverOpts::default())?;
        let prime: Vec<usize> = canonical.support().into_iter().filter(|&i| i != 0).collect();
        let n = self.n_points();
        let optimal = if prime.len() + 1 == n {
            Rc::clone(&self.ambient)
        } else {
            let mut pts = vec![0];
            pts.extend(&prime);
            let tip = self.ambient.mori_cone()?.dual().tip_of_stretched_cone(1.0)?;
            let heights = pts
                .iter()
                .map(|&i| {
                    tip.get(i)
                        .copied()
                        .ok_or_else(|| CyError::external("cone", "stretched-cone tip too short"))
                })
                .collect::<Result<Vec<f64>, _>>()?;
            let tri_pts = self.triangulation().points();
            let sel: Vec<Vec<i64>> = pts.iter().map(|&i| tri_pts[i].clone()).collect();
            let poly_idx = self.polytope().points_to_indices(&sel)?;
            info!(
                target: "toric_cy::divisors",
                missing = n - pts.len(),
                "some prime toric divisors miss the Calabi-Yau; re-triangulating"
            );
            self.ambient.restricted(&poly_idx, &heights)?
        };
        *self.optimal.borrow_mut() = Some(optimal);
        self.cache.borrow_mut().prime_divisors = Some(prime.clone());
        Ok(prime)
    }

    /// Ambient variety whose rays are exactly the prime divisors meeting the CY.
    pub(crate) fn optimal_ambient_variety(&self) -> Result<Rc<V>, CyError> {
        let cached = self.optimal.borrow().clone();
        if let Some(v) = cached {
            return Ok(v);
        }
        self.prime_toric_divisors()?;
        self.optimal
            .borrow()
            .clone()
            .ok_or_else(|| CyError::external("variety", "optimal ambient variety unavailable"))
    }

    /// `∫ c2 ∧ D_i` for the prime divisors (index `i - 1`), 3-folds only.
    ///
    /// In a basis the vector is contracted with the basis rows (origin
    /// column dropped), which for an index basis selects entries.
    pub fn second_chern_class(&self, in_basis: bool) -> Result<Vec<i64>, CyError> {
        if self.dim != 3 {
            return Err(CyError::UnsupportedDimension {
                op: "second_chern_class",
                dim: self.dim,
            });
        }
        let cached = self.cache.borrow().c2.clone();
        let c2 = match cached {
            Some(c) => c,
            None => {
                let c = self.compute_c2()?;
                self.cache.borrow_mut().c2 = Some(c.clone());
                c
            }
        };
        if !in_basis {
            return Ok(c2);
        }
        let b = self.divisor_matrix(false)?;
        Ok(b.row_iter()
            .map(|row| row.iter().zip(&c2).map(|(&x, &c)| x * c).sum())
            .collect())
    }

    fn compute_c2(&self) -> Result<Vec<i64>, CyError> {
        let canonical = self.canonical_intnums::<f64>(&SolverOpts::default())?;
        let mut c2 = vec![0.0; self.n_points().saturating_sub(1)];
        for (key, v) in canonical.iter() {
            if key[0] == 0 {
                continue;
            }
            let (a, b, c) = (key[0], key[1], key[2]);
            if a == b && b == c {
                continue;
            } else if a == b || a == c {
                c2[a - 1] += v;
            } else if b == c {
                c2[b - 1] += v;
            } else {
                c2[a - 1] += v;
                c2[b - 1] += v;
                c2[c - 1] += v;
            }
        }
        Ok(c2.into_iter().map(|x| x.round() as i64).collect())
    }

    /// Hypersurfaces of dimension ≤ 3 are smooth; above that every fan cone
    /// on a codimension-one face must be smooth. Complete intersections are
    /// smooth when their restricted intersection numbers are integral.
    pub fn is_smooth(&self) -> Result<bool, CyError> {
        let cached = self.cache.borrow().smooth;
        if let Some(s) = cached {
            return Ok(s);
        }
        let smooth = if self.is_hypersurface() {
            self.dim <= 3 || self.fan_cones_smooth()?
        } else {
            self.canonical_intnums::<f64>(&SolverOpts::default())?;
            self.cache.borrow().smooth.unwrap_or(false)
        };
        self.cache.borrow_mut().smooth = Some(smooth);
        Ok(smooth)
    }

    fn fan_cones_smooth(&self) -> Result<bool, CyError> {
        let tri = self.triangulation();
        let pts = tri.points();
        let n = self.polytope().dim();
        for cone in tri.fan_cones(self.dim, self.dim - 1) {
            let rows: Vec<Vec<i64>> = cone.iter().map(|&i| pts[i].clone()).collect();
            if !V::Cone::from_rays(from_rows(&rows, n), false)?.is_smooth()? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
