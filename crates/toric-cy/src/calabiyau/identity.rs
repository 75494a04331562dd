//! Equality, hashing and description of Calabi–Yaus.
//!
//! Two hypersurfaces are trivially equivalent when their polytopes agree
//! and their triangulations restrict to the same triangulations of every
//! codimension-2 face. Complete intersections are identified by their
//! ambient variety and nef-partition.

use std::collections::{BTreeSet, HashMap};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::warn;

use crate::error::CyError;
use crate::toric::{Polytope, ToricVariety, Triangulation};

use super::CalabiYau;

impl<V: ToricVariety> CalabiYau<V> {
    /// Simplices induced on the codimension-2 faces of the polytope, as
    /// sorted triangulation indices. Face points missing from the
    /// triangulation are ignored.
    pub(crate) fn restricted_simplices(&self) -> BTreeSet<Vec<usize>> {
        let tri = self.triangulation();
        let d = tri.dim();
        let index: HashMap<Vec<i64>, usize> = tri
            .points()
            .into_iter()
            .enumerate()
            .map(|(i, p)| (p, i))
            .collect();
        let faces: Vec<BTreeSet<usize>> = self
            .polytope()
            .faces(d.saturating_sub(2))
            .iter()
            .map(|f| f.iter().filter_map(|p| index.get(p).copied()).collect())
            .collect();
        let simplices = tri.simplices();
        let mut out = BTreeSet::new();
        for face in &faces {
            for s in &simplices {
                let inter: Vec<usize> = s.iter().copied().filter(|i| face.contains(i)).collect();
                if inter.len() + 1 == d {
                    let mut inter = inter;
                    inter.sort_unstable();
                    out.insert(inter);
                }
            }
        }
        out
    }

    /// Whether two hypersurfaces agree up to a change of triangulation that
    /// does not affect the CY. `None` when either is a complete intersection.
    pub fn is_trivially_equivalent(&self, other: &Self) -> Result<Option<bool>, CyError> {
        if !self.is_hypersurface() || !other.is_hypersurface() {
            return Ok(None);
        }
        if self.polytope() != other.polytope() {
            return Ok(Some(false));
        }
        Ok(Some(self.restricted_simplices() == other.restricted_simplices()))
    }

    /// Hash identifying the CY up to trivial equivalence (hypersurfaces) or
    /// up to its defining data (complete intersections).
    pub fn identity_hash(&self) -> u64 {
        let cached = self.cache.borrow().hash;
        if let Some(h) = cached {
            return h;
        }
        let mut hasher = DefaultHasher::new();
        if self.is_hypersurface() {
            self.polytope().hash(&mut hasher);
            for s in self.restricted_simplices() {
                s.hash(&mut hasher);
            }
        } else {
            self.ambient.hash(&mut hasher);
            self.nef_partition.hash(&mut hasher);
        }
        let h = hasher.finish();
        self.cache.borrow_mut().hash = Some(h);
        h
    }

    fn describe(&self) -> Result<String, CyError> {
        let d = self.dim;
        let dd = self.ambient_dim();
        if self.is_hypersurface() {
            return Ok(match d {
                2 => format!(
                    "A K3 hypersurface with h11={} in a 3-dimensional toric variety",
                    self.h11()?
                ),
                3 => format!(
                    "A Calabi-Yau 3-fold hypersurface with h11={} and h21={} in a \
                     4-dimensional toric variety",
                    self.h11()?,
                    self.h21()?
                ),
                4 => format!(
                    "A Calabi-Yau 4-fold hypersurface with h11={}, h12={}, h13={}, and \
                     h22={} in a 5-dimensional toric variety",
                    self.h11()?,
                    self.h12()?,
                    self.h13()?,
                    self.h22()?
                ),
                _ => format!(
                    "A Calabi-Yau {d}-fold hypersurface in a {}-dimensional toric variety",
                    d + 1
                ),
            });
        }
        let known = self.cache.borrow().hodge.is_some();
        Ok(match d {
            2 if known => format!(
                "A complete intersection K3 surface with h11={} in a \
                 {dd}-dimensional toric variety",
                self.h11()?
            ),
            3 if known => format!(
                "A complete intersection Calabi-Yau 3-fold with h11={} h21={} in a \
                 {dd}-dimensional toric variety",
                self.h11()?,
                self.h21()?
            ),
            4 if known => format!(
                "A complete intersection Calabi-Yau 4-fold with h11={}, h12={}, h13={}, \
                 and h22={} in a {dd}-dimensional toric variety",
                self.h11()?,
                self.h12()?,
                self.h13()?,
                self.h22()?
            ),
            _ => self.generic_description(),
        })
    }

    fn generic_description(&self) -> String {
        let d = self.dim;
        if self.is_hypersurface() {
            format!(
                "A Calabi-Yau {d}-fold hypersurface in a {}-dimensional toric variety",
                d + 1
            )
        } else {
            format!(
                "A complete intersection Calabi-Yau {d}-fold in a {}-dimensional toric variety",
                self.ambient_dim()
            )
        }
    }
}

impl<V: ToricVariety> PartialEq for CalabiYau<V> {
    /// `true` means trivially equivalent; `false` does not rule out equivalence.
    fn eq(&self, other: &Self) -> bool {
        let same = match (self.is_hypersurface(), other.is_hypersurface()) {
            (true, true) => match self.is_trivially_equivalent(other) {
                Ok(same) => same == Some(true),
                Err(e) => {
                    warn!(target: "toric_cy::identity", error = %e, "equivalence check failed");
                    false
                }
            },
            (false, false) => self.identity_hash() == other.identity_hash(),
            _ => false,
        };
        if !same {
            warn!(
                target: "toric_cy::identity",
                "Calabi-Yaus are not trivially equivalent; they may still be equivalent"
            );
        }
        same
    }
}

impl<V: ToricVariety> Hash for CalabiYau<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.identity_hash());
    }
}

impl<V: ToricVariety> fmt::Display for CalabiYau<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.describe() {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str(&self.generic_description()),
        }
    }
}
