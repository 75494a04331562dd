//! Calabi–Yau hypersurfaces and complete intersections in toric varieties.
//!
//! Purpose
//! - `CalabiYau<V>` wraps a shared ambient variety and an optional
//!   nef-partition, and derives intersection numbers, Hodge numbers, bases,
//!   cones, the second Chern class and Kähler-cone-local tensors from it.
//!
//! Why this design
//! - Queries take `&self`; derived data lives in named slots behind a
//!   `RefCell` (`cache::CyCache`) so several holders can share one model.
//! - Every view of the intersection numbers (origin convention, basis) is
//!   derived from one canonical restriction and never recomputed on its own.
//! - Experimental functionality is enabled by the `CyConfig` passed to
//!   `new`, not by process-wide state.
//!
//! Conventions
//! - Divisor indices are triangulation point indices; 0 is the origin, i.e.
//!   the canonical class unless a view says otherwise.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::cfg::CyConfig;
use crate::error::CyError;
use crate::toric::{Polytope, ToricVariety, Triangulation};

pub mod basis;
pub mod cache;
mod cones;
mod hodge;
mod identity;
pub mod intnums;
mod kahler;

pub use basis::Basis;
pub use cache::{Arithmetic, ConeView, IntNumsKey, IntNumsView};

use cache::CyCache;

/// Calabi–Yau hypersurface or complete intersection in `V`.
///
/// Invariants:
/// - The mode (hypersurface or CICY) is fixed at construction.
/// - `nef_partition` parts hold triangulation indices of non-origin points.
/// - Cached views agree with a fresh computation on the same inputs.
pub struct CalabiYau<V: ToricVariety> {
    ambient: Rc<V>,
    nef_partition: Option<Vec<Vec<usize>>>,
    cfg: CyConfig,
    dim: usize,
    optimal: RefCell<Option<Rc<V>>>,
    cache: RefCell<CyCache<V::Cone>>,
}

impl<V: ToricVariety> CalabiYau<V> {
    /// Validate the ambient data and build the model.
    ///
    /// `nef_partition` parts are polytope point indices. Without one the
    /// anticanonical hypersurface is built. Complete intersections, and
    /// hypersurfaces that are not favorable threefolds, need
    /// `cfg.experimental`.
    pub fn new(
        ambient: Rc<V>,
        nef_partition: Option<Vec<Vec<usize>>>,
        cfg: CyConfig,
    ) -> Result<Self, CyError> {
        let nef_partition = match nef_partition {
            Some(parts) => Some(Self::validate_nef_partition(&ambient, &parts, cfg)?),
            None => {
                Self::validate_hypersurface(&ambient, cfg)?;
                None
            }
        };
        let codim = nef_partition.as_ref().map_or(1, Vec::len);
        let dim = ambient
            .triangulation()
            .dim()
            .checked_sub(codim)
            .ok_or_else(|| CyError::construction("nef-partition has more parts than dimensions"))?;
        let cy = Self {
            ambient,
            nef_partition,
            cfg,
            dim,
            optimal: RefCell::new(None),
            cache: RefCell::new(CyCache::default()),
        };
        if !cy.is_hypersurface() {
            cy.prefetch_cicy_hodge();
        }
        Ok(cy)
    }

    fn validate_hypersurface(ambient: &V, cfg: CyConfig) -> Result<(), CyError> {
        let tri = ambient.triangulation();
        if !tri.is_fine() {
            return Err(CyError::construction("triangulation is not fine"));
        }
        let poly = tri.polytope();
        if (ambient.dim() != 4 || !poly.is_favorable(crate::toric::Lattice::N)) && !cfg.experimental {
            return Err(CyError::FeatureGate {
                feature: "non-favorable Calabi-Yaus or Calabi-Yaus of dimension other than 3",
            });
        }
        let pts = tri.points();
        if pts != poly.points_not_interior_to_facets() && pts.as_slice() != poly.points() {
            return Err(CyError::construction(
                "hypersurfaces must use either the points not interior to facets or all points",
            ));
        }
        Ok(())
    }

    /// Check the partition and convert parts to triangulation indices.
    fn validate_nef_partition(
        ambient: &V,
        parts: &[Vec<usize>],
        cfg: CyConfig,
    ) -> Result<Vec<Vec<usize>>, CyError> {
        if !cfg.experimental {
            return Err(CyError::FeatureGate {
                feature: "complete intersections",
            });
        }
        if parts.is_empty() || parts.iter().any(Vec::is_empty) {
            return Err(CyError::construction("nef-partition parts must be non-empty"));
        }
        let poly = ambient.polytope();
        let pts = poly.points();
        let lookup = |i: usize| {
            pts.get(i)
                .cloned()
                .ok_or_else(|| CyError::construction(format!("point index {i} out of range")))
        };
        let mut union: Vec<Vec<i64>> = Vec::new();
        for &i in parts.iter().flatten() {
            let p = lookup(i)?;
            if !union.contains(&p) {
                union.push(p);
            }
        }
        if V::Polytope::from_points(&union)? != *poly {
            return Err(CyError::construction("input does not define a nef-partition"));
        }
        let origin = vec![0; poly.dim()];
        let mut polys = Vec::with_capacity(parts.len());
        for part in parts {
            let mut gens = vec![origin.clone()];
            for &i in part {
                gens.push(lookup(i)?);
            }
            polys.push(V::Polytope::from_points(&gens)?);
        }
        let mut sum = V::Polytope::from_points(polys[0].points())?;
        for p in &polys[1..] {
            sum = sum.minkowski_sum(p)?;
        }
        if !sum.is_reflexive() {
            return Err(CyError::construction("input does not define a nef-partition"));
        }
        let tri_pts = ambient.triangulation().points();
        polys
            .iter()
            .map(|p| {
                let present: Vec<Vec<i64>> = p
                    .points()
                    .iter()
                    .filter(|q| q.iter().any(|&x| x != 0) && tri_pts.contains(q))
                    .cloned()
                    .collect();
                ambient.triangulation().points_to_indices(&present)
            })
            .collect()
    }

    /// Best-effort Hodge lookup among already enumerated nef-partitions.
    fn prefetch_cicy_hodge(&self) {
        match self.lookup_cicy_hodge(true) {
            Ok(true) => debug!(target: "toric_cy::hodge", "Hodge numbers found in cache"),
            Ok(false) => warn!(
                target: "toric_cy::hodge",
                "no cached Hodge numbers for this nef-partition; they will be enumerated on demand"
            ),
            Err(e) => warn!(target: "toric_cy::hodge", error = %e, "cached Hodge lookup failed"),
        }
    }

    pub fn ambient_variety(&self) -> &Rc<V> {
        &self.ambient
    }

    pub fn triangulation(&self) -> &V::Triangulation {
        self.ambient.triangulation()
    }

    pub fn polytope(&self) -> &V::Polytope {
        self.ambient.polytope()
    }

    pub fn config(&self) -> CyConfig {
        self.cfg
    }

    /// Complex dimension of the Calabi–Yau.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn ambient_dim(&self) -> usize {
        self.ambient.dim()
    }

    /// True without a nef-partition or with a single part.
    #[inline]
    pub fn is_hypersurface(&self) -> bool {
        self.nef_partition.as_ref().map_or(true, |p| p.len() == 1)
    }

    /// Parts as triangulation indices.
    pub fn nef_partition(&self) -> Option<&[Vec<usize>]> {
        self.nef_partition.as_deref()
    }

    /// Number of triangulation points, origin included.
    pub(crate) fn n_points(&self) -> usize {
        self.triangulation().points().len()
    }

    /// Reset derived data.
    ///
    /// `only_in_basis` keeps the bases and everything independent of them.
    /// Otherwise the model is reset to its freshly constructed state and,
    /// with `recursive`, the ambient variety is cleared as well.
    pub fn clear_cache(&self, recursive: bool, only_in_basis: bool) {
        if only_in_basis {
            self.cache.borrow_mut().clear_in_basis();
            return;
        }
        *self.cache.borrow_mut() = CyCache::default();
        *self.optimal.borrow_mut() = None;
        if recursive {
            self.ambient.clear_cache(true);
        }
        if !self.is_hypersurface() {
            self.prefetch_cicy_hodge();
        }
    }
}

impl<V: ToricVariety> fmt::Debug for CalabiYau<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalabiYau")
            .field("dim", &self.dim)
            .field("nef_partition", &self.nef_partition)
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
#[cfg(test)]
mod tests_cicy;
