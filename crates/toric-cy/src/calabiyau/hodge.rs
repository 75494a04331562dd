//! Hodge numbers and Euler characteristic.
//!
//! Hypersurfaces read lattice-Hodge numbers of the polytope. Complete
//! intersections look their diamond up among the polytope's enumerated
//! nef-partitions, widening the enumeration only when allowed.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::error::CyError;
use crate::toric::{Lattice, NefPartitionQuery, Polytope, ToricVariety, Triangulation};

use super::cache::HodgeData;
use super::CalabiYau;

/// Where the CICY diamond is searched, in order.
#[derive(Clone, Copy, Debug)]
enum Lookup {
    Cached,
    Enumerate(NefPartitionQuery),
}

/// `(p, q)` positions of a flattened diamond, one anti-diagonal per degree
/// `p + q`, each walked from the largest admissible `p` down.
pub(crate) fn diamond_order(dim: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::with_capacity((dim + 1) * (dim + 1));
    for i in 0..=2 * dim {
        let mut p = i.min(dim);
        let mut q = i - p;
        loop {
            out.push((p, q));
            if p == 0 || q == dim {
                break;
            }
            p -= 1;
            q += 1;
        }
    }
    out
}

fn supported(dim: usize) -> bool {
    (2..=4).contains(&dim)
}

impl<V: ToricVariety> CalabiYau<V> {
    /// Hodge number `h^{p,q}`.
    ///
    /// Hypersurfaces outside dimensions 2–4 still answer when `p` or `q`
    /// is 1. Complete intersections default missing entries to 0. The named
    /// accessors below reject unsupported hypersurface dimensions outright.
    pub fn hpq(&self, p: usize, q: usize) -> Result<i64, CyError> {
        if !self.is_hypersurface() {
            self.ensure_cicy_hodge()?;
            let cache = self.cache.borrow();
            return Ok(cache
                .hodge
                .as_ref()
                .and_then(|h| h.hpq.get(&(p, q)).copied())
                .unwrap_or(0));
        }
        if !supported(self.dim) && p != 1 && q != 1 {
            return Err(CyError::UnsupportedDimension {
                op: "hpq",
                dim: self.dim,
            });
        }
        self.polytope().hpq(p, q, Lattice::N)
    }

    fn guarded_hpq(&self, op: &'static str, p: usize, q: usize) -> Result<i64, CyError> {
        if self.is_hypersurface() && !supported(self.dim) {
            return Err(CyError::UnsupportedDimension { op, dim: self.dim });
        }
        self.hpq(p, q)
    }

    pub fn h11(&self) -> Result<i64, CyError> {
        self.guarded_hpq("h11", 1, 1)
    }

    pub fn h12(&self) -> Result<i64, CyError> {
        self.guarded_hpq("h12", 1, 2)
    }

    pub fn h13(&self) -> Result<i64, CyError> {
        self.guarded_hpq("h13", 1, 3)
    }

    pub fn h22(&self) -> Result<i64, CyError> {
        self.guarded_hpq("h22", 2, 2)
    }

    /// Alias of `h12`.
    pub fn h21(&self) -> Result<i64, CyError> {
        self.h12()
    }

    /// Alias of `h13`.
    pub fn h31(&self) -> Result<i64, CyError> {
        self.h13()
    }

    /// Euler characteristic.
    ///
    /// For complete intersections this is the alternating sum over the
    /// diamond's anti-diagonals, cached alongside the diamond.
    pub fn chi(&self) -> Result<i64, CyError> {
        if self.is_hypersurface() {
            if !supported(self.dim) {
                return Err(CyError::UnsupportedDimension {
                    op: "chi",
                    dim: self.dim,
                });
            }
            return self.polytope().chi(Lattice::N);
        }
        self.ensure_cicy_hodge()?;
        let cached = self.cache.borrow().hodge.as_ref().and_then(|h| h.chi);
        if let Some(chi) = cached {
            return Ok(chi);
        }
        let chi = self
            .hodge_diamond()?
            .iter()
            .enumerate()
            .flat_map(|(p, row)| row.iter().enumerate().map(move |(q, &h)| (p + q, h)))
            .map(|(deg, h)| if deg % 2 == 1 { -h } else { h })
            .sum();
        if let Some(h) = self.cache.borrow_mut().hodge.as_mut() {
            h.chi = Some(chi);
        }
        Ok(chi)
    }

    /// Full diamond, `diamond[p][q] = h^{p,q}`.
    pub fn hodge_diamond(&self) -> Result<Vec<Vec<i64>>, CyError> {
        let d = self.dim;
        let mut out = vec![vec![0; d + 1]; d + 1];
        for (p, row) in out.iter_mut().enumerate() {
            for (q, h) in row.iter_mut().enumerate() {
                *h = self.hpq(p, q)?;
            }
        }
        Ok(out)
    }

    fn ensure_cicy_hodge(&self) -> Result<(), CyError> {
        self.lookup_cicy_hodge(false).map(|_| ())
    }

    /// Resolve the CICY diamond; returns whether it is now known.
    ///
    /// With `only_from_cache` nothing is enumerated and a miss is `Ok(false)`;
    /// otherwise a miss after both enumerations is `CicyResolution`.
    pub(crate) fn lookup_cicy_hodge(&self, only_from_cache: bool) -> Result<bool, CyError> {
        if self.cache.borrow().hodge.is_some() {
            return Ok(true);
        }
        let Some(parts) = self.nef_partition.as_ref() else {
            return Ok(false);
        };
        let codim = self.ambient_dim() - self.dim;
        let poly = self.polytope();
        let vertices: BTreeSet<usize> = poly
            .points_to_indices(&poly.vertices())?
            .into_iter()
            .collect();
        let tri_pts = self.triangulation().points();
        let mut target = BTreeSet::new();
        for part in parts {
            let pts: Vec<Vec<i64>> = part.iter().map(|&i| tri_pts[i].clone()).collect();
            target.insert(on_vertices(&poly.points_to_indices(&pts)?, &vertices));
        }

        let strategies = [
            Lookup::Cached,
            Lookup::Enumerate(NefPartitionQuery::standard(codim)),
            Lookup::Enumerate(NefPartitionQuery::symmetric(codim)),
        ];
        let take = if only_from_cache { 1 } else { strategies.len() };
        for strategy in strategies.into_iter().take(take) {
            if let Lookup::Enumerate(query) = strategy {
                info!(target: "toric_cy::hodge", ?query, "enumerating nef-partitions");
                poly.nef_partitions(&query)?;
            }
            if let Some(flat) = search(poly, codim, &vertices, &target) {
                debug!(target: "toric_cy::hodge", ?strategy, "matched nef-partition");
                let hpq: BTreeMap<(usize, usize), i64> =
                    diamond_order(self.dim).into_iter().zip(flat).collect();
                self.cache.borrow_mut().hodge = Some(HodgeData { hpq, chi: None });
                return Ok(true);
            }
        }
        if only_from_cache {
            Ok(false)
        } else {
            Err(CyError::CicyResolution)
        }
    }
}

fn on_vertices(part: &[usize], vertices: &BTreeSet<usize>) -> BTreeSet<usize> {
    part.iter().copied().filter(|i| vertices.contains(i)).collect()
}

/// Flattened diamond of the first cached partition matching `target`.
fn search<P: Polytope>(
    poly: &P,
    codim: usize,
    vertices: &BTreeSet<usize>,
    target: &BTreeSet<BTreeSet<usize>>,
) -> Option<Vec<i64>> {
    poly.nef_partition_cache()
        .into_iter()
        .filter(|r| {
            r.query.codim == codim
                && r.query.compute_hodge_numbers
                && !r.query.keep_products
                && !r.query.keep_projections
        })
        .find_map(|r| {
            r.partitions
                .iter()
                .position(|nef| {
                    let fs: BTreeSet<BTreeSet<usize>> =
                        nef.iter().map(|part| on_vertices(part, vertices)).collect();
                    fs == *target
                })
                .and_then(|i| r.hodge_numbers.get(i).cloned())
        })
}
