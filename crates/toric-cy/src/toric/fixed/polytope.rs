//! Lattice polytope from explicit points with brute-force facets.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use nalgebra::DMatrix;

use crate::error::CyError;
use crate::linalg::{combinations, dot, int_det, normal_of, primitive, rank_rows, select_columns};
use crate::toric::{Lattice, NefPartitionQuery, NefPartitionRecord, Polytope};

const COMPONENT: &str = "polytope";

/// Outward facet inequality `normal · x <= offset`, `normal` primitive.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Facet {
    pub normal: Vec<i64>,
    pub offset: i64,
}

impl Facet {
    #[inline]
    pub fn is_tight(&self, p: &[i64]) -> bool {
        dot(&self.normal, p) == self.offset
    }
}

/// Lattice polytope holding all of its lattice points.
///
/// Invariants:
/// - Full-dimensional unless built by `from_points` from a lower-dimensional
///   set, in which case it has no facets and keeps only its generators.
/// - `points[0]` is the origin when the origin is a lattice point of the
///   polytope; the rest keep the caller's order (or lexicographic order
///   for hulls computed by `from_points`).
/// - Equality and hashing see the point set, not the order.
/// - Hodge data, favorability and the nef-partition catalogue are supplied
///   by the builder methods; enumerations move catalogue entries into the
///   cache reported by `nef_partition_cache`.
#[derive(Debug)]
pub struct FixedPolytope {
    points: Vec<Vec<i64>>,
    dim: usize,
    facets: Vec<Facet>,
    hodge: BTreeMap<(usize, usize), i64>,
    chi: Option<i64>,
    favorable: bool,
    catalogue: Vec<NefPartitionRecord>,
    enumerated: RefCell<Vec<NefPartitionRecord>>,
}

impl FixedPolytope {
    /// Polytope with exactly these lattice points, in this order.
    ///
    /// Fails when the points are not full-dimensional or when the hull has
    /// lattice points that are not listed.
    pub fn new(points: Vec<Vec<i64>>) -> Result<Self, CyError> {
        let dim = points.first().map_or(0, Vec::len);
        if dim == 0 || points.iter().any(|p| p.len() != dim) {
            return Err(CyError::external(COMPONENT, "points must share a positive dimension"));
        }
        let facets = hull_facets(&points, dim)?;
        let listed: BTreeSet<&Vec<i64>> = points.iter().collect();
        if listed.len() != points.len() {
            return Err(CyError::external(COMPONENT, "duplicate points"));
        }
        let all = lattice_points(&points, &facets, dim);
        if all.len() != points.len() {
            return Err(CyError::external(
                COMPONENT,
                format!("hull has {} lattice points, {} listed", all.len(), points.len()),
            ));
        }
        Ok(Self::bare(points, dim, facets))
    }

    fn bare(points: Vec<Vec<i64>>, dim: usize, facets: Vec<Facet>) -> Self {
        Self {
            points,
            dim,
            facets,
            hodge: BTreeMap::new(),
            chi: None,
            favorable: true,
            catalogue: Vec::new(),
            enumerated: RefCell::new(Vec::new()),
        }
    }

    /// Record lattice Hodge numbers `h^{p,q}` of the anticanonical hypersurface.
    pub fn with_hodge_numbers(mut self, hpq: &[((usize, usize), i64)]) -> Self {
        for &((p, q), v) in hpq {
            self.hodge.insert((p, q), v);
            self.hodge.insert((q, p), v);
        }
        self
    }

    pub fn with_chi(mut self, chi: i64) -> Self {
        self.chi = Some(chi);
        self
    }

    pub fn with_favorable(mut self, favorable: bool) -> Self {
        self.favorable = favorable;
        self
    }

    /// Nef-partitions that an enumeration with the record's query would find.
    pub fn with_nef_partitions(mut self, record: NefPartitionRecord) -> Self {
        self.catalogue.push(record);
        self
    }

    /// Pretend `query` has already been enumerated.
    pub fn with_cached_nef_partitions(self, record: NefPartitionRecord) -> Self {
        self.enumerated.borrow_mut().push(record);
        self
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    fn sorted_points(&self) -> Vec<&Vec<i64>> {
        let mut pts: Vec<&Vec<i64>> = self.points.iter().collect();
        pts.sort();
        pts
    }

    fn tight_facets(&self, p: &[i64]) -> BTreeSet<usize> {
        self.facets
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_tight(p))
            .map(|(i, _)| i)
            .collect()
    }

    /// Point-index sets of all faces (closure of facet intersections).
    fn face_index_sets(&self) -> BTreeSet<BTreeSet<usize>> {
        let mut faces: BTreeSet<BTreeSet<usize>> = self
            .facets
            .iter()
            .map(|f| {
                (0..self.points.len())
                    .filter(|&i| f.is_tight(&self.points[i]))
                    .collect()
            })
            .collect();
        loop {
            let current: Vec<BTreeSet<usize>> = faces.iter().cloned().collect();
            let mut grew = false;
            for (a, fa) in current.iter().enumerate() {
                for fb in &current[a + 1..] {
                    let meet: BTreeSet<usize> = fa.intersection(fb).copied().collect();
                    if !meet.is_empty() && faces.insert(meet) {
                        grew = true;
                    }
                }
            }
            if !grew {
                return faces;
            }
        }
    }

    fn affine_dim(&self, idx: &BTreeSet<usize>) -> usize {
        let mut it = idx.iter();
        let Some(&first) = it.next() else {
            return 0;
        };
        let base = &self.points[first];
        let diffs: Vec<Vec<i64>> = it
            .map(|&i| self.points[i].iter().zip(base).map(|(a, b)| a - b).collect())
            .collect();
        rank_rows(&diffs)
    }

    fn homogenized(&self, points: &[usize]) -> Result<DMatrix<i64>, CyError> {
        if let Some(&bad) = points.iter().find(|&&i| i >= self.points.len()) {
            return Err(CyError::external(COMPONENT, format!("point index {bad} out of range")));
        }
        Ok(DMatrix::from_fn(self.dim + 1, points.len(), |r, c| {
            if r == 0 {
                1
            } else {
                self.points[points[c]][r - 1]
            }
        }))
    }

    /// First unimodular column set (lexicographic) of the homogenized points.
    fn unimodular_pivots(&self, a: &DMatrix<i64>) -> Result<Vec<usize>, CyError> {
        combinations(a.ncols(), a.nrows())
            .into_iter()
            .find(|cols| {
                let sub = select_columns(a, cols);
                int_det(&crate::linalg::rows_of(&sub)).abs() == 1
            })
            .ok_or_else(|| CyError::external(COMPONENT, "no unimodular GLSM basis"))
    }
}

impl PartialEq for FixedPolytope {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_points() == other.sorted_points()
    }
}

impl Hash for FixedPolytope {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted_points().hash(state);
    }
}

impl Polytope for FixedPolytope {
    fn from_points(points: &[Vec<i64>]) -> Result<Self, CyError> {
        let dim = points.first().map_or(0, Vec::len);
        if dim == 0 || points.iter().any(|p| p.len() != dim) {
            return Err(CyError::external(COMPONENT, "points must share a positive dimension"));
        }
        let origin = vec![0; dim];
        let origin_first = |mut all: Vec<Vec<i64>>| {
            if let Some(pos) = all.iter().position(|p| *p == origin) {
                let o = all.remove(pos);
                all.insert(0, o);
            }
            all
        };
        if !is_full_dimensional(points, dim) {
            // Lower-dimensional hulls keep their generators; they only feed
            // Minkowski sums, whose lattice points are recomputed.
            let distinct: BTreeSet<Vec<i64>> = points.iter().cloned().collect();
            return Ok(Self::bare(origin_first(distinct.into_iter().collect()), dim, Vec::new()));
        }
        let facets = hull_facets(points, dim)?;
        let all = origin_first(lattice_points(points, &facets, dim));
        Ok(Self::bare(all, dim, facets))
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn points(&self) -> &[Vec<i64>] {
        &self.points
    }

    fn points_not_interior_to_facets(&self) -> Vec<Vec<i64>> {
        self.points
            .iter()
            .filter(|p| self.tight_facets(p).len() != 1)
            .cloned()
            .collect()
    }

    fn points_to_indices(&self, pts: &[Vec<i64>]) -> Result<Vec<usize>, CyError> {
        pts.iter()
            .map(|p| {
                self.points
                    .iter()
                    .position(|q| q == p)
                    .ok_or_else(|| CyError::external(COMPONENT, format!("{p:?} is not a point")))
            })
            .collect()
    }

    fn vertices(&self) -> Vec<Vec<i64>> {
        self.points
            .iter()
            .filter(|p| {
                let tight = self.tight_facets(p);
                !tight.is_empty()
                    && self
                        .points
                        .iter()
                        .filter(|q| tight.iter().all(|&f| self.facets[f].is_tight(q)))
                        .count()
                        == 1
            })
            .cloned()
            .collect()
    }

    fn faces(&self, dim: usize) -> Vec<Vec<Vec<i64>>> {
        self.face_index_sets()
            .into_iter()
            .filter(|f| self.affine_dim(f) == dim)
            .map(|f| f.into_iter().map(|i| self.points[i].clone()).collect())
            .collect()
    }

    fn is_reflexive(&self) -> bool {
        !self.facets.is_empty() && self.facets.iter().all(|f| f.offset == 1)
    }

    fn is_favorable(&self, _lattice: Lattice) -> bool {
        self.favorable
    }

    fn minkowski_sum(&self, other: &Self) -> Result<Self, CyError> {
        let sums: BTreeSet<Vec<i64>> = self
            .points
            .iter()
            .flat_map(|a| {
                other
                    .points
                    .iter()
                    .map(move |b| a.iter().zip(b).map(|(x, y)| x + y).collect())
            })
            .collect();
        let sums: Vec<Vec<i64>> = sums.into_iter().collect();
        Self::from_points(&sums)
    }

    fn glsm_charge_matrix(&self, points: &[usize]) -> Result<DMatrix<i64>, CyError> {
        let a = self.homogenized(points)?;
        let pivots = self.unimodular_pivots(&a)?;
        let basis = self.glsm_basis(points)?;
        let ap = crate::linalg::to_f64(&select_columns(&a, &pivots));
        let lu = ap.lu();
        let mut q = DMatrix::zeros(basis.len(), points.len());
        for (row, &b) in basis.iter().enumerate() {
            let col = crate::linalg::to_f64(&a.columns(b, 1).into_owned());
            let c = lu
                .solve(&col)
                .and_then(|c| crate::linalg::round_integral(&c))
                .ok_or_else(|| CyError::external(COMPONENT, "singular GLSM pivot block"))?;
            q[(row, b)] = 1;
            for (k, &p) in pivots.iter().enumerate() {
                q[(row, p)] = -c[k];
            }
        }
        Ok(q)
    }

    fn glsm_linear_relations(&self, points: &[usize]) -> Result<DMatrix<i64>, CyError> {
        let a = self.homogenized(points)?;
        let pivots = self.unimodular_pivots(&a)?;
        crate::linalg::solve_integral(&select_columns(&a, &pivots), &a)
            .ok_or_else(|| CyError::external(COMPONENT, "singular GLSM pivot block"))
    }

    fn glsm_basis(&self, points: &[usize]) -> Result<Vec<usize>, CyError> {
        let a = self.homogenized(points)?;
        let pivots = self.unimodular_pivots(&a)?;
        Ok((0..points.len()).filter(|c| !pivots.contains(c)).collect())
    }

    fn hpq(&self, p: usize, q: usize, _lattice: Lattice) -> Result<i64, CyError> {
        self.hodge
            .get(&(p, q))
            .copied()
            .ok_or_else(|| CyError::external(COMPONENT, format!("no h^{{{p},{q}}} recorded")))
    }

    fn chi(&self, _lattice: Lattice) -> Result<i64, CyError> {
        self.chi
            .ok_or_else(|| CyError::external(COMPONENT, "no Euler characteristic recorded"))
    }

    fn nef_partition_cache(&self) -> Vec<NefPartitionRecord> {
        self.enumerated.borrow().clone()
    }

    fn nef_partitions(&self, query: &NefPartitionQuery) -> Result<(), CyError> {
        let mut done = self.enumerated.borrow_mut();
        if done.iter().any(|r| r.query == *query) {
            return Ok(());
        }
        match self.catalogue.iter().find(|r| r.query == *query) {
            Some(r) => done.push(r.clone()),
            None => done.push(NefPartitionRecord {
                query: *query,
                partitions: Vec::new(),
                hodge_numbers: Vec::new(),
            }),
        }
        Ok(())
    }
}

/// Facets of the convex hull of `points`, by enumerating `dim`-subsets.
fn hull_facets(points: &[Vec<i64>], dim: usize) -> Result<Vec<Facet>, CyError> {
    if !is_full_dimensional(points, dim) {
        return Err(CyError::external(COMPONENT, "points are not full-dimensional"));
    }
    let mut out = BTreeSet::new();
    for comb in combinations(points.len(), dim) {
        let p0 = &points[comb[0]];
        let rows: Vec<Vec<i64>> = comb[1..]
            .iter()
            .map(|&i| points[i].iter().zip(p0).map(|(a, b)| a - b).collect())
            .collect();
        let n = primitive(&normal_of(&rows, dim));
        if n.iter().all(|&x| x == 0) {
            continue;
        }
        let c = dot(&n, p0);
        let vals: Vec<i64> = points.iter().map(|p| dot(&n, p)).collect();
        if vals.iter().all(|&v| v <= c) {
            out.insert(Facet { normal: n, offset: c });
        } else if vals.iter().all(|&v| v >= c) {
            out.insert(Facet {
                normal: n.iter().map(|x| -x).collect(),
                offset: -c,
            });
        }
    }
    Ok(out.into_iter().collect())
}

fn is_full_dimensional(points: &[Vec<i64>], dim: usize) -> bool {
    let Some(base) = points.first() else {
        return false;
    };
    let diffs: Vec<Vec<i64>> = points
        .iter()
        .map(|p| p.iter().zip(base).map(|(a, b)| a - b).collect())
        .collect();
    rank_rows(&diffs) == dim
}

/// Lattice points of the hull (bounding box filtered by facets), sorted.
fn lattice_points(points: &[Vec<i64>], facets: &[Facet], dim: usize) -> Vec<Vec<i64>> {
    let lo: Vec<i64> = (0..dim).map(|k| points.iter().map(|p| p[k]).min().unwrap_or(0)).collect();
    let hi: Vec<i64> = (0..dim).map(|k| points.iter().map(|p| p[k]).max().unwrap_or(0)).collect();
    let mut out = Vec::new();
    let mut cur = lo.clone();
    loop {
        if facets.iter().all(|f| dot(&f.normal, &cur) <= f.offset) {
            out.push(cur.clone());
        }
        let Some(k) = (0..dim).rev().find(|&k| cur[k] < hi[k]) else {
            break;
        };
        cur[k] += 1;
        for j in k + 1..dim {
            cur[j] = lo[j];
        }
    }
    out
}
