use std::cell::Cell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use nalgebra::DMatrix;
use num_rational::Rational64;
use tracing::debug;

use crate::cfg::SolverOpts;
use crate::error::CyError;
use crate::tensor::{Coeff, SymTensor};
use crate::toric::{Cone, ToricVariety, Triangulation};

use super::cone::FixedCone;
use super::polytope::FixedPolytope;
use super::triangulation::FixedTriangulation;

const COMPONENT: &str = "toric variety";

/// Toric variety with a precomputed intersection ring and Mori cone.
///
/// Invariants:
/// - `intnums` has rank `dim` and indexes triangulation points (origin = K).
/// - `mori_rays` has one column per triangulation point.
#[derive(Debug)]
pub struct FixedVariety {
    triangulation: FixedTriangulation,
    intnums: SymTensor<Rational64>,
    mori_rays: DMatrix<i64>,
    restrictions: Vec<(Vec<usize>, Rc<FixedVariety>)>,
    clears: Cell<usize>,
}

impl FixedVariety {
    pub fn new(
        triangulation: FixedTriangulation,
        intnums: SymTensor<Rational64>,
        mori_rays: DMatrix<i64>,
    ) -> Result<Self, CyError> {
        let n = triangulation.point_indices().len();
        if intnums.rank() != triangulation.dim() {
            return Err(CyError::external(
                COMPONENT,
                format!("intersection numbers have rank {}, expected {}", intnums.rank(), triangulation.dim()),
            ));
        }
        if intnums.support().iter().any(|&i| i >= n) {
            return Err(CyError::external(COMPONENT, "intersection index out of range"));
        }
        if mori_rays.ncols() != n {
            return Err(CyError::external(
                COMPONENT,
                format!("Mori rays have {} columns, expected {n}", mori_rays.ncols()),
            ));
        }
        Ok(Self {
            triangulation,
            intnums,
            mori_rays,
            restrictions: Vec::new(),
            clears: Cell::new(0),
        })
    }

    /// Register the variety returned by `restricted` for these polytope indices.
    pub fn with_restriction(mut self, points: Vec<usize>, variety: Rc<FixedVariety>) -> Self {
        self.restrictions.push((points, variety));
        self
    }

    /// Number of `clear_cache` calls received.
    pub fn cache_clears(&self) -> usize {
        self.clears.get()
    }
}

impl Hash for FixedVariety {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.triangulation.hash(state);
    }
}

impl ToricVariety for FixedVariety {
    type Polytope = FixedPolytope;
    type Triangulation = FixedTriangulation;
    type Cone = FixedCone;

    fn dim(&self) -> usize {
        self.triangulation.dim()
    }

    fn triangulation(&self) -> &FixedTriangulation {
        &self.triangulation
    }

    fn intersection_numbers(&self, opts: &SolverOpts) -> Result<SymTensor<f64>, CyError> {
        let mut out = self.intnums.convert(|v| Coeff::to_f64(v));
        out.retain(|_, v| v.abs() > opts.round_to_zero_threshold);
        Ok(out)
    }

    fn intersection_numbers_exact(
        &self,
        _opts: &SolverOpts,
    ) -> Result<SymTensor<Rational64>, CyError> {
        Ok(self.intnums.clone())
    }

    fn mori_cone(&self) -> Result<FixedCone, CyError> {
        FixedCone::from_rays(self.mori_rays.clone(), false)
    }

    fn clear_cache(&self, recursive: bool) {
        self.clears.set(self.clears.get() + 1);
        if recursive {
            debug!(target: "toric_cy::toric", "fixed data has no polytope cache to clear");
        }
    }

    fn restricted(&self, points: &[usize], heights: &[f64]) -> Result<Rc<Self>, CyError> {
        debug!(target: "toric_cy::toric", ?points, ?heights, "restricting triangulation");
        self.restrictions
            .iter()
            .find(|(p, _)| p.as_slice() == points)
            .map(|(_, v)| Rc::clone(v))
            .ok_or_else(|| {
                CyError::external(COMPONENT, format!("no triangulation of points {points:?}"))
            })
    }
}
