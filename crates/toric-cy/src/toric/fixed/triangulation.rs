use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::CyError;
use crate::linalg::combinations;
use crate::toric::{Polytope, Triangulation};

use super::polytope::FixedPolytope;

const COMPONENT: &str = "triangulation";

/// Star triangulation given by explicit simplices.
///
/// Invariants:
/// - `point_indices[0]` is the polytope index of the origin.
/// - Simplices are sorted lists of triangulation indices.
#[derive(Debug)]
pub struct FixedTriangulation {
    polytope: Rc<FixedPolytope>,
    point_indices: Vec<usize>,
    simplices: Vec<Vec<usize>>,
}

impl FixedTriangulation {
    /// `points` are polytope indices (origin first); `simplices` index into `points`.
    pub fn new(
        polytope: Rc<FixedPolytope>,
        points: Vec<usize>,
        simplices: Vec<Vec<usize>>,
    ) -> Result<Self, CyError> {
        let n = polytope.points().len();
        if points.iter().any(|&i| i >= n) {
            return Err(CyError::external(COMPONENT, "point index out of range"));
        }
        let origin = vec![0; polytope.dim()];
        if points.first().map(|&i| &polytope.points()[i]) != Some(&origin) {
            return Err(CyError::external(COMPONENT, "first point must be the origin"));
        }
        let width = polytope.dim() + 1;
        let mut simplices = simplices;
        for s in &mut simplices {
            if s.len() != width || s.iter().any(|&i| i >= points.len()) {
                return Err(CyError::external(COMPONENT, format!("malformed simplex {s:?}")));
            }
            s.sort_unstable();
        }
        Ok(Self {
            polytope,
            point_indices: points,
            simplices,
        })
    }

    pub fn polytope_rc(&self) -> &Rc<FixedPolytope> {
        &self.polytope
    }

    /// Polytope indices of the triangulation's points.
    pub fn point_indices(&self) -> &[usize] {
        &self.point_indices
    }
}

impl Hash for FixedTriangulation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.points().hash(state);
        self.simplices.hash(state);
    }
}

impl Triangulation for FixedTriangulation {
    type Polytope = FixedPolytope;

    fn polytope(&self) -> &FixedPolytope {
        &self.polytope
    }

    fn points(&self) -> Vec<Vec<i64>> {
        self.point_indices
            .iter()
            .map(|&i| self.polytope.points()[i].clone())
            .collect()
    }

    fn simplices(&self) -> Vec<Vec<usize>> {
        self.simplices.clone()
    }

    fn points_to_indices(&self, pts: &[Vec<i64>]) -> Result<Vec<usize>, CyError> {
        let own = self.points();
        pts.iter()
            .map(|p| {
                own.iter().position(|q| q == p).ok_or_else(|| {
                    CyError::external(COMPONENT, format!("{p:?} is not a triangulation point"))
                })
            })
            .collect()
    }

    fn is_fine(&self) -> bool {
        let used: BTreeSet<usize> = self.simplices.iter().flatten().copied().collect();
        used.len() == self.point_indices.len()
    }

    fn fan_cones(&self, d: usize, face_dim: usize) -> Vec<Vec<usize>> {
        let points = self.points();
        let faces: Vec<BTreeSet<Vec<i64>>> = self
            .polytope
            .faces(face_dim)
            .into_iter()
            .map(|f| f.into_iter().collect())
            .collect();
        let mut out = BTreeSet::new();
        for s in &self.simplices {
            let rays: Vec<usize> = s.iter().copied().filter(|&i| i != 0).collect();
            for comb in combinations(rays.len(), d) {
                let cone: Vec<usize> = comb.iter().map(|&k| rays[k]).collect();
                if faces
                    .iter()
                    .any(|f| cone.iter().all(|&i| f.contains(&points[i])))
                {
                    out.insert(cone);
                }
            }
        }
        out.into_iter().collect()
    }

    fn dim(&self) -> usize {
        self.polytope.dim()
    }
}
