use std::collections::BTreeSet;
use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::error::CyError;
use crate::linalg::{combinations, dot, gcd, int_det, normal_of, primitive, rank, rows_of, select_columns};
use crate::toric::Cone;

const COMPONENT: &str = "cone";
const TIP_MAX_SWEEPS: usize = 10_000;

/// Rational polyhedral cone in one of its two representations.
///
/// `dual` swaps the representations without computation; the other one is
/// derived on demand by enumerating `(n-1)`-subsets of the stored vectors.
#[derive(Clone, Debug, PartialEq)]
pub enum FixedCone {
    /// Cone generated by the rows.
    Rays { ambient_dim: usize, rays: DMatrix<i64> },
    /// `{x : h · x >= 0}` for every row `h`.
    Hyperplanes { ambient_dim: usize, normals: DMatrix<i64> },
}

impl FixedCone {
    pub fn from_hyperplanes(normals: DMatrix<i64>) -> Self {
        Self::Hyperplanes {
            ambient_dim: normals.ncols(),
            normals,
        }
    }

    /// Inward facet normals.
    pub fn hyperplanes(&self) -> Result<DMatrix<i64>, CyError> {
        match self {
            Self::Hyperplanes { normals, .. } => Ok(normals.clone()),
            Self::Rays { ambient_dim, rays } => extreme_rays(rays, *ambient_dim),
        }
    }
}

impl Cone for FixedCone {
    fn from_rays(rays: DMatrix<i64>, check: bool) -> Result<Self, CyError> {
        let ambient_dim = rays.ncols();
        if !check {
            return Ok(Self::Rays { ambient_dim, rays });
        }
        if ambient_dim == 0 {
            return Err(CyError::external(COMPONENT, "rays must have positive dimension"));
        }
        let kept: BTreeSet<Vec<i64>> = rows_of(&rays)
            .into_iter()
            .filter(|r| r.iter().any(|&x| x != 0))
            .map(|r| primitive(&r))
            .collect();
        let kept: Vec<Vec<i64>> = kept.into_iter().collect();
        Ok(Self::Rays {
            ambient_dim,
            rays: crate::linalg::from_rows(&kept, ambient_dim),
        })
    }

    fn rays(&self) -> Result<DMatrix<i64>, CyError> {
        match self {
            Self::Rays { rays, .. } => Ok(rays.clone()),
            Self::Hyperplanes {
                ambient_dim,
                normals,
            } => extreme_rays(normals, *ambient_dim),
        }
    }

    fn dual(&self) -> Self {
        match self.clone() {
            Self::Rays { ambient_dim, rays } => Self::Hyperplanes {
                ambient_dim,
                normals: rays,
            },
            Self::Hyperplanes {
                ambient_dim,
                normals,
            } => Self::Rays {
                ambient_dim,
                rays: normals,
            },
        }
    }

    fn tip_of_stretched_cone(&self, c: f64) -> Result<DVector<f64>, CyError> {
        let h = crate::linalg::to_f64(&self.hyperplanes()?);
        let n = self.ambient_dim();
        let mut x = DVector::zeros(n);
        let rows: Vec<DVector<f64>> = h
            .row_iter()
            .map(|r| r.transpose().into_owned())
            .filter(|r: &DVector<f64>| r.norm_squared() > 0.0)
            .collect();
        // Relaxation: project onto each violated half-space until all hold.
        for _ in 0..TIP_MAX_SWEEPS {
            let mut moved = false;
            for r in &rows {
                let gap = c - r.dot(&x);
                if gap > 0.0 {
                    x += r * (gap / r.norm_squared());
                    moved = true;
                }
            }
            if !moved {
                return Ok(x);
            }
        }
        Err(CyError::external(COMPONENT, "stretched cone is empty"))
    }

    fn is_smooth(&self) -> Result<bool, CyError> {
        let rays = self.rays()?;
        let k = rays.nrows();
        if k == 0 {
            return Ok(true);
        }
        if rank(&rays) < k {
            return Ok(false);
        }
        let g = combinations(rays.ncols(), k)
            .into_iter()
            .map(|cols| int_det(&rows_of(&select_columns(&rays, &cols))))
            .fold(0, gcd);
        Ok(g == 1)
    }

    fn ambient_dim(&self) -> usize {
        match self {
            Self::Rays { ambient_dim, .. } | Self::Hyperplanes { ambient_dim, .. } => *ambient_dim,
        }
    }

    fn dim(&self) -> Result<usize, CyError> {
        Ok(rank(&self.rays()?))
    }
}

impl fmt::Display for FixedCone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rays() {
            Ok(rays) => write!(
                f,
                "A {}-dimensional rational polyhedral cone in RR^{} generated by {} rays",
                rank(&rays),
                self.ambient_dim(),
                rays.nrows()
            ),
            Err(_) => write!(
                f,
                "A rational polyhedral cone in RR^{}",
                self.ambient_dim()
            ),
        }
    }
}

/// Extreme rays of `{x : h · x >= 0}` for a pointed cone, sorted.
fn extreme_rays(normals: &DMatrix<i64>, n: usize) -> Result<DMatrix<i64>, CyError> {
    let h = rows_of(normals);
    let feasible = |x: &[i64]| h.iter().all(|r| dot(r, x) >= 0);
    let mut out = BTreeSet::new();
    if n == 1 {
        for x in [vec![1], vec![-1]] {
            if feasible(&x) {
                out.insert(x);
            }
        }
    } else {
        for comb in combinations(h.len(), n - 1) {
            let rows: Vec<Vec<i64>> = comb.iter().map(|&i| h[i].clone()).collect();
            let v = primitive(&normal_of(&rows, n));
            if v.iter().all(|&x| x == 0) {
                continue;
            }
            let neg: Vec<i64> = v.iter().map(|x| -x).collect();
            for x in [v, neg] {
                if feasible(&x) {
                    out.insert(x);
                }
            }
        }
    }
    if out.is_empty() && n > 1 && h.is_empty() {
        return Err(CyError::external(COMPONENT, "cone is not pointed"));
    }
    let out: Vec<Vec<i64>> = out.into_iter().collect();
    Ok(crate::linalg::from_rows(&out, n))
}
