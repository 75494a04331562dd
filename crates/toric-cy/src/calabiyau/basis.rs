//! GLSM data and divisor/curve bases.
//!
//! Storage
//! - Bases are stored against triangulation indices with the origin
//!   included; `include_origin = false` is a view applied when reading or
//!   a shift applied when setting.
//! - The charge matrix is computed over `[0] + prime divisors` and scattered
//!   onto all triangulation columns (zero for divisors missing the CY), so
//!   index bases, basis matrices and Mori rays share one indexing.
//! - Divisor and curve bases are dual: `curve_mat · divisor_matᵀ = I`.

use std::collections::BTreeSet;

use nalgebra::DMatrix;
use tracing::debug;

use crate::error::CyError;
use crate::linalg::{int_det, rank, rows_of, scatter_columns, select_columns, solve_integral};
use crate::toric::{Polytope, ToricVariety, Triangulation};

use super::CalabiYau;

/// A basis given by triangulation indices or by integer rows over them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Basis {
    Indices(Vec<usize>),
    Matrix(DMatrix<i64>),
}

impl Basis {
    pub fn is_matrix(&self) -> bool {
        matches!(self, Self::Matrix(_))
    }

    /// Number of basis elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Indices(idx) => idx.len(),
            Self::Matrix(m) => m.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_indices(&self) -> Option<&[usize]> {
        match self {
            Self::Indices(idx) => Some(idx),
            Self::Matrix(_) => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&DMatrix<i64>> {
        match self {
            Self::Matrix(m) => Some(m),
            Self::Indices(_) => None,
        }
    }
}

/// Active divisor and curve bases with their matrix forms.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BasisState {
    pub divisor: Basis,
    pub divisor_mat: DMatrix<i64>,
    pub curve: Basis,
    pub curve_mat: DMatrix<i64>,
}

impl BasisState {
    /// `idx` must make every column of `q` an integral combination of `q[:, idx]`.
    fn from_indices(q: &DMatrix<i64>, idx: Vec<usize>) -> Result<Self, CyError> {
        let (h, n) = q.shape();
        if let Some(&bad) = idx.iter().find(|&&i| i >= n) {
            return Err(CyError::invalid_basis(format!("index {bad} out of range 0..{n}")));
        }
        if idx.iter().collect::<BTreeSet<_>>().len() != idx.len() {
            return Err(CyError::invalid_basis("repeated index"));
        }
        if idx.len() != h {
            return Err(CyError::invalid_basis(format!(
                "{} elements given, the class group has rank {h}",
                idx.len()
            )));
        }
        let qb = select_columns(q, &idx);
        if int_det(&rows_of(&qb)) == 0 {
            return Err(CyError::invalid_basis("elements are linearly dependent"));
        }
        let curve_mat = solve_integral(&qb, q)
            .ok_or_else(|| CyError::invalid_basis("basis does not generate the class group"))?;
        Ok(Self {
            divisor: Basis::Indices(idx.clone()),
            divisor_mat: one_hot(&idx, n),
            curve: Basis::Indices(idx),
            curve_mat,
        })
    }

    /// Rows of `d` are divisors; the dual curves are `(Q dᵀ)⁻¹ Q`.
    fn from_divisor_matrix(q: &DMatrix<i64>, d: DMatrix<i64>) -> Result<Self, CyError> {
        check_matrix_shape(q, &d)?;
        let pairing = q * d.transpose();
        let curve_mat = solve_integral(&pairing, q)
            .ok_or_else(|| CyError::invalid_basis("basis does not generate the class group"))?;
        Ok(Self {
            divisor: Basis::Matrix(d.clone()),
            divisor_mat: d,
            curve: Basis::Matrix(curve_mat.clone()),
            curve_mat,
        })
    }

    /// Rows of `c` are curve classes in the row space of `q`. The dual
    /// divisors are supported on `pivots`: `d = c[:, pivots]⁻ᵀ · E_pivots`.
    fn from_curve_matrix(
        q: &DMatrix<i64>,
        c: DMatrix<i64>,
        pivots: &[usize],
    ) -> Result<Self, CyError> {
        check_matrix_shape(q, &c)?;
        let (h, n) = q.shape();
        let stacked = DMatrix::from_fn(2 * h, n, |r, col| {
            if r < h {
                q[(r, col)]
            } else {
                c[(r - h, col)]
            }
        });
        if rank(&stacked) != h {
            return Err(CyError::invalid_basis("curves are not combinations of the charge rows"));
        }
        let cb = select_columns(&c, pivots);
        let inv = solve_integral(&cb, &DMatrix::identity(h, h))
            .ok_or_else(|| CyError::invalid_basis("curve basis is not unimodular"))?;
        let d = inv.transpose() * one_hot(pivots, n);
        Ok(Self {
            divisor: Basis::Matrix(d.clone()),
            divisor_mat: d,
            curve: Basis::Matrix(c.clone()),
            curve_mat: c,
        })
    }
}

fn check_matrix_shape(q: &DMatrix<i64>, m: &DMatrix<i64>) -> Result<(), CyError> {
    let (h, n) = q.shape();
    if m.ncols() != n {
        return Err(CyError::invalid_basis(format!(
            "matrix has {} columns, expected {n}",
            m.ncols()
        )));
    }
    if m.nrows() != h || rank(m) != h {
        return Err(CyError::invalid_basis(format!(
            "matrix must have {h} independent rows"
        )));
    }
    Ok(())
}

fn one_hot(idx: &[usize], n: usize) -> DMatrix<i64> {
    let mut m = DMatrix::zeros(idx.len(), n);
    for (r, &c) in idx.iter().enumerate() {
        m[(r, c)] = 1;
    }
    m
}

fn with_origin_column(m: DMatrix<i64>) -> DMatrix<i64> {
    m.insert_column(0, 0)
}

fn origin_error(reason: &str) -> CyError {
    CyError::BasisConsistency {
        reason: reason.into(),
    }
}

/// Matrix form of a stored basis through the origin view.
///
/// Dropping the origin from a divisor basis that uses it is an error; for
/// curves the origin column is just the pairing with K and is dropped.
fn view_matrix(
    basis: &Basis,
    mat: &DMatrix<i64>,
    include_origin: bool,
    divisors: bool,
) -> Result<DMatrix<i64>, CyError> {
    if include_origin {
        return Ok(mat.clone());
    }
    match basis {
        Basis::Indices(idx) if idx.contains(&0) => {
            Err(origin_error("the current basis contains the origin"))
        }
        Basis::Matrix(m) if divisors && m.column(0).iter().any(|&x| x != 0) => {
            Err(origin_error("the current basis matrix involves the origin"))
        }
        _ => Ok(mat.clone().remove_column(0)),
    }
}

/// Stored basis through the origin view, as indices or as a matrix.
fn view(
    basis: &Basis,
    mat: &DMatrix<i64>,
    include_origin: bool,
    as_matrix: bool,
    divisors: bool,
) -> Result<Basis, CyError> {
    match basis {
        Basis::Indices(idx) if !as_matrix => {
            if include_origin {
                Ok(Basis::Indices(idx.clone()))
            } else if idx.contains(&0) {
                Err(origin_error("the current basis contains the origin"))
            } else {
                Ok(Basis::Indices(idx.iter().map(|i| i - 1).collect()))
            }
        }
        _ => view_matrix(basis, mat, include_origin, divisors).map(Basis::Matrix),
    }
}

impl<V: ToricVariety> CalabiYau<V> {
    /// Triangulation indices `[0] + prime toric divisors`.
    pub(crate) fn divisor_points(&self) -> Result<Vec<usize>, CyError> {
        let mut pts = vec![0];
        pts.extend(self.prime_toric_divisors()?);
        Ok(pts)
    }

    /// Polytope indices of `divisor_points`.
    fn divisor_polytope_indices(&self) -> Result<Vec<usize>, CyError> {
        let tri_pts = self.triangulation().points();
        let pts: Vec<Vec<i64>> = self
            .divisor_points()?
            .iter()
            .map(|&i| tri_pts[i].clone())
            .collect();
        self.polytope().points_to_indices(&pts)
    }

    /// GLSM charge matrix over `[0] + prime_toric_divisors()`.
    pub fn glsm_charge_matrix(&self, include_origin: bool) -> Result<DMatrix<i64>, CyError> {
        let cached = self.cache.borrow().glsm_charge.clone();
        let q = match cached {
            Some(q) => q,
            None => {
                let q = self
                    .polytope()
                    .glsm_charge_matrix(&self.divisor_polytope_indices()?)?;
                self.cache.borrow_mut().glsm_charge = Some(q.clone());
                q
            }
        };
        Ok(if include_origin { q } else { q.remove_column(0) })
    }

    /// GLSM linear relations over `[0] + prime_toric_divisors()`.
    ///
    /// Without the origin the first relation, the only one involving it, is
    /// dropped together with its column.
    pub fn glsm_linear_relations(&self, include_origin: bool) -> Result<DMatrix<i64>, CyError> {
        let cached = self.cache.borrow().glsm_relations.clone();
        let rel = match cached {
            Some(r) => r,
            None => {
                let r = self
                    .polytope()
                    .glsm_linear_relations(&self.divisor_polytope_indices()?)?;
                self.cache.borrow_mut().glsm_relations = Some(r.clone());
                r
            }
        };
        Ok(if include_origin {
            rel
        } else {
            rel.remove_row(0).remove_column(0)
        })
    }

    /// Charge matrix with one column per triangulation point.
    pub(crate) fn charge_full(&self) -> Result<DMatrix<i64>, CyError> {
        let q = self.glsm_charge_matrix(true)?;
        Ok(scatter_columns(&q, &self.divisor_points()?, self.n_points()))
    }

    /// Integral GLSM basis of the CY's own divisors, as triangulation indices.
    fn default_basis(&self) -> Result<Vec<usize>, CyError> {
        let pts = self.divisor_points()?;
        let positions = self.polytope().glsm_basis(&self.divisor_polytope_indices()?)?;
        positions
            .into_iter()
            .map(|p| {
                pts.get(p).copied().ok_or_else(|| {
                    CyError::external("polytope", format!("GLSM basis position {p} out of range"))
                })
            })
            .collect()
    }

    /// Active bases, falling back to the default integral basis.
    pub(crate) fn basis_state(&self) -> Result<BasisState, CyError> {
        let cached = self.cache.borrow().basis.clone();
        if let Some(state) = cached {
            return Ok(state);
        }
        let idx = self.default_basis()?;
        debug!(target: "toric_cy::basis", ?idx, "using default divisor basis");
        let state = BasisState::from_indices(&self.charge_full()?, idx)?;
        self.cache.borrow_mut().basis = Some(state.clone());
        Ok(state)
    }

    fn install_basis(&self, state: BasisState) {
        let mut cache = self.cache.borrow_mut();
        cache.clear_in_basis();
        cache.basis = Some(state);
    }

    fn shifted(basis: Basis, include_origin: bool) -> Basis {
        match (basis, include_origin) {
            (b, true) => b,
            (Basis::Indices(idx), false) => Basis::Indices(idx.into_iter().map(|i| i + 1).collect()),
            (Basis::Matrix(m), false) => Basis::Matrix(with_origin_column(m)),
        }
    }

    /// Current divisor basis.
    ///
    /// With `include_origin = false` indices are shifted down by one and a
    /// basis matrix loses its origin column, mirroring what the setters add
    /// back. Either view fails with `BasisConsistency` when the basis uses
    /// the origin (the index 0, or a nonzero origin column).
    pub fn divisor_basis(&self, include_origin: bool, as_matrix: bool) -> Result<Basis, CyError> {
        let state = self.basis_state()?;
        view(&state.divisor, &state.divisor_mat, include_origin, as_matrix, true)
    }

    /// Divisor basis rows over triangulation columns.
    pub(crate) fn divisor_matrix(&self, include_origin: bool) -> Result<DMatrix<i64>, CyError> {
        let state = self.basis_state()?;
        view_matrix(&state.divisor, &state.divisor_mat, include_origin, true)
    }

    /// Curve basis rows over triangulation columns.
    pub(crate) fn curve_matrix(&self, include_origin: bool) -> Result<DMatrix<i64>, CyError> {
        let state = self.basis_state()?;
        view_matrix(&state.curve, &state.curve_mat, include_origin, false)
    }

    /// Current curve basis, dual to the divisor basis.
    ///
    /// A curve matrix viewed without the origin drops its origin column,
    /// which only records the pairing with the anticanonical divisor.
    pub fn curve_basis(&self, include_origin: bool, as_matrix: bool) -> Result<Basis, CyError> {
        let state = self.basis_state()?;
        view(&state.curve, &state.curve_mat, include_origin, as_matrix, false)
    }

    /// Replace the divisor basis; the curve basis becomes its dual.
    pub fn set_divisor_basis(&self, basis: Basis, include_origin: bool) -> Result<(), CyError> {
        let q = self.charge_full()?;
        let state = match Self::shifted(basis, include_origin) {
            Basis::Indices(idx) => BasisState::from_indices(&q, idx)?,
            Basis::Matrix(d) => BasisState::from_divisor_matrix(&q, d)?,
        };
        self.install_basis(state);
        Ok(())
    }

    /// Replace the curve basis; the divisor basis becomes its dual.
    ///
    /// Index bases behave exactly like `set_divisor_basis`. For a matrix the
    /// dual divisors are combinations of the default basis divisors.
    pub fn set_curve_basis(&self, basis: Basis, include_origin: bool) -> Result<(), CyError> {
        let q = self.charge_full()?;
        let state = match Self::shifted(basis, include_origin) {
            Basis::Indices(idx) => BasisState::from_indices(&q, idx)?,
            Basis::Matrix(c) => BasisState::from_curve_matrix(&q, c, &self.default_basis()?)?,
        };
        self.install_basis(state);
        Ok(())
    }
}
