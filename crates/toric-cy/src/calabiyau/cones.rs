//! Mori, Kähler and effective cones inferred from toric geometry.

use nalgebra::DMatrix;
use tracing::debug;

use crate::error::CyError;
use crate::linalg::{scatter_columns, select_columns};
use crate::toric::{Cone, ToricVariety, Triangulation};

use super::basis::Basis;
use super::cache::ConeView;
use super::CalabiYau;

impl<V: ToricVariety> CalabiYau<V> {
    /// Mori cone of the ambient variety whose rays are the prime divisors
    /// meeting the CY.
    ///
    /// Rays have one column per triangulation point unless
    /// `include_origin = false` drops column 0. With `in_basis` the rays are
    /// expressed in the curve basis dual to the current divisor basis and
    /// `include_origin` is ignored.
    pub fn toric_mori_cone(&self, in_basis: bool, include_origin: bool) -> Result<V::Cone, CyError> {
        let view = match (in_basis, include_origin) {
            (true, _) => ConeView::InBasis,
            (false, true) => ConeView::WithOrigin,
            (false, false) => ConeView::NoOrigin,
        };
        let cached = self.cache.borrow().mori.get(&view).cloned();
        if let Some(c) = cached {
            return Ok(c);
        }
        let full = self.mori_with_origin()?;
        let cone = match view {
            ConeView::WithOrigin => return Ok(full),
            ConeView::NoOrigin => {
                let check = self.basis_state()?.divisor.is_matrix();
                V::Cone::from_rays(full.rays()?.remove_column(0), check)?
            }
            ConeView::InBasis => {
                let rays = full.rays()?;
                let state = self.basis_state()?;
                match &state.divisor {
                    Basis::Indices(idx) => V::Cone::from_rays(select_columns(&rays, idx), false)?,
                    Basis::Matrix(d) => V::Cone::from_rays(rays * d.transpose(), true)?,
                }
            }
        };
        self.cache.borrow_mut().mori.insert(view, cone.clone());
        Ok(cone)
    }

    fn mori_with_origin(&self) -> Result<V::Cone, CyError> {
        let cached = self.cache.borrow().mori.get(&ConeView::WithOrigin).cloned();
        if let Some(c) = cached {
            return Ok(c);
        }
        let optimal = self.optimal_ambient_variety()?;
        let rays = optimal.mori_cone()?.rays()?;
        let cols = self
            .triangulation()
            .points_to_indices(&optimal.triangulation().points())?;
        let scattered: DMatrix<i64> = scatter_columns(&rays, &cols, self.n_points());
        debug!(target: "toric_cy::cones", rays = scattered.nrows(), "toric Mori cone");
        let cone = V::Cone::from_rays(scattered, false)?;
        self.cache
            .borrow_mut()
            .mori
            .insert(ConeView::WithOrigin, cone.clone());
        Ok(cone)
    }

    /// Dual of the Mori cone in the current basis.
    pub fn toric_kahler_cone(&self) -> Result<V::Cone, CyError> {
        Ok(self.toric_mori_cone(true, true)?.dual())
    }

    /// Cone generated by the prime toric divisor classes in the current basis.
    pub fn toric_effective_cone(&self) -> Result<V::Cone, CyError> {
        let cached = self.cache.borrow().effective.clone();
        if let Some(c) = cached {
            return Ok(c);
        }
        let cone = V::Cone::from_rays(self.curve_matrix(false)?.transpose(), true)?;
        self.cache.borrow_mut().effective = Some(cone.clone());
        Ok(cone)
    }
}
