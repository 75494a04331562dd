//! Kähler-cone-local tensors at a point `t` given in the divisor basis.
//!
//! All four contract the basis-view float intersection numbers with `t`:
//! - volume `V = κ t^d / d!`
//! - divisor volumes `τ_i = κ_i t^{d-1} / (d-1)!`
//! - `AA_ij = κ_ijk t^k` (3-folds)
//! - inverse Kähler metric `K⁻¹ = 4 (τ τᵀ - V · AA)` (3-folds)

use nalgebra::{DMatrix, DVector};

use crate::cfg::IntNumsCfg;
use crate::error::CyError;
use crate::tensor::{factorial, DenseTensor, IntNums};
use crate::toric::ToricVariety;

use super::CalabiYau;

/// Contract the last axis `times` times.
fn contract(t: &DenseTensor<f64>, tloc: &[f64], times: usize) -> DenseTensor<f64> {
    (0..times).fold(t.clone(), |acc, _| acc.contract_last(tloc))
}

fn shape_err(what: &'static str) -> CyError {
    CyError::external("tensor", format!("{what}: unexpected tensor rank"))
}

impl<V: ToricVariety> CalabiYau<V> {
    fn basis_intnums_at(&self, tloc: &[f64]) -> Result<IntNums<f64>, CyError> {
        let h = self.basis_state()?.divisor.len();
        if tloc.len() != h {
            return Err(CyError::Shape {
                what: "Kähler parameter vector",
                expected: h,
                got: tloc.len(),
            });
        }
        self.intersection_numbers(&IntNumsCfg::in_basis())
    }

    fn require_threefold(&self, op: &'static str) -> Result<(), CyError> {
        if self.dim != 3 {
            return Err(CyError::UnsupportedDimension { op, dim: self.dim });
        }
        Ok(())
    }

    /// Volume of the Calabi–Yau at `tloc`.
    pub fn compute_cy_volume(&self, tloc: &[f64]) -> Result<f64, CyError> {
        let d = self.dim;
        let norm = factorial(d) as f64;
        match self.basis_intnums_at(tloc)? {
            IntNums::Dense(t) => contract(&t, tloc, d)
                .scalar()
                .map(|v| v / norm)
                .ok_or_else(|| shape_err("volume")),
            IntNums::Sparse(t) => {
                let mut vol = 0.0;
                t.for_each_permutation(|key, v| {
                    vol += v * key.iter().map(|&i| tloc[i]).product::<f64>();
                });
                Ok(vol / norm)
            }
        }
    }

    /// Volumes of the basis divisors at `tloc`.
    pub fn compute_divisor_volumes(&self, tloc: &[f64]) -> Result<DVector<f64>, CyError> {
        let d = self.dim;
        let norm = factorial(d.saturating_sub(1)) as f64;
        match self.basis_intnums_at(tloc)? {
            IntNums::Dense(t) => contract(&t, tloc, d.saturating_sub(1))
                .to_vector()
                .map(|v| v / norm)
                .ok_or_else(|| shape_err("divisor volumes")),
            IntNums::Sparse(t) => {
                let mut tau = DVector::zeros(tloc.len());
                t.for_each_permutation(|key, v| {
                    tau[key[0]] += v * key[1..].iter().map(|&i| tloc[i]).product::<f64>();
                });
                Ok(tau / norm)
            }
        }
    }

    /// `κ_ijk t^k` at `tloc`.
    pub fn compute_aa(&self, tloc: &[f64]) -> Result<DMatrix<f64>, CyError> {
        self.require_threefold("compute_aa")?;
        match self.basis_intnums_at(tloc)? {
            IntNums::Dense(t) => t
                .contract_last(tloc)
                .to_matrix()
                .ok_or_else(|| shape_err("AA")),
            IntNums::Sparse(t) => {
                let h = tloc.len();
                let mut aa = DMatrix::zeros(h, h);
                t.for_each_permutation(|key, v| {
                    aa[(key[0], key[1])] += v * tloc[key[2]];
                });
                Ok(aa)
            }
        }
    }

    /// Inverse Kähler metric at `tloc`.
    pub fn compute_kinv(&self, tloc: &[f64]) -> Result<DMatrix<f64>, CyError> {
        self.require_threefold("compute_kinv")?;
        let vol = self.compute_cy_volume(tloc)?;
        let tau = self.compute_divisor_volumes(tloc)?;
        let aa = self.compute_aa(tloc)?;
        Ok((&tau * tau.transpose() - aa * vol) * 4.0)
    }
}
