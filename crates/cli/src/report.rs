//! Serializable reports built from a Calabi–Yau model.

use anyhow::{ensure, Result};
use serde::Serialize;
use toric_cy::api::{Basis, CalabiYau, Cone, DMatrix, IntNums, IntNumsCfg, ToricVariety};
use toric_cy::linalg::rows_of;

/// A basis as written to JSON: indices or integer rows.
#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BasisOut {
    Indices(Vec<usize>),
    Matrix(Vec<Vec<i64>>),
}

impl From<Basis> for BasisOut {
    fn from(b: Basis) -> Self {
        match b {
            Basis::Indices(idx) => Self::Indices(idx),
            Basis::Matrix(m) => Self::Matrix(rows_of(&m)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Description {
    pub description: String,
    pub dim: usize,
    pub ambient_dim: usize,
    pub hypersurface: bool,
    pub nef_partition: Option<Vec<Vec<usize>>>,
    /// Missing when the Hodge numbers are unavailable in this dimension.
    pub hodge_diamond: Option<Vec<Vec<i64>>>,
    pub chi: Option<i64>,
    pub smooth: bool,
    pub prime_toric_divisors: Vec<usize>,
    pub divisor_basis: BasisOut,
    pub second_chern_class: Option<Vec<i64>>,
}

pub fn describe<V: ToricVariety>(cy: &CalabiYau<V>) -> Result<Description> {
    Ok(Description {
        description: cy.to_string(),
        dim: cy.dim(),
        ambient_dim: cy.ambient_dim(),
        hypersurface: cy.is_hypersurface(),
        nef_partition: cy.nef_partition().map(<[_]>::to_vec),
        hodge_diamond: cy.hodge_diamond().ok(),
        chi: cy.chi().ok(),
        smooth: cy.is_smooth()?,
        prime_toric_divisors: cy.prime_toric_divisors()?,
        divisor_basis: cy.divisor_basis(true, false)?.into(),
        second_chern_class: cy.second_chern_class(true).ok(),
    })
}

#[derive(Debug, PartialEq, Serialize)]
pub struct SparseEntry {
    pub key: Vec<usize>,
    pub value: f64,
}

/// Intersection numbers as written to JSON.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum IntNumsOut {
    /// Canonical (sorted) keys only.
    Sparse { rank: usize, entries: Vec<SparseEntry> },
    /// Row-major entries of a `side^rank` tensor.
    Dense { side: usize, rank: usize, data: Vec<f64> },
}

pub fn intnums<V: ToricVariety>(cy: &CalabiYau<V>, cfg: &IntNumsCfg) -> Result<IntNumsOut> {
    Ok(match cy.intersection_numbers(cfg)? {
        IntNums::Sparse(t) => IntNumsOut::Sparse {
            rank: t.rank(),
            entries: t
                .iter()
                .map(|(key, value)| SparseEntry {
                    key: key.to_vec(),
                    value,
                })
                .collect(),
        },
        IntNums::Dense(t) => IntNumsOut::Dense {
            side: t.side(),
            rank: t.rank(),
            data: t.data().to_vec(),
        },
    })
}

/// Cone rays in the current bases.
#[derive(Debug, Serialize)]
pub struct Cones {
    pub mori: Vec<Vec<i64>>,
    pub kahler: Vec<Vec<i64>>,
    pub effective: Vec<Vec<i64>>,
}

pub fn cones<V: ToricVariety>(cy: &CalabiYau<V>) -> Result<Cones> {
    Ok(Cones {
        mori: rows_of(&cy.toric_mori_cone(true, true)?.rays()?),
        kahler: rows_of(&cy.toric_kahler_cone()?.rays()?),
        effective: rows_of(&cy.toric_effective_cone()?.rays()?),
    })
}

#[derive(Debug, Serialize)]
pub struct KahlerReport {
    pub t: Vec<f64>,
    pub volume: f64,
    pub divisor_volumes: Vec<f64>,
    pub aa: Vec<Vec<f64>>,
    pub kinv: Vec<Vec<f64>>,
}

fn float_rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter().map(|r| r.iter().copied().collect()).collect()
}

pub fn kahler<V: ToricVariety>(cy: &CalabiYau<V>, t: &[f64]) -> Result<KahlerReport> {
    ensure!(cy.dim() == 3, "Kähler tensors need a threefold, got dimension {}", cy.dim());
    Ok(KahlerReport {
        t: t.to_vec(),
        volume: cy.compute_cy_volume(t)?,
        divisor_volumes: cy.compute_divisor_volumes(t)?.iter().copied().collect(),
        aa: float_rows(&cy.compute_aa(t)?),
        kinv: float_rows(&cy.compute_kinv(t)?),
    })
}

/// Parse `a,b,c` into Kähler parameters.
pub fn parse_point(s: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(|x| {
            x.trim()
                .parse::<f64>()
                .map_err(|e| anyhow::anyhow!("invalid Kähler parameter {x:?}: {e}"))
        })
        .collect()
}
