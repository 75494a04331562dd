//! Ambient data for the CLI: a JSON file or one of the built-in examples.
//!
//! File format (all indices are polytope point indices unless noted)
//! - `points`: lattice points, origin included, exactly the hull's points.
//! - `triangulation_points`: optional subset, origin first; default all.
//! - `simplices`: indices into `triangulation_points`.
//! - `intersection_numbers`: `{key, num, den}` over triangulation indices.
//! - `mori_rays`: one column per triangulation point.
//! - `hodge_numbers`: `[p, q, h]` triples; `chi`, `favorable` optional.
//! - `nef_partition`, `nef_catalogue`: optional complete-intersection data.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{ensure, Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use toric_cy::api::{
    special, CalabiYau, CyConfig, FixedPolytope, FixedTriangulation, FixedVariety,
    NefPartitionQuery, NefPartitionRecord, Polytope, Rational64, SymTensor,
};
use toric_cy::linalg::from_rows;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Example {
    Quintic,
    P11169,
    Bicubic,
}

/// Where the ambient variety comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Example(Example),
}

impl Source {
    /// Label recorded in provenance sidecars.
    pub fn label(&self) -> String {
        match self {
            Self::File(p) => p.display().to_string(),
            Self::Example(e) => format!("example:{e:?}").to_lowercase(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RingEntry {
    key: Vec<usize>,
    num: i64,
    #[serde(default = "one")]
    den: i64,
}

fn one() -> i64 {
    1
}

fn yes() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct CatalogueEntry {
    codim: usize,
    #[serde(default)]
    symmetric: bool,
    partitions: Vec<Vec<Vec<usize>>>,
    hodge_numbers: Vec<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
struct AmbientFile {
    points: Vec<Vec<i64>>,
    #[serde(default)]
    triangulation_points: Option<Vec<usize>>,
    simplices: Vec<Vec<usize>>,
    intersection_numbers: Vec<RingEntry>,
    mori_rays: Vec<Vec<i64>>,
    #[serde(default)]
    hodge_numbers: Vec<(usize, usize, i64)>,
    #[serde(default)]
    chi: Option<i64>,
    #[serde(default = "yes")]
    favorable: bool,
    #[serde(default)]
    nef_partition: Option<Vec<Vec<usize>>>,
    #[serde(default)]
    nef_catalogue: Vec<CatalogueEntry>,
}

/// Build the Calabi–Yau described by `source`.
pub fn load(source: &Source, cfg: CyConfig) -> Result<CalabiYau<FixedVariety>> {
    match source {
        Source::Example(e) => from_example(*e, cfg),
        Source::File(path) => from_file(path, cfg),
    }
}

fn from_example(example: Example, cfg: CyConfig) -> Result<CalabiYau<FixedVariety>> {
    let cy = match example {
        Example::Quintic => CalabiYau::new(special::quintic()?, None, cfg)?,
        Example::P11169 => CalabiYau::new(special::p11169()?, None, cfg)?,
        Example::Bicubic => CalabiYau::new(
            special::bicubic()?,
            Some(special::bicubic_nef_partition()),
            cfg,
        )?,
    };
    Ok(cy)
}

fn from_file(path: &Path, cfg: CyConfig) -> Result<CalabiYau<FixedVariety>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file: AmbientFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing {}", path.display()))?;
    let nef_partition = file.nef_partition.clone();
    let variety = build_variety(file)?;
    Ok(CalabiYau::new(variety, nef_partition, cfg)?)
}

fn build_variety(file: AmbientFile) -> Result<Rc<FixedVariety>> {
    let hodge: Vec<((usize, usize), i64)> =
        file.hodge_numbers.iter().map(|&(p, q, h)| ((p, q), h)).collect();
    let mut polytope = FixedPolytope::new(file.points)?
        .with_hodge_numbers(&hodge)
        .with_favorable(file.favorable);
    if let Some(chi) = file.chi {
        polytope = polytope.with_chi(chi);
    }
    for entry in file.nef_catalogue {
        let query = if entry.symmetric {
            NefPartitionQuery::symmetric(entry.codim)
        } else {
            NefPartitionQuery::standard(entry.codim)
        };
        polytope = polytope.with_nef_partitions(NefPartitionRecord {
            query,
            partitions: entry.partitions,
            hodge_numbers: entry.hodge_numbers,
        });
    }
    let dim = polytope.dim();
    let points = file
        .triangulation_points
        .unwrap_or_else(|| (0..polytope.points().len()).collect());
    let n = points.len();
    let tri = FixedTriangulation::new(Rc::new(polytope), points, file.simplices)?;

    let mut ring = SymTensor::new(dim);
    for e in &file.intersection_numbers {
        ensure!(e.den != 0, "intersection number {:?} has zero denominator", e.key);
        ensure!(
            e.key.len() == dim,
            "intersection number {:?} should have {dim} indices",
            e.key
        );
        ring.add(&e.key, Rational64::new(e.num, e.den));
    }
    ensure!(
        file.mori_rays.iter().all(|r| r.len() == n),
        "Mori rays need one entry per triangulation point ({n})"
    );
    let mori = from_rows(&file.mori_rays, n);
    Ok(Rc::new(FixedVariety::new(tri, ring, mori)?))
}
