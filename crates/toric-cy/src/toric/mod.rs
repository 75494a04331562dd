//! Collaborator interfaces: polytope, triangulation, toric variety, cone.
//!
//! Purpose
//! - The Calabi–Yau model consumes these components but does not implement
//!   polytope combinatorics, triangulations, the ambient intersection solve,
//!   or general cone geometry. The traits pin down exactly what it consumes.
//! - `fixed` provides an implementation backed by precomputed data (plus
//!   brute-force combinatorics for small inputs); `special` builds the worked
//!   examples on top of it.
//!
//! Conventions
//! - Lattice points are `Vec<i64>`; point index 0 is the origin.
//! - Matrices of rays/charges are `DMatrix<i64>` with one row per vector.

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use nalgebra::{DMatrix, DVector};
use num_rational::Rational64;

use crate::cfg::SolverOpts;
use crate::error::CyError;
use crate::tensor::SymTensor;

pub mod fixed;
pub mod special;


/// Lattice in which lattice-Hodge numbers and favorability are evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lattice {
    N,
    M,
}

/// Parameters of a nef-partition enumeration; also the key of the
/// polytope's enumeration cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NefPartitionQuery {
    pub keep_symmetric: bool,
    pub keep_products: bool,
    pub keep_projections: bool,
    pub codim: usize,
    pub compute_hodge_numbers: bool,
}

impl NefPartitionQuery {
    /// Default enumeration of codimension-`codim` partitions with Hodge data.
    pub fn standard(codim: usize) -> Self {
        Self {
            keep_symmetric: false,
            keep_products: false,
            keep_projections: false,
            codim,
            compute_hodge_numbers: true,
        }
    }

    /// Same, also keeping partitions related by polytope symmetries.
    pub fn symmetric(codim: usize) -> Self {
        Self {
            keep_symmetric: true,
            ..Self::standard(codim)
        }
    }
}

/// One cached enumeration: partitions (polytope point indices) and, per
/// partition, the Hodge diamond flattened by anti-diagonals.
#[derive(Clone, Debug, PartialEq)]
pub struct NefPartitionRecord {
    pub query: NefPartitionQuery,
    pub partitions: Vec<Vec<Vec<usize>>>,
    pub hodge_numbers: Vec<Vec<i64>>,
}

/// Reflexive lattice polytope.
pub trait Polytope: PartialEq + Hash + Sized {
    /// Convex hull of `points`.
    fn from_points(points: &[Vec<i64>]) -> Result<Self, CyError>;
    fn dim(&self) -> usize;
    fn points(&self) -> &[Vec<i64>];
    fn points_not_interior_to_facets(&self) -> Vec<Vec<i64>>;
    fn points_to_indices(&self, pts: &[Vec<i64>]) -> Result<Vec<usize>, CyError>;
    fn vertices(&self) -> Vec<Vec<i64>>;
    /// Point sets of the faces of dimension `dim`.
    fn faces(&self, dim: usize) -> Vec<Vec<Vec<i64>>>;
    fn is_reflexive(&self) -> bool;
    fn is_favorable(&self, lattice: Lattice) -> bool;
    fn minkowski_sum(&self, other: &Self) -> Result<Self, CyError>;
    /// Charge matrix over `points` (polytope indices, origin first).
    fn glsm_charge_matrix(&self, points: &[usize]) -> Result<DMatrix<i64>, CyError>;
    /// Linear relations over `points` (polytope indices, origin first).
    fn glsm_linear_relations(&self, points: &[usize]) -> Result<DMatrix<i64>, CyError>;
    /// Integral divisor basis as positions into `points`.
    fn glsm_basis(&self, points: &[usize]) -> Result<Vec<usize>, CyError>;
    fn hpq(&self, p: usize, q: usize, lattice: Lattice) -> Result<i64, CyError>;
    fn chi(&self, lattice: Lattice) -> Result<i64, CyError>;
    /// Snapshot of previously enumerated nef-partitions.
    fn nef_partition_cache(&self) -> Vec<NefPartitionRecord>;
    /// Run an enumeration, extending the cache.
    fn nef_partitions(&self, query: &NefPartitionQuery) -> Result<(), CyError>;
}

/// Fine star triangulation of a polytope's points.
pub trait Triangulation {
    type Polytope: Polytope;
    fn polytope(&self) -> &Self::Polytope;
    /// Points in triangulation order; index 0 is the origin.
    fn points(&self) -> Vec<Vec<i64>>;
    fn simplices(&self) -> Vec<Vec<usize>>;
    fn points_to_indices(&self, pts: &[Vec<i64>]) -> Result<Vec<usize>, CyError>;
    fn is_fine(&self) -> bool;
    /// Point-index sets of the `d`-dimensional fan cones lying on faces of
    /// dimension `face_dim`.
    fn fan_cones(&self, d: usize, face_dim: usize) -> Vec<Vec<usize>>;
    fn dim(&self) -> usize;
}

/// Rational polyhedral cone.
pub trait Cone: Clone + fmt::Debug + Sized {
    fn from_rays(rays: DMatrix<i64>, check: bool) -> Result<Self, CyError>;
    fn rays(&self) -> Result<DMatrix<i64>, CyError>;
    fn dual(&self) -> Self;
    /// A point at distance at least `c` from every facet.
    fn tip_of_stretched_cone(&self, c: f64) -> Result<DVector<f64>, CyError>;
    fn is_smooth(&self) -> Result<bool, CyError>;
    fn ambient_dim(&self) -> usize;
    /// Dimension of the linear span.
    fn dim(&self) -> Result<usize, CyError>;
}

/// Toric variety defined by a triangulation.
pub trait ToricVariety: Hash + Sized {
    type Polytope: Polytope;
    type Triangulation: Triangulation<Polytope = Self::Polytope>;
    type Cone: Cone;

    fn dim(&self) -> usize;
    fn triangulation(&self) -> &Self::Triangulation;
    fn polytope(&self) -> &Self::Polytope {
        self.triangulation().polytope()
    }
    /// Intersection numbers over all points (origin = canonical class).
    fn intersection_numbers(&self, opts: &SolverOpts) -> Result<SymTensor<f64>, CyError>;
    fn intersection_numbers_exact(
        &self,
        opts: &SolverOpts,
    ) -> Result<SymTensor<Rational64>, CyError>;
    /// Mori cone with one column per triangulation point (origin first).
    fn mori_cone(&self) -> Result<Self::Cone, CyError>;
    fn clear_cache(&self, recursive: bool);
    /// Variety of a fine regular star triangulation of `points` (polytope
    /// indices, origin first) with the given heights.
    fn restricted(&self, points: &[usize], heights: &[f64]) -> Result<Rc<Self>, CyError>;
}
