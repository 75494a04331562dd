//! Curated internal API (UNSTABLE).
//!
//! Important
//! - Not a public API. A convenience surface for the CLI, benches and
//!   experiments; breaking changes are allowed.

// Model
pub use crate::calabiyau::{
    Arithmetic, Basis, CalabiYau, ConeView, IntNumsKey, IntNumsView,
};
// Restriction of ambient intersection numbers
pub use crate::calabiyau::intnums::{flip_anticanonical, restrict_cicy, restrict_hypersurface};
// Configuration and errors
pub use crate::cfg::{
    CyConfig, IntNumsCfg, SolverBackend, SolverOpts, BACKEND_ERROR_TOL, ROUND_TO_INTEGER_TOL,
    ROUND_TO_ZERO_THRESHOLD,
};
pub use crate::error::CyError;
// Tensors and matrices
pub use nalgebra::{DMatrix, DVector};
pub use num_rational::Rational64;
pub use crate::tensor::{DenseTensor, IntNums, SymTensor};
// Ambient collaborators
pub use crate::toric::fixed::{FixedCone, FixedPolytope, FixedTriangulation, FixedVariety};
pub use crate::toric::special;
pub use crate::toric::{
    Cone, Lattice, NefPartitionQuery, NefPartitionRecord, Polytope, ToricVariety, Triangulation,
};
