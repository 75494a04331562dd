//! Calabi–Yau hypersurfaces and complete intersections in toric varieties.
//!
//! Layout
//! - `toric`: the ambient collaborators (polytope, triangulation, cone,
//!   toric variety) as traits, plus fixed-data implementations and worked
//!   examples.
//! - `calabiyau`: the `CalabiYau` model built on top of them.
//! - `tensor`, `linalg`: sparse symmetric tensors and small integer
//!   linear algebra shared by both.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - `api` and `prelude` are the curated import surfaces for callers.

pub mod api;
pub mod calabiyau;
pub mod cfg;
pub mod error;
pub mod linalg;
pub mod tensor;
pub mod toric;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use calabiyau::{Basis, CalabiYau};
pub use cfg::{CyConfig, IntNumsCfg};
pub use error::CyError;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::calabiyau::{Basis, CalabiYau};
    pub use crate::cfg::{CyConfig, IntNumsCfg, SolverOpts};
    pub use crate::error::CyError;
    pub use crate::tensor::{IntNums, SymTensor};
    pub use crate::toric::{Cone, Polytope, ToricVariety, Triangulation};
}
