//! Collaborators backed by precomputed data.
//!
//! The ambient intersection ring, Mori cone, lattice Hodge numbers and the
//! nef-partition catalogue are inputs. Everything combinatorial that is cheap
//! at small sizes (facets, faces, vertices, GLSM data, cone duals) is
//! computed here by brute force, so fixtures only carry what a real solver
//! would produce.

mod cone;
mod polytope;
mod triangulation;
mod variety;

pub use cone::FixedCone;
pub use polytope::{Facet, FixedPolytope};
pub use triangulation::FixedTriangulation;
pub use variety::FixedVariety;
