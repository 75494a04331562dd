//! Error type shared by the Calabi–Yau model and the collaborator traits.

use std::fmt;

/// Errors surfaced by Calabi–Yau construction and queries.
///
/// Collaborators (polytope, triangulation, variety, cone) report their own
/// failures through `External`; the model forwards them unchanged.
#[derive(Clone, Debug, PartialEq)]
pub enum CyError {
    /// Invalid geometric input at construction time; no object is produced.
    Construction { reason: String },
    /// Experimental functionality requested without `CyConfig::experimental`.
    FeatureGate { feature: &'static str },
    /// Query outside the supported dimension range.
    UnsupportedDimension { op: &'static str, dim: usize },
    /// No cached Hodge numbers match the nef-partition.
    CicyResolution,
    /// The origin was requested to be dropped from a basis that uses it.
    BasisConsistency { reason: String },
    /// Basis has the wrong size, rank, range, or a non-integral dual.
    InvalidBasis { reason: String },
    /// Input vector or matrix has the wrong length.
    Shape {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// Failure reported by an external collaborator.
    External {
        component: &'static str,
        reason: String,
    },
}

impl CyError {
    pub(crate) fn construction(reason: impl Into<String>) -> Self {
        Self::Construction {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_basis(reason: impl Into<String>) -> Self {
        Self::InvalidBasis {
            reason: reason.into(),
        }
    }

    /// Helper for collaborator implementations.
    pub fn external(component: &'static str, reason: impl Into<String>) -> Self {
        Self::External {
            component,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Construction { reason } => write!(f, "invalid Calabi-Yau input: {reason}"),
            Self::FeatureGate { feature } => write!(
                f,
                "experimental features must be enabled to use {feature}"
            ),
            Self::UnsupportedDimension { op, dim } => {
                write!(f, "{op} is not supported for Calabi-Yau {dim}-folds")
            }
            Self::CicyResolution => {
                write!(f, "this type of complete intersection is not supported")
            }
            Self::BasisConsistency { reason } => write!(f, "inconsistent basis view: {reason}"),
            Self::InvalidBasis { reason } => write!(f, "invalid basis: {reason}"),
            Self::Shape {
                what,
                expected,
                got,
            } => write!(f, "{what} has length {got}, expected {expected}"),
            Self::External { component, reason } => write!(f, "{component}: {reason}"),
        }
    }
}

impl std::error::Error for CyError {}
