//! Configuration and tolerance defaults.
//!
//! Policy
//! - Experimental functionality is gated by an explicit `CyConfig` handed to
//!   the constructor, never by process-wide state.
//! - Solver options are forwarded verbatim to the ambient variety; this crate
//!   does not retry across backends.

/// Default tolerance for the ambient solve residual.
pub const BACKEND_ERROR_TOL: f64 = 1e-3;
/// Entries with magnitude at or below this are dropped after each contraction.
pub const ROUND_TO_ZERO_THRESHOLD: f64 = 1e-3;
/// Maximum distance to an integer for CICY intersection numbers to be rounded.
pub const ROUND_TO_INTEGER_TOL: f64 = 5e-2;
/// Integrality check for dual basis matrices computed in floating point.
pub(crate) const INTEGRALITY_EPS: f64 = 1e-6;
/// Rank threshold for small integer matrices promoted to f64.
pub(crate) const RANK_EPS: f64 = 1e-9;

/// Model-level switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CyConfig {
    /// Allows CICYs, non-favorable or non-3-fold hypersurfaces, and exact
    /// rational intersection numbers.
    pub experimental: bool,
}

impl CyConfig {
    pub fn experimental() -> Self {
        Self { experimental: true }
    }
}

/// Sparse linear-solver backend requested from the ambient variety.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SolverBackend {
    /// Try every available backend in turn.
    #[default]
    All,
    Sksparse,
    Scipy,
}

/// Options forwarded to the ambient intersection-number solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverOpts {
    pub backend: SolverBackend,
    pub check: bool,
    pub backend_error_tol: f64,
    pub round_to_zero_threshold: f64,
    pub round_to_integer_error_tol: f64,
    pub verbose: u8,
}

impl Default for SolverOpts {
    fn default() -> Self {
        Self {
            backend: SolverBackend::All,
            check: true,
            backend_error_tol: BACKEND_ERROR_TOL,
            round_to_zero_threshold: ROUND_TO_ZERO_THRESHOLD,
            round_to_integer_error_tol: ROUND_TO_INTEGER_TOL,
            verbose: 0,
        }
    }
}

/// Which view of the intersection numbers to return.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IntNumsCfg {
    /// Project onto the current divisor basis.
    pub in_basis: bool,
    /// Treat index 0 as the anticanonical class (ignored when `in_basis`).
    pub zero_as_anticanonical: bool,
    pub solver: SolverOpts,
}

impl IntNumsCfg {
    pub fn in_basis() -> Self {
        Self {
            in_basis: true,
            ..Self::default()
        }
    }

    pub fn anticanonical() -> Self {
        Self {
            zero_as_anticanonical: true,
            ..Self::default()
        }
    }
}
