//! Worked examples used in tests, benchmarks and the CLI.
//!
//! Purpose
//! - Provide complete ambient varieties for three classic Calabi–Yau
//!   threefolds so tests can check against known invariants.
//!
//! References
//! - Quintic in P^4: h11 = 1, h21 = 101, chi = -200, D·D·D = 5 on the CY.
//! - Degree-18 hypersurface in P(1,1,1,6,9): h11 = 2, h21 = 272, chi = -540.
//!   In the basis (H, E) of Pic the ambient ring has H^4 = H^3 E = 0,
//!   H^2 E^2 = 1/6, H E^3 = -1, E^4 = 9/2.
//! - Bicubic in P^5 (two cubics): h11 = 1, h21 = 73, chi = -144.
//!
//! Ambient intersection numbers are generated from divisor classes in a
//! basis of Pic and the top intersections of basis monomials.

use std::rc::Rc;

use nalgebra::DMatrix;
use num_rational::Rational64;

use crate::error::CyError;
use crate::linalg::{combinations, scatter_columns};
use crate::tensor::{odometer, SymTensor};
use crate::toric::fixed::{FixedPolytope, FixedTriangulation, FixedVariety};
use crate::toric::{NefPartitionQuery, NefPartitionRecord};

/// Quintic threefold: anticanonical hypersurface in P^4.
pub fn quintic() -> Result<Rc<FixedVariety>, CyError> {
    let points = vec![
        vec![0, 0, 0, 0],
        vec![1, 0, 0, 0],
        vec![0, 1, 0, 0],
        vec![0, 0, 1, 0],
        vec![0, 0, 0, 1],
        vec![-1, -1, -1, -1],
    ];
    let polytope = FixedPolytope::new(points)?
        .with_hodge_numbers(&diamond3(1, 101))
        .with_chi(-200);
    let simplices = cone_over_boundary(&[1, 2, 3, 4, 5], 4);
    let tri = FixedTriangulation::new(Rc::new(polytope), (0..6).collect(), simplices)?;
    let mut classes = vec![vec![-5]];
    classes.extend(std::iter::repeat(vec![1]).take(5));
    let ring = ambient_ring(&classes, 4, |_| Rational64::from_integer(1));
    let mori = DMatrix::from_row_slice(1, 6, &[-5, 1, 1, 1, 1, 1]);
    Ok(Rc::new(FixedVariety::new(tri, ring, mori)?))
}

/// Points of P(1,1,1,6,9)'s fan polytope, origin first, then the seven
/// points not interior to facets, then the three facet-interior points.
fn p11169_polytope() -> Result<Rc<FixedPolytope>, CyError> {
    let points = vec![
        vec![0, 0, 0, 0],
        vec![-1, -1, -6, -9],
        vec![0, 0, 0, 1],
        vec![0, 0, 1, 0],
        vec![1, 0, 0, 0],
        vec![0, 1, 0, 0],
        vec![0, 0, -2, -3],
        vec![0, 0, -1, -1],
        vec![0, 0, 0, -1],
        vec![0, 0, -1, -2],
    ];
    Ok(Rc::new(
        FixedPolytope::new(points)?
            .with_hodge_numbers(&diamond3(2, 272))
            .with_chi(-540),
    ))
}

/// Divisor classes of the P(1,1,1,6,9) points in the basis (H, E).
const P11169_CLASSES: [[i64; 2]; 7] = [[-18, -6], [1, 0], [9, 3], [6, 2], [1, 0], [1, 0], [0, 1]];

fn p11169_top(b: &[usize]) -> Rational64 {
    match b.iter().filter(|&&i| i == 1).count() {
        2 => Rational64::new(1, 6),
        3 => Rational64::from_integer(-1),
        4 => Rational64::new(9, 2),
        _ => Rational64::from_integer(0),
    }
}

fn p11169_mori() -> DMatrix<i64> {
    DMatrix::from_row_slice(
        3,
        7,
        &[
            0, 1, 0, 0, 1, 1, -3, //
            -6, 0, 3, 2, 0, 0, 1, //
            -18, 1, 9, 6, 1, 1, 0,
        ],
    )
}

fn p11169_on(polytope: Rc<FixedPolytope>) -> Result<FixedVariety, CyError> {
    let simplices = with_origin(&[
        [6, 4, 5, 3],
        [6, 4, 5, 2],
        [1, 6, 5, 3],
        [1, 6, 5, 2],
        [1, 4, 6, 3],
        [1, 4, 6, 2],
        [4, 5, 3, 2],
        [1, 4, 3, 2],
        [1, 5, 3, 2],
    ]);
    let tri = FixedTriangulation::new(polytope, (0..7).collect(), simplices)?;
    let classes: Vec<Vec<i64>> = P11169_CLASSES.iter().map(|c| c.to_vec()).collect();
    let ring = ambient_ring(&classes, 4, p11169_top);
    FixedVariety::new(tri, ring, p11169_mori())
}

/// Degree-18 hypersurface in P(1,1,1,6,9), triangulating the seven points
/// not interior to facets.
pub fn p11169() -> Result<Rc<FixedVariety>, CyError> {
    Ok(Rc::new(p11169_on(p11169_polytope()?)?))
}

/// Same polytope triangulated with all ten points.
///
/// The facet-interior divisors do not meet the hypersurface, so they carry
/// zero classes here and the Calabi–Yau is expected to move to the
/// seven-point triangulation (registered as the restriction).
pub fn p11169_all_points() -> Result<Rc<FixedVariety>, CyError> {
    let polytope = p11169_polytope()?;
    let simplices = with_origin(&[
        [7, 4, 5, 2],
        [6, 4, 5, 7],
        [1, 7, 5, 2],
        [1, 6, 5, 7],
        [1, 4, 7, 2],
        [1, 4, 6, 7],
        [6, 4, 5, 9],
        [8, 4, 5, 3],
        [9, 4, 5, 8],
        [1, 6, 5, 9],
        [1, 8, 5, 3],
        [1, 9, 5, 8],
        [1, 4, 6, 9],
        [1, 4, 8, 3],
        [1, 4, 9, 8],
        [4, 5, 3, 2],
        [1, 4, 3, 2],
        [1, 5, 3, 2],
    ]);
    let tri = FixedTriangulation::new(Rc::clone(&polytope), (0..10).collect(), simplices)?;
    let mut classes: Vec<Vec<i64>> = P11169_CLASSES.iter().map(|c| c.to_vec()).collect();
    classes.extend(std::iter::repeat(vec![0, 0]).take(3));
    let ring = ambient_ring(&classes, 4, p11169_top);
    let mori = scatter_columns(&p11169_mori(), &(0..7).collect::<Vec<_>>(), 10);
    let seven = Rc::new(p11169_on(polytope)?);
    Ok(Rc::new(
        FixedVariety::new(tri, ring, mori)?.with_restriction((0..7).collect(), seven),
    ))
}

/// Nef-partition of the bicubic: `{e1, e2, e3}` and `{e4, e5, -Σe}`.
pub fn bicubic_nef_partition() -> Vec<Vec<usize>> {
    vec![vec![1, 2, 3], vec![4, 5, 6]]
}

/// Bicubic in P^5 with the standard codimension-2 enumeration available.
pub fn bicubic() -> Result<Rc<FixedVariety>, CyError> {
    bicubic_with_catalogue(vec![bicubic_record(NefPartitionQuery::standard(2))])
}

/// Catalogue entry listing the bicubic partition with its Hodge diamond.
pub fn bicubic_record(query: NefPartitionQuery) -> NefPartitionRecord {
    NefPartitionRecord {
        query,
        partitions: vec![bicubic_nef_partition()],
        hodge_numbers: vec![vec![1, 0, 0, 0, 1, 0, 1, 73, 73, 1, 0, 1, 0, 0, 0, 1]],
    }
}

/// P^5 whose polytope answers nef-partition enumerations from `catalogue`.
pub fn bicubic_with_catalogue(
    catalogue: Vec<NefPartitionRecord>,
) -> Result<Rc<FixedVariety>, CyError> {
    let mut points = vec![vec![0; 5]];
    for k in 0..5 {
        let mut e = vec![0; 5];
        e[k] = 1;
        points.push(e);
    }
    points.push(vec![-1; 5]);
    let polytope = catalogue
        .into_iter()
        .fold(FixedPolytope::new(points)?, FixedPolytope::with_nef_partitions);
    let simplices = cone_over_boundary(&[1, 2, 3, 4, 5, 6], 5);
    let tri = FixedTriangulation::new(Rc::new(polytope), (0..7).collect(), simplices)?;
    let mut classes = vec![vec![-6]];
    classes.extend(std::iter::repeat(vec![1]).take(6));
    let ring = ambient_ring(&classes, 5, |_| Rational64::from_integer(1));
    let mori = DMatrix::from_row_slice(1, 7, &[-6, 1, 1, 1, 1, 1, 1]);
    Ok(Rc::new(FixedVariety::new(tri, ring, mori)?))
}

/// Hodge diamond of a Calabi–Yau threefold as `((p, q), h)` pairs, `p <= q`.
pub fn diamond3(h11: i64, h21: i64) -> Vec<((usize, usize), i64)> {
    let mut out = Vec::new();
    for p in 0..=3 {
        for q in p..=3 {
            let h = match (p, q) {
                (0, 0) | (3, 3) | (0, 3) => 1,
                (1, 1) | (2, 2) => h11,
                (1, 2) => h21,
                _ => 0,
            };
            out.push(((p, q), h));
        }
    }
    out
}

/// Star triangulation of a simplex fan: origin plus every `dim`-subset of `rays`.
fn cone_over_boundary(rays: &[usize], dim: usize) -> Vec<Vec<usize>> {
    combinations(rays.len(), dim)
        .into_iter()
        .map(|c| {
            let mut s = vec![0];
            s.extend(c.iter().map(|&k| rays[k]));
            s
        })
        .collect()
}

fn with_origin(simplices: &[[usize; 4]]) -> Vec<Vec<usize>> {
    simplices
        .iter()
        .map(|s| {
            let mut v = vec![0];
            v.extend_from_slice(s);
            v
        })
        .collect()
}

/// `κ(D_{i1}, ..., D_{in}) = Σ_b Π_k classes[i_k][b_k] · top(sort(b))`.
fn ambient_ring(
    classes: &[Vec<i64>],
    dim: usize,
    top: impl Fn(&[usize]) -> Rational64,
) -> SymTensor<Rational64> {
    let m = classes.len();
    let r = classes.first().map_or(0, Vec::len);
    let mut out = SymTensor::new(dim);
    let mut key = vec![0usize; dim];
    loop {
        if key.windows(2).all(|w| w[0] <= w[1]) {
            let mut total = Rational64::from_integer(0);
            let mut b = vec![0usize; dim];
            loop {
                let coeff: i64 = key.iter().zip(&b).map(|(&i, &j)| classes[i][j]).product();
                if coeff != 0 {
                    let mut sorted = b.clone();
                    sorted.sort_unstable();
                    total += top(&sorted) * coeff;
                }
                if !odometer(&mut b, r) {
                    break;
                }
            }
            if total != Rational64::from_integer(0) {
                out.insert(&key, total);
            }
        }
        if !odometer(&mut key, m) {
            break;
        }
    }
    out
}
