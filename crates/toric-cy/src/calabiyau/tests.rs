use super::*;
use crate::cfg::IntNumsCfg;
use crate::linalg::rows_of;
use crate::tensor::SymTensor;
use crate::toric::fixed::{FixedPolytope, FixedTriangulation, FixedVariety};
use crate::toric::special;
use crate::toric::Cone;
use nalgebra::DMatrix;
use num_rational::Rational64;
use proptest::prelude::*;

fn hypersurface(v: Rc<FixedVariety>) -> CalabiYau<FixedVariety> {
    CalabiYau::new(v, None, CyConfig::default()).unwrap()
}

fn quintic() -> CalabiYau<FixedVariety> {
    hypersurface(special::quintic().unwrap())
}

fn p11169() -> CalabiYau<FixedVariety> {
    hypersurface(special::p11169().unwrap())
}

fn sorted_rows(m: &DMatrix<i64>) -> Vec<Vec<i64>> {
    let mut rows = rows_of(m);
    rows.sort();
    rows
}

fn canonical(cy: &CalabiYau<FixedVariety>) -> SymTensor<f64> {
    cy.intersection_numbers(&IntNumsCfg::default())
        .unwrap()
        .as_sparse()
        .cloned()
        .unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn quintic_restriction_and_origin_views() {
    let cy = quintic();
    assert_eq!(cy.dim(), 3);
    assert_eq!(cy.ambient_dim(), 4);
    assert!(cy.is_hypersurface());
    let k = canonical(&cy);
    assert_eq!(k.get(&[1, 2, 3]), 5.0);
    assert_eq!(k.get(&[4, 4, 4]), 5.0);
    assert_eq!(k.get(&[0, 1, 2]), -25.0);
    assert_eq!(k.get(&[0, 0, 5]), 125.0);
    assert_eq!(k.get(&[0, 0, 0]), -625.0);

    let anti = cy.intersection_numbers(&IntNumsCfg::anticanonical()).unwrap();
    assert_eq!(anti.get(&[0, 1, 2]), 25.0);
    assert_eq!(anti.get(&[0, 0, 5]), 125.0);
    assert_eq!(anti.get(&[0, 0, 0]), 625.0);
    assert_eq!(anti.get(&[1, 2, 3]), 5.0);
}

#[test]
fn quintic_basis_cones_and_tensors() {
    let cy = quintic();
    assert_eq!(cy.divisor_basis(true, false).unwrap(), Basis::Indices(vec![5]));
    assert_eq!(cy.divisor_basis(false, false).unwrap(), Basis::Indices(vec![4]));
    assert_eq!(
        cy.glsm_charge_matrix(true).unwrap(),
        DMatrix::from_row_slice(1, 6, &[-5, 1, 1, 1, 1, 1])
    );
    let kb = cy.intersection_numbers(&IntNumsCfg::in_basis()).unwrap();
    assert_eq!(kb.get(&[0, 0, 0]), 5.0);

    let mori = cy.toric_mori_cone(true, true).unwrap();
    assert_eq!(sorted_rows(&mori.rays().unwrap()), vec![vec![1]]);
    let kahler = cy.toric_kahler_cone().unwrap();
    assert_eq!(sorted_rows(&kahler.rays().unwrap()), vec![vec![1]]);
    let eff = cy.toric_effective_cone().unwrap();
    assert_eq!(sorted_rows(&eff.rays().unwrap()), vec![vec![1]]);

    assert_eq!(cy.second_chern_class(false).unwrap(), vec![50; 5]);
    assert_eq!(cy.second_chern_class(true).unwrap(), vec![50]);

    let t = [2.0];
    assert!(close(cy.compute_cy_volume(&t).unwrap(), 20.0 / 3.0));
    assert!(close(cy.compute_divisor_volumes(&t).unwrap()[0], 10.0));
    assert!(close(cy.compute_aa(&t).unwrap()[(0, 0)], 10.0));
    let kinv = cy.compute_kinv(&t).unwrap();
    assert!(close(kinv[(0, 0)], 4.0 * (100.0 - 200.0 / 3.0)));
}

#[test]
fn quintic_hodge_numbers_and_description() {
    let cy = quintic();
    assert_eq!(cy.h11().unwrap(), 1);
    assert_eq!(cy.h21().unwrap(), 101);
    assert_eq!(cy.h12().unwrap(), 101);
    assert_eq!(cy.chi().unwrap(), -200);
    let diamond = cy.hodge_diamond().unwrap();
    let alternating: i64 = diamond
        .iter()
        .enumerate()
        .flat_map(|(p, row)| row.iter().enumerate().map(move |(q, &h)| (p + q, h)))
        .map(|(deg, h)| if deg % 2 == 0 { h } else { -h })
        .sum();
    assert_eq!(alternating, -200);
    assert_eq!(
        cy.to_string(),
        "A Calabi-Yau 3-fold hypersurface with h11=1 and h21=101 in a 4-dimensional toric variety"
    );
    assert!(cy.is_smooth().unwrap());
}

#[test]
fn exact_numbers_require_experimental() {
    let cy = quintic();
    assert_eq!(
        cy.intersection_numbers_exact(&IntNumsCfg::default()),
        Err(CyError::FeatureGate {
            feature: "exact intersection numbers"
        })
    );
    let exp = CalabiYau::new(special::quintic().unwrap(), None, CyConfig::experimental()).unwrap();
    let k = exp.intersection_numbers_exact(&IntNumsCfg::default()).unwrap();
    assert_eq!(k.get(&[0, 0, 0]), Rational64::from_integer(-625));
    let anti = exp
        .intersection_numbers_exact(&IntNumsCfg::anticanonical())
        .unwrap();
    assert_eq!(anti.get(&[0, 1, 1]), Rational64::from_integer(25));
}

#[test]
fn p11169_glsm_and_default_basis() {
    let cy = p11169();
    assert_eq!(cy.prime_toric_divisors().unwrap(), vec![1, 2, 3, 4, 5, 6]);
    let q = cy.glsm_charge_matrix(true).unwrap();
    assert_eq!(
        sorted_rows(&q),
        vec![vec![-18, 1, 9, 6, 1, 1, 0], vec![-6, 0, 3, 2, 0, 0, 1]]
    );
    assert_eq!(cy.glsm_charge_matrix(false).unwrap().ncols(), 6);
    let rel = cy.glsm_linear_relations(true).unwrap();
    assert_eq!(rel.ncols(), 7);
    // Relations annihilate the charges.
    assert!((&rel * q.transpose()).iter().all(|&x| x == 0));
    let rel = cy.glsm_linear_relations(false).unwrap();
    let q = cy.glsm_charge_matrix(false).unwrap();
    assert_eq!(rel.shape(), (4, 6));
    assert!((&rel * q.transpose()).iter().all(|&x| x == 0));
    assert_eq!(cy.divisor_basis(true, false).unwrap(), Basis::Indices(vec![5, 6]));
    assert_eq!(cy.curve_basis(true, false).unwrap(), Basis::Indices(vec![5, 6]));
}

#[test]
fn p11169_intersection_numbers_in_basis() {
    let cy = p11169();
    let kb = cy.intersection_numbers(&IntNumsCfg::in_basis()).unwrap();
    assert_eq!(kb.get(&[0, 0, 0]), 0.0);
    assert_eq!(kb.get(&[0, 0, 1]), 1.0);
    assert_eq!(kb.get(&[1, 0, 1]), -3.0);
    assert_eq!(kb.get(&[1, 1, 1]), 9.0);
    assert!(kb.as_sparse().is_some());
}

#[test]
fn p11169_cones_in_basis() {
    let cy = p11169();
    let mori = cy.toric_mori_cone(true, true).unwrap();
    assert_eq!(
        sorted_rows(&mori.rays().unwrap()),
        vec![vec![0, 1], vec![1, -3], vec![1, 0]]
    );
    let full = cy.toric_mori_cone(false, true).unwrap().rays().unwrap();
    assert_eq!(full.ncols(), 7);
    let no_origin = cy.toric_mori_cone(false, false).unwrap().rays().unwrap();
    assert_eq!(no_origin.ncols(), 6);
    let kahler = cy.toric_kahler_cone().unwrap();
    assert_eq!(
        sorted_rows(&kahler.rays().unwrap()),
        vec![vec![1, 0], vec![3, 1]]
    );
    let eff = cy.toric_effective_cone().unwrap();
    assert_eq!(
        sorted_rows(&eff.rays().unwrap()),
        vec![vec![0, 1], vec![1, 0], vec![3, 1]]
    );
}

#[test]
fn p11169_kahler_tensors() {
    let cy = p11169();
    let t = [4.0, 1.0];
    assert!(close(cy.compute_cy_volume(&t).unwrap(), 3.5));
    let tau = cy.compute_divisor_volumes(&t).unwrap();
    assert!(close(tau[0], 2.5) && close(tau[1], 0.5));
    let aa = cy.compute_aa(&t).unwrap();
    assert!(close(aa[(0, 0)], 1.0) && close(aa[(0, 1)], 1.0));
    assert!(close(aa[(1, 0)], 1.0) && close(aa[(1, 1)], -3.0));
    let kinv = cy.compute_kinv(&t).unwrap();
    assert!(close(kinv[(0, 0)], 11.0) && close(kinv[(0, 1)], -9.0));
    assert!(close(kinv[(1, 0)], -9.0) && close(kinv[(1, 1)], 43.0));

    assert_eq!(
        cy.compute_cy_volume(&[1.0]),
        Err(CyError::Shape {
            what: "Kähler parameter vector",
            expected: 2,
            got: 1
        })
    );
}

#[test]
fn p11169_second_chern_class() {
    let cy = p11169();
    assert_eq!(
        cy.second_chern_class(false).unwrap(),
        vec![36, 306, 204, 36, 36, -6]
    );
    assert_eq!(cy.second_chern_class(true).unwrap(), vec![36, -6]);
}

#[test]
fn matrix_divisor_basis_gives_dense_views() {
    let cy = p11169();
    let d = DMatrix::from_row_slice(
        2,
        7,
        &[
            0, 0, 0, 0, 0, 3, 1, //
            0, 0, 0, 0, 0, 1, 0,
        ],
    );
    cy.set_divisor_basis(Basis::Matrix(d.clone()), true).unwrap();
    assert_eq!(cy.divisor_basis(true, true).unwrap(), Basis::Matrix(d));
    assert_eq!(
        cy.curve_basis(true, true).unwrap(),
        Basis::Matrix(DMatrix::from_row_slice(
            2,
            7,
            &[
                -6, 0, 3, 2, 0, 0, 1, //
                0, 1, 0, 0, 1, 1, -3,
            ],
        ))
    );
    let kb = cy.intersection_numbers(&IntNumsCfg::in_basis()).unwrap();
    assert!(kb.as_dense().is_some());
    assert_eq!(kb.get(&[0, 0, 0]), 9.0);
    assert_eq!(kb.get(&[0, 0, 1]), 3.0);
    assert_eq!(kb.get(&[0, 1, 1]), 1.0);
    assert_eq!(kb.get(&[1, 1, 1]), 0.0);
    assert!(close(cy.compute_cy_volume(&[1.0, 1.0]).unwrap(), 3.5));
    // c2 · L = 3·36 - 6 and c2 · H = 36.
    assert_eq!(cy.second_chern_class(true).unwrap(), vec![102, 36]);
}

#[test]
fn dense_and_sparse_bases_give_the_same_kahler_tensors() {
    let sparse = p11169();
    let dense = p11169();
    let one_hot = DMatrix::from_row_slice(
        2,
        7,
        &[
            0, 0, 0, 0, 0, 1, 0, //
            0, 0, 0, 0, 0, 0, 1,
        ],
    );
    dense.set_divisor_basis(Basis::Matrix(one_hot), true).unwrap();
    assert!(dense
        .intersection_numbers(&IntNumsCfg::in_basis())
        .unwrap()
        .as_dense()
        .is_some());
    for t in [[4.0, 1.0], [7.0, 2.0]] {
        assert!(close(
            sparse.compute_cy_volume(&t).unwrap(),
            dense.compute_cy_volume(&t).unwrap()
        ));
        let (a, b) = (
            sparse.compute_divisor_volumes(&t).unwrap(),
            dense.compute_divisor_volumes(&t).unwrap(),
        );
        assert!(a.iter().zip(b.iter()).all(|(x, y)| close(*x, *y)));
        let (a, b) = (sparse.compute_aa(&t).unwrap(), dense.compute_aa(&t).unwrap());
        assert!(a.iter().zip(b.iter()).all(|(x, y)| close(*x, *y)));
        let (a, b) = (sparse.compute_kinv(&t).unwrap(), dense.compute_kinv(&t).unwrap());
        assert!(a.iter().zip(b.iter()).all(|(x, y)| close(*x, *y)));
    }
}

#[test]
fn basis_numbers_are_projections_of_the_raw_numbers() {
    let cy = p11169();
    let raw = canonical(&cy);

    cy.set_divisor_basis(Basis::Indices(vec![1, 6]), true).unwrap();
    let kb = cy.intersection_numbers(&IntNumsCfg::in_basis()).unwrap();
    let expected = raw.filter_to_basis(&[1, 6]);
    assert_eq!(kb.as_sparse(), Some(&expected));
    assert_eq!(kb.get(&[0, 0, 0]), raw.get(&[1, 1, 1]));
    assert_eq!(kb.get(&[0, 1, 1]), raw.get(&[1, 6, 6]));

    let d = DMatrix::from_row_slice(
        2,
        7,
        &[
            0, 0, 0, 0, 0, 3, 1, //
            0, 0, 0, 0, 0, 1, 0,
        ],
    );
    cy.set_divisor_basis(Basis::Matrix(d.clone()), true).unwrap();
    let kb = cy.intersection_numbers(&IntNumsCfg::in_basis()).unwrap();
    let dense = kb.as_dense().unwrap();
    // K_abc = Σ d_ai d_bj d_ck κ_ijk over every ordered index triple.
    let mut expected = vec![0.0; 8];
    raw.for_each_permutation(|key, v| {
        for (slot, e) in expected.iter_mut().enumerate() {
            let (a, b, c) = (slot / 4, (slot / 2) % 2, slot % 2);
            *e += v * (d[(a, key[0])] * d[(b, key[1])] * d[(c, key[2])]) as f64;
        }
    });
    for (slot, e) in expected.iter().enumerate() {
        let idx = [slot / 4, (slot / 2) % 2, slot % 2];
        assert!(close(dense.get(&idx), *e), "entry {idx:?}");
    }
}

#[test]
fn full_clear_recomputes_the_same_invariants() {
    let cy = hypersurface(special::p11169_all_points().unwrap());
    let kb = cy.intersection_numbers(&IntNumsCfg::in_basis()).unwrap();
    let mori = sorted_rows(&cy.toric_mori_cone(true, true).unwrap().rays().unwrap());
    let c2 = cy.second_chern_class(true).unwrap();
    let basis = cy.divisor_basis(true, false).unwrap();

    cy.clear_cache(true, false);
    assert_eq!(cy.divisor_basis(true, false).unwrap(), basis);
    assert_eq!(cy.intersection_numbers(&IntNumsCfg::in_basis()).unwrap(), kb);
    assert_eq!(
        sorted_rows(&cy.toric_mori_cone(true, true).unwrap().rays().unwrap()),
        mori
    );
    assert_eq!(cy.second_chern_class(true).unwrap(), c2);
}

/// Cubic curve in P^2, a Calabi-Yau one-fold.
fn cubic_curve() -> CalabiYau<FixedVariety> {
    let points = vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![-1, -1]];
    let poly = FixedPolytope::new(points)
        .unwrap()
        .with_hodge_numbers(&[((0, 0), 1), ((0, 1), 1), ((1, 1), 1)]);
    let tri = FixedTriangulation::new(
        Rc::new(poly),
        (0..4).collect(),
        vec![vec![0, 1, 2], vec![0, 1, 3], vec![0, 2, 3]],
    )
    .unwrap();
    let mut entries = vec![(vec![0, 0], Rational64::from_integer(9))];
    for i in 1..4 {
        entries.push((vec![0, i], Rational64::from_integer(-3)));
        for j in i..4 {
            entries.push((vec![i, j], Rational64::from_integer(1)));
        }
    }
    let ring = SymTensor::from_entries(2, entries);
    let mori = DMatrix::from_row_slice(1, 4, &[-3, 1, 1, 1]);
    let v = Rc::new(FixedVariety::new(tri, ring, mori).unwrap());
    CalabiYau::new(v, None, CyConfig::experimental()).unwrap()
}

#[test]
fn hodge_numbers_outside_supported_dimensions() {
    let cy = cubic_curve();
    assert_eq!(cy.dim(), 1);
    // Either index equal to 1 still answers.
    assert_eq!(cy.hpq(1, 0).unwrap(), 1);
    assert_eq!(cy.hpq(0, 1).unwrap(), 1);
    assert_eq!(cy.hpq(1, 1).unwrap(), 1);
    assert_eq!(
        cy.hpq(2, 2),
        Err(CyError::UnsupportedDimension { op: "hpq", dim: 1 })
    );
    assert!(matches!(
        cy.hpq(0, 0),
        Err(CyError::UnsupportedDimension { .. })
    ));
    // The named accessors reject the dimension outright.
    assert_eq!(
        cy.h11(),
        Err(CyError::UnsupportedDimension { op: "h11", dim: 1 })
    );
    assert!(matches!(cy.chi(), Err(CyError::UnsupportedDimension { .. })));
}

#[test]
fn index_basis_validation() {
    let cy = p11169();
    let invalid = |b: Vec<usize>| {
        matches!(
            cy.set_divisor_basis(Basis::Indices(b), true),
            Err(CyError::InvalidBasis { .. })
        )
    };
    assert!(invalid(vec![5]));
    assert!(invalid(vec![5, 5]));
    assert!(invalid(vec![5, 17]));
    // Columns 1 and 2 span an index-3 sublattice.
    assert!(invalid(vec![1, 2]));
    // Failed setters leave the basis alone.
    assert_eq!(cy.divisor_basis(true, false).unwrap(), Basis::Indices(vec![5, 6]));

    cy.set_divisor_basis(Basis::Indices(vec![3, 5]), false).unwrap();
    assert_eq!(cy.divisor_basis(true, false).unwrap(), Basis::Indices(vec![4, 6]));
    assert_eq!(cy.divisor_basis(false, false).unwrap(), Basis::Indices(vec![3, 5]));
}

#[test]
fn basis_using_the_origin_has_no_origin_free_view() {
    let cy = p11169();
    let d = DMatrix::from_row_slice(
        2,
        7,
        &[
            1, 0, 0, 0, 0, 19, 0, //
            0, 0, 0, 0, 0, 0, 1,
        ],
    );
    cy.set_divisor_basis(Basis::Matrix(d), true).unwrap();
    assert!(matches!(
        cy.divisor_basis(false, true),
        Err(CyError::BasisConsistency { .. })
    ));
    assert!(cy.curve_basis(false, true).is_ok());
}

#[test]
fn curve_matrix_basis_is_dual_to_divisors() {
    let cy = p11169();
    let c = DMatrix::from_row_slice(
        2,
        7,
        &[
            -6, 0, 3, 2, 0, 0, 1, //
            0, 1, 0, 0, 1, 1, -3,
        ],
    );
    cy.set_curve_basis(Basis::Matrix(c.clone()), true).unwrap();
    let d = match cy.divisor_basis(true, true).unwrap() {
        Basis::Matrix(m) => m,
        Basis::Indices(_) => panic!("expected a matrix basis"),
    };
    assert_eq!(&c * d.transpose(), DMatrix::identity(2, 2));
    // Not in the row space of the charges.
    let bad = DMatrix::from_row_slice(
        2,
        7,
        &[
            1, 0, 0, 0, 0, 0, 0, //
            0, 1, 0, 0, 1, 1, -3,
        ],
    );
    assert!(matches!(
        cy.set_curve_basis(Basis::Matrix(bad), true),
        Err(CyError::InvalidBasis { .. })
    ));
}

#[test]
fn clearing_in_basis_keeps_the_basis() {
    let cy = p11169();
    cy.set_divisor_basis(Basis::Indices(vec![1, 6]), true).unwrap();
    let before = cy.intersection_numbers(&IntNumsCfg::in_basis()).unwrap();
    cy.clear_cache(false, true);
    assert_eq!(cy.divisor_basis(true, false).unwrap(), Basis::Indices(vec![1, 6]));
    assert_eq!(cy.intersection_numbers(&IntNumsCfg::in_basis()).unwrap(), before);

    cy.clear_cache(false, false);
    assert_eq!(cy.divisor_basis(true, false).unwrap(), Basis::Indices(vec![5, 6]));
}

#[test]
fn recursive_clear_reaches_the_ambient_variety() {
    let v = special::p11169().unwrap();
    let cy = hypersurface(Rc::clone(&v));
    cy.clear_cache(false, false);
    assert_eq!(v.cache_clears(), 0);
    cy.clear_cache(true, false);
    assert_eq!(v.cache_clears(), 1);
}

#[test]
fn non_intersecting_divisors_move_to_a_smaller_variety() {
    let cy = hypersurface(special::p11169_all_points().unwrap());
    assert_eq!(cy.prime_toric_divisors().unwrap(), vec![1, 2, 3, 4, 5, 6]);
    let full = cy.toric_mori_cone(false, true).unwrap().rays().unwrap();
    assert_eq!(full.ncols(), 10);
    assert!(full.columns(7, 3).iter().all(|&x| x == 0));
    assert_eq!(
        sorted_rows(&cy.toric_mori_cone(true, true).unwrap().rays().unwrap()),
        vec![vec![0, 1], vec![1, -3], vec![1, 0]]
    );
    assert_eq!(
        cy.glsm_charge_matrix(true).unwrap().ncols(),
        7,
        "charges cover the origin and the prime divisors"
    );
    assert_eq!(cy.second_chern_class(false).unwrap().len(), 9);
}

#[test]
fn trivially_equivalent_triangulations_compare_equal() {
    let seven = p11169();
    let ten = hypersurface(special::p11169_all_points().unwrap());
    assert_eq!(seven.is_trivially_equivalent(&ten).unwrap(), Some(true));
    assert!(seven == ten);
    assert_eq!(seven.identity_hash(), ten.identity_hash());

    let q = quintic();
    assert_eq!(q.is_trivially_equivalent(&seven).unwrap(), Some(false));
    assert!(q != seven);
    assert!(quintic() == q);
}

#[test]
fn construction_checks() {
    // Hypersurfaces in P^5 are 4-folds and need the experimental switch.
    assert_eq!(
        CalabiYau::new(special::bicubic().unwrap(), None, CyConfig::default()).unwrap_err(),
        CyError::FeatureGate {
            feature: "non-favorable Calabi-Yaus or Calabi-Yaus of dimension other than 3"
        }
    );
    let fourfold =
        CalabiYau::new(special::bicubic().unwrap(), None, CyConfig::experimental()).unwrap();
    assert_eq!(fourfold.dim(), 4);
    assert!(matches!(
        fourfold.second_chern_class(false),
        Err(CyError::UnsupportedDimension { dim: 4, .. })
    ));

    // Point 7 is listed but never used.
    let v = special::p11169().unwrap();
    let poly = Rc::clone(v.triangulation().polytope_rc());
    let tri = FixedTriangulation::new(poly, (0..8).collect(), v.triangulation().simplices())
        .unwrap();
    let ring = v.intersection_numbers_exact(&Default::default()).unwrap();
    let mori = v.mori_cone().unwrap().rays().unwrap().insert_column(7, 0);
    let bad = Rc::new(FixedVariety::new(tri, ring, mori).unwrap());
    assert!(matches!(
        CalabiYau::new(bad, None, CyConfig::default()),
        Err(CyError::Construction { .. })
    ));
}

#[test]
fn non_favorable_threefolds_are_gated() {
    let points = vec![
        vec![0, 0, 0, 0],
        vec![1, 0, 0, 0],
        vec![0, 1, 0, 0],
        vec![0, 0, 1, 0],
        vec![0, 0, 0, 1],
        vec![-1, -1, -1, -1],
    ];
    let poly = Rc::new(FixedPolytope::new(points).unwrap().with_favorable(false));
    let q = special::quintic().unwrap();
    let tri = FixedTriangulation::new(poly, (0..6).collect(), q.triangulation().simplices())
        .unwrap();
    let ring = q.intersection_numbers_exact(&Default::default()).unwrap();
    let mori = q.mori_cone().unwrap().rays().unwrap();
    let v = Rc::new(FixedVariety::new(tri, ring, mori).unwrap());
    assert!(matches!(
        CalabiYau::new(Rc::clone(&v), None, CyConfig::default()),
        Err(CyError::FeatureGate { .. })
    ));
    assert!(CalabiYau::new(v, None, CyConfig::experimental()).is_ok());
}

proptest! {
    #[test]
    fn anticanonical_flip_is_an_involution(
        entries in prop::collection::vec(
            (prop::collection::vec(0usize..4, 3), -50i64..50),
            0..20,
        )
    ) {
        let t = SymTensor::from_entries(
            3,
            entries.into_iter().map(|(k, v)| (k, v as f64)),
        );
        let flipped = intnums::flip_anticanonical(&t);
        prop_assert_eq!(intnums::flip_anticanonical(&flipped), t.clone());
        for (key, v) in t.iter() {
            if !key.contains(&0) {
                prop_assert_eq!(flipped.get(key), v);
            }
        }
    }
}
