use std::io;
use std::sync::{Arc, Mutex};

use super::*;
use crate::cfg::IntNumsCfg;
use crate::toric::fixed::FixedVariety;
use crate::toric::special;
use crate::toric::{NefPartitionQuery, NefPartitionRecord};

fn bicubic_on(v: Rc<FixedVariety>) -> CalabiYau<FixedVariety> {
    CalabiYau::new(
        v,
        Some(special::bicubic_nef_partition()),
        CyConfig::experimental(),
    )
    .unwrap()
}

fn bicubic() -> CalabiYau<FixedVariety> {
    bicubic_on(special::bicubic().unwrap())
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` and return what it logged at warn level or above.
fn warnings_during<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buf = LogBuffer::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .with_writer(move || writer.clone())
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let logged = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    (out, logged)
}

#[test]
fn complete_intersections_are_experimental() {
    let err = CalabiYau::new(
        special::bicubic().unwrap(),
        Some(special::bicubic_nef_partition()),
        CyConfig::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        CyError::FeatureGate {
            feature: "complete intersections"
        }
    );
}

#[test]
fn bicubic_shape_and_restriction() {
    let cy = bicubic();
    assert!(!cy.is_hypersurface());
    assert_eq!(cy.dim(), 3);
    assert_eq!(cy.ambient_dim(), 5);
    assert_eq!(
        cy.nef_partition().unwrap(),
        &[vec![1, 2, 3], vec![4, 5, 6]][..]
    );
    let k = cy.intersection_numbers(&IntNumsCfg::default()).unwrap();
    assert_eq!(k.get(&[1, 2, 3]), 9.0);
    assert_eq!(k.get(&[1, 1, 6]), 9.0);
    assert_eq!(k.get(&[4, 4, 4]), 9.0);
    assert_eq!(k.get(&[0, 1, 2]), -54.0);
    assert!(cy.is_smooth().unwrap());
    let kb = cy.intersection_numbers(&IntNumsCfg::in_basis()).unwrap();
    assert_eq!(kb.get(&[0, 0, 0]), 9.0);
}

#[test]
fn restriction_drops_small_entries_and_rounds() {
    let amb = crate::tensor::SymTensor::from_entries(
        3,
        vec![
            (vec![1, 2, 3], 1.02),
            (vec![1, 1, 3], 1e-4),
            (vec![2, 2, 2], 2.0),
        ],
    );
    let (t, smooth) = intnums::restrict_cicy(&amb, &[vec![1]], 1e-3, 5e-2);
    assert!(smooth);
    assert_eq!(t.get(&[2, 3]), 1.0);
    assert_eq!(t.get(&[1, 3]), 0.0);
    assert_eq!(t.len(), 1);

    let rough = crate::tensor::SymTensor::from_entries(2, vec![(vec![1, 2], 0.5)]);
    let (t, smooth) = intnums::restrict_cicy(&rough, &[vec![2]], 1e-3, 5e-2);
    assert!(!smooth);
    assert_eq!(t.get(&[1]), 0.5);
}

#[test]
fn hodge_numbers_come_from_the_standard_enumeration() {
    let cy = bicubic();
    assert_eq!(
        cy.to_string(),
        "A complete intersection Calabi-Yau 3-fold in a 5-dimensional toric variety"
    );
    assert_eq!(cy.h11().unwrap(), 1);
    assert_eq!(cy.h21().unwrap(), 73);
    assert_eq!(cy.hpq(3, 0).unwrap(), 1);
    assert_eq!(cy.hpq(2, 0).unwrap(), 0);
    assert_eq!(cy.hpq(7, 7).unwrap(), 0);
    assert_eq!(cy.chi().unwrap(), -144);
    assert_eq!(
        cy.to_string(),
        "A complete intersection Calabi-Yau 3-fold with h11=1 h21=73 in a 5-dimensional toric variety"
    );
}

#[test]
fn enumerations_are_reused_by_later_models() {
    let v = special::bicubic().unwrap();
    let first = bicubic_on(Rc::clone(&v));
    first.h11().unwrap();
    let second = bicubic_on(v);
    assert!(second.to_string().contains("h21=73"));
}

#[test]
fn symmetric_enumeration_is_the_last_resort() {
    let v = special::bicubic_with_catalogue(vec![special::bicubic_record(
        NefPartitionQuery::symmetric(2),
    )])
    .unwrap();
    assert_eq!(bicubic_on(v).h11().unwrap(), 1);
}

#[test]
fn unsupported_records_are_ignored() {
    let products = NefPartitionQuery {
        keep_products: true,
        ..NefPartitionQuery::standard(2)
    };
    let no_hodge = NefPartitionRecord {
        query: NefPartitionQuery {
            compute_hodge_numbers: false,
            ..NefPartitionQuery::standard(2)
        },
        ..special::bicubic_record(NefPartitionQuery::standard(2))
    };
    let v = special::bicubic_with_catalogue(vec![special::bicubic_record(products), no_hodge])
        .unwrap();
    assert_eq!(bicubic_on(v).h11(), Err(CyError::CicyResolution));

    let empty = special::bicubic_with_catalogue(Vec::new()).unwrap();
    let cy = bicubic_on(empty);
    assert_eq!(cy.chi(), Err(CyError::CicyResolution));
    assert_eq!(
        cy.to_string(),
        "A complete intersection Calabi-Yau 3-fold in a 5-dimensional toric variety"
    );
}

#[test]
fn full_clear_forgets_hodge_numbers_until_recomputed() {
    let cy = bicubic();
    cy.h11().unwrap();
    cy.clear_cache(false, false);
    // The enumeration stays cached on the polytope, so the constructor-time
    // lookup finds it again.
    assert!(cy.to_string().contains("h11=1"));
}

#[test]
fn cicy_identity_uses_ambient_and_partition() {
    let v = special::bicubic().unwrap();
    let a = bicubic_on(Rc::clone(&v));
    let b = bicubic_on(Rc::clone(&v));
    assert_eq!(a.is_trivially_equivalent(&b).unwrap(), None);
    assert!(a == b);
    assert_eq!(a.identity_hash(), b.identity_hash());
    let other = CalabiYau::new(
        v,
        Some(vec![vec![1, 2, 4], vec![3, 5, 6]]),
        CyConfig::experimental(),
    )
    .unwrap();
    assert!(a != other);
}

#[test]
fn unequal_comparisons_always_warn() {
    let v = special::bicubic().unwrap();
    let a = bicubic_on(Rc::clone(&v));
    let twin = bicubic_on(Rc::clone(&v));
    let b = CalabiYau::new(
        v,
        Some(vec![vec![1, 2, 4], vec![3, 5, 6]]),
        CyConfig::experimental(),
    )
    .unwrap();
    let (same, logged) = warnings_during(|| a == b);
    assert!(!same);
    assert!(logged.contains("may still be equivalent"), "{logged}");

    let quintic = CalabiYau::new(special::quintic().unwrap(), None, CyConfig::default()).unwrap();
    let (same, logged) = warnings_during(|| quintic == a);
    assert!(!same);
    assert!(logged.contains("may still be equivalent"), "{logged}");

    let (same, logged) = warnings_during(|| a == twin);
    assert!(same);
    assert!(logged.is_empty(), "{logged}");
}

#[test]
fn invalid_partitions_are_rejected() {
    let v = special::bicubic().unwrap();
    let missing_vertex = CalabiYau::new(
        Rc::clone(&v),
        Some(vec![vec![1, 2], vec![4, 5, 6]]),
        CyConfig::experimental(),
    );
    assert!(matches!(missing_vertex, Err(CyError::Construction { .. })));
    let out_of_range = CalabiYau::new(v, Some(vec![vec![1, 2, 3], vec![4, 5, 60]]), CyConfig::experimental());
    assert!(matches!(out_of_range, Err(CyError::Construction { .. })));
}
