//! Print invariants of the built-in Calabi–Yau examples.
//!
//! Usage:
//!   cargo run -p toric-cy --example model_summary -- quintic
//!   cargo run -p toric-cy --example model_summary -- p11169
//!   cargo run -p toric-cy --example model_summary -- bicubic
//!
//! Prints the description, the default divisor basis, the basis
//! intersection numbers, c2 and the Kähler-cone tip.

use toric_cy::api::{
    special, CalabiYau, Cone, CyConfig, CyError, FixedVariety, IntNums, IntNumsCfg,
};

fn build(name: &str) -> Result<CalabiYau<FixedVariety>, CyError> {
    match name {
        "p11169" => CalabiYau::new(special::p11169()?, None, CyConfig::default()),
        "bicubic" => CalabiYau::new(
            special::bicubic()?,
            Some(special::bicubic_nef_partition()),
            CyConfig::experimental(),
        ),
        _ => CalabiYau::new(special::quintic()?, None, CyConfig::default()),
    }
}

fn main() -> Result<(), CyError> {
    let name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "quintic".to_string());
    let cy = build(&name)?;
    // Trigger the Hodge lookup so the description carries the numbers.
    let h11 = cy.h11()?;
    println!("{cy}");
    println!("h11 = {h11}, chi = {}", cy.chi()?);
    println!("divisor basis: {:?}", cy.divisor_basis(true, false)?);
    if let IntNums::Sparse(k) = cy.intersection_numbers(&IntNumsCfg::in_basis())? {
        for (key, v) in k.iter() {
            println!("  kappa{key:?} = {v}");
        }
    }
    println!("c2 in basis: {:?}", cy.second_chern_class(true)?);
    let tip = cy.toric_kahler_cone()?.tip_of_stretched_cone(1.0)?;
    println!("Kähler tip: {:?}", tip.as_slice());
    println!("volume at tip: {:.4}", cy.compute_cy_volume(tip.as_slice())?);
    Ok(())
}
