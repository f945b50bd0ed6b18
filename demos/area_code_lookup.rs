//! Offline demo of reference-number validation and the area-code table.
//!
//! # Running
//!
//! ```bash
//! cargo run --example area_code_lookup
//! ```

use try_buy_number::area_codes::state_for;
use try_buy_number::{AreaCode, SearchScope, validate};

fn main() {
    println!("=== Reference Number Validation ===\n");

    let references = [
        "+16175425942",
        "+1 (212) 876-6737",
        "+19073330413",
        "+442079460958",
        "not a number",
    ];

    println!("{:<22} {:<16} {:<6} {:<6}", "Input", "E.164", "Area", "State");
    println!("{}", "-".repeat(52));
    for reference in references {
        match validate(reference) {
            Ok(target) => println!(
                "{:<22} {:<16} {:<6} {:<6}",
                reference, target.e164, target.area_code, target.region
            ),
            Err(e) => println!("{:<22} rejected: {}", reference, e),
        }
    }

    println!("\n=== Area Code -> State Lookup ===\n");

    let codes = ["212", "617", "907", "302", "808", "202", "800", "555"];
    for code in codes {
        match AreaCode::new(code) {
            Ok(area_code) => match state_for(&area_code) {
                Some(state) => println!("  {area_code} -> {state}"),
                None => println!("  {area_code} -> no owning state (non-geographic)"),
            },
            Err(e) => println!("  {code} -> invalid: {e}"),
        }
    }

    println!("\n=== Search Scope Cascade ===\n");

    let target = validate("+16175425942").unwrap();
    let mut scope = SearchScope::AreaCode(target.area_code.clone());
    println!("  start: {scope}");
    while let Some(next) = scope.widen(&target) {
        println!("  widen: {next}");
        scope = next;
    }
    println!("  (exhausted)");
}
