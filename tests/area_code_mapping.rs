//! Spot checks for the area-code-to-state reference table via the public API.

use try_buy_number::area_codes::state_for;
use try_buy_number::{AreaCode, validate};

fn code(s: &str) -> AreaCode {
    AreaCode::new(s).unwrap()
}

#[test]
fn test_known_mappings() {
    let cases = [
        ("212", "NY"),
        ("617", "MA"),
        ("907", "AK"),
        ("302", "DE"),
        ("808", "HI"),
        ("202", "DC"),
        ("415", "CA"),
        ("773", "IL"),
    ];
    for (area_code, state) in cases {
        let region = state_for(&code(area_code))
            .unwrap_or_else(|| panic!("area code {area_code} missing from table"));
        assert_eq!(region.as_str(), state, "area code {area_code}");
    }
}

#[test]
fn test_non_geographic_codes_have_no_state() {
    // Toll-free and personal-number prefixes have no owning state.
    for area_code in ["800", "888", "500", "900"] {
        assert!(state_for(&code(area_code)).is_none(), "{area_code}");
    }
}

#[test]
fn test_validation_agrees_with_table() {
    let target = validate("+16175425942").unwrap();
    assert_eq!(
        state_for(&target.area_code),
        Some(target.region.clone()),
        "validate() must derive the region from the same table"
    );
}
