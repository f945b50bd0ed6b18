//! Static NANP area-code to state mapping.

use crate::types::{AreaCode, Region};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// US area codes JSON embedded at compile time.
///
/// Geographic area codes only; non-geographic prefixes (toll-free, personal
/// communication services) have no owning state and are absent on purpose.
static AREA_CODES_JSON: &str = include_str!("../assets/us_area_codes.json");

/// Mapping from area code to owning state, built once at first use.
///
/// Every entry is validated during construction: a corrupt asset panics at
/// startup instead of surfacing later as a spurious table miss.
static AREA_CODE_TO_STATE: Lazy<HashMap<AreaCode, Region>> =
    Lazy::new(|| build_table(AREA_CODES_JSON));

fn build_table(json: &str) -> HashMap<AreaCode, Region> {
    let raw: HashMap<String, String> =
        serde_json::from_str(json).expect("us_area_codes.json is invalid");
    raw.into_iter()
        .map(|(code, state)| {
            let code = AreaCode::new(&code)
                .unwrap_or_else(|e| panic!("us_area_codes.json: bad area code {code}: {e}"));
            let state = Region::new(&state)
                .unwrap_or_else(|e| panic!("us_area_codes.json: bad state for {code}: {e}"));
            (code, state)
        })
        .collect()
}

/// Look up the state owning an area code.
///
/// Returns `None` for prefixes outside the geographic table.
pub fn state_for(area_code: &AreaCode) -> Option<Region> {
    AREA_CODE_TO_STATE.get(area_code).cloned()
}
