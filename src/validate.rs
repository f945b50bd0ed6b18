//! Constraint validation: free-form reference number to [`NormalizedTarget`].

use crate::area_codes;
use crate::types::{AreaCode, E164Number, NormalizedTarget, country};
use phonenumber::Mode;
use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Error validating a caller-supplied reference number.
///
/// All variants are terminal: validation failures are never retried.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// No reference number was provided.
    #[error("no number provided")]
    MissingInput,

    /// The reference could not be parsed as a phone number.
    #[error("provided number was invalid: {reference}")]
    UnparsableNumber { reference: String },

    /// The number resolved to no country, or to a country other than the US.
    #[error("configured to only handle US numbers; number: {reference}, country: {}", country.as_deref().unwrap_or("unknown"))]
    UnsupportedCountry {
        reference: String,
        country: Option<String>,
    },

    /// A valid US number whose area code is missing from the reference table.
    ///
    /// The table covers the full geographic numbering plan, so for geographic
    /// numbers this indicates stale reference data rather than caller error.
    /// Non-geographic prefixes (toll-free, 5XX) also land here; they have no
    /// owning state to search.
    #[error("area code {area_code} has no owning state in the numbering table")]
    UnknownAreaCode { area_code: AreaCode },
}

/// Validate a free-form reference number.
///
/// Checks, in order: presence, parseability under international numbering
/// rules, country resolution, the US-only scope, and the area-code-to-state
/// lookup. Succeeds only with a complete [`NormalizedTarget`]; the output is
/// a pure function of the input digits.
///
/// # Example
///
/// ```rust
/// use try_buy_number::validate;
///
/// let target = validate("+16175425942").unwrap();
/// assert_eq!(target.area_code.as_str(), "617");
/// assert_eq!(target.region.as_str(), "MA");
/// ```
pub fn validate(reference: &str) -> Result<NormalizedTarget, ValidationError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(ValidationError::MissingInput);
    }

    let parsed = match phonenumber::parse(None, reference) {
        Ok(parsed) => parsed,
        Err(_e) => {
            #[cfg(feature = "tracing")]
            warn!(reference, error = %_e, "Reference number failed to parse");
            return Err(ValidationError::UnparsableNumber {
                reference: reference.to_string(),
            });
        }
    };

    if !phonenumber::is_valid(&parsed) {
        #[cfg(feature = "tracing")]
        warn!(reference, "Reference number is not valid for its numbering plan");
        return Err(ValidationError::UnparsableNumber {
            reference: reference.to_string(),
        });
    }

    let country_id = parsed.country().id();
    if country_id != Some(country::US) {
        let country = country_id.map(|id| format!("{id:?}"));
        #[cfg(feature = "tracing")]
        warn!(reference, country = ?country, "Reference number is outside the US numbering plan");
        return Err(ValidationError::UnsupportedCountry {
            reference: reference.to_string(),
            country,
        });
    }

    // Valid US numbers carry a 10-digit national number; the first three
    // digits are the area code.
    let national = parsed.national().value().to_string();
    if national.len() != 10 {
        return Err(ValidationError::UnparsableNumber {
            reference: reference.to_string(),
        });
    }
    let area_code =
        AreaCode::new(&national[..3]).map_err(|_| ValidationError::UnparsableNumber {
            reference: reference.to_string(),
        })?;

    let region = area_codes::state_for(&area_code).ok_or_else(|| {
        #[cfg(feature = "tracing")]
        warn!(%area_code, "Area code missing from numbering table");
        ValidationError::UnknownAreaCode {
            area_code: area_code.clone(),
        }
    })?;

    let e164 = E164Number::new(parsed.format().mode(Mode::E164).to_string()).map_err(|_| {
        ValidationError::UnparsableNumber {
            reference: reference.to_string(),
        }
    })?;

    #[cfg(feature = "tracing")]
    debug!(%e164, %area_code, %region, "Reference number validated");

    Ok(NormalizedTarget {
        e164,
        country: country::US,
        area_code,
        region,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_us_number() {
        let target = validate("+16175425942").unwrap();
        assert_eq!(target.e164.as_str(), "+16175425942");
        assert_eq!(target.country, country::US);
        assert_eq!(target.area_code.as_str(), "617");
        assert_eq!(target.region.as_str(), "MA");
    }

    #[test]
    fn test_normalizes_formatting() {
        let target = validate("+1 (212) 876-6737").unwrap();
        assert_eq!(target.e164.as_str(), "+12128766737");
        assert_eq!(target.area_code.as_str(), "212");
        assert_eq!(target.region.as_str(), "NY");
    }

    #[test]
    fn test_more_states() {
        assert_eq!(validate("+19073330413").unwrap().region.as_str(), "AK");
        assert_eq!(validate("+13027216874").unwrap().region.as_str(), "DE");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(validate(""), Err(ValidationError::MissingInput)));
        assert!(matches!(
            validate("   "),
            Err(ValidationError::MissingInput)
        ));
    }

    #[test]
    fn test_unparsable_input() {
        // No '+' and no region hint, so the number cannot be resolved.
        assert!(matches!(
            validate("01189998819991197253"),
            Err(ValidationError::UnparsableNumber { .. })
        ));
        assert!(matches!(
            validate("not a number"),
            Err(ValidationError::UnparsableNumber { .. })
        ));
    }

    #[test]
    fn test_non_us_number_rejected() {
        let err = validate("+442079460958").unwrap_err();
        match err {
            ValidationError::UnsupportedCountry { country, .. } => {
                assert_eq!(country.as_deref(), Some("GB"));
            }
            other => panic!("expected UnsupportedCountry, got {other:?}"),
        }
    }

    #[test]
    fn test_idempotent() {
        let first = validate("+16175425942").unwrap();
        let second = validate("+16175425942").unwrap();
        assert_eq!(first, second);
    }
}
