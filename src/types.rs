//! Core types for phone number acquisition.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

pub use phonenumber::country;

// =============================================================================
// E164Number
// =============================================================================

/// Error when parsing an E.164 number.
#[derive(Debug, Clone, Error)]
pub enum E164Error {
    /// Number is empty.
    #[error("number cannot be empty")]
    Empty,
    /// Number is missing the leading '+'.
    #[error("E.164 number must start with '+'")]
    MissingPlus,
    /// Number contains non-digit characters after the '+'.
    #[error("E.164 number must contain only digits after '+'")]
    NonDigit,
    /// Number has invalid length.
    #[error("E.164 number must be between 7 and 15 digits")]
    InvalidLength,
}

/// A phone number in E.164 form (e.g. `"+16175425942"`).
///
/// Stored with the leading `+` followed by the country calling code and the
/// national number.
///
/// # Example
///
/// ```rust
/// use try_buy_number::E164Number;
///
/// let number = E164Number::new("+16175425942").unwrap();
/// assert_eq!(number.as_str(), "+16175425942");
/// assert!(E164Number::new("6175425942").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct E164Number(String);

impl E164Number {
    /// Create a new E164Number, validating the shape.
    pub fn new(s: impl AsRef<str>) -> Result<Self, E164Error> {
        let s = s.as_ref().trim();
        if s.is_empty() {
            return Err(E164Error::Empty);
        }
        let digits = s.strip_prefix('+').ok_or(E164Error::MissingPlus)?;
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(E164Error::NonDigit);
        }
        if !(7..=15).contains(&digits.len()) {
            return Err(E164Error::InvalidLength);
        }
        Ok(Self(s.to_string()))
    }

    /// Get the number as a string slice, including the leading '+'.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for E164Number {
    type Err = E164Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for E164Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for E164Number {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for E164Number {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for E164Number {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        E164Number::new(raw).map_err(de::Error::custom)
    }
}

// =============================================================================
// AreaCode
// =============================================================================

/// Error when parsing an area code.
#[derive(Debug, Clone, Error)]
pub enum AreaCodeError {
    /// Area code contains non-digit characters.
    #[error("area code must contain only digits")]
    NonDigit,
    /// Area code is not exactly three digits.
    #[error("area code must be exactly 3 digits")]
    InvalidLength,
    /// Area code starts with 0 or 1, which the NANP reserves.
    #[error("area code cannot start with 0 or 1")]
    ReservedPrefix,
}

/// A NANP area code (e.g. `"617"`).
///
/// Three digits, first digit 2-9 per the North American Numbering Plan.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AreaCode(String);

impl AreaCode {
    /// Create a new AreaCode from a string.
    pub fn new(s: impl AsRef<str>) -> Result<Self, AreaCodeError> {
        let s = s.as_ref().trim();
        if !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(AreaCodeError::NonDigit);
        }
        if s.len() != 3 {
            return Err(AreaCodeError::InvalidLength);
        }
        if s.starts_with('0') || s.starts_with('1') {
            return Err(AreaCodeError::ReservedPrefix);
        }
        Ok(Self(s.to_string()))
    }

    /// Get the area code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AreaCode {
    type Err = AreaCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for AreaCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AreaCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for AreaCode {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AreaCode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        AreaCode::new(raw).map_err(de::Error::custom)
    }
}

// =============================================================================
// Region
// =============================================================================

/// Error when parsing a region code.
#[derive(Debug, Clone, Error)]
pub enum RegionError {
    /// Region code is not exactly two characters.
    #[error("region must be a two-letter state code")]
    InvalidLength,
    /// Region code contains non-letter characters.
    #[error("region must contain only letters")]
    NonAlpha,
}

/// A US state or territory code (e.g. `"MA"`).
///
/// Two ASCII letters, uppercased on construction. This is the second
/// fallback scope when an area code has no available numbers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Region(String);

impl Region {
    /// Create a new Region from a string.
    pub fn new(s: impl AsRef<str>) -> Result<Self, RegionError> {
        let s = s.as_ref().trim();
        if s.len() != 2 {
            return Err(RegionError::InvalidLength);
        }
        if !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RegionError::NonAlpha);
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Get the region as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Region {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Region {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        Region::new(raw).map_err(de::Error::custom)
    }
}

// =============================================================================
// AvailableNumber
// =============================================================================

/// A phone number reported purchasable by the inventory query.
///
/// The availability guarantee holds only at query time; the number may be
/// taken by another buyer before a purchase completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableNumber(String);

impl AvailableNumber {
    /// Create a new AvailableNumber.
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Get the number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AvailableNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AvailableNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for AvailableNumber {
    fn from(number: String) -> Self {
        Self(number)
    }
}

impl From<&str> for AvailableNumber {
    fn from(number: &str) -> Self {
        Self(number.to_string())
    }
}

// =============================================================================
// PurchasedNumber
// =============================================================================

/// A phone number actually allocated by a successful purchase call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasedNumber(String);

impl PurchasedNumber {
    /// Create a new PurchasedNumber.
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Get the number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PurchasedNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PurchasedNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for PurchasedNumber {
    fn from(number: String) -> Self {
        Self(number)
    }
}

// =============================================================================
// NumberConstraint
// =============================================================================

/// Caller-supplied constraint describing which number to acquire.
///
/// `Near` asks for a number resembling the reference (same area code, or the
/// same state when the area code is exhausted). `Exact` asks for that literal
/// number with no search or fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberConstraint {
    /// Acquire a number near this free-form reference number.
    Near { reference: String },
    /// Purchase exactly this number.
    Exact { number: E164Number },
}

impl NumberConstraint {
    /// Constraint for a number near the given reference.
    pub fn near(reference: impl Into<String>) -> Self {
        Self::Near {
            reference: reference.into(),
        }
    }

    /// Constraint for exactly the given number.
    pub fn exact(number: E164Number) -> Self {
        Self::Exact { number }
    }
}

// =============================================================================
// NormalizedTarget
// =============================================================================

/// Validated and normalized form of a reference number.
///
/// Produced by [`validate`](crate::validate::validate). `area_code` and
/// `region` are derived deterministically from `e164` and are always present;
/// validation fails rather than producing a partial record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTarget {
    /// The reference number in E.164 form.
    pub e164: E164Number,
    /// Resolved country. Always [`country::US`].
    pub country: country::Id,
    /// Area code of the reference number.
    pub area_code: AreaCode,
    /// State owning the area code.
    pub region: Region,
}

// =============================================================================
// SearchScope
// =============================================================================

/// The current relaxation level of an availability search.
///
/// Ordering is fixed and monotonic: a failed scope widens exactly one step
/// via [`widen`](SearchScope::widen) and never narrows.
///
/// ```text
/// Exact(number) -> AreaCode(code) -> Region(state)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    /// Only the literal number itself.
    Exact(E164Number),
    /// Any number in the given area code.
    AreaCode(AreaCode),
    /// Any number in the given state.
    Region(Region),
}

impl SearchScope {
    /// The next, strictly broader scope for this target, or `None` when the
    /// search is exhausted.
    pub fn widen(&self, target: &NormalizedTarget) -> Option<SearchScope> {
        match self {
            Self::Exact(_) => Some(Self::AreaCode(target.area_code.clone())),
            Self::AreaCode(_) => Some(Self::Region(target.region.clone())),
            Self::Region(_) => None,
        }
    }

    /// Short name of the scope, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exact(_) => "exact",
            Self::AreaCode(_) => "area_code",
            Self::Region(_) => "region",
        }
    }
}

impl Display for SearchScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(number) => write!(f, "exact({})", number),
            Self::AreaCode(code) => write!(f, "area_code({})", code),
            Self::Region(region) => write!(f, "region({})", region),
        }
    }
}
