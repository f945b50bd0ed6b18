//! Provider capability trait for numbering inventory and purchase.

use crate::errors::ProviderFailure;
use crate::types::{AreaCode, AvailableNumber, E164Number, PurchasedNumber, SearchScope};
use std::error::Error as StdError;
use std::future::Future;

/// Selector for a purchase request.
///
/// The provider either allocates the literal number, or atomically allocates
/// any number matching the area code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseSelector {
    /// Purchase exactly this number.
    Number(E164Number),
    /// Purchase any number in this area code.
    AreaCode(AreaCode),
}

/// Core trait every numbering provider must implement.
///
/// This is the injection seam between the acquisition logic and the remote
/// provisioning API: tests replace it with deterministic fakes, production
/// uses the Twilio adapter.
///
/// Both operations are scoped to US local numbers, with address-requirement
/// exclusions disabled (numbers requiring an address on file are included).
///
/// # Example
///
/// ```rust,ignore
/// use try_buy_number::{
///     AvailableNumber, NumberingProvider, PurchaseSelector, PurchasedNumber, SearchScope,
/// };
///
/// #[derive(Clone)]
/// struct MyProvider { /* ... */ }
///
/// impl NumberingProvider for MyProvider {
///     type Error = MyError;
///
///     async fn list_available(&self, scope: &SearchScope) -> Result<Vec<AvailableNumber>, Self::Error> {
///         // Query the inventory constrained to the scope
///     }
///
///     async fn buy(&self, selector: &PurchaseSelector) -> Result<PurchasedNumber, Self::Error> {
///         // Issue the billable purchase call
///     }
/// }
/// ```
pub trait NumberingProvider: Send + Sync + Clone {
    /// Error type returned by provider operations.
    type Error: StdError + ProviderFailure + Send + Sync + 'static;

    /// List currently available numbers matching the scope.
    ///
    /// Returns the provider's candidate list in provider order; an empty list
    /// means the scope is exhausted, not an error. Availability is a
    /// point-in-time statement with no lifetime guarantee.
    fn list_available(
        &self,
        scope: &SearchScope,
    ) -> impl Future<Output = Result<Vec<AvailableNumber>, Self::Error>> + Send;

    /// Purchase a number.
    ///
    /// Billable and non-idempotent: callers must never reissue a purchase
    /// whose outcome is unknown without reconciling owned numbers first.
    fn buy(
        &self,
        selector: &PurchaseSelector,
    ) -> impl Future<Output = Result<PurchasedNumber, Self::Error>> + Send;
}
