//! # try-buy-number
//!
//! Acquire US phone numbers "near" a reference number, with a bounded
//! fallback cascade and race-aware purchasing.
//!
//! Given a reference number like `+16175425942`, the service tries to buy a
//! number in the same area code; if the provider reports the area code
//! exhausted, it falls back to a single availability search in the owning
//! state and one purchase attempt on the first candidate. Nothing is ever
//! retried blindly: purchases are billable and non-idempotent, so an
//! unobserved outcome surfaces as [`PurchaseError::AmbiguousOutcome`] instead
//! of a second request.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use try_buy_number::{
//!     AcquireNumbers, AcquisitionService, Config, NumberConstraint,
//!     providers::twilio::TwilioProvider,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let service = AcquisitionService::with_provider(TwilioProvider::from_config(config)?);
//!
//!     let purchased = service
//!         .purchase(&NumberConstraint::near("+16175425942"))
//!         .await?;
//!     println!("Purchased {purchased}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------+
//! |       AcquisitionService<P>                |
//! |  validate -> optimistic buy -> fallback    |
//! +--------------------------------------------+
//!                      |
//!                      v
//! +--------------------------------------------+
//! |   NumberingProvider (trait)                |
//! |   list_available / buy                     |
//! +--------------------------------------------+
//!                      |
//!           +----------+-----------+
//!           v                      v
//!   TwilioProvider          test fakes
//! ```
//!
//! The [`NumberingProvider`] trait is the seam between the acquisition
//! protocol and the provisioning API. Provider errors carry their own
//! classification via [`ProviderFailure`], so the generic service never
//! inspects provider-specific codes.
//!
//! ## Features
//!
//! - `twilio` (default): the Twilio REST API provider.
//! - `tracing` (default): structured spans and events via `tracing`, with
//!   OpenTelemetry span status on API calls.

pub mod area_codes;
pub mod config;
pub mod errors;
pub mod provider;
pub mod providers;
pub mod service;
pub mod types;
pub mod validate;

pub use config::{Config, ConfigError, CredentialPair, Credentials};
pub use errors::{ProviderFailure, RejectionReason};
pub use provider::{NumberingProvider, PurchaseSelector};
pub use service::{
    AcquireNumbers, AcquisitionConfig, AcquisitionService, PurchaseError, SearchError,
};
pub use types::{
    AreaCode, AreaCodeError, AvailableNumber, E164Error, E164Number, NormalizedTarget,
    NumberConstraint, PurchasedNumber, Region, RegionError, SearchScope,
};
pub use validate::{ValidationError, validate};
