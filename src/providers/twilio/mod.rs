//! Twilio numbering provider.
//!
//! Talks to the Twilio REST API (`2010-04-01`) to query available US local
//! numbers and provision incoming numbers. Error codes `21452` (area code
//! exhausted) and `21422` (number unavailable) are classified at this
//! boundary; everything above works with the crate's own rejection taxonomy.

mod client;
mod errors;
mod provider;
mod response;

pub use client::{DEFAULT_API_URL, TwilioClient, TwilioClientBuilder};
pub use errors::{
    CODE_AREA_CODE_EXHAUSTED, CODE_NUMBER_UNAVAILABLE, TwilioError, TwilioRejection,
};
pub use provider::TwilioProvider;
pub use response::{AvailablePhoneNumber, AvailablePhoneNumbersPage, IncomingPhoneNumber};
