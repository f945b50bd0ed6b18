//! Basic usage example: acquire a number near a reference number.
//!
//! Tries to buy a number in the reference's area code, falling back to a
//! state-wide search if the area code is exhausted.
//!
//! # Running
//!
//! ```bash
//! TWILIO_ACCOUNT_SID=ACxxx TWILIO_AUTH_TOKEN=xxx \
//!     cargo run --example acquire_number -- +16175425942
//! ```
//!
//! Note: this provisions a real, billable number when run with live
//! credentials. Use Twilio test credentials to exercise the flow safely.

use std::env;
use try_buy_number::providers::twilio::TwilioProvider;
use try_buy_number::{
    AcquireNumbers, AcquisitionService, Config, NumberConstraint, PurchaseError,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let reference = env::args()
        .nth(1)
        .unwrap_or_else(|| "+16175425942".to_string());

    // Credentials from TWILIO_ACCOUNT_SID / TWILIO_AUTH_TOKEN
    let config = Config::from_env()?;
    let provider = TwilioProvider::from_config(config)?;
    let service = AcquisitionService::with_provider(provider);

    // Show what the reference normalizes to before buying anything
    let target = service.validate(&reference)?;
    println!("Reference number: {}", target.e164);
    println!("  Area code: {}", target.area_code);
    println!("  State:     {}", target.region);

    println!("\nAcquiring a number near {}...", target.e164);
    match service.purchase(&NumberConstraint::near(&reference)).await {
        Ok(purchased) => println!("Purchased: {purchased}"),
        Err(PurchaseError::RaceLost { number, .. }) => {
            println!("Lost the race for {number}; run again to retry");
        }
        Err(PurchaseError::AmbiguousOutcome { .. }) => {
            println!("Purchase outcome unknown; check your owned numbers before retrying");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
