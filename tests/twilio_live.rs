//! Live tests against the real Twilio API.
//!
//! Ignored by default; they need `TWILIO_ACCOUNT_SID` / `TWILIO_AUTH_TOKEN`
//! in the environment (or a `.env` file). Use Twilio *test* credentials:
//! with those, purchases of the magic number `+15005550006` succeed without
//! billing, and no real number is provisioned.
//!
//! Run with: `cargo test --test twilio_live -- --ignored`

use try_buy_number::providers::twilio::TwilioProvider;
use try_buy_number::{
    AcquireNumbers, AcquisitionService, AreaCode, Config, E164Number, NumberConstraint,
    NumberingProvider, SearchScope,
};

fn live_service() -> AcquisitionService<TwilioProvider> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("TWILIO_ACCOUNT_SID / TWILIO_AUTH_TOKEN must be set");
    let provider = TwilioProvider::from_config(config).expect("failed to build Twilio provider");
    AcquisitionService::with_provider(provider)
}

#[tokio::test]
#[ignore = "requires Twilio credentials"]
async fn test_list_available_in_area_code() {
    let service = live_service();
    let scope = SearchScope::AreaCode(AreaCode::new("617").unwrap());

    let numbers = service.provider().list_available(&scope).await.unwrap();
    println!("found {} available numbers in 617", numbers.len());
    for number in numbers.iter().take(5) {
        assert!(number.as_str().starts_with("+1617"), "{number}");
    }
}

#[tokio::test]
#[ignore = "requires Twilio test credentials"]
async fn test_purchase_magic_number() {
    let service = live_service();
    let number = E164Number::new("+15005550006").unwrap();

    let purchased = service
        .purchase(&NumberConstraint::exact(number))
        .await
        .unwrap();
    assert_eq!(purchased.as_str(), "+15005550006");
}

#[tokio::test]
#[ignore = "requires Twilio test credentials"]
async fn test_purchase_unavailable_magic_number_is_rejected() {
    use try_buy_number::{PurchaseError, RejectionReason};

    let service = live_service();
    // Twilio test magic number that always answers "unavailable".
    let number = E164Number::new("+15005550000").unwrap();

    let err = service
        .purchase(&NumberConstraint::exact(number))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PurchaseError::Rejected {
            reason: RejectionReason::NumberUnavailable,
            ..
        }
    ));
}
