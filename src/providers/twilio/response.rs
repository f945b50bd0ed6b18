//! Response payloads for the Twilio REST API.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::errors::TwilioRejection;

/// One entry from an availability query.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailablePhoneNumber {
    /// The number in E.164 form.
    pub phone_number: String,
    /// Display form, e.g. `"(617) 555-1234"`.
    #[serde(default)]
    pub friendly_name: Option<String>,
    /// State the number is homed in.
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub iso_country: Option<String>,
}

/// Page of available numbers, as returned by
/// `AvailablePhoneNumbers/{Country}/Local.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailablePhoneNumbersPage {
    pub available_phone_numbers: Vec<AvailablePhoneNumber>,
}

/// A provisioned number record, as returned by a successful purchase.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingPhoneNumber {
    /// Resource SID of the provisioned number (`PN...`).
    pub sid: String,
    /// The allocated number in E.164 form.
    pub phone_number: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
}

/// Error body shape used across the Twilio REST API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<u32>,
    #[serde(default)]
    message: Option<String>,
}

/// Decoded outcome of a Twilio API call.
#[derive(Debug, Clone)]
pub enum TwilioResponse<T> {
    /// A 2xx response with the expected payload.
    Success(T),
    /// A non-2xx response with the standard error body.
    Error(TwilioRejection),
}

impl<T: DeserializeOwned> TwilioResponse<T> {
    /// Decode a response from its status code and body text.
    ///
    /// Non-2xx bodies that do not match the standard error shape are still
    /// treated as rejections, carrying the raw body as the message; only a
    /// 2xx body that fails to decode is a deserialization error.
    pub fn from_parts(status: u16, text: &str) -> Result<Self, serde_json::Error> {
        if (200..300).contains(&status) {
            return serde_json::from_str(text).map(Self::Success);
        }
        let rejection = match serde_json::from_str::<ErrorBody>(text) {
            Ok(body) => {
                let message = body.message.unwrap_or_else(|| text.trim().to_string());
                TwilioRejection::new(status, body.code, message)
            }
            Err(_) => TwilioRejection::new(status, None, text.trim()),
        };
        Ok(Self::Error(rejection))
    }
}

impl<T> TwilioResponse<T> {
    /// Convert into a `Result`, surfacing rejections as errors.
    pub fn into_result(self) -> Result<T, TwilioRejection> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Error(rejection) => Err(rejection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RejectionReason;

    #[test]
    fn test_parse_available_numbers_page() {
        let json = r#"{
            "available_phone_numbers": [
                {
                    "friendly_name": "(617) 555-0142",
                    "phone_number": "+16175550142",
                    "region": "MA",
                    "iso_country": "US"
                },
                {
                    "friendly_name": "(617) 555-0199",
                    "phone_number": "+16175550199",
                    "region": "MA",
                    "iso_country": "US"
                }
            ],
            "uri": "/2010-04-01/Accounts/AC123/AvailablePhoneNumbers/US/Local.json"
        }"#;

        let page = TwilioResponse::<AvailablePhoneNumbersPage>::from_parts(200, json)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(page.available_phone_numbers.len(), 2);
        assert_eq!(
            page.available_phone_numbers[0].phone_number,
            "+16175550142"
        );
        assert_eq!(page.available_phone_numbers[1].region.as_deref(), Some("MA"));
    }

    #[test]
    fn test_parse_empty_page() {
        let json = r#"{"available_phone_numbers": []}"#;
        let page = TwilioResponse::<AvailablePhoneNumbersPage>::from_parts(200, json)
            .unwrap()
            .into_result()
            .unwrap();
        assert!(page.available_phone_numbers.is_empty());
    }

    #[test]
    fn test_parse_incoming_phone_number() {
        let json = r#"{
            "sid": "PN2a0747eba6abf96b7e3c3ff0b4530f6e",
            "phone_number": "+16175550142",
            "friendly_name": "(617) 555-0142",
            "account_sid": "AC123"
        }"#;

        let number = TwilioResponse::<IncomingPhoneNumber>::from_parts(201, json)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(number.phone_number, "+16175550142");
        assert!(number.sid.starts_with("PN"));
    }

    #[test]
    fn test_parse_error_body() {
        let json = r#"{
            "code": 21452,
            "message": "No phone numbers found in area code 212.",
            "more_info": "https://www.twilio.com/docs/errors/21452",
            "status": 400
        }"#;

        let rejection = TwilioResponse::<IncomingPhoneNumber>::from_parts(400, json)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(rejection.status, 400);
        assert_eq!(rejection.code, Some(21452));
        assert_eq!(rejection.reason(), &RejectionReason::AreaCodeExhausted);
    }

    #[test]
    fn test_non_json_error_body() {
        let rejection = TwilioResponse::<IncomingPhoneNumber>::from_parts(502, "Bad Gateway")
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(rejection.status, 502);
        assert_eq!(rejection.code, None);
        assert_eq!(rejection.message, "Bad Gateway");
    }

    #[test]
    fn test_malformed_success_body_is_error() {
        assert!(TwilioResponse::<IncomingPhoneNumber>::from_parts(200, "not json").is_err());
    }
}
