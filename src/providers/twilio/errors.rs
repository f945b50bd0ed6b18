//! Error types for the Twilio provider.

use crate::errors::{ProviderFailure, RejectionReason};
use thiserror::Error;

/// Twilio error code for "no phone numbers found in that area code".
pub const CODE_AREA_CODE_EXHAUSTED: u32 = 21452;
/// Twilio error code for "phone number is not available".
pub const CODE_NUMBER_UNAVAILABLE: u32 = 21422;

/// A definite rejection returned by the Twilio REST API.
///
/// The numeric error code is classified into a [`RejectionReason`] once,
/// here, so nothing downstream matches provider codes.
#[derive(Debug, Clone, Error)]
#[error("Twilio rejected the request: status={status}, code={code:?}, message={message}")]
pub struct TwilioRejection {
    /// HTTP status of the response.
    pub status: u16,
    /// Twilio's machine-readable error code, when present.
    pub code: Option<u32>,
    /// Human-readable message from the response body.
    pub message: String,
    reason: RejectionReason,
}

impl TwilioRejection {
    /// Create a rejection from response parts, classifying the code.
    pub fn new(status: u16, code: Option<u32>, message: impl Into<String>) -> Self {
        let message = message.into();
        let reason = classify(code, &message);
        Self {
            status,
            code,
            message,
            reason,
        }
    }

    /// The classified rejection reason.
    pub fn reason(&self) -> &RejectionReason {
        &self.reason
    }
}

/// Translate a Twilio error code into the crate taxonomy.
fn classify(code: Option<u32>, message: &str) -> RejectionReason {
    match code {
        Some(CODE_AREA_CODE_EXHAUSTED) => RejectionReason::AreaCodeExhausted,
        Some(CODE_NUMBER_UNAVAILABLE) => RejectionReason::NumberUnavailable,
        _ => RejectionReason::other(code, message),
    }
}

/// Main error type for Twilio client operations.
#[derive(Debug, Error)]
pub enum TwilioError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// The configured API endpoint is not usable.
    #[error("invalid API endpoint: {0}")]
    InvalidEndpoint(String),

    /// Error building the request URL query string.
    #[error("error building request URL: {0}")]
    BuildRequestUrl(#[source] serde_urlencoded::ser::Error),

    /// Failed to send the HTTP request.
    #[error("failed to send HTTP request: {0}")]
    HttpRequest(#[from] reqwest_middleware::Error),

    /// Failed to read the response body.
    #[error("failed to read response body: {0}")]
    ReadResponse(#[source] reqwest::Error),

    /// Failed to deserialize a JSON response.
    #[error("failed to deserialize response: {0}")]
    DeserializeJson(#[source] serde_json::Error),

    /// The API answered with a rejection.
    #[error("Twilio API error: {0}")]
    Api(#[source] TwilioRejection),
}

pub type Result<T> = std::result::Result<T, TwilioError>;

/// Whether the request may have reached Twilio despite the transport error.
///
/// Builder and connect failures happen before anything is written to the
/// wire; everything else (timeouts, resets mid-response) may have landed.
fn request_may_have_been_sent(err: &reqwest_middleware::Error) -> bool {
    match err {
        reqwest_middleware::Error::Reqwest(e) => !(e.is_builder() || e.is_connect()),
        reqwest_middleware::Error::Middleware(_) => false,
    }
}

impl ProviderFailure for TwilioError {
    fn rejection(&self) -> Option<&RejectionReason> {
        match self {
            Self::Api(rejection) => Some(rejection.reason()),
            _ => None,
        }
    }

    fn outcome_unknown(&self) -> bool {
        match self {
            Self::HttpRequest(err) => request_may_have_been_sent(err),
            // The request was answered; we just could not interpret the
            // answer. A purchase may well have gone through.
            Self::ReadResponse(_) | Self::DeserializeJson(_) => true,
            Self::BuildHttpClient(_)
            | Self::InvalidEndpoint(_)
            | Self::BuildRequestUrl(_)
            | Self::Api(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_area_code_exhausted() {
        let rejection = TwilioRejection::new(
            400,
            Some(CODE_AREA_CODE_EXHAUSTED),
            "No phone numbers found in area code 212.",
        );
        assert_eq!(rejection.reason(), &RejectionReason::AreaCodeExhausted);
    }

    #[test]
    fn test_classify_number_unavailable() {
        let rejection = TwilioRejection::new(
            400,
            Some(CODE_NUMBER_UNAVAILABLE),
            "PhoneNumber is not available.",
        );
        assert_eq!(rejection.reason(), &RejectionReason::NumberUnavailable);
    }

    #[test]
    fn test_classify_other() {
        let rejection = TwilioRejection::new(401, Some(20003), "Authenticate");
        assert_eq!(
            rejection.reason(),
            &RejectionReason::other(Some(20003), "Authenticate")
        );

        let rejection = TwilioRejection::new(500, None, "Internal Server Error");
        assert_eq!(
            rejection.reason(),
            &RejectionReason::other(None, "Internal Server Error")
        );
    }

    #[test]
    fn test_api_errors_are_definite() {
        let err = TwilioError::Api(TwilioRejection::new(400, Some(21452), "exhausted"));
        assert!(!err.outcome_unknown());
        assert_eq!(err.rejection(), Some(&RejectionReason::AreaCodeExhausted));
    }

    #[test]
    fn test_undecodable_response_is_ambiguous() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = TwilioError::DeserializeJson(json_err);
        assert!(err.outcome_unknown());
        assert!(err.rejection().is_none());
    }
}
