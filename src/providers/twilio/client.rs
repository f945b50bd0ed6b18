//! HTTP client for the Twilio REST API.
//!
//! Covers exactly the two resources the acquisition flow needs: local number
//! availability queries and incoming-number provisioning. Query and purchase
//! calls authenticate with their own credential pairs.

use reqwest_middleware::ClientWithMiddleware;
use secrecy::ExposeSecret;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::config::{Config, CredentialPair, Credentials};
use crate::provider::PurchaseSelector;
use crate::types::SearchScope;

use super::errors::{Result, TwilioError};
use super::response::{AvailablePhoneNumbersPage, IncomingPhoneNumber, TwilioResponse};

/// Default Twilio API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.twilio.com";

/// REST API version path segment.
const API_VERSION: &str = "2010-04-01";

/// The only country this client provisions numbers in.
const SUPPORTED_COUNTRY: &str = "US";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Availability queries include numbers that require an address on file.
const ADDRESS_FILTERS: [(&str, &str); 3] = [
    ("ExcludeAllAddressRequired", "false"),
    ("ExcludeLocalAddressRequired", "false"),
    ("ExcludeForeignAddressRequired", "false"),
];

// =============================================================================
// TwilioClient
// =============================================================================

/// Client for the Twilio REST API.
///
/// # Example
///
/// ```rust,no_run
/// use try_buy_number::config::Config;
/// use try_buy_number::providers::twilio::TwilioClient;
/// use try_buy_number::types::{AreaCode, SearchScope};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = TwilioClient::from_config(Config::from_env()?)?;
/// let scope = SearchScope::AreaCode(AreaCode::new("617")?);
/// let page = client.list_available_local(&scope).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TwilioClient {
    http_client: ClientWithMiddleware,
    creds: Credentials,
    endpoint: Url,
}

impl fmt::Debug for TwilioClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("query_sid", &self.creds.query.sid)
            .field("buy_sid", &self.creds.buy.sid)
            .finish_non_exhaustive()
    }
}

impl TwilioClient {
    /// Start building a client with the given credentials.
    pub fn builder(creds: Credentials) -> TwilioClientBuilder {
        TwilioClientBuilder::new(creds)
    }

    /// Build a client with default settings for the given credentials.
    pub fn with_credentials(creds: Credentials) -> Result<Self> {
        Self::builder(creds).build()
    }

    /// Build a client with default settings from a loaded config.
    pub fn from_config(config: Config) -> Result<Self> {
        Self::with_credentials(config.creds)
    }

    /// Build a URL for an account-scoped resource.
    fn account_url(
        &self,
        account_sid: &str,
        resource: &[&str],
        params: &[(&str, String)],
    ) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| TwilioError::InvalidEndpoint("endpoint cannot be a base URL".into()))?
            .extend(
                [API_VERSION, "Accounts", account_sid]
                    .into_iter()
                    .chain(resource.iter().copied()),
            );
        if !params.is_empty() {
            let query =
                serde_urlencoded::to_string(params).map_err(TwilioError::BuildRequestUrl)?;
            url.set_query(Some(&query));
        }
        Ok(url)
    }

    /// Send a request and decode the standard Twilio response envelope.
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest_middleware::RequestBuilder,
        pair: &CredentialPair,
    ) -> Result<T> {
        let response = request
            .basic_auth(&pair.sid, Some(pair.token.expose_secret()))
            .send()
            .await?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(TwilioError::ReadResponse)?;

        TwilioResponse::<T>::from_parts(status, &text)
            .map_err(TwilioError::DeserializeJson)?
            .into_result()
            .map_err(TwilioError::Api)
    }

    /// Query available US local numbers within the given scope.
    ///
    /// Exact scopes query with a `Contains` pattern on the national number,
    /// area-code scopes with `AreaCode`, region scopes with `InRegion`.
    /// Uses the query credential pair.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "debug",
            skip(self),
            fields(provider = "twilio", scope = %scope, count = tracing::field::Empty)
        )
    )]
    pub async fn list_available_local(
        &self,
        scope: &SearchScope,
    ) -> Result<AvailablePhoneNumbersPage> {
        let mut params: Vec<(&str, String)> = vec![match scope {
            SearchScope::Exact(number) => ("Contains", number.to_string()),
            SearchScope::AreaCode(code) => ("AreaCode", code.to_string()),
            SearchScope::Region(region) => ("InRegion", region.to_string()),
        }];
        params.extend(ADDRESS_FILTERS.iter().map(|&(k, v)| (k, v.to_string())));

        let url = self.account_url(
            &self.creds.query.sid,
            &["AvailablePhoneNumbers", SUPPORTED_COUNTRY, "Local.json"],
            &params,
        )?;

        let page: AvailablePhoneNumbersPage = self
            .execute(self.http_client.get(url), &self.creds.query)
            .await?;

        #[cfg(feature = "tracing")]
        {
            use opentelemetry::trace::Status;
            use tracing_opentelemetry::OpenTelemetrySpanExt;

            let span = tracing::Span::current();
            span.record("count", page.available_phone_numbers.len() as u64);
            span.set_status(Status::Ok);
        }

        Ok(page)
    }

    /// Provision a number. Billable; uses the buy credential pair.
    ///
    /// The selector is forwarded as a form parameter: `PhoneNumber` for a
    /// literal number, `AreaCode` for provider-side selection within a code.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "debug",
            skip(self),
            fields(provider = "twilio", selector = ?selector, phone_number = tracing::field::Empty)
        )
    )]
    pub async fn create_incoming_number(
        &self,
        selector: &PurchaseSelector,
    ) -> Result<IncomingPhoneNumber> {
        let url = self.account_url(&self.creds.buy.sid, &["IncomingPhoneNumbers.json"], &[])?;

        let form: [(&str, String); 1] = [match selector {
            PurchaseSelector::Number(number) => ("PhoneNumber", number.to_string()),
            PurchaseSelector::AreaCode(code) => ("AreaCode", code.to_string()),
        }];

        let number: IncomingPhoneNumber = self
            .execute(self.http_client.post(url).form(&form), &self.creds.buy)
            .await?;

        #[cfg(feature = "tracing")]
        {
            use opentelemetry::trace::Status;
            use tracing_opentelemetry::OpenTelemetrySpanExt;

            let span = tracing::Span::current();
            span.record("phone_number", number.phone_number.as_str());
            span.set_status(Status::Ok);
        }

        Ok(number)
    }
}

// =============================================================================
// TwilioClientBuilder
// =============================================================================

/// Builder for [`TwilioClient`].
#[derive(Debug)]
pub struct TwilioClientBuilder {
    creds: Credentials,
    endpoint: String,
    http_client: Option<ClientWithMiddleware>,
}

impl TwilioClientBuilder {
    /// Start a builder with the given credentials and default settings.
    pub fn new(creds: Credentials) -> Self {
        Self {
            creds,
            endpoint: DEFAULT_API_URL.to_string(),
            http_client: None,
        }
    }

    /// Override the API endpoint. Used by tests to point at a mock server.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Supply a pre-configured HTTP client (custom middleware, proxies).
    pub fn http_client(mut self, http_client: ClientWithMiddleware) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<TwilioClient> {
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| TwilioError::InvalidEndpoint(e.to_string()))?;
        let http_client = match self.http_client {
            Some(http_client) => http_client,
            None => {
                let inner = reqwest::Client::builder()
                    .timeout(DEFAULT_TIMEOUT)
                    .build()
                    .map_err(TwilioError::BuildHttpClient)?;
                reqwest_middleware::ClientBuilder::new(inner).build()
            }
        };
        Ok(TwilioClient {
            http_client,
            creds: self.creds,
            endpoint,
        })
    }
}
