//! [`NumberingProvider`] implementation backed by the Twilio REST API.

use crate::config::Config;
use crate::provider::{NumberingProvider, PurchaseSelector};
use crate::types::{AvailableNumber, PurchasedNumber, SearchScope};

use super::client::TwilioClient;
use super::errors::{Result, TwilioError};

/// Twilio-backed numbering provider.
///
/// Thin mapping from the REST payloads onto the domain types; all protocol
/// decisions live in the generic acquisition service.
#[derive(Debug, Clone)]
pub struct TwilioProvider {
    client: TwilioClient,
}

impl TwilioProvider {
    /// Wrap an existing client.
    pub fn new(client: TwilioClient) -> Self {
        Self { client }
    }

    /// Build a provider with default client settings from a loaded config.
    pub fn from_config(config: Config) -> Result<Self> {
        Ok(Self::new(TwilioClient::from_config(config)?))
    }

    /// Access the underlying client.
    pub fn client(&self) -> &TwilioClient {
        &self.client
    }
}

impl NumberingProvider for TwilioProvider {
    type Error = TwilioError;

    async fn list_available(&self, scope: &SearchScope) -> Result<Vec<AvailableNumber>> {
        let page = self.client.list_available_local(scope).await?;
        Ok(page
            .available_phone_numbers
            .into_iter()
            .map(|entry| AvailableNumber::new(entry.phone_number))
            .collect())
    }

    async fn buy(&self, selector: &PurchaseSelector) -> Result<PurchasedNumber> {
        let number = self.client.create_incoming_number(selector).await?;
        Ok(PurchasedNumber::new(number.phone_number))
    }
}
