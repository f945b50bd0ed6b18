//! Number acquisition service: availability search cascade and purchase
//! coordination.

use crate::errors::{ProviderFailure, RejectionReason};
use crate::provider::{NumberingProvider, PurchaseSelector};
use crate::types::{
    AvailableNumber, E164Number, NumberConstraint, NormalizedTarget, PurchasedNumber, SearchScope,
};
use crate::validate::{self, ValidationError};
use std::error::Error as StdError;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

#[cfg(feature = "tracing")]
use tracing::{info, warn};

/// Error from an availability search.
#[derive(Debug, Error)]
pub enum SearchError<E: StdError + 'static> {
    /// The inventory query itself failed. Terminal: the cascade never
    /// swallows a provider error to keep widening.
    #[error("inventory query failed: {0}")]
    Provider(#[source] E),

    /// Every scope in the cascade returned an empty candidate list.
    #[error("no suitable number available (searched up to {last_scope})")]
    NoAvailableNumber { last_scope: SearchScope },
}

/// Error from a purchase.
#[derive(Debug, Error)]
pub enum PurchaseError<E: StdError + 'static> {
    /// The reference number failed validation. Propagated unchanged.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The fallback availability search failed. Propagated unchanged.
    #[error(transparent)]
    Search(SearchError<E>),

    /// The provider definitely rejected the purchase.
    #[error("purchase rejected: {reason}")]
    Rejected {
        reason: RejectionReason,
        #[source]
        source: Option<E>,
    },

    /// The fallback candidate was bought by someone else between the
    /// availability query and our purchase. Exactly one search-then-purchase
    /// round is attempted; this error ends the cascade.
    #[error("candidate {number} was taken before the purchase completed")]
    RaceLost {
        number: AvailableNumber,
        #[source]
        source: E,
    },

    /// A purchase request may have been delivered, but no outcome was
    /// observed. Callers must treat this as "possibly purchased" and
    /// reconcile their owned-number inventory out of band; re-purchasing
    /// blindly can double-bill.
    #[error("purchase outcome unknown; reconcile owned numbers before purchasing again")]
    AmbiguousOutcome {
        #[source]
        source: Option<E>,
    },
}

/// Configuration for the acquisition service.
#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    /// Upper bound on a single purchase call. Exceeding it yields
    /// [`PurchaseError::AmbiguousOutcome`], never a silent retry.
    /// `None` leaves timeouts to the HTTP client.
    pub purchase_timeout: Option<Duration>,
    /// Skip the optimistic area-code purchase in near mode and go straight
    /// to the region search.
    pub skip_area_code: bool,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            purchase_timeout: Some(Duration::from_secs(30)),
            skip_area_code: false,
        }
    }
}

/// Trait for number acquisition service implementations.
pub trait AcquireNumbers: Send + Sync {
    /// Error type of the underlying provider.
    type ProviderError: StdError + ProviderFailure + Send + Sync + 'static;

    /// Normalize a free-form reference number.
    fn validate(&self, reference: &str) -> Result<NormalizedTarget, ValidationError>;

    /// Find an available number for the target, widening from `start`.
    fn search(
        &self,
        target: &NormalizedTarget,
        start: SearchScope,
    ) -> impl Future<Output = Result<AvailableNumber, SearchError<Self::ProviderError>>> + Send;

    /// Purchase a number satisfying the constraint.
    fn purchase(
        &self,
        constraint: &NumberConstraint,
    ) -> impl Future<Output = Result<PurchasedNumber, PurchaseError<Self::ProviderError>>> + Send;
}

/// Generic acquisition service over any [`NumberingProvider`].
///
/// Implements the fallback protocol:
///
/// ```text
/// near mode:   validate -> buy(area code) -> [area code exhausted?]
///                                -> search(region) -> buy(candidate)
/// exact mode:  buy(number)
/// ```
///
/// Within one invocation every step is strictly sequential; each provider
/// response gates the next call, and there is no parallel fan-out across
/// scopes. The whole invocation is cancel-safe at every await point.
///
/// # Example
///
/// ```rust,ignore
/// use try_buy_number::{
///     AcquireNumbers, AcquisitionConfig, AcquisitionService, Config, NumberConstraint,
///     providers::twilio::{TwilioClient, TwilioProvider},
/// };
///
/// let config = Config::from_file("twilio.json")?;
/// let client = TwilioClient::with_credentials(config.creds)?;
/// let service = AcquisitionService::with_provider(TwilioProvider::new(client));
///
/// let purchased = service
///     .purchase(&NumberConstraint::near("+16175425942"))
///     .await?;
/// println!("Purchased {purchased}");
/// ```
#[derive(Debug, Clone)]
pub struct AcquisitionService<P: NumberingProvider> {
    provider: P,
    config: AcquisitionConfig,
}

/// Outcome of a single guarded purchase call.
enum BuyFailure<E> {
    /// The call may have taken effect remotely.
    Ambiguous(Option<E>),
    /// The call definitely did not allocate a number.
    Definite(E),
}

/// Next step after the optimistic area-code purchase is rejected.
#[derive(Debug, PartialEq, Eq)]
enum ScopedRejection {
    /// Expected exhaustion: widen to the region search.
    WidenToRegion,
    /// Terminal rejection.
    Fail,
}

/// Next step after the fallback candidate purchase is rejected.
#[derive(Debug, PartialEq, Eq)]
enum CandidateRejection {
    /// The candidate was taken in the interim.
    RaceLost,
    /// Terminal rejection.
    Fail,
}

/// Transition for the area-code purchase state. Only the provider's
/// "area code exhausted" signal converts a rejection into a fallback.
fn after_scoped_rejection(reason: &RejectionReason) -> ScopedRejection {
    match reason {
        RejectionReason::AreaCodeExhausted => ScopedRejection::WidenToRegion,
        _ => ScopedRejection::Fail,
    }
}

/// Transition for the candidate purchase state. Only "number unavailable"
/// is read as losing the availability-to-purchase race.
fn after_candidate_rejection(reason: &RejectionReason) -> CandidateRejection {
    match reason {
        RejectionReason::NumberUnavailable => CandidateRejection::RaceLost,
        _ => CandidateRejection::Fail,
    }
}

/// Classified reason for a definite failure. Unclassified transport errors
/// keep their message as an `Other` reason.
fn definite_reason<E: StdError + ProviderFailure>(error: &E) -> RejectionReason {
    error
        .rejection()
        .cloned()
        .unwrap_or_else(|| RejectionReason::other(None, error.to_string()))
}

impl<P: NumberingProvider> AcquisitionService<P> {
    /// Create a new service with a custom configuration.
    pub fn new(provider: P, config: AcquisitionConfig) -> Self {
        Self { provider, config }
    }

    /// Create a new service with the default configuration.
    pub fn with_provider(provider: P) -> Self {
        Self::new(provider, AcquisitionConfig::default())
    }

    /// Get reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Get reference to the service configuration.
    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    /// Issue one purchase call, classifying failures by whether the request
    /// can have taken effect remotely.
    async fn buy_checked(
        &self,
        selector: &PurchaseSelector,
    ) -> Result<PurchasedNumber, BuyFailure<P::Error>> {
        let attempt = self.provider.buy(selector);
        let result = match self.config.purchase_timeout {
            Some(limit) => match timeout(limit, attempt).await {
                Ok(result) => result,
                Err(_) => {
                    #[cfg(feature = "tracing")]
                    warn!(
                        timeout_secs = limit.as_secs_f64(),
                        "Purchase call timed out after send; outcome unknown"
                    );
                    return Err(BuyFailure::Ambiguous(None));
                }
            },
            None => attempt.await,
        };

        match result {
            Ok(purchased) => Ok(purchased),
            Err(e) if e.outcome_unknown() => Err(BuyFailure::Ambiguous(Some(e))),
            Err(e) => Err(BuyFailure::Definite(e)),
        }
    }

    async fn purchase_exact(
        &self,
        number: &E164Number,
    ) -> Result<PurchasedNumber, PurchaseError<P::Error>> {
        match self
            .buy_checked(&PurchaseSelector::Number(number.clone()))
            .await
        {
            Ok(purchased) => {
                #[cfg(feature = "tracing")]
                info!(%purchased, "Purchased exact number");
                Ok(purchased)
            }
            Err(BuyFailure::Ambiguous(source)) => Err(PurchaseError::AmbiguousOutcome { source }),
            Err(BuyFailure::Definite(e)) => Err(PurchaseError::Rejected {
                reason: definite_reason(&e),
                source: Some(e),
            }),
        }
    }

    async fn purchase_near(
        &self,
        reference: &str,
    ) -> Result<PurchasedNumber, PurchaseError<P::Error>> {
        let target = validate::validate(reference)?;

        if !self.config.skip_area_code {
            // Optimistic purchase: the provider allocates a number matching
            // the area code atomically, so no availability check precedes it.
            match self
                .buy_checked(&PurchaseSelector::AreaCode(target.area_code.clone()))
                .await
            {
                Ok(purchased) => {
                    #[cfg(feature = "tracing")]
                    info!(%purchased, area_code = %target.area_code, "Purchased number in target area code");
                    return Ok(purchased);
                }
                Err(BuyFailure::Ambiguous(source)) => {
                    return Err(PurchaseError::AmbiguousOutcome { source });
                }
                Err(BuyFailure::Definite(e)) => {
                    let reason = definite_reason(&e);
                    match after_scoped_rejection(&reason) {
                        ScopedRejection::WidenToRegion => {
                            #[cfg(feature = "tracing")]
                            info!(
                                area_code = %target.area_code,
                                region = %target.region,
                                "Area code exhausted; falling back to region search"
                            );
                        }
                        ScopedRejection::Fail => {
                            return Err(PurchaseError::Rejected {
                                reason,
                                source: Some(e),
                            });
                        }
                    }
                }
            }
        }

        // The area code is known (or configured to be assumed) exhausted;
        // search starts directly at region scope.
        let candidate = self
            .search(&target, SearchScope::Region(target.region.clone()))
            .await
            .map_err(PurchaseError::Search)?;

        let candidate_number =
            E164Number::new(candidate.as_str()).map_err(|e| PurchaseError::Rejected {
                reason: RejectionReason::other(
                    None,
                    format!("provider returned malformed candidate {candidate}: {e}"),
                ),
                source: None,
            })?;

        match self
            .buy_checked(&PurchaseSelector::Number(candidate_number))
            .await
        {
            Ok(purchased) => {
                #[cfg(feature = "tracing")]
                info!(%purchased, region = %target.region, "Purchased fallback candidate");
                Ok(purchased)
            }
            Err(BuyFailure::Ambiguous(source)) => Err(PurchaseError::AmbiguousOutcome { source }),
            Err(BuyFailure::Definite(e)) => {
                let reason = definite_reason(&e);
                match after_candidate_rejection(&reason) {
                    CandidateRejection::RaceLost => {
                        #[cfg(feature = "tracing")]
                        warn!(%candidate, "Fallback candidate taken before purchase completed");
                        Err(PurchaseError::RaceLost {
                            number: candidate,
                            source: e,
                        })
                    }
                    CandidateRejection::Fail => Err(PurchaseError::Rejected {
                        reason,
                        source: Some(e),
                    }),
                }
            }
        }
    }
}

impl<P: NumberingProvider> AcquireNumbers for AcquisitionService<P> {
    type ProviderError = P::Error;

    fn validate(&self, reference: &str) -> Result<NormalizedTarget, ValidationError> {
        validate::validate(reference)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "AcquisitionService::search",
            skip_all,
            fields(target = %target.e164, start = %start)
        )
    )]
    async fn search(
        &self,
        target: &NormalizedTarget,
        start: SearchScope,
    ) -> Result<AvailableNumber, SearchError<P::Error>> {
        let mut scope = start;
        loop {
            #[cfg(feature = "tracing")]
            info!(scope = %scope, "Querying available numbers");

            let candidates = self
                .provider
                .list_available(&scope)
                .await
                .map_err(SearchError::Provider)?;

            if let Some(first) = candidates.into_iter().next() {
                #[cfg(feature = "tracing")]
                info!(number = %first, scope = %scope, "Suitable number found");
                return Ok(first);
            }

            match scope.widen(target) {
                Some(next) => {
                    #[cfg(feature = "tracing")]
                    info!(exhausted = %scope, next = %next, "Scope empty; widening");
                    scope = next;
                }
                None => return Err(SearchError::NoAvailableNumber { last_scope: scope }),
            }
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "AcquisitionService::purchase", skip_all)
    )]
    async fn purchase(
        &self,
        constraint: &NumberConstraint,
    ) -> Result<PurchasedNumber, PurchaseError<P::Error>> {
        match constraint {
            NumberConstraint::Exact { number } => self.purchase_exact(number).await,
            NumberConstraint::Near { reference } => self.purchase_near(reference).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_area_code_exhaustion_widens() {
        assert_eq!(
            after_scoped_rejection(&RejectionReason::AreaCodeExhausted),
            ScopedRejection::WidenToRegion
        );
        assert_eq!(
            after_scoped_rejection(&RejectionReason::NumberUnavailable),
            ScopedRejection::Fail
        );
        assert_eq!(
            after_scoped_rejection(&RejectionReason::other(Some(20003), "auth failed")),
            ScopedRejection::Fail
        );
    }

    #[test]
    fn test_only_unavailable_candidate_is_race_lost() {
        assert_eq!(
            after_candidate_rejection(&RejectionReason::NumberUnavailable),
            CandidateRejection::RaceLost
        );
        assert_eq!(
            after_candidate_rejection(&RejectionReason::AreaCodeExhausted),
            CandidateRejection::Fail
        );
        assert_eq!(
            after_candidate_rejection(&RejectionReason::other(None, "boom")),
            CandidateRejection::Fail
        );
    }

    #[test]
    fn test_definite_reason_falls_back_to_message() {
        #[derive(Debug, thiserror::Error)]
        #[error("connection refused")]
        struct Transport;

        impl ProviderFailure for Transport {
            fn rejection(&self) -> Option<&RejectionReason> {
                None
            }
        }

        assert_eq!(
            definite_reason(&Transport),
            RejectionReason::other(None, "connection refused")
        );
    }

    #[test]
    fn test_config_default() {
        let config = AcquisitionConfig::default();
        assert_eq!(config.purchase_timeout, Some(Duration::from_secs(30)));
        assert!(!config.skip_area_code);
    }
}
