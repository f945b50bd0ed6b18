//! Error classification for provider failures.

use std::fmt::{self, Display, Formatter};

/// Machine-readable reason a provider rejected a request.
///
/// Adapters translate provider-specific error codes into this taxonomy once,
/// at the boundary; the acquisition logic never matches raw provider strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// The requested area code has no numbers left to allocate.
    ///
    /// This is the one recoverable rejection: in near mode it triggers the
    /// single region-scoped fallback instead of failing.
    AreaCodeExhausted,
    /// The specific requested number is not (or no longer) available.
    ///
    /// Seen when a candidate from an availability query is bought by someone
    /// else before our purchase lands.
    NumberUnavailable,
    /// Any other rejection, with the provider's code and message preserved.
    Other {
        code: Option<u32>,
        message: String,
    },
}

impl RejectionReason {
    /// Rejection with an unclassified provider code and message.
    pub fn other(code: Option<u32>, message: impl Into<String>) -> Self {
        Self::Other {
            code,
            message: message.into(),
        }
    }
}

impl Display for RejectionReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::AreaCodeExhausted => write!(f, "no numbers available in the requested area code"),
            Self::NumberUnavailable => write!(f, "requested number is not available"),
            Self::Other {
                code: Some(code),
                message,
            } => write!(f, "provider rejection {code}: {message}"),
            Self::Other {
                code: None,
                message,
            } => write!(f, "provider rejection: {message}"),
        }
    }
}

/// Trait for classifying provider errors.
///
/// Every [`NumberingProvider::Error`](crate::provider::NumberingProvider)
/// implements this so the generic acquisition service can distinguish the
/// three failure shapes that matter to the purchase protocol:
///
/// 1. **Definite rejection** (`rejection()` returns `Some`): the provider
///    answered and refused. The reason decides whether a fallback applies.
/// 2. **Definite transport failure** (`rejection()` is `None`,
///    `outcome_unknown()` is false): the request provably never reached the
///    provider (connect failure, request build failure).
/// 3. **Ambiguous failure** (`outcome_unknown()` is true): the request may
///    have been delivered but no outcome was observed. A purchase in this
///    state must never be retried blindly; the remote side may have billed
///    and allocated a number.
///
/// # Examples
///
/// ```rust
/// use try_buy_number::{ProviderFailure, RejectionReason};
///
/// #[derive(Debug)]
/// enum MyError {
///     Rejected(RejectionReason), // provider said no
///     ConnectFailed,             // request never left
///     ResponseLost,              // request sent, outcome unknown
/// }
///
/// impl ProviderFailure for MyError {
///     fn rejection(&self) -> Option<&RejectionReason> {
///         match self {
///             MyError::Rejected(reason) => Some(reason),
///             _ => None,
///         }
///     }
///
///     fn outcome_unknown(&self) -> bool {
///         matches!(self, MyError::ResponseLost)
///     }
/// }
/// ```
pub trait ProviderFailure {
    /// The classified rejection, if this failure is a definite provider "no".
    fn rejection(&self) -> Option<&RejectionReason>;

    /// Returns true when the request may have taken effect remotely even
    /// though no success was observed.
    ///
    /// Default implementation returns false (failure is known-definite).
    fn outcome_unknown(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            RejectionReason::AreaCodeExhausted.to_string(),
            "no numbers available in the requested area code"
        );
        assert_eq!(
            RejectionReason::other(Some(21422), "not available").to_string(),
            "provider rejection 21422: not available"
        );
        assert_eq!(
            RejectionReason::other(None, "connection refused").to_string(),
            "provider rejection: connection refused"
        );
    }
}
