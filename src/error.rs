//! Error taxonomy for the Product Advertising API client.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures surfaced by the client.
///
/// Configuration and validation errors are raised before any network call and
/// are never retried. Vendor errors and timeouts are transient from the
/// transport's point of view and are retried up to the configured count.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid credentials or client configuration, raised at construction.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Invalid request parameters, raised before the request is built.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Error envelope reported by Amazon, on any HTTP status.
    /// The message carries every reported `Code - Message` pair.
    #[error("Amazon error: {0}")]
    Vendor(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Any other transport-level failure.
    #[error("request failed: {0}")]
    Http(#[source] wreq::Error),

    /// The response body was not well-formed XML.
    #[error("malformed XML response: {0}")]
    Xml(String),
}

impl Error {
    /// Whether the transport should retry after this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Vendor(_) | Error::Timeout)
    }
}

impl From<wreq::Error> for Error {
    fn from(err: wreq::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Http(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(Error::Vendor("RequestThrottled - slow down".into()).is_retryable());
        assert!(Error::Timeout.is_retryable());

        assert!(!Error::Config("missing credential".into()).is_retryable());
        assert!(!Error::Validation("bad ASIN".into()).is_retryable());
        assert!(!Error::Xml("unexpected EOF".into()).is_retryable());
    }

    #[test]
    fn test_display_carries_detail() {
        let err = Error::Vendor("AWS.InvalidParameterValue - bad ItemId".into());
        let msg = err.to_string();
        assert!(msg.contains("AWS.InvalidParameterValue"));
        assert!(msg.contains("bad ItemId"));

        assert_eq!(Error::Timeout.to_string(), "request timed out");
    }
}
