//! Error types for gateway communication.

use inferpay_x402::X402Error;
use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur talking to the inference gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network/HTTP failure reaching the gateway.
    #[error("gateway communication error: {0}")]
    Network(String),

    /// Gateway returned a non-success status with a body.
    #[error("gateway returned {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body (possibly truncated).
        body: String,
    },

    /// Gateway demanded payment that could not be satisfied.
    #[error("payment required: {reason}")]
    PaymentRequired {
        /// Why the payment could not be made or was rejected.
        reason: String,
    },

    /// x402 payment handling failed.
    #[error(transparent)]
    Payment(#[from] X402Error),

    /// Response body could not be decoded.
    #[error("failed to decode gateway response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

impl GatewayError {
    /// Returns true if the operation may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_)) || matches!(self, Self::Api { status, .. } if *status >= 500)
    }
}
