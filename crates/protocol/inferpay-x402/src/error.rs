//! Error types for x402 payment operations.

use thiserror::Error;

/// Result type for x402 operations.
pub type X402Result<T> = Result<T, X402Error>;

/// Errors that can occur while producing or decoding x402 payments.
#[derive(Debug, Error)]
pub enum X402Error {
    /// No payment requirement in the 402 response matches what we can pay.
    #[error("no acceptable payment requirement for network {network}")]
    NoMatchingRequirement {
        /// The network we are configured to pay on.
        network: String,
    },

    /// A payment header or settlement header could not be decoded.
    #[error("malformed payment header: {reason}")]
    MalformedHeader {
        /// Description of what's wrong.
        reason: String,
    },

    /// The required amount could not be parsed as an integer token amount.
    #[error("invalid payment amount: {0}")]
    InvalidAmount(String),

    /// Wallet key material could not be loaded.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// The wallet library failed to sign the payment.
    #[error("signing failed: {0}")]
    Signing(String),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl X402Error {
    /// Returns a user-friendly suggestion for recovering from this error.
    pub fn suggestion(&self) -> &str {
        match self {
            Self::NoMatchingRequirement { .. } => {
                "The gateway does not accept payment on the configured network."
            }
            Self::MalformedHeader { .. } => "The gateway sent an unparseable payment message.",
            Self::InvalidAmount(_) => "The gateway quoted a non-numeric amount.",
            Self::Wallet(_) => "Check the private key configuration.",
            Self::Signing(_) => "Check the wallet key and retry.",
            Self::Serialization(_) => "This is an internal error; please report it.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = X402Error::NoMatchingRequirement {
            network: "base".to_string(),
        };
        assert!(err.to_string().contains("base"));

        let err = X402Error::InvalidAmount("abc".to_string());
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_error_suggestions() {
        let err = X402Error::Wallet("bad key".to_string());
        assert!(!err.suggestion().is_empty());
    }
}
