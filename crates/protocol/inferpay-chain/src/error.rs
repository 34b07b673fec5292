//! Error types for chain access.

use thiserror::Error;

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Errors that can occur while querying chain data providers.
///
/// Per-endpoint failures never cross the [`crate::BalanceReader`] boundary;
/// they are absorbed into the failover loop and surface only in logs.
#[derive(Debug, Error)]
pub enum ChainError {
    /// HTTP client construction failed.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),

    /// Transport-level failure talking to a provider.
    #[error("provider {endpoint} unreachable: {reason}")]
    Transport {
        /// The endpoint URL.
        endpoint: String,
        /// Underlying failure.
        reason: String,
    },

    /// Provider returned a JSON-RPC error object.
    #[error("provider {endpoint} returned error: {reason}")]
    Rpc {
        /// The endpoint URL.
        endpoint: String,
        /// The error payload.
        reason: String,
    },

    /// Provider responded without a usable result (missing, empty `0x`,
    /// or undecodable hex).
    #[error("provider {endpoint} returned no usable result")]
    EmptyResult {
        /// The endpoint URL.
        endpoint: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChainError::Transport {
            endpoint: "https://rpc.example".to_string(),
            reason: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("rpc.example"));
        assert!(err.to_string().contains("connection refused"));

        let err = ChainError::EmptyResult {
            endpoint: "https://rpc.example".to_string(),
        };
        assert!(err.to_string().contains("no usable result"));
    }
}
