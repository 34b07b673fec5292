//! Error types for the MCP server.

use inferpay_gateway::GatewayError;
use inferpay_types::ErrorCode;
use thiserror::Error;

/// Result type for MCP operations.
pub type McpResult<T> = Result<T, McpError>;

/// Error types for MCP server operations.
#[derive(Debug, Error)]
pub enum McpError {
    /// Caller supplied an invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Session budget ceiling reached; the paid call was not made.
    #[error(
        "budget exceeded: {spent_usd:.6} USD spent of {limit_usd:.6} USD limit \
         ({remaining_usd:.6} USD remaining)"
    )]
    BudgetExceeded {
        /// Cumulative session spend.
        spent_usd: f64,
        /// The configured ceiling.
        limit_usd: f64,
        /// Remaining budget (negative when overshot).
        remaining_usd: f64,
    },

    /// Requested model is not known.
    #[error("unknown model: {0}")]
    ModelNotFound(String),

    /// Gateway request failed.
    #[error("gateway request failed: {0}")]
    Gateway(#[from] GatewayError),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl McpError {
    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the error code for this error, as reported to MCP clients.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::BudgetExceeded { .. } => ErrorCode::BudgetExceeded,
            Self::ModelNotFound(_) => ErrorCode::ModelNotFound,
            Self::Gateway(e) => match e {
                GatewayError::PaymentRequired { .. } => ErrorCode::PaymentRequired,
                GatewayError::Payment(_) => ErrorCode::PaymentFailed,
                GatewayError::Network(_) | GatewayError::Api { .. } | GatewayError::Decode(_) => {
                    ErrorCode::GatewayUnavailable
                }
            },
            Self::Serialization(_) => ErrorCode::InternalError,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }
}
