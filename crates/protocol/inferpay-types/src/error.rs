//! Error codes reported to MCP clients.

use serde::{Deserialize, Serialize};

/// Error codes reported to MCP clients.
///
/// These codes appear in tool error responses so that agents can react to
/// specific failure conditions without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
#[non_exhaustive]
pub enum ErrorCode {
    // =========================================================================
    // Request Errors (0x0001 - 0x00FF)
    // =========================================================================
    /// Caller supplied an invalid argument (e.g., non-positive budget limit)
    InvalidArgument = 0x0001,
    /// Session budget ceiling reached; paid call was not made
    BudgetExceeded = 0x0002,
    /// Requested model is not in the catalog
    ModelNotFound = 0x0003,

    // =========================================================================
    // Payment Errors (0x0100 - 0x01FF)
    // =========================================================================
    /// Gateway demanded payment and no acceptable payment could be made
    PaymentRequired = 0x0100,
    /// A payment was attempted but was rejected or failed to settle
    PaymentFailed = 0x0101,

    // =========================================================================
    // Upstream Errors (0x0200 - 0x02FF)
    // =========================================================================
    /// The inference gateway could not be reached or returned an error
    GatewayUnavailable = 0x0200,
    /// A blockchain data provider could not be reached
    ProviderUnavailable = 0x0201,

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal server error
    InternalError = 0xFFFF,
}

impl ErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Returns true if this is a request error (0x0001-0x00FF).
    pub fn is_request_error(&self) -> bool {
        let code = *self as u16;
        (0x0001..=0x00FF).contains(&code)
    }

    /// Returns true if this is a payment error (0x0100-0x01FF).
    pub fn is_payment_error(&self) -> bool {
        let code = *self as u16;
        (0x0100..=0x01FF).contains(&code)
    }

    /// Get a user-friendly suggestion for recovering from this error.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "Check the argument values and retry.",
            Self::BudgetExceeded => {
                "Raise the session budget with set_budget or clear it with clear_budget."
            }
            Self::ModelNotFound => "Use list_models to see available model ids.",
            Self::PaymentRequired => {
                "Fund the wallet with USDC on Base, then retry. Check wallet_info for the address."
            }
            Self::PaymentFailed => "Verify the wallet balance and retry the call.",
            Self::GatewayUnavailable => "The inference gateway is unreachable. Retry shortly.",
            Self::ProviderUnavailable => "Blockchain data providers are unreachable. Retry shortly.",
            Self::InternalError => "An internal error occurred. Please report this issue.",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            ErrorCode::BudgetExceeded => write!(f, "BUDGET_EXCEEDED"),
            ErrorCode::ModelNotFound => write!(f, "MODEL_NOT_FOUND"),
            ErrorCode::PaymentRequired => write!(f, "PAYMENT_REQUIRED"),
            ErrorCode::PaymentFailed => write!(f, "PAYMENT_FAILED"),
            ErrorCode::GatewayUnavailable => write!(f, "GATEWAY_UNAVAILABLE"),
            ErrorCode::ProviderUnavailable => write!(f, "PROVIDER_UNAVAILABLE"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::InvalidArgument as u16, 0x0001);
        assert_eq!(ErrorCode::BudgetExceeded as u16, 0x0002);
        assert_eq!(ErrorCode::ModelNotFound as u16, 0x0003);
        assert_eq!(ErrorCode::PaymentRequired as u16, 0x0100);
        assert_eq!(ErrorCode::PaymentFailed as u16, 0x0101);
        assert_eq!(ErrorCode::GatewayUnavailable as u16, 0x0200);
        assert_eq!(ErrorCode::ProviderUnavailable as u16, 0x0201);
        assert_eq!(ErrorCode::InternalError as u16, 0xFFFF);
    }

    #[test]
    fn test_error_code_categories() {
        assert!(ErrorCode::InvalidArgument.is_request_error());
        assert!(ErrorCode::BudgetExceeded.is_request_error());
        assert!(!ErrorCode::InvalidArgument.is_payment_error());

        assert!(ErrorCode::PaymentRequired.is_payment_error());
        assert!(ErrorCode::PaymentFailed.is_payment_error());
        assert!(!ErrorCode::PaymentRequired.is_request_error());
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::InvalidArgument), "INVALID_ARGUMENT");
        assert_eq!(format!("{}", ErrorCode::BudgetExceeded), "BUDGET_EXCEEDED");
        assert_eq!(format!("{}", ErrorCode::InternalError), "INTERNAL_ERROR");
    }

    #[test]
    fn test_error_code_suggestion() {
        assert!(ErrorCode::BudgetExceeded.suggestion().contains("set_budget"));
        assert!(ErrorCode::ModelNotFound.suggestion().contains("list_models"));
        assert!(!ErrorCode::InternalError.suggestion().is_empty());
    }

    #[test]
    fn test_error_code_serialization() {
        let code = ErrorCode::PaymentRequired;
        let json = serde_json::to_string(&code).unwrap();
        let deserialized: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, code);
    }
}
