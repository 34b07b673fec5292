//! x402 protocol types.
//!
//! Implements the x402 specification types for the EVM `exact` scheme.
//! See: https://github.com/coinbase/x402/blob/main/specs/x402-specification.md

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{X402Error, X402Result};

/// x402 protocol version.
pub const X402_VERSION: u32 = 1;

/// HTTP header carrying the signed payment (client → server).
pub const HEADER_PAYMENT: &str = "X-PAYMENT";

/// HTTP header carrying the settlement result (server → client).
pub const HEADER_PAYMENT_RESPONSE: &str = "X-PAYMENT-RESPONSE";

/// The payment scheme used by the gateway (EVM exact-amount transfer).
pub const SCHEME_EXACT: &str = "exact";

/// Network identifiers.
pub const NETWORK_BASE: &str = "base";
pub const NETWORK_BASE_SEPOLIA: &str = "base-sepolia";

// =============================================================================
// Payment Requirements (402 Response)
// =============================================================================

/// Body of a `402 Payment Required` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequired {
    /// x402 protocol version.
    pub x402_version: u32,

    /// Human-readable reason payment is required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Payment requirements the client may satisfy.
    pub accepts: Vec<PaymentRequirement>,
}

impl PaymentRequired {
    /// Select the first `exact`-scheme requirement payable on `network`.
    pub fn select(&self, network: &str) -> Option<&PaymentRequirement> {
        self.accepts
            .iter()
            .find(|r| r.scheme == SCHEME_EXACT && r.network == network)
    }
}

/// A single accepted payment method.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirement {
    /// Payment scheme (e.g., "exact").
    pub scheme: String,

    /// Network identifier (e.g., "base").
    pub network: String,

    /// Required payment amount in the asset's smallest unit, as a decimal
    /// string. For the exact scheme this equals the charge.
    pub max_amount_required: String,

    /// URL of the resource being paid for.
    pub resource: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// MIME type of the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Address to pay to.
    pub pay_to: String,

    /// Maximum time in seconds the payment is valid after creation.
    pub max_timeout_seconds: u64,

    /// Token contract address of the payment asset.
    pub asset: String,

    /// Scheme-specific extra metadata. For the exact scheme this carries the
    /// asset's EIP-712 domain `name` and `version`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

impl PaymentRequirement {
    /// The required amount in the asset's smallest unit.
    pub fn amount(&self) -> X402Result<u64> {
        self.max_amount_required
            .parse::<u64>()
            .map_err(|_| X402Error::InvalidAmount(self.max_amount_required.clone()))
    }

    /// EIP-712 domain name from `extra`, if the gateway provided one.
    pub fn domain_name(&self) -> Option<&str> {
        self.extra.as_ref()?.get("name")?.as_str()
    }

    /// EIP-712 domain version from `extra`, if the gateway provided one.
    pub fn domain_version(&self) -> Option<&str> {
        self.extra.as_ref()?.get("version")?.as_str()
    }
}

// =============================================================================
// Payment Payload (Client → Server)
// =============================================================================

/// Payment payload sent in the `X-PAYMENT` header (base64-encoded JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    /// x402 protocol version.
    pub x402_version: u32,

    /// The payment scheme used.
    pub scheme: String,

    /// Network the payment is for.
    pub network: String,

    /// Scheme-specific payload.
    pub payload: ExactEvmPayload,
}

/// EVM exact-scheme payload: a signed EIP-3009 transfer authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactEvmPayload {
    /// Signature over the typed-data authorization (hex, 0x-prefixed).
    pub signature: String,

    /// The authorization the signature covers.
    pub authorization: TransferAuthorization,
}

/// EIP-3009 `TransferWithAuthorization` message fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferAuthorization {
    /// Payer address.
    pub from: String,

    /// Recipient address.
    pub to: String,

    /// Amount in the asset's smallest unit, as a decimal string.
    pub value: String,

    /// Unix timestamp after which the authorization is valid.
    pub valid_after: String,

    /// Unix timestamp before which the authorization is valid.
    pub valid_before: String,

    /// Unique nonce (hex-encoded 32 bytes) preventing replay.
    pub nonce: String,
}

// =============================================================================
// Settlement Response (Server → Client)
// =============================================================================

/// Settlement result sent in the `X-PAYMENT-RESPONSE` header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    /// Whether the payment settled.
    pub success: bool,

    /// On-chain transaction hash, when settled.
    #[serde(default, alias = "txHash", skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,

    /// Network the payment settled on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    /// Address that paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,

    /// Failure reason, when not settled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
}

// =============================================================================
// Header Encoding
// =============================================================================

/// Encode a payment payload into the `X-PAYMENT` header value.
pub fn encode_payment_header(payload: &PaymentPayload) -> X402Result<String> {
    let json = serde_json::to_vec(payload)?;
    Ok(BASE64.encode(json))
}

/// Decode an `X-PAYMENT-RESPONSE` header value.
pub fn decode_settlement_header(header: &str) -> X402Result<SettlementResponse> {
    let bytes = BASE64
        .decode(header.trim())
        .map_err(|e| X402Error::MalformedHeader {
            reason: format!("invalid base64: {}", e),
        })?;
    serde_json::from_slice(&bytes).map_err(|e| X402Error::MalformedHeader {
        reason: format!("invalid settlement JSON: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_requirement(network: &str) -> PaymentRequirement {
        PaymentRequirement {
            scheme: SCHEME_EXACT.to_string(),
            network: network.to_string(),
            max_amount_required: "2000".to_string(),
            resource: "https://gateway.inferpay.dev/v1/chat/completions".to_string(),
            description: "chat completion".to_string(),
            mime_type: Some("application/json".to_string()),
            pay_to: "0x209693Bc6afc0C5328bA36FaF03C514EF312287C".to_string(),
            max_timeout_seconds: 300,
            asset: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".to_string(),
            extra: Some(serde_json::json!({"name": "USD Coin", "version": "2"})),
        }
    }

    #[test]
    fn test_requirement_amount() {
        let req = sample_requirement(NETWORK_BASE);
        assert_eq!(req.amount().unwrap(), 2000);

        let mut bad = sample_requirement(NETWORK_BASE);
        bad.max_amount_required = "2.5".to_string();
        assert!(bad.amount().is_err());
    }

    #[test]
    fn test_requirement_domain_from_extra() {
        let req = sample_requirement(NETWORK_BASE);
        assert_eq!(req.domain_name(), Some("USD Coin"));
        assert_eq!(req.domain_version(), Some("2"));

        let mut bare = sample_requirement(NETWORK_BASE);
        bare.extra = None;
        assert_eq!(bare.domain_name(), None);
    }

    #[test]
    fn test_select_requirement_by_network() {
        let required = PaymentRequired {
            x402_version: X402_VERSION,
            error: None,
            accepts: vec![
                sample_requirement(NETWORK_BASE_SEPOLIA),
                sample_requirement(NETWORK_BASE),
            ],
        };

        let selected = required.select(NETWORK_BASE).unwrap();
        assert_eq!(selected.network, NETWORK_BASE);
        assert!(required.select("ethereum").is_none());
    }

    #[test]
    fn test_payment_required_camel_case() {
        let json = r#"{
            "x402Version": 1,
            "error": "payment required",
            "accepts": [{
                "scheme": "exact",
                "network": "base",
                "maxAmountRequired": "2000",
                "resource": "https://example.com/chat",
                "description": "",
                "payTo": "0x209693Bc6afc0C5328bA36FaF03C514EF312287C",
                "maxTimeoutSeconds": 300,
                "asset": "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"
            }]
        }"#;

        let required: PaymentRequired = serde_json::from_str(json).unwrap();
        assert_eq!(required.x402_version, 1);
        assert_eq!(required.accepts.len(), 1);
        assert_eq!(required.accepts[0].max_amount_required, "2000");
        assert_eq!(required.accepts[0].max_timeout_seconds, 300);
    }

    #[test]
    fn test_payment_header_roundtrip() {
        let payload = PaymentPayload {
            x402_version: X402_VERSION,
            scheme: SCHEME_EXACT.to_string(),
            network: NETWORK_BASE.to_string(),
            payload: ExactEvmPayload {
                signature: "0xabcdef".to_string(),
                authorization: TransferAuthorization {
                    from: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string(),
                    to: "0x209693Bc6afc0C5328bA36FaF03C514EF312287C".to_string(),
                    value: "2000".to_string(),
                    valid_after: "1700000000".to_string(),
                    valid_before: "1700000300".to_string(),
                    nonce: format!("0x{}", "11".repeat(32)),
                },
            },
        };

        let header = encode_payment_header(&payload).unwrap();
        let decoded = BASE64.decode(&header).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&decoded).unwrap();

        assert_eq!(json["x402Version"], 1);
        assert_eq!(json["scheme"], "exact");
        assert_eq!(json["payload"]["authorization"]["validAfter"], "1700000000");
        assert_eq!(json["payload"]["authorization"]["value"], "2000");
    }

    #[test]
    fn test_decode_settlement_header() {
        let body = r#"{"success":true,"transaction":"0x123abc","network":"base","payer":"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"}"#;
        let header = BASE64.encode(body);

        let settlement = decode_settlement_header(&header).unwrap();
        assert!(settlement.success);
        assert_eq!(settlement.transaction.as_deref(), Some("0x123abc"));
        assert_eq!(settlement.network.as_deref(), Some("base"));
    }

    #[test]
    fn test_decode_settlement_header_rejects_garbage() {
        assert!(decode_settlement_header("not base64!!").is_err());

        let header = BASE64.encode("not json");
        assert!(decode_settlement_header(&header).is_err());
    }
}
