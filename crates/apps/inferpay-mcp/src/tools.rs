//! MCP tool input/output types.
//!
//! Defines the request and response types for MCP tools. Payment complexity
//! is abstracted from AI agents: metered tools pay the gateway through x402
//! automatically and report the settled cost and remaining session budget in
//! their responses.

use rmcp::schemars;
use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// chat Tool
// ============================================================================

/// Input for the `chat` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ChatInput {
    /// The user prompt.
    pub prompt: String,

    /// Model id. Defaults to the balanced-tier model.
    #[serde(default)]
    pub model: Option<String>,

    /// Optional system prompt prepended to the conversation.
    #[serde(default)]
    pub system: Option<String>,

    /// Completion token cap.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    #[serde(default)]
    pub temperature: Option<f32>,
}

/// Output from the `chat` and `smart_chat` tools.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ChatOutput {
    /// Model that served the request.
    pub model: String,

    /// Routing tier (smart_chat only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,

    /// The completion text.
    pub response: String,

    /// Cost recorded against the session budget for this call, in USD.
    pub cost_usd: f64,

    /// Remaining session budget in USD; null when no limit is set.
    pub remaining_usd: Option<f64>,

    /// Settlement details when an x402 payment occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentInfo>,
}

/// On-chain settlement details for a paid call.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PaymentInfo {
    /// Network the payment settled on.
    pub network: String,

    /// Settlement transaction hash, when reported by the gateway.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
}

// ============================================================================
// smart_chat Tool
// ============================================================================

/// Input for the `smart_chat` tool.
///
/// Routes the prompt through the static tier table instead of requiring a
/// model id.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SmartChatInput {
    /// The user prompt.
    pub prompt: String,

    /// Task complexity: "fast", "balanced", or "powerful"
    /// (default: "balanced").
    #[serde(default)]
    pub complexity: Option<String>,

    /// Optional system prompt prepended to the conversation.
    #[serde(default)]
    pub system: Option<String>,

    /// Completion token cap.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

// ============================================================================
// generate_image Tool
// ============================================================================

/// Input for the `generate_image` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GenerateImageInput {
    /// Text prompt describing the image.
    pub prompt: String,

    /// Image model id. Defaults to the catalog's image model.
    #[serde(default)]
    pub model: Option<String>,

    /// Image size, e.g., "1024x1024".
    #[serde(default)]
    pub size: Option<String>,
}

/// Output from the `generate_image` tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GenerateImageOutput {
    /// Model that generated the image.
    pub model: String,

    /// Hosted URL of the image, when returned by reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Base64-encoded image bytes, when returned inline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,

    /// Cost recorded against the session budget for this call, in USD.
    pub cost_usd: f64,

    /// Remaining session budget in USD; null when no limit is set.
    pub remaining_usd: Option<f64>,

    /// Settlement details when an x402 payment occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentInfo>,
}

// ============================================================================
// list_models Tool
// ============================================================================

/// Input for the `list_models` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListModelsInput {
    /// Filter to one routing tier: "fast", "balanced", or "powerful".
    #[serde(default)]
    pub tier: Option<String>,
}

/// One model in the listing.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ModelEntry {
    /// Model id.
    pub id: String,

    /// Routing tier, for models in the static tier table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,

    /// Per-call price in USD, when the gateway quotes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<f64>,
}

/// Output from the `list_models` tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListModelsOutput {
    /// Available models.
    pub models: Vec<ModelEntry>,

    /// Total number of models returned.
    pub total: u32,
}

// ============================================================================
// wallet_info Tool
// ============================================================================

/// Output from the `wallet_info` tool.
///
/// `balance` is null when every balance provider failed — the balance is
/// unknown, not zero.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WalletInfoOutput {
    /// Checksum wallet address.
    pub address: String,

    /// Token balance in whole units, or null when unavailable.
    pub balance: Option<f64>,

    /// Network the balance was read from.
    pub network: String,

    /// Block explorer URL for the address.
    #[serde(rename = "basescanUrl")]
    pub basescan_url: String,

    /// Set when the balance is unavailable, with a retry hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ============================================================================
// Budget Tools
// ============================================================================

/// Input for the `set_budget` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetBudgetInput {
    /// Session spending limit in USD. Must be positive.
    pub amount: f64,
}

/// Output from the budget tools: a snapshot of the session budget.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct BudgetStatusOutput {
    /// Spending limit in USD; null when unlimited.
    pub limit: Option<f64>,

    /// Cumulative session spend in USD.
    pub spent: f64,

    /// Number of metered calls recorded.
    pub calls: u64,

    /// Remaining budget in USD; null when unlimited, negative when overshot.
    pub remaining: Option<f64>,
}
