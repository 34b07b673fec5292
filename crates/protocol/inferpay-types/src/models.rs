//! Static model catalog and routing tiers.
//!
//! Smart routing is a table lookup, not a heuristic: each tier maps to one
//! catalog entry, and the per-call cost estimates are fixed constants used
//! only for session budget bookkeeping (the gateway authorizes the actual
//! charge independently).

use serde::{Deserialize, Serialize};

/// Assumed cost of one chat completion in USD, used when the gateway does
/// not settle an x402 payment for the call.
pub const ASSUMED_CHAT_COST_USD: f64 = 0.002;

/// Assumed cost of one image generation in USD.
pub const ASSUMED_IMAGE_COST_USD: f64 = 0.02;

/// Default model id for image generation.
pub const DEFAULT_IMAGE_MODEL: &str = "flux-1-schnell";

/// Routing tier for smart chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Cheapest tier for short, simple prompts.
    Fast,
    /// Default tier for general-purpose prompts.
    Balanced,
    /// Most capable tier for complex reasoning.
    Powerful,
}

impl ModelTier {
    /// Parse a tier name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fast" => Some(Self::Fast),
            "balanced" => Some(Self::Balanced),
            "powerful" => Some(Self::Powerful),
            _ => None,
        }
    }

    /// Tier name as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Powerful => "powerful",
        }
    }
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chat model known to the router.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSpec {
    /// Gateway model id.
    pub id: &'static str,
    /// Routing tier this model serves.
    pub tier: ModelTier,
    /// Assumed per-call cost in USD for budget bookkeeping.
    pub assumed_cost_usd: f64,
}

/// The static routing table: one entry per tier.
pub const MODEL_CATALOG: &[ModelSpec] = &[
    ModelSpec {
        id: "gpt-4o-mini",
        tier: ModelTier::Fast,
        assumed_cost_usd: ASSUMED_CHAT_COST_USD,
    },
    ModelSpec {
        id: "gpt-4o",
        tier: ModelTier::Balanced,
        assumed_cost_usd: 0.01,
    },
    ModelSpec {
        id: "o1",
        tier: ModelTier::Powerful,
        assumed_cost_usd: 0.05,
    },
];

/// Look up the catalog entry for a tier.
pub fn model_for_tier(tier: ModelTier) -> &'static ModelSpec {
    MODEL_CATALOG
        .iter()
        .find(|m| m.tier == tier)
        .unwrap_or(&MODEL_CATALOG[0])
}

/// Look up a catalog entry by model id.
pub fn find_model(id: &str) -> Option<&'static ModelSpec> {
    MODEL_CATALOG.iter().find(|m| m.id == id)
}

/// The default model (balanced tier).
pub fn default_model() -> &'static ModelSpec {
    model_for_tier(ModelTier::Balanced)
}
