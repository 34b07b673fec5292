//! HTTP client for the Inferpay paid-inference gateway.
//!
//! The gateway speaks an OpenAI-compatible REST API (chat completions, model
//! listing, image generation) and charges per call through the x402 protocol:
//! a paid route answers `402 Payment Required` until the request carries a
//! signed `X-PAYMENT` header. This crate performs that flow transparently —
//! callers get the response plus a [`PaymentReceipt`] describing what was
//! actually settled, which the MCP layer reports to its budget tracker.

pub mod client;
pub mod error;
pub mod types;

pub use client::{GatewayClient, GatewayConfig, DEFAULT_GATEWAY_URL};
pub use error::{GatewayError, GatewayResult};
pub use types::{
    ChatChoice, ChatMessage, ChatRequest, ChatResponse, ChatUsage, ImageData, ImageRequest,
    ImageResponse, ModelInfo, ModelList, Paid, PaymentReceipt,
};
