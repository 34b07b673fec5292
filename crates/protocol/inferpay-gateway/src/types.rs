//! Gateway request/response types (OpenAI-compatible wire format).

use serde::{Deserialize, Serialize};

// ============================================================================
// Chat Completions
// ============================================================================

/// One message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user", or "assistant".
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Gateway model id.
    pub model: String,

    /// Conversation so far.
    pub messages: Vec<ChatMessage>,

    /// Completion token cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// One completion choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    /// The assistant message.
    pub message: ChatMessage,

    /// Why generation stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Token accounting for a completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatUsage {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    #[serde(default)]
    pub completion_tokens: u32,
    /// Total tokens billed.
    #[serde(default)]
    pub total_tokens: u32,
}

/// Response body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Completion id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Model that served the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Completion choices (at least one on success).
    pub choices: Vec<ChatChoice>,

    /// Token accounting, when the gateway reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ChatUsage>,
}

impl ChatResponse {
    /// Text of the first choice, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

// ============================================================================
// Model Listing
// ============================================================================

/// One model entry from `GET /models`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model id.
    pub id: String,

    /// Owning organization, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_by: Option<String>,

    /// Per-call price in USD, when the gateway quotes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<f64>,
}

/// Response body for `GET /models`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelList {
    /// Available models.
    pub data: Vec<ModelInfo>,
}

// ============================================================================
// Image Generation
// ============================================================================

/// Request body for `POST /images/generations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Image model id.
    pub model: String,

    /// Text prompt.
    pub prompt: String,

    /// Image size, e.g., "1024x1024".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// One generated image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageData {
    /// Hosted URL of the image, when returned by reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Base64-encoded image bytes, when returned inline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,
}

/// Response body for `POST /images/generations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    /// Generated images (at least one on success).
    pub data: Vec<ImageData>,
}

// ============================================================================
// Payment Reporting
// ============================================================================

/// What an x402 payment actually settled for a call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Settled amount in USD.
    pub amount_usd: f64,

    /// Network the payment settled on.
    pub network: String,

    /// On-chain transaction hash, when the gateway reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
}

/// A gateway response plus the payment made for it, if any.
///
/// `receipt` is `None` when the route answered without demanding payment.
#[derive(Debug, Clone)]
pub struct Paid<T> {
    /// The decoded response body.
    pub body: T,
    /// The settled payment, when one occurred.
    pub receipt: Option<PaymentReceipt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_omits_unset_options() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::user("hello")],
            max_tokens: None,
            temperature: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("max_tokens"));
        assert!(!json.contains("temperature"));
        assert!(json.contains("\"role\":\"user\""));
    }

    #[test]
    fn test_chat_response_parsing() {
        let json = r#"{
            "id": "chatcmpl-123",
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {"role": "assistant", "content": "Hi there."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 9, "completion_tokens": 4, "total_tokens": 13}
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("Hi there."));
        assert_eq!(response.usage.as_ref().unwrap().total_tokens, 13);
    }

    #[test]
    fn test_chat_response_without_usage() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "ok"}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("ok"));
        assert!(response.usage.is_none());
        assert!(response.choices[0].finish_reason.is_none());
    }

    #[test]
    fn test_model_list_parsing() {
        let json = r#"{"data": [
            {"id": "gpt-4o-mini", "owned_by": "openai", "price_usd": 0.002},
            {"id": "o1"}
        ]}"#;

        let list: ModelList = serde_json::from_str(json).unwrap();
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.data[0].price_usd, Some(0.002));
        assert!(list.data[1].price_usd.is_none());
    }

    #[test]
    fn test_image_response_parsing() {
        let json = r#"{"data": [{"url": "https://cdn.example/img.png"}]}"#;
        let response: ImageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.data[0].url.as_deref(),
            Some("https://cdn.example/img.png")
        );
        assert!(response.data[0].b64_json.is_none());
    }
}
