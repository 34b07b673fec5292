//! Gateway HTTP client with the transparent x402 payment flow.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use inferpay_types::micro_to_usd;
use inferpay_x402::{
    decode_settlement_header, encode_payment_header, PaymentRequired, PaymentSigner,
    HEADER_PAYMENT, HEADER_PAYMENT_RESPONSE, NETWORK_BASE,
};

use crate::error::{GatewayError, GatewayResult};
use crate::types::{
    ChatRequest, ChatResponse, ImageRequest, ImageResponse, ModelList, Paid, PaymentReceipt,
};

/// Default gateway base URL.
pub const DEFAULT_GATEWAY_URL: &str = "https://gateway.inferpay.dev/v1";

/// Default HTTP timeout. Generous because chat completions stream slowly on
/// the larger models.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Cap on error bodies carried into error values.
const MAX_ERROR_BODY: usize = 2048;

/// Configuration for the gateway client.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway API.
    pub base_url: String,
    /// Payment network to accept requirements for.
    pub network: String,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            network: NETWORK_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Client for the paid inference gateway.
///
/// Paid routes are called optimistically without payment; when the gateway
/// answers `402 Payment Required` the client signs the quoted requirement
/// and retries exactly once with the `X-PAYMENT` header attached. A second
/// 402 is surfaced as [`GatewayError::PaymentRequired`].
pub struct GatewayClient {
    /// HTTP client.
    client: Client,
    /// Client configuration.
    config: GatewayConfig,
    /// Wallet signing x402 payments.
    signer: Arc<dyn PaymentSigner>,
}

impl GatewayClient {
    /// Create a new gateway client.
    pub fn new(config: GatewayConfig, signer: Arc<dyn PaymentSigner>) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Network(format!("failed to create HTTP client: {}", e)))?;

        let config = GatewayConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ..config
        };

        Ok(Self {
            client,
            config,
            signer,
        })
    }

    /// The client configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Checksum address of the paying wallet.
    pub fn payer_address(&self) -> String {
        self.signer.address()
    }

    /// Request a chat completion.
    pub async fn chat(&self, request: &ChatRequest) -> GatewayResult<Paid<ChatResponse>> {
        self.post_paid("/chat/completions", request).await
    }

    /// Generate an image.
    pub async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> GatewayResult<Paid<ImageResponse>> {
        self.post_paid("/images/generations", request).await
    }

    /// List the models the gateway serves. This route is unmetered.
    pub async fn list_models(&self) -> GatewayResult<ModelList> {
        let url = format!("{}/models", self.config.base_url);
        debug!(url = %url, "Fetching model catalog");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// POST to a paid route, paying on demand.
    async fn post_paid<B, T>(&self, path: &str, body: &B) -> GatewayResult<Paid<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(url = %url, "Gateway request");

        let response = self.client.post(&url).json(body).send().await?;
        if response.status() != StatusCode::PAYMENT_REQUIRED {
            return finish(response, None).await;
        }

        // 402: sign the quoted requirement and retry once with payment.
        let required: PaymentRequired = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(format!("402 body: {}", e)))?;

        let requirement = required
            .select(&self.config.network)
            .ok_or_else(|| GatewayError::PaymentRequired {
                reason: format!(
                    "gateway accepts no {} payments for this route",
                    self.config.network
                ),
            })?
            .clone();

        // The payment asset is a 6-decimal USD stablecoin, so its atomic
        // units are micro-USD.
        let amount_usd = micro_to_usd(requirement.amount()?);
        info!(
            resource = %requirement.resource,
            amount_usd = amount_usd,
            "Paying for gateway call"
        );

        let payload = self.signer.sign_payment(&requirement).await?;
        let header = encode_payment_header(&payload)?;

        let paid_response = self
            .client
            .post(&url)
            .header(HEADER_PAYMENT, header)
            .json(body)
            .send()
            .await?;

        if paid_response.status() == StatusCode::PAYMENT_REQUIRED {
            let body_text = paid_response.text().await.unwrap_or_default();
            warn!(body = %body_text, "Gateway rejected the payment");
            return Err(GatewayError::PaymentRequired {
                reason: if body_text.is_empty() {
                    "payment rejected".to_string()
                } else {
                    truncate(body_text)
                },
            });
        }

        let receipt = PaymentReceipt {
            amount_usd,
            network: requirement.network.clone(),
            transaction: None,
        };
        finish(paid_response, Some(receipt)).await
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("config", &self.config)
            .field("payer", &self.signer.address())
            .finish()
    }
}

/// Decode a success response, folding any settlement header into the receipt.
async fn finish<T: DeserializeOwned>(
    response: Response,
    receipt: Option<PaymentReceipt>,
) -> GatewayResult<Paid<T>> {
    let receipt = receipt.map(|mut r| {
        let settlement = response
            .headers()
            .get(HEADER_PAYMENT_RESPONSE)
            .and_then(|v| v.to_str().ok())
            .map(decode_settlement_header);
        match settlement {
            Some(Ok(s)) => {
                r.transaction = s.transaction;
                if let Some(network) = s.network {
                    r.network = network;
                }
            }
            Some(Err(e)) => warn!(error = %e, "Unparseable settlement header"),
            None => {}
        }
        r
    });

    if !response.status().is_success() {
        return Err(api_error(response).await);
    }

    let body = response
        .json()
        .await
        .map_err(|e| GatewayError::Decode(e.to_string()))?;

    Ok(Paid { body, receipt })
}

/// Turn a non-success response into an API error.
async fn api_error(response: Response) -> GatewayError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    GatewayError::Api {
        status,
        body: truncate(body),
    }
}

fn truncate(mut s: String) -> String {
    if s.len() > MAX_ERROR_BODY {
        s.truncate(MAX_ERROR_BODY);
    }
    s
}
