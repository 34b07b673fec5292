//! ERC-20 balance lookup with provider failover.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ChainConfig;
use crate::error::{ChainError, ChainResult};

/// Four-byte function selector for `balanceOf(address)`.
pub const BALANCE_OF_SELECTOR: &str = "0x70a08231";

/// Result of a balance lookup.
///
/// `Unavailable` means no provider produced a usable answer; the balance is
/// unknown and the caller should retry later. It must never be interpreted
/// as zero — a zero balance is `Available(0.0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenBalance {
    /// Balance resolved, in whole token units.
    Available(f64),
    /// Every provider failed; balance unknown.
    Unavailable,
}

impl TokenBalance {
    /// True when a balance was resolved.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// The resolved balance, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Available(v) => Some(*v),
            Self::Unavailable => None,
        }
    }
}

/// JSON-RPC response envelope. Only the fields we read.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Reads ERC-20 balances from a list of interchangeable providers.
///
/// Endpoints are tried strictly in order; the first usable result wins and
/// no further endpoints are consulted. The loop is sequential, not racing,
/// so a provider never sees a duplicate in-flight request.
pub struct BalanceReader {
    /// HTTP client with the per-endpoint timeout applied.
    client: Client,
    /// Endpoint list and token constants.
    config: ChainConfig,
}

impl BalanceReader {
    /// Create a reader for the given chain configuration.
    pub fn new(config: ChainConfig) -> ChainResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ChainError::ClientBuild(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// The chain configuration this reader queries.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Resolve the token balance of `address`.
    ///
    /// Address format is the caller's responsibility; no validation is
    /// performed here. All provider failures are absorbed — the only
    /// outcomes are a resolved balance or [`TokenBalance::Unavailable`].
    pub async fn get_balance(&self, address: &str) -> TokenBalance {
        let calldata = encode_balance_of(address);
        let scale = 10f64.powi(self.config.token_decimals as i32);

        for endpoint in &self.config.rpc_endpoints {
            match self.query_endpoint(endpoint, &calldata).await {
                Ok(raw) => {
                    let balance = raw as f64 / scale;
                    debug!(endpoint = %endpoint, balance = balance, "Balance resolved");
                    return TokenBalance::Available(balance);
                }
                Err(e) => {
                    debug!(endpoint = %endpoint, error = %e, "Provider failed, trying next");
                }
            }
        }

        warn!(
            address = %address,
            providers = self.config.rpc_endpoints.len(),
            "All balance providers exhausted"
        );
        TokenBalance::Unavailable
    }

    /// Issue one `eth_call` against a single endpoint.
    async fn query_endpoint(&self, endpoint: &str, calldata: &str) -> ChainResult<u128> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [
                { "to": self.config.token_contract, "data": calldata },
                "latest"
            ],
            "id": 1,
        });

        let response = self
            .client
            .post(endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ChainError::Transport {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ChainError::Rpc {
                endpoint: endpoint.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let body: RpcResponse = response.json().await.map_err(|e| ChainError::Transport {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        if let Some(err) = body.error {
            return Err(ChainError::Rpc {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            });
        }

        // A missing result or an empty "0x" both count as provider failure,
        // not as a zero balance.
        body.result
            .as_deref()
            .and_then(decode_result_amount)
            .ok_or_else(|| ChainError::EmptyResult {
                endpoint: endpoint.to_string(),
            })
    }
}

impl std::fmt::Debug for BalanceReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalanceReader")
            .field("config", &self.config)
            .finish()
    }
}

/// Build the `balanceOf(address)` calldata: the four-byte selector followed
/// by the address right-aligned in a 32-byte argument slot.
fn encode_balance_of(address: &str) -> String {
    let bare = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);

    format!(
        "{}{}{}",
        BALANCE_OF_SELECTOR,
        "000000000000000000000000",
        bare.to_lowercase()
    )
}

/// Decode a `0x`-prefixed hex integer. An empty `0x` decodes to `None`.
fn decode_result_amount(hex: &str) -> Option<u128> {
    let bare = hex.strip_prefix("0x")?;
    if bare.is_empty() {
        return None;
    }
    u128::from_str_radix(bare, 16).ok()
}
