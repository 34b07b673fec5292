//! Chain access configuration.

use std::time::Duration;

/// USDC token contract on Base mainnet.
pub const USDC_BASE_CONTRACT: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";

/// USDC uses 6 decimals.
pub const USDC_DECIMALS: u32 = 6;

/// Default read-only RPC endpoints for Base mainnet, in failover order.
pub const DEFAULT_RPC_ENDPOINTS: &[&str] = &[
    "https://mainnet.base.org",
    "https://base-rpc.publicnode.com",
    "https://base.llamarpc.com",
];

/// Default per-endpoint request timeout.
///
/// Bounds worst-case failover latency; an unresponsive first endpoint would
/// otherwise stall the whole lookup.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Block explorer base URL for Base mainnet.
const BASESCAN_URL: &str = "https://basescan.org";

/// Configuration for read-only chain access.
///
/// Provider list and token constants are explicit configuration so tests can
/// point the reader at stub endpoints.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Network name (e.g., "base").
    pub network: String,
    /// Ordered list of JSON-RPC endpoints, tried first to last.
    pub rpc_endpoints: Vec<String>,
    /// ERC-20 token contract address queried for balances.
    pub token_contract: String,
    /// Token decimal scale.
    pub token_decimals: u32,
    /// Per-endpoint request timeout.
    pub request_timeout: Duration,
}

impl ChainConfig {
    /// Configuration for USDC on Base mainnet.
    pub fn base() -> Self {
        Self {
            network: "base".to_string(),
            rpc_endpoints: DEFAULT_RPC_ENDPOINTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            token_contract: USDC_BASE_CONTRACT.to_string(),
            token_decimals: USDC_DECIMALS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Block explorer URL for an address on this network.
    pub fn explorer_address_url(&self, address: &str) -> String {
        format!("{}/address/{}", BASESCAN_URL, address)
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::base()
    }
}
