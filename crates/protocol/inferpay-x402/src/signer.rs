//! Payment signing.
//!
//! The [`PaymentSigner`] trait is the seam between the x402 flow and the
//! wallet. [`LocalSigner`] is the in-process implementation: it wraps an
//! `ethers` local wallet and delegates EIP-712 hashing and signing to the
//! library; this module only assembles the typed-data document.

use async_trait::async_trait;
use chrono::Utc;
use ethers_core::types::transaction::eip712::TypedData;
use ethers_core::utils::to_checksum;
use ethers_signers::{LocalWallet, Signer};
use rand::Rng;
use tracing::debug;

use crate::error::{X402Error, X402Result};
use crate::types::{
    ExactEvmPayload, PaymentPayload, PaymentRequirement, TransferAuthorization, SCHEME_EXACT,
    X402_VERSION,
};

/// Signs x402 payment requirements on behalf of a wallet.
#[async_trait]
pub trait PaymentSigner: Send + Sync {
    /// Checksum address of the paying wallet.
    fn address(&self) -> String;

    /// Produce a signed payment payload satisfying `requirement`.
    async fn sign_payment(&self, requirement: &PaymentRequirement) -> X402Result<PaymentPayload>;
}

/// EIP-712 domain parameters of the payment token.
///
/// Used when the gateway's payment requirement does not carry the domain
/// `name`/`version` in its `extra` field.
#[derive(Debug, Clone)]
pub struct TokenDomain {
    /// Domain name (e.g., "USD Coin").
    pub name: String,
    /// Domain version.
    pub version: String,
    /// EVM chain id.
    pub chain_id: u64,
}

impl TokenDomain {
    /// USDC on Base mainnet.
    pub fn base_usdc() -> Self {
        Self {
            name: "USD Coin".to_string(),
            version: "2".to_string(),
            chain_id: 8453,
        }
    }

    /// USDC on Base Sepolia.
    pub fn base_sepolia_usdc() -> Self {
        Self {
            name: "USDC".to_string(),
            version: "2".to_string(),
            chain_id: 84532,
        }
    }

    /// Domain for a known network name, if any.
    pub fn for_network(network: &str) -> Option<Self> {
        match network {
            crate::types::NETWORK_BASE => Some(Self::base_usdc()),
            crate::types::NETWORK_BASE_SEPOLIA => Some(Self::base_sepolia_usdc()),
            _ => None,
        }
    }
}

/// In-process signer backed by an `ethers` local wallet.
pub struct LocalSigner {
    /// The signing wallet.
    wallet: LocalWallet,
    /// Fallback EIP-712 domain parameters.
    domain: TokenDomain,
}

impl LocalSigner {
    /// Create a signer from a hex private key (with or without `0x` prefix).
    pub fn from_private_key(key: &str, domain: TokenDomain) -> X402Result<Self> {
        let key = key.trim();
        let key = key
            .strip_prefix("0x")
            .or_else(|| key.strip_prefix("0X"))
            .unwrap_or(key);

        let wallet = key
            .parse::<LocalWallet>()
            .map_err(|e| X402Error::Wallet(e.to_string()))?;

        Ok(Self { wallet, domain })
    }

    /// Create a signer with a freshly generated ephemeral key.
    ///
    /// The wallet starts unfunded, so paid calls will be rejected by the
    /// gateway until it receives tokens.
    pub fn ephemeral(domain: TokenDomain) -> Self {
        Self {
            wallet: LocalWallet::new(&mut rand::thread_rng()),
            domain,
        }
    }
}

#[async_trait]
impl PaymentSigner for LocalSigner {
    fn address(&self) -> String {
        to_checksum(&self.wallet.address(), None)
    }

    async fn sign_payment(&self, requirement: &PaymentRequirement) -> X402Result<PaymentPayload> {
        let amount = requirement.amount()?;
        debug!(
            resource = %requirement.resource,
            amount = amount,
            network = %requirement.network,
            "Signing payment authorization"
        );

        let now = Utc::now().timestamp();
        // Back-dated to tolerate clock skew between client and gateway.
        let valid_after = (now - 60).max(0);
        let valid_before = now + requirement.max_timeout_seconds as i64;

        let mut nonce = [0u8; 32];
        rand::thread_rng().fill(&mut nonce[..]);
        let nonce_hex = format!("0x{}", hex::encode(nonce));

        let from = self.address();
        let name = requirement.domain_name().unwrap_or(&self.domain.name);
        let version = requirement.domain_version().unwrap_or(&self.domain.version);

        // EIP-3009 TransferWithAuthorization as an eth_signTypedData_v4
        // document; hashing and signing stay inside the wallet library.
        let typed_json = serde_json::json!({
            "types": {
                "EIP712Domain": [
                    { "name": "name", "type": "string" },
                    { "name": "version", "type": "string" },
                    { "name": "chainId", "type": "uint256" },
                    { "name": "verifyingContract", "type": "address" }
                ],
                "TransferWithAuthorization": [
                    { "name": "from", "type": "address" },
                    { "name": "to", "type": "address" },
                    { "name": "value", "type": "uint256" },
                    { "name": "validAfter", "type": "uint256" },
                    { "name": "validBefore", "type": "uint256" },
                    { "name": "nonce", "type": "bytes32" }
                ]
            },
            "primaryType": "TransferWithAuthorization",
            "domain": {
                "name": name,
                "version": version,
                "chainId": self.domain.chain_id,
                "verifyingContract": requirement.asset,
            },
            "message": {
                "from": from,
                "to": requirement.pay_to,
                "value": amount.to_string(),
                "validAfter": valid_after.to_string(),
                "validBefore": valid_before.to_string(),
                "nonce": nonce_hex,
            },
        });

        let typed: TypedData = serde_json::from_value(typed_json)?;
        let signature = self
            .wallet
            .sign_typed_data(&typed)
            .await
            .map_err(|e| X402Error::Signing(e.to_string()))?;

        Ok(PaymentPayload {
            x402_version: X402_VERSION,
            scheme: SCHEME_EXACT.to_string(),
            network: requirement.network.clone(),
            payload: ExactEvmPayload {
                signature: format!("0x{}", signature),
                authorization: TransferAuthorization {
                    from,
                    to: requirement.pay_to.clone(),
                    value: amount.to_string(),
                    valid_after: valid_after.to_string(),
                    valid_before: valid_before.to_string(),
                    nonce: nonce_hex,
                },
            },
        })
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &to_checksum(&self.wallet.address(), None))
            .field("domain", &self.domain)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NETWORK_BASE;

    // Well-known development key (hardhat account #0); never funded on
    // mainnet.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn sample_requirement() -> PaymentRequirement {
        PaymentRequirement {
            scheme: SCHEME_EXACT.to_string(),
            network: NETWORK_BASE.to_string(),
            max_amount_required: "2000".to_string(),
            resource: "https://gateway.inferpay.dev/v1/chat/completions".to_string(),
            description: "chat completion".to_string(),
            mime_type: None,
            pay_to: "0x209693Bc6afc0C5328bA36FaF03C514EF312287C".to_string(),
            max_timeout_seconds: 300,
            asset: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".to_string(),
            extra: Some(serde_json::json!({"name": "USD Coin", "version": "2"})),
        }
    }

    #[test]
    fn test_address_derivation() {
        let signer = LocalSigner::from_private_key(DEV_KEY, TokenDomain::base_usdc()).unwrap();
        assert_eq!(signer.address(), DEV_ADDRESS);
    }

    #[test]
    fn test_from_private_key_rejects_garbage() {
        assert!(LocalSigner::from_private_key("not-a-key", TokenDomain::base_usdc()).is_err());
    }

    #[test]
    fn test_ephemeral_signers_differ() {
        let a = LocalSigner::ephemeral(TokenDomain::base_usdc());
        let b = LocalSigner::ephemeral(TokenDomain::base_usdc());
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn test_token_domain_for_network() {
        assert_eq!(TokenDomain::for_network("base").unwrap().chain_id, 8453);
        assert_eq!(
            TokenDomain::for_network("base-sepolia").unwrap().chain_id,
            84532
        );
        assert!(TokenDomain::for_network("ethereum").is_none());
    }

    #[tokio::test]
    async fn test_sign_payment_payload_shape() {
        let signer = LocalSigner::from_private_key(DEV_KEY, TokenDomain::base_usdc()).unwrap();
        let requirement = sample_requirement();

        let payload = signer.sign_payment(&requirement).await.unwrap();

        assert_eq!(payload.x402_version, X402_VERSION);
        assert_eq!(payload.scheme, SCHEME_EXACT);
        assert_eq!(payload.network, NETWORK_BASE);

        let auth = &payload.payload.authorization;
        assert_eq!(auth.from, DEV_ADDRESS);
        assert_eq!(auth.to, requirement.pay_to);
        assert_eq!(auth.value, "2000");

        // 32-byte nonce, 0x-prefixed
        assert_eq!(auth.nonce.len(), 2 + 64);
        // 65-byte signature, 0x-prefixed
        assert_eq!(payload.payload.signature.len(), 2 + 130);

        let after: i64 = auth.valid_after.parse().unwrap();
        let before: i64 = auth.valid_before.parse().unwrap();
        assert!(after < before);
    }

    #[tokio::test]
    async fn test_sign_payment_rejects_bad_amount() {
        let signer = LocalSigner::from_private_key(DEV_KEY, TokenDomain::base_usdc()).unwrap();
        let mut requirement = sample_requirement();
        requirement.max_amount_required = "0.002".to_string();

        assert!(signer.sign_payment(&requirement).await.is_err());
    }
}
