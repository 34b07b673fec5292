//! x402 Payment Required protocol client for Inferpay.
//!
//! Implements the client side of the x402 micropayment flow used by the
//! inference gateway: parsing `402 Payment Required` responses, producing a
//! signed payment payload, and encoding it into the `X-PAYMENT` header.
//!
//! Payment signing itself is delegated to the wallet library: the
//! [`LocalSigner`] assembles an EIP-3009 `TransferWithAuthorization`
//! typed-data document and hands it to `ethers` for hashing and signing.
//! Alternative wallets plug in through the [`PaymentSigner`] trait.

pub mod error;
pub mod signer;
pub mod types;

pub use error::{X402Error, X402Result};
pub use signer::{LocalSigner, PaymentSigner, TokenDomain};
pub use types::{
    decode_settlement_header, encode_payment_header, ExactEvmPayload, PaymentPayload,
    PaymentRequired, PaymentRequirement, SettlementResponse, TransferAuthorization,
    HEADER_PAYMENT, HEADER_PAYMENT_RESPONSE, NETWORK_BASE, NETWORK_BASE_SEPOLIA, SCHEME_EXACT,
    X402_VERSION,
};
