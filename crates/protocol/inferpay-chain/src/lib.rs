//! Read-only blockchain data access for Inferpay.
//!
//! This crate resolves ERC-20 token balances by querying a list of
//! interchangeable JSON-RPC providers. Providers are tried in order and the
//! first usable answer wins; an unreachable or misbehaving provider is
//! skipped silently. When every provider fails the result is
//! [`TokenBalance::Unavailable`] — "balance unknown, try again" — which is
//! distinct from a legitimate zero balance.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use inferpay_chain::{BalanceReader, ChainConfig, TokenBalance};
//!
//! let reader = BalanceReader::new(ChainConfig::base())?;
//! match reader.get_balance("0x036CbD53842c5426634e7929541eC2318f3dCF7e").await {
//!     TokenBalance::Available(usdc) => println!("balance: {usdc} USDC"),
//!     TokenBalance::Unavailable => println!("balance unknown, retry later"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod balance;
pub mod config;
pub mod error;

pub use balance::{BalanceReader, TokenBalance};
pub use config::ChainConfig;
pub use error::{ChainError, ChainResult};
