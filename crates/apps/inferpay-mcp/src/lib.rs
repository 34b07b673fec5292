//! MCP (Model Context Protocol) server for Inferpay.
//!
//! This crate provides an MCP server that lets AI assistants like Claude
//! call paid AI models, paying per request with x402 micropayments.
//!
//! # Overview
//!
//! The server exposes these tools:
//!
//! - **chat**: completion from a named model
//! - **smart_chat**: completion routed by task complexity
//! - **generate_image**: image generation
//! - **list_models**: the gateway model catalog
//! - **wallet_info**: paying wallet address and USDC balance
//! - **budget_status / set_budget / clear_budget**: session spending ceiling
//!
//! # Usage
//!
//! Configured in Claude Desktop's MCP config:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "inferpay": {
//!       "command": "inferpay-mcp",
//!       "args": ["--budget", "1.0"],
//!       "env": { "INFERPAY_PRIVATE_KEY": "0x..." }
//!     }
//!   }
//! }
//! ```
//!
//! # Budget Tracking
//!
//! The server tracks spending against an optional session budget:
//!
//! - The limit can be set at startup or changed at any time with the budget
//!   tools; spend and call counters never reset within a session.
//! - Metered calls are blocked once the remaining budget reaches zero.
//! - The guard is advisory cost control, not billing enforcement; the
//!   actual charge is authorized by the wallet per call.

pub mod budget;
pub mod error;
pub mod server;
pub mod tools;

pub use budget::{BudgetCheck, BudgetGuard};
pub use error::{McpError, McpResult};
pub use server::{run_server, InferpayMcpServer, McpServerConfig};
