//! MCP server implementation for Inferpay.
//!
//! Uses the RMCP SDK to expose paid AI inference to MCP clients. Metered
//! tools consult the session budget guard before calling the gateway and
//! report the settled cost back to it afterwards.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use inferpay_chain::{BalanceReader, ChainConfig, TokenBalance};
use inferpay_gateway::{
    ChatMessage, ChatRequest, GatewayClient, GatewayConfig, ImageRequest, ModelInfo,
};
use inferpay_types::{
    default_model, find_model, model_for_tier, ModelTier, ASSUMED_CHAT_COST_USD,
    ASSUMED_IMAGE_COST_USD, DEFAULT_IMAGE_MODEL,
};
use inferpay_x402::{LocalSigner, PaymentSigner, TokenDomain};

use crate::budget::BudgetGuard;
use crate::error::McpError as InferpayMcpError;
use crate::tools::{
    BudgetStatusOutput, ChatInput, ChatOutput, GenerateImageInput, GenerateImageOutput,
    ListModelsInput, ListModelsOutput, ModelEntry, PaymentInfo, SetBudgetInput, SmartChatInput,
    WalletInfoOutput,
};

/// Create a standardized error response for MCP tools.
///
/// Returns a JSON-formatted error with error code, message, and recovery
/// suggestion.
fn tool_error(error: &InferpayMcpError) -> CallToolResult {
    let code = error.error_code();
    let response = serde_json::json!({
        "error": code.to_string(),
        "code": code.code(),
        "message": error.to_string(),
        "suggestion": code.suggestion(),
    });
    CallToolResult::error(vec![Content::text(response.to_string())])
}

/// Configuration for the MCP server.
#[derive(Debug, Clone)]
pub struct McpServerConfig {
    /// Session budget in USD. `None` means unlimited.
    pub budget_usd: Option<f64>,
    /// Hex private key of the paying wallet. When absent, an ephemeral
    /// unfunded wallet is generated for the session.
    pub private_key: Option<String>,
    /// Inference gateway configuration.
    pub gateway: GatewayConfig,
    /// Chain access configuration for balance reads.
    pub chain: ChainConfig,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            budget_usd: None,
            private_key: None,
            gateway: GatewayConfig::default(),
            chain: ChainConfig::base(),
        }
    }
}

/// Inferpay MCP Server.
///
/// Exposes chat, smart routing, image generation, model listing, wallet
/// inspection, and session budget tools.
#[derive(Clone)]
pub struct InferpayMcpServer {
    /// Paid-inference gateway client.
    gateway: Arc<GatewayClient>,
    /// Read-only balance lookups.
    balance_reader: Arc<BalanceReader>,
    /// Session budget guard.
    budget: Arc<BudgetGuard>,
    /// Checksum address of the paying wallet.
    wallet_address: String,
    /// Session-scoped cache of the gateway model catalog.
    model_cache: Arc<Mutex<Option<Vec<ModelInfo>>>>,
    /// Tool router for MCP.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl InferpayMcpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: McpServerConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let domain = TokenDomain::for_network(&config.gateway.network)
            .unwrap_or_else(TokenDomain::base_usdc);

        let signer: Arc<dyn PaymentSigner> = match &config.private_key {
            Some(key) => Arc::new(LocalSigner::from_private_key(key, domain)?),
            None => {
                let signer = LocalSigner::ephemeral(domain);
                warn!(
                    address = %signer.address(),
                    "No private key configured; using an ephemeral unfunded wallet. \
                     Paid calls will be rejected by the gateway until it is funded."
                );
                Arc::new(signer)
            }
        };
        let wallet_address = signer.address();

        let budget = match config.budget_usd {
            Some(limit) => BudgetGuard::with_limit(limit)?,
            None => BudgetGuard::new(),
        };

        let gateway = GatewayClient::new(config.gateway, signer)?;
        let balance_reader = BalanceReader::new(config.chain)?;

        info!(
            budget_usd = ?config.budget_usd,
            wallet = %wallet_address,
            network = %balance_reader.config().network,
            "MCP server initialized"
        );

        Ok(Self {
            gateway: Arc::new(gateway),
            balance_reader: Arc::new(balance_reader),
            budget: Arc::new(budget),
            wallet_address,
            model_cache: Arc::new(Mutex::new(None)),
            tool_router: Self::tool_router(),
        })
    }

    /// Send a prompt to a named model.
    #[tool(
        description = "Send a chat prompt to a specific model and return the completion. Metered: each call spends from the session budget. Use list_models for available model ids."
    )]
    async fn chat(
        &self,
        Parameters(input): Parameters<ChatInput>,
    ) -> Result<CallToolResult, McpError> {
        let model = input
            .model
            .clone()
            .unwrap_or_else(|| default_model().id.to_string());

        if let Some(error) = self.validate_model(&model).await {
            return Ok(tool_error(&error));
        }

        self.run_chat(
            &model,
            None,
            input.prompt,
            input.system,
            input.max_tokens,
            input.temperature,
        )
        .await
    }

    /// Route a prompt through the static tier table.
    #[tool(
        description = "Send a chat prompt without picking a model: the prompt is routed by task complexity (fast, balanced, or powerful; default balanced). Metered: each call spends from the session budget."
    )]
    async fn smart_chat(
        &self,
        Parameters(input): Parameters<SmartChatInput>,
    ) -> Result<CallToolResult, McpError> {
        let tier = match input.complexity.as_deref() {
            None => ModelTier::Balanced,
            Some(s) => match ModelTier::parse(s) {
                Some(tier) => tier,
                None => {
                    return Ok(tool_error(&InferpayMcpError::InvalidArgument(format!(
                        "unknown complexity '{}', expected fast, balanced, or powerful",
                        s
                    ))));
                }
            },
        };

        let model = model_for_tier(tier);
        debug!(tier = %tier, model = %model.id, "Routed smart_chat");

        self.run_chat(
            model.id,
            Some(tier),
            input.prompt,
            input.system,
            input.max_tokens,
            None,
        )
        .await
    }

    /// Generate an image from a text prompt.
    #[tool(
        description = "Generate an image from a text prompt. Metered: each call spends from the session budget."
    )]
    async fn generate_image(
        &self,
        Parameters(input): Parameters<GenerateImageInput>,
    ) -> Result<CallToolResult, McpError> {
        let check = self.budget.check();
        if !check.allowed {
            return Ok(tool_error(&self.budget_exceeded()));
        }

        let model = input
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());

        let request = ImageRequest {
            model: model.clone(),
            prompt: input.prompt,
            size: input.size,
        };

        let paid = match self.gateway.generate_image(&request).await {
            Ok(p) => p,
            Err(e) => return Ok(tool_error(&InferpayMcpError::Gateway(e))),
        };

        let cost_usd = paid
            .receipt
            .as_ref()
            .map(|r| r.amount_usd)
            .unwrap_or(ASSUMED_IMAGE_COST_USD);
        self.budget.record_spend(cost_usd);

        let image = paid.body.data.into_iter().next();
        let output = GenerateImageOutput {
            model,
            url: image.as_ref().and_then(|i| i.url.clone()),
            b64_json: image.and_then(|i| i.b64_json),
            cost_usd,
            remaining_usd: self.budget.remaining_usd(),
            payment: paid.receipt.map(|r| PaymentInfo {
                network: r.network,
                transaction: r.transaction,
            }),
        };

        info!(
            cost_usd = cost_usd,
            calls = self.budget.calls(),
            "Image generated"
        );

        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// List the models the gateway serves.
    #[tool(
        description = "List available models with per-call prices and routing tiers. Unmetered; the catalog is cached for the session."
    )]
    async fn list_models(
        &self,
        Parameters(input): Parameters<ListModelsInput>,
    ) -> Result<CallToolResult, McpError> {
        let tier_filter = match input.tier.as_deref() {
            None => None,
            Some(s) => match ModelTier::parse(s) {
                Some(tier) => Some(tier),
                None => {
                    return Ok(tool_error(&InferpayMcpError::InvalidArgument(format!(
                        "unknown tier '{}', expected fast, balanced, or powerful",
                        s
                    ))));
                }
            },
        };

        let models = match self.cached_models().await {
            Ok(models) => models,
            Err(e) => return Ok(tool_error(&e)),
        };

        let entries: Vec<ModelEntry> = models
            .iter()
            .filter_map(|m| {
                let tier = find_model(&m.id).map(|spec| spec.tier);
                if let Some(filter) = tier_filter {
                    if tier != Some(filter) {
                        return None;
                    }
                }
                Some(ModelEntry {
                    id: m.id.clone(),
                    tier: tier.map(|t| t.to_string()),
                    price_usd: m.price_usd,
                })
            })
            .collect();

        let output = ListModelsOutput {
            total: entries.len() as u32,
            models: entries,
        };

        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Show the wallet address and token balance.
    #[tool(
        description = "Show the paying wallet: address, USDC balance on Base, and a block explorer link. A null balance means the balance providers were unreachable, not that the balance is zero."
    )]
    async fn wallet_info(&self) -> Result<CallToolResult, McpError> {
        let balance = self.balance_reader.get_balance(&self.wallet_address).await;
        let chain = self.balance_reader.config();

        let note = match balance {
            TokenBalance::Unavailable => Some(
                "Balance providers are unreachable; the balance is unknown, not zero. \
                 Try again shortly."
                    .to_string(),
            ),
            TokenBalance::Available(_) => None,
        };

        let output = WalletInfoOutput {
            address: self.wallet_address.clone(),
            balance: balance.value(),
            network: chain.network.clone(),
            basescan_url: chain.explorer_address_url(&self.wallet_address),
            note,
        };

        debug!(
            address = %output.address,
            balance = ?output.balance,
            "Wallet info requested"
        );

        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Show the session budget.
    #[tool(
        description = "Show the session spending budget: limit, cumulative spend, call count, and remaining amount (all USD)."
    )]
    async fn budget_status(&self) -> Result<CallToolResult, McpError> {
        self.budget_output()
    }

    /// Set the session spending limit.
    #[tool(
        description = "Set the session spending limit in USD. Must be positive; does not reset what was already spent."
    )]
    async fn set_budget(
        &self,
        Parameters(input): Parameters<SetBudgetInput>,
    ) -> Result<CallToolResult, McpError> {
        if let Err(e) = self.budget.set_limit(input.amount) {
            return Ok(tool_error(&e));
        }

        info!(limit_usd = input.amount, "Budget limit set");
        self.budget_output()
    }

    /// Remove the session spending limit.
    #[tool(description = "Remove the session spending limit. Spend tracking continues.")]
    async fn clear_budget(&self) -> Result<CallToolResult, McpError> {
        self.budget.clear_limit();
        info!("Budget limit cleared");
        self.budget_output()
    }

    /// Shared metered chat path for `chat` and `smart_chat`.
    async fn run_chat(
        &self,
        model: &str,
        tier: Option<ModelTier>,
        prompt: String,
        system: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<CallToolResult, McpError> {
        debug!(model = %model, "Processing chat request");

        // Advisory gate: consult the budget before the paid call.
        let check = self.budget.check();
        if !check.allowed {
            return Ok(tool_error(&self.budget_exceeded()));
        }

        let mut messages = Vec::new();
        if let Some(system) = system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        let request = ChatRequest {
            model: model.to_string(),
            messages,
            max_tokens,
            temperature,
        };

        let paid = match self.gateway.chat(&request).await {
            Ok(p) => p,
            Err(e) => return Ok(tool_error(&InferpayMcpError::Gateway(e))),
        };

        // Record the settled amount when a payment occurred, the assumed
        // per-model constant otherwise. At most once per completed call.
        let cost_usd = paid
            .receipt
            .as_ref()
            .map(|r| r.amount_usd)
            .unwrap_or_else(|| assumed_chat_cost(model));
        self.budget.record_spend(cost_usd);

        let response = paid.body.text().unwrap_or_default().to_string();
        let output = ChatOutput {
            model: paid.body.model.clone().unwrap_or_else(|| model.to_string()),
            tier: tier.map(|t| t.to_string()),
            response,
            cost_usd,
            remaining_usd: self.budget.remaining_usd(),
            payment: paid.receipt.map(|r| PaymentInfo {
                network: r.network,
                transaction: r.transaction,
            }),
        };

        info!(
            model = %model,
            cost_usd = cost_usd,
            calls = self.budget.calls(),
            "Chat completed"
        );

        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Reject a model id the gateway is known not to serve.
    ///
    /// The static tier table is always accepted; other ids are only
    /// rejected once the session has fetched the gateway catalog and the
    /// id is absent from it.
    async fn validate_model(&self, model: &str) -> Option<InferpayMcpError> {
        if find_model(model).is_some() {
            return None;
        }

        let cache = self.model_cache.lock().await;
        match cache.as_ref() {
            Some(models) if !models.iter().any(|m| m.id == model) => {
                Some(InferpayMcpError::ModelNotFound(model.to_string()))
            }
            _ => None,
        }
    }

    /// Fetch the gateway catalog, reusing the session cache.
    async fn cached_models(&self) -> Result<Vec<ModelInfo>, InferpayMcpError> {
        {
            let cache = self.model_cache.lock().await;
            if let Some(models) = cache.as_ref() {
                debug!(models = models.len(), "Returning cached model catalog");
                return Ok(models.clone());
            }
        }

        let list = self
            .gateway
            .list_models()
            .await
            .map_err(InferpayMcpError::Gateway)?;

        let mut cache = self.model_cache.lock().await;
        *cache = Some(list.data.clone());
        Ok(list.data)
    }

    /// Current budget figures as a `BudgetExceeded` error.
    fn budget_exceeded(&self) -> InferpayMcpError {
        InferpayMcpError::BudgetExceeded {
            spent_usd: self.budget.spent_usd(),
            limit_usd: self.budget.limit_usd().unwrap_or(0.0),
            remaining_usd: self.budget.remaining_usd().unwrap_or(0.0),
        }
    }

    /// Serialize the current budget snapshot.
    fn budget_output(&self) -> Result<CallToolResult, McpError> {
        let output = BudgetStatusOutput {
            limit: self.budget.limit_usd(),
            spent: self.budget.spent_usd(),
            calls: self.budget.calls(),
            remaining: self.budget.remaining_usd(),
        };

        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

/// Assumed per-call cost for a chat model.
fn assumed_chat_cost(model: &str) -> f64 {
    find_model(model)
        .map(|spec| spec.assumed_cost_usd)
        .unwrap_or(ASSUMED_CHAT_COST_USD)
}

#[tool_handler]
impl rmcp::ServerHandler for InferpayMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Inferpay MCP Server - Call paid AI models with automatic x402 micropayments. \
                 Use `chat` with a model id or `smart_chat` to route by task complexity, \
                 `generate_image` for images, and `list_models` to browse the catalog. \
                 `wallet_info` shows the paying wallet and its USDC balance; `budget_status`, \
                 `set_budget`, and `clear_budget` manage the session spending ceiling."
                    .into(),
            ),
        }
    }
}

/// Run the MCP server on stdio until the client disconnects.
pub async fn run_server(
    config: McpServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use rmcp::{transport::stdio, ServiceExt};

    let server = InferpayMcpServer::new(config)?;
    info!("Starting MCP server on stdio");

    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
