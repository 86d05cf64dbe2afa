//! MCP server implementation.

use std::sync::Arc;

use rmcp::{
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::{
    config::{parse_slippage, Config},
    error::AppError,
    ethereum::{acquire_connection, contracts::ContractFactory, parse_address, Connection},
    services::{
        DashboardService, JsonFileHistory, LiquidityOrchestrator, PoolHistoryStore,
        PoolLookupService, SaleService, TokenQueryService,
    },
    state::{DappState, Notification, StateStore},
    types::PoolLookup,
};

/// Contract factories for an established wallet session.
#[derive(Clone)]
pub struct Session {
    /// Factory over the read-only handle.
    pub reader: Arc<dyn ContractFactory>,
    /// Factory over the signing handle.
    pub writer: Arc<dyn ContractFactory>,
}

impl From<Connection> for Session {
    fn from(connection: Connection) -> Self {
        Self { reader: Arc::new(connection.reader()), writer: Arc::new(connection.writer()) }
    }
}

/// Liquidity DApp MCP Server.
///
/// Each tool is one user action. Actions run through the shared
/// [`StateStore`], which keeps the loading flag and queues notifications.
#[derive(Clone)]
pub struct LiquidityDappServer {
    config: Arc<Config>,
    session: Arc<OnceCell<Session>>,
    state: Arc<StateStore>,
    history: Arc<dyn PoolHistoryStore>,
    tool_router: ToolRouter<Self>,
}

impl LiquidityDappServer {
    /// Create a new Liquidity DApp MCP Server.
    ///
    /// Note: No network calls are made here. The wallet session is opened by
    /// the first tool that needs it, and only a successful session is kept.
    pub fn new(config: Config) -> Self {
        tracing::info!(
            rpc_url = %config.rpc_url,
            history = %config.pool_history_path.display(),
            "Initializing Liquidity DApp MCP Server"
        );

        let history = Arc::new(JsonFileHistory::new(config.pool_history_path.clone()));
        Self::build(config, OnceCell::new(), history)
    }

    /// Create a server around an already established session.
    pub fn with_session(
        config: Config,
        session: Session,
        history: Arc<dyn PoolHistoryStore>,
    ) -> Self {
        Self::build(config, OnceCell::new_with(Some(session)), history)
    }

    fn build(
        config: Config,
        session: OnceCell<Session>,
        history: Arc<dyn PoolHistoryStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            session: Arc::new(session),
            state: Arc::new(StateStore::new()),
            history,
            tool_router: Self::tool_router(),
        }
    }

    /// Presentation state shared by all tools.
    pub fn state(&self) -> &StateStore {
        &self.state
    }

    async fn session(&self) -> std::result::Result<Session, AppError> {
        self.session
            .get_or_try_init(|| async {
                let connection = acquire_connection(&self.config).await?;
                Ok::<_, AppError>(Session::from(connection))
            })
            .await
            .cloned()
    }

    /// Re-read the overview after an action. A failure here is only reported.
    async fn refresh(&self, session: &Session) {
        match DashboardService::new(session.writer.clone()).fetch_initial_data().await {
            Ok(snapshot) => self.state.apply_dashboard(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh overview");
                self.state.notify_error(format!("Failed to refresh overview: {e}"));
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> std::result::Result<String, McpError> {
    serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))
}

/// Input parameters for the load_token tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct LoadTokenInput {
    /// ERC20 token contract address (0x...).
    pub address: String,
}

/// Input parameters for the get_pool_address tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct GetPoolAddressInput {
    /// First token contract address (0x...).
    pub token_a: String,
    /// Second token contract address (0x...).
    pub token_b: String,
    /// Fee tier in hundredths of a basis point: 100, 500, 3000 or 10000.
    pub fee: u32,
}

/// Input parameters for the create_liquidity tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateLiquidityInput {
    /// Position of the pool in the lookup history (0 = oldest).
    pub history_index: usize,
    /// Liquidity to mint, in 18-decimal units (e.g., "0.001").
    pub liquidity_amount: String,
    /// Allowance granted to the position manager on each token, in 18-decimal units.
    pub approve_amount: String,
    /// Slippage tolerance percentage as string (e.g., "0.5" for 0.5%). Default from configuration.
    #[serde(default)]
    pub slippage_tolerance: Option<String>,
}

/// Input parameters for the buy_tokens tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct BuyTokensInput {
    /// Number of whole tokens to buy at 0.0001 ether each.
    pub count: u64,
}

/// Output of the get_dapp_state tool.
#[derive(Debug, Clone, Serialize)]
pub struct DappStateView {
    pub state: DappState,
    pub notifications: Vec<Notification>,
}

#[tool_router]
impl LiquidityDappServer {
    /// Connect the configured wallet and load the account overview.
    #[tool(
        description = "Connect the configured wallet, then load native balance, native token, holder and token sale data"
    )]
    pub async fn connect(&self) -> std::result::Result<String, McpError> {
        tracing::info!("connect called");

        let session = self.state.track(Some("Wallet connected"), self.session()).await?;
        self.state.set_connection(session.writer.caller(), session.writer.chain_id());
        self.refresh(&session).await;

        to_json(&self.state.snapshot())
    }

    /// Read ERC20 metadata and the connected account's balance.
    #[tool(description = "Load name, symbol, decimals, supply and the connected account's balance of an ERC20 token")]
    pub async fn load_token(
        &self,
        Parameters(input): Parameters<LoadTokenInput>,
    ) -> std::result::Result<String, McpError> {
        tracing::info!(address = %input.address, "load_token called");

        let token = self
            .state
            .track(None, async {
                let address = parse_address(&input.address)?;
                let session = self.session().await?;
                TokenQueryService::new(session.writer).query_token(address).await
            })
            .await?;

        to_json(&token)
    }

    /// Resolve the Uniswap V3 pool for a token pair and fee tier.
    #[tool(
        description = "Find the Uniswap V3 pool for two tokens and a fee tier. Found pools are appended to the pool history."
    )]
    pub async fn get_pool_address(
        &self,
        Parameters(input): Parameters<GetPoolAddressInput>,
    ) -> std::result::Result<String, McpError> {
        tracing::info!(
            token_a = %input.token_a,
            token_b = %input.token_b,
            fee = input.fee,
            "get_pool_address called"
        );

        let lookup = self
            .state
            .track(None, async {
                let token_a = parse_address(&input.token_a)?;
                let token_b = parse_address(&input.token_b)?;
                let session = self.session().await?;

                let tokens = TokenQueryService::new(session.writer.clone());
                let (token_a, token_b) =
                    tokio::try_join!(tokens.query_token(token_a), tokens.query_token(token_b))?;

                PoolLookupService::new(session.reader, self.history.clone())
                    .lookup_pool(token_a, token_b, input.fee)
                    .await
            })
            .await?;

        match &lookup {
            PoolLookup::Found(_) => self.state.notify_success("Successfully Completed"),
            PoolLookup::NotFound { .. } => self.state.notify_success("Sorry there is no pool"),
        }

        to_json(&lookup)
    }

    /// List successful pool lookups.
    #[tool(description = "List previously found pools, oldest first")]
    pub async fn get_pool_history(&self) -> std::result::Result<String, McpError> {
        tracing::info!("get_pool_history called");

        let records = self.state.track(None, self.history.list()).await?;
        to_json(&records)
    }

    /// Mint a position in a pool from the history and record it in the registry.
    #[tool(
        description = "Add liquidity to a pool from the pool history: approve both tokens, mint a Uniswap V3 position two tick spacings either side of the current price, then record it in the liquidity registry"
    )]
    pub async fn create_liquidity(
        &self,
        Parameters(input): Parameters<CreateLiquidityInput>,
    ) -> std::result::Result<String, McpError> {
        tracing::info!(
            index = input.history_index,
            liquidity = %input.liquidity_amount,
            approve = %input.approve_amount,
            slippage = ?input.slippage_tolerance,
            "create_liquidity called"
        );

        let (session, record, slippage) = self
            .state
            .track(None, async {
                let slippage = match input.slippage_tolerance.as_deref() {
                    Some(raw) => parse_slippage(raw)?,
                    None => self.config.slippage_tolerance,
                };

                let records = self.history.list().await?;
                let record = records.get(input.history_index).cloned().ok_or_else(|| {
                    AppError::Parse(format!(
                        "history_index {} is out of range, the pool history has {} entries",
                        input.history_index,
                        records.len()
                    ))
                })?;

                let session = self.session().await?;
                Ok((session, record, slippage))
            })
            .await?;

        let receipt = self
            .state
            .track(
                Some("Liquidity added successfully"),
                LiquidityOrchestrator::new(session.writer.clone(), slippage).create_liquidity(
                    &record,
                    &input.liquidity_amount,
                    &input.approve_amount,
                ),
            )
            .await?;
        self.refresh(&session).await;

        to_json(&receipt)
    }

    /// List positions recorded for the connected account.
    #[tool(description = "List liquidity positions recorded in the liquidity registry for the connected account")]
    pub async fn get_all_liquidity(&self) -> std::result::Result<String, McpError> {
        tracing::info!("get_all_liquidity called");

        let records = self
            .state
            .track(None, async {
                let session = self.session().await?;
                let owner = session.writer.caller().ok_or(AppError::WalletUnavailable)?;
                LiquidityOrchestrator::new(session.writer, self.config.slippage_tolerance)
                    .get_all_liquidity(owner)
                    .await
            })
            .await?;

        to_json(&records)
    }

    /// Buy tokens from the token sale.
    #[tool(description = "Buy tokens from the token sale at 0.0001 ether per token")]
    pub async fn buy_tokens(
        &self,
        Parameters(input): Parameters<BuyTokensInput>,
    ) -> std::result::Result<String, McpError> {
        tracing::info!(count = input.count, "buy_tokens called");

        let session = self.state.track(None, self.session()).await?;
        let receipt = self
            .state
            .track(
                Some("Tokens purchased"),
                SaleService::new(session.writer.clone()).buy_tokens(input.count),
            )
            .await?;
        self.refresh(&session).await;

        to_json(&receipt)
    }

    /// Move the fixed token allocation to the token sale.
    #[tool(description = "Transfer 2000 native tokens from the connected account to the token sale contract")]
    pub async fn transfer_native_token(&self) -> std::result::Result<String, McpError> {
        tracing::info!("transfer_native_token called");

        let session = self.state.track(None, self.session()).await?;
        let receipt = self
            .state
            .track(
                Some("Tokens transferred"),
                SaleService::new(session.writer.clone()).transfer_fixed_allocation(),
            )
            .await?;
        self.refresh(&session).await;

        to_json(&receipt)
    }

    /// Current presentation state plus pending notifications.
    #[tool(description = "Show the current DApp state and take pending notifications")]
    pub async fn get_dapp_state(&self) -> std::result::Result<String, McpError> {
        to_json(&DappStateView {
            state: self.state.snapshot(),
            notifications: self.state.drain_notifications(),
        })
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for LiquidityDappServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "liquidity-dapp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Liquidity DApp MCP Server. Connects a wallet, looks up Uniswap V3 pools, \
                 adds liquidity and trades on the project's token sale."
                    .to_string(),
            ),
        }
    }
}
