//! Common utilities for integration tests.
//!
//! In-memory contract doubles implementing the role traits, plus the helper for
//! tests that talk to a real node.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy::primitives::{address, Address, TxHash, B256, U256};
use async_trait::async_trait;

use liquidity_dapp::{
    ethereum::contracts::{
        ContractFactory, FactoryContract, LiquidityRegistryContract, NativeTokenContract,
        PoolContract, PositionManagerContract, TokenContract, TokenSaleContract,
    },
    mcp::Session,
    types::{
        LiquidityRecord, MintParameters, PoolState, RegistryEntry, TokenHolder, TransactionOutcome,
    },
    AppError, Config, LiquidityDappServer, Result,
};

pub const ACCOUNT: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
pub const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
pub const USDC_WETH_3000: Address = address!("8ad599c3A0ff1De082011EFDDc58f1908eb6e6D8");
pub const NATIVE: Address = address!("52Bc319BE61b92006c979B4dAd75337dc00aDF7F");
pub const SALE: Address = address!("117B8d82b60e3e646F80EFA7816e46471e54b799");
pub const POSITION_MANAGER: Address = address!("C36442b4a4522E871399CD717aBDD847Ab11FE88");
pub const CHAIN_ID: u64 = 11155111;

/// Ordered record of every write the doubles receive.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.entries().iter().any(|e| e.starts_with(prefix))
    }
}

fn tx_hash(tag: u8) -> TxHash {
    B256::repeat_byte(tag)
}

fn mined(tag: u8, succeeded: bool) -> TransactionOutcome {
    TransactionOutcome { hash: tx_hash(tag), succeeded, block_number: Some(100 + tag as u64) }
}

fn not_a_token(address: Address, method: &str) -> AppError {
    AppError::ContractCallFailed(format!(
        "{method}() on token {address} failed: execution reverted"
    ))
}

// ============================================================================
// Tokens
// ============================================================================

pub struct MockToken {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
    /// Whether the address hosts a token at all.
    pub is_token: bool,
    balances: Mutex<HashMap<Address, U256>>,
    sender: Option<Address>,
    log: CallLog,
}

impl MockToken {
    pub fn new(address: Address, symbol: &str, decimals: u8, log: CallLog) -> Self {
        Self {
            address,
            name: format!("{symbol} Token"),
            symbol: symbol.to_string(),
            decimals,
            total_supply: U256::from(1_000_000u64) * U256::from(10u8).pow(U256::from(decimals)),
            is_token: true,
            balances: Mutex::new(HashMap::new()),
            sender: Some(ACCOUNT),
            log,
        }
    }

    pub fn missing(address: Address, log: CallLog) -> Self {
        let mut token = Self::new(address, "NONE", 0, log);
        token.is_token = false;
        token
    }

    pub fn with_balance(self, owner: Address, amount: U256) -> Self {
        self.balances.lock().unwrap().insert(owner, amount);
        self
    }

    fn check(&self, method: &str) -> Result<()> {
        if self.is_token {
            Ok(())
        } else {
            Err(not_a_token(self.address, method))
        }
    }
}

#[async_trait]
impl TokenContract for MockToken {
    fn address(&self) -> Address {
        self.address
    }

    async fn name(&self) -> Result<String> {
        self.check("name")?;
        Ok(self.name.clone())
    }

    async fn symbol(&self) -> Result<String> {
        self.check("symbol")?;
        Ok(self.symbol.clone())
    }

    async fn decimals(&self) -> Result<u8> {
        self.check("decimals")?;
        Ok(self.decimals)
    }

    async fn total_supply(&self) -> Result<U256> {
        self.check("totalSupply")?;
        Ok(self.total_supply)
    }

    async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.check("balanceOf")?;
        Ok(self.balances.lock().unwrap().get(&owner).copied().unwrap_or_default())
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<TransactionOutcome> {
        self.log.push(format!("approve:{}:{spender}:{amount}", self.symbol));
        Ok(mined(0xa1, true))
    }

    async fn transfer(&self, to: Address, amount: U256) -> Result<TransactionOutcome> {
        self.log.push(format!("transfer:{to}:{amount}"));
        let sender = self.sender.unwrap_or(Address::ZERO);
        let mut balances = self.balances.lock().unwrap();
        let available = balances.get(&sender).copied().unwrap_or_default();
        if available < amount {
            // Mined, but the token rejected the transfer.
            return Ok(mined(0xf0, false));
        }
        balances.insert(sender, available - amount);
        *balances.entry(to).or_default() += amount;
        Ok(mined(0x70, true))
    }
}

pub struct MockNativeToken {
    pub token: MockToken,
    pub holders: Vec<Address>,
}

#[async_trait]
impl TokenContract for MockNativeToken {
    fn address(&self) -> Address {
        self.token.address()
    }

    async fn name(&self) -> Result<String> {
        self.token.name().await
    }

    async fn symbol(&self) -> Result<String> {
        self.token.symbol().await
    }

    async fn decimals(&self) -> Result<u8> {
        self.token.decimals().await
    }

    async fn total_supply(&self) -> Result<U256> {
        self.token.total_supply().await
    }

    async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.token.balance_of(owner).await
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<TransactionOutcome> {
        self.token.approve(spender, amount).await
    }

    async fn transfer(&self, to: Address, amount: U256) -> Result<TransactionOutcome> {
        self.token.transfer(to, amount).await
    }
}

#[async_trait]
impl NativeTokenContract for MockNativeToken {
    async fn standard(&self) -> Result<String> {
        Ok("Token v1.0".to_string())
    }

    async fn owner(&self) -> Result<Address> {
        Ok(ACCOUNT)
    }

    async fn holder_count(&self) -> Result<U256> {
        Ok(U256::from(self.holders.len()))
    }

    async fn token_holders(&self) -> Result<Vec<Address>> {
        Ok(self.holders.clone())
    }

    async fn holder_data(&self, holder: Address) -> Result<TokenHolder> {
        let balance = self.token.balance_of(holder).await?;
        Ok(TokenHolder {
            token_id: 1,
            from: ACCOUNT,
            to: holder,
            total_token: liquidity_dapp::types::format_units(balance, 18),
            is_holder: !balance.is_zero(),
        })
    }
}

// ============================================================================
// Token sale
// ============================================================================

pub struct MockSale {
    pub price: U256,
    pub sold: U256,
    /// Accept the purchase but mine it with a failed status.
    pub fails_when_mined: bool,
    log: CallLog,
}

impl MockSale {
    pub fn new(price: U256, log: CallLog) -> Self {
        Self { price, sold: U256::ZERO, fails_when_mined: false, log }
    }
}

#[async_trait]
impl TokenSaleContract for MockSale {
    fn address(&self) -> Address {
        SALE
    }

    async fn token_price(&self) -> Result<U256> {
        Ok(self.price)
    }

    async fn tokens_sold(&self) -> Result<U256> {
        Ok(self.sold)
    }

    async fn balance_of(&self, _owner: Address) -> Result<U256> {
        Ok(U256::from(5000u64) * U256::from(10u64).pow(U256::from(18u8)))
    }

    async fn buy_tokens(&self, count: U256, value: U256) -> Result<TransactionOutcome> {
        self.log.push(format!("buy:{count}:{value}"));
        if value != self.price * count {
            return Err(AppError::TransactionReverted {
                hash: None,
                reason: "execution reverted: incorrect payment".to_string(),
            });
        }
        Ok(mined(0xb0, !self.fails_when_mined))
    }
}

// ============================================================================
// Uniswap V3
// ============================================================================

#[derive(Default)]
pub struct MockFactory {
    pools: HashMap<(Address, Address, u32), Address>,
}

impl MockFactory {
    pub fn with_pool(mut self, a: Address, b: Address, fee: u32, pool: Address) -> Self {
        self.pools.insert((a, b, fee), pool);
        self.pools.insert((b, a, fee), pool);
        self
    }
}

#[async_trait]
impl FactoryContract for MockFactory {
    async fn get_pool(&self, token_a: Address, token_b: Address, fee: u32) -> Result<Address> {
        Ok(self.pools.get(&(token_a, token_b, fee)).copied().unwrap_or(Address::ZERO))
    }
}

pub struct MockPool {
    pub address: Address,
    pub state: PoolState,
}

#[async_trait]
impl PoolContract for MockPool {
    fn address(&self) -> Address {
        self.address
    }

    async fn tick_spacing(&self) -> Result<i32> {
        Ok(self.state.tick_spacing)
    }

    async fn fee(&self) -> Result<u32> {
        Ok(self.state.fee)
    }

    async fn liquidity(&self) -> Result<u128> {
        Ok(self.state.liquidity)
    }

    async fn slot0(&self) -> Result<(U256, i32)> {
        Ok((self.state.sqrt_price_x96, self.state.tick))
    }
}

/// How the position manager treats a mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintBehavior {
    Succeed,
    /// Rejected before a hash exists.
    RevertOnSubmit,
    /// Mined with a failed status.
    FailWhenMined,
}

pub struct MockPositionManager {
    pub behavior: MintBehavior,
    pub last_mint: Mutex<Option<MintParameters>>,
    log: CallLog,
}

pub const MINT_TX: u8 = 0x3a;

#[async_trait]
impl PositionManagerContract for MockPositionManager {
    fn address(&self) -> Address {
        POSITION_MANAGER
    }

    async fn submit_mint(&self, params: &MintParameters) -> Result<TxHash> {
        self.log.push("mint");
        *self.last_mint.lock().unwrap() = Some(params.clone());
        match self.behavior {
            MintBehavior::RevertOnSubmit => Err(AppError::TransactionReverted {
                hash: None,
                reason: "execution reverted: Price slippage check".to_string(),
            }),
            _ => Ok(tx_hash(MINT_TX)),
        }
    }

    async fn confirm(&self, hash: TxHash) -> Result<TransactionOutcome> {
        self.log.push("confirm");
        let succeeded = self.behavior == MintBehavior::Succeed;
        Ok(TransactionOutcome { hash, succeeded, block_number: Some(200) })
    }
}

// ============================================================================
// Liquidity registry
// ============================================================================

pub struct MockRegistry {
    pub fail: bool,
    pub entries: Mutex<Vec<RegistryEntry>>,
    log: CallLog,
}

#[async_trait]
impl LiquidityRegistryContract for MockRegistry {
    async fn add_liquidity(&self, entry: &RegistryEntry) -> Result<TransactionOutcome> {
        self.log.push("register");
        if self.fail {
            return Err(AppError::TransactionReverted {
                hash: None,
                reason: "execution reverted: registry paused".to_string(),
            });
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(mined(0xc0, true))
    }

    async fn get_all_liquidity(&self, owner: Address) -> Result<Vec<LiquidityRecord>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .enumerate()
            .map(|(i, e)| LiquidityRecord {
                id: i as u64 + 1,
                network: e.network.clone(),
                owner,
                pool_address: e.pool_address,
                token_a: e.token_a_name.clone(),
                token_b: e.token_b_name.clone(),
                token_a_address: e.token_a_address,
                token_b_address: e.token_b_address,
                time_created: 1_700_000_000,
                transaction_hash: e.transaction_hash.clone(),
            })
            .collect())
    }
}

// ============================================================================
// Factory
// ============================================================================

/// In-memory [`ContractFactory`] wired to the doubles above.
pub struct MockContracts {
    pub caller: Option<Address>,
    pub log: CallLog,
    pub tokens: HashMap<Address, Arc<MockToken>>,
    pub factory: Arc<MockFactory>,
    pub pool: Arc<MockPool>,
    pub position_manager: Arc<MockPositionManager>,
    pub native: Arc<MockNativeToken>,
    pub sale: Arc<MockSale>,
    pub registry: Option<Arc<MockRegistry>>,
}

/// Pool state at price 1 with a 60-tick spacing.
pub fn default_pool_state() -> PoolState {
    PoolState {
        tick_spacing: 60,
        fee: 3000,
        liquidity: 1_000_000_000_000_000_000,
        sqrt_price_x96: U256::from(1u8) << 96,
        tick: 7,
    }
}

pub struct MockSetup {
    pub caller: Option<Address>,
    pub mint: MintBehavior,
    pub registry_configured: bool,
    pub registry_fails: bool,
    pub native_balance: U256,
    pub pool_state: PoolState,
}

impl Default for MockSetup {
    fn default() -> Self {
        Self {
            caller: Some(ACCOUNT),
            mint: MintBehavior::Succeed,
            registry_configured: true,
            registry_fails: false,
            native_balance: U256::from(2500u64) * U256::from(10u64).pow(U256::from(18u8)),
            pool_state: default_pool_state(),
        }
    }
}

impl MockContracts {
    pub fn new() -> Self {
        Self::with(MockSetup::default())
    }

    pub fn with(setup: MockSetup) -> Self {
        let log = CallLog::default();

        let mut tokens = HashMap::new();
        tokens.insert(
            USDC,
            Arc::new(
                MockToken::new(USDC, "USDC", 6, log.clone())
                    .with_balance(ACCOUNT, U256::from(1_500_000u64)),
            ),
        );
        tokens.insert(WETH, Arc::new(MockToken::new(WETH, "WETH", 18, log.clone())));

        let native = MockNativeToken {
            token: MockToken::new(NATIVE, "DLT", 18, log.clone())
                .with_balance(ACCOUNT, setup.native_balance),
            holders: vec![ACCOUNT],
        };

        Self {
            caller: setup.caller,
            tokens,
            factory: Arc::new(MockFactory::default().with_pool(USDC, WETH, 3000, USDC_WETH_3000)),
            pool: Arc::new(MockPool { address: USDC_WETH_3000, state: setup.pool_state }),
            position_manager: Arc::new(MockPositionManager {
                behavior: setup.mint,
                last_mint: Mutex::new(None),
                log: log.clone(),
            }),
            native: Arc::new(native),
            sale: Arc::new(MockSale {
                price: U256::from(100_000_000_000_000u64),
                sold: U256::from(42u64),
                fails_when_mined: false,
                log: log.clone(),
            }),
            registry: setup.registry_configured.then(|| {
                Arc::new(MockRegistry {
                    fail: setup.registry_fails,
                    entries: Mutex::new(Vec::new()),
                    log: log.clone(),
                })
            }),
            log,
        }
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl ContractFactory for MockContracts {
    fn caller(&self) -> Option<Address> {
        self.caller
    }

    fn chain_id(&self) -> u64 {
        CHAIN_ID
    }

    async fn native_balance(&self, _owner: Address) -> Result<U256> {
        Ok(U256::from(3u8) * U256::from(10u64).pow(U256::from(17u8)))
    }

    fn token(&self, address: Address) -> Arc<dyn TokenContract> {
        match self.tokens.get(&address) {
            Some(token) => token.clone(),
            None => Arc::new(MockToken::missing(address, self.log.clone())),
        }
    }

    fn pool(&self, _address: Address) -> Arc<dyn PoolContract> {
        self.pool.clone()
    }

    fn factory(&self) -> Arc<dyn FactoryContract> {
        self.factory.clone()
    }

    fn position_manager(&self) -> Arc<dyn PositionManagerContract> {
        self.position_manager.clone()
    }

    fn native_token(&self) -> Result<Arc<dyn NativeTokenContract>> {
        Ok(self.native.clone())
    }

    fn token_sale(&self) -> Result<Arc<dyn TokenSaleContract>> {
        Ok(self.sale.clone())
    }

    fn liquidity_registry(&self) -> Result<Arc<dyn LiquidityRegistryContract>> {
        match &self.registry {
            Some(registry) => Ok(registry.clone()),
            None => Err(AppError::InvalidDescriptor {
                name: "liquidity registry".to_string(),
                reason: "no address configured".to_string(),
            }),
        }
    }
}

/// Server wired to in-memory contracts and history.
pub fn mock_server(contracts: Arc<MockContracts>) -> LiquidityDappServer {
    let session = Session { reader: contracts.clone(), writer: contracts };
    LiquidityDappServer::with_session(
        Config::with_rpc_url("http://127.0.0.1:8545"),
        session,
        Arc::new(liquidity_dapp::services::MemoryHistory::new()),
    )
}

// ============================================================================
// Network
// ============================================================================

/// Helper to create a test server from environment variables.
pub fn create_test_server() -> Option<LiquidityDappServer> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Check if required environment variables are set
    let rpc_url = std::env::var("ETHEREUM_RPC_URL").ok()?;
    let private_key = std::env::var("ETHEREUM_PRIVATE_KEY").ok()?;

    if rpc_url.is_empty() || private_key.is_empty() {
        return None;
    }

    let mut config = Config::with_rpc_url(rpc_url);
    config.private_key = Some(private_key);
    config.log_level = "warn".to_string();
    config.pool_history_path =
        std::env::temp_dir().join(format!("pool-history-it-{}.json", std::process::id()));

    Some(LiquidityDappServer::new(config))
}

/// Skip test if server cannot be created (missing env vars).
#[macro_export]
macro_rules! skip_if_no_server {
    () => {
        match common::create_test_server() {
            Some(server) => server,
            None => {
                eprintln!("Skipping test: ETHEREUM_RPC_URL or ETHEREUM_PRIVATE_KEY not set");
                return;
            }
        }
    };
}
