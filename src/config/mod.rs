//! Configuration management module.
//!
//! Handles loading configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::AppError;
use crate::ethereum::constants::{
    DEFAULT_NATIVE_TOKEN_ADDRESS, DEFAULT_POOL_HISTORY_FILE, DEFAULT_SLIPPAGE_PERCENT,
    DEFAULT_TOKEN_SALE_ADDRESS, MAX_SLIPPAGE_PERCENT,
};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ethereum JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Private key for the signing wallet (hex string, optional).
    pub private_key: Option<String>,
    /// Chain the wallet is expected to be connected to, if pinned.
    pub expected_chain_id: Option<u64>,
    /// Deployed native token contract.
    pub native_token_address: String,
    /// Deployed token sale contract.
    pub token_sale_address: String,
    /// Deployed liquidity registry contract, if any.
    pub liquidity_registry_address: Option<String>,
    /// File holding the pool lookup history.
    pub pool_history_path: PathBuf,
    /// Slippage tolerance for mint minimums, in percent.
    pub slippage_tolerance: Decimal,
    /// Logging level (default: info).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `ETHEREUM_RPC_URL`: Ethereum JSON-RPC endpoint
    ///
    /// Optional environment variables:
    /// - `ETHEREUM_PRIVATE_KEY`: signing key; write operations fail without it
    /// - `EXPECTED_CHAIN_ID`: reject nodes serving another chain
    /// - `NATIVE_TOKEN_ADDRESS`, `TOKEN_SALE_ADDRESS`, `LIQUIDITY_REGISTRY_ADDRESS`
    /// - `POOL_HISTORY_PATH` (default: poolHistory.json)
    /// - `SLIPPAGE_TOLERANCE` in percent (default: 0.5)
    /// - `LOG_LEVEL`: Logging level (default: info)
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let rpc_url = env::var("ETHEREUM_RPC_URL").map_err(|_| {
            AppError::Config("ETHEREUM_RPC_URL environment variable not set".into())
        })?;

        let private_key = non_empty_var("ETHEREUM_PRIVATE_KEY");

        let expected_chain_id = non_empty_var("EXPECTED_CHAIN_ID")
            .map(|v| {
                v.parse::<u64>()
                    .map_err(|e| AppError::Config(format!("Invalid EXPECTED_CHAIN_ID '{v}': {e}")))
            })
            .transpose()?;

        let native_token_address = non_empty_var("NATIVE_TOKEN_ADDRESS")
            .unwrap_or_else(|| DEFAULT_NATIVE_TOKEN_ADDRESS.to_string());
        let token_sale_address = non_empty_var("TOKEN_SALE_ADDRESS")
            .unwrap_or_else(|| DEFAULT_TOKEN_SALE_ADDRESS.to_string());
        let liquidity_registry_address = non_empty_var("LIQUIDITY_REGISTRY_ADDRESS");

        let pool_history_path = non_empty_var("POOL_HISTORY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_POOL_HISTORY_FILE));

        let slippage_tolerance = match non_empty_var("SLIPPAGE_TOLERANCE") {
            Some(raw) => parse_slippage(&raw)?,
            None => DEFAULT_SLIPPAGE_PERCENT,
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            rpc_url,
            private_key,
            expected_chain_id,
            native_token_address,
            token_sale_address,
            liquidity_registry_address,
            pool_history_path,
            slippage_tolerance,
            log_level,
        })
    }

    /// Configuration for a node URL with every optional setting at its default.
    pub fn with_rpc_url(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            private_key: None,
            expected_chain_id: None,
            native_token_address: DEFAULT_NATIVE_TOKEN_ADDRESS.to_string(),
            token_sale_address: DEFAULT_TOKEN_SALE_ADDRESS.to_string(),
            liquidity_registry_address: None,
            pool_history_path: PathBuf::from(DEFAULT_POOL_HISTORY_FILE),
            slippage_tolerance: DEFAULT_SLIPPAGE_PERCENT,
            log_level: "info".to_string(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse a slippage percentage and check it lies within 0-50.
pub fn parse_slippage(raw: &str) -> Result<Decimal, AppError> {
    let value = Decimal::from_str(raw.trim())
        .map_err(|e| AppError::Parse(format!("Invalid slippage tolerance '{raw}': {e}")))?;

    if value < Decimal::ZERO || value > Decimal::from(MAX_SLIPPAGE_PERCENT) {
        return Err(AppError::Parse(format!(
            "Slippage tolerance must be between 0 and {MAX_SLIPPAGE_PERCENT} (percentage), \
             got {value}"
        )));
    }

    Ok(value)
}
