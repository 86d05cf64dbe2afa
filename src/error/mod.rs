//! Error types and handling module.
//!
//! Defines all application-specific error types and conversions.

use alloy::primitives::TxHash;
use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No signing wallet is available for this session.
    #[error("Wallet unavailable: configure ETHEREUM_PRIVATE_KEY to sign transactions")]
    WalletUnavailable,

    /// The node refused the session (unreachable or wrong network).
    #[error("Connection rejected: {0}")]
    ConnectionRejected(String),

    /// Ethereum RPC errors.
    #[error("Ethereum RPC error: {0}")]
    Rpc(String),

    /// Transport errors.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid Ethereum address supplied by the user.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A contract descriptor cannot be bound (malformed or missing address).
    #[error("Invalid contract descriptor for {name}: {reason}")]
    InvalidDescriptor { name: String, reason: String },

    /// A read call reverted or the target does not implement the interface.
    #[error("Contract call failed: {0}")]
    ContractCallFailed(String),

    /// A transaction was rejected on submission or mined with a failed status.
    #[error("Transaction reverted{}: {reason}", hash_suffix(.hash))]
    TransactionReverted { hash: Option<TxHash>, reason: String },

    /// The mint succeeded but recording it in the liquidity registry did not.
    #[error("Liquidity minted in {mint_tx} but registry write failed: {reason}")]
    RegistryWriteFailed { mint_tx: TxHash, reason: String },

    /// A computed tick range falls outside the protocol bounds.
    #[error("Tick out of range: {0}")]
    TickOutOfRange(i32),

    /// Wallet-related errors.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Numeric overflow during conversion.
    #[error("Numeric overflow: {0}")]
    NumericOverflow(String),

    /// Pending transaction error.
    #[error("Pending transaction error: {0}")]
    PendingTransaction(String),

    /// Pool history storage errors.
    #[error("Storage error: {0}")]
    Storage(String),
}

fn hash_suffix(hash: &Option<TxHash>) -> String {
    hash.as_ref().map(|h| format!(" ({h})")).unwrap_or_default()
}

impl AppError {
    /// Classify a failed submission: reverts keep their reason verbatim.
    pub fn from_submission(err: alloy::contract::Error) -> Self {
        let reason = err.to_string();
        if reason.contains("revert") {
            AppError::TransactionReverted { hash: None, reason }
        } else {
            AppError::Rpc(reason)
        }
    }
}

impl From<alloy::transports::TransportError> for AppError {
    fn from(err: alloy::transports::TransportError) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<alloy::contract::Error> for AppError {
    fn from(err: alloy::contract::Error) -> Self {
        AppError::ContractCallFailed(err.to_string())
    }
}

impl From<alloy::providers::PendingTransactionError> for AppError {
    fn from(err: alloy::providers::PendingTransactionError) -> Self {
        AppError::PendingTransaction(err.to_string())
    }
}

impl From<alloy::signers::local::LocalSignerError> for AppError {
    fn from(err: alloy::signers::local::LocalSignerError) -> Self {
        AppError::Wallet(err.to_string())
    }
}

impl From<alloy::hex::FromHexError> for AppError {
    fn from(err: alloy::hex::FromHexError) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<AppError> for McpError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InvalidAddress(_)
            | AppError::Parse(_)
            | AppError::NumericOverflow(_)
            | AppError::TickOutOfRange(_) => McpError::invalid_params(err.to_string(), None),
            AppError::Config(_)
            | AppError::WalletUnavailable
            | AppError::ConnectionRejected(_)
            | AppError::InvalidDescriptor { .. } => {
                McpError::invalid_request(err.to_string(), None)
            }
            _ => McpError::internal_error(err.to_string(), None),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
