//! Ethereum RPC client.

use alloy::{
    network::{Ethereum, ReceiptResponse},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::error::{AppError, Result};
use crate::types::TransactionOutcome;

/// Type-erased provider shared by every contract binding.
pub type DappProvider = DynProvider<Ethereum>;

/// Read-only Ethereum RPC client with lazy chain ID lookup.
#[derive(Clone)]
pub struct EthereumClient {
    /// The underlying provider.
    provider: DappProvider,
    /// RPC URL for logging.
    rpc_url: String,
    /// Lazily initialized chain ID.
    chain_id: Arc<OnceCell<u64>>,
}

impl EthereumClient {
    /// Create a new Ethereum client.
    ///
    /// Note: This does NOT make any network calls. The connection is
    /// established lazily when the first operation is performed.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url = rpc_url
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid RPC URL: {}", rpc_url)))?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        tracing::info!(rpc_url = %rpc_url, "Ethereum client created (lazy initialization)");

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
            chain_id: Arc::new(OnceCell::new()),
        })
    }

    /// Get the chain ID (fetches from network on first call).
    pub async fn chain_id(&self) -> Result<u64> {
        self.chain_id
            .get_or_try_init(|| async {
                let chain_id = self.provider.get_chain_id().await?;
                tracing::info!(
                    chain_id = chain_id,
                    rpc_url = %self.rpc_url,
                    "Connected to Ethereum node"
                );
                Ok(chain_id)
            })
            .await
            .copied()
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &DappProvider {
        &self.provider
    }

    /// RPC URL this client talks to.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

/// Wait for a submitted transaction to be mined and summarize its receipt.
pub async fn mined(pending: PendingTransactionBuilder<Ethereum>) -> Result<TransactionOutcome> {
    let hash = *pending.tx_hash();
    tracing::debug!(tx = %hash, "Waiting for transaction receipt");

    let receipt = pending.get_receipt().await?;
    let outcome = TransactionOutcome {
        hash,
        succeeded: receipt.status(),
        block_number: receipt.block_number(),
    };

    tracing::info!(
        tx = %hash,
        succeeded = outcome.succeeded,
        block = ?outcome.block_number,
        "Transaction mined"
    );
    Ok(outcome)
}
