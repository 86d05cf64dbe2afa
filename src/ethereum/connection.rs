//! Wallet connection.
//!
//! Pairs a read-only node client with a signing provider for the configured
//! wallet. Acquiring a connection is the only step that checks the node is
//! reachable and serving the expected chain.

use alloy::providers::{Provider, ProviderBuilder};

use super::{
    binding::{ContractBinder, ProviderHandle},
    client::{DappProvider, EthereumClient},
    registry::ContractRegistry,
    wallet::WalletManager,
};
use crate::{
    config::Config,
    error::{AppError, Result},
};
use alloy::primitives::Address;

/// An established wallet session.
#[derive(Clone)]
pub struct Connection {
    client: EthereumClient,
    signer: DappProvider,
    wallet: WalletManager,
    chain_id: u64,
    registry: ContractRegistry,
}

impl Connection {
    /// Connected account.
    pub fn account(&self) -> Address {
        self.wallet.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Read-only node client.
    pub fn client(&self) -> &EthereumClient {
        &self.client
    }

    /// Binder over the read handle. Its role objects cannot sign.
    pub fn reader(&self) -> ContractBinder {
        ContractBinder::new(
            ProviderHandle::Read(self.client.provider().clone()),
            self.chain_id,
            self.registry.clone(),
        )
    }

    /// Binder over the signing handle.
    pub fn writer(&self) -> ContractBinder {
        ContractBinder::new(
            ProviderHandle::Write { provider: self.signer.clone(), account: self.account() },
            self.chain_id,
            self.registry.clone(),
        )
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("account", &self.account())
            .field("chain_id", &self.chain_id)
            .field("rpc_url", &self.client.rpc_url())
            .finish()
    }
}

/// Open a wallet session against the configured node.
///
/// Fails with [`AppError::WalletUnavailable`] when no signing key is configured
/// and [`AppError::ConnectionRejected`] when the node cannot report its chain or
/// serves a chain other than the expected one. Nothing is retried.
pub async fn acquire_connection(config: &Config) -> Result<Connection> {
    let wallet = WalletManager::from_optional_key(config.private_key.as_deref())?;
    let client = EthereumClient::new(&config.rpc_url)?;

    let chain_id = client.chain_id().await.map_err(|e| {
        tracing::warn!(rpc_url = %config.rpc_url, error = %e, "Node did not report a chain id");
        AppError::ConnectionRejected(format!("node at {} is unreachable: {e}", config.rpc_url))
    })?;

    if let Some(expected) = config.expected_chain_id {
        if expected != chain_id {
            tracing::warn!(expected, actual = chain_id, "Connected to unexpected chain");
            return Err(AppError::ConnectionRejected(format!(
                "expected chain {expected}, node serves chain {chain_id}"
            )));
        }
    }

    let url = config
        .rpc_url
        .parse()
        .map_err(|_| AppError::Config(format!("Invalid RPC URL: {}", config.rpc_url)))?;
    let signer = ProviderBuilder::new().wallet(wallet.ethereum_wallet()).connect_http(url).erased();

    tracing::info!(account = %wallet.address(), chain_id, "Wallet connected");

    Ok(Connection {
        client,
        signer,
        wallet,
        chain_id,
        registry: ContractRegistry::from_config(config),
    })
}
