//! Local signing wallet.
//!
//! Stands in for an injected browser wallet: the signing key comes from
//! configuration instead of an extension prompt.

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    signers::local::{LocalSignerError, PrivateKeySigner},
};

use crate::error::{AppError, Result};

/// Signing account used for every write transaction.
#[derive(Clone)]
pub struct WalletManager {
    signer: PrivateKeySigner,
    address: Address,
}

impl WalletManager {
    /// Create a wallet from a hex private key, with or without `0x`.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let signer: PrivateKeySigner =
            key.parse().map_err(|e: LocalSignerError| AppError::Wallet(e.to_string()))?;
        let address = signer.address();

        tracing::info!(address = %address, "Wallet initialized");

        Ok(Self { signer, address })
    }

    /// Create a wallet from an optional configured key.
    ///
    /// A missing key means no wallet is available to sign with.
    pub fn from_optional_key(private_key: Option<&str>) -> Result<Self> {
        match private_key {
            Some(key) => Self::from_private_key(key),
            None => Err(AppError::WalletUnavailable),
        }
    }

    /// Account address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Network wallet for filling and signing transactions.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl std::fmt::Debug for WalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletManager").field("address", &self.address).finish()
    }
}
