//! Contract binding factory.
//!
//! Turns registry descriptors plus a provider handle into role objects. Binding
//! is pure construction; nothing here touches the network.

use std::sync::Arc;

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
};
use async_trait::async_trait;

use super::{
    client::DappProvider,
    contracts::{
        erc20::Erc20Binding,
        liquidity_registry::LiquidityRegistryBinding,
        native_token::NativeTokenBinding,
        token_sale::TokenSaleBinding,
        uniswap_v3::{FactoryBinding, PoolBinding, PositionManagerBinding},
        ContractFactory, FactoryContract, LiquidityRegistryContract, NativeTokenContract,
        PoolContract, PositionManagerContract, TokenContract, TokenSaleContract,
    },
    registry::{ContractDescriptor, ContractRegistry},
};
use crate::error::{AppError, Result};

/// Parse and validate an Ethereum address from user input.
///
/// Requires the `0x` prefix followed by exactly 40 hex characters.
pub fn parse_address(s: &str) -> Result<Address> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(AppError::InvalidAddress("Address cannot be empty".into()));
    }

    if !trimmed.starts_with("0x") && !trimmed.starts_with("0X") {
        return Err(AppError::InvalidAddress(format!("Address must start with '0x': {s}")));
    }

    if trimmed.len() != 42 {
        return Err(AppError::InvalidAddress(format!(
            "Address must be 42 characters (0x + 40 hex chars), got {}: {s}",
            trimmed.len()
        )));
    }

    trimmed
        .parse::<Address>()
        .map_err(|e| AppError::InvalidAddress(format!("Invalid address format '{s}': {e}")))
}

/// Resolve a descriptor to a well-formed address.
pub fn bind_address(descriptor: &ContractDescriptor) -> Result<Address> {
    let raw = descriptor.address.as_deref().ok_or_else(|| AppError::InvalidDescriptor {
        name: descriptor.name.to_string(),
        reason: "no address configured".to_string(),
    })?;

    parse_address(raw).map_err(|e| AppError::InvalidDescriptor {
        name: descriptor.name.to_string(),
        reason: e.to_string(),
    })
}

/// Provider a binding talks through.
#[derive(Clone)]
pub enum ProviderHandle {
    /// Plain node access; cannot sign.
    Read(DappProvider),
    /// Provider that fills and signs transactions for `account`.
    Write { provider: DappProvider, account: Address },
}

impl ProviderHandle {
    pub fn provider(&self) -> &DappProvider {
        match self {
            ProviderHandle::Read(provider) => provider,
            ProviderHandle::Write { provider, .. } => provider,
        }
    }

    /// Signing account, present only on a write handle.
    pub fn account(&self) -> Option<Address> {
        match self {
            ProviderHandle::Read(_) => None,
            ProviderHandle::Write { account, .. } => Some(*account),
        }
    }
}

/// Alloy-backed [`ContractFactory`].
#[derive(Clone)]
pub struct ContractBinder {
    handle: ProviderHandle,
    chain_id: u64,
    registry: ContractRegistry,
}

impl ContractBinder {
    pub fn new(handle: ProviderHandle, chain_id: u64, registry: ContractRegistry) -> Self {
        Self { handle, chain_id, registry }
    }

    fn provider(&self) -> DappProvider {
        self.handle.provider().clone()
    }
}

#[async_trait]
impl ContractFactory for ContractBinder {
    fn caller(&self) -> Option<Address> {
        self.handle.account()
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn native_balance(&self, owner: Address) -> Result<U256> {
        let balance = self.handle.provider().get_balance(owner).await?;
        Ok(balance)
    }

    fn token(&self, address: Address) -> Arc<dyn TokenContract> {
        Arc::new(Erc20Binding::new(address, self.provider()))
    }

    fn pool(&self, address: Address) -> Arc<dyn PoolContract> {
        Arc::new(PoolBinding::new(address, self.provider()))
    }

    fn factory(&self) -> Arc<dyn FactoryContract> {
        Arc::new(FactoryBinding::new(self.registry.uniswap_factory, self.provider()))
    }

    fn position_manager(&self) -> Arc<dyn PositionManagerContract> {
        Arc::new(
            PositionManagerBinding::new(self.registry.position_manager, self.provider())
                .with_sender(self.handle.account()),
        )
    }

    fn native_token(&self) -> Result<Arc<dyn NativeTokenContract>> {
        let address = bind_address(&self.registry.native_token)?;
        Ok(Arc::new(NativeTokenBinding::new(address, self.provider())))
    }

    fn token_sale(&self) -> Result<Arc<dyn TokenSaleContract>> {
        let address = bind_address(&self.registry.token_sale)?;
        let sale =
            TokenSaleBinding::new(address, self.provider()).with_sender(self.handle.account());
        Ok(Arc::new(sale))
    }

    fn liquidity_registry(&self) -> Result<Arc<dyn LiquidityRegistryContract>> {
        let address = bind_address(&self.registry.liquidity_registry)?;
        Ok(Arc::new(LiquidityRegistryBinding::new(address, self.provider())))
    }
}
