//! Deployed contract addresses.
//!
//! Owned contracts are configured as address strings and validated only when
//! bound. Uniswap V3 protocol addresses are fixed.

use alloy::primitives::Address;

use crate::config::Config;
use crate::ethereum::constants::{UNISWAP_V3_FACTORY, UNISWAP_V3_POSITION_MANAGER};

/// Logical contract name plus its configured address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractDescriptor {
    pub name: &'static str,
    /// Raw address as configured. `None` when the deployment is unknown.
    pub address: Option<String>,
}

impl ContractDescriptor {
    pub fn new(name: &'static str, address: Option<String>) -> Self {
        Self { name, address }
    }
}

/// Addresses of every contract the DApp talks to.
#[derive(Debug, Clone)]
pub struct ContractRegistry {
    pub native_token: ContractDescriptor,
    pub token_sale: ContractDescriptor,
    pub liquidity_registry: ContractDescriptor,
    pub uniswap_factory: Address,
    pub position_manager: Address,
}

impl ContractRegistry {
    pub fn from_config(config: &Config) -> Self {
        Self {
            native_token: ContractDescriptor::new(
                "native token",
                Some(config.native_token_address.clone()),
            ),
            token_sale: ContractDescriptor::new(
                "token sale",
                Some(config.token_sale_address.clone()),
            ),
            liquidity_registry: ContractDescriptor::new(
                "liquidity registry",
                config.liquidity_registry_address.clone(),
            ),
            uniswap_factory: UNISWAP_V3_FACTORY,
            position_manager: UNISWAP_V3_POSITION_MANAGER,
        }
    }
}
