//! Ethereum network constants.
//!
//! Contains protocol addresses, deployed contract defaults and
//! the fixed policies applied to outgoing transactions.

use alloy::primitives::{address, Address, U256};
use rust_decimal::Decimal;

// ============================================================================
// Core Token Addresses (Ethereum Mainnet)
// ============================================================================

/// Wrapped Ether (WETH) address on Ethereum Mainnet.
pub const WETH_ADDRESS: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

/// USDC address on Ethereum Mainnet.
pub const USDC_ADDRESS: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

// ============================================================================
// Uniswap V3 Addresses (same on Mainnet and most testnets)
// ============================================================================

/// Uniswap V3 Factory address.
pub const UNISWAP_V3_FACTORY: Address = address!("1F98431c8aD98523631AE4a59f267346ea31F984");

/// Uniswap V3 NonfungiblePositionManager address.
pub const UNISWAP_V3_POSITION_MANAGER: Address =
    address!("C36442b4a4522E871399CD717aBDD847Ab11FE88");

// ============================================================================
// Deployed DApp Contracts
// ============================================================================

/// Native token contract as deployed by the project's deploy script.
pub const DEFAULT_NATIVE_TOKEN_ADDRESS: &str = "0x52Bc319BE61b92006c979B4dAd75337dc00aDF7F";

/// Token sale contract as deployed by the project's deploy script.
pub const DEFAULT_TOKEN_SALE_ADDRESS: &str = "0x117B8d82b60e3e646F80EFA7816e46471e54b799";

// ============================================================================
// Transaction Policies
// ============================================================================

/// Gas limit attached to mint and token purchase transactions.
pub const FIXED_GAS_LIMIT: u64 = 1_000_000;

/// Seconds added to the submission time to form the mint deadline.
pub const MINT_DEADLINE_SECS: u64 = 600;

/// Token sale unit price in wei (0.0001 ether).
pub const TOKEN_SALE_UNIT_PRICE_WEI: U256 = U256::from_limbs([100_000_000_000_000, 0, 0, 0]);

/// Whole native tokens moved by the fixed allocation transfer.
pub const FIXED_ALLOCATION_TOKENS: u64 = 2000;

/// Decimals used for liquidity and approval amounts entered by the user.
pub const USER_AMOUNT_DECIMALS: u8 = 18;

/// Default slippage tolerance for mint minimums (0.5%).
pub const DEFAULT_SLIPPAGE_PERCENT: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Upper bound accepted for slippage tolerance, in percent.
pub const MAX_SLIPPAGE_PERCENT: u32 = 50;

/// Default file for the pool lookup history.
pub const DEFAULT_POOL_HISTORY_FILE: &str = "poolHistory.json";
