//! MCP server module.
//!
//! Contains the MCP server implementation with tool handlers.

pub mod server;

pub use server::{LiquidityDappServer, Session};
pub use server::{
    BuyTokensInput, CreateLiquidityInput, DappStateView, GetPoolAddressInput, LoadTokenInput,
};
