//! Liquidity DApp Library
//!
//! Client for a token, its fixed-price sale, a liquidity registry and the
//! Uniswap V3 pools the token trades in, exposed as a Model Context Protocol
//! server.
//!
//! # Features
//!
//! - **Token Queries**: Read ERC20 metadata and the connected account's balance
//! - **Pool Lookup**: Resolve Uniswap V3 pools and keep a history of found pools
//! - **Liquidity**: Mint a position around the current price and record it in the registry
//! - **Token Sale**: Buy tokens and fund the sale with the native token
//!
//! # Example
//!
//! ```rust,ignore
//! use liquidity_dapp::{Config, LiquidityDappServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let server = LiquidityDappServer::new(config);
//!     // Run server...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ethereum;
pub mod math;
pub mod mcp;
pub mod services;
pub mod state;
pub mod types;

pub use config::Config;
pub use error::{AppError, Result};
pub use ethereum::constants::*;
pub use mcp::LiquidityDappServer;
