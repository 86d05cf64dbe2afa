//! Type definitions module.
//!
//! Contains shared types used across the application.

pub mod liquidity;
pub mod pool;
pub mod token;

pub use liquidity::*;
pub use pool::*;
pub use token::*;
