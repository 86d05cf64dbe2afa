//! Ethereum interaction module.
//!
//! Contains the node client, the wallet session, the contract address
//! registry and the role-typed contract bindings.

pub mod binding;
pub mod client;
pub mod connection;
pub mod constants;
pub mod contracts;
pub mod registry;
pub mod wallet;

pub use binding::{bind_address, parse_address, ContractBinder, ProviderHandle};
pub use client::{DappProvider, EthereumClient};
pub use connection::{acquire_connection, Connection};
pub use registry::{ContractDescriptor, ContractRegistry};
pub use wallet::WalletManager;
