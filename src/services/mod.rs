//! Business logic services module.

pub mod dashboard;
pub mod history;
pub mod liquidity;
pub mod pool;
pub mod sale;
pub mod token;

pub use dashboard::{DashboardService, DashboardSnapshot};
pub use history::{JsonFileHistory, MemoryHistory, PoolHistoryStore};
pub use liquidity::LiquidityOrchestrator;
pub use pool::{read_pool_state, PoolLookupService};
pub use sale::{sale_payment, SaleService};
pub use token::TokenQueryService;
