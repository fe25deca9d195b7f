//! Balance service for managing account balances behind an LRU read cache

pub mod service;
pub mod repository;
pub mod config;

pub use service::BalanceService;
pub use service::RepositoryType;
pub use repository::{AccountRepository, InMemoryAccountRepository, PostgresAccountRepository};
pub use config::BalanceServiceConfig;
