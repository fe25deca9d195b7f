//! Balance service implementation

use std::sync::Arc;

use common::error::{Error, Result};
use common::model::account::{Account, AccountId, Amount};
use lru_cache::LruCache;
use tokio::sync::RwLock;
use tracing::debug;

use crate::repository::{AccountRepository, InMemoryAccountRepository, PostgresAccountRepository};

/// Balance service enforcing the non-negative balance invariant across a
/// backing repository and a bounded read cache
///
/// Reads take the shared side of the gate and may run concurrently with
/// each other; writes take the exclusive side, making the get-then-update
/// sequence atomic against every other call on this instance. Writes
/// therefore serialize globally: correctness over parallel write
/// throughput. Sharding the gate per id range would lift that limit but is
/// not done here.
pub struct BalanceService {
    /// Reader/writer gate over every repository-plus-cache operation
    gate: RwLock<()>,
    /// Repository for account data
    repo: Arc<dyn AccountRepository>,
    /// Recently written or read balances keyed by account id
    cache: Arc<LruCache<AccountId, Amount>>,
}

/// Repository Type
pub enum RepositoryType {
    /// In-memory repository
    InMemory,
    /// PostgreSQL repository
    Postgres(Option<String>),
}

impl BalanceService {
    /// Create a new balance service over an in-memory repository
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            gate: RwLock::new(()),
            repo: Arc::new(InMemoryAccountRepository::new()),
            cache: Arc::new(LruCache::new(cache_capacity)),
        }
    }

    /// Create a new balance service over an explicit repository instance
    pub fn with_repo(repo: Arc<dyn AccountRepository>, cache_capacity: usize) -> Self {
        Self {
            gate: RwLock::new(()),
            repo,
            cache: Arc::new(LruCache::new(cache_capacity)),
        }
    }

    /// Create a new balance service with a specific repository type
    pub async fn with_repository(
        repo_type: RepositoryType,
        cache_capacity: usize,
    ) -> Result<Self> {
        let repo: Arc<dyn AccountRepository> = match repo_type {
            RepositoryType::InMemory => Arc::new(InMemoryAccountRepository::new()),
            RepositoryType::Postgres(database_url) => {
                Arc::new(PostgresAccountRepository::new(database_url).await?)
            }
        };

        Ok(Self {
            gate: RwLock::new(()),
            repo,
            cache: Arc::new(LruCache::new(cache_capacity)),
        })
    }

    /// Create a new balance service with a configuration
    pub async fn with_config(config: &crate::config::BalanceServiceConfig) -> Result<Self> {
        let repo: Arc<dyn AccountRepository> =
            Arc::new(PostgresAccountRepository::with_config(config).await?);

        Ok(Self {
            gate: RwLock::new(()),
            repo,
            cache: Arc::new(LruCache::new(config.cache_capacity)),
        })
    }

    /// Get the balance of an account
    ///
    /// Served from the cache when possible. An account the repository does
    /// not know reads as zero; the miss is not cached, so repeated reads of
    /// a never-created id keep hitting the repository. Repository failures
    /// other than "not found" propagate verbatim.
    pub async fn get_amount(&self, id: AccountId) -> Result<Amount> {
        let _guard = self.gate.read().await;

        if let Some(balance) = self.cache.get(&id) {
            debug!("Cache hit for account {}", id);
            return Ok(balance);
        }

        match self.repo.get_by_id(id).await {
            Ok(account) => Ok(account.balance),
            Err(e) if e.is_not_found() => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Apply a signed amount to an account: positive deposits, negative
    /// withdraws
    ///
    /// The repository, never the cache, supplies the current balance, so a
    /// stale cache entry cannot leak into the computation. A withdrawal
    /// that would leave the balance negative fails with
    /// `InsufficientBalance` and mutates nothing. When the account does not
    /// exist it is created with the amount as its opening balance, provided
    /// the amount is strictly positive; otherwise `InvalidCreation`.
    pub async fn add_amount(&self, id: AccountId, amount: Amount) -> Result<()> {
        let _guard = self.gate.write().await;

        match self.repo.get_by_id(id).await {
            Ok(account) => {
                let new_balance = account.balance.checked_add(amount).ok_or_else(|| {
                    Error::Internal(format!("Balance overflow for account {}", id))
                })?;

                if new_balance < 0 {
                    return Err(Error::InsufficientBalance(format!(
                        "The balance of account {} is less than the withdrawal amount",
                        id
                    )));
                }

                self.update(Account::new(id, new_balance)).await
            }
            Err(e) if e.is_not_found() => {
                if amount <= 0 {
                    return Err(Error::InvalidCreation(format!(
                        "Cannot create account {} with a negative or zero balance",
                        id
                    )));
                }

                self.create(Account::new(id, amount)).await
            }
            Err(e) => Err(e),
        }
    }

    async fn update(&self, account: Account) -> Result<()> {
        self.repo.update(account).await?;
        self.cache.put(account.id, account.balance);

        Ok(())
    }

    async fn create(&self, account: Account) -> Result<()> {
        self.repo.create(account).await?;
        self.cache.put(account.id, account.balance);

        Ok(())
    }
}
