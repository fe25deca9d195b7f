//! Repository for account data

use async_trait::async_trait;
use common::error::{Error, Result};
use common::model::account::{Account, AccountId};
use dashmap::DashMap;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use tracing::{debug, info};

/// Account repository trait defining the interface for account data storage
///
/// Callers only ever distinguish `AccountNotFound` from other failures;
/// everything else passes through untouched.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Get an account by ID, failing with `AccountNotFound` when missing
    async fn get_by_id(&self, id: AccountId) -> Result<Account>;

    /// Create a new account, failing with `AccountAlreadyExists` on an id collision
    async fn create(&self, account: Account) -> Result<Account>;

    /// Update an existing account, failing with `AccountNotFound` when missing
    async fn update(&self, account: Account) -> Result<Account>;
}

/// In-memory repository for account data
pub struct InMemoryAccountRepository {
    /// Accounts by ID
    accounts: DashMap<AccountId, Account>,
}

impl InMemoryAccountRepository {
    /// Create a new in-memory account repository
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn get_by_id(&self, id: AccountId) -> Result<Account> {
        self.accounts
            .get(&id)
            .map(|a| *a)
            .ok_or_else(|| Error::AccountNotFound(format!("Account not found: {}", id)))
    }

    async fn create(&self, account: Account) -> Result<Account> {
        match self.accounts.entry(account.id) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(Error::AccountAlreadyExists(
                format!("Account already exists: {}", account.id),
            )),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(account);
                Ok(account)
            }
        }
    }

    async fn update(&self, account: Account) -> Result<Account> {
        match self.accounts.get_mut(&account.id) {
            Some(mut existing) => {
                existing.balance = account.balance;
                Ok(account)
            }
            None => Err(Error::AccountNotFound(format!(
                "Account not found: {}",
                account.id
            ))),
        }
    }
}

/// PostgreSQL repository for account data
///
/// Persisted layout is a single `accounts(id INT PRIMARY KEY, balance BIGINT)`
/// row per account.
pub struct PostgresAccountRepository {
    /// Database connection pool
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// Create a new PostgreSQL account repository
    pub async fn new(database_url: Option<String>) -> Result<Self> {
        let database_url = match database_url {
            Some(url) => url,
            None => std::env::var("DATABASE_URL")
                .map_err(|_| Error::ConfigurationError("DATABASE_URL must be set".to_string()))?,
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .map_err(Error::Database)?;

        info!("Connected to PostgreSQL database");

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL account repository with configuration
    pub async fn with_config(config: &crate::config::BalanceServiceConfig) -> Result<Self> {
        info!(
            "Connecting to PostgreSQL database with pool size: {}",
            config.db_pool_size
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.db_pool_size)
            .connect(&config.database_url)
            .await
            .map_err(Error::Database)?;

        info!("Connected to PostgreSQL database");

        Ok(Self { pool })
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn get_by_id(&self, id: AccountId) -> Result<Account> {
        debug!("Getting account from database: {}", id);

        let row = sqlx::query("SELECT id, balance FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Account {
                id: row.get("id"),
                balance: row.get("balance"),
            }),
            None => Err(Error::AccountNotFound(format!("Account not found: {}", id))),
        }
    }

    async fn create(&self, account: Account) -> Result<Account> {
        debug!("Creating account in database: {}", account.id);

        sqlx::query("INSERT INTO accounts (id, balance) VALUES ($1, $2)")
            .bind(account.id)
            .bind(account.balance)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    Error::AccountAlreadyExists(format!("Account already exists: {}", account.id))
                }
                _ => Error::Database(e),
            })?;

        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account> {
        debug!("Updating account in database: {}", account.id);

        let result = sqlx::query("UPDATE accounts SET balance = $2 WHERE id = $1")
            .bind(account.id)
            .bind(account.balance)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::AccountNotFound(format!(
                "Account not found: {}",
                account.id
            )));
        }

        Ok(account)
    }
}
