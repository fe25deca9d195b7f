//! PostgreSQL repository tests
//!
//! These need a running PostgreSQL instance with the `accounts` table:
//!
//! ```sql
//! CREATE TABLE accounts (id INT PRIMARY KEY, balance BIGINT NOT NULL);
//! ```
//!
//! Run them with `cargo test -- --ignored` and DATABASE_URL set.

use balance_service::{AccountRepository, PostgresAccountRepository};
use common::error::Error;
use common::model::account::Account;

async fn connect() -> PostgresAccountRepository {
    PostgresAccountRepository::new(None)
        .await
        .expect("DATABASE_URL must point at a reachable PostgreSQL instance")
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_postgres_roundtrip() {
    let repo = connect().await;
    let id = 900_001;

    repo.create(Account::new(id, 300)).await.unwrap();
    assert_eq!(repo.get_by_id(id).await.unwrap().balance, 300);

    repo.update(Account::new(id, 150)).await.unwrap();
    assert_eq!(repo.get_by_id(id).await.unwrap().balance, 150);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_postgres_duplicate_create() {
    let repo = connect().await;
    let id = 900_002;

    repo.create(Account::new(id, 10)).await.unwrap();
    let result = repo.create(Account::new(id, 20)).await;

    assert!(matches!(result, Err(Error::AccountAlreadyExists(_))));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_postgres_update_missing_row() {
    let repo = connect().await;

    let result = repo.update(Account::new(900_003, 10)).await;
    assert!(matches!(result, Err(Error::AccountNotFound(_))));
}
