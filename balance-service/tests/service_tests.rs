use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use balance_service::{AccountRepository, BalanceService, InMemoryAccountRepository};
use common::error::{Error, Result};
use common::model::account::{Account, AccountId};

/// Repository wrapper counting calls, for asserting cache behavior
struct CountingRepo {
    inner: InMemoryAccountRepository,
    gets: AtomicUsize,
}

impl CountingRepo {
    fn new() -> Self {
        Self {
            inner: InMemoryAccountRepository::new(),
            gets: AtomicUsize::new(0),
        }
    }

    fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountRepository for CountingRepo {
    async fn get_by_id(&self, id: AccountId) -> Result<Account> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_id(id).await
    }

    async fn create(&self, account: Account) -> Result<Account> {
        self.inner.create(account).await
    }

    async fn update(&self, account: Account) -> Result<Account> {
        self.inner.update(account).await
    }
}

/// Repository that fails every operation, for error propagation tests
struct FailingRepo;

#[async_trait]
impl AccountRepository for FailingRepo {
    async fn get_by_id(&self, _id: AccountId) -> Result<Account> {
        Err(Error::Internal("storage offline".to_string()))
    }

    async fn create(&self, _account: Account) -> Result<Account> {
        Err(Error::Internal("storage offline".to_string()))
    }

    async fn update(&self, _account: Account) -> Result<Account> {
        Err(Error::Internal("storage offline".to_string()))
    }
}

#[tokio::test]
async fn test_read_unknown_account_returns_zero() {
    let service = BalanceService::new(10);

    assert_eq!(service.get_amount(42).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_account_and_read_back() {
    let service = BalanceService::new(10);

    service.add_amount(1, 300).await.unwrap();

    assert_eq!(service.get_amount(1).await.unwrap(), 300);
}

#[tokio::test]
async fn test_create_with_non_positive_amount_fails() {
    let service = BalanceService::new(10);

    for amount in [-5, 0] {
        let result = service.add_amount(7, amount).await;
        match result {
            Err(Error::InvalidCreation(_)) => (),
            other => panic!("Expected InvalidCreation, got {:?}", other),
        }
    }

    // Nothing was created
    assert_eq!(service.get_amount(7).await.unwrap(), 0);
}

#[tokio::test]
async fn test_deposit_and_withdraw_sequence() {
    let service = BalanceService::new(10);

    service.add_amount(7, 5).await.unwrap();
    assert_eq!(service.get_amount(7).await.unwrap(), 5);

    // Withdraw the entire amount
    service.add_amount(7, -5).await.unwrap();
    assert_eq!(service.get_amount(7).await.unwrap(), 0);

    // Any further withdrawal overdraws
    let result = service.add_amount(7, -1).await;
    match result {
        Err(Error::InsufficientBalance(_)) => (),
        other => panic!("Expected InsufficientBalance, got {:?}", other),
    }
    assert_eq!(service.get_amount(7).await.unwrap(), 0);
}

#[tokio::test]
async fn test_overdraft_leaves_balance_untouched() {
    let service = BalanceService::new(10);

    service.add_amount(1, 300).await.unwrap();

    let result = service.add_amount(1, -400).await;
    assert!(matches!(result, Err(Error::InsufficientBalance(_))));
    assert_eq!(service.get_amount(1).await.unwrap(), 300);
}

#[tokio::test]
async fn test_read_after_write_served_from_cache() {
    let repo = Arc::new(CountingRepo::new());
    let service = BalanceService::with_repo(repo.clone(), 10);

    service.add_amount(1, 100).await.unwrap();
    let gets_after_write = repo.get_calls();

    // The write populated the cache, so reads skip the repository
    for _ in 0..5 {
        assert_eq!(service.get_amount(1).await.unwrap(), 100);
    }
    assert_eq!(repo.get_calls(), gets_after_write);
}

#[tokio::test]
async fn test_unknown_account_reads_are_not_cached() {
    let repo = Arc::new(CountingRepo::new());
    let service = BalanceService::with_repo(repo.clone(), 10);

    // Absence reads as zero but must not populate the cache
    for _ in 0..3 {
        assert_eq!(service.get_amount(99).await.unwrap(), 0);
    }
    assert_eq!(repo.get_calls(), 3);
}

#[tokio::test]
async fn test_repository_failure_propagates() {
    let service = BalanceService::with_repo(Arc::new(FailingRepo), 10);

    assert!(matches!(
        service.get_amount(1).await,
        Err(Error::Internal(_))
    ));
    assert!(matches!(
        service.add_amount(1, 10).await,
        Err(Error::Internal(_))
    ));
}

#[tokio::test]
async fn test_concurrent_writes_do_not_lose_updates() {
    let service = Arc::new(BalanceService::new(10));

    // Seed far enough above zero that no serialization order overdraws
    service.add_amount(1, 1_000).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            for _ in 0..25 {
                service.add_amount(1, 3).await.unwrap();
                service.add_amount(1, -2).await.unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // 8 tasks * 25 iterations * (+3 - 2) = +200
    assert_eq!(service.get_amount(1).await.unwrap(), 1_200);
}

#[tokio::test]
async fn test_concurrent_reads_and_writes() {
    let service = Arc::new(BalanceService::new(4));

    for id in 1..=8 {
        service.add_amount(id, 100).await.unwrap();
    }

    let mut handles = Vec::new();
    for id in 1..=8 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            for _ in 0..20 {
                service.add_amount(id, 1).await.unwrap();
                let balance = service.get_amount(id).await.unwrap();
                assert!(balance >= 100);
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    for id in 1..=8 {
        assert_eq!(service.get_amount(id).await.unwrap(), 120);
    }
}
