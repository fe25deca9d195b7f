use std::time::Duration;

use stats_service::StatsService;
use tokio::sync::watch;
use tokio::time::sleep;

#[tokio::test]
async fn test_counters_and_reset() {
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let stats = StatsService::spawn(Duration::from_secs(60), shutdown_rx);

    for _ in 0..5 {
        stats.inc_reads();
    }
    for _ in 0..3 {
        stats.inc_writes();
    }

    assert_eq!(stats.total_reads(), 5);
    assert_eq!(stats.total_writes(), 3);

    stats.reset();

    assert_eq!(stats.total_reads(), 0);
    assert_eq!(stats.total_writes(), 0);
}

#[tokio::test]
async fn test_concurrent_increments() {
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let stats = StatsService::spawn(Duration::from_secs(60), shutdown_rx);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let stats = stats.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..1000 {
                stats.inc_reads();
                stats.inc_writes();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(stats.total_reads(), 8000);
    assert_eq!(stats.total_writes(), 8000);
}

#[tokio::test(start_paused = true)]
async fn test_rates_computed_per_interval() {
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let stats = StatsService::spawn(Duration::from_secs(2), shutdown_rx);

    // Let the sampler capture its zero baselines before counting
    sleep(Duration::from_millis(10)).await;

    for _ in 0..10 {
        stats.inc_reads();
    }
    for _ in 0..4 {
        stats.inc_writes();
    }

    // Wake just after the first tick
    sleep(Duration::from_millis(2040)).await;

    // Integer division over the 2-second interval
    assert_eq!(stats.reads_per_second(), 5);
    assert_eq!(stats.writes_per_second(), 2);
    assert_eq!(stats.total_reads(), 10);
    assert_eq!(stats.total_writes(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_reset_mid_interval_keeps_previous_rates() {
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let stats = StatsService::spawn(Duration::from_secs(1), shutdown_rx);

    sleep(Duration::from_millis(10)).await;

    for _ in 0..6 {
        stats.inc_reads();
    }
    sleep(Duration::from_millis(1040)).await;
    assert_eq!(stats.reads_per_second(), 6);

    // Resetting drives the next interval's delta negative: that tick must
    // skip its computation and leave the previous rates in place
    stats.inc_reads();
    stats.reset();
    sleep(Duration::from_millis(1040)).await;

    assert_eq!(stats.reads_per_second(), 6);
    assert_eq!(stats.total_reads(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_sampler() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let stats = StatsService::spawn(Duration::from_secs(1), shutdown_rx);

    sleep(Duration::from_millis(10)).await;
    shutdown_tx.send(true).unwrap();
    sleep(Duration::from_millis(10)).await;

    // The sampler is gone: increments never turn into rates
    for _ in 0..5 {
        stats.inc_reads();
    }
    sleep(Duration::from_secs(3)).await;

    assert_eq!(stats.reads_per_second(), 0);
    assert_eq!(stats.total_reads(), 5);
}
