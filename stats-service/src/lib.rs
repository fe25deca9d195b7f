//! Operation statistics for the balance engine
//!
//! Tracks cumulative read/write operation counts and derives per-second
//! rates over a fixed polling interval. Counters are plain atomics, so the
//! increment methods may be called from any number of concurrent request
//! handlers without blocking. One background task owns the sampling timer
//! and stops when the shutdown channel fires.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

/// Read/write operation counters with periodically sampled rates
pub struct StatsService {
    read_ops: AtomicI64,
    write_ops: AtomicI64,
    read_ops_per_sec: AtomicI64,
    write_ops_per_sec: AtomicI64,
}

/// Point-in-time view of the counters and rates
#[derive(Debug, Clone, Copy, Serialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct StatsSnapshot {
    /// Cumulative read operations since start or last reset
    pub total_reads: i64,
    /// Cumulative write operations since start or last reset
    pub total_writes: i64,
    /// Read operations per second over the last sampled interval
    pub reads_per_second: i64,
    /// Write operations per second over the last sampled interval
    pub writes_per_second: i64,
}

impl StatsService {
    /// Create the service and start its background sampler.
    ///
    /// Every `poll_interval` the sampler diffs the cumulative totals against
    /// the values captured at the start of the interval and stores the
    /// per-second rates. The sampler terminates within one tick of the
    /// shutdown channel changing (or its sender being dropped).
    pub fn spawn(poll_interval: Duration, mut shutdown: watch::Receiver<bool>) -> Arc<Self> {
        let stats = Arc::new(Self {
            read_ops: AtomicI64::new(0),
            write_ops: AtomicI64::new(0),
            read_ops_per_sec: AtomicI64::new(0),
            write_ops_per_sec: AtomicI64::new(0),
        });

        // Integer rate divisor; sub-second intervals clamp to one second
        let secs = poll_interval.as_secs().max(1) as i64;

        let sampler = Arc::clone(&stats);
        tokio::spawn(async move {
            loop {
                let reads_at_start = sampler.total_reads();
                let writes_at_start = sampler.total_writes();

                tokio::select! {
                    _ = tokio::time::sleep(poll_interval) => {}
                    _ = shutdown.changed() => break,
                }

                let total_reads = sampler.total_reads();
                let total_writes = sampler.total_writes();

                let reads = total_reads - reads_at_start;
                let writes = total_writes - writes_at_start;

                // A negative delta means the totals were reset mid-interval.
                // Keep the previous rates and restart with fresh baselines.
                if reads < 0 || writes < 0 {
                    continue;
                }

                let reads_per_sec = reads / secs;
                let writes_per_sec = writes / secs;

                sampler.read_ops_per_sec.store(reads_per_sec, Ordering::Relaxed);
                sampler.write_ops_per_sec.store(writes_per_sec, Ordering::Relaxed);

                info!(
                    reads_per_sec,
                    total_reads, writes_per_sec, total_writes, "operation statistics"
                );
            }

            debug!("Statistics sampler stopped");
        });

        stats
    }

    /// Record one read operation
    pub fn inc_reads(&self) {
        self.read_ops.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one write operation
    pub fn inc_writes(&self) {
        self.write_ops.fetch_add(1, Ordering::Relaxed);
    }

    /// Zero the cumulative totals. The sampler keeps running; the interval
    /// in which a reset lands skips its rate computation.
    pub fn reset(&self) {
        self.read_ops.store(0, Ordering::Relaxed);
        self.write_ops.store(0, Ordering::Relaxed);
    }

    /// Cumulative read operations
    pub fn total_reads(&self) -> i64 {
        self.read_ops.load(Ordering::Relaxed)
    }

    /// Cumulative write operations
    pub fn total_writes(&self) -> i64 {
        self.write_ops.load(Ordering::Relaxed)
    }

    /// Most recently sampled read rate
    pub fn reads_per_second(&self) -> i64 {
        self.read_ops_per_sec.load(Ordering::Relaxed)
    }

    /// Most recently sampled write rate
    pub fn writes_per_second(&self) -> i64 {
        self.write_ops_per_sec.load(Ordering::Relaxed)
    }

    /// Snapshot of totals and rates
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_reads: self.total_reads(),
            total_writes: self.total_writes(),
            reads_per_second: self.reads_per_second(),
            writes_per_second: self.writes_per_second(),
        }
    }
}
