//! Application configuration

use std::env;
use std::time::Duration;

/// Application configuration
pub struct AppConfig {
    /// Listening address
    pub addr: String,
    /// Database URL; in-memory storage is used when absent
    pub database_url: Option<String>,
    /// Capacity of the balance read cache
    pub cache_capacity: usize,
    /// Statistics sampling interval
    pub polling_interval: Duration,
}

impl AppConfig {
    /// Create a new configuration from environment variables
    pub fn new() -> Self {
        Self {
            addr: env::var("ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: env::var("DATABASE_URL").ok(),
            cache_capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or(10),
            polling_interval: env::var("POLLING_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(30)),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
