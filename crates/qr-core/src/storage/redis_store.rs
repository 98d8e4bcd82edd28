//! Redis storage backend
//!
//! The connection is opened lazily on first use and shared by every request
//! through a multiplexed handle. After `reset()` the handle is dropped and
//! the next call reconnects.

use ::redis::aio::MultiplexedConnection;
use ::redis::AsyncCommands;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::KeyValueStore;
use crate::error::{QrError, Result};

/// Connection retry policy: linear backoff, capped, with a retry limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Delay added per retry
    pub step: Duration,
    /// Upper bound for a single delay
    pub max_delay: Duration,
    /// Retries allowed after the first attempt
    pub max_retries: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            step: Duration::from_millis(100),
            max_delay: Duration::from_millis(3000),
            max_retries: 3,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before retry number `retries` (1-based), or `None` to give up
    pub fn delay(&self, retries: u32) -> Option<Duration> {
        if retries > self.max_retries {
            return None;
        }
        Some((self.step * retries).min(self.max_delay))
    }
}

/// Redis storage backend
pub struct RedisStore {
    client: ::redis::Client,
    connection: Mutex<Option<MultiplexedConnection>>,
    policy: ReconnectPolicy,
}

impl RedisStore {
    /// Create a store for `url` without connecting
    pub fn new(url: &str) -> Result<Self> {
        let client = ::redis::Client::open(url)
            .map_err(|e| QrError::InvalidStoreUrl(format!("{}: {}", url, e)))?;

        Ok(Self {
            client,
            connection: Mutex::new(None),
            policy: ReconnectPolicy::default(),
        })
    }

    /// Override the reconnect policy
    pub fn with_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get the shared connection, connecting if needed
    async fn connection(&self) -> Result<MultiplexedConnection> {
        let mut guard = self.connection.lock().await;

        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self.connect_with_retry().await?;
        *guard = Some(conn.clone());
        Ok(conn)
    }

    async fn connect_with_retry(&self) -> Result<MultiplexedConnection> {
        let mut retries = 0;

        loop {
            match self.client.get_multiplexed_async_connection().await {
                Ok(conn) => {
                    info!(retries, "Redis connection established");
                    return Ok(conn);
                }
                Err(e) => {
                    retries += 1;
                    match self.policy.delay(retries) {
                        Some(delay) => {
                            warn!(retries, error = %e, "Redis connection failed, retrying");
                            sleep(delay).await;
                        }
                        None => {
                            return Err(QrError::StorageUnavailable(format!(
                                "Max retries reached: {}",
                                e
                            )));
                        }
                    }
                }
            }
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;

        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| QrError::StorageUnavailable(format!("GET {} failed: {}", key, e)))?;

        debug!("Retrieved key: {} (present: {})", key, value.is_some());
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.connection().await?;

        let _: () = conn
            .set(key, value)
            .await
            .map_err(|e| QrError::StorageUnavailable(format!("SET {} failed: {}", key, e)))?;

        debug!("Stored key: {}", key);
        Ok(())
    }

    async fn reset(&self) {
        if self.connection.lock().await.take().is_some() {
            info!("Discarded Redis connection");
        }
    }

    fn backend_name(&self) -> &'static str {
        "Redis"
    }
}
