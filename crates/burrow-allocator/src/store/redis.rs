use async_trait::async_trait;
use burrow_core::counter::Result;
use burrow_core::{CounterError, CounterStore};
use redis::AsyncCommands;
use tracing::{trace, warn};

/// A Redis-backed [`CounterStore`].
///
/// `SET NX` seeds the counter and `INCR` advances it. Redis executes both
/// atomically, so every process pointed at the same instance shares one
/// identifier sequence.
#[derive(Debug, Clone)]
pub struct RedisCounter {
    conn: redis::aio::MultiplexedConnection,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CounterError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() || message.to_ascii_lowercase().contains("timed out") {
        CounterError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_dropped() {
        CounterError::Unavailable(message)
    } else {
        CounterError::Operation(message)
    }
}

impl RedisCounter {
    /// Creates a counter store over an existing multiplexed connection.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Opens a multiplexed connection to `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| map_redis_error("invalid Redis url", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl CounterStore for RedisCounter {
    async fn set_if_absent(&self, key: &str, value: i64) -> Result<bool> {
        trace!(key = %key, value, "SETNX counter");

        let mut conn = self.conn.clone();
        conn.set_nx::<_, _, bool>(key, value).await.map_err(|e| {
            warn!(key = %key, error = %e, "Redis error on SETNX");
            map_redis_error("failed to initialize counter", e)
        })
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        trace!(key = %key, "INCR counter");

        let mut conn = self.conn.clone();
        conn.incr::<_, _, i64>(key, 1_i64).await.map_err(|e| {
            warn!(key = %key, error = %e, "Redis error on INCR");
            map_redis_error("failed to increment counter", e)
        })
    }
}
