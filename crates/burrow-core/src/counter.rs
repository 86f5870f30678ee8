use crate::error::CounterError;
use async_trait::async_trait;

/// Result type for counter operations.
pub type Result<T> = std::result::Result<T, CounterError>;

/// A shared, durable integer counter with atomic increments.
///
/// This is the only serialization point of the shortener: every
/// implementation must make [`incr`](CounterStore::incr) linearizable across
/// all callers that share the same backing store, including other processes.
#[async_trait]
pub trait CounterStore: Send + Sync + 'static {
    /// Sets `key` to `value` only if the key does not exist yet.
    ///
    /// Returns `true` if the value was written, `false` if the key was
    /// already present (which is not an error).
    async fn set_if_absent(&self, key: &str, value: i64) -> Result<bool>;

    /// Atomically increments `key` by one and returns the new value.
    ///
    /// A missing key is treated as `0` before the increment.
    async fn incr(&self, key: &str) -> Result<i64>;
}
