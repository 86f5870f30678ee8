use burrow_core::counter::Result;
use burrow_core::{CounterError, CounterStore};
use std::sync::Arc;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

pub const DEFAULT_COUNTER_KEY: &str = "burrow:url_counter";

/// Starting far from zero keeps the first codes from revealing how many URLs
/// have been shortened.
pub const DEFAULT_START_VALUE: u64 = 14_000_000;

/// Configures which counter an [`IdAllocator`] draws from.
#[derive(Debug, Clone, TypedBuilder)]
pub struct AllocatorSettings {
    /// Name of the counter in the backing store.
    #[builder(default = DEFAULT_COUNTER_KEY.to_string(), setter(into))]
    pub counter_key: String,
    /// The first identifier handed out on a fresh counter.
    #[builder(default = DEFAULT_START_VALUE)]
    pub start_value: u64,
}

impl Default for AllocatorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Allocates globally unique, strictly increasing identifiers.
pub struct IdAllocator<C> {
    store: Arc<C>,
    settings: AllocatorSettings,
}

impl<C> Clone for IdAllocator<C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            settings: self.settings.clone(),
        }
    }
}

impl<C: CounterStore> IdAllocator<C> {
    pub fn new(store: C, settings: AllocatorSettings) -> Self {
        Self::from_shared(Arc::new(store), settings)
    }

    /// Creates an allocator over a store that is also used elsewhere.
    pub fn from_shared(store: Arc<C>, settings: AllocatorSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &AllocatorSettings {
        &self.settings
    }

    /// Seeds the counter so that the first [`next`](Self::next) returns
    /// `start_value`.
    ///
    /// Uses set-if-absent, so calling this on every process start is safe: an
    /// existing counter is left untouched and `Ok(false)` is returned.
    pub async fn initialize(&self) -> Result<bool> {
        let key = &self.settings.counter_key;
        let start = i64::try_from(self.settings.start_value).map_err(|_| {
            CounterError::InvalidData(format!(
                "start value {} does not fit the counter",
                self.settings.start_value
            ))
        })?;
        let initial = start - 1;

        let set = self.store.set_if_absent(key, initial).await?;
        if set {
            debug!(key = %key, start_value = start, "initialized identifier counter");
        } else {
            debug!(key = %key, "identifier counter already initialized");
        }

        Ok(set)
    }

    /// Atomically reserves the next identifier.
    ///
    /// Nothing is retried. On error no identifier is returned and the caller
    /// must not persist anything for this request.
    pub async fn next(&self) -> Result<u64> {
        let key = &self.settings.counter_key;
        let value = self.store.incr(key).await?;
        trace!(key = %key, id = value, "allocated identifier");

        u64::try_from(value).map_err(|_| {
            CounterError::InvalidData(format!("counter '{key}' is negative: {value}"))
        })
    }
}

impl<C> std::fmt::Debug for IdAllocator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdAllocator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryCounter;
    use async_trait::async_trait;
    use std::collections::HashSet;

    fn allocator(start_value: u64) -> IdAllocator<InMemoryCounter> {
        let settings = AllocatorSettings::builder()
            .counter_key("test")
            .start_value(start_value)
            .build();
        IdAllocator::new(InMemoryCounter::new(), settings)
    }

    #[test]
    fn default_settings() {
        let settings = AllocatorSettings::default();
        assert_eq!(settings.counter_key, DEFAULT_COUNTER_KEY);
        assert_eq!(settings.start_value, DEFAULT_START_VALUE);
    }

    #[tokio::test]
    async fn first_id_is_start_value() {
        let allocator = allocator(14_000_000);
        assert!(allocator.initialize().await.unwrap());

        assert_eq!(allocator.next().await.unwrap(), 14_000_000);
        assert_eq!(allocator.next().await.unwrap(), 14_000_001);
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let allocator = allocator(100);
        assert!(allocator.initialize().await.unwrap());
        allocator.next().await.unwrap();
        allocator.next().await.unwrap();

        // a restart must not rewind the counter
        assert!(!allocator.initialize().await.unwrap());
        assert_eq!(allocator.next().await.unwrap(), 102);
    }

    #[tokio::test]
    async fn start_value_zero() {
        let allocator = allocator(0);
        allocator.initialize().await.unwrap();
        assert_eq!(allocator.next().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn start_value_out_of_range() {
        let allocator = allocator(u64::MAX);
        let err = allocator.initialize().await.unwrap_err();
        assert!(matches!(err, CounterError::InvalidData(_)));
    }

    #[tokio::test]
    async fn negative_counter_is_rejected() {
        let store = InMemoryCounter::new();
        store.set_if_absent("test", -5).await.unwrap();
        let allocator = IdAllocator::new(
            store,
            AllocatorSettings::builder().counter_key("test").build(),
        );

        let err = allocator.next().await.unwrap_err();
        assert!(matches!(err, CounterError::InvalidData(_)));
    }

    #[tokio::test]
    async fn concurrent_allocations_are_distinct_and_increasing() {
        let allocator = allocator(1_000);
        allocator.initialize().await.unwrap();
        let before = 999;

        let mut handles = vec![];
        for _ in 0..64 {
            let allocator = allocator.clone();
            handles.push(tokio::spawn(async move { allocator.next().await.unwrap() }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            let id = handle.await.unwrap();
            assert!(id > before);
            assert!(ids.insert(id), "duplicate id {id}");
        }
        assert_eq!(ids.len(), 64);
    }

    struct BrokenStore;

    #[async_trait]
    impl CounterStore for BrokenStore {
        async fn set_if_absent(&self, _key: &str, _value: i64) -> Result<bool> {
            Err(CounterError::Unavailable("connection refused".to_string()))
        }

        async fn incr(&self, _key: &str) -> Result<i64> {
            Err(CounterError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let allocator = IdAllocator::new(BrokenStore, AllocatorSettings::default());

        assert!(matches!(
            allocator.initialize().await,
            Err(CounterError::Unavailable(_))
        ));
        assert!(matches!(
            allocator.next().await,
            Err(CounterError::Unavailable(_))
        ));
    }
}
