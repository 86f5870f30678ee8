use async_trait::async_trait;
use burrow_core::counter::Result;
use burrow_core::{CounterError, CounterStore};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// In-memory implementation of [`CounterStore`] using DashMap.
///
/// Each key's entry is updated under its shard lock, which makes `incr`
/// atomic within the process. Counters are lost on restart and are not
/// shared between processes, so this is meant for tests and single-node
/// development setups.
#[derive(Debug, Default)]
pub struct InMemoryCounter {
    counters: DashMap<String, i64>,
}

impl InMemoryCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current value of `key`, if it exists.
    pub fn get(&self, key: &str) -> Option<i64> {
        self.counters.get(key).map(|value| *value)
    }
}

#[async_trait]
impl CounterStore for InMemoryCounter {
    async fn set_if_absent(&self, key: &str, value: i64) -> Result<bool> {
        match self.counters.entry(key.to_owned()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(true)
            }
        }
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut value = self.counters.entry(key.to_owned()).or_insert(0);
        let next = value.checked_add(1).ok_or_else(|| {
            CounterError::Operation(format!("increment of '{key}' would overflow"))
        })?;
        *value = next;
        Ok(next)
    }
}
