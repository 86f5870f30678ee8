//! Identifier allocation on top of a shared atomic counter.
//!
//! [`IdAllocator`] hands out strictly increasing identifiers by incrementing
//! a named counter in a [`CounterStore`](burrow_core::CounterStore). The
//! store, not the allocator, provides atomicity; the allocator adds no
//! locking of its own.

pub mod allocator;
pub mod store;

pub use allocator::{AllocatorSettings, IdAllocator, DEFAULT_COUNTER_KEY, DEFAULT_START_VALUE};
pub use store::{InMemoryCounter, RedisCounter};
