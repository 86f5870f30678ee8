use std::collections::HashSet;

use burrow_allocator::{AllocatorSettings, IdAllocator, RedisCounter};
use burrow_core::CounterStore;
use burrow_test_infra::redis::RedisServer;
use redis::AsyncCommands;

struct Fixture {
    redis: RedisServer,
    counter: RedisCounter,
}

impl Fixture {
    async fn start() -> Self {
        let redis = RedisServer::new().await.expect("start redis");
        let url = redis.url().await.expect("redis url");
        let counter = RedisCounter::connect(&url).await.expect("connect redis");
        Self { redis, counter }
    }
}

#[tokio::test]
async fn set_if_absent_does_not_overwrite() {
    let fixture = Fixture::start().await;

    assert!(fixture.counter.set_if_absent("k", 41).await.unwrap());
    assert!(!fixture.counter.set_if_absent("k", 7).await.unwrap());

    assert_eq!(fixture.counter.incr("k").await.unwrap(), 42);
}

#[tokio::test]
async fn allocator_starts_at_configured_value() {
    let fixture = Fixture::start().await;
    let settings = AllocatorSettings::builder()
        .counter_key("burrow:test")
        .start_value(14_000_000)
        .build();
    let allocator = IdAllocator::new(fixture.counter.clone(), settings);

    assert!(allocator.initialize().await.unwrap());
    assert_eq!(allocator.next().await.unwrap(), 14_000_000);
    assert_eq!(allocator.next().await.unwrap(), 14_000_001);

    let mut conn = fixture.redis.connection().await.unwrap();
    let raw: i64 = conn.get("burrow:test").await.unwrap();
    assert_eq!(raw, 14_000_001);
}

#[tokio::test]
async fn restart_keeps_the_sequence() {
    let fixture = Fixture::start().await;
    let settings = AllocatorSettings::builder()
        .counter_key("burrow:test")
        .start_value(100)
        .build();

    let first = IdAllocator::new(fixture.counter.clone(), settings.clone());
    first.initialize().await.unwrap();
    assert_eq!(first.next().await.unwrap(), 100);

    // a second process booting against the same Redis
    let second = IdAllocator::new(fixture.counter.clone(), settings);
    assert!(!second.initialize().await.unwrap());
    assert_eq!(second.next().await.unwrap(), 101);
}

#[tokio::test]
async fn concurrent_allocators_never_share_an_id() {
    let fixture = Fixture::start().await;
    let url = fixture.redis.url().await.unwrap();
    let settings = AllocatorSettings::builder()
        .counter_key("burrow:test")
        .start_value(1)
        .build();

    let mut handles = vec![];
    for _ in 0..4 {
        // separate connections stand in for separate serving processes
        let counter = RedisCounter::connect(&url).await.unwrap();
        let allocator = IdAllocator::new(counter, settings.clone());
        allocator.initialize().await.unwrap();

        handles.push(tokio::spawn(async move {
            let mut ids = vec![];
            for _ in 0..50 {
                ids.push(allocator.next().await.unwrap());
            }
            ids
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.await.unwrap() {
            assert!(id >= 1);
            assert!(seen.insert(id), "duplicate id {id}");
        }
    }
    assert_eq!(seen.len(), 200);
}
