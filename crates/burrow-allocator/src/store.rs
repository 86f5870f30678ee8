pub mod memory;
pub mod redis;

pub use memory::InMemoryCounter;
pub use redis::RedisCounter;
