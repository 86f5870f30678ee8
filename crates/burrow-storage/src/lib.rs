//! URL record stores for the Burrow shortener.

pub mod memory;
pub mod mysql;

pub use burrow_core::{NewUrlRecord, ReadRepository, Repository, StorageError, UrlRecord};
pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
