use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored URL record in the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The short code the record is keyed by.
    pub short_code: ShortCode,
    /// The original URL that was shortened.
    pub long_url: String,
    /// When the record was written, stamped by the store (UTC).
    pub created_at: Timestamp,
}

/// The write-side input of [`Repository::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrlRecord {
    pub short_code: ShortCode,
    pub long_url: String,
}

impl NewUrlRecord {
    pub fn new(short_code: ShortCode, long_url: impl Into<String>) -> Self {
        Self {
            short_code,
            long_url: long_url.into(),
        }
    }

    /// Stamps the record with its creation time.
    pub fn into_record(self, created_at: Timestamp) -> UrlRecord {
        UrlRecord {
            short_code: self.short_code,
            long_url: self.long_url,
            created_at,
        }
    }
}

/// A read-only view of a repository.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the URL record for an exact short code match.
    /// Returns `None` if the code does not exist.
    async fn get_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Persists a new URL record, stamping `created_at` at write time.
    ///
    /// Returns `Err(Conflict)` if the code already exists. Records are never
    /// overwritten.
    async fn create(&self, record: NewUrlRecord) -> Result<UrlRecord>;
}
