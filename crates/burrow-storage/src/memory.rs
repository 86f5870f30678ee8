use async_trait::async_trait;
use burrow_core::repository::Result;
use burrow_core::{NewUrlRecord, ReadRepository, Repository, ShortCode, StorageError, UrlRecord};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use tracing::trace;

/// Process-local repository backed by a sharded map. Contents are lost on
/// restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: DashMap<String, UrlRecord>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        trace!(code = %code, "looking up record in memory");
        Ok(self.storage.get(code.as_str()).map(|entry| entry.clone()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create(&self, record: NewUrlRecord) -> Result<UrlRecord> {
        // The entry holds the shard lock, so check-and-insert is atomic.
        match self.storage.entry(record.short_code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(record.short_code.into_inner())),
            Entry::Vacant(slot) => {
                let stored = record.into_record(Timestamp::now());
                slot.insert(stored.clone());
                trace!(code = %stored.short_code, "stored record in memory");
                Ok(stored)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn new_record(c: &str, url: &str) -> NewUrlRecord {
        NewUrlRecord::new(code(c), url)
    }

    #[tokio::test]
    async fn create_and_get() {
        let repo = InMemoryRepository::new();
        let before = Timestamp::now();

        let created = repo
            .create(new_record("wwwE", "https://example.com"))
            .await
            .unwrap();
        assert_eq!(created.short_code, code("wwwE"));
        assert!(created.created_at >= before);

        let got = repo.get_by_short_code(&code("wwwE")).await.unwrap().unwrap();
        assert_eq!(got, created);
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let repo = InMemoryRepository::new();

        let result = repo.get_by_short_code(&code("nope")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let repo = InMemoryRepository::new();
        repo.create(new_record("wwwE", "https://example.com"))
            .await
            .unwrap();

        assert!(repo.get_by_short_code(&code("wwwe")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_conflict_keeps_original() {
        let repo = InMemoryRepository::new();

        repo.create(new_record("wwwE", "https://example.com"))
            .await
            .unwrap();

        let err = repo
            .create(new_record("wwwE", "https://other.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(ref c) if c == "wwwE"));

        let got = repo.get_by_short_code(&code("wwwE")).await.unwrap().unwrap();
        assert_eq!(got.long_url, "https://example.com");
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn long_url_is_stored_verbatim() {
        let repo = InMemoryRepository::new();
        let odd = "not a url at all \u{1F600}";

        repo.create(new_record("0000", odd)).await.unwrap();

        let got = repo.get_by_short_code(&code("0000")).await.unwrap().unwrap();
        assert_eq!(got.long_url, odd);
    }

    #[tokio::test]
    async fn concurrent_writers_and_readers() {
        let repo = Arc::new(InMemoryRepository::with_capacity(64));
        let codes: Vec<String> = (0..32).map(|i| format!("k{i:03}")).collect();

        let writers = codes.iter().cloned().map(|c| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                let url = format!("https://{c}.example");
                repo.create(new_record(&c, &url)).await.unwrap();
            })
        });
        let readers = codes.iter().cloned().map(|c| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                // may or may not observe the write, but never errors
                repo.get_by_short_code(&code(&c)).await.unwrap();
            })
        });

        for task in writers.chain(readers).collect::<Vec<_>>() {
            task.await.unwrap();
        }

        assert_eq!(repo.len(), codes.len());
        for c in &codes {
            let got = repo.get_by_short_code(&code(c)).await.unwrap().unwrap();
            assert_eq!(got.long_url, format!("https://{c}.example"));
        }
    }

    #[tokio::test]
    async fn concurrent_creates_of_one_code_admit_a_single_winner() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..16u64 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.create(NewUrlRecord::new(
                    ShortCode::new_unchecked("same"),
                    format!("https://example{}.com", i),
                ))
                .await
                .is_ok()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
