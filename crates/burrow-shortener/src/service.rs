use crate::error::ShortenerError;
use crate::shortener::Shortener;
use async_trait::async_trait;
use burrow_allocator::IdAllocator;
use burrow_codec::Base62Codec;
use burrow_core::{CounterStore, NewUrlRecord, Repository, ShortCode};
use std::sync::Arc;
use tracing::{debug, trace};

/// A concrete implementation of the [`Shortener`] trait.
///
/// Creating a short URL is a single pass: allocate an identifier, encode
/// it, store the record. A failure at any step aborts the request. An
/// identifier that was allocated before a failure is simply never used;
/// nothing is rolled back and nothing is retried.
pub struct ShortenerService<R, C> {
    repository: Arc<R>,
    allocator: IdAllocator<C>,
    codec: Base62Codec,
}

impl<R, C> Clone for ShortenerService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            allocator: self.allocator.clone(),
            codec: self.codec.clone(),
        }
    }
}

impl<R: Repository, C: CounterStore> ShortenerService<R, C> {
    pub fn new(repository: R, allocator: IdAllocator<C>, codec: Base62Codec) -> Self {
        Self {
            repository: Arc::new(repository),
            allocator,
            codec,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

#[async_trait]
impl<R: Repository, C: CounterStore> Shortener for ShortenerService<R, C> {
    async fn create_short_url(&self, long_url: &str) -> Result<ShortCode, ShortenerError> {
        let id = self.allocator.next().await?;
        let short_code = self.codec.encode(id);
        trace!(id, code = %short_code, "encoded identifier");

        let record = self
            .repository
            .create(NewUrlRecord::new(short_code, long_url))
            .await
            .map_err(ShortenerError::storage("create URL in repository"))?;

        debug!(code = %record.short_code, "shortened url");
        Ok(record.short_code)
    }

    async fn get_long_url(&self, short_code: &str) -> Result<String, ShortenerError> {
        let code = ShortCode::new_unchecked(short_code);

        match self
            .repository
            .get_by_short_code(&code)
            .await
            .map_err(ShortenerError::storage("get URL by short code"))?
        {
            Some(record) => {
                trace!(code = %code, "resolved short code");
                Ok(record.long_url)
            }
            None => {
                trace!(code = %code, "short code not found");
                Err(ShortenerError::NotFound(code.into_inner()))
            }
        }
    }
}
