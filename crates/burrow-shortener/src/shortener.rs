use crate::error::ShortenerError;
use async_trait::async_trait;
use burrow_core::ShortCode;

type Result<T> = std::result::Result<T, ShortenerError>;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens `long_url` and returns the newly allocated short code.
    ///
    /// The URL is stored verbatim; validating it is up to the caller.
    async fn create_short_url(&self, long_url: &str) -> Result<ShortCode>;

    /// Returns the long URL stored for `short_code`.
    ///
    /// Fails with [`ShortenerError::NotFound`] when the code was never
    /// created, and with other variants on infrastructure failures.
    async fn get_long_url(&self, short_code: &str) -> Result<String>;
}
