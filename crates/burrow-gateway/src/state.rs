use std::sync::Arc;

use burrow_core::ShortCode;
use burrow_shortener::Shortener;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    base_url: Option<String>,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>, public_base_url: Option<String>) -> Self {
        Self {
            shortener,
            base_url: public_base_url,
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    /// Renders the code as a full URL when a public base URL is configured,
    /// otherwise returns the bare code.
    pub fn short_url(&self, code: &ShortCode) -> String {
        match &self.base_url {
            Some(base) => code.to_url(base),
            None => code.to_string(),
        }
    }
}
