//! The URL shortening workflow.
//!
//! [`ShortenerService`] ties an [`IdAllocator`](burrow_allocator::IdAllocator),
//! a [`Base62Codec`](burrow_codec::Base62Codec) and a
//! [`Repository`](burrow_core::Repository) together:
//!
//! - creating: allocate an identifier, encode it, store the record
//! - resolving: look the code up and return the long URL, or
//!   [`ShortenerError::NotFound`]

pub mod error;
pub mod service;
pub mod shortener;

pub use error::ShortenerError;
pub use service::ShortenerService;
pub use shortener::Shortener;
