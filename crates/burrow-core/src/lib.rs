//! Core types and traits for the Burrow URL shortener.
//!
//! This crate holds the shared vocabulary of the workspace: the
//! [`ShortCode`] and [`UrlRecord`] types, the capability traits that the
//! shortening workflow is injected with ([`CounterStore`],
//! [`ReadRepository`], [`Repository`]) and their error types.

pub mod counter;
pub mod error;
pub mod repository;
pub mod shortcode;

pub use counter::CounterStore;
pub use error::{CoreError, CounterError, StorageError};
pub use repository::{NewUrlRecord, ReadRepository, Repository, UrlRecord};
pub use shortcode::{ShortCode, SHORT_CODE_LEN};
