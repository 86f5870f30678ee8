use thiserror::Error;

/// Errors returned by [`Base62Codec`](crate::Base62Codec).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("short code is empty")]
    Empty,
    #[error("symbol {symbol:?} at position {position} is not in the alphabet")]
    InvalidSymbol { symbol: char, position: usize },
    #[error("short code {0:?} does not fit in a 64-bit identifier")]
    Overflow(String),
    #[error("identifier {id} exceeds the code space; expected 0..{max}")]
    IdentifierOutOfRange { id: u64, max: u64 },
}
