use crate::alphabet::{Alphabet, BASE};
use crate::error::CodecError;
use burrow_core::{ShortCode, SHORT_CODE_LEN};

/// Number of identifiers that fit in a short code without loss: `62^4`.
pub const CODE_SPACE: u64 = (BASE as u64).pow(SHORT_CODE_LEN as u32);

// u64::MAX has 11 base62 digits.
const MAX_DIGITS: usize = 11;

/// Encodes identifiers as salted, fixed-width base62 short codes.
///
/// The alphabet is derived from the salt once, at construction, so a codec
/// can be shared freely between concurrent requests.
#[derive(Clone)]
pub struct Base62Codec {
    alphabet: Alphabet,
}

impl Base62Codec {
    /// Creates a codec for `salt`. An empty salt disables the shuffle.
    pub fn new(salt: &str) -> Self {
        Self {
            alphabet: Alphabet::derive(salt),
        }
    }

    /// Returns the alphabet this codec renders digits with.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Encodes `id` as a four character code.
    ///
    /// Short representations are left-padded with the zero symbol. Identifiers
    /// of `CODE_SPACE` and above keep only their last four digits, so they
    /// alias `id % CODE_SPACE`. Use [`try_encode`](Self::try_encode) to reject
    /// those instead.
    pub fn encode(&self, id: u64) -> ShortCode {
        let mut digits = [0_u8; MAX_DIGITS];
        let mut start = MAX_DIGITS;
        let mut rest = id;

        loop {
            start -= 1;
            digits[start] = (rest % BASE as u64) as u8;
            rest /= BASE as u64;
            if rest == 0 {
                break;
            }
        }

        let significant = &digits[start..];
        let tail = &significant[significant.len().saturating_sub(SHORT_CODE_LEN)..];

        let mut code = String::with_capacity(SHORT_CODE_LEN);
        for _ in tail.len()..SHORT_CODE_LEN {
            code.push(self.alphabet.zero());
        }
        code.extend(tail.iter().map(|&digit| self.alphabet.symbol(usize::from(digit))));

        ShortCode::new_unchecked(code)
    }

    /// Like [`encode`](Self::encode), but fails instead of truncating once the
    /// four character code space is exhausted.
    pub fn try_encode(&self, id: u64) -> Result<ShortCode, CodecError> {
        if id >= CODE_SPACE {
            return Err(CodecError::IdentifierOutOfRange {
                id,
                max: CODE_SPACE,
            });
        }
        Ok(self.encode(id))
    }

    /// Decodes a code back into its identifier.
    ///
    /// Any length is accepted; only symbols outside the alphabet, an empty
    /// input, or a value that overflows `u64` are rejected.
    pub fn decode(&self, code: &str) -> Result<u64, CodecError> {
        if code.is_empty() {
            return Err(CodecError::Empty);
        }

        code.chars()
            .enumerate()
            .try_fold(0_u64, |acc, (position, symbol)| {
                let digit = self
                    .alphabet
                    .index_of(symbol)
                    .ok_or(CodecError::InvalidSymbol { symbol, position })?;
                acc.checked_mul(BASE as u64)
                    .and_then(|value| value.checked_add(digit))
                    .ok_or_else(|| CodecError::Overflow(code.to_string()))
            })
    }
}

impl std::fmt::Debug for Base62Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Base62Codec").finish_non_exhaustive()
    }
}

/// Encodes `id` with a one-off codec for `salt`.
///
/// Prefer a long-lived [`Base62Codec`] on hot paths; this derives the
/// alphabet on every call.
pub fn encode(id: u64, salt: &str) -> ShortCode {
    Base62Codec::new(salt).encode(id)
}

/// Decodes `code` with a one-off codec for `salt`.
pub fn decode(code: &str, salt: &str) -> Result<u64, CodecError> {
    Base62Codec::new(salt).decode(code)
}
