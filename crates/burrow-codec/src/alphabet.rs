use sha2::{Digest, Sha256};

/// Number of symbols in the alphabet.
pub const BASE: usize = 62;

/// Digits, lowercase, then uppercase. The order is part of the code format.
pub const CANONICAL_ALPHABET: &[u8; BASE] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const NO_INDEX: u8 = u8::MAX;

/// A salt-derived permutation of the base62 alphabet.
///
/// Holds both directions of the mapping so that encoding and decoding are
/// table lookups.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: [u8; BASE],
    index: [u8; 128],
}

impl Alphabet {
    /// Derives the alphabet for `salt`.
    ///
    /// An empty salt yields the canonical order. Otherwise the SHA-256 digest
    /// of the salt drives a Fisher–Yates shuffle: walking `i` from the last
    /// position down to 1, position `i` is swapped with
    /// `digest[i % 32] % (i + 1)`.
    pub fn derive(salt: &str) -> Self {
        let mut symbols = *CANONICAL_ALPHABET;

        if !salt.is_empty() {
            let digest = Sha256::digest(salt.as_bytes());
            for i in (1..BASE).rev() {
                let j = usize::from(digest[i % digest.len()]) % (i + 1);
                symbols.swap(i, j);
            }
        }

        Self::from_symbols(symbols)
    }

    /// The unshuffled alphabet, identical to `derive("")`.
    pub fn canonical() -> Self {
        Self::from_symbols(*CANONICAL_ALPHABET)
    }

    fn from_symbols(symbols: [u8; BASE]) -> Self {
        let mut index = [NO_INDEX; 128];
        for (position, &symbol) in symbols.iter().enumerate() {
            index[usize::from(symbol)] = position as u8;
        }
        Self { symbols, index }
    }

    /// Returns the symbol for a digit in `0..BASE`.
    ///
    /// # Panics
    ///
    /// Panics if `digit >= BASE`.
    pub fn symbol(&self, digit: usize) -> char {
        char::from(self.symbols[digit])
    }

    /// The symbol that stands for zero, used for left padding.
    pub fn zero(&self) -> char {
        self.symbol(0)
    }

    /// Returns the digit value of `symbol`, or `None` if it is not part of
    /// the alphabet.
    pub fn index_of(&self, symbol: char) -> Option<u64> {
        if !symbol.is_ascii() {
            return None;
        }
        match self.index[symbol as usize] {
            NO_INDEX => None,
            digit => Some(u64::from(digit)),
        }
    }

    /// The full permutation, in digit order.
    pub fn as_str(&self) -> &str {
        // Every symbol is taken from the ascii canonical alphabet.
        std::str::from_utf8(&self.symbols).unwrap_or_default()
    }
}

impl std::fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // the permutation is as sensitive as the salt it came from
        f.debug_struct("Alphabet").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn empty_salt_is_canonical() {
        let alphabet = Alphabet::derive("");
        assert_eq!(alphabet.as_str().as_bytes(), CANONICAL_ALPHABET);
        assert_eq!(alphabet, Alphabet::canonical());
    }

    #[test]
    fn known_permutation() {
        assert_eq!(
            Alphabet::derive("salt").as_str(),
            "wEf2QSVamD5NUdxG1t4gCpXsKJF8PZin03eyIWHBMzRbTjch7OLAvlY6ur9oqk"
        );
        assert_eq!(
            Alphabet::derive("test").as_str(),
            "cqMoEJemnGi4Q6dWuy371RAK9ftV2BaUPwxDp08Lv5jOhTYXgFsrHbkICzNlZS"
        );
    }

    #[test]
    fn derived_alphabet_is_a_permutation() {
        for salt in ["salt", "test", "a much longer salt with spaces", "ü"] {
            let alphabet = Alphabet::derive(salt);
            let symbols: HashSet<u8> = alphabet.as_str().bytes().collect();
            let canonical: HashSet<u8> = CANONICAL_ALPHABET.iter().copied().collect();
            assert_eq!(symbols, canonical, "salt {salt:?}");
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(Alphabet::derive("pepper"), Alphabet::derive("pepper"));
        assert_ne!(Alphabet::derive("pepper"), Alphabet::derive("salt"));
    }

    #[test]
    fn index_of_inverts_symbol() {
        let alphabet = Alphabet::derive("salt");
        for digit in 0..BASE {
            assert_eq!(alphabet.index_of(alphabet.symbol(digit)), Some(digit as u64));
        }
    }

    #[test]
    fn index_of_rejects_foreign_symbols() {
        let alphabet = Alphabet::derive("salt");
        assert_eq!(alphabet.index_of('-'), None);
        assert_eq!(alphabet.index_of(' '), None);
        assert_eq!(alphabet.index_of('é'), None);
    }

    #[test]
    fn debug_hides_permutation() {
        let rendered = format!("{:?}", Alphabet::derive("salt"));
        assert!(!rendered.contains("wEf2"));
    }
}
