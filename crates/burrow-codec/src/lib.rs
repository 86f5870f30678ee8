//! Salted, reversible base62 codec for short codes.
//!
//! Identifiers are rendered as fixed-width, four character codes using a
//! permutation of the base62 alphabet derived from a secret salt, so that
//! consecutive identifiers do not produce guessable, consecutive codes.
//!
//! ```
//! use burrow_codec::Base62Codec;
//!
//! let codec = Base62Codec::new("salt");
//! let code = codec.encode(1);
//! assert_eq!(code.as_str(), "wwwE");
//! assert_eq!(codec.decode(code.as_str()), Ok(1));
//! ```

mod alphabet;
mod codec;
pub mod error;

pub use alphabet::{Alphabet, BASE, CANONICAL_ALPHABET};
pub use codec::{decode, encode, Base62Codec, CODE_SPACE};
pub use error::CodecError;
