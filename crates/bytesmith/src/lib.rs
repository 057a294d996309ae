//! Growable byte-string buffers with split/join and formatted
//! concatenation.
//!
//! The crate centers on [`Buffer`], an exclusively owned byte string that
//! keeps a readable NUL sentinel after its content for cheap C interop and
//! grows by amortized doubling as content is appended. On top of it sit a
//! delimiter tokenizer ([`SplitIter`] and [`split`]) that collapses
//! consecutive delimiters, the inverse [`join`], and `core::fmt`-driven
//! formatted appends ([`bformat!`] and [`Buffer::format_into`]).
//!
//! Allocation failure is part of the API: fallible operations return
//! [`Result`] and leave their inputs untouched on failure, and each buffer
//! carries an [`AllocPolicy`] deciding whether failures propagate as
//! [`Error::Alloc`] or end the program with a diagnostic.
//!
//! The core is `no_std` + `alloc`; the default `std` feature adds the
//! [`fileio`] helpers.
//!
//! # Examples
//!
//! ```rust
//! use bytesmith::{Buffer, bformat, join, split};
//!
//! # fn demo() -> bytesmith::Result<()> {
//! let mut greeting = Buffer::from_slice(b"  Ehy how are you?  ")?;
//! greeting.trim(b" ");
//!
//! let words = split(greeting.as_bytes(), b" ")?;
//! assert_eq!(words.len(), 4);
//! assert_eq!(words[0], "Ehy");
//!
//! let rejoined = words.join(b" ")?;
//! assert_eq!(rejoined, greeting);
//!
//! let report = bformat!("{} words, {} bytes", words.len(), greeting.len())?;
//! assert_eq!(report, "4 words, 16 bytes");
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod buffer;
mod error;
mod fmt;
mod heap;
mod split;

#[cfg(feature = "std")]
pub mod fileio;

#[cfg(test)]
mod tests;

pub use buffer::Buffer;
pub use error::{Error, Result};
pub use heap::AllocPolicy;
pub use split::{SplitIter, TokenList, join, split};

/// Formats into a fresh [`Buffer`], using [`format_args!`] syntax.
///
/// Expands to a [`Result`]: the buffer on success, [`Error::Alloc`] or
/// [`Error::Format`] on failure, with the same atomicity as
/// [`Buffer::format_into`].
///
/// ```rust
/// use bytesmith::bformat;
///
/// let label = bformat!("request #{:04}", 17).unwrap();
/// assert_eq!(label, "request #0017");
/// ```
#[macro_export]
macro_rules! bformat {
    ( $( $arg:tt )* ) => {{
        let mut buf = $crate::Buffer::new();
        match buf.format_into(::core::format_args!($($arg)*)) {
            Ok(()) => Ok(buf),
            Err(err) => Err(err),
        }
    }};
}
