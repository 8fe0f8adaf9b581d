// SPDX-License-Identifier: Apache-2.0

//! Zero-copy byte scanning for incremental wire-protocol parsers.
//!
//! Bytes are staged in a [`GrowableBuffer`] or fed into an [`ArrayBuffer`],
//! or borrowed as a [`SliceBuffer`]. A [`StreamCursor`] walks any of them,
//! marks [`Token`]s, and rolls back speculative progress through a
//! [`Revert`] guard. The matchers ([`match_raw`], [`match_literal`],
//! [`match_until`], [`match_double`]) are the building blocks a grammar
//! layer combines.
//!
//! ```rust
//! use streamcursor::{match_literal, match_raw, match_until, CaseSensitivity, GrowableBuffer, StreamCursor};
//!
//! let mut buf = GrowableBuffer::new(8, 1024);
//! buf.write(b"GET /index.html HTTP/1.1\r\n").unwrap();
//!
//! let mut cursor = StreamCursor::new(&mut buf);
//! match_raw(b"GET", &mut cursor).unwrap();
//! match_literal(b' ', &mut cursor, CaseSensitivity::Sensitive).unwrap();
//! let uri = cursor.token();
//! match_until(b' ', &mut cursor, CaseSensitivity::Sensitive).unwrap();
//! assert_eq!(uri.text(&cursor).unwrap(), b"/index.html");
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[cfg(all(feature = "std", not(test)))]
extern crate std;

mod error;
pub use error::ScanError;

mod window;
pub use window::{Area, ByteWindow, SliceBuffer};

mod array_buffer;
pub use array_buffer::ArrayBuffer;

mod growable_buffer;
pub use growable_buffer::{GrowableBuffer, DEFAULT_MAX_SIZE};

mod cursor;
pub use cursor::{Revert, StreamCursor, Token};

mod matcher;
#[cfg(feature = "float")]
pub use matcher::match_double;
pub use matcher::{match_literal, match_raw, match_until, CaseSensitivity, Needle};

#[cfg(feature = "float")]
mod number_parser;

/// Carriage return.
pub const CR: u8 = 0x0D;
/// Line feed.
pub const LF: u8 = 0x0A;
