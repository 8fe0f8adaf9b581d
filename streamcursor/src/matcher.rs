// SPDX-License-Identifier: Apache-2.0

//! Matching primitives over a [`StreamCursor`].
//!
//! Every matcher either consumes bytes and succeeds, or fails and leaves the
//! cursor where it was. The one exception is [`match_until`], which keeps the
//! bytes it skipped even when it fails. Grammar rules made of several matcher
//! calls should run them through a [`Revert`](crate::Revert) guard.

use log::trace;

use crate::window::ByteWindow;
use crate::{ScanError, StreamCursor};

/// How bytes are compared by [`match_literal`] and [`match_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    /// Exact byte comparison.
    Sensitive,
    /// ASCII letters compare equal regardless of case.
    #[default]
    Insensitive,
}

impl CaseSensitivity {
    pub fn bytes_equal(self, a: u8, b: u8) -> bool {
        match self {
            CaseSensitivity::Sensitive => a == b,
            CaseSensitivity::Insensitive => a.eq_ignore_ascii_case(&b),
        }
    }
}

/// A set of bytes [`match_until`] stops at.
pub trait Needle {
    fn contains(&self, byte: u8, cs: CaseSensitivity) -> bool;
}

impl Needle for u8 {
    fn contains(&self, byte: u8, cs: CaseSensitivity) -> bool {
        cs.bytes_equal(*self, byte)
    }
}

impl Needle for &[u8] {
    fn contains(&self, byte: u8, cs: CaseSensitivity) -> bool {
        self.iter().any(|&c| cs.bytes_equal(c, byte))
    }
}

impl<const N: usize> Needle for [u8; N] {
    fn contains(&self, byte: u8, cs: CaseSensitivity) -> bool {
        Needle::contains(&self.as_slice(), byte, cs)
    }
}

impl<const N: usize> Needle for &[u8; N] {
    fn contains(&self, byte: u8, cs: CaseSensitivity) -> bool {
        Needle::contains(&self.as_slice(), byte, cs)
    }
}

/// Matches `expected` byte for byte and consumes it.
///
/// Fails with [`ScanError::InsufficientData`] when fewer than
/// `expected.len()` bytes remain and with [`ScanError::NoMatch`] when the
/// bytes differ. The cursor does not move on failure.
pub fn match_raw<B: ByteWindow + ?Sized>(
    expected: &[u8],
    cursor: &mut StreamCursor<'_, B>,
) -> Result<(), ScanError> {
    let available = cursor.remaining();
    if available < expected.len() {
        return Err(ScanError::InsufficientData {
            requested: expected.len(),
            available,
        });
    }
    if !cursor.offset().starts_with(expected) {
        return Err(ScanError::NoMatch);
    }
    cursor.advance(expected.len())
}

/// Matches the single byte `c` at the read position and consumes it.
pub fn match_literal<B: ByteWindow + ?Sized>(
    c: u8,
    cursor: &mut StreamCursor<'_, B>,
    cs: CaseSensitivity,
) -> Result<(), ScanError> {
    let Some(current) = cursor.current() else {
        return Err(ScanError::InsufficientData {
            requested: 1,
            available: 0,
        });
    };
    if !cs.bytes_equal(c, current) {
        return Err(ScanError::NoMatch);
    }
    cursor.advance(1)
}

/// Advances until the byte at the read position is in `needle`.
///
/// On success the cursor sits *on* the matching byte. When no byte matches,
/// the cursor is left at EOF and [`ScanError::NoMatch`] is returned: unlike
/// the other matchers this one is **not** all-or-nothing. Wrap it in a
/// [`Revert`](crate::Revert) guard when the skipped bytes must be restored.
pub fn match_until<B: ByteWindow + ?Sized>(
    needle: impl Needle,
    cursor: &mut StreamCursor<'_, B>,
    cs: CaseSensitivity,
) -> Result<(), ScanError> {
    let found = cursor
        .offset()
        .iter()
        .position(|&byte| needle.contains(byte, cs));
    match found {
        Some(skip) => cursor.advance(skip),
        None => {
            let rest = cursor.remaining();
            trace!("match_until hit EOF after {} bytes", rest);
            cursor.advance(rest)?;
            Err(ScanError::NoMatch)
        }
    }
}

/// Parses a floating point literal at the read position and consumes it.
///
/// The scan is bounded by the unread part of the window, so a literal at the
/// very end of the window is read correctly without any terminator byte.
/// Leading ASCII whitespace is skipped and counted as consumed. Fails with
/// [`ScanError::NoMatch`], without moving, when no literal is present.
#[cfg(feature = "float")]
pub fn match_double<B: ByteWindow + ?Sized>(
    cursor: &mut StreamCursor<'_, B>,
) -> Result<f64, ScanError> {
    let (value, consumed) = crate::number_parser::parse_float_prefix(cursor.offset())?;
    cursor.advance(consumed)?;
    Ok(value)
}
