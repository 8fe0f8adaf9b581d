// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use log::trace;

use crate::window::{Area, ByteWindow};
use crate::{ScanError, CR, LF};

/// A read head over a [`ByteWindow`].
///
/// The cursor keeps no state of its own: its position is the window's read
/// position. It holds the buffer mutably for its whole lifetime, so the buffer
/// cannot be fed, written or reset behind its back.
#[derive(Debug)]
pub struct StreamCursor<'b, B: ByteWindow + ?Sized> {
    buf: &'b mut B,
}

impl<'b, B: ByteWindow + ?Sized> StreamCursor<'b, B> {
    pub fn new(buf: &'b mut B) -> Self {
        Self { buf }
    }

    /// Creates a cursor and advances it by `initial` bytes.
    pub fn with_position(buf: &'b mut B, initial: usize) -> Result<Self, ScanError> {
        let mut cursor = Self::new(buf);
        cursor.advance(initial)?;
        Ok(cursor)
    }

    /// Consumes exactly `count` bytes.
    ///
    /// Atomic: when fewer than `count` bytes remain nothing is consumed.
    pub fn advance(&mut self, count: usize) -> Result<(), ScanError> {
        let available = self.buf.in_avail();
        if count > available {
            return Err(ScanError::InsufficientData {
                requested: count,
                available,
            });
        }
        let mut area = self.buf.area();
        area.pos = area.pos.saturating_add(count);
        self.buf.set_area(area);
        Ok(())
    }

    /// Offset of the read position from the window start.
    pub fn position(&self) -> usize {
        self.buf.position()
    }

    /// Bytes left ahead of the read position.
    pub fn remaining(&self) -> usize {
        self.buf.in_avail()
    }

    pub fn eof(&self) -> bool {
        self.remaining() == 0
    }

    /// Byte at the read position, `None` at EOF.
    pub fn current(&self) -> Option<u8> {
        self.buf.sgetc()
    }

    /// Byte right after the read position, `None` when there is none.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        self.buf.snext()
    }

    /// True when the cursor sits on a CRLF pair. A bare LF is not an EOL.
    pub fn eol(&self) -> bool {
        self.current() == Some(CR) && self.next() == Some(LF)
    }

    /// Unread bytes, from the read position to the window end.
    pub fn offset(&self) -> &[u8] {
        self.buf.unread()
    }

    /// Bytes from `off` (relative to the window start) to the window end.
    /// Empty when `off` lies outside the window.
    pub fn offset_at(&self, off: usize) -> &[u8] {
        let area = self.buf.area();
        let Some(start) = area.begin.checked_add(off) else {
            return &[];
        };
        self.buf.storage().get(start..area.end).unwrap_or(&[])
    }

    /// Distance travelled since the position `mark`.
    pub fn diff(&self, mark: usize) -> usize {
        self.position().saturating_sub(mark)
    }

    /// Distance from this cursor to `other`. Only meaningful when both
    /// cursors walk the same storage.
    pub fn diff_cursor<C: ByteWindow + ?Sized>(&self, other: &StreamCursor<'_, C>) -> usize {
        other.position().saturating_sub(self.position())
    }

    /// Empties the underlying window.
    pub fn reset(&mut self) {
        self.buf.reset();
    }

    /// Snapshot of the underlying window indices.
    pub fn area(&self) -> Area {
        self.buf.area()
    }

    /// The buffer this cursor walks.
    pub fn buffer(&self) -> &B {
        self.buf
    }

    /// Marks the current position; see [`Token`].
    pub fn token(&self) -> Token {
        Token::new(self)
    }

    /// Starts a speculative parse; see [`Revert`].
    pub fn checkpoint(&mut self) -> Revert<'_, 'b, B> {
        Revert::new(self)
    }
}

/// The bytes consumed between a mark and a cursor's current position.
///
/// A token only records where it started. Its end is always the cursor's
/// current position, so it keeps growing while the cursor advances:
///
/// ```rust
/// use streamcursor::{SliceBuffer, StreamCursor};
///
/// let mut buf = SliceBuffer::new(b"Host: example.com");
/// let mut cursor = StreamCursor::new(&mut buf);
/// let token = cursor.token();
/// cursor.advance(4).unwrap();
/// assert_eq!(token.size(&cursor), 4);
/// assert_eq!(token.text(&cursor).unwrap(), b"Host");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Window start at capture, in storage indices
    begin: usize,
    /// Read position at capture, in storage indices
    start: usize,
    generation: u32,
}

impl Token {
    pub fn new<B: ByteWindow + ?Sized>(cursor: &StreamCursor<'_, B>) -> Self {
        let area = cursor.area();
        Self {
            begin: area.begin,
            start: area.pos,
            generation: area.generation,
        }
    }

    /// Position (relative to the window start) where the token begins.
    pub fn start(&self) -> usize {
        self.start.saturating_sub(self.begin)
    }

    /// Position where the token currently ends.
    pub fn end<B: ByteWindow + ?Sized>(&self, cursor: &StreamCursor<'_, B>) -> usize {
        cursor.position()
    }

    pub fn size<B: ByteWindow + ?Sized>(&self, cursor: &StreamCursor<'_, B>) -> usize {
        self.end(cursor).saturating_sub(self.start())
    }

    /// Borrowed bytes from the mark to the cursor.
    ///
    /// Fails with [`ScanError::InvalidSliceBounds`] when the window has been
    /// reset or the cursor has moved behind the mark.
    pub fn text<'c, B: ByteWindow + ?Sized>(
        &self,
        cursor: &'c StreamCursor<'_, B>,
    ) -> Result<&'c [u8], ScanError> {
        let area = cursor.area();
        if area.generation != self.generation
            || area.begin != self.begin
            || area.pos < self.start
        {
            return Err(ScanError::InvalidSliceBounds);
        }
        cursor
            .buf
            .storage()
            .get(self.start..area.pos)
            .ok_or(ScanError::InvalidSliceBounds)
    }

    /// Like [`text`](Token::text), checked as UTF-8.
    pub fn text_str<'c, B: ByteWindow + ?Sized>(
        &self,
        cursor: &'c StreamCursor<'_, B>,
    ) -> Result<&'c str, ScanError> {
        Ok(core::str::from_utf8(self.text(cursor)?)?)
    }

    /// Owned copy of the token bytes, for values that must outlive the
    /// buffer borrow.
    pub fn to_vec<B: ByteWindow + ?Sized>(
        &self,
        cursor: &StreamCursor<'_, B>,
    ) -> Result<Vec<u8>, ScanError> {
        self.text(cursor).map(<[u8]>::to_vec)
    }
}

/// Scope guard for speculative parsing.
///
/// Records the window indices when created and puts them back when dropped,
/// unless [`commit`](Revert::commit) was called. The guard derefs to the
/// cursor, so matchers run straight through it and an early `?` return
/// rolls back every advance made since the guard was created.
///
/// ```rust
/// use streamcursor::{match_literal, match_raw, CaseSensitivity, ScanError, SliceBuffer, StreamCursor};
///
/// fn version<B: streamcursor::ByteWindow>(cursor: &mut StreamCursor<'_, B>) -> Result<(), ScanError> {
///     let mut guard = cursor.checkpoint();
///     match_raw(b"HTTP/1.", &mut guard)?;
///     match_literal(b'1', &mut guard, CaseSensitivity::Sensitive)?;
///     guard.commit();
///     Ok(())
/// }
///
/// let mut buf = SliceBuffer::new(b"HTTP/1.0");
/// let mut cursor = StreamCursor::new(&mut buf);
/// assert!(version(&mut cursor).is_err());
/// assert_eq!(cursor.position(), 0);
/// ```
#[derive(Debug)]
pub struct Revert<'c, 'b, B: ByteWindow + ?Sized> {
    cursor: &'c mut StreamCursor<'b, B>,
    saved: Area,
    active: bool,
}

impl<'c, 'b, B: ByteWindow + ?Sized> Revert<'c, 'b, B> {
    pub fn new(cursor: &'c mut StreamCursor<'b, B>) -> Self {
        let saved = cursor.area();
        Self {
            cursor,
            saved,
            active: true,
        }
    }

    /// Restores the recorded window now. The guard stays armed.
    pub fn revert(&mut self) {
        trace!(
            "reverting window from pos {} to pos {}",
            self.cursor.area().pos,
            self.saved.pos
        );
        self.cursor.buf.set_area(self.saved);
    }

    /// Keeps the progress made and disarms the guard.
    pub fn commit(mut self) {
        self.active = false;
    }

    /// Disarms the guard without consuming it.
    pub fn ignore(&mut self) {
        self.active = false;
    }

    /// Window indices recorded at creation.
    pub fn saved_area(&self) -> Area {
        self.saved
    }
}

impl<'b, B: ByteWindow + ?Sized> Deref for Revert<'_, 'b, B> {
    type Target = StreamCursor<'b, B>;

    fn deref(&self) -> &Self::Target {
        self.cursor
    }
}

impl<B: ByteWindow + ?Sized> DerefMut for Revert<'_, '_, B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.cursor
    }
}

impl<B: ByteWindow + ?Sized> Drop for Revert<'_, '_, B> {
    fn drop(&mut self) {
        if self.active {
            self.revert();
        }
    }
}
