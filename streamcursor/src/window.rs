// SPDX-License-Identifier: Apache-2.0

use core::ops::Range;

use crate::ScanError;

/// The three indices that describe a byte window over some backing storage.
///
/// Indices are absolute offsets into [`ByteWindow::storage`], so a recorded
/// `Area` stays meaningful when the storage is reallocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Area {
    /// Lower bound of the valid region.
    pub begin: usize,
    /// Current read offset.
    pub pos: usize,
    /// Upper bound of currently readable bytes.
    pub end: usize,
    /// Bumped on every reset, so marks taken before a reset can be told apart
    /// from marks taken after it.
    pub generation: u32,
}

impl Area {
    /// The empty window every buffer falls back to on reset.
    pub const EMPTY: Area = Area::new(0, 0, 0);

    pub const fn new(begin: usize, pos: usize, end: usize) -> Self {
        Self {
            begin,
            pos,
            end,
            generation: 0,
        }
    }

    /// An empty window starting where this one ends, in the next generation.
    pub fn emptied(self) -> Self {
        Self {
            begin: self.end,
            pos: self.end,
            end: self.end,
            generation: self.generation.wrapping_add(1),
        }
    }

    /// Forces `begin <= pos <= end <= len`.
    pub fn clamped(self, len: usize) -> Self {
        let end = self.end.min(len);
        let begin = self.begin.min(end);
        let pos = self.pos.clamp(begin, end);
        Self {
            begin,
            pos,
            end,
            generation: self.generation,
        }
    }

    /// Offset of the read position from the window start.
    pub fn position(&self) -> usize {
        self.pos.saturating_sub(self.begin)
    }

    /// Number of bytes ahead of the read position.
    pub fn in_avail(&self) -> usize {
        self.end.saturating_sub(self.pos)
    }
}

/// A bounded, mutable view over a contiguous byte range.
///
/// Implementors only provide access to their storage and their [`Area`];
/// everything a cursor needs is derived from those. The window never retracts
/// its end except when the owning buffer is cleared.
pub trait ByteWindow {
    /// Backing bytes the window indices refer to.
    fn storage(&self) -> &[u8];

    /// Current window indices.
    fn area(&self) -> Area;

    /// Repositions the window. Implementations clamp `area` to their storage
    /// so the window invariant holds whatever the caller passes.
    fn set_area(&mut self, area: Area);

    /// Empties the window without touching the stored bytes.
    ///
    /// The window collapses onto its current end, so bytes that arrive later
    /// start a fresh window at position 0. Only the indices change, which lets
    /// a [`Revert`](crate::Revert) guard undo a reset.
    fn reset(&mut self) {
        self.set_area(self.area().emptied());
    }

    /// Offset of the read position from the window start.
    fn position(&self) -> usize {
        self.area().position()
    }

    /// Number of unread bytes in the window.
    fn in_avail(&self) -> usize {
        self.area().in_avail()
    }

    /// Byte at the read position, without consuming it.
    fn sgetc(&self) -> Option<u8> {
        let area = self.area();
        if area.pos >= area.end {
            return None;
        }
        self.storage().get(area.pos).copied()
    }

    /// Byte one past the read position, without consuming anything.
    ///
    /// Returns `None` unless both the current and the following byte lie
    /// inside the window.
    fn snext(&self) -> Option<u8> {
        let area = self.area();
        if area.in_avail() < 2 {
            return None;
        }
        self.storage().get(area.pos.wrapping_add(1)).copied()
    }

    /// Consumes and returns the byte at the read position.
    fn sbumpc(&mut self) -> Option<u8> {
        let byte = self.sgetc()?;
        let mut area = self.area();
        area.pos = area.pos.wrapping_add(1);
        self.set_area(area);
        Some(byte)
    }

    /// The whole window, `begin..end`.
    fn window(&self) -> &[u8] {
        let area = self.area();
        self.storage().get(area.begin..area.end).unwrap_or(&[])
    }

    /// Unread part of the window, `pos..end`.
    fn unread(&self) -> &[u8] {
        let area = self.area();
        self.storage().get(area.pos..area.end).unwrap_or(&[])
    }
}

/// A window over caller-owned memory.
///
/// The buffer never owns or modifies the bytes; the borrow guarantees they
/// outlive every use.
#[derive(Debug, Clone)]
pub struct SliceBuffer<'a> {
    data: &'a [u8],
    area: Area,
}

impl<'a> SliceBuffer<'a> {
    /// Creates a window spanning all of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            area: Area::new(0, 0, data.len()),
        }
    }

    /// Creates a window over `range` of `data`. Positions are reported
    /// relative to `range.start`.
    pub fn from_range(data: &'a [u8], range: Range<usize>) -> Result<Self, ScanError> {
        if range.start > range.end || range.end > data.len() {
            return Err(ScanError::InvalidSliceBounds);
        }
        Ok(Self {
            data,
            area: Area::new(range.start, range.start, range.end),
        })
    }

    /// The borrowed bytes, independent of the current window.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

impl<'a> From<&'a [u8]> for SliceBuffer<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

impl ByteWindow for SliceBuffer<'_> {
    fn storage(&self) -> &[u8] {
        self.data
    }

    fn area(&self) -> Area {
        self.area
    }

    fn set_area(&mut self, area: Area) {
        debug_assert!(area.begin <= area.pos && area.pos <= area.end);
        self.area = area.clamped(self.data.len());
    }
}
