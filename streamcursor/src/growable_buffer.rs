// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;

use log::debug;

use crate::window::{Area, ByteWindow};
use crate::ScanError;

/// Ceiling used by [`GrowableBuffer::with_initial_size`].
pub const DEFAULT_MAX_SIZE: usize = u32::MAX as usize;

/// An output sink that accumulates written bytes in a growable store.
///
/// The store starts at `initial_size` bytes and doubles whenever a write does
/// not fit, never exceeding `max_size`. Everything written so far is readable
/// back through [`ByteWindow`], which is how received network data is handed
/// to a [`StreamCursor`](crate::StreamCursor).
///
/// Positions are indices, so growing the store never invalidates a position
/// recorded by a cursor or token.
#[derive(Debug)]
pub struct GrowableBuffer {
    /// Backing store; its length is the current capacity
    data: Vec<u8>,
    /// Write position, `data[..written]` holds valid bytes
    written: usize,
    max_size: usize,
    area: Area,
}

impl GrowableBuffer {
    /// Creates a buffer with `initial_size` bytes of storage that may grow up
    /// to `max_size` bytes. `initial_size` is clamped to `max_size`.
    pub fn new(initial_size: usize, max_size: usize) -> Self {
        let size = initial_size.min(max_size);
        Self {
            data: alloc::vec![0u8; size],
            written: 0,
            max_size,
            area: Area::EMPTY,
        }
    }

    /// Creates a buffer bounded only by [`DEFAULT_MAX_SIZE`].
    pub fn with_initial_size(initial_size: usize) -> Self {
        Self::new(initial_size, DEFAULT_MAX_SIZE)
    }

    /// Appends `data`, growing the store as needed.
    ///
    /// The write is all-or-nothing: if `data` cannot fit within `max_size`
    /// nothing is written and previously written bytes are untouched.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, ScanError> {
        let needed = self
            .written
            .checked_add(data.len())
            .ok_or(ScanError::CapacityExceeded)?;
        if needed > self.data.len() {
            self.grow_to_fit(needed)?;
        }
        let dest = self
            .data
            .get_mut(self.written..needed)
            .ok_or(ScanError::CapacityExceeded)?;
        dest.copy_from_slice(data);
        self.written = needed;
        self.area.end = needed;
        Ok(data.len())
    }

    /// Appends a single byte.
    pub fn write_byte(&mut self, byte: u8) -> Result<(), ScanError> {
        self.write(&[byte]).map(|_| ())
    }

    fn grow_to_fit(&mut self, needed: usize) -> Result<(), ScanError> {
        let old_size = self.data.len();
        if needed > self.max_size {
            debug!(
                "write rejected: {} bytes needed, buffer limited to {} bytes",
                needed, self.max_size
            );
            return Err(ScanError::CapacityExceeded);
        }

        let mut new_size = old_size.max(1);
        while new_size < needed {
            new_size = new_size.saturating_mul(2).min(self.max_size);
        }

        debug!("growing buffer from {} to {} bytes", old_size, new_size);
        self.data
            .try_reserve_exact(new_size.saturating_sub(old_size))
            .map_err(|_| ScanError::CapacityExceeded)?;
        self.data.resize(new_size, 0);
        Ok(())
    }

    /// Everything written so far.
    pub fn buffer(&self) -> &[u8] {
        self.data.get(..self.written).unwrap_or(&[])
    }

    /// Number of bytes written.
    pub fn len(&self) -> usize {
        self.written
    }

    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Current size of the backing store.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Rewinds the write position and empties the window. The allocated
    /// store is kept for the next message; tokens taken before are
    /// invalidated.
    pub fn clear(&mut self) {
        self.written = 0;
        self.area = Area {
            generation: self.area.generation.wrapping_add(1),
            ..Area::EMPTY
        };
    }
}

impl ByteWindow for GrowableBuffer {
    fn storage(&self) -> &[u8] {
        self.buffer()
    }

    fn area(&self) -> Area {
        self.area
    }

    fn set_area(&mut self, area: Area) {
        debug_assert!(area.begin <= area.pos && area.pos <= area.end);
        self.area = area.clamped(self.written);
    }
}

impl core::fmt::Write for GrowableBuffer {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.write(s.as_bytes())
            .map(|_| ())
            .map_err(|_| core::fmt::Error)
    }
}

#[cfg(feature = "std")]
impl std::io::Write for GrowableBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        GrowableBuffer::write(self, buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::OutOfMemory, e))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
