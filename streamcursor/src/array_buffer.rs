// SPDX-License-Identifier: Apache-2.0

use log::debug;

use crate::window::{Area, ByteWindow};
use crate::ScanError;

/// A window backed by an owned, fixed-size array.
///
/// Data arrives incrementally through [`feed`](ArrayBuffer::feed), which
/// extends the readable region without ever reallocating. One byte of the
/// array is always kept free, so at most `N - 1` bytes can be fed.
#[derive(Debug, Clone)]
pub struct ArrayBuffer<const N: usize> {
    bytes: [u8; N],
    /// Number of valid bytes at the start of `bytes`
    size: usize,
    area: Area,
}

impl<const N: usize> ArrayBuffer<N> {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self {
            bytes: [0u8; N],
            size: 0,
            area: Area::EMPTY,
        }
    }

    /// Creates a buffer holding a copy of `arr`. Fails to compile when the
    /// array does not fit.
    pub fn from_array<const M: usize>(arr: [u8; M]) -> Self {
        const { assert!(M <= N, "Source array exceeds maximum capacity") };
        let mut buffer = Self::new();
        if let Some(dest) = buffer.bytes.get_mut(..M) {
            dest.copy_from_slice(&arr);
        }
        buffer.size = M;
        buffer.area = Area::new(0, 0, M);
        buffer
    }

    /// Creates a buffer holding a copy of `data`.
    pub fn from_slice(data: &[u8]) -> Result<Self, ScanError> {
        let mut buffer = Self::new();
        let dest = buffer
            .bytes
            .get_mut(..data.len())
            .ok_or(ScanError::CapacityExceeded)?;
        dest.copy_from_slice(data);
        buffer.size = data.len();
        buffer.area = Area::new(0, 0, data.len());
        Ok(buffer)
    }

    /// Appends `data` after the current end of the window.
    ///
    /// Fails without copying anything when `size + data.len()` would reach
    /// `N`. The read position is preserved, so unread bytes stay readable.
    pub fn feed(&mut self, data: &[u8]) -> Result<(), ScanError> {
        let new_size = match self.size.checked_add(data.len()) {
            Some(new_size) if new_size < N => new_size,
            _ => {
                debug!(
                    "feed of {} bytes rejected: {} of {} bytes used",
                    data.len(),
                    self.size,
                    N
                );
                return Err(ScanError::CapacityExceeded);
            }
        };
        let dest = self
            .bytes
            .get_mut(self.size..new_size)
            .ok_or(ScanError::CapacityExceeded)?;
        dest.copy_from_slice(data);
        self.size = new_size;
        self.area.end = new_size;
        Ok(())
    }

    /// Number of bytes fed so far.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Static capacity of the backing array.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes that can still be fed.
    pub fn free_space(&self) -> usize {
        N.saturating_sub(self.size).saturating_sub(1)
    }

    /// Zeroes the storage and forgets everything fed so far, making the
    /// whole array available again. Tokens taken before are invalidated.
    pub fn clear(&mut self) {
        self.bytes = [0u8; N];
        self.size = 0;
        self.area = Area {
            generation: self.area.generation.wrapping_add(1),
            ..Area::EMPTY
        };
    }
}

impl<const N: usize> Default for ArrayBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ByteWindow for ArrayBuffer<N> {
    fn storage(&self) -> &[u8] {
        self.bytes.get(..self.size).unwrap_or(&[])
    }

    fn area(&self) -> Area {
        self.area
    }

    fn set_area(&mut self, area: Area) {
        debug_assert!(area.begin <= area.pos && area.pos <= area.end);
        self.area = area.clamped(self.size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_new_array_buffer() {
        let buffer = ArrayBuffer::<16>::new();
        assert_eq!(buffer.len(), 0);
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 16);
        assert_eq!(buffer.free_space(), 15);
        assert_eq!(buffer.in_avail(), 0);
        assert_eq!(buffer.sgetc(), None);
    }

    #[test]
    fn test_feed_extends_window() {
        let mut buffer = ArrayBuffer::<16>::new();
        buffer.feed(b"GET ").unwrap();
        assert_eq!(buffer.in_avail(), 4);

        buffer.sbumpc();
        buffer.sbumpc();

        buffer.feed(b"/x").unwrap();
        assert_eq!(buffer.len(), 6);
        assert_eq!(buffer.position(), 2);
        assert_eq!(buffer.unread(), b"T /x");
        assert_eq!(buffer.window(), b"GET /x");
    }

    #[test]
    fn test_feed_up_to_capacity_minus_one() {
        let mut buffer = ArrayBuffer::<8>::new();
        buffer.feed(b"0123").unwrap();
        buffer.feed(b"456").unwrap();
        assert_eq!(buffer.len(), 7);
        assert_eq!(buffer.free_space(), 0);

        // size + len == N is already too much
        assert_eq!(buffer.feed(b"7"), Err(ScanError::CapacityExceeded));
        assert_eq!(buffer.len(), 7);
        assert_eq!(buffer.window(), b"0123456");
    }

    #[test]
    fn test_feed_rejected_leaves_state_unchanged() {
        let mut buffer = ArrayBuffer::<8>::new();
        buffer.feed(b"abc").unwrap();
        buffer.sbumpc();
        let before = buffer.area();

        assert_eq!(buffer.feed(b"defgh"), Err(ScanError::CapacityExceeded));
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.area(), before);
        assert_eq!(buffer.unread(), b"bc");
    }

    #[test]
    fn test_from_array_and_slice() {
        let buffer = ArrayBuffer::<8>::from_array(*b"HTTP");
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.window(), b"HTTP");

        let mut full = ArrayBuffer::<4>::from_array(*b"HTTP");
        assert_eq!(full.len(), 4);
        // A completely filled array accepts no further feed, not even an empty one
        assert_eq!(full.feed(b""), Err(ScanError::CapacityExceeded));

        let buffer = ArrayBuffer::<8>::from_slice(b"1.1").unwrap();
        assert_eq!(buffer.window(), b"1.1");
        assert_eq!(
            ArrayBuffer::<2>::from_slice(b"1.1").unwrap_err(),
            ScanError::CapacityExceeded
        );
    }

    #[test]
    fn test_clear_zeroes_and_allows_refeed() {
        let mut buffer = ArrayBuffer::<8>::new();
        buffer.feed(b"abcdefg").unwrap();
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.free_space(), 7);
        assert_eq!(buffer.in_avail(), 0);
        assert_eq!(buffer.area().generation, 1);
        assert!(buffer.bytes.iter().all(|&b| b == 0));

        buffer.feed(b"xyz").unwrap();
        assert_eq!(buffer.window(), b"xyz");
        assert_eq!(buffer.position(), 0);
    }

    #[test]
    fn test_reset_keeps_stored_bytes() {
        let mut buffer = ArrayBuffer::<16>::new();
        buffer.feed(b"GET /old").unwrap();
        buffer.sbumpc();
        let before = buffer.area();
        buffer.reset();

        assert_eq!(buffer.len(), 8);
        assert_eq!(buffer.in_avail(), 0);
        assert_eq!(buffer.storage(), b"GET /old");

        // New input starts a fresh window after the old bytes
        buffer.feed(b"POST").unwrap();
        assert_eq!(buffer.position(), 0);
        assert_eq!(buffer.window(), b"POST");

        // The indices alone are enough to bring the old window back
        buffer.set_area(before);
        assert_eq!(buffer.unread(), b"ET /old");
    }

    #[test]
    fn test_set_area_is_clamped_to_fed_bytes() {
        let mut buffer = ArrayBuffer::<8>::from_array(*b"abc");
        buffer.set_area(Area::new(0, 2, 7));
        assert_eq!(buffer.area(), Area::new(0, 2, 3));
        assert_eq!(buffer.sgetc(), Some(b'c'));
    }
}
