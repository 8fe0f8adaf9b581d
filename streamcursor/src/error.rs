// SPDX-License-Identifier: Apache-2.0

/// Errors returned by buffers, cursors and matchers.
///
/// Every operation that fails leaves its buffer or cursor untouched, with the
/// single exception of [`match_until`](crate::match_until).
#[derive(Debug, PartialEq)]
pub enum ScanError {
    /// A write or feed does not fit within the buffer's configured maximum.
    /// Callers should treat this as a hard limit ("message too large").
    CapacityExceeded,
    /// Fewer bytes are available than the operation needs. For a streaming
    /// caller this means "need more input".
    InsufficientData {
        /// Bytes the operation needed.
        requested: usize,
        /// Bytes available ahead of the read position.
        available: usize,
    },
    /// The input at the current position does not match.
    NoMatch,
    /// A token refers to a window that has since been reset or replaced.
    InvalidSliceBounds,
    /// Token bytes were requested as text but are not valid UTF-8.
    InvalidUtf8(core::str::Utf8Error),
}

impl ScanError {
    /// True when more input could turn this failure into a success.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ScanError::InsufficientData { .. })
    }
}

impl From<core::str::Utf8Error> for ScanError {
    fn from(err: core::str::Utf8Error) -> Self {
        ScanError::InvalidUtf8(err)
    }
}

impl core::fmt::Display for ScanError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ScanError::CapacityExceeded => f.write_str("buffer capacity exceeded"),
            ScanError::InsufficientData {
                requested,
                available,
            } => write!(
                f,
                "insufficient data: requested {requested} bytes, {available} available"
            ),
            ScanError::NoMatch => f.write_str("no match at current position"),
            ScanError::InvalidSliceBounds => f.write_str("token refers to a stale window"),
            ScanError::InvalidUtf8(e) => write!(f, "invalid UTF-8: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::InvalidUtf8(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_error_conversion() {
        use core::str;
        // Lone continuation byte, built at runtime to avoid the invalid literal lint
        let mut invalid_utf8_array = [0u8; 1];
        invalid_utf8_array[0] = 0b10000000u8;

        match str::from_utf8(&invalid_utf8_array) {
            Err(utf8_error) => {
                let scan_error: ScanError = utf8_error.into();
                assert!(matches!(scan_error, ScanError::InvalidUtf8(_)));
            }
            Ok(_) => panic!("Expected UTF-8 validation to fail"),
        }
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ScanError::CapacityExceeded.to_string(),
            "buffer capacity exceeded"
        );
        assert_eq!(
            ScanError::InsufficientData {
                requested: 4,
                available: 1
            }
            .to_string(),
            "insufficient data: requested 4 bytes, 1 available"
        );
        assert_eq!(ScanError::NoMatch.to_string(), "no match at current position");
    }

    #[test]
    fn test_is_incomplete() {
        assert!(ScanError::InsufficientData {
            requested: 1,
            available: 0
        }
        .is_incomplete());
        assert!(!ScanError::NoMatch.is_incomplete());
        assert!(!ScanError::CapacityExceeded.is_incomplete());
    }
}
