// SPDX-License-Identifier: Apache-2.0

//! Request line and header scanning over a [`StreamCursor`].

use log::debug;
use streamcursor::{
    match_literal, match_raw, match_until, ByteWindow, CaseSensitivity, ScanError, StreamCursor,
    CR,
};

use CaseSensitivity::Sensitive;

/// A scanned request head, copied out of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: String,
    pub target: String,
    pub version: String,
    pub headers: Vec<(String, String)>,
}

/// Outcome of one scan attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum Scan {
    Complete(RequestHead),
    /// The head is not fully buffered yet; the window is left untouched.
    NeedMore,
}

const NEED_MORE: ScanError = ScanError::InsufficientData {
    requested: 1,
    available: 0,
};

fn token_until<B: ByteWindow + ?Sized>(
    target: u8,
    cursor: &mut StreamCursor<'_, B>,
) -> Result<String, ScanError> {
    let token = cursor.token();
    match match_until(target, cursor, Sensitive) {
        Err(ScanError::NoMatch) if cursor.eof() => return Err(NEED_MORE),
        other => other?,
    }
    Ok(token.text_str(cursor)?.to_owned())
}

fn head<B: ByteWindow + ?Sized>(cursor: &mut StreamCursor<'_, B>) -> Result<RequestHead, ScanError> {
    let method = token_until(b' ', cursor)?;
    if method.is_empty() {
        return Err(ScanError::NoMatch);
    }
    match_literal(b' ', cursor, Sensitive)?;
    let target = token_until(b' ', cursor)?;
    match_literal(b' ', cursor, Sensitive)?;
    match_raw(b"HTTP/", cursor)?;
    let version = token_until(CR, cursor)?;
    match_raw(b"\r\n", cursor)?;

    let mut headers = Vec::new();
    loop {
        if cursor.remaining() < 2 {
            return Err(NEED_MORE);
        }
        if cursor.eol() {
            cursor.advance(2)?;
            return Ok(RequestHead {
                method,
                target,
                version,
                headers,
            });
        }
        let name = token_until(b':', cursor)?;
        match_literal(b':', cursor, Sensitive)?;
        while match_literal(b' ', cursor, Sensitive).is_ok() {}
        let value = token_until(CR, cursor)?;
        match_raw(b"\r\n", cursor)?;
        headers.push((name, value));
    }
}

/// Scans a request head from the cursor.
///
/// On success the cursor is left on the first body byte. When the input
/// ends early the cursor is restored and [`Scan::NeedMore`] returned, so the
/// caller can append more bytes and call again.
pub fn scan_head<B: ByteWindow + ?Sized>(cursor: &mut StreamCursor<'_, B>) -> Result<Scan, ScanError> {
    let mut guard = cursor.checkpoint();
    match head(&mut guard) {
        Ok(parsed) => {
            guard.commit();
            Ok(Scan::Complete(parsed))
        }
        Err(e) if e.is_incomplete() => {
            debug!("request head incomplete after {} bytes", guard.position());
            Ok(Scan::NeedMore)
        }
        Err(e) => Err(e),
    }
}
