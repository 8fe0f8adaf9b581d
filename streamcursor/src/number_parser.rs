// SPDX-License-Identifier: Apache-2.0

use core::str::FromStr;

use crate::ScanError;

/// Whitespace skipped before a number, the C `isspace` set.
const fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

fn digit_run(bytes: &[u8], from: usize) -> usize {
    bytes
        .get(from..)
        .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
}

fn starts_with_ignore_case(bytes: &[u8], from: usize, word: &[u8]) -> bool {
    bytes
        .get(from..from.saturating_add(word.len()))
        .is_some_and(|s| s.eq_ignore_ascii_case(word))
}

/// Scans a floating point literal at the start of `bytes`.
///
/// Returns `(skip, len)`: `skip` leading whitespace bytes followed by a
/// `len` byte literal. `len == 0` means there is no literal. The scan never
/// looks past the end of `bytes`.
///
/// Accepted: an optional sign, then `inf`, `infinity` or `nan` in any case,
/// or digits with an optional fraction (at least one digit overall) and an
/// optional exponent. An exponent without digits is left unconsumed.
pub fn float_prefix(bytes: &[u8]) -> (usize, usize) {
    let skip = bytes.iter().take_while(|&&b| is_space(b)).count();
    let mut i = skip;

    if matches!(bytes.get(i), Some(b'+' | b'-')) {
        i += 1;
    }

    if starts_with_ignore_case(bytes, i, b"infinity") {
        return (skip, i + 8 - skip);
    }
    if starts_with_ignore_case(bytes, i, b"inf") || starts_with_ignore_case(bytes, i, b"nan") {
        return (skip, i + 3 - skip);
    }

    let int_digits = digit_run(bytes, i);
    i += int_digits;
    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        frac_digits = digit_run(bytes, i + 1);
        if int_digits > 0 || frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return (skip, 0);
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = digit_run(bytes, j);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }

    (skip, i - skip)
}

/// Parses the floating point literal at the start of `bytes`.
///
/// Returns the value and the number of bytes consumed, leading whitespace
/// included. Fails with [`ScanError::NoMatch`] when there is no literal.
pub fn parse_float_prefix(bytes: &[u8]) -> Result<(f64, usize), ScanError> {
    let (skip, len) = float_prefix(bytes);
    if len == 0 {
        return Err(ScanError::NoMatch);
    }
    let end = skip + len;
    let literal = bytes.get(skip..end).ok_or(ScanError::NoMatch)?;
    let text = core::str::from_utf8(literal)?;
    let value = f64::from_str(text).map_err(|_| ScanError::NoMatch)?;
    Ok((value, end))
}
