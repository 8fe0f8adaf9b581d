// Property tests for cursor, guard and buffer invariants

use quickcheck::{Arbitrary, Gen, QuickCheck};
use streamcursor::{
    match_literal, match_raw, match_until, ArrayBuffer, ByteWindow, CaseSensitivity,
    GrowableBuffer, ScanError, SliceBuffer, StreamCursor,
};

const TESTS: u64 = 500;

/// One step a grammar might take.
#[derive(Debug, Clone)]
enum Step {
    Advance(usize),
    Raw(Vec<u8>),
    Literal(u8, bool),
    Until(Vec<u8>, bool),
    #[cfg(feature = "float")]
    Double,
}

fn case(sensitive: bool) -> CaseSensitivity {
    if sensitive {
        CaseSensitivity::Sensitive
    } else {
        CaseSensitivity::Insensitive
    }
}

impl Arbitrary for Step {
    fn arbitrary(g: &mut Gen) -> Self {
        // Small alphabet so matches actually happen
        let alphabet = b"aAbB :\r\n1.";
        let byte = |g: &mut Gen| *g.choose(alphabet).unwrap_or(&b'a');
        let bytes = |g: &mut Gen| {
            let len = usize::arbitrary(g) % 4;
            (0..len).map(|_| byte(g)).collect::<Vec<u8>>()
        };
        match u8::arbitrary(g) % 5 {
            0 => Step::Advance(usize::arbitrary(g) % 8),
            1 => Step::Raw(bytes(g)),
            2 => Step::Literal(byte(g), bool::arbitrary(g)),
            #[cfg(feature = "float")]
            3 => Step::Double,
            _ => Step::Until(bytes(g), bool::arbitrary(g)),
        }
    }
}

fn apply<B: ByteWindow + ?Sized>(step: &Step, cursor: &mut StreamCursor<'_, B>) -> bool {
    match step {
        Step::Advance(n) => cursor.advance(*n).is_ok(),
        Step::Raw(bytes) => match_raw(bytes, cursor).is_ok(),
        Step::Literal(c, sensitive) => match_literal(*c, cursor, case(*sensitive)).is_ok(),
        Step::Until(set, sensitive) => match_until(set.as_slice(), cursor, case(*sensitive)).is_ok(),
        #[cfg(feature = "float")]
        Step::Double => streamcursor::match_double(cursor).is_ok(),
    }
}

fn input_bytes(raw: Vec<u8>) -> Vec<u8> {
    let alphabet = b"aAbB :\r\n1.";
    raw.into_iter()
        .map(|b| alphabet[b as usize % alphabet.len()])
        .collect()
}

/// Position never decreases over successful steps and failed atomic steps
/// leave the window untouched.
#[test]
fn position_monotonic_and_failures_atomic() {
    fn prop(raw: Vec<u8>, steps: Vec<Step>) -> bool {
        let data = input_bytes(raw);
        let mut buf = SliceBuffer::new(&data);
        let mut cursor = StreamCursor::new(&mut buf);
        for step in &steps {
            let before = cursor.area();
            let ok = apply(step, &mut cursor);
            let after = cursor.area();
            if after.pos < before.pos {
                return false;
            }
            let atomic = !matches!(step, Step::Until(..));
            if !ok && atomic && after != before {
                return false;
            }
        }
        true
    }

    QuickCheck::new()
        .tests(TESTS)
        .quickcheck(prop as fn(Vec<u8>, Vec<Step>) -> bool);
}

/// Whatever runs under an uncommitted guard, the window comes back exactly.
#[test]
fn revert_round_trip() {
    fn prop(raw: Vec<u8>, skip: usize, steps: Vec<Step>) -> bool {
        let data = input_bytes(raw);
        let mut buf = SliceBuffer::new(&data);
        let mut cursor = StreamCursor::new(&mut buf);
        let _ = cursor.advance(skip % (data.len() + 1));
        let before = cursor.area();
        {
            let mut guard = cursor.checkpoint();
            for step in &steps {
                apply(step, &mut guard);
            }
        }
        cursor.area() == before
    }

    QuickCheck::new()
        .tests(TESTS)
        .quickcheck(prop as fn(Vec<u8>, usize, Vec<Step>) -> bool);
}

/// A token taken right before `advance(k)` covers exactly those k bytes.
#[test]
fn token_round_trip() {
    fn prop(data: Vec<u8>, skip: usize, k: usize) -> bool {
        let mut buf = SliceBuffer::new(&data);
        let mut cursor = StreamCursor::new(&mut buf);
        let skip = skip % (data.len() + 1);
        cursor.advance(skip).unwrap();
        let k = k % (data.len() - skip + 1);

        let token = cursor.token();
        cursor.advance(k).unwrap();
        token.size(&cursor) == k && token.text(&cursor) == Ok(&data[skip..skip + k])
    }

    QuickCheck::new()
        .tests(TESTS)
        .quickcheck(prop as fn(Vec<u8>, usize, usize) -> bool);
}

/// match_until lands on the first target byte, or on EOF with NoMatch.
#[test]
fn match_until_lands_on_first_target() {
    fn prop(raw: Vec<u8>, target: u8) -> bool {
        let data = input_bytes(raw);
        let target = input_bytes(vec![target])[0];
        let mut buf = SliceBuffer::new(&data);
        let mut cursor = StreamCursor::new(&mut buf);
        let result = match_until(target, &mut cursor, CaseSensitivity::Sensitive);
        match data.iter().position(|&b| b == target) {
            Some(first) => result.is_ok() && cursor.position() == first,
            None => result == Err(ScanError::NoMatch) && cursor.eof(),
        }
    }

    QuickCheck::new()
        .tests(TESTS)
        .quickcheck(prop as fn(Vec<u8>, u8) -> bool);
}

/// Writes within max_size always succeed; the first one past it fails and
/// leaves the earlier bytes intact.
#[test]
fn growable_writes_respect_max_size() {
    fn prop(chunks: Vec<Vec<u8>>, initial: u8, max: u16) -> bool {
        let max = usize::from(max % 512);
        let mut buf = GrowableBuffer::new(usize::from(initial % 16), max);
        let mut expected = Vec::new();
        for chunk in &chunks {
            let fits = expected.len() + chunk.len() <= max;
            match buf.write(chunk) {
                Ok(n) if fits && n == chunk.len() => expected.extend_from_slice(chunk),
                Err(ScanError::CapacityExceeded) if !fits => {}
                _ => return false,
            }
            if buf.buffer() != expected.as_slice() || buf.capacity() > max {
                return false;
            }
        }
        true
    }

    QuickCheck::new()
        .tests(TESTS)
        .quickcheck(prop as fn(Vec<Vec<u8>>, u8, u16) -> bool);
}

/// Feeding an ArrayBuffer succeeds exactly while the total stays below N.
#[test]
fn array_feed_respects_capacity() {
    fn prop(chunks: Vec<Vec<u8>>) -> bool {
        let mut buf = ArrayBuffer::<64>::new();
        let mut expected = Vec::new();
        for chunk in &chunks {
            let fits = expected.len() + chunk.len() < 64;
            match buf.feed(chunk) {
                Ok(()) if fits => expected.extend_from_slice(chunk),
                Err(ScanError::CapacityExceeded) if !fits => {}
                _ => return false,
            }
            if buf.len() != expected.len() || buf.window() != expected.as_slice() {
                return false;
            }
        }
        true
    }

    QuickCheck::new()
        .tests(TESTS)
        .quickcheck(prop as fn(Vec<Vec<u8>>) -> bool);
}
