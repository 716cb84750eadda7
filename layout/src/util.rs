//! Helpers shared across the crate.

use crate::Error;
use bytes::Buf;
use std::cmp::Ordering;

/// Returns an error if the buffer holds fewer than `len` bytes.
#[inline]
pub fn at_least<B: Buf>(buf: &B, len: usize) -> Result<(), Error> {
    if buf.remaining() < len {
        return Err(Error::EndOfBuffer);
    }
    Ok(())
}

/// Compares two names so that embedded numbers sort by value (`Field2` < `Field10`).
///
/// Names are split into runs of ASCII digits and runs of everything else. Digit runs
/// compare numerically, other runs compare lexically. Names that only differ in leading
/// zeros fall back to a plain lexical comparison, so the result is a total order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut left, mut right) = (a, b);
    loop {
        match (left.is_empty(), right.is_empty()) {
            (true, true) => return a.cmp(b),
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        let (left_chunk, left_rest) = split_chunk(left);
        let (right_chunk, right_rest) = split_chunk(right);
        let ordering = if is_digits(left_chunk) && is_digits(right_chunk) {
            compare_digits(left_chunk, right_chunk)
        } else {
            left_chunk.cmp(right_chunk)
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
        left = left_rest;
        right = right_rest;
    }
}

fn split_chunk(s: &str) -> (&str, &str) {
    let digits = s.starts_with(|c: char| c.is_ascii_digit());
    let end = s
        .find(|c: char| c.is_ascii_digit() != digits)
        .unwrap_or(s.len());
    s.split_at(end)
}

fn is_digits(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit())
}

fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
