//! Zero-allocation WIG line decoding.
//!
//! A data line is `<position>\t<signal>` with an optional line terminator.
//! Decoding never allocates; NUL cleanup rewrites the line buffer in place.

use memchr::memchr;

/// Fast u64 parsing - no allocation, no error formatting.
///
/// Returns None if the input is empty or contains non-digit characters.
#[inline(always)]
pub fn parse_u64_fast(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        n = n.checked_mul(10)?.checked_add(d as u64)?;
    }
    Some(n)
}

/// Parse a signal value, ignoring surrounding ASCII whitespace.
#[inline]
pub fn parse_signal(bytes: &[u8]) -> Option<f32> {
    let text = std::str::from_utf8(bytes.trim_ascii()).ok()?;
    if text.is_empty() {
        return None;
    }
    text.parse::<f32>().ok()
}

/// Remove embedded NUL bytes from a raw line, shifting the remaining
/// bytes left. Returns the number of bytes removed.
///
/// Corrupted tracks occasionally carry stray NULs; the line terminator
/// and everything else keep their relative order.
#[inline]
pub fn strip_nul(line: &mut Vec<u8>) -> usize {
    if memchr(0, line).is_none() {
        return 0;
    }
    let before = line.len();
    line.retain(|&b| b != 0);
    before - line.len()
}

/// Remove a trailing `\n` or `\r\n`.
#[inline(always)]
pub fn trim_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Decode one data line into `(position, signal)`.
///
/// The text before the first tab is the position and the text after it is
/// the signal. Returns None when there is no tab or either field does not
/// parse.
#[inline]
pub fn decode_line(line: &[u8]) -> Option<(u64, f32)> {
    let line = trim_terminator(line);
    let tab = memchr(b'\t', line)?;
    let position = parse_u64_fast(line[..tab].trim_ascii())?;
    let signal = parse_signal(&line[tab + 1..])?;
    Some((position, signal))
}
