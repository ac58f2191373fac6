// ── UTF-8 ↔ UTF-16 marshaling ─────────────────────────────────────────────────
//
// The Win32 "W" APIs take null-terminated UTF-16.  Callers of this crate speak
// UTF-8.  These helpers are the only place the two meet.

use crate::error::{Result, ShellError};

/// Encode `s` as UTF-16 with a trailing null.
///
/// Fails if `s` already contains a NUL, which the OS would silently truncate.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn to_wide(s: &str) -> Result<Vec<u16>> {
    if s.contains('\0') {
        return Err(ShellError::InvalidPath);
    }
    Ok(s.encode_utf16().chain(std::iter::once(0)).collect())
}

/// Decode up to the first null, or the whole slice when there is none.
pub(crate) fn from_wide(buf: &[u16]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..len])
}

/// Allocate a zeroed buffer of `len` units, pre-filled with `seed`.
///
/// The seed is truncated so that at least one terminating null remains.
pub(crate) fn seeded_buffer(seed: &str, len: usize) -> Vec<u16> {
    let len = len.max(2);
    let mut buf = vec![0u16; len];
    for (slot, unit) in buf.iter_mut().take(len - 1).zip(seed.encode_utf16()) {
        *slot = unit;
    }
    buf
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_wide_appends_terminator() {
        let w = to_wide("ab").expect("encode");
        assert_eq!(w, vec![u16::from(b'a'), u16::from(b'b'), 0]);
    }

    #[test]
    fn to_wide_rejects_interior_nul() {
        assert!(matches!(to_wide("a\0b"), Err(ShellError::InvalidPath)));
    }

    #[test]
    fn from_wide_stops_at_first_null() {
        let buf: Vec<u16> = "C:\\x\0junk".encode_utf16().collect();
        assert_eq!(from_wide(&buf), "C:\\x");
    }

    #[test]
    fn seeded_buffer_keeps_a_terminator() {
        let buf = seeded_buffer("abcdef", 4);
        assert_eq!(buf.len(), 4);
        assert_eq!(buf[3], 0);
        assert_eq!(from_wide(&buf), "abc");
    }

    #[test]
    fn non_ascii_survives_the_trip() {
        let w = to_wide("Dokumente – Überblick").expect("encode");
        assert_eq!(from_wide(&w), "Dokumente – Überblick");
    }
}
