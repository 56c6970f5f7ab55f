//! Lexical path manipulation.
//!
//! Everything here works on text only. Nothing touches the filesystem, follows
//! symlinks or checks whether a result escapes some root directory.
//!
//! Capacities follow the convention of fixed-size path buffers: a capacity of
//! `n` holds at most `n - 1` bytes of path, the last byte being reserved for a
//! terminator. Truncation never splits a UTF-8 character.

use crate::error::{Error, Result};
use crate::separator::{DEFAULT_SEPARATOR, is_separator, is_separator_char};

/// Longest prefix of `s` that fits in `max_len` bytes without splitting a character.
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Append `segment` to `path`, inserting a `/` unless `path` already ends in a separator.
///
/// An empty `path` is simply replaced by `segment`. The result never exceeds
/// `max_capacity - 1` bytes; whatever does not fit is dropped.
pub fn combine(path: &mut String, segment: &str, max_capacity: usize) -> Result<()> {
    if max_capacity == 0 {
        return Err(Error::invalid_argument("path capacity must be non-zero"));
    }
    let limit = max_capacity - 1;

    if path.is_empty() {
        path.push_str(truncate_str(segment, limit));
        return Ok(());
    }

    let ends_with_separator = path.as_bytes().last().is_some_and(|&b| is_separator(b));
    if !ends_with_separator && path.len() < limit {
        path.push(char::from(DEFAULT_SEPARATOR));
    }

    let room = limit.saturating_sub(path.len());
    path.push_str(truncate_str(segment, room));
    Ok(())
}

/// Lexically normalize `path`.
///
/// Duplicate separators collapse, `.` segments disappear and each `..` removes
/// the segment written before it. The output keeps the separator characters
/// of the input and holds at most `max_output - 1` bytes.
///
/// A few shapes are kept as they are observable by callers:
/// - `.` alone stays `.`, and so does `./`.
/// - A trailing `/.` leaves the trailing separator: `a/.` becomes `a/`.
/// - A `..` that empties the output also swallows the separator after it, so
///   `../a` and `a/../b` give `a` and `b`. Nothing signals that the path went
///   above its starting point.
/// - Only one separator goes with it: `a/..//b` and `..//a` become `/b` and
///   `/a`, the same as `.//a`.
/// - A trailing `..` that stops on a separator keeps it: `a/b/..` becomes `a/`.
///
/// # Errors
///
/// `InvalidArgument` when `max_output` is zero, `Internal` when `path` is empty.
pub fn resolve(path: &str, max_output: usize) -> Result<String> {
    if max_output == 0 {
        return Err(Error::invalid_argument("output capacity must be non-zero"));
    }
    if path.is_empty() {
        return Err(Error::internal("cannot resolve an empty path"));
    }

    let src = path.as_bytes();
    let len = src.len();
    let limit = max_output - 1;

    let mut out: Vec<u8> = Vec::new();
    out.try_reserve(len.min(limit))
        .map_err(|_| Error::out_of_memory(len.min(limit)))?;

    let mut pos = 0;
    // Set while `pos` starts a segment with no separator before it in the
    // input: the very beginning, or after a `..` or `./` that was dropped.
    let mut segment_start = true;

    while pos < len && out.len() < limit {
        let on_separator = is_separator(src[pos]);

        if segment_start || on_separator {
            let check = if on_separator { pos + 1 } else { pos };

            // Collapse `//` into a single separator.
            if on_separator && check < len && is_separator(src[check]) {
                pos += 1;
                continue;
            }

            let end = src[check..]
                .iter()
                .position(|&b| is_separator(b))
                .map_or(len, |i| check + i);

            match &src[check..end] {
                b"." if end == len => {
                    // Trailing `.`: keep the separator in front of it, or the
                    // dot itself when there is none.
                    out.push(src[pos]);
                    pos = len;
                    continue;
                }
                b"." if on_separator => {
                    pos = end;
                    continue;
                }
                b"." => {
                    if end + 1 == len {
                        // `./` with nothing after it
                        out.push(b'.');
                        pos = len;
                    } else {
                        pos = end + 1;
                    }
                    continue;
                }
                b".." => {
                    pos = end;

                    let mut cursor = out.len();
                    if cursor > 0 {
                        cursor -= 1;
                        while cursor > 0 && !is_separator(out[cursor]) {
                            cursor -= 1;
                        }
                    }

                    if cursor == 0 && pos < len {
                        pos += 1;
                    }
                    if pos == len && cursor < out.len() && is_separator(out[cursor]) {
                        cursor += 1;
                    }

                    out.truncate(cursor);
                    segment_start = true;
                    continue;
                }
                _ => {}
            }
        }

        out.push(src[pos]);
        pos += 1;
        segment_start = false;
    }

    match String::from_utf8(out) {
        Ok(resolved) => Ok(resolved),
        Err(err) => {
            // Only the capacity cut can leave a partial character at the end.
            let valid = err.utf8_error().valid_up_to();
            let mut bytes = err.into_bytes();
            bytes.truncate(valid);
            String::from_utf8(bytes).map_err(|e| Error::internal(e.to_string()))
        }
    }
}

/// Return the part of `path` after its last separator.
///
/// # Errors
///
/// `NotFound` when `path` contains no separator at all.
pub fn get_filename(path: &str) -> Result<&str> {
    path.rfind(is_separator_char)
        .map(|idx| &path[idx + 1..])
        .ok_or_else(|| Error::not_found(format!("separator in path {:?}", path)))
}

/// Cut `path` at its last separator, leaving the parent directory.
///
/// The first character is never examined, so a leading root separator is
/// kept and a path without any other separator is left unchanged.
pub fn truncate_to_parent(path: &mut String) {
    let cut = path
        .as_bytes()
        .iter()
        .enumerate()
        .skip(1)
        .rev()
        .find(|(_, b)| is_separator(**b))
        .map(|(idx, _)| idx);

    if let Some(idx) = cut {
        path.truncate(idx);
    }
}
