//! Path separator recognition.
//!
//! Archive entry names come from many platforms, so both `/` and `\` are
//! accepted wherever a separator is expected. Output always uses `/` when a
//! separator has to be introduced.

/// Separator inserted when joining paths.
pub const DEFAULT_SEPARATOR: u8 = b'/';

/// Returns true if the byte is a path separator (`/` or `\`).
#[inline]
pub fn is_separator(b: u8) -> bool {
    b == b'/' || b == b'\\'
}

/// Returns true if the character is a path separator (`/` or `\`).
#[inline]
pub fn is_separator_char(c: char) -> bool {
    c == '/' || c == '\\'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators() {
        assert!(is_separator(b'/'));
        assert!(is_separator(b'\\'));
        assert!(!is_separator(b':'));
        assert!(!is_separator(b'.'));

        assert!(is_separator_char('/'));
        assert!(is_separator_char('\\'));
        assert!(!is_separator_char('a'));
    }

    #[test]
    fn test_default_separator_is_recognized() {
        assert!(is_separator(DEFAULT_SEPARATOR));
    }
}
