//! Shared utility functions.

/// Truncate a string to at most `max_bytes` without splitting a UTF-8
/// character boundary.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Like [`truncate_str`], but appends a note when anything was cut.
pub fn truncate_with_note(s: &str, max_bytes: usize) -> String {
    let cut = truncate_str(s, max_bytes);
    if cut.len() == s.len() {
        s.to_string()
    } else {
        format!("{}\n... (output truncated, {} bytes total)", cut, s.len())
    }
}

/// First line of `s`, shortened to `max_chars` characters with an ellipsis.
pub fn one_line(s: &str, max_chars: usize) -> String {
    let line = s.lines().next().unwrap_or_default();
    if line.chars().count() <= max_chars && !s.contains('\n') {
        return line.to_string();
    }
    let short: String = line.chars().take(max_chars).collect();
    format!("{}…", short)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_multibyte_boundary() {
        let s = "あのね"; // 9 bytes: 3+3+3
        assert_eq!(truncate_str(s, 4), "あ");
        assert_eq!(truncate_str(s, 6), "あの");
        assert_eq!(truncate_str(s, 9), "あのね");
    }

    #[test]
    fn truncate_with_note_only_when_cut() {
        assert_eq!(truncate_with_note("short", 10), "short");
        assert_eq!(
            truncate_with_note("0123456789", 4),
            "0123\n... (output truncated, 10 bytes total)"
        );
    }

    #[test]
    fn one_line_shortens() {
        assert_eq!(one_line("ls -la", 20), "ls -la");
        assert_eq!(one_line("abcdef", 3), "abc…");
        assert_eq!(one_line("first\nsecond", 20), "first…");
        assert_eq!(one_line("", 5), "");
    }
}
