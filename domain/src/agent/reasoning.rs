//! Removal of private reasoning from assistant text.
//!
//! Models may wrap scratch reasoning in `<thinking>` … `</thinking>`. That
//! text is kept in the conversation history but never shown to the user.

pub const REASONING_OPEN: &str = "<thinking>";
pub const REASONING_CLOSE: &str = "</thinking>";

/// Strip every reasoning span from `text` and trim the remainder.
///
/// An unterminated opening marker hides everything after it.
pub fn strip_reasoning(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(REASONING_OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + REASONING_OPEN.len()..];
        match after_open.find(REASONING_CLOSE) {
            Some(end) => rest = &after_open[end + REASONING_CLOSE.len()..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}
