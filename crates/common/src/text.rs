//! Small text helpers shared by the provider adapters.

/// Truncate to at most `max_bytes`, backing up to a char boundary so the
/// cut never lands inside a multibyte character. Provider error bodies are
/// arbitrary text and get folded into error messages via this.
pub fn truncate(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
