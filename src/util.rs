//! Shared utility functions

/// Split one line (as produced by `split_inclusive('\n')`) into its content
/// and its terminator.
///
/// The terminator is `"\r\n"`, `"\n"`, or empty for a final line without a
/// newline, so `content + terminator` always reproduces the input.
pub fn split_terminator(raw: &str) -> (&str, &str) {
    if let Some(content) = raw.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = raw.strip_suffix('\n') {
        (content, "\n")
    } else {
        (raw, "")
    }
}
