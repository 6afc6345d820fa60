//! Prompt template substitution

/// Marker replaced by the current carry value
pub const PLACEHOLDER: &str = "{input}";

/// Fill a prompt template with the given input
///
/// Only the first `{input}` is replaced. Templates without the marker are
/// returned unchanged, and the input is inserted verbatim, so an input that
/// itself contains `{input}` is never expanded again.
pub fn substitute(template: &str, input: &str) -> String {
    template.replacen(PLACEHOLDER, input, 1)
}

/// Number of placeholder markers in a template
pub fn placeholder_count(template: &str) -> usize {
    template.matches(PLACEHOLDER).count()
}
