use std::ascii;

/// Renders at most `limit` bytes of `input` as printable ASCII, escaping
/// anything else, for logging payloads that failed to parse.
pub fn payload_preview(input: &[u8], limit: usize) -> String {
    let mut preview: String = input
        .iter()
        .take(limit)
        .flat_map(|&c| ascii::escape_default(c))
        .map(char::from)
        .collect();

    if input.len() > limit {
        preview.push_str("...");
    }

    preview
}
