use serde_json;

/// Render `text` as a JSON string literal, for quoting in messages.
pub fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Upper-case `text` and replace everything that is not an identifier
/// character with `_`, so it can be used as a preprocessor symbol.
pub fn to_macro_case(text: &str) -> String {
    let mut out: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
