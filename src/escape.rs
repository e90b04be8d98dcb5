//! HTML escaping for text embedded in Telegram `parse_mode=HTML` messages.

/// Escapes the five HTML-significant characters.
///
/// Produces the same output as replacing `&`, `<`, `>`, `"` and `'` one after
/// another with `&` first: entities introduced for later characters are never
/// escaped a second time.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escapes an optional value; absent input becomes an empty string.
pub fn escape_optional(text: Option<&str>) -> String {
    text.map(escape_html).unwrap_or_default()
}
