//! HTML helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Decode character references in HTML text or attribute values
pub fn html_unescape(s: &str) -> String {
    ::html_escape::decode_html_entities(s).into_owned()
}
