//! Markup escaping.
//!
//! Every piece of data-sourced text that ends up inside markup goes through
//! [`escape`], whether it lands in element content or inside a quoted
//! attribute value.

/// Encode the reserved markup characters of `text`.
///
/// Both quote characters are encoded so the result is safe inside single- or
/// double-quoted attribute values as well as element content.
///
/// # Example
///
/// ```
/// use shelf_core::html::escape;
///
/// assert_eq!(escape("<b>\"Tom\" & 'Jerry'</b>"),
///            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
/// ```
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(escape("Zoom video calls"), "Zoom video calls");
    }

    #[test]
    fn empty_input() {
        assert_eq!(escape(""), "");
    }

    #[test]
    fn script_tag_is_neutralized() {
        assert_eq!(
            escape("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn attribute_breakout_is_neutralized() {
        let escaped = escape("x\" onerror=\"alert(1)");
        assert!(!escaped.contains('"'));
        assert_eq!(escaped, "x&quot; onerror=&quot;alert(1)");
    }

    #[test]
    fn ampersand_is_encoded_first_class() {
        assert_eq!(escape("&amp;"), "&amp;amp;");
    }

    #[test]
    fn non_ascii_passes_through() {
        assert_eq!(escape("Ärzte – ü"), "Ärzte – ü");
    }
}
