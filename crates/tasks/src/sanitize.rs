//! Text sanitization for user-supplied fields.

/// Escape `<` and `>` so stored text cannot carry markup.
pub fn strip_html(input: &str) -> String {
    input.replace('<', "&lt;").replace('>', "&gt;")
}

/// Escape LIKE wildcards (`%`, `_`) and the escape character itself.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Markup-escape and trim. Apply to every user-provided text field before
/// it is persisted or compared.
pub fn sanitize_text(input: &str) -> String {
    strip_html(input).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_trims() {
        assert_eq!(sanitize_text("  <b>hi</b> "), "&lt;b&gt;hi&lt;/b&gt;");
    }

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like(r"50%_off\"), r"50\%\_off\\");
    }
}
