/// Longest upstream body kept in an error message.
pub const BODY_SNIPPET_CHARS: usize = 300;

/// Cuts `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some(_) => {
            let keep = max_chars.saturating_sub(3);
            let end = text.char_indices().nth(keep).map_or(text.len(), |(i, _)| i);
            format!("{}...", &text[..end])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate("boom", 10), "boom");
        assert_eq!(truncate("", 10), "");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn long_text_is_cut_to_the_limit() {
        let cut = truncate(&"x".repeat(5000), 100);

        assert_eq!(cut.chars().count(), 100);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn cuts_on_char_boundaries() {
        let cut = truncate(&"価格".repeat(50), 11);

        assert_eq!(cut, "価格価格価格価格...");
    }
}
