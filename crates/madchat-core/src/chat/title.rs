//! Conversation title derivation.
//!
//! Titles are taken verbatim from the first user message, so two
//! conversations opened with the same text share a title (and therefore
//! a history). Uniqueness is not enforced.

/// Maximum number of characters kept from the first message.
pub const TITLE_MAX_CHARS: usize = 20;

/// Marker appended to truncated titles.
pub const ELLIPSIS: &str = "...";

/// Derive a conversation title from the first user message.
///
/// Returns the message unchanged when it has at most 20 characters,
/// otherwise its first 20 characters followed by `...`. Characters are
/// counted as Unicode scalar values so multi-byte text is never split.
pub fn generate_title(first_user_message: &str) -> String {
    match first_user_message.char_indices().nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &first_user_message[..cut]),
        None => first_user_message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_unchanged() {
        assert_eq!(generate_title("hello"), "hello");
    }

    #[test]
    fn test_exactly_twenty_chars_unchanged() {
        let msg = "abcdefghijklmnopqrst";
        assert_eq!(msg.chars().count(), 20);
        assert_eq!(generate_title(msg), msg);
    }

    #[test]
    fn test_long_message_truncated() {
        let msg = "why is the sky so blue";
        assert_eq!(msg.chars().count(), 22);
        assert_eq!(generate_title(msg), "why is the sky so bl...");
    }

    #[test]
    fn test_twenty_five_chars() {
        let msg = "0123456789abcdefghijKLMNO";
        assert_eq!(generate_title(msg), "0123456789abcdefghij...");
    }

    #[test]
    fn test_multibyte_not_split() {
        let msg = "äöüäöüäöüäöüäöüäöüäöüä";
        let title = generate_title(msg);
        assert_eq!(title.chars().count(), 23);
        assert!(title.ends_with("..."));
    }
}
