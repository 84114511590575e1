/// Returns the portion of `current` that has not been spoken yet, by prefix
/// comparison against `previous`.
///
/// If `previous` is empty the whole string is new. If `current` extends
/// `previous` the remainder after the shared prefix is new. Otherwise the
/// translation was reworded and the whole string is returned; repeating
/// already-spoken content is accepted over attempting a semantic diff.
pub fn extract_delta<'a>(current: &'a str, previous: &str) -> &'a str {
    if previous.is_empty() {
        return current;
    }

    if let Some(suffix) = current.strip_prefix(previous) {
        return suffix;
    }

    current
}

/// True when the text contains nothing but whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_delta_with_empty_previous() {
        assert_eq!(extract_delta("Hello", ""), "Hello");
        assert_eq!(extract_delta("", ""), "");
    }

    #[test]
    fn test_delta_of_extended_translation() {
        assert_eq!(
            extract_delta("Hello, how are you?", "Hello"),
            ", how are you?"
        );
        assert_eq!(extract_delta("abc", "abc"), "");
    }

    #[test]
    fn test_reworded_translation_returns_everything() {
        assert_eq!(
            extract_delta("Hi, how's it going?", "Hello"),
            "Hi, how's it going?"
        );
        // Previous longer than current is also a rewording.
        assert_eq!(extract_delta("Hi", "Hi there"), "Hi");
    }

    #[test]
    fn test_prefix_comparison_is_exact() {
        // Case differences are not a prefix match.
        assert_eq!(extract_delta("hello world", "Hello"), "hello world");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("  \t\n"));
        assert!(!is_blank(" a "));
    }
}
