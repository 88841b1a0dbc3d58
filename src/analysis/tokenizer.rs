//! Query tokenizer implementation.
//!
//! The normalization here must match what the external indexer applied at
//! index-build time, otherwise query tokens will never hit the posting
//! lists: lowercase, strip everything outside `[a-z0-9]` and whitespace,
//! split on whitespace, and discard tokens shorter than
//! [`MIN_TOKEN_LENGTH`] characters.

/// Minimum length of a token after normalization.
pub const MIN_TOKEN_LENGTH: usize = 3;

/// A tokenizer that normalizes free-text queries into index terms.
#[derive(Clone, Debug, Default)]
pub struct QueryTokenizer;

impl QueryTokenizer {
    /// Create a new query tokenizer.
    pub fn new() -> Self {
        QueryTokenizer
    }

    /// Tokenize the given text into normalized terms.
    ///
    /// Pure and deterministic, performs no I/O. Empty input, whitespace-only
    /// input, or input whose words are all shorter than the minimum length
    /// yields an empty vector.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
            .collect();

        cleaned
            .split_whitespace()
            .filter(|token| token.len() >= MIN_TOKEN_LENGTH)
            .map(|token| token.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let tokenizer = QueryTokenizer::new();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("   \t\n").is_empty());
    }

    #[test]
    fn test_lowercase_and_strip() {
        let tokenizer = QueryTokenizer::new();
        assert_eq!(tokenizer.tokenize("Cats! 123"), vec!["cats", "123"]);
        assert_eq!(
            tokenizer.tokenize("Hello, World-Wide Web!"),
            vec!["hello", "worldwide", "web"]
        );
    }

    #[test]
    fn test_short_tokens_dropped() {
        let tokenizer = QueryTokenizer::new();
        assert!(tokenizer.tokenize("a an to").is_empty());
        assert_eq!(tokenizer.tokenize("a cat ran far"), vec!["cat", "ran", "far"]);
    }

    #[test]
    fn test_output_alphabet() {
        let tokenizer = QueryTokenizer::new();
        let tokens = tokenizer.tokenize("Ünïcödé text & 42,000 emoji 🦀 rustlang");
        for token in &tokens {
            assert!(token.len() >= MIN_TOKEN_LENGTH);
            assert!(
                token
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
                "token {token:?} escaped normalization"
            );
        }
    }

    #[test]
    fn test_punctuation_removed_not_replaced() {
        let tokenizer = QueryTokenizer::new();
        // Stripping must not introduce a word boundary.
        assert_eq!(tokenizer.tokenize("don't"), vec!["dont"]);
    }
}
