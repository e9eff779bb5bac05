//! Token counting.
//!
//! Chunk budgets are expressed in tokens, but every embedding model
//! tokenizes differently. [`TokenCounter`] is the seam: chunkers accept
//! any counter through it, so a real tokenizer can be plugged in without
//! this crate knowing its vocabulary. Three reference counters are
//! provided for use without one.

use unicode_segmentation::UnicodeSegmentation;

/// A token counting backend.
///
/// Chunkers may count every sentence or node in a document, so
/// implementations should be cheap to call. Batch counting defaults to
/// counting each text in turn; backends with a faster bulk path can
/// override it, as long as output order and length match the input.
pub trait TokenCounter: Send + Sync {
    /// Count the tokens in `text`.
    fn count_tokens(&self, text: &str) -> usize;

    /// Count tokens for each text, preserving order and length.
    fn count_tokens_batch(&self, texts: &[&str]) -> Vec<usize> {
        texts.iter().map(|t| self.count_tokens(t)).collect()
    }
}

/// Closures over `&str` can serve directly as counters.
impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count_tokens(&self, text: &str) -> usize {
        self(text)
    }
}

/// Counts one token per Unicode scalar value.
///
/// The strictest reference counter; budgets expressed with it behave
/// like character limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterCounter;

impl TokenCounter for CharacterCounter {
    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count()
    }
}

/// Counts words per Unicode Standard Annex #29.
///
/// Word boundaries handle punctuation, contractions, and non-Latin
/// scripts far better than whitespace splitting. A good default when no
/// model tokenizer is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn count_tokens(&self, text: &str) -> usize {
        text.unicode_words().count()
    }
}

/// Estimates tokens from character length.
///
/// English prose averages roughly four characters per token under common
/// BPE vocabularies; adjust the divisor for denser content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicCounter {
    chars_per_token: usize,
}

impl HeuristicCounter {
    /// Create an estimator assuming `chars_per_token` characters per token.
    ///
    /// # Panics
    ///
    /// Panics if `chars_per_token == 0`.
    #[must_use]
    pub fn new(chars_per_token: usize) -> Self {
        assert!(chars_per_token > 0, "chars_per_token must be > 0");
        Self { chars_per_token }
    }
}

impl Default for HeuristicCounter {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TokenCounter for HeuristicCounter {
    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count().div_ceil(self.chars_per_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_counter_counts_scalars() {
        assert_eq!(CharacterCounter.count_tokens("héllo"), 5);
        assert_eq!(CharacterCounter.count_tokens(""), 0);
    }

    #[test]
    fn word_counter_ignores_punctuation() {
        assert_eq!(WordCounter.count_tokens("Pack my box, please!"), 4);
        assert_eq!(WordCounter.count_tokens("   "), 0);
    }

    #[test]
    fn word_counter_handles_contractions() {
        assert_eq!(WordCounter.count_tokens("don't stop"), 2);
    }

    #[test]
    fn heuristic_counter_rounds_up() {
        let counter = HeuristicCounter::default();
        assert_eq!(counter.count_tokens("abcd"), 1);
        assert_eq!(counter.count_tokens("abcde"), 2);
        assert_eq!(counter.count_tokens(""), 0);
    }

    #[test]
    fn closures_are_counters() {
        let counter = |text: &str| text.len();
        assert_eq!(counter.count_tokens("four"), 4);
    }

    #[test]
    fn batch_preserves_order_and_length() {
        let texts = ["a", "bb ccc", ""];
        let counts = WordCounter.count_tokens_batch(&texts);
        assert_eq!(counts, vec![1, 2, 0]);
    }

    #[test]
    #[should_panic]
    fn zero_divisor_panics() {
        HeuristicCounter::new(0);
    }
}
