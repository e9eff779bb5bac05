//! Sentence-based chunking with a token budget.
//!
//! Splits text on sentence delimiters, then packs consecutive sentences
//! into chunks that fit a token budget.
//!
//! ## The Hard Part: Packing, Not Splitting
//!
//! Once sentences exist, assignment to chunks is a packing problem:
//!
//! ```text
//! Token counts: [3, 5, 2, 8, 1]   Budget: 10
//!
//! Chunk 0: [3, 5, 2]   = 10  <- exact fit taken
//! Chunk 1: [8, 1]      =  9
//! ```
//!
//! Scanning forward one sentence at a time makes each chunk O(n); over a
//! prefix-sum array the same boundary is a single binary search. The
//! packer builds `sums[i]` = tokens in the first `i` sentences, then per
//! chunk finds the largest boundary whose window still fits the budget.
//!
//! ## Overlap
//!
//! Overlap is sentence-granular: the next chunk re-starts at a sentence
//! the previous chunk already included. The walk-back accumulates
//! trailing sentence counts plus one spacing token per sentence and
//! stops before it would exceed the configured overlap, so the overlap
//! budget is an upper bound, never a promise.
//!
//! ## Why a Minimum Sentence Count?
//!
//! Single sentences are often too short for effective retrieval. A
//! question like "What did the author conclude?" needs paragraph-level
//! context. The minimum forces small sentences together even when the
//! budget alone would split them.

use std::sync::Arc;

use crate::chunk::{Chunked, Sentence, SentenceChunk};
use crate::error::{Error, Result, Warning};
use crate::split::{split_sentences, IncludeDelim, DEFAULT_DELIMITERS};
use crate::token::TokenCounter;
use crate::Chunker;

/// Sentence-based chunker with a token budget.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use kerf::{Chunker, SentenceChunker, WordCounter};
///
/// # fn main() -> kerf::Result<()> {
/// let chunker = SentenceChunker::new(Arc::new(WordCounter), 8)?;
/// let text = "The quick brown fox jumps. Pack my box with jugs. Judge my vow.";
/// let out = chunker.chunk(text);
///
/// assert!(out.is_clean());
/// for chunk in &out.chunks {
///     assert!(chunk.token_count <= 8);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SentenceChunker {
    counter: Arc<dyn TokenCounter>,
    chunk_size: usize,
    chunk_overlap: usize,
    min_sentences: usize,
    min_characters: usize,
    delimiters: Vec<String>,
    include_delim: IncludeDelim,
}

impl SentenceChunker {
    /// Create a sentence chunker with a token budget of `chunk_size`.
    ///
    /// Defaults: no overlap, at least 1 sentence per chunk, sentences of
    /// at least 12 characters, splitting on [`DEFAULT_DELIMITERS`] with
    /// the delimiter kept on the preceding sentence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] if `chunk_size == 0`.
    pub fn new(counter: Arc<dyn TokenCounter>, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidChunkSize(chunk_size));
        }
        Ok(Self {
            counter,
            chunk_size,
            chunk_overlap: 0,
            min_sentences: 1,
            min_characters: 12,
            delimiters: DEFAULT_DELIMITERS.iter().map(|d| (*d).to_string()).collect(),
            include_delim: IncludeDelim::Prev,
        })
    }

    /// Overlap consecutive chunks by up to `chunk_overlap` tokens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OverlapExceedsSize`] if `chunk_overlap` is not
    /// strictly less than the chunk size.
    pub fn with_overlap(mut self, chunk_overlap: usize) -> Result<Self> {
        if chunk_overlap >= self.chunk_size {
            return Err(Error::OverlapExceedsSize {
                size: self.chunk_size,
                overlap: chunk_overlap,
            });
        }
        self.chunk_overlap = chunk_overlap;
        Ok(self)
    }

    /// Require at least `min_sentences` sentences per chunk.
    ///
    /// The minimum wins over the token budget; only the final chunk of a
    /// document may fall short, with [`Warning::UnmetMinimum`] reported.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMinSentences`] if `min_sentences == 0`.
    pub fn with_min_sentences(mut self, min_sentences: usize) -> Result<Self> {
        if min_sentences == 0 {
            return Err(Error::InvalidMinSentences(min_sentences));
        }
        self.min_sentences = min_sentences;
        Ok(self)
    }

    /// Merge split fragments shorter than `min_characters` characters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMinCharacters`] if `min_characters == 0`.
    pub fn with_min_characters(mut self, min_characters: usize) -> Result<Self> {
        if min_characters == 0 {
            return Err(Error::InvalidMinCharacters(min_characters));
        }
        self.min_characters = min_characters;
        Ok(self)
    }

    /// Split on `delimiters`, placing each match per `include_delim`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDelimiters`] for an empty list and
    /// [`Error::EmptyDelimiter`] if any delimiter is the empty string.
    pub fn with_delimiters(
        mut self,
        delimiters: &[&str],
        include_delim: IncludeDelim,
    ) -> Result<Self> {
        if delimiters.is_empty() {
            return Err(Error::NoDelimiters);
        }
        if delimiters.iter().any(|d| d.is_empty()) {
            return Err(Error::EmptyDelimiter);
        }
        self.delimiters = delimiters.iter().map(|d| (*d).to_string()).collect();
        self.include_delim = include_delim;
        Ok(self)
    }

    /// The configured token budget.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// The configured overlap budget.
    #[must_use]
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split the text and attach offsets and token counts.
    ///
    /// Offsets accumulate across sentences, so each sentence starts where
    /// the previous one ended. All sentences are counted in one batch
    /// call so backends can amortize per-call overhead.
    fn sentences(&self, text: &str) -> Vec<Sentence> {
        let pieces = split_sentences(
            text,
            &self.delimiters,
            self.include_delim,
            self.min_characters,
        );
        let refs: Vec<&str> = pieces.iter().map(String::as_str).collect();
        let counts = self.counter.count_tokens_batch(&refs);

        let mut sentences = Vec::with_capacity(pieces.len());
        let mut offset = 0;
        for (piece, count) in pieces.into_iter().zip(counts) {
            let end = offset + piece.len();
            sentences.push(Sentence::new(piece, offset, end, count));
            offset = end;
        }
        sentences
    }

    /// Pack sentences into chunks against the token budget.
    fn pack(&self, sentences: &[Sentence]) -> Chunked<SentenceChunk> {
        let n = sentences.len();
        let mut sums = Vec::with_capacity(n + 1);
        sums.push(0usize);
        for sentence in sentences {
            sums.push(sums[sums.len() - 1] + sentence.token_count);
        }

        let mut chunks = Vec::new();
        let mut warnings = Vec::new();
        let mut pos = 0;

        while pos < n {
            // Largest boundary whose window still fits; an exact fit is
            // taken, and at least one sentence always advances.
            let target = sums[pos] + self.chunk_size;
            let mut split = sums.partition_point(|&sum| sum <= target) - 1;
            split = split.max(pos + 1);

            if split - pos < self.min_sentences {
                if pos + self.min_sentences <= n {
                    split = pos + self.min_sentences;
                } else {
                    warnings.push(Warning::UnmetMinimum {
                        minimum: self.min_sentences,
                        actual: n - pos,
                    });
                    split = n;
                }
            }

            chunks.push(assemble(&sentences[pos..split]));

            if self.chunk_overlap > 0 && split < n {
                // Walk back over trailing sentences, costing each its
                // count plus one spacing token, stopping before the
                // accumulation would exceed the overlap budget.
                let mut overlap_idx = split - 1;
                let mut overlap_tokens = 0;
                while overlap_idx > pos {
                    let widened = overlap_tokens + sentences[overlap_idx].token_count + 1;
                    if widened > self.chunk_overlap {
                        break;
                    }
                    overlap_tokens = widened;
                    overlap_idx -= 1;
                }
                pos = overlap_idx + 1;
            } else {
                pos = split;
            }
        }

        Chunked { chunks, warnings }
    }
}

/// Build one chunk from a non-empty run of sentences.
fn assemble(sentences: &[Sentence]) -> SentenceChunk {
    let text: String = sentences.iter().map(|s| s.text.as_str()).collect();
    SentenceChunk {
        start: sentences[0].start,
        end: sentences[sentences.len() - 1].end,
        token_count: sentences.iter().map(|s| s.token_count).sum(),
        sentences: sentences.to_vec(),
        text,
    }
}

impl std::fmt::Debug for SentenceChunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceChunker")
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("min_sentences", &self.min_sentences)
            .field("min_characters", &self.min_characters)
            .field("delimiters", &self.delimiters)
            .field("include_delim", &self.include_delim)
            .finish_non_exhaustive()
    }
}

impl Chunker for SentenceChunker {
    type Chunk = SentenceChunk;

    fn chunk(&self, text: &str) -> Chunked<SentenceChunk> {
        if text.trim().is_empty() {
            return Chunked::empty();
        }
        let sentences = self.sentences(text);
        if sentences.is_empty() {
            return Chunked::empty();
        }
        self.pack(&sentences)
    }

    fn chunk_texts(&self, text: &str) -> Chunked<String> {
        let Chunked { chunks, warnings } = self.chunk(text);
        Chunked {
            chunks: chunks.into_iter().map(|c| c.text).collect(),
            warnings,
        }
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        // Assume ~4 bytes per token.
        (text_len / (self.chunk_size * 4)).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{CharacterCounter, WordCounter};

    fn word_chunker(chunk_size: usize) -> SentenceChunker {
        SentenceChunker::new(Arc::new(WordCounter), chunk_size).unwrap()
    }

    #[test]
    fn exact_fit_is_kept_whole() {
        // Sentence token counts [3, 5, 2] against a budget of 10.
        let text = "one two three. four five six seven eight. nine ten.";
        let out = word_chunker(10).chunk(text);

        assert_eq!(out.chunks.len(), 1);
        assert_eq!(out.chunks[0].token_count, 10);
        assert_eq!(out.chunks[0].sentences.len(), 3);
        assert!(out.is_clean());
    }

    #[test]
    fn budget_splits_where_sum_would_exceed() {
        // Counts [3, 5, 2] with budget 9: 3+5=8 fits, 8+2 would not.
        let text = "one two three. four five six seven eight. nine ten.";
        let out = word_chunker(9).chunk(text);

        assert_eq!(out.chunks.len(), 2);
        assert_eq!(out.chunks[0].token_count, 8);
        assert_eq!(out.chunks[1].token_count, 2);
    }

    #[test]
    fn chunks_concatenate_to_input() {
        let text = "First sentence here. Second sentence there! Third one? Last bit.";
        let out = word_chunker(5).chunk(text);

        let rebuilt: String = out.chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn offsets_index_the_original_text() {
        let text = "Pack my box with five dozen jugs. Judge my vow tonight, quickly.";
        let out = word_chunker(7).chunk(text);

        assert!(out.chunks.len() > 1);
        for chunk in &out.chunks {
            assert_eq!(&text[chunk.start..chunk.end], chunk.text);
            for sentence in &chunk.sentences {
                assert_eq!(&text[sentence.start..sentence.end], sentence.text);
            }
        }
    }

    #[test]
    fn oversized_sentence_becomes_its_own_chunk() {
        let text = "a b c d e f g h i j k l m n o p. tiny tail here.";
        let out = word_chunker(4).chunk(text);

        assert_eq!(out.chunks[0].sentences.len(), 1);
        assert!(out.chunks[0].token_count > 4);
        assert!(out.is_clean());
    }

    #[test]
    fn minimum_sentences_beats_the_budget() {
        let chunker = word_chunker(3).with_min_sentences(2).unwrap();
        let text = "alpha beta gamma. delta epsilon zeta. eta theta iota. kappa lambda mu.";
        let out = chunker.chunk(text);

        assert_eq!(out.chunks.len(), 2);
        for chunk in &out.chunks {
            assert_eq!(chunk.sentences.len(), 2);
            assert!(chunk.token_count > 3);
        }
        assert!(out.is_clean());
    }

    #[test]
    fn short_tail_warns_about_unmet_minimum() {
        let chunker = word_chunker(100).with_min_sentences(3).unwrap();
        let text = "only two sentences here. nothing more follows.";
        let out = chunker.chunk(text);

        assert_eq!(out.chunks.len(), 1);
        assert_eq!(out.chunks[0].sentences.len(), 2);
        assert_eq!(
            out.warnings,
            vec![Warning::UnmetMinimum {
                minimum: 3,
                actual: 2
            }]
        );
    }

    #[test]
    fn overlap_repeats_trailing_sentences() {
        // Counts [2, 2, 2, 2, 2]; budget 6 packs three sentences, and an
        // overlap of 3 affords exactly one walk-back (2 + 1 spacing).
        let chunker = word_chunker(6)
            .with_overlap(3)
            .unwrap()
            .with_min_characters(1)
            .unwrap();
        let text = "aa bb. cc dd. ee ff. gg hh. ii jj.";
        let out = chunker.chunk(text);

        assert!(out.chunks.len() >= 2);
        let first = &out.chunks[0];
        let second = &out.chunks[1];
        assert_eq!(first.sentences.len(), 3);
        assert!(second.start < first.end);
        assert_eq!(second.sentences[0], first.sentences[2]);
    }

    #[test]
    fn zero_overlap_chunks_are_contiguous() {
        let text = "Pack my box with five dozen jugs. Judge my vow. Bright vixens jump for the quiz.";
        let out = word_chunker(6).chunk(text);

        assert!(out.chunks.len() > 1);
        assert_eq!(out.chunks[0].start, 0);
        for pair in out.chunks.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(out.chunks[out.chunks.len() - 1].end, text.len());
    }

    #[test]
    fn empty_and_whitespace_input_produce_no_chunks() {
        let chunker = word_chunker(10);
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("   \n\t  ").is_empty());
    }

    #[test]
    fn character_budget_with_character_counter() {
        let chunker = SentenceChunker::new(Arc::new(CharacterCounter), 40).unwrap();
        let text = "A first little sentence. And a second one. Then the third arrives.";
        let out = chunker.chunk(text);

        for chunk in &out.chunks {
            assert!(chunk.token_count <= 40 || chunk.sentences.len() == 1);
        }
        let rebuilt: String = out.chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn omit_mode_offsets_index_the_concatenation() {
        let chunker = word_chunker(4)
            .with_delimiters(&["."], IncludeDelim::Omit)
            .unwrap()
            .with_min_characters(1)
            .unwrap();
        let text = "aa bb. cc dd. ee ff.";
        let out = chunker.chunk(text);

        let rebuilt: String = out.chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(rebuilt, text.replace('.', ""));
        for chunk in &out.chunks {
            assert_eq!(&rebuilt[chunk.start..chunk.end], chunk.text);
        }
    }

    #[test]
    fn closure_counter_drives_the_budget() {
        let counter = Arc::new(|text: &str| text.split_whitespace().count());
        let chunker = SentenceChunker::new(counter, 6).unwrap();
        let out = chunker.chunk("one two three. four five six. seven eight nine.");

        assert_eq!(out.chunks.len(), 2);
        assert_eq!(out.chunks[0].token_count, 6);
    }

    #[test]
    fn config_validation_rejects_bad_values() {
        assert!(matches!(
            SentenceChunker::new(Arc::new(WordCounter), 0),
            Err(Error::InvalidChunkSize(0))
        ));
        assert!(matches!(
            word_chunker(5).with_overlap(5),
            Err(Error::OverlapExceedsSize {
                size: 5,
                overlap: 5
            })
        ));
        assert!(matches!(
            word_chunker(5).with_min_sentences(0),
            Err(Error::InvalidMinSentences(0))
        ));
        assert!(matches!(
            word_chunker(5).with_min_characters(0),
            Err(Error::InvalidMinCharacters(0))
        ));
        assert!(matches!(
            word_chunker(5).with_delimiters(&[], IncludeDelim::Prev),
            Err(Error::NoDelimiters)
        ));
        assert!(matches!(
            word_chunker(5).with_delimiters(&[".", ""], IncludeDelim::Prev),
            Err(Error::EmptyDelimiter)
        ));
    }

    #[test]
    fn chunk_texts_matches_chunk() {
        let chunker = word_chunker(6);
        let text = "Pack my box. Judge my vow. Bright vixens jump.";

        let full = chunker.chunk(text);
        let texts = chunker.chunk_texts(text);
        let expected: Vec<String> = full.chunks.iter().map(|c| c.text.clone()).collect();
        assert_eq!(texts.chunks, expected);
        assert_eq!(texts.warnings, full.warnings);
    }

    #[test]
    fn chunking_is_deterministic() {
        let chunker = word_chunker(7).with_overlap(3).unwrap();
        let text = "Some repeated input. With several sentences. To chunk twice. And compare.";

        assert_eq!(chunker.chunk(text), chunker.chunk(text));
    }
}
