//! Chunk records produced by the chunkers.

use crate::error::Warning;

/// A sentence with its position and token count.
///
/// Sentences are the units a [`SentenceChunk`] is packed from. Their
/// offsets accumulate across the split output, so consecutive sentences
/// are contiguous: each one starts where the previous one ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// The sentence text, delimiter included when so configured.
    pub text: String,
    /// Byte offset where this sentence starts.
    pub start: usize,
    /// Byte offset where this sentence ends (exclusive).
    pub end: usize,
    /// Token count reported by the counter.
    pub token_count: usize,
}

impl Sentence {
    /// Create a new sentence record.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize, end: usize, token_count: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            token_count,
        }
    }

    /// The length of this sentence in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether this sentence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A chunk of prose with its position in the original document.
///
/// ## Byte Offsets
///
/// `start` and `end` are byte offsets, not character indices. This matches
/// Rust's string slicing semantics:
///
/// ```rust
/// use std::sync::Arc;
/// use kerf::{Chunker, SentenceChunker, WordCounter};
///
/// # fn main() -> kerf::Result<()> {
/// let text = "Pack my box. Judge my vow.";
/// let chunker = SentenceChunker::new(Arc::new(WordCounter), 3)?.with_min_characters(1)?;
/// let out = chunker.chunk(text);
///
/// for chunk in &out.chunks {
///     assert_eq!(&text[chunk.start..chunk.end], chunk.text);
/// }
/// # Ok(())
/// # }
/// ```
///
/// With the default delimiter mode the offsets index the original
/// document. When delimiters are dropped ([`IncludeDelim::Omit`]), the
/// output is shorter than the input and offsets index the concatenation
/// of sentence texts instead.
///
/// ## Overlap Handling
///
/// When overlap is configured, adjacent chunks share trailing sentences:
///
/// ```text
/// Sentences:  [S0] [S1] [S2] [S3] [S4]
/// Chunk 0:    [S0  S1  S2]
/// Chunk 1:            [S2  S3  S4]   <- S2 repeated for continuity
/// ```
///
/// [`IncludeDelim::Omit`]: crate::IncludeDelim::Omit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceChunk {
    /// The chunk text: its sentences concatenated.
    pub text: String,
    /// Byte offset where this chunk starts.
    pub start: usize,
    /// Byte offset where this chunk ends (exclusive).
    pub end: usize,
    /// Total tokens across the chunk's sentences.
    pub token_count: usize,
    /// The sentences this chunk was packed from, in order.
    pub sentences: Vec<Sentence>,
}

impl SentenceChunk {
    /// The length of this chunk in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether this chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The byte span of this chunk.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl std::fmt::Display for SentenceChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SentenceChunk {{ span: {}..{}, tokens: {}, sentences: {} }}",
            self.start,
            self.end,
            self.token_count,
            self.sentences.len()
        )
    }
}

/// Provenance record for one syntax node inside a [`CodeChunk`].
///
/// Spans are byte offsets into the source buffer as reported by the
/// parser, in contrast to chunk offsets, which index the reconstructed
/// output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpan {
    /// The grammar's node kind (empty if the parser reports none).
    pub kind: String,
    /// Byte offset where this node starts in the source buffer.
    pub start: usize,
    /// Byte offset where this node ends (exclusive) in the source buffer.
    pub end: usize,
    /// Token count of the node's span text.
    pub token_count: usize,
}

/// A chunk of source code with the nodes it was grouped from.
///
/// Chunk texts concatenate back to the full source: bytes between
/// adjacent nodes travel with the preceding chunk, the first chunk
/// absorbs anything before its first node, and the last chunk absorbs
/// anything after its last node. `start` and `end` are running byte
/// offsets over the reconstructed texts; for cleanly decoded input they
/// equal offsets into the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeChunk {
    /// The chunk text, gap bytes included.
    pub text: String,
    /// Byte offset where this chunk starts.
    pub start: usize,
    /// Byte offset where this chunk ends (exclusive).
    pub end: usize,
    /// Total tokens across the chunk's nodes (gap bytes uncounted).
    pub token_count: usize,
    /// The syntax nodes this chunk was grouped from, in source order.
    pub nodes: Vec<NodeSpan>,
}

impl CodeChunk {
    /// The length of this chunk in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether this chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The byte span of this chunk.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl std::fmt::Display for CodeChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CodeChunk {{ span: {}..{}, tokens: {}, nodes: {} }}",
            self.start,
            self.end,
            self.token_count,
            self.nodes.len()
        )
    }
}

/// Chunks plus the non-fatal conditions met while producing them.
///
/// Every chunking call returns this carrier. An empty `warnings` vector
/// means the run was clean; otherwise each [`Warning`] describes one
/// condition the chunker recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunked<T> {
    /// The chunks, in source order.
    pub chunks: Vec<T>,
    /// Non-fatal conditions, in the order they were encountered.
    pub warnings: Vec<Warning>,
}

impl<T> Chunked<T> {
    /// A result with no chunks and no warnings.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            chunks: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// The number of chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether there are no chunks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Whether the run produced no warnings.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Discard the warnings and keep the chunks.
    #[must_use]
    pub fn into_chunks(self) -> Vec<T> {
        self.chunks
    }
}

impl<T> Default for Chunked<T> {
    fn default() -> Self {
        Self::empty()
    }
}
