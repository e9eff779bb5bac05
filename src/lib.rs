//! # kerf
//!
//! Token-budget text and code chunking for retrieval pipelines.
//!
//! ## The Problem
//!
//! Embedding models have context windows. Documents don't fit. You need
//! to split them into pieces small enough to embed and retrieve, but
//! large enough to preserve meaning. And the budget that matters is
//! *tokens*, not characters, because that is what the model counts.
//!
//! This sounds trivial until you meet the details:
//!
//! - A split mid-sentence is garbage for retrieval
//! - A code block split mid-function is useless
//! - Chunk boundaries must honor the budget without starving chunks
//! - Positions must survive the trip, or citations point nowhere
//!
//! ## Chunking Strategies
//!
//! ### Sentence-Based
//!
//! Split on sentence delimiters, then pack consecutive sentences into
//! chunks that fit a token budget.
//!
//! ```text
//! Token counts: [3, 5, 2, 8, 1]   Budget: 10
//!
//! Chunk 0: [3, 5, 2]  = 10  <- exact fits are taken
//! Chunk 1: [8, 1]     =  9
//! ```
//!
//! Packing works over a prefix-sum array with binary search, so each
//! boundary costs O(log n) rather than a scan. Optional overlap repeats
//! trailing sentences at the start of the next chunk; an optional
//! minimum forces short sentences together even when the budget alone
//! would split them.
//!
//! **When to use**: prose, articles, documentation.
//!
//! ### Syntax-Tree
//!
//! Parse source code, then group sibling nodes into budget-sized chunks,
//! recursing into nodes too large to keep whole.
//!
//! ```text
//! source_file
//! ├── use_declaration      (3 tokens)  ┐ chunk 0
//! ├── function_item        (40 tokens) ┘
//! ├── impl_item            (300 tokens) -> recurse into members
//! └── function_item        (25 tokens)   chunk N
//! ```
//!
//! Chunk texts concatenate back to the source byte-for-byte: whitespace
//! and comments between nodes travel with the preceding chunk.
//!
//! **When to use**: source code, config files, anything with a grammar.
//!
//! The parser is pluggable through [`SourceParser`]. [`LineParser`]
//! ships as a grammar-free fallback; the `code` feature adds a
//! tree-sitter backend with Rust, Python, TypeScript, and Go grammars.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use kerf::{Chunker, SentenceChunker, WordCounter};
//!
//! # fn main() -> kerf::Result<()> {
//! let chunker = SentenceChunker::new(Arc::new(WordCounter), 64)?.with_overlap(8)?;
//!
//! let out = chunker.chunk("Retrieval wants context. Context wants boundaries. \
//!     Boundaries want budgets.");
//!
//! for chunk in &out.chunks {
//!     println!("[{}..{}] {} tokens", chunk.start, chunk.end, chunk.token_count);
//! }
//! assert!(out.is_clean());
//! # Ok(())
//! # }
//! ```
//!
//! ## Tokenizers
//!
//! Budgets are enforced through the [`TokenCounter`] seam. Wire up a real
//! model tokenizer by implementing it (or by passing a closure); the
//! bundled [`CharacterCounter`], [`WordCounter`], and [`HeuristicCounter`]
//! cover the no-model case.
//!
//! ## Diagnostics, Not Logs
//!
//! Chunking never fails after construction. Conditions worth knowing
//! about (an undersized final chunk, a dropped node group, lossy UTF-8
//! decoding, a parser that returned nothing) come back as [`Warning`]s
//! on the [`Chunked`] result, so library users decide what is worth
//! surfacing.

mod chunk;
mod code;
mod error;
mod sentence;
mod split;
mod token;
mod tree;

#[cfg(feature = "code")]
mod treesitter;

pub use chunk::{Chunked, CodeChunk, NodeSpan, Sentence, SentenceChunk};
pub use code::CodeChunker;
pub use error::{Error, Result, Warning};
pub use sentence::SentenceChunker;
pub use split::{split_sentences, IncludeDelim, DEFAULT_DELIMITERS};
pub use token::{CharacterCounter, HeuristicCounter, TokenCounter, WordCounter};
pub use tree::{LineParser, NodeId, SourceParser, SyntaxTree};

#[cfg(feature = "code")]
pub use treesitter::{CodeLanguage, TreeSitterParser};

/// A chunking strategy.
///
/// Both chunkers implement this trait, enabling generic usage:
///
/// ```rust
/// use std::sync::Arc;
/// use kerf::{CharacterCounter, Chunker, CodeChunker, LineParser, SentenceChunker};
///
/// fn chunk_document<C: Chunker>(chunker: &C, text: &str) -> Vec<C::Chunk> {
///     chunker.chunk(text).into_chunks()
/// }
///
/// # fn main() -> kerf::Result<()> {
/// let counter = Arc::new(CharacterCounter);
/// let prose = SentenceChunker::new(counter.clone(), 80)?;
/// let code = CodeChunker::new(counter, Arc::new(LineParser), 80)?;
///
/// let text = "Split me. Keep my offsets.";
/// assert!(!chunk_document(&prose, text).is_empty());
/// assert!(!chunk_document(&code, text).is_empty());
/// # Ok(())
/// # }
/// ```
pub trait Chunker: Send + Sync {
    /// The chunk record this strategy produces.
    type Chunk;

    /// Split text into chunks.
    ///
    /// Returns the chunks together with any [`Warning`]s raised along
    /// the way. Empty or whitespace-only input yields no chunks.
    fn chunk(&self, text: &str) -> Chunked<Self::Chunk>;

    /// Split text into chunk texts only, dropping positions and
    /// provenance.
    fn chunk_texts(&self, text: &str) -> Chunked<String>;

    /// Estimate the number of chunks for a given text length.
    ///
    /// Useful for pre-allocation. May be approximate.
    fn estimate_chunks(&self, text_len: usize) -> usize {
        (text_len / 500).max(1)
    }
}
