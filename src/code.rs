//! Structure-aware code chunking.
//!
//! Walks a parsed [`SyntaxTree`] and packs sibling nodes into
//! token-budget groups, recursing into nodes too large to keep whole.
//!
//! ## Two Passes Per Level
//!
//! Grouping alone leaves money on the table. Recursion boundaries cut
//! greedily, so a big node's trailing fragment and the next sibling can
//! end up in separate undersized groups even when they would fit
//! together:
//!
//! ```text
//! Budget 6      greedy:  [5] [2] [1]
//!               merged:  [5] [2 1]     <- second pass coalesces
//! ```
//!
//! The first pass packs a level's children greedily, recursing into any
//! child too large to keep whole; the second pass re-packs that level's
//! groups with the same prefix-sum search the sentence packer uses.
//! Both passes run at every level of the recursion, so the fragments of
//! an oversized child coalesce inside it and reach the parent's pass as
//! finished groups.
//!
//! ## Reconstruction
//!
//! Chunk texts must concatenate back to the source, but node spans do
//! not cover it: whitespace and comments fall between siblings. Each
//! chunk therefore extends to the start of the next chunk's first node,
//! the first chunk absorbs leading bytes, and the last chunk absorbs
//! trailing bytes.

use std::borrow::Cow;
use std::sync::Arc;

use crate::chunk::{Chunked, CodeChunk, NodeSpan};
use crate::error::{Error, Result, Warning};
use crate::token::TokenCounter;
use crate::tree::{NodeId, SourceParser, SyntaxTree};
use crate::Chunker;

/// A node scheduled into a group, with its span's token count.
#[derive(Debug, Clone, Copy)]
struct Item {
    node: NodeId,
    tokens: usize,
}

/// Structure-aware chunker over a pluggable parser.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use kerf::{Chunker, CodeChunker, CharacterCounter, LineParser};
///
/// # fn main() -> kerf::Result<()> {
/// let chunker = CodeChunker::new(Arc::new(CharacterCounter), Arc::new(LineParser), 16)?;
/// let source = "fn a() {}\nfn b() {}\nfn c() {}\n";
/// let out = chunker.chunk(source);
///
/// let rebuilt: String = out.chunks.iter().map(|c| c.text.as_str()).collect();
/// assert_eq!(rebuilt, source);
/// # Ok(())
/// # }
/// ```
pub struct CodeChunker {
    counter: Arc<dyn TokenCounter>,
    parser: Arc<dyn SourceParser>,
    chunk_size: usize,
}

impl CodeChunker {
    /// Create a code chunker with a token budget of `chunk_size`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] if `chunk_size == 0`.
    pub fn new(
        counter: Arc<dyn TokenCounter>,
        parser: Arc<dyn SourceParser>,
        chunk_size: usize,
    ) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidChunkSize(chunk_size));
        }
        Ok(Self {
            counter,
            parser,
            chunk_size,
        })
    }

    /// The configured token budget.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Chunk a byte buffer.
    ///
    /// The grouping pipeline is defined over bytes because parsers
    /// report byte spans; [`Chunker::chunk`] delegates here. Blank
    /// input yields no chunks, judged on Unicode whitespace when the
    /// buffer is valid UTF-8 and on ASCII whitespace otherwise.
    /// Invalid UTF-8 is replaced during reconstruction and reported as
    /// [`Warning::LossyDecode`].
    pub fn chunk_bytes(&self, source: &[u8]) -> Chunked<CodeChunk> {
        let blank = match std::str::from_utf8(source) {
            Ok(text) => text.trim().is_empty(),
            Err(_) => source.trim_ascii().is_empty(),
        };
        if blank {
            return Chunked::empty();
        }

        let mut warnings = Vec::new();
        let Some(tree) = self.parser.parse(source) else {
            warnings.push(Warning::ParseFailed);
            return Chunked {
                chunks: Vec::new(),
                warnings,
            };
        };

        let root = tree.root();
        if tree.children(root).is_empty() {
            return self.atomic_chunk(&tree, source, warnings);
        }

        let (groups, counts) = self.group_children(&tree, source, root);
        self.build_chunks(&tree, source, groups, counts, warnings)
    }

    /// One chunk holding the entire input, for trees that expose no
    /// children to group.
    fn atomic_chunk(
        &self,
        tree: &SyntaxTree,
        source: &[u8],
        mut warnings: Vec<Warning>,
    ) -> Chunked<CodeChunk> {
        let root = tree.root();
        let text = decode(source, 0, source.len(), &mut warnings);
        let token_count = self.counter.count_tokens(&text);
        let end = text.len();
        Chunked {
            chunks: vec![CodeChunk {
                nodes: vec![NodeSpan {
                    kind: tree.kind(root).to_string(),
                    start: tree.start(root),
                    end: tree.end(root),
                    token_count: self.count_span(tree, source, root),
                }],
                text,
                start: 0,
                end,
                token_count,
            }],
            warnings,
        }
    }

    /// Group one tree level: pack `node`'s children greedily, recursing
    /// into any child too large to keep whole, then coalesce this
    /// level's groups before handing them up. An oversized child with
    /// no children of its own becomes a group by itself; a recursed
    /// child splices in its already-coalesced groups and counts.
    fn group_children(
        &self,
        tree: &SyntaxTree,
        source: &[u8],
        node: NodeId,
    ) -> (Vec<Vec<Item>>, Vec<usize>) {
        let mut groups: Vec<Vec<Item>> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();
        let mut current: Vec<Item> = Vec::new();
        let mut current_tokens = 0;

        for &child in tree.children(node) {
            let tokens = self.count_span(tree, source, child);
            if tokens > self.chunk_size {
                if !current.is_empty() {
                    groups.push(std::mem::take(&mut current));
                    counts.push(current_tokens);
                    current_tokens = 0;
                }
                if tree.children(child).is_empty() {
                    groups.push(vec![Item {
                        node: child,
                        tokens,
                    }]);
                    counts.push(tokens);
                } else {
                    let (child_groups, child_counts) = self.group_children(tree, source, child);
                    groups.extend(child_groups);
                    counts.extend(child_counts);
                }
            } else if current_tokens + tokens > self.chunk_size {
                groups.push(std::mem::replace(
                    &mut current,
                    vec![Item {
                        node: child,
                        tokens,
                    }],
                ));
                counts.push(current_tokens);
                current_tokens = tokens;
            } else {
                current.push(Item {
                    node: child,
                    tokens,
                });
                current_tokens += tokens;
            }
        }

        if !current.is_empty() {
            groups.push(current);
            counts.push(current_tokens);
        }
        self.merge_groups(groups, counts)
    }

    /// Coalesce one level's adjacent groups while their combined count
    /// fits the budget. A group that alone exceeds the budget passes
    /// through unmerged.
    fn merge_groups(
        &self,
        mut groups: Vec<Vec<Item>>,
        counts: Vec<usize>,
    ) -> (Vec<Vec<Item>>, Vec<usize>) {
        let n = groups.len();
        let mut sums = Vec::with_capacity(n + 1);
        sums.push(0usize);
        for &count in &counts {
            sums.push(sums[sums.len() - 1] + count);
        }

        let mut merged = Vec::new();
        let mut merged_counts = Vec::new();
        let mut pos = 0;
        while pos < n {
            let target = sums[pos] + self.chunk_size;
            let mut index = sums.partition_point(|&sum| sum <= target) - 1;
            if index == pos {
                index = pos + 1;
            }

            let mut flat = Vec::new();
            for group in &mut groups[pos..index] {
                flat.append(group);
            }
            merged.push(flat);
            merged_counts.push(sums[index] - sums[pos]);
            pos = index;
        }
        (merged, merged_counts)
    }

    /// Token count of a node's span text, decoded leniently.
    fn count_span(&self, tree: &SyntaxTree, source: &[u8], node: NodeId) -> usize {
        let span = tree.span(node);
        let start = span.start.min(source.len());
        let end = span.end.min(source.len()).max(start);
        self.counter
            .count_tokens(&String::from_utf8_lossy(&source[start..end]))
    }

    /// Validate groups, attribute gap bytes, and assemble chunks.
    ///
    /// Groups whose span falls outside the buffer are dropped together
    /// with their counts, so surviving texts still concatenate to the
    /// whole buffer.
    fn build_chunks(
        &self,
        tree: &SyntaxTree,
        source: &[u8],
        groups: Vec<Vec<Item>>,
        counts: Vec<usize>,
        mut warnings: Vec<Warning>,
    ) -> Chunked<CodeChunk> {
        let mut survivors: Vec<(Vec<Item>, usize)> = Vec::with_capacity(groups.len());
        for (group, count) in groups.into_iter().zip(counts) {
            let start = tree.start(group[0].node);
            let end = tree.end(group[group.len() - 1].node);
            if start > end || end > source.len() {
                warnings.push(Warning::SkippedGroup { start, end });
                continue;
            }
            survivors.push((group, count));
        }
        if survivors.is_empty() {
            return Chunked {
                chunks: Vec::new(),
                warnings,
            };
        }

        let mut chunks = Vec::with_capacity(survivors.len());
        let mut offset = 0;
        for (i, (group, count)) in survivors.iter().enumerate() {
            let text_start = if i == 0 {
                0
            } else {
                tree.start(group[0].node)
            };
            let text_end = if i + 1 < survivors.len() {
                tree.start(survivors[i + 1].0[0].node).max(text_start)
            } else {
                source.len()
            };
            let text = decode(source, text_start, text_end, &mut warnings);

            let nodes = group
                .iter()
                .map(|item| NodeSpan {
                    kind: tree.kind(item.node).to_string(),
                    start: tree.start(item.node),
                    end: tree.end(item.node),
                    token_count: item.tokens,
                })
                .collect();

            let end = offset + text.len();
            chunks.push(CodeChunk {
                text,
                start: offset,
                end,
                token_count: *count,
                nodes,
            });
            offset = end;
        }

        Chunked { chunks, warnings }
    }
}

/// Decode a byte range, reporting replacement when it was lossy.
fn decode(source: &[u8], start: usize, end: usize, warnings: &mut Vec<Warning>) -> String {
    match String::from_utf8_lossy(&source[start..end]) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => {
            warnings.push(Warning::LossyDecode { start, end });
            text
        }
    }
}

impl std::fmt::Debug for CodeChunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeChunker")
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}

impl Chunker for CodeChunker {
    type Chunk = CodeChunk;

    fn chunk(&self, text: &str) -> Chunked<CodeChunk> {
        if text.trim().is_empty() {
            return Chunked::empty();
        }
        self.chunk_bytes(text.as_bytes())
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
