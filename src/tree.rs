//! Syntax tree representation and the parser seam.
//!
//! Parsers produce a [`SyntaxTree`]: a flat arena of nodes addressed by
//! [`NodeId`]. Groupers walk and regroup nodes by id, so no node data is
//! cloned or moved while a tree is being chunked.
//!
//! [`SourceParser`] is the seam for pluggable backends. [`LineParser`]
//! is the in-process reference implementation; the `code` feature adds a
//! tree-sitter backend.

/// Index of a node within a [`SyntaxTree`].
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct TreeNode {
    kind: String,
    start: usize,
    end: usize,
    children: Vec<NodeId>,
}

/// A parsed tree stored as a flat arena.
///
/// Spans are byte offsets into the buffer the tree was parsed from. The
/// tree puts no constraints on them; chunkers validate spans against the
/// buffer when reconstructing text.
///
/// ## Example
///
/// ```rust
/// use kerf::SyntaxTree;
///
/// let mut tree = SyntaxTree::with_root("module", 0, 11);
/// let root = tree.root();
/// let item = tree.push_child(root, "item", 0, 5);
/// tree.push_child(item, "name", 0, 3);
///
/// assert_eq!(tree.kind(item), "item");
/// assert_eq!(tree.children(root).len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<TreeNode>,
}

impl SyntaxTree {
    /// Create a tree holding a single root node spanning `start..end`.
    #[must_use]
    pub fn with_root(kind: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            nodes: vec![TreeNode {
                kind: kind.into(),
                start,
                end,
                children: Vec::new(),
            }],
        }
    }

    /// The root node's id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a child to `parent`, returning the new node's id.
    ///
    /// Children keep the order they were pushed in; parsers push them in
    /// source order.
    pub fn push_child(
        &mut self,
        parent: NodeId,
        kind: impl Into<String>,
        start: usize,
        end: usize,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            kind: kind.into(),
            start,
            end,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// The node's kind as reported by the grammar.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &str {
        &self.nodes[id.0].kind
    }

    /// Byte offset where the node starts.
    #[must_use]
    pub fn start(&self, id: NodeId) -> usize {
        self.nodes[id.0].start
    }

    /// Byte offset where the node ends (exclusive).
    #[must_use]
    pub fn end(&self, id: NodeId) -> usize {
        self.nodes[id.0].end
    }

    /// The node's byte span.
    #[must_use]
    pub fn span(&self, id: NodeId) -> std::ops::Range<usize> {
        self.nodes[id.0].start..self.nodes[id.0].end
    }

    /// The node's children, in source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Total number of nodes, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// A parsing backend producing a [`SyntaxTree`] over a byte buffer.
///
/// Returning `None` signals that no tree could be produced; chunkers
/// treat that as an empty result with a warning, never a panic.
pub trait SourceParser: Send + Sync {
    /// Parse `source` into a tree, or `None` on failure.
    fn parse(&self, source: &[u8]) -> Option<SyntaxTree>;
}

/// Parser that makes each line a child of the root.
///
/// Line spans include their trailing newline, so the children partition
/// the buffer exactly. Serves as a plain-text fallback and as the
/// backend for tests and benchmarks that should not depend on a grammar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineParser;

impl SourceParser for LineParser {
    fn parse(&self, source: &[u8]) -> Option<SyntaxTree> {
        let mut tree = SyntaxTree::with_root("document", 0, source.len());
        let root = tree.root();

        let mut line_start = 0;
        for (i, byte) in source.iter().enumerate() {
            if *byte == b'\n' {
                tree.push_child(root, "line", line_start, i + 1);
                line_start = i + 1;
            }
        }
        if line_start < source.len() {
            tree.push_child(root, "line", line_start, source.len());
        }
        Some(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_preserves_child_order() {
        let mut tree = SyntaxTree::with_root("root", 0, 10);
        let root = tree.root();
        let a = tree.push_child(root, "a", 0, 4);
        let b = tree.push_child(root, "b", 4, 10);

        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.span(a), 0..4);
        assert_eq!(tree.kind(b), "b");
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn nested_children_attach_to_their_parent() {
        let mut tree = SyntaxTree::with_root("root", 0, 10);
        let root = tree.root();
        let outer = tree.push_child(root, "outer", 0, 10);
        let inner = tree.push_child(outer, "inner", 2, 8);

        assert_eq!(tree.children(root), &[outer]);
        assert_eq!(tree.children(outer), &[inner]);
        assert!(tree.children(inner).is_empty());
    }

    #[test]
    fn line_parser_partitions_the_buffer() {
        let source = b"alpha\nbeta\ngamma";
        let tree = LineParser.parse(source).unwrap();
        let root = tree.root();

        let spans: Vec<_> = tree
            .children(root)
            .iter()
            .map(|&id| tree.span(id))
            .collect();
        assert_eq!(spans, vec![0..6, 6..11, 11..16]);
    }

    #[test]
    fn line_parser_keeps_trailing_newline_with_its_line() {
        let source = b"one\ntwo\n";
        let tree = LineParser.parse(source).unwrap();
        let root = tree.root();

        assert_eq!(tree.children(root).len(), 2);
        let last = tree.children(root)[1];
        assert_eq!(tree.span(last), 4..8);
    }

    #[test]
    fn line_parser_on_empty_input_yields_childless_root() {
        let tree = LineParser.parse(b"").unwrap();
        assert!(tree.children(tree.root()).is_empty());
        assert_eq!(tree.span(tree.root()), 0..0);
    }
}
