//! Tree-sitter parsing backend (feature `code`).

use std::sync::Arc;

use tree_sitter::{Language, Parser};

use crate::code::CodeChunker;
use crate::error::Result;
use crate::token::TokenCounter;
use crate::tree::{SourceParser, SyntaxTree};

/// Languages with bundled grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLanguage {
    /// Rust
    Rust,
    /// Python
    Python,
    /// TypeScript/JavaScript
    TypeScript,
    /// Go
    Go,
}

impl CodeLanguage {
    /// The tree-sitter grammar for this language.
    #[must_use]
    pub fn language(self) -> Language {
        match self {
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Go => tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// Guess the language from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "rs" => Some(Self::Rust),
            "py" => Some(Self::Python),
            "ts" | "tsx" | "js" | "jsx" => Some(Self::TypeScript),
            "go" => Some(Self::Go),
            _ => None,
        }
    }
}

/// [`SourceParser`] backed by tree-sitter.
///
/// A fresh `tree_sitter::Parser` is created per call, keeping the type
/// `Sync` without locking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeSitterParser {
    language: CodeLanguage,
}

impl TreeSitterParser {
    /// Create a parser for `language`.
    #[must_use]
    pub fn new(language: CodeLanguage) -> Self {
        Self { language }
    }
}

impl SourceParser for TreeSitterParser {
    fn parse(&self, source: &[u8]) -> Option<SyntaxTree> {
        let mut parser = Parser::new();
        parser.set_language(&self.language.language()).ok()?;
        let parsed = parser.parse(source, None)?;

        let root = parsed.root_node();
        let mut tree = SyntaxTree::with_root(root.kind(), root.start_byte(), root.end_byte());

        let mut stack = vec![(root, tree.root())];
        while let Some((node, id)) = stack.pop() {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                let child_id =
                    tree.push_child(id, child.kind(), child.start_byte(), child.end_byte());
                stack.push((child, child_id));
            }
        }
        Some(tree)
    }
}

impl CodeChunker {
    /// Create a code chunker parsing `language` with tree-sitter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`](crate::Error::InvalidChunkSize)
    /// if `chunk_size == 0`.
    pub fn for_language(
        counter: Arc<dyn TokenCounter>,
        language: CodeLanguage,
        chunk_size: usize,
    ) -> Result<Self> {
        Self::new(counter, Arc::new(TreeSitterParser::new(language)), chunk_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_lookup_covers_bundled_grammars() {
        assert_eq!(CodeLanguage::from_extension("rs"), Some(CodeLanguage::Rust));
        assert_eq!(
            CodeLanguage::from_extension("py"),
            Some(CodeLanguage::Python)
        );
        assert_eq!(
            CodeLanguage::from_extension("tsx"),
            Some(CodeLanguage::TypeScript)
        );
        assert_eq!(CodeLanguage::from_extension("go"), Some(CodeLanguage::Go));
        assert_eq!(CodeLanguage::from_extension("txt"), None);
    }

    #[test]
    fn parses_rust_into_an_arena() {
        let source = b"fn main() { let x = 1; }\n";
        let tree = TreeSitterParser::new(CodeLanguage::Rust)
            .parse(source)
            .unwrap();

        let root = tree.root();
        assert_eq!(tree.kind(root), "source_file");
        assert!(!tree.children(root).is_empty());
        assert!(tree.end(root) <= source.len());
    }

    #[test]
    fn child_spans_stay_in_source_order() {
        let source = b"fn a() {}\nfn b() {}\n";
        let tree = TreeSitterParser::new(CodeLanguage::Rust)
            .parse(source)
            .unwrap();

        let root = tree.root();
        let children = tree.children(root);
        assert_eq!(children.len(), 2);
        assert!(tree.start(children[0]) < tree.start(children[1]));
    }
}
