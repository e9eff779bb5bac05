//! Code Chunking
//!
//! Chunk source code along syntax-tree boundaries instead of blind
//! byte positions.
//!
//! ```bash
//! cargo run --example code_chunking --features code
//! ```

use std::sync::Arc;

use kerf::{Chunker, CodeChunker, CodeLanguage, WordCounter};

fn main() -> kerf::Result<()> {
    let source = r#"use std::collections::HashMap;

fn word_counts(text: &str) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for word in text.split_whitespace() {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
}

fn most_common<'a>(counts: &HashMap<&'a str, usize>) -> Option<&'a str> {
    counts.iter().max_by_key(|(_, n)| **n).map(|(w, _)| *w)
}

fn main() {
    let counts = word_counts("the cat sat on the mat");
    println!("{:?}", most_common(&counts));
}
"#;

    let chunker = CodeChunker::for_language(Arc::new(WordCounter), CodeLanguage::Rust, 24)?;
    let out = chunker.chunk(source);

    println!("Source: {} bytes", source.len());
    println!("Chunks: {}\n", out.len());

    for (i, chunk) in out.chunks.iter().enumerate() {
        let kinds: Vec<&str> = chunk.nodes.iter().map(|n| n.kind.as_str()).collect();
        println!("[{}] {} tokens, nodes: {}", i, chunk.token_count, kinds.join(", "));
        println!("{}", chunk.text.trim_end());
        println!("----------------------------------------");
    }

    // Function bodies stay whole: the grouping walks the parse tree and
    // only descends into nodes too large for the budget.
    Ok(())
}
