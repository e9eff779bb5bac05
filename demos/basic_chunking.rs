//! Basic Text Chunking
//!
//! The minimal example: pack sentences into token-budget chunks for
//! embedding.
//!
//! ```bash
//! cargo run --example basic_chunking
//! ```

use std::sync::Arc;

use kerf::{Chunker, SentenceChunker, WordCounter};

fn main() -> kerf::Result<()> {
    let document = "Vector search retrieves by meaning rather than keywords. \
        Each document is embedded into a high-dimensional space. \
        Long documents must be split before they can be embedded. \
        Where you split determines what a query can find. \
        A chunk that ends mid-sentence embeds half a thought.";

    // 24-token chunks with up to 4 tokens repeated across the seam.
    let chunker = SentenceChunker::new(Arc::new(WordCounter), 24)?.with_overlap(4)?;
    let out = chunker.chunk(document);

    println!("Document: {} chars", document.len());
    println!("Chunks: {}\n", out.len());

    for (i, chunk) in out.chunks.iter().enumerate() {
        println!(
            "[{}] {} tokens, bytes {}..{}: \"{}\"",
            i, chunk.token_count, chunk.start, chunk.end, chunk.text
        );
    }

    for warning in &out.warnings {
        println!("warning: {}", warning);
    }

    // Each chunk fits the budget, and the overlap repeats whole trailing
    // sentences so no chunk starts mid-thought.
    Ok(())
}
