//! Error and diagnostic types for kerf.

/// Errors that can occur while configuring a chunker.
///
/// All validation happens at construction time. Once a chunker is built,
/// chunking itself never fails; recoverable conditions are reported as
/// [`Warning`]s instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// Overlap must be strictly less than the chunk size.
    #[error("chunk overlap {overlap} must be less than chunk size {size}")]
    OverlapExceedsSize {
        /// The chunk size.
        size: usize,
        /// The overlap that was too large.
        overlap: usize,
    },

    /// The delimiter list is empty.
    #[error("at least one delimiter is required")]
    NoDelimiters,

    /// A delimiter is the empty string, which would never advance the scanner.
    #[error("delimiters must be non-empty strings")]
    EmptyDelimiter,

    /// Invalid minimum sentence count (must be > 0).
    #[error("invalid minimum sentences per chunk: {0} (must be > 0)")]
    InvalidMinSentences(usize),

    /// Invalid minimum sentence length (must be > 0).
    #[error("invalid minimum characters per sentence: {0} (must be > 0)")]
    InvalidMinCharacters(usize),
}

/// Result type for kerf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Non-fatal conditions encountered while chunking.
///
/// Chunkers return these alongside their chunks in
/// [`Chunked::warnings`](crate::Chunked::warnings) rather than logging
/// them, so callers can inspect, surface, or ignore each one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
    /// A chunk was emitted with fewer sentences than the configured minimum.
    ///
    /// Happens at the end of a document when too few sentences remain.
    #[error("chunk has {actual} sentences, below the minimum of {minimum}")]
    UnmetMinimum {
        /// The configured minimum sentence count.
        minimum: usize,
        /// The number of sentences actually emitted.
        actual: usize,
    },

    /// A node group reported a span outside the source buffer and was dropped.
    #[error("skipped node group with invalid span {start}..{end}")]
    SkippedGroup {
        /// Span start reported by the parser.
        start: usize,
        /// Span end reported by the parser.
        end: usize,
    },

    /// Invalid UTF-8 was replaced while decoding a chunk's bytes.
    #[error("replaced invalid UTF-8 while decoding bytes {start}..{end}")]
    LossyDecode {
        /// Start of the decoded byte range.
        start: usize,
        /// End of the decoded byte range.
        end: usize,
    },

    /// The parser produced no syntax tree for the input.
    #[error("parser produced no syntax tree")]
    ParseFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_offending_value() {
        let err = Error::InvalidChunkSize(0);
        assert!(err.to_string().contains('0'));

        let err = Error::OverlapExceedsSize {
            size: 10,
            overlap: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("12") && msg.contains("10"));
    }

    #[test]
    fn warning_messages_carry_spans() {
        let warn = Warning::SkippedGroup { start: 5, end: 3 };
        assert!(warn.to_string().contains("5..3"));
    }
}
