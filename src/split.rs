//! Sentence splitting.
//!
//! The splitter scans for delimiter matches directly over the input
//! bytes and computes fragment boundaries from match positions. No
//! sentinel characters are inserted into the text, so no input byte
//! sequence can collide with the scanner's bookkeeping.
//!
//! Delimiter matching is byte-wise `starts_with`. UTF-8 is
//! self-synchronizing, so a valid delimiter string can only match at a
//! character boundary and every fragment is itself valid UTF-8.
//!
//! After splitting, fragments shorter than a minimum character count are
//! merged into their neighbors so that no sentence is trivially short.

/// Delimiters used when none are configured: sentence-final punctuation
/// plus newline.
pub const DEFAULT_DELIMITERS: &[&str] = &[".", "!", "?", "\n"];

/// Where a matched delimiter lands relative to the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncludeDelim {
    /// The delimiter ends the preceding fragment.
    #[default]
    Prev,
    /// The delimiter begins the following fragment.
    Next,
    /// The delimiter is dropped.
    ///
    /// Dropped delimiters make the output shorter than the input, so
    /// downstream offsets index the concatenation of fragments rather
    /// than the original text.
    Omit,
}

/// Split `text` into sentences at delimiter matches.
///
/// Delimiters are tried in order at each byte position; the first match
/// wins and scanning resumes past it. Empty fragments are discarded, as
/// are empty delimiter strings (which would never advance the scan).
/// Fragments shorter than `min_characters` (counted in `char`s) are
/// merged into a neighbor: short fragments accumulate until the
/// accumulation reaches `min_characters` or a long fragment arrives to
/// absorb them; a short trailing accumulation is emitted as the final
/// sentence.
///
/// For [`IncludeDelim::Prev`] and [`IncludeDelim::Next`] the returned
/// sentences concatenate back to `text` exactly.
#[must_use]
pub fn split_sentences(
    text: &str,
    delimiters: &[String],
    include_delim: IncludeDelim,
    min_characters: usize,
) -> Vec<String> {
    let fragments = scan(text, delimiters, include_delim);
    merge_short(&fragments, min_characters)
}

/// Scan for delimiter matches and cut `text` into fragments.
fn scan<'a>(text: &'a str, delimiters: &[String], include_delim: IncludeDelim) -> Vec<&'a str> {
    let bytes = text.as_bytes();
    let mut fragments = Vec::new();
    let mut frag_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        let matched = delimiters
            .iter()
            .find(|d| !d.is_empty() && bytes[pos..].starts_with(d.as_bytes()));

        let Some(delim) = matched else {
            pos += 1;
            continue;
        };
        let delim_end = pos + delim.len();

        let (frag_end, next_start) = match include_delim {
            IncludeDelim::Prev => (delim_end, delim_end),
            IncludeDelim::Next => (pos, pos),
            IncludeDelim::Omit => (pos, delim_end),
        };
        if frag_end > frag_start {
            fragments.push(&text[frag_start..frag_end]);
        }
        frag_start = next_start;
        pos = delim_end;
    }

    if frag_start < text.len() {
        fragments.push(&text[frag_start..]);
    }
    fragments
}

/// Merge fragments shorter than `min_characters` into their neighbors.
fn merge_short(fragments: &[&str], min_characters: usize) -> Vec<String> {
    let mut sentences = Vec::with_capacity(fragments.len());
    let mut current = String::new();
    let mut current_chars = 0;

    for frag in fragments {
        let frag_chars = frag.chars().count();
        if frag_chars < min_characters {
            current.push_str(frag);
            current_chars += frag_chars;
        } else if current.is_empty() {
            sentences.push((*frag).to_string());
        } else {
            current.push_str(frag);
            sentences.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        if current_chars >= min_characters && !current.is_empty() {
            sentences.push(std::mem::take(&mut current));
            current_chars = 0;
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delims(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|d| (*d).to_string()).collect()
    }

    #[test]
    fn prev_keeps_delimiter_on_preceding_fragment() {
        let out = split_sentences("a. b. c", &delims(&["."]), IncludeDelim::Prev, 1);
        assert_eq!(out, vec!["a.", " b.", " c"]);
    }

    #[test]
    fn next_moves_delimiter_to_following_fragment() {
        let out = split_sentences("a. b. c", &delims(&["."]), IncludeDelim::Next, 1);
        assert_eq!(out, vec!["a", ". b", ". c"]);
    }

    #[test]
    fn omit_drops_the_delimiter() {
        let out = split_sentences("a. b. c", &delims(&["."]), IncludeDelim::Omit, 1);
        assert_eq!(out, vec!["a", " b", " c"]);
    }

    #[test]
    fn prev_and_next_concatenate_to_input() {
        let text = "One! Two? Three.\nFour";
        let delimiters = delims(DEFAULT_DELIMITERS);
        for mode in [IncludeDelim::Prev, IncludeDelim::Next] {
            let out = split_sentences(text, &delimiters, mode, 1);
            assert_eq!(out.concat(), text);
        }
    }

    #[test]
    fn consecutive_delimiters_yield_delimiter_fragments() {
        let out = split_sentences("a..b", &delims(&["."]), IncludeDelim::Prev, 1);
        assert_eq!(out, vec!["a.", ".", "b"]);

        let out = split_sentences("a..b", &delims(&["."]), IncludeDelim::Omit, 1);
        assert_eq!(out, vec!["a", "b"]);
    }

    #[test]
    fn leading_delimiter() {
        let out = split_sentences(".ab", &delims(&["."]), IncludeDelim::Prev, 1);
        assert_eq!(out, vec![".", "ab"]);
    }

    #[test]
    fn trailing_delimiter() {
        let out = split_sentences("ab.", &delims(&["."]), IncludeDelim::Prev, 1);
        assert_eq!(out, vec!["ab."]);

        let out = split_sentences("ab.", &delims(&["."]), IncludeDelim::Next, 1);
        assert_eq!(out, vec!["ab", "."]);
    }

    #[test]
    fn no_delimiter_match_returns_whole_text() {
        let out = split_sentences("no boundaries here", &delims(&["!"]), IncludeDelim::Prev, 1);
        assert_eq!(out, vec!["no boundaries here"]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        let out = split_sentences("", &delims(&["."]), IncludeDelim::Prev, 1);
        assert!(out.is_empty());
    }

    #[test]
    fn empty_delimiter_is_skipped() {
        let out = split_sentences("a.b", &delims(&["", "."]), IncludeDelim::Prev, 1);
        assert_eq!(out, vec!["a.", "b"]);
    }

    #[test]
    fn multibyte_delimiter_and_content() {
        let out = split_sentences("你好。再见。", &delims(&["。"]), IncludeDelim::Prev, 1);
        assert_eq!(out, vec!["你好。", "再见。"]);
    }

    #[test]
    fn delimiter_sharing_bytes_with_multibyte_chars() {
        // "。" is e3 80 82; "~" never appears inside its encoding.
        let out = split_sentences("你~好", &delims(&["~"]), IncludeDelim::Omit, 1);
        assert_eq!(out, vec!["你", "好"]);
    }

    #[test]
    fn short_fragments_accumulate_until_minimum() {
        // "a." and " b." are short; together they reach 5 chars.
        let out = split_sentences("a. b. done now", &delims(&["."]), IncludeDelim::Prev, 5);
        assert_eq!(out, vec!["a. b.", " done now"]);
    }

    #[test]
    fn long_fragment_absorbs_pending_shorts() {
        let out = split_sentences("a. followed by text", &delims(&["."]), IncludeDelim::Prev, 4);
        assert_eq!(out, vec!["a. followed by text"]);
    }

    #[test]
    fn trailing_short_accumulation_is_emitted() {
        let out = split_sentences("a long sentence. x", &delims(&["."]), IncludeDelim::Prev, 4);
        assert_eq!(out, vec!["a long sentence.", " x"]);
    }

    #[test]
    fn minimum_counts_characters_not_bytes() {
        // Two 3-byte chars: 2 chars < 3, so they merge with the next fragment.
        let out = split_sentences("你好.abc", &delims(&["."]), IncludeDelim::Omit, 3);
        assert_eq!(out, vec!["你好abc"]);
    }

    #[test]
    fn merge_preserves_concatenation() {
        let text = "Hi. Ho. A much longer sentence follows here. Bye.";
        let out = split_sentences(text, &delims(&["."]), IncludeDelim::Prev, 12);
        assert_eq!(out.concat(), text);
    }
}
