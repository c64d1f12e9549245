//! Naive keyword retrieval over the cached context.

use std::sync::OnceLock;

use regex::Regex;

/// Query words shorter than this are ignored.
const MIN_WORD_CHARS: usize = 3;

static WORD_RE: OnceLock<Regex> = OnceLock::new();

/// Split `text` into consecutive chunks of `size` characters.
///
/// A `size` of zero yields the whole text as one chunk.
#[must_use]
pub fn split_chunks(text: &str, size: usize) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    if size == 0 {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    for (count, (idx, _)) in text.char_indices().enumerate() {
        if count > 0 && count % size == 0 {
            chunks.push(&text[start..idx]);
            start = idx;
        }
    }
    chunks.push(&text[start..]);
    chunks
}

/// Lower-cased `\w+` tokens of `query` with at least three characters.
#[must_use]
pub fn query_words(query: &str) -> Vec<String> {
    let re = WORD_RE.get_or_init(|| Regex::new(r"\w+").expect("word regex is valid"));
    re.find_iter(query)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
        .collect()
}

/// Number of `words` (duplicates counted) contained in `chunk`, ignoring case.
#[must_use]
pub fn score_chunk(chunk: &str, words: &[String]) -> usize {
    let lower = chunk.to_lowercase();
    words.iter().filter(|w| lower.contains(w.as_str())).count()
}

/// The first best-scoring chunk of `context` for `query`.
///
/// An empty context is returned as is.
#[must_use]
pub fn retrieve<'a>(context: &'a str, query: &str, chunk_chars: usize) -> &'a str {
    let words = query_words(query);
    let mut best: Option<(&str, usize)> = None;

    for chunk in split_chunks(context, chunk_chars) {
        let score = score_chunk(chunk, &words);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((chunk, score));
        }
    }

    best.map_or(context, |(chunk, _)| chunk)
}
