/*!
 * Word-bounded text chunking.
 *
 * Summarization models have a hard input-length limit, so extracted text is
 * cut into consecutive slices of at most `max_tokens` whitespace-separated
 * words before it is sent anywhere.
 */

/// Default number of words per chunk
pub const DEFAULT_MAX_TOKENS: usize = 500;

/// An ordered slice of a larger text, split on word boundaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Position of the chunk in the source text
    pub index: usize,
    /// Words of the chunk joined by single spaces
    pub text: String,
    /// Number of words in the chunk
    pub word_count: usize,
}

impl TextChunk {
    /// Words of the chunk, in order
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }
}

impl AsRef<str> for TextChunk {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Split `text` into chunks of at most `max_tokens` words.
///
/// Every chunk except possibly the last holds exactly `max_tokens` words and
/// the words of all chunks, read in order, are the words of `text`. Empty or
/// whitespace-only text yields no chunks. A `max_tokens` of zero is treated
/// as one.
pub fn chunk_text(text: &str, max_tokens: usize) -> Vec<TextChunk> {
    let stride = max_tokens.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .chunks(stride)
        .enumerate()
        .map(|(index, slice)| TextChunk {
            index,
            text: slice.join(" "),
            word_count: slice.len(),
        })
        .collect()
}

/// Number of whitespace-separated words in `text`
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
