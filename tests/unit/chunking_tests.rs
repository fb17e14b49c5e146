/*!
 * Tests for word-bounded chunking
 */

use eduspeak::chunking::{DEFAULT_MAX_TOKENS, chunk_text, word_count};

use crate::common::numbered_words;

/// Ten words fit in a single chunk equal to the text
#[test]
fn test_chunkText_withTenWords_shouldYieldWholeText() {
    let text = numbered_words(10);
    let chunks = chunk_text(&text, DEFAULT_MAX_TOKENS);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, text);
}

/// 1200 words split as 500, 500, 200 in source order
#[test]
fn test_chunkText_with1200Words_shouldYield500_500_200() {
    let chunks = chunk_text(&numbered_words(1200), 500);
    let sizes: Vec<usize> = chunks.iter().map(|c| c.word_count).collect();
    assert_eq!(sizes, vec![500, 500, 200]);
    assert!(chunks[0].text.starts_with("w0 "));
    assert!(chunks[1].text.starts_with("w500 "));
    assert!(chunks[2].text.starts_with("w1000 "));
    assert!(chunks[2].text.ends_with("w1199"));
}

/// Chunk count is ceil(n/k) and words survive unchanged
#[test]
fn test_chunkText_acrossSizes_shouldPreserveWordsAndCount() {
    for n in [0usize, 1, 7, 99, 100, 101, 1234] {
        for k in [1usize, 3, 100, 500] {
            let text = numbered_words(n);
            let chunks = chunk_text(&text, k);
            assert_eq!(chunks.len(), n.div_ceil(k), "n={} k={}", n, k);

            let rebuilt: Vec<&str> = chunks.iter().flat_map(|c| c.words()).collect();
            let original: Vec<&str> = text.split_whitespace().collect();
            assert_eq!(rebuilt, original);

            if let Some((last, rest)) = chunks.split_last() {
                assert!(rest.iter().all(|c| c.word_count == k));
                assert!(last.word_count <= k);
            }
        }
    }
}

/// Irregular whitespace collapses to single spaces
#[test]
fn test_chunkText_withMixedWhitespace_shouldJoinWithSingleSpaces() {
    let chunks = chunk_text("Page one\n\nline\ttwo   end", 500);
    assert_eq!(chunks[0].text, "Page one line two end");
    assert_eq!(word_count("Page one\n\nline\ttwo   end"), 5);
}
