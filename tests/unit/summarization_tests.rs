/*!
 * Tests for the chunked summarizer
 */

use eduspeak::errors::StageError;
use eduspeak::providers::mock::MockProvider;
use eduspeak::summarization::Summarizer;

use crate::common::numbered_words;

#[tokio::test]
async fn test_summarize_withEmptyText_shouldReturnEmptyWithoutModelCall() {
    let model = MockProvider::failing();
    let summarizer = Summarizer::new(Box::new(model.clone()));

    let outcome = summarizer.summarize("").await;

    assert!(!outcome.is_degraded());
    assert_eq!(outcome.value(), "");
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_summarize_with1200Words_shouldSummarizeThreeChunksInOrder() {
    let model = MockProvider::working().with_custom_response(|chunk| {
        let first = chunk.split_whitespace().next().unwrap_or_default();
        format!("from-{}", first)
    });
    let summarizer = Summarizer::new(Box::new(model.clone()));

    let outcome = summarizer.summarize(&numbered_words(1200)).await;

    assert_eq!(model.call_count(), 3);
    assert_eq!(outcome.into_value(), "from-w0 from-w500 from-w1000");
}

#[tokio::test]
async fn test_summarize_withFailingModel_shouldPassTextThrough() {
    let text = numbered_words(42);
    let summarizer = Summarizer::new(Box::new(MockProvider::failing()));

    let (summary, error) = summarizer.summarize(&text).await.into_parts();

    assert_eq!(summary, text);
    let error = error.expect("summarization failure should be reported");
    assert!(matches!(error, StageError::Summarization(_)));
    assert!(error.to_string().starts_with("Error summarizing text"));
}
