/*!
 * Tests for speech synthesis
 */

use eduspeak::errors::StageError;
use eduspeak::language_utils::TargetLanguage;
use eduspeak::providers::google_tts::{MAX_BATCH_CHARS, split_into_batches};
use eduspeak::providers::mock::{MOCK_AUDIO_HEADER, MockProvider};
use eduspeak::speech::SpeechSynthesizer;

#[tokio::test]
async fn test_synthesize_shouldPassLanguageCodeToBackend() {
    let synthesizer = SpeechSynthesizer::new(Box::new(MockProvider::working()));

    let audio = synthesizer
        .synthesize("నమస్కారం", TargetLanguage::Telugu)
        .await
        .into_value()
        .expect("audio should be produced");

    assert!(audio.bytes().starts_with(MOCK_AUDIO_HEADER));
    let payload = String::from_utf8_lossy(&audio.bytes()[MOCK_AUDIO_HEADER.len()..]).to_string();
    assert_eq!(payload, "te:నమస్కారం");
}

#[tokio::test]
async fn test_synthesize_withBackendFailure_shouldReportAndReturnNothing() {
    let synthesizer = SpeechSynthesizer::new(Box::new(MockProvider::failing())).with_slow(true);

    let (audio, error) = synthesizer.synthesize("text", TargetLanguage::Tamil).await.into_parts();

    assert!(audio.is_none());
    let error = error.expect("failure should be reported");
    assert!(matches!(error, StageError::Synthesis(_)));
    assert!(error.to_string().starts_with("Error generating speech"));
}

/// Long Devanagari text is split under the endpoint limit, on danda boundaries
#[test]
fn test_splitIntoBatches_withHindiText_shouldStayUnderLimit() {
    let text = "प्रकाश संश्लेषण पौधों में होता है। ".repeat(12);
    let batches = split_into_batches(&text, MAX_BATCH_CHARS);

    assert!(batches.len() > 1);
    for batch in &batches {
        assert!(batch.chars().count() <= MAX_BATCH_CHARS);
        assert!(batch.ends_with('।'));
    }
}
