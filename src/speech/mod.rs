/*!
 * Speech synthesis of the translated text.
 *
 * The backend returns MP3 bytes; they are written to a private temporary
 * file, read back once as the final artifact and the file is removed.
 */

use anyhow::{Context, Result};
use bytes::Bytes;
use log::{debug, error, info};
use std::io::Write;

use crate::app_config::Config;
use crate::errors::StageError;
use crate::language_utils::TargetLanguage;
use crate::pipeline::StageOutcome;
use crate::providers::SpeechBackend;
use crate::providers::google_tts::GoogleTts;

/// Download name of the generated audio
pub const AUDIO_FILE_NAME: &str = "translated_audio.mp3";

/// MIME type of the generated audio
pub const AUDIO_MIME_TYPE: &str = "audio/mp3";

/// Spoken rendition of the translated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    data: Bytes,
}

impl AudioArtifact {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Raw MP3 bytes
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn file_name(&self) -> &'static str {
        AUDIO_FILE_NAME
    }

    pub fn mime_type(&self) -> &'static str {
        AUDIO_MIME_TYPE
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Turns text into an `AudioArtifact`
#[derive(Debug)]
pub struct SpeechSynthesizer {
    backend: Box<dyn SpeechBackend>,
    slow: bool,
}

impl SpeechSynthesizer {
    /// Synthesizer speaking at the normal rate
    pub fn new(backend: Box<dyn SpeechBackend>) -> Self {
        Self { backend, slow: false }
    }

    pub fn with_slow(mut self, slow: bool) -> Self {
        self.slow = slow;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        let backend = GoogleTts::new(config.speech.endpoint.clone(), config.speech.timeout_secs);
        Self::new(Box::new(backend)).with_slow(config.speech.slow)
    }

    /// Synthesize `text` spoken in `language`.
    ///
    /// Any failure, including empty input, yields no audio and a diagnostic.
    pub async fn synthesize(&self, text: &str, language: TargetLanguage) -> StageOutcome<Option<AudioArtifact>> {
        if text.trim().is_empty() {
            return Self::fail("no text to speak".to_string());
        }

        debug!(
            "Synthesizing {} characters in {} with {}",
            text.chars().count(),
            language,
            self.backend.name()
        );

        let audio = match self.backend.synthesize(text, language.code(), self.slow).await {
            Ok(audio) if audio.is_empty() => return Self::fail(format!("{} returned no audio", self.backend.name())),
            Ok(audio) => audio,
            Err(e) => return Self::fail(e.to_string()),
        };

        match round_trip_through_temp_file(&audio) {
            Ok(data) => {
                info!("Generated {} bytes of {} audio", data.len(), language.english_name());
                StageOutcome::completed(Some(AudioArtifact::new(data)))
            }
            Err(e) => Self::fail(format!("{:#}", e)),
        }
    }

    fn fail(reason: String) -> StageOutcome<Option<AudioArtifact>> {
        error!("Error generating speech: {}", reason);
        StageOutcome::degraded(None, StageError::Synthesis(reason))
    }
}

/// Save `audio` to a private temporary file and read it back; the file is
/// deleted when this returns
fn round_trip_through_temp_file(audio: &[u8]) -> Result<Vec<u8>> {
    let mut file = tempfile::Builder::new()
        .prefix("eduspeak-")
        .suffix(".mp3")
        .tempfile()
        .context("Failed to create temporary audio file")?;
    file.write_all(audio).context("Failed to write temporary audio file")?;
    file.flush().context("Failed to flush temporary audio file")?;

    let data = std::fs::read(file.path())
        .with_context(|| format!("Failed to read back audio file: {:?}", file.path()))?;
    file.close().context("Failed to remove temporary audio file")?;
    Ok(data)
}
