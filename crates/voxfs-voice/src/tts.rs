//! Text-to-speech backends.

use crate::error::{VoiceError, VoiceResult};
use crate::service::{ensure_success, SpeechService};
use serde::Serialize;
use std::time::Duration;

/// Turns text into encoded audio (WAV/MP3) the output sink can decode.
pub trait TtsBackend: Send + Sync {
    /// An empty result means "nothing to play".
    fn synthesize(&self, text: &str) -> VoiceResult<Vec<u8>>;
}

/// Produces no audio; announcements only reach the log.
#[derive(Debug, Default)]
pub struct PlaceholderTts;

impl TtsBackend for PlaceholderTts {
    fn synthesize(&self, _text: &str) -> VoiceResult<Vec<u8>> {
        Ok(Vec::new())
    }
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
}

/// `POST {base}/audio/speech`. Env: `TTS_API_URL`, `TTS_API_KEY`, `TTS_MODEL` (tts-1) and
/// `TTS_VOICE` (alloy).
#[derive(Debug, Clone)]
pub struct OpenAiTts {
    service: SpeechService,
    voice: String,
}

impl OpenAiTts {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        voice: impl Into<String>,
    ) -> VoiceResult<Self> {
        Ok(Self {
            service: SpeechService::new(base_url, api_key, model, Duration::from_secs(60))?,
            voice: voice.into(),
        })
    }

    pub fn from_env() -> VoiceResult<Self> {
        Ok(Self {
            service: SpeechService::from_env("TTS", "tts-1", Duration::from_secs(60))?,
            voice: std::env::var("TTS_VOICE").unwrap_or_else(|_| "alloy".to_string()),
        })
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }
}

impl TtsBackend for OpenAiTts {
    fn synthesize(&self, text: &str) -> VoiceResult<Vec<u8>> {
        let input = text.trim();
        if input.is_empty() {
            return Ok(Vec::new());
        }
        let request = SpeechRequest {
            model: &self.service.model,
            input,
            voice: &self.voice,
        };
        let res = self
            .service
            .post("audio/speech")
            .json(&request)
            .send()
            .map_err(|e| VoiceError::Tts(e.to_string()))?;
        let audio = ensure_success(res)
            .map_err(VoiceError::Tts)?
            .bytes()
            .map_err(|e| VoiceError::Tts(e.to_string()))?;
        Ok(audio.to_vec())
    }
}

/// `OpenAiTts` when a key is configured, otherwise `PlaceholderTts`.
pub fn create_best_tts() -> Box<dyn TtsBackend> {
    match OpenAiTts::from_env() {
        Ok(tts) => {
            tracing::info!(voice = %tts.voice(), "using OpenAI-compatible TTS");
            Box::new(tts)
        }
        Err(e) => {
            tracing::warn!("TTS fallback to placeholder: {}", e);
            Box::new(PlaceholderTts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_tts_returns_empty() {
        assert!(PlaceholderTts.synthesize("hello").unwrap().is_empty());
    }

    #[test]
    fn blank_text_is_not_sent() {
        // unroutable base URL: any request would fail
        let tts = OpenAiTts::new("http://127.0.0.1:9", "k", "tts-1", "alloy").unwrap();
        assert!(tts.synthesize("   ").unwrap().is_empty());
    }
}
