//! Speech-to-text backends.
//!
//! An empty transcript means the engine heard audio but could not make out words; the
//! listener reports that as "no match". An `Err` means the service itself failed.

use crate::ear::AudioTurn;
use crate::error::{VoiceError, VoiceResult};
use crate::service::{ensure_success, SpeechService};
use crate::vad::to_pcm16;
use reqwest::blocking::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;

pub trait SttBackend: Send + Sync {
    /// Transcribe one utterance; `Ok("")` when nothing intelligible was said.
    fn transcribe(&self, turn: &AudioTurn) -> VoiceResult<String>;
}

/// Mono 16-bit PCM WAV container for `samples`.
pub fn pcm_f32_to_wav(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    const HEADER_LEN: usize = 44;
    let pcm = to_pcm16(samples);
    let data_len = (pcm.len() * 2) as u32;

    let mut wav = Vec::with_capacity(HEADER_LEN + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(data_len + HEADER_LEN as u32 - 8).to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&16u32.to_le_bytes()); // fmt chunk size
    wav.extend_from_slice(&1u16.to_le_bytes()); // linear PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // channels
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * 2).to_le_bytes()); // byte rate
    wav.extend_from_slice(&2u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend(pcm.iter().flat_map(|s| s.to_le_bytes()));
    wav
}

/// Fixed transcript for every utterance; empty (no match) by default.
#[derive(Debug, Default)]
pub struct PlaceholderStt {
    pub response: Option<String>,
}

impl PlaceholderStt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(s: impl Into<String>) -> Self {
        Self {
            response: Some(s.into()),
        }
    }
}

impl SttBackend for PlaceholderStt {
    fn transcribe(&self, _turn: &AudioTurn) -> VoiceResult<String> {
        Ok(self.response.clone().unwrap_or_default())
    }
}

/// `POST {base}/audio/transcriptions` with a multipart WAV upload (OpenAI Whisper and
/// compatible local servers). Env: `STT_API_URL`, `STT_API_KEY`, `STT_MODEL` (whisper-1).
#[derive(Debug, Clone)]
pub struct OpenAiStt {
    service: SpeechService,
}

impl OpenAiStt {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> VoiceResult<Self> {
        Ok(Self {
            service: SpeechService::new(base_url, api_key, model, Duration::from_secs(30))?,
        })
    }

    pub fn from_env() -> VoiceResult<Self> {
        Ok(Self {
            service: SpeechService::from_env("STT", "whisper-1", Duration::from_secs(30))?,
        })
    }

    pub fn service(&self) -> &SpeechService {
        &self.service
    }
}

impl SttBackend for OpenAiStt {
    fn transcribe(&self, turn: &AudioTurn) -> VoiceResult<String> {
        if turn.samples.is_empty() {
            return Ok(String::new());
        }
        let audio = Part::bytes(pcm_f32_to_wav(&turn.samples, turn.sample_rate))
            .file_name("utterance.wav")
            .mime_str("audio/wav")
            .map_err(|e| VoiceError::Stt(e.to_string()))?;
        let form = Form::new()
            .part("file", audio)
            .text("model", self.service.model.clone());

        let res = self
            .service
            .post("audio/transcriptions")
            .multipart(form)
            .send()
            .map_err(|e| VoiceError::Stt(e.to_string()))?;
        let body: Value = ensure_success(res)
            .map_err(VoiceError::Stt)?
            .json()
            .map_err(|e| VoiceError::Stt(format!("bad transcription response: {}", e)))?;

        Ok(body["text"].as_str().unwrap_or_default().trim().to_string())
    }
}

/// `OpenAiStt` when a key is configured, otherwise `PlaceholderStt` (every utterance reads
/// as "no match").
pub fn create_best_stt() -> Box<dyn SttBackend> {
    match OpenAiStt::from_env() {
        Ok(stt) => {
            tracing::info!(url = %stt.service().base_url, model = %stt.service().model, "using OpenAI-compatible STT");
            Box::new(stt)
        }
        Err(e) => {
            tracing::warn!("STT fallback to placeholder: {}", e);
            Box::new(PlaceholderStt::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn turn(samples: Vec<f32>) -> AudioTurn {
        AudioTurn {
            samples,
            timestamp: Utc::now(),
            duration: Duration::from_millis(30),
            sample_rate: 16000,
        }
    }

    #[test]
    fn wav_header_layout() {
        let wav = pcm_f32_to_wav(&[0.0, 1.0, -1.0], 16000);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]), 36 + 6);
        assert_eq!(&wav[8..16], b"WAVEfmt ");
        assert_eq!(wav.len(), 44 + 6);
        assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 6);
        assert_eq!(i16::from_le_bytes([wav[46], wav[47]]), 32767);
    }

    #[test]
    fn placeholder_defaults_to_no_match() {
        let stt = PlaceholderStt::new();
        assert_eq!(stt.transcribe(&turn(vec![0.0; 480])).unwrap(), "");
    }

    #[test]
    fn placeholder_with_response() {
        let stt = PlaceholderStt::with_response("list files");
        assert_eq!(stt.transcribe(&turn(vec![])).unwrap(), "list files");
    }
}
