//! The Ear: blocking single-utterance capture.
//!
//! Opens the microphone, classifies 30ms frames with the local VAD and hands them to the
//! [`Endpointer`] until it reports a complete utterance or a wait timeout. The cpal stream and
//! the VAD are created and dropped inside [`VoiceEar::capture_utterance`]; call it from a
//! blocking context (e.g. `tokio::task::spawn_blocking`).

use crate::audio::{AudioCapture, AudioConfig, AudioFrame};
use crate::endpoint::{Endpoint, EndpointConfig, Endpointer};
use crate::error::{VoiceError, VoiceResult};
use crate::vad::{VadConfig, VadDetector};
use chrono::{DateTime, Utc};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, info};

/// How long one listen phase may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenWindow {
    /// Maximum wait for speech to begin.
    pub timeout: Duration,
    /// Maximum utterance length once speech began.
    pub phrase_limit: Duration,
}

impl ListenWindow {
    pub fn new(timeout: Duration, phrase_limit: Duration) -> Self {
        Self {
            timeout,
            phrase_limit,
        }
    }
}

/// A captured utterance ready for transcription.
#[derive(Debug, Clone)]
pub struct AudioTurn {
    /// PCM samples (f32, -1.0..1.0), mono.
    pub samples: Vec<f32>,
    /// When the utterance was closed.
    pub timestamp: DateTime<Utc>,
    /// Approximate utterance duration.
    pub duration: Duration,
    /// Sample rate (e.g. 16000).
    pub sample_rate: u32,
}

/// Configuration for the Ear.
#[derive(Debug, Clone)]
pub struct EarConfig {
    pub audio: AudioConfig,
    /// WebRTC VAD aggressiveness (0-3).
    pub vad_mode: u8,
    /// Silence after speech that closes the utterance (default 800ms).
    pub gap: Duration,
    /// Minimum speech to accept (default 200ms).
    pub min_speech: Duration,
}

impl Default for EarConfig {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            vad_mode: 2,
            gap: Duration::from_millis(800),
            min_speech: Duration::from_millis(200),
        }
    }
}

/// Extra time allowed for the device to deliver its first samples.
const DEVICE_STALL_SLACK: Duration = Duration::from_secs(2);

pub struct VoiceEar {
    config: EarConfig,
}

impl VoiceEar {
    pub fn new(config: EarConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EarConfig {
        &self.config
    }

    /// Capture one utterance. `Ok(None)` means nobody spoke within `window.timeout`.
    pub fn capture_utterance(&self, window: ListenWindow) -> VoiceResult<Option<AudioTurn>> {
        let sample_rate = self.config.audio.sample_rate;
        let mut vad = VadDetector::new(VadConfig {
            sample_rate,
            mode: self.config.vad_mode,
        })?;
        if vad.frame_len() != self.config.audio.frame_len() {
            return Err(VoiceError::Config(format!(
                "capture frame of {} samples does not match the VAD frame ({})",
                self.config.audio.frame_len(),
                vad.frame_len()
            )));
        }

        let mut endpointer = Endpointer::new(EndpointConfig {
            sample_rate,
            gap: self.config.gap,
            min_speech: self.config.min_speech,
            wait_timeout: window.timeout,
            phrase_limit: window.phrase_limit,
        });

        let (tx, rx) = mpsc::channel::<AudioFrame>();
        let capture = AudioCapture::new(self.config.audio.clone())?;
        let _stream = capture.start_capture(tx)?;
        info!(
            timeout_secs = window.timeout.as_secs(),
            phrase_limit_secs = window.phrase_limit.as_secs(),
            "Ear: listening"
        );

        let stall_limit = window.timeout + window.phrase_limit + DEVICE_STALL_SLACK;
        loop {
            let frame = match rx.recv_timeout(stall_limit) {
                Ok(c) => c,
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    return Err(VoiceError::AudioStream(
                        "input device stopped delivering audio".to_string(),
                    ))
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(VoiceError::AudioStream("input stream closed".to_string()))
                }
            };
            let is_speech = vad.is_speech(&frame.samples)?;
            match endpointer.push(is_speech, &frame.samples) {
                Endpoint::Pending => continue,
                Endpoint::TimedOut => {
                    debug!("Ear: wait timeout, no speech");
                    return Ok(None);
                }
                Endpoint::Complete(samples) => {
                    let duration = Duration::from_micros(
                        samples.len() as u64 * 1_000_000 / sample_rate.max(1) as u64,
                    );
                    debug!(duration_ms = duration.as_millis() as u64, "Ear: utterance captured");
                    return Ok(Some(AudioTurn {
                        samples,
                        timestamp: Utc::now(),
                        duration,
                        sample_rate,
                    }));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ear_config_defaults() {
        let c = EarConfig::default();
        assert_eq!(c.audio.sample_rate, 16000);
        assert_eq!(c.audio.frame_len(), 480);
        assert_eq!(c.gap, Duration::from_millis(800));
    }
}
