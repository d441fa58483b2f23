//! Speech/silence classification with the WebRTC VAD.

use crate::audio::FRAME_MS;
use crate::error::{VoiceError, VoiceResult};
use webrtc_vad::{SampleRate, Vad, VadMode};

#[derive(Debug, Clone)]
pub struct VadConfig {
    pub sample_rate: u32,
    /// Aggressiveness 0 (least) to 3 (most likely to call audio silence).
    pub mode: u8,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            mode: 2,
        }
    }
}

fn vad_rate(hz: u32) -> VoiceResult<SampleRate> {
    Ok(match hz {
        8_000 => SampleRate::Rate8kHz,
        16_000 => SampleRate::Rate16kHz,
        32_000 => SampleRate::Rate32kHz,
        48_000 => SampleRate::Rate48kHz,
        other => {
            return Err(VoiceError::VadInit(format!(
                "unsupported VAD sample rate {} Hz (use 8000, 16000, 32000 or 48000)",
                other
            )))
        }
    })
}

fn vad_mode(level: u8) -> VoiceResult<VadMode> {
    Ok(match level {
        0 => VadMode::Quality,
        1 => VadMode::LowBitrate,
        2 => VadMode::Aggressive,
        3 => VadMode::VeryAggressive,
        other => return Err(VoiceError::VadInit(format!("VAD mode must be 0-3, got {}", other))),
    })
}

/// Float samples to the 16-bit PCM the VAD consumes. Out-of-range input saturates.
pub fn to_pcm16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}

/// Classifies [`FRAME_MS`] frames. Holds a C handle and is not `Send`: build it on the thread
/// that feeds it.
pub struct VadDetector {
    vad: Vad,
    frame_len: usize,
}

impl VadDetector {
    pub fn new(config: VadConfig) -> VoiceResult<Self> {
        let mut vad = Vad::new();
        vad.set_sample_rate(vad_rate(config.sample_rate)?);
        vad.set_mode(vad_mode(config.mode)?);
        Ok(Self {
            vad,
            frame_len: config.sample_rate as usize * FRAME_MS / 1000,
        })
    }

    pub fn is_speech(&mut self, frame: &[f32]) -> VoiceResult<bool> {
        if frame.len() != self.frame_len {
            return Err(VoiceError::VadProcessing(format!(
                "frame has {} samples, VAD expects {}",
                frame.len(),
                self.frame_len
            )));
        }
        self.vad
            .is_voice_segment(&to_pcm16(frame))
            .map_err(|_| VoiceError::VadProcessing("VAD rejected frame".to_string()))
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_len_matches_capture() {
        let detector = VadDetector::new(VadConfig::default()).unwrap();
        assert_eq!(detector.frame_len(), crate::AudioConfig::default().frame_len());
    }

    #[test]
    fn rejects_bad_settings() {
        assert!(VadDetector::new(VadConfig {
            sample_rate: 44_100,
            mode: 2
        })
        .is_err());
        assert!(VadDetector::new(VadConfig {
            sample_rate: 16_000,
            mode: 7
        })
        .is_err());
    }

    #[test]
    fn pcm_conversion_saturates() {
        assert_eq!(to_pcm16(&[0.0, 1.0, -1.0, 2.5]), vec![0, 32767, -32767, 32767]);
    }

    #[test]
    fn silence_is_not_speech_and_short_frames_error() {
        let mut detector = VadDetector::new(VadConfig::default()).unwrap();
        assert!(!detector.is_speech(&[0.0; 480]).unwrap());
        assert!(detector.is_speech(&[0.0; 100]).is_err());
    }
}
