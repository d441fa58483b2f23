//! Errors raised by the speech edge.

use thiserror::Error;

pub type VoiceResult<T> = Result<T, VoiceError>;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("input device: {0}")]
    AudioDevice(String),

    #[error("capture stream: {0}")]
    AudioStream(String),

    #[error("voice activity detector setup: {0}")]
    VadInit(String),

    #[error("voice activity detector: {0}")]
    VadProcessing(String),

    #[error("invalid audio settings: {0}")]
    Config(String),

    #[error("speech recognition: {0}")]
    Stt(String),

    #[error("speech synthesis: {0}")]
    Tts(String),

    #[error("playback: {0}")]
    Playback(String),

    #[error("speech queue closed")]
    SpeechQueueClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl VoiceError {
    /// Failures of the local capture path. The session cannot recover from these, unlike
    /// recognition-service errors.
    pub fn is_device_failure(&self) -> bool {
        matches!(
            self,
            VoiceError::AudioDevice(_)
                | VoiceError::AudioStream(_)
                | VoiceError::VadInit(_)
                | VoiceError::Config(_)
        )
    }
}

macro_rules! cpal_error {
    ($($err:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$err> for VoiceError {
                fn from(err: $err) -> Self {
                    VoiceError::$variant(err.to_string())
                }
            }
        )+
    };
}

cpal_error! {
    cpal::DevicesError => AudioDevice,
    cpal::DefaultStreamConfigError => AudioDevice,
    cpal::BuildStreamError => AudioStream,
    cpal::PlayStreamError => AudioStream,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_failures_are_classified() {
        assert!(VoiceError::AudioDevice("no mic".into()).is_device_failure());
        assert!(VoiceError::AudioStream("stalled".into()).is_device_failure());
        assert!(!VoiceError::Stt("503".into()).is_device_failure());
        assert!(!VoiceError::SpeechQueueClosed.is_device_failure());
    }

    #[test]
    fn cpal_errors_map_to_device_variants() {
        let err: VoiceError = cpal::BuildStreamError::DeviceNotAvailable.into();
        assert!(matches!(err, VoiceError::AudioStream(_)));
    }
}
