//! Microphone capture (cpal).
//!
//! The device callback downmixes to mono and cuts the stream into fixed [`FRAME_MS`] frames,
//! the unit the VAD classifies.

use crate::error::{VoiceError, VoiceResult};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use std::sync::mpsc::Sender;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Length of one VAD frame.
pub const FRAME_MS: usize = 30;

#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Capture rate in Hz; must be one the VAD accepts (8/16/32/48 kHz).
    pub sample_rate: u32,
    /// Channels requested from the device. Frames are always mono.
    pub channels: u16,
    /// Input device name; `None` uses the host default.
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            channels: 1,
            device: None,
        }
    }
}

impl AudioConfig {
    /// Samples per mono frame (480 at 16 kHz).
    pub fn frame_len(&self) -> usize {
        self.sample_rate as usize * FRAME_MS / 1000
    }
}

/// One mono frame of `frame_len` samples in -1.0..1.0.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub samples: Vec<f32>,
    pub captured_at: Instant,
}

/// Turns interleaved device buffers of arbitrary size into fixed mono frames.
#[derive(Debug)]
pub struct FrameSplitter {
    channels: usize,
    frame_len: usize,
    pending: Vec<f32>,
}

impl FrameSplitter {
    pub fn new(channels: u16, frame_len: usize) -> Self {
        Self {
            channels: channels.max(1) as usize,
            frame_len: frame_len.max(1),
            pending: Vec::with_capacity(frame_len),
        }
    }

    /// Feed one interleaved buffer; `emit` is called once per completed frame.
    pub fn push(&mut self, interleaved: &[f32], mut emit: impl FnMut(Vec<f32>)) {
        for group in interleaved.chunks(self.channels) {
            let mono = group.iter().sum::<f32>() / group.len() as f32;
            self.pending.push(mono);
            if self.pending.len() == self.frame_len {
                emit(std::mem::replace(&mut self.pending, Vec::with_capacity(self.frame_len)));
            }
        }
    }

    /// Samples waiting for the next frame.
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }
}

/// An opened, not yet running, input device.
pub struct AudioCapture {
    device: Device,
    stream_config: StreamConfig,
    frame_len: usize,
}

impl AudioCapture {
    pub fn new(config: AudioConfig) -> VoiceResult<Self> {
        let host = cpal::default_host();
        let device = match &config.device {
            Some(wanted) => host
                .input_devices()?
                .find(|d| d.name().map(|n| &n == wanted).unwrap_or(false))
                .ok_or_else(|| VoiceError::AudioDevice(format!("input device '{}' not found", wanted)))?,
            None => host
                .default_input_device()
                .ok_or_else(|| VoiceError::AudioDevice("No input device available".to_string()))?,
        };

        // No usable input configuration at all is a device failure, not a stream error later.
        let supported = device.default_input_config()?;
        debug!(
            device = %device.name().unwrap_or_else(|_| "unknown".to_string()),
            requested_rate = config.sample_rate,
            native_rate = supported.sample_rate().0,
            "input device opened"
        );

        Ok(Self {
            device,
            stream_config: StreamConfig {
                channels: config.channels,
                sample_rate: cpal::SampleRate(config.sample_rate),
                buffer_size: cpal::BufferSize::Default,
            },
            frame_len: config.frame_len(),
        })
    }

    /// Start the stream; frames go to `frames` until the returned stream is dropped.
    pub fn start_capture(self, frames: Sender<AudioFrame>) -> VoiceResult<Stream> {
        let mut splitter = FrameSplitter::new(self.stream_config.channels, self.frame_len);

        let stream = self.device.build_input_stream(
            &self.stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                splitter.push(data, |samples| {
                    // A closed receiver only means the listen window is over.
                    let _ = frames.send(AudioFrame {
                        samples,
                        captured_at: Instant::now(),
                    });
                });
            },
            |err| warn!("Audio stream error: {}", err),
            None,
        )?;

        stream.play()?;
        info!("Audio capture started");
        Ok(stream)
    }

    pub fn list_input_devices() -> VoiceResult<Vec<String>> {
        Ok(cpal::default_host()
            .input_devices()?
            .filter_map(|d| d.name().ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_thirty_ms() {
        assert_eq!(AudioConfig::default().frame_len(), 480);
        let hi = AudioConfig {
            sample_rate: 48_000,
            ..Default::default()
        };
        assert_eq!(hi.frame_len(), 1440);
    }

    #[test]
    fn splitter_carries_partial_frames_across_buffers() {
        let mut splitter = FrameSplitter::new(1, 4);
        let mut frames = Vec::new();
        splitter.push(&[0.1, 0.2, 0.3], |f| frames.push(f));
        assert!(frames.is_empty());
        assert_eq!(splitter.buffered(), 3);

        splitter.push(&[0.4, 0.5, 0.6, 0.7, 0.8, 0.9], |f| frames.push(f));
        assert_eq!(frames, vec![vec![0.1, 0.2, 0.3, 0.4], vec![0.5, 0.6, 0.7, 0.8]]);
        assert_eq!(splitter.buffered(), 1);
    }

    #[test]
    fn splitter_downmixes_stereo() {
        let mut splitter = FrameSplitter::new(2, 2);
        let mut frames = Vec::new();
        splitter.push(&[1.0, 0.0, -0.5, -0.5], |f| frames.push(f));
        assert_eq!(frames, vec![vec![0.5, -0.5]]);
    }
}
