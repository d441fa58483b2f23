//! Playback of synthesized speech on the default output device (rodio).

use crate::error::{VoiceError, VoiceResult};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use tracing::debug;

/// Output stream plus a sink. `OutputStream` is not `Send` on every platform, so this lives on
/// the speech actor's thread for its whole life.
pub struct VoiceOutput {
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
}

impl VoiceOutput {
    pub fn new() -> VoiceResult<Self> {
        let playback = |e: &dyn std::fmt::Display| VoiceError::Playback(e.to_string());
        let (stream, handle) = OutputStream::try_default().map_err(|e| playback(&e))?;
        let sink = Sink::try_new(&handle).map_err(|e| playback(&e))?;
        debug!("output sink ready");
        Ok(Self {
            _stream: stream,
            _handle: handle,
            sink,
        })
    }

    /// Decode `audio` and block until it has been played.
    pub fn play_blocking(&self, audio: &[u8]) -> VoiceResult<()> {
        if audio.is_empty() {
            return Ok(());
        }
        let source = Decoder::new(Cursor::new(audio.to_vec()))
            .map_err(|e| VoiceError::Playback(format!("cannot decode speech audio: {}", e)))?;
        self.sink.append(source.convert_samples::<f32>());
        self.sink.sleep_until_end();
        Ok(())
    }
}
