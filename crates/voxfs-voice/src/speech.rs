//! Speech-output actor.
//!
//! One dedicated thread owns the TTS backend and the output device and drains a bounded
//! queue. Callers hand text to a cloneable [`SpeechHandle`] and never wait for playback;
//! requests are played one after another, so overlapping announcements never talk over
//! each other.

use crate::error::{VoiceError, VoiceResult};
use crate::tts::TtsBackend;
use crate::voice_output::VoiceOutput;
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Default queue depth for pending announcements.
pub const DEFAULT_SPEECH_QUEUE: usize = 16;

/// Fire-and-forget sender for spoken feedback.
#[derive(Debug, Clone)]
pub struct SpeechHandle {
    tx: mpsc::Sender<String>,
}

impl SpeechHandle {
    /// A handle plus the raw receiving end, for callers that consume speech themselves.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// A handle whose requests go nowhere.
    pub fn silent() -> Self {
        let (handle, _rx) = Self::channel(1);
        handle
    }

    /// Queue `text` for playback. Never blocks; a full queue drops the request.
    pub fn speak(&self, text: impl Into<String>) {
        match self.tx.try_send(text.into()) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(text)) => {
                warn!(%text, "speech queue full; dropping announcement");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("speech queue closed");
            }
        }
    }

    /// Queue `text`, reporting a closed queue as an error.
    pub fn try_speak(&self, text: impl Into<String>) -> VoiceResult<()> {
        match self.tx.try_send(text.into()) {
            Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => Ok(()),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(VoiceError::SpeechQueueClosed),
        }
    }
}

/// Owner of the speech worker thread.
pub struct SpeechActor {
    handle: SpeechHandle,
    worker: Option<thread::JoinHandle<()>>,
}

impl SpeechActor {
    /// Spawn the worker. Playback is best-effort: without an output device the
    /// announcements are only logged.
    pub fn spawn(tts: Box<dyn TtsBackend>, capacity: usize) -> VoiceResult<Self> {
        let (handle, mut rx) = SpeechHandle::channel(capacity);
        let worker = thread::Builder::new()
            .name("voxfs-speech".to_string())
            .spawn(move || {
                let output = match VoiceOutput::new() {
                    Ok(o) => Some(o),
                    Err(e) => {
                        warn!("no audio output, announcements will only be logged: {}", e);
                        None
                    }
                };
                while let Some(text) = rx.blocking_recv() {
                    info!(%text, "speaking");
                    let bytes = match tts.synthesize(&text) {
                        Ok(b) => b,
                        Err(e) => {
                            warn!("TTS failed: {}", e);
                            continue;
                        }
                    };
                    if let Some(ref out) = output {
                        if let Err(e) = out.play_blocking(&bytes) {
                            warn!("playback failed: {}", e);
                        }
                    }
                }
                debug!("speech worker exiting");
            })?;
        Ok(Self {
            handle,
            worker: Some(worker),
        })
    }

    pub fn handle(&self) -> SpeechHandle {
        self.handle.clone()
    }

    /// Close this actor's sender and wait for queued speech to finish.
    ///
    /// Only returns once every cloned handle has been dropped too.
    pub fn join(mut self) {
        let worker = self.worker.take();
        drop(self);
        if let Some(w) = worker {
            let _ = w.join();
        }
    }
}
