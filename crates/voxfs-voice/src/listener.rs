//! The `Listener` seam: one capture-and-transcribe cycle with an explicit outcome.

use crate::ear::{ListenWindow, VoiceEar};
use crate::stt::SttBackend;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Result of one listen cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    /// Words were recognized.
    Transcript(String),
    /// Audio was captured but the engine could not understand it.
    NoMatch,
    /// The recognition service could not be reached or rejected the request.
    Unavailable(String),
    /// Nobody spoke before the window's timeout.
    TimedOut,
    /// The capture device failed; the session cannot continue.
    DeviceFailure(String),
}

impl fmt::Display for ListenOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenOutcome::Transcript(t) => write!(f, "transcript: {}", t),
            ListenOutcome::NoMatch => write!(f, "no match"),
            ListenOutcome::Unavailable(e) => write!(f, "service unavailable: {}", e),
            ListenOutcome::TimedOut => write!(f, "timed out"),
            ListenOutcome::DeviceFailure(e) => write!(f, "device failure: {}", e),
        }
    }
}

/// Captures one utterance and transcribes it.
#[async_trait]
pub trait Listener: Send + Sync {
    async fn listen(&self, window: ListenWindow) -> ListenOutcome;
}

/// Microphone + STT backend.
pub struct MicrophoneListener {
    ear: Arc<VoiceEar>,
    stt: Arc<dyn SttBackend>,
}

impl MicrophoneListener {
    pub fn new(ear: VoiceEar, stt: Arc<dyn SttBackend>) -> Self {
        Self {
            ear: Arc::new(ear),
            stt,
        }
    }
}

#[async_trait]
impl Listener for MicrophoneListener {
    async fn listen(&self, window: ListenWindow) -> ListenOutcome {
        let ear = Arc::clone(&self.ear);
        let stt = Arc::clone(&self.stt);
        // cpal streams and the VAD are !Send; keep capture and the blocking STT client on one thread.
        let joined = tokio::task::spawn_blocking(move || {
            let turn = match ear.capture_utterance(window) {
                Ok(Some(turn)) => turn,
                Ok(None) => return ListenOutcome::TimedOut,
                // VAD/config errors repeat on every cycle, so they end the session as well.
                Err(e) => {
                    if !e.is_device_failure() {
                        warn!("capture setup failed: {}", e);
                    }
                    return ListenOutcome::DeviceFailure(e.to_string());
                }
            };
            match stt.transcribe(&turn) {
                Ok(text) if text.trim().is_empty() => ListenOutcome::NoMatch,
                Ok(text) => ListenOutcome::Transcript(text.trim().to_string()),
                Err(e) => ListenOutcome::Unavailable(e.to_string()),
            }
        })
        .await;

        match joined {
            Ok(outcome) => {
                debug!(%outcome, "listen cycle finished");
                outcome
            }
            Err(e) => ListenOutcome::DeviceFailure(format!("capture task failed: {}", e)),
        }
    }
}

/// Replays a fixed script of outcomes; once exhausted every listen times out.
///
/// Used for dry runs without a microphone and in tests.
#[derive(Debug, Default)]
pub struct ScriptedListener {
    script: Mutex<VecDeque<ListenOutcome>>,
    windows: Mutex<Vec<ListenWindow>>,
}

impl ScriptedListener {
    pub fn new(script: impl IntoIterator<Item = ListenOutcome>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            windows: Mutex::new(Vec::new()),
        }
    }

    /// Script made only of recognized transcripts.
    pub fn from_transcripts<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self::new(lines.into_iter().map(|l| ListenOutcome::Transcript(l.into())))
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Windows requested so far, in call order.
    pub fn windows(&self) -> Vec<ListenWindow> {
        self.windows.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Listener for ScriptedListener {
    async fn listen(&self, window: ListenWindow) -> ListenOutcome {
        if let Ok(mut w) = self.windows.lock() {
            w.push(window);
        }
        self.script
            .lock()
            .ok()
            .and_then(|mut s| s.pop_front())
            .unwrap_or(ListenOutcome::TimedOut)
    }
}
