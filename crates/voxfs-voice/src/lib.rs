//! # voxfs Voice - the speech edge
//!
//! Everything between the microphone/speaker and the command interpreter.
//!
//! ```text
//! ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//! │   Audio In   │→ │  WebRTC VAD  │→ │  Endpointer  │→ │  STT backend │ → ListenOutcome
//! │    (cpal)    │  │  (30ms)      │  │  (800ms gap) │  │  (HTTP)      │
//! └──────────────┘  └──────────────┘  └──────────────┘  └──────────────┘
//!
//!  SpeechHandle ──(bounded queue)──▶ SpeechActor thread: TTS backend → rodio sink
//! ```

pub mod audio;
pub mod ear;
pub mod endpoint;
pub mod error;
pub mod listener;
pub mod service;
pub mod speech;
pub mod stt;
pub mod tts;
pub mod vad;
pub mod voice_output;

pub use audio::{AudioCapture, AudioConfig, AudioFrame, FrameSplitter, FRAME_MS};
pub use ear::{AudioTurn, EarConfig, ListenWindow, VoiceEar};
pub use endpoint::{Endpoint, EndpointConfig, Endpointer};
pub use error::{VoiceError, VoiceResult};
pub use listener::{ListenOutcome, Listener, MicrophoneListener, ScriptedListener};
pub use service::SpeechService;
pub use speech::{SpeechActor, SpeechHandle, DEFAULT_SPEECH_QUEUE};
pub use stt::{create_best_stt, OpenAiStt, PlaceholderStt, SttBackend};
pub use vad::{VadConfig, VadDetector};
pub use tts::{create_best_tts, OpenAiTts, PlaceholderTts, TtsBackend};
pub use voice_output::VoiceOutput;
