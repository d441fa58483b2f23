//! Error types for the interpreter.
//!
//! Per-command failures (recognition, parse, API, transport) are outcomes, not errors; see
//! `voxfs_voice::ListenOutcome`, `crate::matcher::ParseError` and `crate::gateway::ApiOutcome`.
//! `InterpreterError` covers setup and the few failures that end the session.

use thiserror::Error;
use voxfs_voice::VoiceError;

pub type InterpreterResult<T> = Result<T, InterpreterError>;

#[derive(Error, Debug)]
pub enum InterpreterError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Voice error: {0}")]
    Voice(#[from] VoiceError),
}
