//! # voxfs Core - voice command interpreter
//!
//! Turns transcripts into calls against a remote file-system REST API:
//!
//! ```text
//! Listener ─▶ normalize ─▶ matcher (GRAMMAR) ─▶ [content dialog] ─▶ Dispatcher ─▶ ApiGateway
//!                                                                      │
//!                                                    planner (rename / delete fallbacks)
//!                                                                      │
//!                                          StatusReporter ◀── CommandReport
//! ```
//!
//! [`Supervisor`] drives the loop; everything else is usable on its own.

pub mod config;
pub mod credentials;
pub mod dialog;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod grammar;
pub mod matcher;
pub mod normalize;
pub mod planner;
pub mod status;
pub mod supervisor;

pub use config::{InterpreterConfig, DEFAULT_FALLBACK_TOKEN};
pub use credentials::CredentialResolver;
pub use dispatch::{CommandReport, Dispatcher};
pub use error::{InterpreterError, InterpreterResult};
pub use gateway::{ApiGateway, ApiOutcome};
pub use grammar::{CommandKind, CommandSpec, Endpoint, Verb, GRAMMAR};
pub use matcher::{parse, ParseError, ParsedCommand};
pub use normalize::normalize;
pub use status::{StatusEvent, StatusReporter};
pub use supervisor::{CycleOutcome, LoopState, StopReason, Supervisor};
