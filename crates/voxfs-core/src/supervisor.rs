//! The main listen → interpret → execute → report loop.
//!
//! One command at a time. Recognition, parse, API and transport failures are reported and
//! the loop keeps going; only a capture-device failure, a stop phrase or an external
//! interrupt ends it.

use crate::config::InterpreterConfig;
use crate::dialog;
use crate::dispatch::{intent_message, Dispatcher};
use crate::gateway::ApiGateway;
use crate::matcher::{self, ParseError};
use crate::normalize::normalize;
use crate::status::{StatusEvent, StatusReporter};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};
use voxfs_voice::{ListenOutcome, Listener};

pub const LISTEN_PROMPT: &str = "Listening. Please speak your command now.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Listening,
    Processing,
    ContentDialog,
    Reporting,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    StopPhrase,
    Interrupted,
    DeviceFailure(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::StopPhrase => f.write_str("stop phrase"),
            StopReason::Interrupted => f.write_str("interrupted"),
            StopReason::DeviceFailure(e) => write!(f, "capture device failure: {}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Continue,
    Stop(StopReason),
}

pub struct Supervisor {
    config: InterpreterConfig,
    listener: Arc<dyn Listener>,
    dispatcher: Dispatcher,
    reporter: StatusReporter,
    stop_phrases: Vec<String>,
    state: LoopState,
}

impl Supervisor {
    pub fn new(
        config: InterpreterConfig,
        listener: Arc<dyn Listener>,
        gateway: ApiGateway,
        reporter: StatusReporter,
    ) -> Self {
        let stop_phrases = config
            .stop_phrases
            .iter()
            .map(|p| normalize(p))
            .filter(|p| !p.is_empty())
            .collect();
        Self {
            config,
            listener,
            dispatcher: Dispatcher::new(gateway),
            reporter,
            stop_phrases,
            state: LoopState::Listening,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn reporter(&self) -> &StatusReporter {
        &self.reporter
    }

    /// Loop until stopped. The stop status has been written when this returns.
    pub async fn run(&mut self) -> StopReason {
        info!("voice command loop started");
        loop {
            match self.run_cycle().await {
                CycleOutcome::Continue => {
                    // Give a polling UI time to see the command's own status first.
                    tokio::time::sleep(self.config.cycle_delay()).await;
                    self.reporter.update(&StatusEvent::Completed);
                    tokio::time::sleep(self.config.cycle_delay()).await;
                }
                CycleOutcome::Stop(reason) => {
                    self.stop(&reason);
                    return reason;
                }
            }
        }
    }

    /// One listen cycle.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.state = LoopState::Listening;
        self.reporter.update(&StatusEvent::Listening);
        self.reporter.speak(LISTEN_PROMPT);

        let outcome = self.listener.listen(self.config.command_window()).await;
        self.state = LoopState::Processing;

        match outcome {
            ListenOutcome::Transcript(transcript) => {
                self.reporter.update(&StatusEvent::Processing);
                self.process_utterance(&transcript).await
            }
            ListenOutcome::NoMatch => {
                self.reporter.announce("Voice command not understood. Please try again.");
                CycleOutcome::Continue
            }
            ListenOutcome::Unavailable(e) => {
                warn!("speech service error: {}", e);
                self.reporter.announce(format!("Speech service error; {}", e));
                CycleOutcome::Continue
            }
            ListenOutcome::TimedOut => {
                self.reporter.announce("I didn't hear anything. Please try again.");
                CycleOutcome::Continue
            }
            ListenOutcome::DeviceFailure(e) => {
                error!("capture device failed: {}", e);
                CycleOutcome::Stop(StopReason::DeviceFailure(e))
            }
        }
    }

    /// Interpret and execute one transcript.
    pub async fn process_utterance(&mut self, transcript: &str) -> CycleOutcome {
        self.state = LoopState::Processing;
        let echoed = transcript.trim().to_lowercase();
        self.reporter.update(&StatusEvent::Recognized(echoed.clone()));
        info!(transcript = %echoed, "voice command recognized");

        let utterance = normalize(transcript);
        if self.is_stop_phrase(&utterance) {
            info!("stop phrase heard");
            return CycleOutcome::Stop(StopReason::StopPhrase);
        }

        let command = match matcher::parse(&utterance) {
            Ok(command) => command,
            Err(e) => {
                self.state = LoopState::Reporting;
                self.report_parse_error(&e, &echoed);
                return CycleOutcome::Continue;
            }
        };

        self.reporter.speak(intent_message(&command));

        let content = if command.spec.requires_content {
            self.state = LoopState::ContentDialog;
            Some(
                dialog::request_content(
                    self.listener.as_ref(),
                    &self.reporter,
                    self.config.content_window(),
                )
                .await,
            )
        } else {
            None
        };

        self.state = LoopState::Processing;
        let report = self.dispatcher.execute(&command, content).await;

        self.state = LoopState::Reporting;
        info!(status = %report.event, succeeded = report.succeeded, "command finished");
        self.reporter.report(&report.event, report.spoken);
        CycleOutcome::Continue
    }

    /// Enter `Stopped` and write the terminal status.
    pub fn stop(&mut self, reason: &StopReason) {
        self.state = LoopState::Stopped;
        info!(%reason, "voice command loop stopped");
        match reason {
            StopReason::DeviceFailure(e) => self.reporter.update(&StatusEvent::Failed(e.clone())),
            StopReason::StopPhrase | StopReason::Interrupted => {
                self.reporter.update(&StatusEvent::Stopped);
                self.reporter.speak("Voice control stopped.");
            }
        }
    }

    fn is_stop_phrase(&self, utterance: &str) -> bool {
        self.stop_phrases.iter().any(|p| utterance.contains(p.as_str()))
    }

    fn report_parse_error(&self, error: &ParseError, echoed: &str) {
        warn!("{}", error);
        match error {
            ParseError::Unrecognized(_) => self.reporter.report(
                &StatusEvent::Unrecognized,
                format!("Command not recognized: '{}'. Please try again.", echoed),
            ),
            ParseError::MissingParameter(kind) => self.reporter.report(
                &StatusEvent::MissingName(*kind),
                format!("I need a name to {}. Please try again.", kind.describe()),
            ),
            ParseError::Rename(_) => self.reporter.report(
                &StatusEvent::RenameParseFailed,
                "Sorry, I couldn't understand the rename command. Please use the format 'rename X to Y'.",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialResolver;
    use voxfs_voice::{ScriptedListener, SpeechHandle};

    fn supervisor(listener: ScriptedListener, dir: &tempfile::TempDir) -> Supervisor {
        let config = InterpreterConfig {
            cycle_delay_ms: 0,
            ..InterpreterConfig::default()
        };
        // Nothing listens on port 9; any API call becomes a transport failure.
        let gateway = ApiGateway::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            CredentialResolver::new(Vec::new(), "tok"),
        );
        let reporter = StatusReporter::new(vec![dir.path().join("status.txt")], SpeechHandle::silent());
        Supervisor::new(config, Arc::new(listener), gateway, reporter)
    }

    #[tokio::test]
    async fn stop_phrase_ends_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut sup = supervisor(ScriptedListener::from_transcripts(["Stop listening."]), &dir);

        assert_eq!(sup.run().await, StopReason::StopPhrase);
        assert_eq!(sup.state(), LoopState::Stopped);
        assert_eq!(sup.reporter().read_back().as_deref(), Some("Voice recognition stopped"));
    }

    #[tokio::test]
    async fn recognition_failures_do_not_stop_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let listener = ScriptedListener::new([
            ListenOutcome::NoMatch,
            ListenOutcome::Unavailable("quota".into()),
            ListenOutcome::TimedOut,
            ListenOutcome::Transcript("exit voice control".into()),
        ]);
        let mut sup = supervisor(listener, &dir);
        assert_eq!(sup.run().await, StopReason::StopPhrase);
    }

    #[tokio::test]
    async fn device_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let listener = ScriptedListener::new([ListenOutcome::DeviceFailure("no input device".into())]);
        let mut sup = supervisor(listener, &dir);

        assert_eq!(
            sup.run().await,
            StopReason::DeviceFailure("no input device".into())
        );
        assert_eq!(sup.reporter().read_back().as_deref(), Some("Error: no input device"));
    }

    #[tokio::test]
    async fn parse_failures_are_reported_without_stopping() {
        let dir = tempfile::tempdir().unwrap();
        let mut sup = supervisor(ScriptedListener::default(), &dir);

        assert_eq!(sup.process_utterance("rename notes").await, CycleOutcome::Continue);
        assert_eq!(sup.reporter().read_back().as_deref(), Some("ERROR_PARSING_RENAME"));
        assert_eq!(sup.state(), LoopState::Reporting);

        sup.process_utterance("sing me a song").await;
        assert_eq!(sup.reporter().read_back().as_deref(), Some("UNRECOGNIZED_COMMAND"));

        sup.process_utterance("create a folder").await;
        assert_eq!(
            sup.reporter().read_back().as_deref(),
            Some("ERROR_MISSING_NAME_CREATE_FOLDER")
        );
    }

    #[tokio::test]
    async fn transport_failure_is_reported_and_non_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut sup = supervisor(ScriptedListener::default(), &dir);

        assert_eq!(
            sup.process_utterance("create a folder reports").await,
            CycleOutcome::Continue
        );
        assert_eq!(
            sup.reporter().read_back().as_deref(),
            Some("ERROR_CREATING_FOLDER_reports")
        );
    }
}
