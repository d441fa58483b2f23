//! Follow-up dictation for commands that carry a file body.

use crate::status::{StatusEvent, StatusReporter};
use tracing::{info, warn};
use voxfs_voice::{ListenOutcome, ListenWindow, Listener};

pub const CONTENT_PROMPT: &str = "What content would you like to add to this file? Please speak now.";

/// Ask for the file body and listen once. Any failure degrades to empty content.
pub async fn request_content(
    listener: &dyn Listener,
    reporter: &StatusReporter,
    window: ListenWindow,
) -> String {
    reporter.announce(CONTENT_PROMPT);

    match listener.listen(window).await {
        ListenOutcome::Transcript(content) => {
            reporter.update(&StatusEvent::ProcessingContent);
            reporter.update(&StatusEvent::ContentRecognized(content.clone()));
            info!(chars = content.len(), "file content recognized");
            content
        }
        ListenOutcome::NoMatch => {
            reporter.announce("Could not understand the file content. Using empty file.");
            String::new()
        }
        ListenOutcome::Unavailable(e) => {
            reporter.announce(format!("Could not process file content; {}. Using empty file.", e));
            String::new()
        }
        ListenOutcome::TimedOut => {
            reporter.announce("Did not hear any content. Using empty file.");
            String::new()
        }
        ListenOutcome::DeviceFailure(e) => {
            warn!("capture failed during content dialog: {}", e);
            reporter.announce(format!("Error while listening for content: {}. Using empty file.", e));
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use voxfs_voice::{ScriptedListener, SpeechHandle};

    fn window() -> ListenWindow {
        ListenWindow::new(Duration::from_secs(10), Duration::from_secs(10))
    }

    fn reporter(dir: &tempfile::TempDir) -> StatusReporter {
        StatusReporter::new(vec![dir.path().join("status.txt")], SpeechHandle::silent())
    }

    #[tokio::test]
    async fn transcript_becomes_content_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = reporter(&dir);
        let listener = ScriptedListener::from_transcripts(["Hello World."]);

        let content = request_content(&listener, &reporter, window()).await;
        assert_eq!(content, "Hello World.");
        assert_eq!(reporter.read_back().as_deref(), Some("Content recognized: Hello World."));
        assert_eq!(listener.windows(), vec![window()]);
    }

    #[tokio::test]
    async fn every_failure_degrades_to_empty_content() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = reporter(&dir);
        let cases = [
            (ListenOutcome::NoMatch, "Could not understand the file content. Using empty file."),
            (ListenOutcome::TimedOut, "Did not hear any content. Using empty file."),
            (
                ListenOutcome::Unavailable("503".into()),
                "Could not process file content; 503. Using empty file.",
            ),
            (
                ListenOutcome::DeviceFailure("unplugged".into()),
                "Error while listening for content: unplugged. Using empty file.",
            ),
        ];

        for (outcome, message) in cases {
            let listener = ScriptedListener::new([outcome]);
            assert_eq!(request_content(&listener, &reporter, window()).await, "");
            assert_eq!(reporter.read_back().as_deref(), Some(message));
        }
    }
}
