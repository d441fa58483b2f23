//! Status channel: an overwrite-only text file polled by the UI, plus spoken feedback.
//!
//! Machine-readable tags (`FOLDER_CREATED_{name}` etc.) are written with [`StatusReporter::report`],
//! which speaks a separate human message afterwards without touching the file, so the tag stays
//! visible until the next state change.

use crate::grammar::CommandKind;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use voxfs_voice::SpeechHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    Listening,
    Processing,
    Recognized(String),
    ProcessingContent,
    ContentRecognized(String),
    Completed,
    Stopped,
    /// Fatal loop error.
    Failed(String),
    /// Free-form announcement mirrored to the file.
    Message(String),

    FolderCreated(String),
    FolderCreateFailed(String),
    FolderRemoved(String),
    FolderRemoveFailed(String),
    FileCreated(String),
    FileCreateFailed(String),
    FileAppended(String),
    FileAppendFailed(String),
    FileEdited(String),
    FileEditFailed(String),
    FileDeleted(String),
    FileDeleteFailed(String),
    ItemDeleted(String),
    ItemDeleteFailed(String),
    Renamed { old: String, new: String },
    RenameFailed { old: String, new: String },
    DirectoryChanged(String),
    DirectoryChangeFailed(String),
    Listed(usize),
    ListFailed,
    CurrentDirectory(String),
    CurrentDirectoryFailed,

    RenameParseFailed,
    MissingName(CommandKind),
    Unrecognized,
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use StatusEvent::*;
        match self {
            Listening => f.write_str("Listening..."),
            Processing => f.write_str("Processing your command..."),
            Recognized(t) => write!(f, "Recognized: {}", t),
            ProcessingContent => f.write_str("Processing your file content..."),
            ContentRecognized(t) => write!(f, "Content recognized: {}", t),
            Completed => f.write_str("Command completed"),
            Stopped => f.write_str("Voice recognition stopped"),
            Failed(e) => write!(f, "Error: {}", e),
            Message(m) => f.write_str(m),

            FolderCreated(n) => write!(f, "FOLDER_CREATED_{}", n),
            FolderCreateFailed(n) => write!(f, "ERROR_CREATING_FOLDER_{}", n),
            FolderRemoved(n) => write!(f, "FOLDER_REMOVED_{}", n),
            FolderRemoveFailed(n) => write!(f, "ERROR_REMOVING_FOLDER_{}", n),
            FileCreated(n) => write!(f, "FILE_CREATED_{}", n),
            FileCreateFailed(n) => write!(f, "ERROR_CREATING_FILE_{}", n),
            FileAppended(n) => write!(f, "FILE_APPENDED_{}", n),
            FileAppendFailed(n) => write!(f, "ERROR_APPENDING_FILE_{}", n),
            FileEdited(n) => write!(f, "FILE_EDITED_{}", n),
            FileEditFailed(n) => write!(f, "ERROR_EDITING_FILE_{}", n),
            FileDeleted(n) => write!(f, "FILE_DELETED_{}", n),
            FileDeleteFailed(n) => write!(f, "ERROR_DELETING_FILE_{}", n),
            ItemDeleted(n) => write!(f, "ITEM_DELETED_{}", n),
            ItemDeleteFailed(n) => write!(f, "ERROR_DELETING_{}", n),
            Renamed { old, new } => write!(f, "RENAME_SUCCESS_{}_TO_{}", old, new),
            RenameFailed { old, new } => write!(f, "ERROR_RENAMING_{}_TO_{}", old, new),
            DirectoryChanged(n) => write!(f, "DIRECTORY_CHANGED_{}", n),
            DirectoryChangeFailed(n) => write!(f, "ERROR_CHANGING_DIRECTORY_{}", n),
            Listed(count) => write!(f, "LISTED_{}_ITEMS", count),
            ListFailed => f.write_str("ERROR_LISTING_FILES"),
            CurrentDirectory(p) => write!(f, "CURRENT_DIRECTORY_{}", p),
            CurrentDirectoryFailed => f.write_str("ERROR_READING_DIRECTORY"),

            RenameParseFailed => f.write_str("ERROR_PARSING_RENAME"),
            MissingName(kind) => write!(f, "ERROR_MISSING_NAME_{}", kind.tag()),
            Unrecognized => f.write_str("UNRECOGNIZED_COMMAND"),
        }
    }
}

/// Writes status events to every configured file and forwards speech to the speech actor.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    files: Arc<Vec<PathBuf>>,
    speech: SpeechHandle,
}

impl StatusReporter {
    pub fn new(files: Vec<PathBuf>, speech: SpeechHandle) -> Self {
        Self {
            files: Arc::new(files),
            speech,
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn update(&self, event: &StatusEvent) {
        self.write(&event.to_string());
    }

    /// Overwrite every status file with `text`. The first file is primary; mirror failures
    /// are only logged.
    pub fn write(&self, text: &str) {
        for (i, path) in self.files.iter().enumerate() {
            match write_whole(path, text) {
                Ok(()) => debug!(path = %path.display(), status = %text, "status updated"),
                Err(e) if i == 0 => warn!(path = %path.display(), "error updating status file: {}", e),
                Err(e) => debug!(path = %path.display(), "could not update mirror status file: {}", e),
            }
        }
    }

    pub fn speak(&self, text: impl Into<String>) {
        self.speech.speak(text);
    }

    /// Write `text` to the status channel and speak it.
    pub fn announce(&self, text: impl Into<String>) {
        let text = text.into();
        self.write(&text);
        self.speech.speak(text);
    }

    /// Write the machine-readable `event`, then speak `spoken`.
    pub fn report(&self, event: &StatusEvent, spoken: impl Into<String>) {
        self.update(event);
        self.speech.speak(spoken);
    }

    /// Current contents of the primary status file.
    pub fn read_back(&self) -> Option<String> {
        self.files.first().and_then(|p| std::fs::read_to_string(p).ok())
    }
}

fn write_whole(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_embed_parameters() {
        assert_eq!(
            StatusEvent::FolderCreated("my_projects".into()).to_string(),
            "FOLDER_CREATED_my_projects"
        );
        assert_eq!(
            StatusEvent::RenameFailed {
                old: "a".into(),
                new: "b".into()
            }
            .to_string(),
            "ERROR_RENAMING_a_TO_b"
        );
        assert_eq!(StatusEvent::Listed(3).to_string(), "LISTED_3_ITEMS");
        assert_eq!(
            StatusEvent::MissingName(CommandKind::CreateFolder).to_string(),
            "ERROR_MISSING_NAME_CREATE_FOLDER"
        );
        assert_eq!(StatusEvent::Recognized("go back".into()).to_string(), "Recognized: go back");
    }

    #[test]
    fn status_file_holds_only_the_latest_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voice_status.txt");
        let reporter = StatusReporter::new(vec![path.clone()], SpeechHandle::silent());

        reporter.update(&StatusEvent::Processing);
        reporter.update(&StatusEvent::FileCreated("a.txt".into()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "FILE_CREATED_a.txt");
        assert_eq!(reporter.read_back().as_deref(), Some("FILE_CREATED_a.txt"));
    }

    #[test]
    fn report_speaks_without_overwriting_the_tag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.txt");
        let (speech, mut rx) = SpeechHandle::channel(4);
        let reporter = StatusReporter::new(vec![path], speech);

        reporter.report(&StatusEvent::FolderCreated("x".into()), "Success! Folder x has been created.");
        assert_eq!(reporter.read_back().as_deref(), Some("FOLDER_CREATED_x"));
        assert_eq!(rx.try_recv().unwrap(), "Success! Folder x has been created.");

        reporter.announce("I didn't hear anything. Please try again.");
        assert_eq!(reporter.read_back().as_deref(), Some("I didn't hear anything. Please try again."));
        assert_eq!(rx.try_recv().unwrap(), "I didn't hear anything. Please try again.");
    }

    #[test]
    fn mirror_files_get_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("status.txt");
        let mirror = dir.path().join("frontend").join("public").join("status.txt");
        let reporter = StatusReporter::new(vec![primary.clone(), mirror.clone()], SpeechHandle::silent());

        reporter.update(&StatusEvent::Listening);
        assert_eq!(std::fs::read_to_string(primary).unwrap(), "Listening...");
        assert_eq!(std::fs::read_to_string(mirror).unwrap(), "Listening...");
    }
}
