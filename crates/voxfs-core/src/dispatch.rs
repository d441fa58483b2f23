//! Maps a parsed command onto API calls and turns the outcome into a status report.

use crate::gateway::{parse_listing, parse_pwd, ApiGateway, ApiOutcome};
use crate::grammar::CommandKind;
use crate::matcher::ParsedCommand;
use crate::planner;
use crate::status::StatusEvent;
use tracing::warn;

/// What a finished command writes to the status channel and says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReport {
    pub event: StatusEvent,
    pub spoken: String,
    pub succeeded: bool,
}

impl CommandReport {
    pub fn success(event: StatusEvent, spoken: impl Into<String>) -> Self {
        Self {
            event,
            spoken: spoken.into(),
            succeeded: true,
        }
    }

    pub fn failure(event: StatusEvent, spoken: impl Into<String>) -> Self {
        Self {
            event,
            spoken: spoken.into(),
            succeeded: false,
        }
    }
}

/// Spoken before the API calls start ("Creating folder: reports").
pub fn intent_message(cmd: &ParsedCommand) -> String {
    let name = &cmd.parameter;
    match cmd.kind() {
        CommandKind::CreateFolder => format!("Creating folder: {}", name),
        CommandKind::RemoveFolder => format!("Removing folder: {}", name),
        CommandKind::CreateFile => format!("Creating file: {}", name),
        CommandKind::AppendFile => format!("Appending to file: {}", name),
        CommandKind::EditFile => format!("Editing file: {}", name),
        CommandKind::DeleteFile => format!("Deleting file: {}", name),
        CommandKind::Delete => format!("Deleting: {}", name),
        CommandKind::Rename => format!(
            "Renaming {} to {}",
            name,
            cmd.target.as_deref().unwrap_or_default()
        ),
        CommandKind::GoBack => "Going back to the parent folder".to_string(),
        CommandKind::ChangeDirectory => format!("Opening folder: {}", name),
        CommandKind::ListFiles => "Listing files".to_string(),
        CommandKind::CurrentDirectory => "Checking the current directory".to_string(),
    }
}

pub struct Dispatcher {
    gateway: ApiGateway,
}

impl Dispatcher {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    /// Run `cmd`. `content` is the dictated body for content-bearing commands.
    pub async fn execute(&self, cmd: &ParsedCommand, content: Option<String>) -> CommandReport {
        let name = cmd.parameter.clone();
        match Route::of(cmd.kind()) {
            Route::Single(call) => {
                let outcome = self.single_call(cmd, content).await;
                let (ok, err) = simple_reports(call, &name);
                if outcome.is_success() {
                    ok
                } else {
                    log_failure(cmd.kind(), &outcome);
                    err
                }
            }
            Route::Delete => planner::delete_item(&self.gateway, &name).await,
            Route::Rename => match cmd.target.as_deref() {
                Some(new) => planner::rename_item(&self.gateway, &name, new).await,
                None => CommandReport::failure(
                    StatusEvent::RenameParseFailed,
                    "Sorry, I couldn't understand the rename command. Please use the format 'rename X to Y'.",
                ),
            },
            Route::List => self.list_files(cmd).await,
            Route::WorkingDirectory => self.current_directory(cmd).await,
        }
    }

    async fn single_call(&self, cmd: &ParsedCommand, content: Option<String>) -> ApiOutcome {
        let Some(path) = cmd.spec.endpoint.path(&cmd.parameter) else {
            return ApiOutcome::Transport(format!("{} has no single endpoint", cmd.kind().tag()));
        };
        let body = if cmd.spec.requires_content {
            Some(content.unwrap_or_default())
        } else {
            None
        };
        self.gateway.call(cmd.spec.verb, &path, body).await
    }

    async fn list_files(&self, cmd: &ParsedCommand) -> CommandReport {
        let outcome = self.single_call(cmd, None).await;
        let items = match &outcome {
            ApiOutcome::Success { body } => parse_listing(body),
            _ => None,
        };
        match items {
            Some(items) if items.is_empty() => {
                CommandReport::success(StatusEvent::Listed(0), "This folder is empty.")
            }
            Some(items) => CommandReport::success(
                StatusEvent::Listed(items.len()),
                format!("{} items: {}", items.len(), items.join(", ")),
            ),
            None => {
                log_failure(CommandKind::ListFiles, &outcome);
                CommandReport::failure(StatusEvent::ListFailed, "Sorry, I couldn't list the files.")
            }
        }
    }

    async fn current_directory(&self, cmd: &ParsedCommand) -> CommandReport {
        let outcome = self.single_call(cmd, None).await;
        let dir = match &outcome {
            ApiOutcome::Success { body } => parse_pwd(body),
            _ => None,
        };
        match dir {
            Some(dir) => CommandReport::success(
                StatusEvent::CurrentDirectory(dir.clone()),
                format!("You are in {}.", dir),
            ),
            None => {
                log_failure(CommandKind::CurrentDirectory, &outcome);
                CommandReport::failure(
                    StatusEvent::CurrentDirectoryFailed,
                    "Sorry, I couldn't read the current directory.",
                )
            }
        }
    }
}

/// Commands answered by exactly one API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SingleCall {
    CreateFolder,
    RemoveFolder,
    CreateFile,
    AppendFile,
    EditFile,
    DeleteFile,
    GoBack,
    ChangeDirectory,
}

/// How the dispatcher handles a command kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Single(SingleCall),
    Delete,
    Rename,
    List,
    WorkingDirectory,
}

impl Route {
    fn of(kind: CommandKind) -> Self {
        match kind {
            CommandKind::CreateFolder => Route::Single(SingleCall::CreateFolder),
            CommandKind::RemoveFolder => Route::Single(SingleCall::RemoveFolder),
            CommandKind::CreateFile => Route::Single(SingleCall::CreateFile),
            CommandKind::AppendFile => Route::Single(SingleCall::AppendFile),
            CommandKind::EditFile => Route::Single(SingleCall::EditFile),
            CommandKind::DeleteFile => Route::Single(SingleCall::DeleteFile),
            CommandKind::GoBack => Route::Single(SingleCall::GoBack),
            CommandKind::ChangeDirectory => Route::Single(SingleCall::ChangeDirectory),
            CommandKind::Delete => Route::Delete,
            CommandKind::Rename => Route::Rename,
            CommandKind::ListFiles => Route::List,
            CommandKind::CurrentDirectory => Route::WorkingDirectory,
        }
    }
}

/// (success, failure) reports for a single-call command.
fn simple_reports(call: SingleCall, name: &str) -> (CommandReport, CommandReport) {
    use StatusEvent::*;
    let n = name.to_string();
    match call {
        SingleCall::CreateFolder => (
            CommandReport::success(FolderCreated(n.clone()), format!("Success! Folder {} has been created.", name)),
            CommandReport::failure(FolderCreateFailed(n), format!("Sorry, I couldn't create the folder {}.", name)),
        ),
        SingleCall::RemoveFolder => (
            CommandReport::success(FolderRemoved(n.clone()), format!("Folder {} has been removed.", name)),
            CommandReport::failure(FolderRemoveFailed(n), format!("Sorry, I couldn't remove the folder {}.", name)),
        ),
        SingleCall::CreateFile => (
            CommandReport::success(
                FileCreated(n.clone()),
                format!("Success! File {} has been created with your content.", name),
            ),
            CommandReport::failure(FileCreateFailed(n), format!("Sorry, I couldn't create the file {}.", name)),
        ),
        SingleCall::AppendFile => (
            CommandReport::success(FileAppended(n.clone()), format!("Added your content to {}.", name)),
            CommandReport::failure(FileAppendFailed(n), format!("Sorry, I couldn't append to the file {}.", name)),
        ),
        SingleCall::EditFile => (
            CommandReport::success(FileEdited(n.clone()), format!("File {} has been updated.", name)),
            CommandReport::failure(FileEditFailed(n), format!("Sorry, I couldn't edit the file {}.", name)),
        ),
        SingleCall::DeleteFile => (
            CommandReport::success(FileDeleted(n.clone()), format!("File {} has been deleted.", name)),
            CommandReport::failure(FileDeleteFailed(n), format!("Sorry, I couldn't delete the file {}.", name)),
        ),
        SingleCall::GoBack => (
            CommandReport::success(DirectoryChanged("..".into()), "Went back to the parent folder."),
            CommandReport::failure(DirectoryChangeFailed("..".into()), "Could not go back to the parent folder."),
        ),
        SingleCall::ChangeDirectory => (
            CommandReport::success(DirectoryChanged(n.clone()), format!("Navigated to folder {}.", name)),
            CommandReport::failure(DirectoryChangeFailed(n), format!("Failed to navigate to folder {}.", name)),
        ),
    }
}

fn log_failure(kind: CommandKind, outcome: &ApiOutcome) {
    match outcome {
        ApiOutcome::ApiError { status, body } => {
            warn!(command = kind.tag(), status = *status, %body, "API rejected command")
        }
        ApiOutcome::Transport(e) => warn!(command = kind.tag(), "API unreachable: {}", e),
        ApiOutcome::Success { body } => {
            warn!(command = kind.tag(), %body, "unexpected API response body")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Endpoint, Verb, GRAMMAR};

    #[test]
    fn single_call_routes_cover_every_non_query_endpoint() {
        // Compound commands go to the planner; GET commands parse their response body.
        for spec in GRAMMAR {
            let single = matches!(Route::of(spec.kind), Route::Single(_));
            let expected = spec.endpoint != Endpoint::Compound && spec.verb != Verb::Get;
            assert_eq!(single, expected, "{:?}", spec.kind);
        }
    }

    #[test]
    fn single_call_reports_carry_the_name() {
        let (ok, err) = simple_reports(SingleCall::CreateFolder, "reports");
        assert!(ok.succeeded);
        assert_eq!(ok.event.to_string(), "FOLDER_CREATED_reports");
        assert!(!err.succeeded);
        assert_eq!(err.event.to_string(), "ERROR_CREATING_FOLDER_reports");

        let (ok, _) = simple_reports(SingleCall::GoBack, "");
        assert_eq!(ok.event.to_string(), "DIRECTORY_CHANGED_..");
    }
}
