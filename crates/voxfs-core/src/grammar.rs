//! The command grammar: an ordered table of trigger phrases → REST operations.
//!
//! Matching is first-match over [`GRAMMAR`], so order is part of the contract. Two rules
//! keep the table sound and are checked by tests:
//!
//! - a phrase of an earlier entry never occurs inside a phrase of a later entry
//!   (otherwise the later phrase could never be selected);
//! - within one entry, a phrase that contains another phrase of the same entry is listed
//!   first, so stripping removes the longer form before the shorter one.
//!
//! Every phrase of the create entries starts with its verb. A bare noun phrase such as
//! "new folder" would also match item names spoken in later commands ("delete new folder").

use std::fmt;

/// HTTP verb used against the file-system API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Delete => "DELETE",
        })
    }
}

/// Where a command lands on the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Fixed path, no parameter (e.g. `/ls`).
    Fixed(&'static str),
    /// Prefix followed by the parameter as the last path segment (e.g. `/mkdir/{name}`).
    Named(&'static str),
    /// Several calls sequenced by the planner.
    Compound,
}

impl Endpoint {
    /// Concrete path for `param`. `None` for compound operations.
    pub fn path(&self, param: &str) -> Option<String> {
        match self {
            Endpoint::Fixed(p) => Some((*p).to_string()),
            Endpoint::Named(prefix) => Some(format!("{}{}", prefix, encode_segment(param))),
            Endpoint::Compound => None,
        }
    }

    pub fn takes_parameter(&self) -> bool {
        !matches!(self, Endpoint::Fixed(_))
    }
}

/// Escape the few characters that would change the meaning of a URL path segment.
pub fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '%' => out.push_str("%25"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            ' ' => out.push_str("%20"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    CreateFolder,
    RemoveFolder,
    CreateFile,
    AppendFile,
    EditFile,
    DeleteFile,
    /// Delete whatever `name` is: file first, then folder.
    Delete,
    Rename,
    GoBack,
    ChangeDirectory,
    ListFiles,
    CurrentDirectory,
}

impl CommandKind {
    /// Upper-case tag used in status-channel events.
    pub fn tag(&self) -> &'static str {
        match self {
            CommandKind::CreateFolder => "CREATE_FOLDER",
            CommandKind::RemoveFolder => "REMOVE_FOLDER",
            CommandKind::CreateFile => "CREATE_FILE",
            CommandKind::AppendFile => "APPEND_FILE",
            CommandKind::EditFile => "EDIT_FILE",
            CommandKind::DeleteFile => "DELETE_FILE",
            CommandKind::Delete => "DELETE",
            CommandKind::Rename => "RENAME",
            CommandKind::GoBack => "GO_BACK",
            CommandKind::ChangeDirectory => "CHANGE_DIRECTORY",
            CommandKind::ListFiles => "LIST_FILES",
            CommandKind::CurrentDirectory => "CURRENT_DIRECTORY",
        }
    }

    /// Spoken description ("create a folder").
    pub fn describe(&self) -> &'static str {
        match self {
            CommandKind::CreateFolder => "create a folder",
            CommandKind::RemoveFolder => "remove a folder",
            CommandKind::CreateFile => "create a file",
            CommandKind::AppendFile => "append to a file",
            CommandKind::EditFile => "edit a file",
            CommandKind::DeleteFile => "delete a file",
            CommandKind::Delete => "delete",
            CommandKind::Rename => "rename",
            CommandKind::GoBack => "go back",
            CommandKind::ChangeDirectory => "open a folder",
            CommandKind::ListFiles => "list files",
            CommandKind::CurrentDirectory => "show the current directory",
        }
    }
}

/// One grammar entry.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub kind: CommandKind,
    /// Canonical phrase first, then synonyms; longer forms precede contained shorter ones.
    pub phrases: &'static [&'static str],
    pub verb: Verb,
    pub endpoint: Endpoint,
    /// Needs a follow-up dictation for the file body.
    pub requires_content: bool,
}

impl CommandSpec {
    pub fn canonical_phrase(&self) -> &'static str {
        self.phrases.first().copied().unwrap_or("")
    }

    pub fn takes_parameter(&self) -> bool {
        self.endpoint.takes_parameter()
    }
}

pub static GRAMMAR: &[CommandSpec] = &[
    CommandSpec {
        kind: CommandKind::CreateFolder,
        phrases: &[
            "create a new folder",
            "create a folder",
            "create folder",
            "make a new folder",
            "make a folder",
            "make folder",
            "make directory",
        ],
        verb: Verb::Post,
        endpoint: Endpoint::Named("/mkdir/"),
        requires_content: false,
    },
    CommandSpec {
        kind: CommandKind::RemoveFolder,
        phrases: &[
            "remove the folder",
            "remove a folder",
            "remove folder",
            "delete the folder",
            "delete a folder",
            "delete folder",
            "remove directory",
            "delete directory",
        ],
        verb: Verb::Delete,
        endpoint: Endpoint::Named("/rmdir/"),
        requires_content: false,
    },
    CommandSpec {
        kind: CommandKind::CreateFile,
        phrases: &[
            "create a new file",
            "create a file",
            "create file",
            "make a file",
            "make file",
        ],
        verb: Verb::Post,
        endpoint: Endpoint::Named("/create-file/"),
        requires_content: true,
    },
    CommandSpec {
        kind: CommandKind::AppendFile,
        phrases: &["append to the file", "append to file", "append to", "add to the file", "add to file"],
        verb: Verb::Post,
        endpoint: Endpoint::Named("/append-file/"),
        requires_content: true,
    },
    CommandSpec {
        kind: CommandKind::EditFile,
        phrases: &["edit the file", "edit file", "overwrite file", "rewrite file"],
        verb: Verb::Post,
        endpoint: Endpoint::Named("/edit-file/"),
        requires_content: true,
    },
    CommandSpec {
        kind: CommandKind::DeleteFile,
        phrases: &[
            "delete the file",
            "delete a file",
            "delete file",
            "remove the file",
            "remove a file",
            "remove file",
        ],
        verb: Verb::Delete,
        endpoint: Endpoint::Named("/delete-file/"),
        requires_content: false,
    },
    CommandSpec {
        kind: CommandKind::Delete,
        phrases: &["delete", "remove"],
        verb: Verb::Delete,
        endpoint: Endpoint::Compound,
        requires_content: false,
    },
    CommandSpec {
        kind: CommandKind::Rename,
        phrases: &["rename"],
        verb: Verb::Post,
        endpoint: Endpoint::Compound,
        requires_content: false,
    },
    CommandSpec {
        kind: CommandKind::GoBack,
        phrases: &["go back", "go up", "parent folder", "parent directory", "previous folder"],
        verb: Verb::Post,
        // `/cd/..` would be collapsed to `/` by URL normalization; the server also routes `/cd..`.
        endpoint: Endpoint::Fixed("/cd.."),
        requires_content: false,
    },
    CommandSpec {
        kind: CommandKind::ChangeDirectory,
        phrases: &[
            "change directory to",
            "change directory",
            "open the folder",
            "open folder",
            "go to the folder",
            "go to folder",
            "navigate to",
            "go into",
            "go to",
        ],
        verb: Verb::Post,
        endpoint: Endpoint::Named("/cd/"),
        requires_content: false,
    },
    CommandSpec {
        kind: CommandKind::ListFiles,
        phrases: &[
            "list all files",
            "list the files",
            "list files",
            "list the contents",
            "list contents",
            "show me the files",
            "show files",
            "what's in here",
        ],
        verb: Verb::Get,
        endpoint: Endpoint::Fixed("/ls"),
        requires_content: false,
    },
    CommandSpec {
        kind: CommandKind::CurrentDirectory,
        phrases: &["current directory", "current folder", "working directory", "where am i"],
        verb: Verb::Get,
        endpoint: Endpoint::Fixed("/pwd"),
        requires_content: false,
    },
];

/// The spec for `kind` in [`GRAMMAR`].
pub fn spec_for(kind: CommandKind) -> &'static CommandSpec {
    GRAMMAR
        .iter()
        .find(|s| s.kind == kind)
        .unwrap_or_else(|| unreachable!("every CommandKind has a grammar entry"))
}
