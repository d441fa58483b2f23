//! Command matching and parameter extraction over a normalized utterance.

use crate::grammar::{CommandKind, CommandSpec, GRAMMAR};
use thiserror::Error;

/// A matched command with its extracted parameters.
#[derive(Debug, Clone)]
pub struct ParsedCommand {
    pub spec: &'static CommandSpec,
    /// Path segment for the command ("" for parameterless commands). For rename: the old name.
    pub parameter: String,
    /// Rename target.
    pub target: Option<String>,
}

impl ParsedCommand {
    pub fn kind(&self) -> CommandKind {
        self.spec.kind
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("command not recognized: {0:?}")]
    Unrecognized(String),
    #[error("{} needs a name", .0.describe())]
    MissingParameter(CommandKind),
    #[error("could not parse rename: {0:?}")]
    Rename(String),
}

/// First spec (in table order) with any phrase contained in `utterance`.
pub fn match_command<'g>(utterance: &str, grammar: &'g [CommandSpec]) -> Option<&'g CommandSpec> {
    grammar
        .iter()
        .find(|spec| spec.phrases.iter().any(|p| utterance.contains(p)))
}

/// Remove every trigger phrase of `spec` from `utterance` and trim.
pub fn strip_phrases(utterance: &str, spec: &CommandSpec) -> String {
    let mut rest = utterance.to_string();
    for phrase in spec.phrases {
        rest = rest.replace(phrase, " ");
    }
    rest.trim().to_string()
}

/// Collapse whitespace runs into single underscores so spoken names become path segments.
pub fn to_path_segment(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Parameter for a matched spec: stripped utterance as a path segment.
pub fn extract_parameter(utterance: &str, spec: &CommandSpec) -> String {
    to_path_segment(&strip_phrases(utterance, spec))
}

/// Split the remainder of a rename utterance into (old, new).
///
/// With the connector word "to": everything before its first occurrence vs. everything
/// after. Without it: first and last word.
pub fn split_rename(rest: &str) -> Option<(String, String)> {
    let words: Vec<&str> = rest.split_whitespace().collect();
    let (old, new) = match words.iter().position(|w| *w == "to") {
        Some(i) => (words[..i].join(" "), words[i + 1..].join(" ")),
        None if words.len() >= 2 => (words[0].to_string(), words[words.len() - 1].to_string()),
        None => return None,
    };
    let (old, new) = (to_path_segment(&old), to_path_segment(&new));
    if old.is_empty() || new.is_empty() {
        return None;
    }
    Some((old, new))
}

/// Parse a normalized utterance against the default grammar.
pub fn parse(utterance: &str) -> Result<ParsedCommand, ParseError> {
    parse_with(utterance, GRAMMAR)
}

pub fn parse_with(
    utterance: &str,
    grammar: &'static [CommandSpec],
) -> Result<ParsedCommand, ParseError> {
    let spec = match_command(utterance, grammar)
        .ok_or_else(|| ParseError::Unrecognized(utterance.to_string()))?;

    if spec.kind == CommandKind::Rename {
        let rest = strip_phrases(utterance, spec);
        let (old, new) = split_rename(&rest).ok_or(ParseError::Rename(rest))?;
        return Ok(ParsedCommand {
            spec,
            parameter: old,
            target: Some(new),
        });
    }

    let parameter = if spec.takes_parameter() {
        let p = extract_parameter(utterance, spec);
        if p.is_empty() {
            return Err(ParseError::MissingParameter(spec.kind));
        }
        p
    } else {
        String::new()
    };

    Ok(ParsedCommand {
        spec,
        parameter,
        target: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Endpoint, Verb};
    use crate::normalize::normalize;

    fn parsed(raw: &str) -> ParsedCommand {
        parse(&normalize(raw)).unwrap_or_else(|e| panic!("{raw:?}: {e}"))
    }

    const FOLDER: CommandSpec = CommandSpec {
        kind: CommandKind::CreateFolder,
        phrases: &["create a folder"],
        verb: Verb::Post,
        endpoint: Endpoint::Named("/mkdir/"),
        requires_content: false,
    };

    const ANY_CREATE: CommandSpec = CommandSpec {
        kind: CommandKind::CreateFile,
        phrases: &["create"],
        verb: Verb::Post,
        endpoint: Endpoint::Named("/create-file/"),
        requires_content: true,
    };

    static OVERLAPPING: [CommandSpec; 2] = [FOLDER, ANY_CREATE];
    static OVERLAPPING_REVERSED: [CommandSpec; 2] = [ANY_CREATE, FOLDER];

    #[test]
    fn first_declared_spec_wins() {
        let u = "create a folder reports";
        assert_eq!(
            match_command(u, &OVERLAPPING).map(|s| s.kind),
            Some(CommandKind::CreateFolder)
        );
        // The same input with the table reversed goes to the shorter phrase.
        assert_eq!(
            match_command(u, &OVERLAPPING_REVERSED).map(|s| s.kind),
            Some(CommandKind::CreateFile)
        );
        let long = "please create a folder with a really long descriptive name";
        assert_eq!(
            match_command(long, &OVERLAPPING_REVERSED).map(|s| s.kind),
            Some(CommandKind::CreateFile)
        );
    }

    #[test]
    fn folder_name_with_spaces_becomes_underscored() {
        let cmd = parsed("create a folder my projects");
        assert_eq!(cmd.kind(), CommandKind::CreateFolder);
        assert_eq!(cmd.parameter, "my_projects");
    }

    #[test]
    fn extraction_is_whitespace_idempotent() {
        assert_eq!(
            parsed("create a folder   my   stuff").parameter,
            parsed("create a folder my stuff").parameter
        );
        assert_eq!(parsed("create a folder my stuff").parameter, "my_stuff");
    }

    #[test]
    fn every_synonym_is_stripped() {
        // filler repeats a synonym of the same command
        let cmd = parsed("make a folder called reports make folder");
        assert_eq!(cmd.parameter, "called_reports");
    }

    #[test]
    fn spoken_file_name() {
        let cmd = parsed("create file notes dot txt");
        assert_eq!(cmd.kind(), CommandKind::CreateFile);
        assert_eq!(cmd.parameter, "notes.txt");
        assert!(cmd.spec.requires_content);
    }

    #[test]
    fn specific_delete_forms_precede_generic_delete() {
        assert_eq!(parsed("delete folder old stuff").kind(), CommandKind::RemoveFolder);
        assert_eq!(parsed("delete file draft dot md").kind(), CommandKind::DeleteFile);
        let generic = parsed("remove draft");
        assert_eq!(generic.kind(), CommandKind::Delete);
        assert_eq!(generic.parameter, "draft");
    }

    #[test]
    fn item_names_do_not_trigger_create_commands() {
        let cmd = parsed("delete new folder");
        assert_eq!(cmd.kind(), CommandKind::Delete);
        assert_eq!(cmd.parameter, "new_folder");

        let cmd = parsed("remove the new file");
        assert_eq!(cmd.kind(), CommandKind::Delete);
        assert_eq!(cmd.parameter, "the_new_file");

        let cmd = parsed("rename draft to new file");
        assert_eq!(cmd.kind(), CommandKind::Rename);
        assert_eq!(cmd.parameter, "draft");
        assert_eq!(cmd.target.as_deref(), Some("new_file"));

        let cmd = parsed("rename draft to new folder");
        assert_eq!(cmd.kind(), CommandKind::Rename);
        assert_eq!(cmd.target.as_deref(), Some("new_folder"));

        let cmd = parsed("go to new folder");
        assert_eq!(cmd.kind(), CommandKind::ChangeDirectory);
        assert_eq!(cmd.parameter, "new_folder");
    }

    #[test]
    fn create_with_new_keeps_working() {
        let cmd = parsed("create a new folder reports");
        assert_eq!(cmd.kind(), CommandKind::CreateFolder);
        assert_eq!(cmd.parameter, "reports");
        assert_eq!(parsed("make a new folder reports").parameter, "reports");
        assert_eq!(parsed("create a new file todo dot md").parameter, "todo.md");
    }

    #[test]
    fn navigation_commands() {
        let cd = parsed("go to folder documents");
        assert_eq!(cd.kind(), CommandKind::ChangeDirectory);
        assert_eq!(cd.parameter, "documents");
        assert_eq!(parsed("go back").kind(), CommandKind::GoBack);
        assert_eq!(parsed("list files").parameter, "");
        assert_eq!(parsed("where am I").kind(), CommandKind::CurrentDirectory);
    }

    #[test]
    fn rename_with_connector() {
        let cmd = parsed("rename notes to archive");
        assert_eq!(cmd.kind(), CommandKind::Rename);
        assert_eq!(cmd.parameter, "notes");
        assert_eq!(cmd.target.as_deref(), Some("archive"));
    }

    #[test]
    fn rename_connector_splits_on_first_occurrence() {
        let cmd = parsed("rename road trip to do list to trips");
        assert_eq!(cmd.parameter, "road_trip");
        assert_eq!(cmd.target.as_deref(), Some("do_list_to_trips"));
    }

    #[test]
    fn rename_without_connector_uses_first_and_last_word() {
        let cmd = parsed("rename notes archive");
        assert_eq!(cmd.parameter, "notes");
        assert_eq!(cmd.target.as_deref(), Some("archive"));
        let cmd = parsed("rename notes please archive");
        assert_eq!(cmd.target.as_deref(), Some("archive"));
    }

    #[test]
    fn rename_with_one_word_is_a_parse_failure() {
        assert!(matches!(parse(&normalize("rename notes")), Err(ParseError::Rename(_))));
        assert!(matches!(parse(&normalize("rename notes to")), Err(ParseError::Rename(_))));
        assert!(matches!(parse(&normalize("rename to archive")), Err(ParseError::Rename(_))));
    }

    #[test]
    fn missing_name_is_a_recognition_failure() {
        assert_eq!(
            parse(&normalize("create a folder")).unwrap_err(),
            ParseError::MissingParameter(CommandKind::CreateFolder)
        );
    }

    #[test]
    fn parse_with_a_custom_table() {
        let cmd = parse_with("create a folder reports", &OVERLAPPING_REVERSED).unwrap();
        assert_eq!(cmd.kind(), CommandKind::CreateFile);
        assert_eq!(cmd.parameter, "a_folder_reports");
    }

    #[test]
    fn unrecognized_utterance() {
        assert!(matches!(parse(&normalize("what's the weather")), Err(ParseError::Unrecognized(_))));
    }
}
