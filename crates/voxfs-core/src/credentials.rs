//! Bearer-token lookup for the file-system API.
//!
//! The backend rewrites its token file on restart, so candidates are re-read on every
//! request rather than cached.

use crate::config::InterpreterConfig;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CredentialResolver {
    candidates: Vec<PathBuf>,
    fallback: String,
}

impl CredentialResolver {
    pub fn new(candidates: Vec<PathBuf>, fallback: impl Into<String>) -> Self {
        Self {
            candidates,
            fallback: fallback.into(),
        }
    }

    pub fn from_config(config: &InterpreterConfig) -> Self {
        Self::new(config.token_paths.clone(), config.fallback_token.clone())
    }

    /// First candidate file that exists and holds a non-blank token, else the fallback.
    pub fn resolve(&self) -> String {
        for path in &self.candidates {
            match std::fs::read_to_string(path) {
                Ok(raw) => {
                    let token = raw.trim();
                    if !token.is_empty() {
                        debug!(path = %path.display(), "using token file");
                        return token.to_string();
                    }
                }
                Err(_) => continue,
            }
        }
        debug!("no token file found; using fallback token");
        self.fallback.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_existing_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        std::fs::write(&first, "abc123\n").unwrap();
        std::fs::write(&second, "zzz").unwrap();

        let resolver = CredentialResolver::new(vec![missing, first, second], "fallback");
        assert_eq!(resolver.resolve(), "abc123");
    }

    #[test]
    fn blank_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let blank = dir.path().join("blank.txt");
        let real = dir.path().join("real.txt");
        std::fs::write(&blank, "  \n").unwrap();
        std::fs::write(&real, "tok").unwrap();

        let resolver = CredentialResolver::new(vec![blank, real], "fallback");
        assert_eq!(resolver.resolve(), "tok");
    }

    #[test]
    fn falls_back_when_nothing_exists() {
        let dir = tempfile::tempdir().unwrap();
        let resolver =
            CredentialResolver::new(vec![dir.path().join("nope.txt")], crate::config::DEFAULT_FALLBACK_TOKEN);
        assert_eq!(resolver.resolve(), "test_token_for_demonstration");
    }

    #[test]
    fn token_changes_are_seen_on_next_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.txt");
        let resolver = CredentialResolver::new(vec![path.clone()], "fallback");
        assert_eq!(resolver.resolve(), "fallback");
        std::fs::write(&path, "rotated").unwrap();
        assert_eq!(resolver.resolve(), "rotated");
    }
}
