//! Interpreter configuration.
//!
//! | Key / env (`VOXFS_*`) | Default | Description |
//! |-----|---------|-------------|
//! | api_base_url | http://localhost:8080 | Remote file-system API. |
//! | http_timeout_secs | 30 | Per-request timeout. |
//! | honor_body_status | false | Treat `200 {"status":"error"}` bodies as API errors. |
//! | status_files | voice_status.txt | Status channel files (first is primary), comma separated. |
//! | token_paths | backend/build/token.txt,... | Candidate bearer-token files, in order. |
//! | fallback_token | test_token_for_demonstration | Used when no token file exists. |
//! | stop_phrases | stop listening,... | Utterances that end the session. |
//! | command_timeout_secs / command_phrase_limit_secs | 8 / 5 | Command listen window. |
//! | content_timeout_secs / content_phrase_limit_secs | 10 / 10 | Content dialog listen window. |
//! | cycle_delay_ms | 1000 | Pause between cycles so a polling UI sees each state. |
//! | speech_queue_capacity | 16 | Pending announcements before new ones are dropped. |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use voxfs_voice::ListenWindow;

pub const DEFAULT_FALLBACK_TOKEN: &str = "test_token_for_demonstration";

fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_status_files() -> Vec<PathBuf> {
    vec![PathBuf::from("voice_status.txt")]
}

fn default_token_paths() -> Vec<PathBuf> {
    ["backend/build/token.txt", "build/token.txt", "backend/token.txt", "token.txt"]
        .into_iter()
        .map(PathBuf::from)
        .collect()
}

fn default_fallback_token() -> String {
    DEFAULT_FALLBACK_TOKEN.to_string()
}

fn default_stop_phrases() -> Vec<String> {
    vec![
        "stop listening".to_string(),
        "stop voice control".to_string(),
        "exit voice control".to_string(),
    ]
}

fn default_command_timeout_secs() -> u64 {
    8
}

fn default_command_phrase_limit_secs() -> u64 {
    5
}

fn default_content_secs() -> u64 {
    10
}

fn default_cycle_delay_ms() -> u64 {
    1000
}

fn default_speech_queue_capacity() -> usize {
    voxfs_voice::DEFAULT_SPEECH_QUEUE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpreterConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default)]
    pub honor_body_status: bool,
    #[serde(default = "default_status_files")]
    pub status_files: Vec<PathBuf>,
    #[serde(default = "default_token_paths")]
    pub token_paths: Vec<PathBuf>,
    #[serde(default = "default_fallback_token")]
    pub fallback_token: String,
    #[serde(default = "default_stop_phrases")]
    pub stop_phrases: Vec<String>,
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    #[serde(default = "default_command_phrase_limit_secs")]
    pub command_phrase_limit_secs: u64,
    #[serde(default = "default_content_secs")]
    pub content_timeout_secs: u64,
    #[serde(default = "default_content_secs")]
    pub content_phrase_limit_secs: u64,
    #[serde(default = "default_cycle_delay_ms")]
    pub cycle_delay_ms: u64,
    #[serde(default = "default_speech_queue_capacity")]
    pub speech_queue_capacity: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            http_timeout_secs: default_http_timeout_secs(),
            honor_body_status: false,
            status_files: default_status_files(),
            token_paths: default_token_paths(),
            fallback_token: default_fallback_token(),
            stop_phrases: default_stop_phrases(),
            command_timeout_secs: default_command_timeout_secs(),
            command_phrase_limit_secs: default_command_phrase_limit_secs(),
            content_timeout_secs: default_content_secs(),
            content_phrase_limit_secs: default_content_secs(),
            cycle_delay_ms: default_cycle_delay_ms(),
            speech_queue_capacity: default_speech_queue_capacity(),
        }
    }
}

impl InterpreterConfig {
    /// Load config from file and environment. Precedence: `VOXFS_*` env > file (`VOXFS_CONFIG`
    /// path, default `config/voxfs.toml`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("VOXFS_CONFIG").unwrap_or_else(|_| "config/voxfs.toml".to_string());
        Self::load_from(Path::new(&config_path))
    }

    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("api_base_url", default_api_base_url())?
            .set_default("http_timeout_secs", default_http_timeout_secs())?
            .set_default("honor_body_status", false)?
            .set_default("fallback_token", default_fallback_token())?
            .set_default("cycle_delay_ms", default_cycle_delay_ms())?;

        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(
                config::Environment::with_prefix("VOXFS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("status_files")
                    .with_list_parse_key("token_paths")
                    .with_list_parse_key("stop_phrases"),
            )
            .build()?;

        built.try_deserialize()
    }

    pub fn command_window(&self) -> ListenWindow {
        ListenWindow::new(
            Duration::from_secs(self.command_timeout_secs),
            Duration::from_secs(self.command_phrase_limit_secs),
        )
    }

    pub fn content_window(&self) -> ListenWindow {
        ListenWindow::new(
            Duration::from_secs(self.content_timeout_secs),
            Duration::from_secs(self.content_phrase_limit_secs),
        )
    }

    pub fn cycle_delay(&self) -> Duration {
        Duration::from_millis(self.cycle_delay_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_timings() {
        let c = InterpreterConfig::default();
        assert_eq!(c.api_base_url, "http://localhost:8080");
        assert_eq!(c.command_window().timeout, Duration::from_secs(8));
        assert_eq!(c.command_window().phrase_limit, Duration::from_secs(5));
        assert_eq!(c.content_window().timeout, Duration::from_secs(10));
        assert_eq!(c.fallback_token, DEFAULT_FALLBACK_TOKEN);
        assert_eq!(c.status_files, vec![PathBuf::from("voice_status.txt")]);
    }

    #[test]
    fn loads_overrides_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voxfs.toml");
        std::fs::write(
            &path,
            r#"
api_base_url = "http://files.local:9000"
cycle_delay_ms = 0
status_files = ["a.txt", "b.txt"]
stop_phrases = ["goodbye"]
"#,
        )
        .unwrap();

        let c = InterpreterConfig::load_from(&path).unwrap();
        assert_eq!(c.api_base_url, "http://files.local:9000");
        assert_eq!(c.cycle_delay_ms, 0);
        assert_eq!(c.status_files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert_eq!(c.stop_phrases, vec!["goodbye".to_string()]);
        // untouched keys keep their defaults
        assert_eq!(c.command_timeout_secs, 8);
        assert_eq!(c.token_paths.len(), 4);
    }
}
