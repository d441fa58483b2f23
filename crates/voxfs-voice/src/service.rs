//! Connection details shared by the OpenAI-compatible speech backends.

use crate::error::{VoiceError, VoiceResult};
use reqwest::blocking::{Client, RequestBuilder, Response};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

/// Base URL, key and model of one speech service, plus a blocking client.
///
/// The blocking client must not be created or dropped on an async runtime thread; backends
/// live in the speech actor thread or are used through `spawn_blocking`.
#[derive(Debug, Clone)]
pub struct SpeechService {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    client: Client,
}

impl SpeechService {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> VoiceResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VoiceError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        })
    }

    /// `{PREFIX}_API_URL`, `{PREFIX}_API_KEY` (falling back to `OPENAI_API_KEY`) and
    /// `{PREFIX}_MODEL`.
    pub fn from_env(prefix: &str, default_model: &str, timeout: Duration) -> VoiceResult<Self> {
        let var = |name: &str| std::env::var(format!("{}_{}", prefix, name)).ok();
        let api_key = var("API_KEY")
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                VoiceError::Config(format!("{0} requires {0}_API_KEY or OPENAI_API_KEY", prefix))
            })?;
        Self::new(
            var("API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key,
            var("MODEL").unwrap_or_else(|| default_model.to_string()),
            timeout,
        )
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(&self.api_key)
    }
}

/// Turn a non-2xx response into a message carrying status and body.
pub(crate) fn ensure_success(res: Response) -> Result<Response, String> {
    let status = res.status();
    if status.is_success() {
        Ok(res)
    } else {
        let body = res.text().unwrap_or_default();
        Err(format!("API error {}: {}", status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slashes() {
        let svc = SpeechService::new("http://localhost:9000/v1/", "k", "m", Duration::from_secs(1)).unwrap();
        assert_eq!(svc.url("/audio/speech"), "http://localhost:9000/v1/audio/speech");
        assert_eq!(svc.url("audio/transcriptions"), "http://localhost:9000/v1/audio/transcriptions");
    }
}
