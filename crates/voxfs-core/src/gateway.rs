//! HTTP gateway to the remote file-system API.

use crate::config::InterpreterConfig;
use crate::credentials::CredentialResolver;
use crate::error::InterpreterResult;
use crate::grammar::Verb;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;

/// Result of one API call. Never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome {
    Success { body: String },
    ApiError { status: u16, body: String },
    Transport(String),
}

impl ApiOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiOutcome::Success { .. })
    }

    /// Response body, if the server answered at all.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiOutcome::Success { body } | ApiOutcome::ApiError { body, .. } => Some(body),
            ApiOutcome::Transport(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: reqwest::Client,
    base_url: String,
    credentials: CredentialResolver,
    honor_body_status: bool,
}

impl ApiGateway {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        credentials: CredentialResolver,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            credentials,
            honor_body_status: false,
        }
    }

    /// Treat `200 {"status":"error"}` responses as API errors.
    pub fn with_body_status(mut self, honor: bool) -> Self {
        self.honor_body_status = honor;
        self
    }

    pub fn from_config(config: &InterpreterConfig) -> InterpreterResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()?;
        Ok(Self::new(client, config.api_base_url.clone(), CredentialResolver::from_config(config))
            .with_body_status(config.honor_body_status))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str) -> ApiOutcome {
        self.call(Verb::Get, path, None).await
    }

    pub async fn post(&self, path: &str, content: Option<String>) -> ApiOutcome {
        self.call(Verb::Post, path, content).await
    }

    pub async fn delete(&self, path: &str) -> ApiOutcome {
        self.call(Verb::Delete, path, None).await
    }

    /// One request with a freshly resolved bearer token. `content` is sent as the raw body.
    pub async fn call(&self, verb: Verb, path: &str, content: Option<String>) -> ApiOutcome {
        let url = format!("{}{}", self.base_url, path);
        let token = self.credentials.resolve();

        let mut request = match verb {
            Verb::Get => self.client.get(&url),
            Verb::Post => self.client.post(&url),
            Verb::Delete => self.client.delete(&url),
        }
        .header(AUTHORIZATION, format!("Bearer {}", token));

        if let Some(content) = content {
            request = request
                .header(CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(content);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(%verb, %path, "API transport error: {}", e);
                return ApiOutcome::Transport(e.to_string());
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(%verb, %path, "failed reading API response body: {}", e);
                return ApiOutcome::Transport(e.to_string());
            }
        };
        tracing::info!(%verb, %path, status = status.as_u16(), body = %body, "API response");

        self.classify(status, body)
    }

    fn classify(&self, status: StatusCode, body: String) -> ApiOutcome {
        if status != StatusCode::OK {
            return ApiOutcome::ApiError {
                status: status.as_u16(),
                body,
            };
        }
        if self.honor_body_status && reports_error(&body) {
            return ApiOutcome::ApiError {
                status: status.as_u16(),
                body,
            };
        }
        ApiOutcome::Success { body }
    }
}

/// Entry names from a `/ls` body: `{"items": [...]}` where items are names or objects with a
/// `name` field.
pub fn parse_listing(body: &str) -> Option<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let items = value.get("items")?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s.clone()),
                other => other.get("name").and_then(|n| n.as_str()).map(str::to_string),
            })
            .collect(),
    )
}

/// Working directory from a `/pwd` body: plain text, a JSON string, or a JSON object with
/// `currentDir`, `path` or `cwd`.
pub fn parse_pwd(body: &str) -> Option<String> {
    let trimmed = body.trim();
    let dir = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(serde_json::Value::Object(map)) => ["currentDir", "path", "cwd"]
            .iter()
            .find_map(|k| map.get(*k).and_then(|v| v.as_str()))
            .map(str::to_string)?,
        _ => trimmed.to_string(),
    };
    let dir = dir.trim().to_string();
    (!dir.is_empty()).then_some(dir)
}

fn reports_error(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("status").and_then(|s| s.as_str()).map(|s| s == "error"))
        .unwrap_or(false)
}
