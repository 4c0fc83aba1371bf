#[cfg(test)]
#[path = "ollama_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use reqwest::Url;
use serde::Deserialize;
use serde::Serialize;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio_util::io::StreamReader;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendClient;
use crate::domain::models::BackendError;
use crate::domain::models::BackendName;
use crate::domain::models::Event;
use crate::domain::models::RawSuggestionPayload;

#[derive(Serialize)]
struct ShowRequest<'a> {
    model: &'a str,
}

#[derive(Serialize)]
struct PullRequest<'a> {
    model: &'a str,
    stream: bool,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    format: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct PullResponse {
    #[serde(default)]
    status: String,
    total: Option<u64>,
    completed: Option<u64>,
    error: Option<String>,
}

impl PullResponse {
    fn percent(&self) -> Option<u8> {
        let total = self.total.filter(|total| *total > 0)?;
        let completed = self.completed.unwrap_or(0).min(total);
        return Some(((completed * 100) / total) as u8);
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 11434;

/// `OLLAMA_HOST` is commonly set without a scheme, host or port, e.g.
/// `localhost` or `:8080`. Bare values get `http`, `127.0.0.1` and `11434`
/// filled in. Values with a scheme are used as given.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        return trimmed.to_string();
    }

    let (hostport, path) = trimmed.split_once('/').unwrap_or((trimmed, ""));
    let mut hostport = hostport.to_string();
    if hostport.is_empty() || hostport.starts_with(':') {
        hostport = format!("{DEFAULT_HOST}{hostport}");
    }

    // Only look for a port after the closing bracket of an IPv6 literal.
    let has_port = match hostport.rfind(']') {
        Some(end) => hostport[end..].contains(':'),
        None => hostport.contains(':'),
    };
    if !has_port {
        hostport = format!("{hostport}:{DEFAULT_PORT}");
    }

    let candidate = format!("http://{hostport}/{path}");
    return match Url::parse(&candidate) {
        Ok(url) => url.as_str().trim_end_matches('/').to_string(),
        Err(err) => {
            tracing::warn!(url = %candidate, error = %err, "OLLAMA_HOST is not a valid address");
            candidate.trim_end_matches('/').to_string()
        }
    };
}

async fn error_text(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if let Ok(err) = serde_json::from_str::<ErrorResponse>(&body) {
        return err.error;
    }

    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("no details given")
            .to_string();
    }

    return body.to_string();
}

fn convert_err(err: reqwest::Error) -> std::io::Error {
    let err_msg = err.to_string();
    std::io::Error::new(std::io::ErrorKind::Interrupted, err_msg)
}

pub struct Ollama {
    client: reqwest::Client,
    url: String,
    model: String,
    timeout: Option<Duration>,
}

impl Ollama {
    pub fn new(url: &str, model: &str, timeout: Option<Duration>) -> Result<Ollama> {
        let client = reqwest::Client::builder().build()?;

        return Ok(Ollama {
            client,
            url: normalize_url(url),
            model: model.to_string(),
            timeout,
        });
    }

    pub fn from_config() -> Result<Ollama> {
        return Ollama::new(
            &Config::get(ConfigKey::OllamaUrl),
            &Config::get(ConfigKey::Model),
            Config::timeout(),
        );
    }

    fn unavailable(&self, err: &reqwest::Error) -> BackendError {
        tracing::error!(error = ?err, url = %self.url, "Ollama is not reachable");
        return BackendError::BackendUnavailable {
            url: self.url.to_string(),
            reason: err.to_string(),
        };
    }

    fn pull_failed(&self, reason: &str) -> BackendError {
        tracing::error!(model = %self.model, reason = %reason, "Ollama pull failed");
        return BackendError::ModelPullFailed {
            model: self.model.to_string(),
            reason: reason.to_string(),
        };
    }

    fn generate_error(&self, err: &reqwest::Error) -> BackendError {
        if err.is_timeout() {
            let secs = self.timeout.map(|e| e.as_secs()).unwrap_or_default();
            tracing::warn!(timeout = secs, "Ollama generate timed out");
            return BackendError::GenerationFailed(format!("no answer within {secs} seconds"));
        }

        if err.is_connect() || err.is_request() {
            return self.unavailable(err);
        }

        tracing::error!(error = ?err, "Ollama generate failed");
        return BackendError::GenerationFailed(err.to_string());
    }
}

#[async_trait]
impl BackendClient for Ollama {
    fn name(&self) -> BackendName {
        BackendName::Ollama
    }

    async fn probe(&self) -> Result<bool, BackendError> {
        let res = self
            .client
            .post(format!("{}/api/show", self.url))
            .json(&ShowRequest { model: &self.model })
            .send()
            .await
            .map_err(|err| self.unavailable(&err))?;

        let status = res.status();
        if status.is_success() {
            return Ok(true);
        }

        tracing::debug!(status = status.as_u16(), model = %self.model, "model not available");
        return Ok(false);
    }

    async fn pull(&self, event_tx: &mpsc::UnboundedSender<Event>) -> Result<(), BackendError> {
        let response = self
            .client
            .post(format!("{}/api/pull", self.url))
            .json(&PullRequest {
                model: &self.model,
                stream: true,
            })
            .send()
            .await
            .map_err(|err| self.unavailable(&err))?;

        if !response.status().is_success() {
            let reason = error_text(response).await;
            return Err(self.pull_failed(&reason));
        }

        let stream = Box::pin(response.bytes_stream().map_err(convert_err));
        let mut lines_reader = StreamReader::new(stream).lines();
        let mut last_percent: Option<u8> = None;

        loop {
            let line = match lines_reader.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(err) => return Err(self.pull_failed(&err.to_string())),
            };

            if line.trim().is_empty() {
                continue;
            }

            let progress = serde_json::from_str::<PullResponse>(&line).map_err(|err| {
                self.pull_failed(&format!("unreadable progress update ({err})"))
            })?;

            if let Some(err) = progress.error {
                return Err(self.pull_failed(&err));
            }

            if progress.status == "success" {
                tracing::info!(model = %self.model, "model pulled");
                return Ok(());
            }

            if let Some(percent) = progress.percent() {
                let percent = last_percent.map_or(percent, |last| last.max(percent));
                if last_percent != Some(percent) {
                    last_percent = Some(percent);
                    let _ = event_tx.send(Event::BackendPullProgress(percent));
                }
            }
        }

        return Err(self.pull_failed("the download ended before the model was ready"));
    }

    async fn generate(&self, prompt: &str) -> Result<RawSuggestionPayload, BackendError> {
        let mut request = self
            .client
            .post(format!("{}/api/generate", self.url))
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                format: "json",
                stream: false,
            });

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|err| self.generate_error(&err))?;

        let status = response.status();
        if !status.is_success() {
            let reason = error_text(response).await;
            tracing::error!(status = status.as_u16(), reason = %reason, "Ollama generate failed");
            return Err(BackendError::GenerationFailed(format!(
                "HTTP {}: {reason}",
                status.as_u16()
            )));
        }

        let body = response
            .json::<GenerateResponse>()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    return self.generate_error(&err);
                }
                BackendError::GenerationFailed(format!("unreadable response ({err})"))
            })?;

        tracing::debug!(payload = %body.response, "Ollama generate finished");
        return Ok(RawSuggestionPayload::new(body.response));
    }
}
