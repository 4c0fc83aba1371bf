use std::time::Duration;

use anyhow::Result;
use mockito::Matcher;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use super::normalize_url;
use super::Ollama;
use crate::domain::models::BackendClient;
use crate::domain::models::BackendError;
use crate::domain::models::Event;
use crate::domain::models::RawSuggestionPayload;

fn drain_progress(rx: &mut mpsc::UnboundedReceiver<Event>) -> Vec<String> {
    let mut seen = vec![];
    while let Ok(event) = rx.try_recv() {
        match event {
            Event::BackendPullStarted => seen.push("started".to_string()),
            Event::BackendPullProgress(percent) => seen.push(percent.to_string()),
            other => seen.push(format!("{other:?}")),
        }
    }
    return seen;
}

#[test]
fn it_adds_a_scheme_to_bare_hosts() {
    assert_eq!(normalize_url("127.0.0.1:11434"), "http://127.0.0.1:11434");
    assert_eq!(normalize_url("https://ollama.lan/"), "https://ollama.lan");
}

#[test]
fn it_fills_in_the_default_host_and_port() {
    assert_eq!(normalize_url("localhost"), "http://localhost:11434");
    assert_eq!(normalize_url(":8080"), "http://127.0.0.1:8080");
    assert_eq!(normalize_url(""), "http://127.0.0.1:11434");
    assert_eq!(normalize_url("[::1]"), "http://[::1]:11434");
    assert_eq!(normalize_url("ollama.lan/proxy/"), "http://ollama.lan:11434/proxy");
}

#[tokio::test]
async fn it_reports_a_present_model() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/show")
        .match_body(Matcher::PartialJson(json!({"model": "gemma:2b"})))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = Ollama::new(&server.url(), "gemma:2b", None)?;
    assert!(client.probe().await?);
    mock.assert_async().await;

    Ok(())
}

#[tokio::test]
async fn it_reports_a_missing_model() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/show")
        .with_status(404)
        .with_body(r#"{"error":"model 'gemma:2b' not found"}"#)
        .create_async()
        .await;

    let client = Ollama::new(&server.url(), "gemma:2b", None)?;
    assert!(!client.probe().await?);

    Ok(())
}

#[tokio::test]
async fn it_fails_the_probe_when_unreachable() -> Result<()> {
    let client = Ollama::new("http://127.0.0.1:1", "gemma:2b", None)?;
    let res = client.probe().await;

    assert!(matches!(
        res,
        Err(BackendError::BackendUnavailable { .. })
    ));

    Ok(())
}

#[tokio::test]
async fn it_streams_monotonic_pull_progress() -> Result<()> {
    let body = [
        r#"{"status":"pulling manifest"}"#,
        r#"{"status":"downloading","digest":"sha256:aa","total":200,"completed":0}"#,
        r#"{"status":"downloading","digest":"sha256:aa","total":200}"#,
        r#"{"status":"downloading","digest":"sha256:aa","total":200,"completed":100}"#,
        r#"{"status":"downloading","digest":"sha256:bb","total":200,"completed":50}"#,
        r#"{"status":"downloading","digest":"sha256:aa","total":200,"completed":200}"#,
        r#"{"status":"verifying sha256 digest"}"#,
        r#"{"status":"success"}"#,
    ]
    .join("\n");

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/pull")
        .match_body(Matcher::PartialJson(
            json!({"model": "gemma:2b", "stream": true}),
        ))
        .with_status(200)
        .with_header("content-type", "application/x-ndjson")
        .with_body(body)
        .create_async()
        .await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = Ollama::new(&server.url(), "gemma:2b", None)?;
    client.pull(&tx).await?;
    mock.assert_async().await;

    assert_eq!(drain_progress(&mut rx), vec!["0", "50", "100"]);

    Ok(())
}

#[tokio::test]
async fn it_fails_the_pull_on_an_error_line() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/pull")
        .with_status(200)
        .with_body("{\"status\":\"pulling manifest\"}\n{\"error\":\"pull model manifest: file does not exist\"}\n")
        .create_async()
        .await;

    let (tx, _rx) = mpsc::unbounded_channel();
    let client = Ollama::new(&server.url(), "nope:1b", None)?;
    let res = client.pull(&tx).await;

    assert_eq!(
        res,
        Err(BackendError::ModelPullFailed {
            model: "nope:1b".to_string(),
            reason: "pull model manifest: file does not exist".to_string(),
        })
    );

    Ok(())
}

#[tokio::test]
async fn it_fails_the_pull_when_the_stream_stops_early() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/pull")
        .with_status(200)
        .with_body("{\"status\":\"downloading\",\"total\":10,\"completed\":5}\n")
        .create_async()
        .await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = Ollama::new(&server.url(), "gemma:2b", None)?;
    let res = client.pull(&tx).await;

    assert!(matches!(res, Err(BackendError::ModelPullFailed { .. })));
    assert_eq!(drain_progress(&mut rx), vec!["50"]);

    Ok(())
}

#[tokio::test]
async fn it_announces_the_pull_when_the_model_is_missing() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/show")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("POST", "/api/pull")
        .with_status(200)
        .with_body("{\"status\":\"downloading\",\"total\":4,\"completed\":4}\n{\"status\":\"success\"}\n")
        .create_async()
        .await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = Ollama::new(&server.url(), "gemma:2b", None)?;
    client.ensure_model_ready(&tx).await?;

    assert_eq!(drain_progress(&mut rx), vec!["started", "100"]);

    Ok(())
}

#[tokio::test]
async fn it_generates_a_raw_payload() -> Result<()> {
    let answer = r#"{"command":"ls -la","description":"lists files","safe":true}"#;

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({
            "model": "gemma:2b",
            "format": "json",
            "stream": false,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"model": "gemma:2b", "response": answer, "done": true}).to_string())
        .create_async()
        .await;

    let client = Ollama::new(&server.url(), "gemma:2b", None)?;
    let payload = client.generate("list files").await?;
    mock.assert_async().await;

    assert_eq!(payload, RawSuggestionPayload::new(answer));

    Ok(())
}

#[tokio::test]
async fn it_surfaces_generate_errors() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(500)
        .with_body(r#"{"error":"llama runner process has terminated"}"#)
        .create_async()
        .await;

    let client = Ollama::new(&server.url(), "gemma:2b", None)?;
    let res = client.generate("list files").await;

    assert_eq!(
        res,
        Err(BackendError::GenerationFailed(
            "HTTP 500: llama runner process has terminated".to_string()
        ))
    );

    Ok(())
}

#[tokio::test]
async fn it_rejects_unreadable_generate_bodies() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body("<html>proxy error</html>")
        .create_async()
        .await;

    let client = Ollama::new(&server.url(), "gemma:2b", None)?;
    let res = client.generate("list files").await;

    assert!(matches!(res, Err(BackendError::GenerationFailed(_))));

    Ok(())
}

#[tokio::test]
async fn it_gives_up_when_the_server_never_answers() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("http://{}", listener.local_addr()?);
    let silent = tokio::spawn(async move {
        let mut held = vec![];
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = Ollama::new(&url, "gemma:2b", Some(Duration::from_secs(1)))?;
    let res = client.generate("list files").await;
    silent.abort();

    assert_eq!(
        res,
        Err(BackendError::GenerationFailed(
            "no answer within 1 seconds".to_string()
        ))
    );

    Ok(())
}
