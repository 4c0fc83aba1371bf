use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::ActionsService;
use crate::domain::models::Action;
use crate::domain::models::BackendClient;
use crate::domain::models::BackendError;
use crate::domain::models::BackendName;
use crate::domain::models::Event;
use crate::domain::models::RawSuggestionPayload;

const PAYLOAD: &str = r#"{"command":"ls -la","description":"lists files","safe":true}"#;

struct MockBackendClient {
    present: bool,
    pull_percents: Vec<u8>,
    pull_error: Option<BackendError>,
    prompt_tx: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl BackendClient for MockBackendClient {
    fn name(&self) -> BackendName {
        BackendName::Ollama
    }

    async fn probe(&self) -> Result<bool, BackendError> {
        Ok(self.present)
    }

    async fn pull(&self, event_tx: &mpsc::UnboundedSender<Event>) -> Result<(), BackendError> {
        for percent in &self.pull_percents {
            event_tx.send(Event::BackendPullProgress(*percent)).unwrap();
        }
        match &self.pull_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<RawSuggestionPayload, BackendError> {
        self.prompt_tx.send(prompt.to_string()).unwrap();
        Ok(RawSuggestionPayload::new(PAYLOAD))
    }
}

fn start(
    backend: MockBackendClient,
) -> (
    mpsc::UnboundedSender<Action>,
    mpsc::UnboundedReceiver<Event>,
) {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    tokio::spawn(async move {
        ActionsService::start(Box::new(backend), event_tx, &mut action_rx)
            .await
            .unwrap();
    });

    return (action_tx, event_rx);
}

#[tokio::test]
async fn it_generates_when_the_model_is_present() {
    let (prompt_tx, mut prompt_rx) = mpsc::unbounded_channel::<String>();
    let (action_tx, mut event_rx) = start(MockBackendClient {
        present: true,
        pull_percents: vec![],
        pull_error: None,
        prompt_tx,
    });

    action_tx
        .send(Action::Generate("list files".to_string()))
        .unwrap();

    let event = event_rx.recv().await.unwrap();
    assert!(matches!(event, Event::BackendResponse(payload) if payload.as_str() == PAYLOAD));

    let prompt = prompt_rx.recv().await.unwrap();
    assert!(prompt.contains("best describes the following: list files."));
}

#[tokio::test]
async fn it_pulls_a_missing_model_before_generating() {
    let (prompt_tx, _prompt_rx) = mpsc::unbounded_channel::<String>();
    let (action_tx, mut event_rx) = start(MockBackendClient {
        present: false,
        pull_percents: vec![0, 50, 100],
        pull_error: None,
        prompt_tx,
    });

    action_tx
        .send(Action::Generate("list files".to_string()))
        .unwrap();

    assert!(matches!(
        event_rx.recv().await.unwrap(),
        Event::BackendPullStarted
    ));
    for expected in [0, 50, 100] {
        assert!(matches!(
            event_rx.recv().await.unwrap(),
            Event::BackendPullProgress(percent) if percent == expected
        ));
    }
    assert!(matches!(
        event_rx.recv().await.unwrap(),
        Event::BackendResponse(_)
    ));
}

#[tokio::test]
async fn it_reports_a_failed_pull_without_generating() {
    let (prompt_tx, mut prompt_rx) = mpsc::unbounded_channel::<String>();
    let pull_error = BackendError::ModelPullFailed {
        model: "gemma:2b".to_string(),
        reason: "disk full".to_string(),
    };
    let (action_tx, mut event_rx) = start(MockBackendClient {
        present: false,
        pull_percents: vec![10],
        pull_error: Some(pull_error.clone()),
        prompt_tx,
    });

    action_tx
        .send(Action::Generate("list files".to_string()))
        .unwrap();

    assert!(matches!(
        event_rx.recv().await.unwrap(),
        Event::BackendPullStarted
    ));
    assert!(matches!(
        event_rx.recv().await.unwrap(),
        Event::BackendPullProgress(10)
    ));
    assert!(matches!(
        event_rx.recv().await.unwrap(),
        Event::BackendFailure(err) if err == pull_error
    ));
    assert!(prompt_rx.try_recv().is_err());
}

#[cfg(not(target_os = "windows"))]
#[tokio::test]
async fn it_reports_the_outcome_of_executed_commands() {
    let (prompt_tx, _prompt_rx) = mpsc::unbounded_channel::<String>();
    let (action_tx, mut event_rx) = start(MockBackendClient {
        present: true,
        pull_percents: vec![],
        pull_error: None,
        prompt_tx,
    });

    action_tx
        .send(Action::ExecuteCommand("exit 4".to_string()))
        .unwrap();

    assert!(matches!(
        event_rx.recv().await.unwrap(),
        Event::CommandFinished(report) if !report.outcome.success()
    ));
}
