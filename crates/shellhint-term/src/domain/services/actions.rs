#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::ClipboardService;
use super::ExecutorService;
use crate::domain::models::build_prompt;
use crate::domain::models::Action;
use crate::domain::models::BackendClientBox;
use crate::domain::models::Event;

/// Makes sure the model exists, asks it for a suggestion, and posts exactly one
/// terminal event back to the UI loop.
async fn request_suggestion(
    backend: &BackendClientBox,
    request: &str,
    event_tx: &mpsc::UnboundedSender<Event>,
) {
    let res = match backend.ensure_model_ready(event_tx).await {
        Ok(()) => backend.generate(&build_prompt(request)).await,
        Err(err) => Err(err),
    };

    let event = match res {
        Ok(payload) => Event::BackendResponse(payload),
        Err(err) => {
            tracing::error!(backend = %backend.name(), error = %err, "suggestion request failed");
            Event::BackendFailure(err)
        }
    };

    let _ = event_tx.send(event);
}

async fn copy_to_clipboard(
    clipboard: &ClipboardService,
    text: String,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    if let Err(err) = clipboard.set(text).await {
        tracing::warn!(error = %err, "failed to copy to clipboard");
        event_tx.send(Event::ClipboardFailed(err.to_string()))?;
    }

    Ok(())
}

pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        backend: BackendClientBox,
        event_tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let backend_arc = Arc::new(backend);
        let clipboard = ClipboardService::start();
        let mut worker: Option<JoinHandle<()>> = None;

        while let Some(action) = rx.recv().await {
            match action {
                Action::Generate(request) => {
                    if worker.as_ref().is_some_and(|e| !e.is_finished()) {
                        tracing::warn!("a suggestion request is already in flight");
                    }

                    tracing::info!(request = %request, "requesting suggestion");
                    let backend_worker = backend_arc.clone();
                    let worker_event_tx = event_tx.clone();
                    worker = Some(tokio::spawn(async move {
                        request_suggestion(&backend_worker, &request, &worker_event_tx).await;
                    }));
                }
                Action::CopyToClipboard(text) => {
                    copy_to_clipboard(&clipboard, text, &event_tx).await?;
                }
                Action::ExecuteCommand(command) => {
                    let worker_event_tx = event_tx.clone();
                    tokio::spawn(async move {
                        let report = ExecutorService::run(&command).await;
                        let _ = worker_event_tx.send(Event::CommandFinished(report));
                    });
                }
            }
        }

        return Ok(());
    }
}
