use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::models::BackendError;
use crate::domain::models::BackendName;
use crate::domain::models::Event;
use crate::domain::models::RawSuggestionPayload;

#[async_trait]
pub trait BackendClient: Send + Sync {
    fn name(&self) -> BackendName;

    /// Reports whether the configured model is present on the backend.
    async fn probe(&self) -> Result<bool, BackendError>;

    /// Downloads the configured model, posting `BackendPullProgress` events as
    /// percentages arrive. Percentages never go backwards.
    async fn pull(&self, event_tx: &mpsc::UnboundedSender<Event>) -> Result<(), BackendError>;

    async fn generate(&self, prompt: &str) -> Result<RawSuggestionPayload, BackendError>;

    async fn ensure_model_ready(
        &self,
        event_tx: &mpsc::UnboundedSender<Event>,
    ) -> Result<(), BackendError> {
        if self.probe().await? {
            return Ok(());
        }

        tracing::info!(backend = %self.name(), "model missing, pulling");
        let _ = event_tx.send(Event::BackendPullStarted);
        return self.pull(event_tx).await;
    }
}

pub type BackendClientBox = Box<dyn BackendClient>;
