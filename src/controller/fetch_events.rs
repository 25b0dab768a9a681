//! Gallery fetch dispatch and completion listener
//!
//! Fetches run as spawned tasks and report back through an unbounded queue.
//! The listener applies completions one at a time, in arrival order.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::model::{Completion, FetchError, FetchKind, FetchRequest, FetchTicket, GallerySource, Page};
use super::AppController;

/// Result of one page fetch, tagged with the ticket it was issued under
#[derive(Debug)]
pub struct FetchCompletion {
    pub ticket: FetchTicket,
    pub result: Result<Page, FetchError>,
}

impl AppController {
    pub(crate) fn dispatch_fetch(&self, source: Arc<dyn GallerySource>, request: FetchRequest) {
        let FetchRequest { ticket, limit } = request;
        let fetch = source.fetch_page(&ticket.subject, ticket.cursor.as_ref(), limit);
        let completions = self.completions.clone();

        tokio::spawn(async move {
            let result = fetch.await;
            if completions.send(FetchCompletion { ticket, result }).is_err() {
                tracing::debug!("Fetch listener gone, dropping completion");
            }
        });
    }

    pub fn start_fetch_listener(&self, mut completions: mpsc::UnboundedReceiver<FetchCompletion>) {
        let controller = self.clone();
        tracing::info!("Starting gallery fetch listener");

        tokio::spawn(async move {
            while let Some(completion) = completions.recv().await {
                if controller.model.lock().await.should_quit().await {
                    tracing::debug!("Fetch listener shutting down");
                    break;
                }
                controller.apply_completion(completion).await;
            }
        });
    }

    pub async fn apply_completion(&self, completion: FetchCompletion) -> Completion {
        let FetchCompletion { ticket, result } = completion;
        let model = self.model.lock().await;
        let outcome = model.apply_fetch(&ticket, result).await;

        match &outcome {
            Completion::Applied { kind, received } => {
                tracing::info!(
                    event_id = %ticket.subject,
                    kind = ?kind,
                    received,
                    "Gallery page applied"
                );
            }
            Completion::Failed { kind, error } => {
                tracing::error!(
                    event_id = %ticket.subject,
                    kind = ?kind,
                    error = %error,
                    "Gallery page failed to load"
                );
                let message = match kind {
                    FetchKind::FirstPage => Self::format_error(error),
                    FetchKind::NextPage => format!("Could not load more sessions. {}", Self::format_error(error)),
                };
                model.set_error(message).await;
            }
            Completion::Stale => {
                tracing::debug!(event_id = %ticket.subject, "Ignored result for a superseded request");
            }
        }

        outcome
    }
}
