//! Navigation-related controller methods (events, paging, sessions)

use super::AppController;

impl AppController {
    pub async fn open_event(&self, event_id: &str) {
        let event_id = event_id.trim();
        if event_id.is_empty() {
            return;
        }

        tracing::info!(event_id, "Opening event gallery");
        let model = self.model.lock().await;
        let request = model.begin_gallery(event_id).await;
        let source = model.get_source().await;
        drop(model);

        match source {
            Some(source) => self.dispatch_fetch(source, request),
            None => tracing::warn!(event_id, "No gallery source configured"),
        }
    }

    /// Issue the next page fetch unless one is already running or nothing is left
    pub async fn load_next_page(&self) {
        let model = self.model.lock().await;
        let Some(request) = model.request_next_page().await else {
            return;
        };
        let source = model.get_source().await;
        drop(model);

        if let Some(source) = source {
            self.dispatch_fetch(source, request);
        }
    }

    pub async fn retry(&self) {
        let model = self.model.lock().await;
        let Some(request) = model.retry_gallery().await else {
            tracing::debug!("Nothing to retry");
            return;
        };
        model.clear_error().await;
        let source = model.get_source().await;
        drop(model);

        tracing::info!(event_id = %request.ticket.subject, kind = ?request.ticket.kind, "Retrying gallery fetch");
        if let Some(source) = source {
            self.dispatch_fetch(source, request);
        }
    }

    /// Called once per frame with the size of the grid area
    pub async fn sync_viewport(&self, width: u16, height: u16) {
        let signal = self.model.lock().await.sync_viewport(width, height).await;
        if let Some(signal) = signal {
            tracing::debug!(
                last_rendered_row = signal.last_rendered_row,
                row_count = signal.row_count,
                "Viewport near end of loaded sessions"
            );
            self.load_next_page().await;
        }
    }

    pub async fn open_selected_session(&self) {
        let model = self.model.lock().await;
        let Some(item) = model.selected_gallery_item().await else {
            return;
        };
        drop(model);
        self.open_session(&item.id).await;
    }

    pub async fn open_session(&self, session_id: &str) {
        tracing::debug!(session_id, "Opening session");
        let model = self.model.lock().await;
        let Some(source) = model.get_source().await else {
            return;
        };
        model.begin_session_load(session_id).await;
        drop(model);

        let result = source.fetch_manifest(session_id).await;

        let model = self.model.lock().await;
        match result {
            Ok(manifest) => {
                let assets = manifest.assets.len();
                if model.finish_session_load(session_id, Some(manifest)).await {
                    tracing::info!(session_id, assets, "Session manifest loaded");
                } else {
                    tracing::debug!(session_id, "Discarding manifest for a superseded session request");
                }
            }
            Err(e) => {
                if model.finish_session_load(session_id, None).await {
                    tracing::error!(session_id, error = %e, "Failed to load session manifest");
                    model.set_error(Self::format_error(&e)).await;
                } else {
                    tracing::debug!(session_id, error = %e, "Ignoring failure for a superseded session request");
                }
            }
        }
    }
}
