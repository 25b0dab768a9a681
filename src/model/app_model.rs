//! Main application model with state management

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use super::cache::RecentEvents;
use super::content::{ContentState, ContentView};
use super::gallery::{GalleryItem, SessionManifest, SubjectId};
use super::gallery_client::GallerySource;
use super::loader::{Completion, FetchRequest, FetchTicket, GalleryLoader, LoaderSnapshot};
use super::error::FetchError;
use super::gallery::Page;
use super::types::{ActiveSection, UiState};
use super::viewport::{GalleryViewport, LoadMoreSignal};

/// Main application model containing all state
pub struct AppModel {
    pub source: Option<Arc<dyn GallerySource>>,
    loader: Arc<Mutex<GalleryLoader>>,
    viewport: Arc<Mutex<GalleryViewport>>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub content_state: Arc<Mutex<ContentState>>,
    recent_events: RecentEvents,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(page_size: usize, recent_events: RecentEvents) -> Self {
        Self {
            source: None,
            loader: Arc::new(Mutex::new(GalleryLoader::new(page_size))),
            viewport: Arc::new(Mutex::new(GalleryViewport::default())),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            content_state: Arc::new(Mutex::new(ContentState::default())),
            recent_events,
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub fn set_source(&mut self, source: Arc<dyn GallerySource>) {
        self.source = Some(source);
    }

    pub async fn get_source(&self) -> Option<Arc<dyn GallerySource>> {
        self.source.clone()
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    // ========================================================================
    // Gallery loader
    // ========================================================================

    /// Switch the gallery to `event_id`, returning the first-page fetch
    pub async fn begin_gallery(&self, event_id: &str) -> FetchRequest {
        let request = self.loader.lock().await.reset(SubjectId::new(event_id));
        self.viewport.lock().await.reset();

        let mut content = self.content_state.lock().await;
        content.view = ContentView::Gallery;
        content.loading_session = None;
        drop(content);

        let recent = self.recent_events.push(event_id).await;
        let mut ui_state = self.ui_state.lock().await;
        ui_state.recent_events = recent;
        ui_state.recent_selected = 0;
        ui_state.active_section = ActiveSection::MainContent;
        drop(ui_state);

        if let Err(e) = self.recent_events.save_to_disk().await {
            tracing::warn!(error = %e, "Could not save recent events");
        }

        request
    }

    pub async fn request_next_page(&self) -> Option<FetchRequest> {
        self.loader.lock().await.load_next()
    }

    pub async fn retry_gallery(&self) -> Option<FetchRequest> {
        let request = self.loader.lock().await.retry();
        if request.as_ref().is_some_and(|r| r.ticket.cursor.is_none()) {
            self.viewport.lock().await.reset();
        }
        request
    }

    pub async fn apply_fetch(&self, ticket: &FetchTicket, result: Result<Page, FetchError>) -> Completion {
        self.loader.lock().await.complete(ticket, result)
    }

    pub async fn get_gallery_snapshot(&self) -> LoaderSnapshot {
        self.loader.lock().await.snapshot()
    }

    // ========================================================================
    // Gallery viewport
    // ========================================================================

    pub async fn get_viewport(&self) -> GalleryViewport {
        self.viewport.lock().await.clone()
    }

    /// Feed the grid geometry of this frame to the viewport observer
    pub async fn sync_viewport(&self, width: u16, height: u16) -> Option<LoadMoreSignal> {
        if !self.is_gallery_open().await {
            return None;
        }
        let (item_count, revision) = {
            let loader = self.loader.lock().await;
            (loader.items().len(), loader.revision())
        };
        self.viewport.lock().await.sync(width, height, item_count, revision)
    }

    pub async fn gallery_move(&self, delta: isize) {
        let item_count = self.loader.lock().await.items().len();
        self.viewport.lock().await.move_selection(delta, item_count);
    }

    pub async fn gallery_move_rows(&self, rows: isize) {
        let item_count = self.loader.lock().await.items().len();
        self.viewport.lock().await.move_selection_rows(rows, item_count);
    }

    pub async fn gallery_page(&self, down: bool) {
        let item_count = self.loader.lock().await.items().len();
        self.viewport.lock().await.page(down, item_count);
    }

    pub async fn gallery_jump(&self, to_end: bool) {
        let item_count = self.loader.lock().await.items().len();
        let mut viewport = self.viewport.lock().await;
        if to_end {
            viewport.select_last(item_count);
        } else {
            viewport.select_first(item_count);
        }
    }

    pub async fn selected_gallery_item(&self) -> Option<GalleryItem> {
        let selected = self.viewport.lock().await.selected;
        self.loader.lock().await.items().get(selected).cloned()
    }

    async fn is_gallery_open(&self) -> bool {
        matches!(self.content_state.lock().await.view, ContentView::Gallery)
    }

    // ========================================================================
    // Content view
    // ========================================================================

    pub async fn get_content_state(&self) -> ContentState {
        self.content_state.lock().await.clone()
    }

    /// Mark `session_id` as the manifest the content area is waiting for
    pub async fn begin_session_load(&self, session_id: &str) {
        self.content_state.lock().await.loading_session = Some(session_id.to_string());
    }

    /// Apply a manifest reply if it is still the one being waited for.
    /// Returns false when the user asked for another session or left meanwhile.
    pub async fn finish_session_load(&self, session_id: &str, manifest: Option<SessionManifest>) -> bool {
        let mut state = self.content_state.lock().await;
        if !state.awaits_session(session_id) {
            return false;
        }
        state.loading_session = None;
        if let Some(manifest) = manifest {
            state.view = ContentView::Session {
                manifest,
                selected_index: 0,
            };
        }
        true
    }

    pub async fn content_move_up(&self) {
        let mut state = self.content_state.lock().await;
        if let ContentView::Session { selected_index, .. } = &mut state.view {
            *selected_index = selected_index.saturating_sub(1);
        }
    }

    pub async fn content_move_down(&self) {
        let mut state = self.content_state.lock().await;
        if let ContentView::Session { manifest, selected_index } = &mut state.view {
            if *selected_index + 1 < manifest.assets.len() {
                *selected_index += 1;
            }
        }
    }

    /// Leave a session view; the gallery underneath is untouched
    pub async fn navigate_back(&self) {
        let mut state = self.content_state.lock().await;
        if matches!(state.view, ContentView::Session { .. }) {
            state.view = ContentView::Gallery;
        }
        state.loading_session = None;
    }

    // ========================================================================
    // UI state
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn set_api_base_url(&self, url: &str) {
        self.ui_state.lock().await.api_base_url = url.to_string();
    }

    pub async fn load_recent_events(&self) {
        if let Err(e) = self.recent_events.load_from_disk().await {
            tracing::warn!(error = %e, path = %self.recent_events.path().display(), "Could not read recent events");
        }
        self.ui_state.lock().await.recent_events = self.recent_events.list().await;
    }

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn recent_move_up(&self) {
        let mut state = self.ui_state.lock().await;
        state.recent_selected = state.recent_selected.saturating_sub(1);
    }

    pub async fn recent_move_down(&self) {
        let mut state = self.ui_state.lock().await;
        if state.recent_selected < state.recent_events.len().saturating_sub(1) {
            state.recent_selected += 1;
        }
    }

    pub async fn get_selected_recent_event(&self) -> Option<String> {
        let state = self.ui_state.lock().await;
        state.recent_events.get(state.recent_selected).cloned()
    }

    pub async fn append_to_event_input(&self, c: char) {
        self.ui_state.lock().await.event_input.push(c);
    }

    pub async fn backspace_event_input(&self) {
        self.ui_state.lock().await.event_input.pop();
    }

    pub async fn clear_event_input(&self) {
        self.ui_state.lock().await.event_input.clear();
    }

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > 5 {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }
}
