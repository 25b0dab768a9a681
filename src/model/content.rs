//! Content view state for the main area

use super::gallery::SessionManifest;

/// What the main content area is showing
#[derive(Clone, Debug, Default)]
pub enum ContentView {
    /// No event opened yet
    #[default]
    Empty,
    /// The paginated thumbnail grid of the current event
    Gallery,
    /// Assets of one session, opened from the gallery
    Session {
        manifest: SessionManifest,
        selected_index: usize,
    },
}

/// Content state including loading status
#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub view: ContentView,
    /// Session whose manifest is being fetched; only its reply is applied
    pub loading_session: Option<String>,
}

impl ContentState {
    /// True while `session_id` is still the one the user asked for last
    pub fn awaits_session(&self, session_id: &str) -> bool {
        matches!(self.view, ContentView::Gallery) && self.loading_session.as_deref() == Some(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_requested_session_is_awaited() {
        let mut state = ContentState {
            view: ContentView::Gallery,
            loading_session: Some("X".to_string()),
        };
        assert!(state.awaits_session("X"));

        state.loading_session = Some("Y".to_string());
        assert!(!state.awaits_session("X"));
        assert!(state.awaits_session("Y"));

        state.loading_session = None;
        assert!(!state.awaits_session("Y"));
    }
}
