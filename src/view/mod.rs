//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, scrollable lists)
//! - `layout`: Main layout structure (top bar, sidebar, status bar)
//! - `content`: Main content area (thumbnail grid, session assets)
//! - `overlays`: Modal overlays (error, help)

mod utils;
mod layout;
mod content;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::model::{ContentState, GalleryViewport, LoaderSnapshot, UiState};

/// Screen regions, computed once per frame
struct AppAreas {
    top_bar: Rect,
    sidebar: Rect,
    content: Rect,
    status_bar: Rect,
}

fn split(area: Rect) -> AppAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Event input + API
            Constraint::Min(0),    // Main content (sidebar + content)
            Constraint::Length(3), // Gallery status
        ])
        .split(area);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(22), // Recent events
            Constraint::Percentage(78), // Main content
        ])
        .split(chunks[1]);

    AppAreas {
        top_bar: chunks[0],
        sidebar: main_chunks[0],
        content: main_chunks[1],
        status_bar: chunks[2],
    }
}

pub struct AppView;

impl AppView {
    /// Area the thumbnail grid is drawn into for a terminal of `area`
    pub fn gallery_grid_area(area: Rect) -> Rect {
        content::grid_area(split(area).content)
    }

    pub fn render(
        frame: &mut Frame,
        ui_state: &UiState,
        content_state: &ContentState,
        gallery: &LoaderSnapshot,
        viewport: &GalleryViewport,
    ) {
        let areas = split(frame.area());

        // Top bar: event id input + API base
        layout::render_top_bar(frame, areas.top_bar, ui_state);

        // Sidebar: recently opened events
        layout::render_sidebar(frame, areas.sidebar, ui_state);

        // Main content area
        content::render_main_content(frame, areas.content, ui_state, content_state, gallery, viewport);

        // Bottom: loaded count and loader flags
        layout::render_status_bar(frame, areas.status_bar, gallery, viewport);

        // Error notification overlay (if there's an error)
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        // Help popup overlay (if open)
        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
