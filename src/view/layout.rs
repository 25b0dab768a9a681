//! Layout rendering (top bar, sidebar, status bar)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, GalleryViewport, LoaderSnapshot, UiState};
use super::utils::truncate_string;

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Event id input
            Constraint::Length(36), // API base
        ])
        .split(area);

    let is_focused = ui_state.active_section == ActiveSection::EventInput;
    let input_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let input_text = if ui_state.event_input.is_empty() {
        "Type an event id and press Enter..."
    } else {
        &ui_state.event_input
    };

    let input = Paragraph::new(input_text)
        .style(input_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Event ")
                .padding(Padding::horizontal(1))
                .border_style(if is_focused {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                }),
        );
    frame.render_widget(input, chunks[0]);

    let api_width = chunks[1].width.saturating_sub(4) as usize;
    let api = Paragraph::new(truncate_string(&ui_state.api_base_url, api_width))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" API "));
    frame.render_widget(api, chunks[1]);
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let is_focused = ui_state.active_section == ActiveSection::RecentEvents;

    let items: Vec<ListItem> = if ui_state.recent_events.is_empty() {
        vec![ListItem::new("No events yet").style(Style::default().fg(Color::DarkGray))]
    } else {
        ui_state
            .recent_events
            .iter()
            .enumerate()
            .map(|(i, event_id)| {
                let style = if i == ui_state.recent_selected && is_focused {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else if i == ui_state.recent_selected {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(event_id.as_str()).style(style)
            })
            .collect()
    };

    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let recent = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Recent Events ")
                .padding(Padding::horizontal(1))
                .border_style(border_style),
        )
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(ui_state.recent_selected));

    frame.render_stateful_widget(recent, area, &mut list_state);
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, gallery: &LoaderSnapshot, viewport: &GalleryViewport) {
    let status_text = match &gallery.subject {
        None => " No event open".to_string(),
        Some(_) if gallery.is_loading_first => " Loading sessions...".to_string(),
        Some(event_id) => match &gallery.error {
            Some(failure) if gallery.items.is_empty() => {
                format!(" {} | failed to load: {}", event_id, failure.error)
            }
            _ => format!(" {} | {} sessions loaded", event_id, gallery.items.len()),
        },
    };

    let paging_text = if gallery.is_loading_next {
        " ⏳ loading more "
    } else if gallery.error.is_some() {
        " ⚠ last fetch failed, r to retry "
    } else if gallery.has_more {
        " ↓ more available "
    } else if gallery.subject.is_some() && !gallery.is_loading_first {
        " end of gallery "
    } else {
        ""
    };

    let window = viewport.window(gallery.items.len());
    let max_scroll = window.total_height.saturating_sub(viewport.height as u32);
    let ratio = if max_scroll > 0 {
        (window.scroll_offset as f64 / max_scroll as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let position = if gallery.items.is_empty() {
        String::new()
    } else {
        format!("{} / {}", viewport.selected + 1, gallery.items.len())
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ", status_text))
                .title_bottom(Line::from(paging_text).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(position);

    frame.render_widget(gauge, area);
}
