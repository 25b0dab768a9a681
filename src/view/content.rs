//! Main content area rendering (thumbnail grid, session assets)

use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{
        Block, Borders, ListItem, Padding, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState,
    },
    Frame,
};

use crate::model::{
    ActiveSection, ContentState, ContentView, GalleryItem, GalleryViewport, LoaderSnapshot,
    SessionManifest, UiState,
};
use super::utils::{file_name, format_timestamp, render_scrollable_list, truncate_string};

/// Grid cells inside the gallery block, leaving the right column for the scrollbar
pub fn grid_area(content: Rect) -> Rect {
    let inner = content.inner(Margin { vertical: 1, horizontal: 1 });
    Rect {
        width: inner.width.saturating_sub(1),
        ..inner
    }
}

pub fn render_main_content(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
    gallery: &LoaderSnapshot,
    viewport: &GalleryViewport,
) {
    let is_focused = ui_state.active_section == ActiveSection::MainContent;
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    if let Some(session_id) = &content_state.loading_session {
        let loading = Paragraph::new(format!("Loading session {}...", session_id))
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Session ")
                    .border_style(border_style),
            );
        frame.render_widget(loading, area);
        return;
    }

    match &content_state.view {
        ContentView::Empty => {
            let content = Paragraph::new("Type an event id and press Enter to open its gallery\n\nUse Tab to navigate between sections\nUse arrows to move through thumbnails\nPress Enter on a thumbnail to open the session\nPress H for help")
                .style(Style::default().fg(Color::DarkGray))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .padding(Padding::horizontal(1))
                        .border_style(border_style),
                );
            frame.render_widget(content, area);
        }
        ContentView::Gallery => {
            render_gallery(frame, area, gallery, viewport, border_style);
        }
        ContentView::Session { manifest, selected_index } => {
            render_session(frame, area, manifest, *selected_index, border_style);
        }
    }
}

fn render_gallery(
    frame: &mut Frame,
    area: Rect,
    gallery: &LoaderSnapshot,
    viewport: &GalleryViewport,
    border_style: Style,
) {
    let title = match &gallery.subject {
        Some(event_id) => format!(" Event {} ", event_id),
        None => " Gallery ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style);

    let message = if gallery.is_loading_first {
        Some(("Loading sessions...", Color::Yellow))
    } else if gallery.items.is_empty() && gallery.error.is_some() {
        Some(("Failed to load this gallery. Press r to retry.", Color::Red))
    } else if gallery.items.is_empty() {
        Some(("No sessions yet", Color::DarkGray))
    } else {
        None
    };

    if let Some((text, color)) = message {
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(color))
            .block(block.padding(Padding::horizontal(1)));
        frame.render_widget(paragraph, area);
        return;
    }

    frame.render_widget(block, area);

    let grid = grid_area(area);
    let item_count = gallery.items.len();
    let layout = viewport.layout(item_count);
    let window = viewport.window(item_count);
    let cell_width = grid.width / layout.columns as u16;

    // Only rows in the virtual window are built; everything else is empty space
    for row in &window.rows {
        let top = row.vertical_offset as i64 - window.scroll_offset as i64;
        let bottom = top + row.height_estimate as i64;
        if bottom <= 0 || top >= grid.height as i64 {
            continue;
        }
        let visible_top = top.max(0) as u16;
        let visible_bottom = bottom.min(grid.height as i64) as u16;

        for (column, index) in layout.row_items(row.row_index).enumerate() {
            let cell = Rect {
                x: grid.x + column as u16 * cell_width,
                y: grid.y + visible_top,
                width: cell_width,
                height: visible_bottom - visible_top,
            };
            render_cell(frame, cell, &gallery.items[index], index == viewport.selected);
        }
    }

    let max_scroll = window.total_height.saturating_sub(grid.height as u32);
    let mut scrollbar_state = ScrollbarState::new(max_scroll as usize)
        .position(window.scroll_offset as usize)
        .viewport_content_length(grid.height as usize);
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(None)
        .end_symbol(None);
    frame.render_stateful_widget(
        scrollbar,
        area.inner(Margin { vertical: 1, horizontal: 0 }),
        &mut scrollbar_state,
    );
}

fn render_cell(frame: &mut Frame, area: Rect, item: &GalleryItem, is_selected: bool) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let border_style = if is_selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let lines = vec![
        Line::styled(format_timestamp(&item.created_at), Style::default().fg(Color::White)),
        Line::styled(
            truncate_string(file_name(&item.media_url), inner_width),
            Style::default().fg(Color::Cyan),
        ),
    ];

    let cell = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(truncate_string(&item.id, inner_width))
            .border_style(border_style),
    );
    frame.render_widget(cell, area);
}

fn render_session(
    frame: &mut Frame,
    area: Rect,
    manifest: &SessionManifest,
    selected_index: usize,
    border_style: Style,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(0),    // Assets
        ])
        .split(area);

    let videos = manifest.assets.iter().filter(|a| a.kind.is_video()).count();
    let header_text = format!(
        "📸 Session {}\n {} photos, {} videos | Backspace: Go back",
        manifest.session_id,
        manifest.assets.len() - videos,
        videos
    );
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .padding(Padding::horizontal(1))
                .borders(Borders::ALL)
                .border_style(border_style),
        );
    frame.render_widget(header, chunks[0]);

    let url_width = chunks[1].width.saturating_sub(16) as usize;
    let items: Vec<ListItem> = if manifest.assets.is_empty() {
        vec![ListItem::new("No media in this session").style(Style::default().fg(Color::DarkGray))]
    } else {
        manifest
            .assets
            .iter()
            .enumerate()
            .map(|(i, asset)| {
                let style = if i == selected_index {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(format!(
                    " {:>3}  {:<6} {}",
                    i + 1,
                    asset.kind.label(),
                    truncate_string(&asset.url, url_width)
                ))
                .style(style)
            })
            .collect()
    };

    let assets_block = Block::default()
        .borders(Borders::ALL)
        .title(" Media ")
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    render_scrollable_list(frame, chunks[1], items, selected_index, assets_block);
}
