//! Core type definitions for the application

use std::time::Instant;

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    EventInput,
    RecentEvents,
    MainContent,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::EventInput => ActiveSection::RecentEvents,
            ActiveSection::RecentEvents => ActiveSection::MainContent,
            ActiveSection::MainContent => ActiveSection::EventInput,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::EventInput => ActiveSection::MainContent,
            ActiveSection::RecentEvents => ActiveSection::EventInput,
            ActiveSection::MainContent => ActiveSection::RecentEvents,
        }
    }
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub event_input: String,
    pub recent_events: Vec<String>,
    pub recent_selected: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
    pub api_base_url: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::EventInput,
            event_input: String::new(),
            recent_events: Vec::new(),
            recent_selected: 0,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
            api_base_url: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_cycle_both_ways() {
        let mut section = ActiveSection::EventInput;
        for _ in 0..3 {
            section = section.next();
        }
        assert_eq!(section, ActiveSection::EventInput);
        assert_eq!(section.prev(), ActiveSection::MainContent);
        assert_eq!(section.next().prev(), section);
    }
}
