//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and drives gallery fetches.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `navigation`: Opening events and sessions, paging, retry
//! - `fetch_events`: Fetch dispatch and the completion listener

mod input;
mod navigation;
mod fetch_events;

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use crate::model::{AppModel, FetchError};

pub use fetch_events::FetchCompletion;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    completions: mpsc::UnboundedSender<FetchCompletion>,
}

impl AppController {
    /// Build a controller and the queue its fetch completions arrive on.
    ///
    /// Hand the receiver to [`AppController::start_fetch_listener`].
    pub fn new(model: Arc<Mutex<AppModel>>) -> (Self, mpsc::UnboundedReceiver<FetchCompletion>) {
        let (completions, receiver) = mpsc::unbounded_channel();
        (Self { model, completions }, receiver)
    }

    pub(crate) fn format_error(error: &FetchError) -> String {
        match error {
            FetchError::Status { status: 404, .. } => {
                "Event not found. Check the event id and try again.".to_string()
            }
            FetchError::Status { status: 401 | 403, .. } => {
                "This gallery is private.".to_string()
            }
            FetchError::Status { status: 429, .. } => "Rate limited. Please wait a moment.".to_string(),
            FetchError::Status { status, .. } if *status >= 500 => {
                format!("Gallery server error ({status}). Press r to retry.")
            }
            FetchError::Transport(msg) if msg.contains("timed out") => {
                "Gallery server did not answer in time. Press r to retry.".to_string()
            }
            FetchError::Transport(_) => "Cannot reach the gallery server. Press r to retry.".to_string(),
            other => format!("Error: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_humanized() {
        let not_found = FetchError::Status { status: 404, url: "http://x/events/e".into() };
        assert!(AppController::format_error(&not_found).contains("not found"));

        let outage = FetchError::Status { status: 503, url: String::new() };
        assert!(AppController::format_error(&outage).contains("503"));

        let timeout = FetchError::Transport("request timed out".into());
        assert!(AppController::format_error(&timeout).contains("in time"));

        let malformed = FetchError::Malformed("missing field".into());
        assert_eq!(AppController::format_error(&malformed), "Error: Malformed response: missing field");
    }
}
