//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (sections, UI state, etc.)
//! - `error`: Fetch error taxonomy
//! - `gallery`: Gallery items, pages, session manifests and their wire shapes
//! - `loader`: Paginated gallery loader state machine
//! - `virtual_rows`: Row virtualization math for the thumbnail grid
//! - `viewport`: Grid viewport state and the load-more trigger
//! - `content`: Content view state (gallery, session detail)
//! - `cache`: Recently opened events
//! - `gallery_client`: Gallery API source trait and its HTTP client
//! - `app_model`: Main application model with state management methods

mod types;
mod error;
mod gallery;
mod loader;
mod virtual_rows;
mod viewport;
mod content;
mod cache;
mod gallery_client;
mod app_model;

// Re-export the types used outside the model
pub use types::{ActiveSection, UiState};

pub use error::FetchError;

pub use gallery::{GalleryItem, Page, SessionManifest};
#[cfg(test)]
pub use gallery::{Cursor, SubjectId};

pub use loader::{
    Completion, FetchKind, FetchRequest, FetchTicket, LoaderSnapshot, DEFAULT_PAGE_SIZE,
};

pub use viewport::GalleryViewport;

pub use content::{ContentState, ContentView};

pub use cache::RecentEvents;

pub use gallery_client::{GalleryClient, GallerySource};

pub use app_model::AppModel;
