//! Command-line and environment configuration

use std::time::Duration;

use clap::Parser;

use crate::model::DEFAULT_PAGE_SIZE;

/// Browse photo-booth event galleries from the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "booth-gallery")]
#[command(version, about)]
pub struct Args {
    /// Base URL of the gallery backend API
    #[arg(long, env = "BOOTH_API_BASE_URL", default_value = "http://localhost:3000/api")]
    pub api_base_url: String,

    /// Event to open on startup
    #[arg(short, long, env = "BOOTH_EVENT_ID")]
    pub event: Option<String>,

    /// Sessions requested per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE as u16, value_parser = clap::value_parser!(u16).range(1..=100))]
    pub page_size: u16,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub request_timeout_secs: u64,
}

impl Args {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
