mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tokio::sync::Mutex;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use config::Args;
use view::AppView;
use controller::AppController;
use model::{AppModel, GalleryClient, RecentEvents};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!(
        api_base_url = %args.api_base_url,
        page_size = args.page_size,
        "=== Booth Gallery Starting ==="
    );

    let client = GalleryClient::new(&args.api_base_url, args.request_timeout())?;

    let mut app_model = AppModel::new(args.page_size as usize, RecentEvents::new());
    app_model.set_api_base_url(client.base_url()).await;
    app_model.set_source(Arc::new(client));
    app_model.load_recent_events().await;

    let model = Arc::new(Mutex::new(app_model));
    let (controller, completions) = AppController::new(model.clone());
    controller.start_fetch_listener(completions);

    if let Some(event_id) = &args.event {
        controller.open_event(event_id).await;
    }

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Booth Gallery shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        // Measure the grid before drawing so the viewport reacts to resizes
        let size = terminal.size()?;
        let grid = AppView::gallery_grid_area(Rect::new(0, 0, size.width, size.height));
        controller.sync_viewport(grid.width, grid.height).await;

        let (ui_state, content_state, gallery, viewport, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;

            (
                model_guard.get_ui_state().await,
                model_guard.get_content_state().await,
                model_guard.get_gallery_snapshot().await,
                model_guard.get_viewport().await,
                model_guard.should_quit().await,
            )
        };

        terminal.draw(|f| {
            AppView::render(f, &ui_state, &content_state, &gallery, &viewport);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
