//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::{ActiveSection, ContentView};
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    model.clear_error().await;
                    Ok(())
                }
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    drop(model);
                    self.retry().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                    model.hide_help_popup().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        let ui_state = model.get_ui_state().await;

        // Event id input takes every printable key
        if ui_state.active_section == ActiveSection::EventInput {
            match key.code {
                KeyCode::Tab => {
                    model.cycle_section_forward().await;
                    return Ok(());
                }
                KeyCode::BackTab => {
                    model.cycle_section_backward().await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    let event_id = ui_state.event_input.clone();
                    model.clear_event_input().await;
                    drop(model);
                    self.open_event(&event_id).await;
                    return Ok(());
                }
                KeyCode::Esc => {
                    model.clear_event_input().await;
                    return Ok(());
                }
                KeyCode::Backspace => {
                    model.backspace_event_input().await;
                    return Ok(());
                }
                KeyCode::Char(c) => {
                    // Q still quits from the input when Ctrl is pressed
                    if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.set_should_quit(true).await;
                        return Ok(());
                    }
                    model.append_to_event_input(c).await;
                    return Ok(());
                }
                _ => {}
            }
        }

        if ui_state.active_section == ActiveSection::RecentEvents {
            match key.code {
                KeyCode::Up => {
                    model.recent_move_up().await;
                    return Ok(());
                }
                KeyCode::Down => {
                    model.recent_move_down().await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    let selected = model.get_selected_recent_event().await;
                    drop(model);
                    if let Some(event_id) = selected {
                        self.open_event(&event_id).await;
                    }
                    return Ok(());
                }
                _ => {}
            }
        }

        if ui_state.active_section == ActiveSection::MainContent {
            let content = model.get_content_state().await;
            match content.view {
                ContentView::Gallery => match key.code {
                    KeyCode::Left => {
                        model.gallery_move(-1).await;
                        return Ok(());
                    }
                    KeyCode::Right => {
                        model.gallery_move(1).await;
                        return Ok(());
                    }
                    KeyCode::Up => {
                        model.gallery_move_rows(-1).await;
                        return Ok(());
                    }
                    KeyCode::Down => {
                        model.gallery_move_rows(1).await;
                        return Ok(());
                    }
                    KeyCode::PageUp => {
                        model.gallery_page(false).await;
                        return Ok(());
                    }
                    KeyCode::PageDown => {
                        model.gallery_page(true).await;
                        return Ok(());
                    }
                    KeyCode::Home => {
                        model.gallery_jump(false).await;
                        return Ok(());
                    }
                    KeyCode::End => {
                        model.gallery_jump(true).await;
                        return Ok(());
                    }
                    KeyCode::Enter => {
                        drop(model);
                        // manifest fetch runs in the background so the UI keeps drawing
                        let controller = self.clone();
                        tokio::spawn(async move {
                            controller.open_selected_session().await;
                        });
                        return Ok(());
                    }
                    _ => {}
                },
                ContentView::Session { .. } => match key.code {
                    KeyCode::Up => {
                        model.content_move_up().await;
                        return Ok(());
                    }
                    KeyCode::Down => {
                        model.content_move_down().await;
                        return Ok(());
                    }
                    KeyCode::Backspace | KeyCode::Esc => {
                        model.navigate_back().await;
                        return Ok(());
                    }
                    _ => {}
                },
                ContentView::Empty => {}
            }
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Esc => {
                model.navigate_back().await;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_section_backward().await;
                } else {
                    model.cycle_section_forward().await;
                }
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
            }
            KeyCode::Char('/') | KeyCode::Char('e') | KeyCode::Char('E') => {
                model.ui_state.lock().await.active_section = ActiveSection::EventInput;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(model);
                self.retry().await;
            }
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                model.show_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }
}
