use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};
use crate::ui::alerts::{scroll_offset, visible_rows};

/// File written by the export key.
pub const EXPORT_PATH: &str = "driftwatch_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Any key closes help
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Step through alerts with the overlay open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Dashboard triggers
        KeyCode::Char('i') => app.initialize(),
        KeyCode::Char('a') => app.analyze(),
        KeyCode::Char('m') => app.toggle_monitoring(),

        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Char('1') => app.set_view(View::Overview),
        KeyCode::Char('2') => app.set_view(View::Alerts),

        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Enter => app.enter_detail(),
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_PATH);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle mouse events. `content_height` is the height of the view area that
/// starts at `content_start_row`.
pub fn handle_mouse_event(
    app: &mut App,
    mouse: MouseEvent,
    content_start_row: u16,
    content_height: u16,
) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Rows in the alert table start after the block border and table header
            let alert_count = app.dashboard.alerts.len();
            if app.current_view == View::Alerts
                && alert_count > 0
                && clicked_row > content_start_row + 1
            {
                let screen_row = (clicked_row - content_start_row - 2) as usize;
                let visible = visible_rows(content_height);
                if screen_row < visible {
                    let selected = app.selected_alert_index.min(alert_count - 1);
                    let item = scroll_offset(selected, visible) + screen_row;
                    if item < alert_count {
                        app.selected_alert_index = item;
                    }
                }
            }

            // Tabs sit on row 1, below the header
            if clicked_row == 1 {
                // Approximate tab positions: Overview (0-12), Alerts (13-24)
                if mouse.column < 13 {
                    app.set_view(View::Overview);
                } else if mouse.column < 25 {
                    app.set_view(View::Alerts);
                }
            }
        }

        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}
