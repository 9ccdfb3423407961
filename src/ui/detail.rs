//! Detail overlay rendering.
//!
//! Displays a modal overlay with the full record behind the selected alert.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Render the alert detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(alert) = app.dashboard.alerts.get(app.selected_alert_index) else {
        return;
    };

    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (area.height * 70 / 100).clamp(MIN_OVERLAY_HEIGHT, 24);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(5), // Headline
        Constraint::Min(8),    // Fields
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    // ===== HEADER =====
    let severity_style = app.theme.tone_style(alert.severity);
    let mut badge_spans = vec![Span::raw(" Observed at "), Span::raw(alert.observed_at.clone())];
    if let Some(badge) = alert.badge {
        badge_spans.push(Span::raw("    "));
        badge_spans.push(Span::styled(
            badge.label(),
            app.theme.tone_style(badge.tone()).add_modifier(Modifier::BOLD),
        ));
    }

    let header_lines = vec![
        Line::from(vec![Span::styled(
            format!(" {} ", alert.headline),
            severity_style.add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(badge_spans),
    ];

    let header_block = Block::default()
        .title(format!(
            " Alert {}/{} ",
            app.selected_alert_index + 1,
            app.dashboard.alerts.len()
        ))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(header_lines).block(header_block), chunks[0]);

    // ===== FIELDS =====
    let intent = if alert.intent_prediction.is_empty() {
        "-".to_string()
    } else {
        alert.intent_prediction.clone()
    };

    let rows = vec![
        Row::new(vec![Cell::from("User"), Cell::from(alert.user.clone())]),
        Row::new(vec![
            Cell::from("Drift score"),
            Cell::from(Span::styled(format!("{:.4}", alert.drift_score), severity_style)),
        ]),
        Row::new(vec![Cell::from("Intent"), Cell::from(intent)]),
        Row::new(vec![
            Cell::from("Resources accessed"),
            Cell::from(alert.resource_access_count.to_string()),
        ]),
        Row::new(vec![
            Cell::from("Login time"),
            Cell::from(format!("{:.2}", alert.login_time)),
        ]),
        Row::new(vec![
            Cell::from("Command complexity"),
            Cell::from(format!("{:.2}", alert.cmd_complexity)),
        ]),
    ];

    let widths = [
        Constraint::Length(20), // Field
        Constraint::Fill(1),    // Value
    ];

    let table = Table::new(rows, widths).block(
        Block::default()
            .title(" Event ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(table, chunks[1]);

    // ===== FOOTER =====
    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " ↑↓ previous/next alert  Esc close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[2]);
}
