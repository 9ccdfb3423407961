//! Alerts view rendering.
//!
//! Full list of retained alerts, newest first.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::{Tone, MAX_ALERTS};

/// Table rows that fit in an Alerts area of `height`, after the borders and
/// the header row.
pub fn visible_rows(height: u16) -> usize {
    height.saturating_sub(3) as usize
}

/// First row shown when `selected` must stay in view, scrolling only as far
/// as needed.
pub fn scroll_offset(selected: usize, visible: usize) -> usize {
    (selected + 1).saturating_sub(visible.max(1))
}

/// Render the Alerts view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let alerts = &app.dashboard.alerts;
    let title = format!(" Alerts ({}/{}) ", alerts.len(), MAX_ALERTS);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if alerts.is_empty() {
        let paragraph = Paragraph::new("No alerts. Suspicious activity shows up here.")
            .style(app.theme.tone_style(Tone::Normal))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Time"),
        Cell::from("Action"),
        Cell::from("Intent"),
        Cell::from("User"),
        Cell::from("Drift"),
        Cell::from("Resources"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = alerts
        .iter()
        .map(|alert| {
            let intent = match alert.badge {
                Some(badge) => Cell::from(Span::styled(
                    badge.label(),
                    app.theme.tone_style(badge.tone()),
                )),
                None => Cell::from("-"),
            };
            Row::new(vec![
                Cell::from(alert.observed_at.clone()),
                Cell::from(Span::styled(
                    alert.headline.clone(),
                    app.theme.tone_style(alert.severity),
                )),
                intent,
                Cell::from(alert.user.clone()),
                Cell::from(Span::styled(
                    format!("{:.3}", alert.drift_score),
                    app.theme.tone_style(alert.severity),
                )),
                Cell::from(alert.resource_access_count.to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(14),
        Constraint::Length(7),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    // Pin the offset so mouse clicks map onto the same rows
    let selected = app.selected_alert_index.min(alerts.len() - 1);
    let offset = scroll_offset(selected, visible_rows(area.height));
    let mut state = TableState::default()
        .with_offset(offset)
        .with_selected(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);

    // Selection hint in the bottom border
    if area.height > 2 {
        let hint = Paragraph::new(Span::styled(
            format!(" {}/{} Enter:detail ", app.selected_alert_index + 1, alerts.len()),
            Style::default().add_modifier(Modifier::DIM),
        ));
        let hint_width = 24u16.min(area.width.saturating_sub(4));
        let hint_area = Rect::new(area.x + 2, area.y + area.height - 1, hint_width, 1);
        frame.render_widget(hint, hint_area);
    }
}
