//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, trigger bar, status bar,
//! and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, SystemStatus, View};
use crate::data::duration::format_duration;
use crate::data::Tone;

/// Render the header bar with system status and backend.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.controls.status;
    let status_style = match status {
        SystemStatus::Standby => app.theme.tone_style(Tone::Warning),
        SystemStatus::Operational => app.theme.tone_style(Tone::Normal),
        SystemStatus::Monitoring => Style::default().fg(app.theme.highlight),
    };

    let critical = app.dashboard.alerts.critical_count();
    let alerts_span = if critical > 0 {
        Span::styled(
            format!("{} critical", critical),
            app.theme.tone_style(Tone::Critical),
        )
    } else {
        Span::styled("0 critical", Style::default().add_modifier(Modifier::DIM))
    };

    let line = Line::from(vec![
        Span::styled(" ● ", status_style),
        Span::styled("DRIFTWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(status.label(), status_style.add_modifier(Modifier::BOLD)),
        Span::raw(" │ "),
        Span::raw(app.profile().label()),
        Span::raw(" │ "),
        alerts_span,
        Span::raw(" │ "),
        Span::styled(
            app.source_description().to_string(),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Overview "),
        Line::from(format!(" 2:Alerts ({}) ", app.dashboard.alerts.len())),
    ];

    let selected = match app.current_view {
        View::Overview => 0,
        View::Alerts => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the trigger bar: baseline, analyze and monitoring toggle.
pub fn render_controls(frame: &mut Frame, app: &App, area: Rect) {
    let controls = &app.controls;
    let monitoring_label = if controls.monitoring {
        "Stop Monitoring"
    } else {
        "Start Monitoring"
    };

    let line = Line::from(vec![
        Span::raw(" [i] "),
        Span::styled(
            controls.baseline.label(),
            app.theme.trigger_style(controls.baseline.enabled()),
        ),
        Span::raw("  [a] "),
        Span::styled(
            app.analyze_label(),
            app.theme.trigger_style(controls.analyze_enabled),
        ),
        Span::raw("  [m] "),
        Span::styled(monitoring_label, app.theme.trigger_style(true)),
        Span::styled(
            format!("  every {}", format_duration(app.monitor().options().period)),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// Shows a temporary message if one is pending, otherwise the last error or
/// the time since the last update plus the available keys.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref err) = app.last_error {
        let paragraph = Paragraph::new(format!(" Error: {} | i/a:retry q:quit", err))
            .style(app.theme.tone_style(Tone::Critical));
        frame.render_widget(paragraph, area);
        return;
    }

    let keys = match app.current_view {
        View::Overview => "i:baseline a:analyze m:monitor Tab:switch ?:help q:quit",
        View::Alerts => "↑↓:select Enter:detail Tab:switch e:export ?:help q:quit",
    };

    let status = match app.dashboard.last_updated {
        Some(at) => format!(
            " {} | Updated {:.1}s ago | {}",
            app.current_view.label(),
            at.elapsed().as_secs_f64(),
            keys
        ),
        None => format!(" {} | No data yet | {}", app.current_view.label(), keys),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Dashboard"),
        Line::from("  i           Establish baseline"),
        Line::from("  a           Run one analysis"),
        Line::from("  m           Start/stop monitoring"),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate alerts"),
        Line::from("  PgUp/PgDn   Jump 10 alerts"),
        Line::from("  Home/End    Jump to newest/oldest"),
        Line::from("  Enter       Alert detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" General"),
        Line::from("  e           Export to JSON"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 23u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
