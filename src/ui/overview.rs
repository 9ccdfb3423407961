//! Overview rendering.
//!
//! Four stat tiles across the top (drift score, events analyzed, intent
//! forecast, threat probability), the drift chart below them and the most
//! recent alerts at the bottom.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{Alert, Tone};

/// Alerts shown under the chart.
const RECENT_ALERTS: usize = 5;

/// Render the Overview.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(5),                        // Tiles
        Constraint::Min(6),                           // Chart
        Constraint::Length(RECENT_ALERTS as u16 + 2), // Recent alerts
    ])
    .split(area);

    render_tiles(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);
    render_recent_alerts(frame, app, chunks[2]);
}

fn tile_block<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

fn render_tiles(frame: &mut Frame, app: &App, area: Rect) {
    let tiles = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
    let dashboard = &app.dashboard;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    // Drift score
    let drift = Paragraph::new(vec![
        Line::from(Span::styled(dashboard.drift_display(), bold)),
        Line::from(Span::styled(
            "batch average",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .block(tile_block(app, " Drift Score "));
    frame.render_widget(drift, tiles[0]);

    // Events analyzed
    let events = Paragraph::new(vec![
        Line::from(Span::styled(format_count(dashboard.events_total), bold)),
        Line::from(Span::styled(
            format!("{} updates", dashboard.updates),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .block(tile_block(app, " Events Analyzed "));
    frame.render_widget(events, tiles[1]);

    // Forecast
    let forecast_lines = match &dashboard.forecast {
        Some(forecast) => {
            let mut lines = vec![Line::from(vec![
                Span::styled(
                    forecast.label,
                    app.theme.tone_style(forecast.tone).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {:.1}%", forecast.probability)),
            ])];
            lines.push(Line::from(Span::styled(
                forecast.description.clone(),
                Style::default().add_modifier(Modifier::DIM),
            )));
            lines
        }
        None => vec![Line::from("-")],
    };
    frame.render_widget(
        Paragraph::new(forecast_lines).block(tile_block(app, " Intent Forecast ")),
        tiles[2],
    );

    // Threat probability
    let block = tile_block(app, " Threat Probability ");
    match &dashboard.threat {
        Some(threat) => {
            let gauge = Gauge::default()
                .block(block)
                .gauge_style(app.theme.tone_style(threat.level.tone()))
                .ratio(threat.ratio())
                .label(format!("{} {}", threat.display(), threat.level.label()));
            frame.render_widget(gauge, tiles[3]);
        }
        None => frame.render_widget(Paragraph::new("-").block(block), tiles[3]),
    }
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let chart_buffer = &app.dashboard.chart;
    let title = format!(
        " Drift Over Time ({}/{}) ",
        chart_buffer.len(),
        chart_buffer.capacity()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if chart_buffer.is_empty() {
        let paragraph = Paragraph::new("No data yet. Press 'a' to analyze or 'm' to monitor.")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let series = chart_buffer.series();
    let x_max = (chart_buffer.len().saturating_sub(1)).max(1) as f64;
    let y_max = chart_buffer.max_value().unwrap_or(1.0).max(1.0);

    let first = chart_buffer.iter().next().map(|p| p.label.clone()).unwrap_or_default();
    let last = chart_buffer.latest().map(|p| p.label.clone()).unwrap_or_default();

    let datasets = vec![Dataset::default()
        .name("drift")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(app.theme.chart))
        .data(&series)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([0.0, x_max])
                .labels(vec![Span::raw(first), Span::raw(last)]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.2}", y_max / 2.0)),
                    Span::raw(format!("{:.2}", y_max)),
                ]),
        );

    frame.render_widget(chart, area);
}

fn render_recent_alerts(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Recent Alerts ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if app.dashboard.alerts.is_empty() {
        let paragraph = Paragraph::new("No alerts")
            .style(app.theme.tone_style(Tone::Normal))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .dashboard
        .alerts
        .iter()
        .take(RECENT_ALERTS)
        .map(|alert| ListItem::new(alert_line(app, alert)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// One-line alert summary.
fn alert_line<'a>(app: &App, alert: &'a Alert) -> Line<'a> {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", alert.observed_at),
            Style::default().add_modifier(Modifier::DIM),
        ),
        Span::styled(alert.headline.as_str(), app.theme.tone_style(alert.severity)),
    ];
    if let Some(badge) = alert.badge {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("[{}]", badge.label()),
            app.theme.tone_style(badge.tone()),
        ));
    }
    spans.push(Span::raw(format!(
        "  {} drift {:.2}",
        alert.user, alert.drift_score
    )));
    Line::from(spans)
}

/// Format a count for display (e.g., 1234 -> "1.2K", 1234567 -> "1.2M").
fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234), "1.2K");
        assert_eq!(format_count(1_234_567), "1.2M");
    }
}
