//! Dashboard header component
//!
//! Renders the title and the connection/refresh gauge

use super::super::state::DashboardState;
use super::super::utils::connection_color;
use crate::controller::ConnectionState;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

/// Text, color and fill of the header gauge for the current state.
pub fn gauge_content(state: &DashboardState) -> (String, Color, u16) {
    match state.connection {
        ConnectionState::Disconnected => (
            format!("{} - press [C] to connect", state.status_label.to_uppercase()),
            connection_color(state.connection),
            0,
        ),
        ConnectionState::Connecting => {
            // Loops every 20 ticks
            let progress = ((state.tick % 20) as f64 / 20.0 * 100.0) as u16;
            (
                format!("{} {}", state.status_label.to_uppercase(), state.environment.backend_url()),
                connection_color(state.connection),
                progress,
            )
        }
        ConnectionState::Connected => {
            let interval = state.settings.interval;
            let elapsed = state
                .last_refresh
                .map(|at| at.elapsed())
                .unwrap_or_default()
                .min(interval);
            let remaining = interval.saturating_sub(elapsed);
            let progress = if interval.is_zero() {
                100
            } else {
                (elapsed.as_secs_f64() / interval.as_secs_f64() * 100.0) as u16
            };
            (
                format!(
                    "CONNECTED - next refresh in {:.1}s",
                    remaining.as_secs_f64()
                ),
                connection_color(state.connection),
                progress.min(100),
            )
        }
    }
}

/// Render header with title and connection gauge.
pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let title_text = format!(
        "SECUREWIPE CONSOLE v{} | {}",
        env!("CARGO_PKG_VERSION"),
        state.environment
    );
    let title = Paragraph::new(title_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    let (progress_text, gauge_color, progress_percent) = gauge_content(state);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(
            Style::default()
                .fg(gauge_color)
                .add_modifier(Modifier::BOLD),
        )
        .percent(progress_percent)
        .label(progress_text);

    f.render_widget(gauge, header_chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::PollSettings;
    use crate::environment::Environment;
    use crate::ui::app::UIConfig;
    use std::time::Instant;

    #[test]
    fn disconnected_gauge_is_empty_and_prompts_to_connect() {
        let state = DashboardState::new(
            Environment::Production,
            Instant::now(),
            UIConfig::new(false, PollSettings::default()),
        );
        let (text, _, percent) = gauge_content(&state);
        assert_eq!(text, "DISCONNECTED - press [C] to connect");
        assert_eq!(percent, 0);
    }
}
