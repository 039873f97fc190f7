//! Home screen module

use crate::ui::dashboard::DashboardState;
use crate::ui::dashboard::utils::connection_color;
use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

/// Renders the home screen: backend, connection summary and navigation keys.
pub fn render_home(f: &mut Frame, state: &DashboardState) {
    let uptime = state.start_time.elapsed().as_secs();
    let lines = vec![
        Line::from(Span::styled(
            "SecureWipe operator console",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Backend: {} ({})",
            state.environment,
            state.environment.backend_url()
        )),
        Line::from(vec![
            Span::raw("Status: "),
            Span::styled(
                state.status_label,
                Style::default().fg(connection_color(state.connection)),
            ),
        ]),
        Line::from(format!(
            "Polling every {:.1}s",
            state.settings.interval.as_secs_f64()
        )),
        Line::from(format!(
            "Last device refresh: {}",
            state.last_refresh_timestamp.as_deref().unwrap_or("never")
        )),
        Line::from(format!("Wipe commands issued: {}", state.wipes_issued)),
        Line::from(format!(
            "Uptime: {}h {}m {}s",
            uptime / 3600,
            (uptime % 3600) / 60,
            uptime % 60
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Tab] Device dashboard | [Q] Quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .title("HOME")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::uniform(1));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, f.area());
}
