//! Splash screen rendering module.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

pub const LOGO_SECURE: &str = r#"
  ███████╗ ███████╗  ██████╗ ██╗   ██╗ ██████╗  ███████╗
  ██╔════╝ ██╔════╝ ██╔════╝ ██║   ██║ ██╔══██╗ ██╔════╝
  ███████╗ █████╗   ██║      ██║   ██║ ██████╔╝ █████╗  
  ╚════██║ ██╔══╝   ██║      ██║   ██║ ██╔══██╗ ██╔══╝  
  ███████║ ███████╗ ╚██████╗ ╚██████╔╝ ██║  ██║ ███████╗
  ╚══════╝ ╚══════╝  ╚═════╝  ╚═════╝  ╚═╝  ╚═╝ ╚══════╝
"#;

pub const LOGO_WIPE: &str = r#"
  ██╗    ██╗ ██╗ ██████╗  ███████╗
  ██║    ██║ ██║ ██╔══██╗ ██╔════╝
  ██║ █╗ ██║ ██║ ██████╔╝ █████╗  
  ██║███╗██║ ██║ ██╔═══╝  ██╔══╝  
  ╚███╔███╔╝ ██║ ██║      ███████╗
   ╚══╝╚══╝  ╚═╝ ╚═╝      ╚══════╝
"#;

fn logo_lines(logo: &str, color: Color) -> impl Iterator<Item = Line<'_>> {
    logo.trim_matches('\n').lines().map(move |line| {
        Line::from(Span::styled(
            line,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    })
}

pub fn render_splash(f: &mut Frame) {
    let mut lines: Vec<Line> = logo_lines(LOGO_SECURE, Color::Cyan).collect();
    lines.extend(logo_lines(LOGO_WIPE, Color::LightRed));

    lines.push(Line::from(Span::raw(" ")));
    lines.push(
        Span::styled(
            format!("Operator Console {}", env!("CARGO_PKG_VERSION")),
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::ITALIC),
        )
        .into(),
    );

    let logo_height = (lines.len() + 2) as u16;

    // Vertically center using layout
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min((f.area().height.saturating_sub(logo_height)) / 2),
            Constraint::Length(logo_height),
            Constraint::Min((f.area().height.saturating_sub(logo_height + 1)) / 2),
        ])
        .split(f.area());

    let centered_area: Rect = vertical_chunks[1];

    let logo = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::NONE));

    f.render_widget(logo, centered_area);
}
