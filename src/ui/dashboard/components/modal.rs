//! Confirmation and alert overlay

use super::super::state::Modal;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    area
}

pub fn render_modal(f: &mut Frame, modal: &Modal) {
    let (title, text, color) = match modal {
        Modal::ConfirmWipe(pending) => ("CONFIRM WIPE", pending.prompt(), Color::LightRed),
        Modal::Alert {
            message,
            is_error: true,
        } => ("ERROR", message.clone(), Color::LightRed),
        Modal::Alert { message, .. } => ("NOTICE", message.clone(), Color::LightGreen),
    };

    let lines: Vec<Line> = text.lines().map(Line::from).collect();
    let width = f.area().width.min(64);
    let height = (lines.len() as u16 + 4).min(f.area().height);
    let area = centered(f.area(), width, height);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .padding(Padding::horizontal(1));
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}
