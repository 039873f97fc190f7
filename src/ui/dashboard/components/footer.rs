//! Dashboard footer component
//!
//! Renders the key bindings for the current state

use super::super::state::{DashboardState, Modal};
use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

pub fn footer_text(state: &DashboardState) -> String {
    match &state.modal {
        Some(Modal::ConfirmWipe(_)) => "[Y] Issue wipe | [N] Cancel".to_string(),
        Some(Modal::Alert { .. }) => "Press any key to dismiss".to_string(),
        None => format!(
            "[C] {} | [↑/↓] Select | [W] Wipe | [Tab] Home | [Q] Quit",
            state.action_label
        ),
    }
}

pub fn render_footer(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let footer = Paragraph::new(footer_text(state))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}
