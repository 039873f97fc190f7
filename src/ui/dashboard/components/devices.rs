//! Dashboard device list component
//!
//! Renders one row per device card, or the current placeholder

use super::super::state::DashboardState;
use super::super::utils::status_color;
use crate::controller::DeviceCard;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Padding, Paragraph, Row, Table, TableState, Wrap,
};

pub fn render_devices_panel(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let block = Block::default()
        .title(format!("DEVICES ({})", state.device_view.cards().len()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1));

    if let Some(placeholder) = state.device_view.placeholder() {
        let color = if state.device_view.is_error() {
            Color::LightRed
        } else {
            Color::Gray
        };
        let paragraph = Paragraph::new(vec![Line::from(""), Line::from(placeholder)])
            .alignment(Alignment::Center)
            .style(Style::default().fg(color))
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let rows: Vec<Row> = state
        .device_view
        .cards()
        .iter()
        .map(|card| {
            Row::new(vec![
                Cell::from(card.machine_id.clone()),
                Cell::from(status_line(card)),
                Cell::from(card.last_seen.clone()).style(Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let header = Row::new(vec!["MACHINE ID", "STATUS", "LAST SEEN"]).style(
        Style::default()
            .fg(Color::LightBlue)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("> ");

    let mut table_state = TableState::default().with_selected(Some(state.selected));
    f.render_stateful_widget(table, area, &mut table_state);
}

/// Phase in bold, detail dimmed; the full status text is kept.
fn status_line(card: &DeviceCard) -> Line<'static> {
    let style = Style::default().fg(status_color(&card.status_class));
    let text = card.status_text.as_str();
    match &card.status_detail {
        Some(detail) => {
            let (head, tail) = text.split_at(text.len() - detail.len());
            Line::from(vec![
                Span::styled(head.to_string(), style.add_modifier(Modifier::BOLD)),
                Span::styled(tail.to_string(), style.add_modifier(Modifier::DIM)),
            ])
        }
        None => Line::from(Span::styled(text.to_string(), style)),
    }
}
