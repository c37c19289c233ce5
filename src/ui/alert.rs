use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::Theme;

/// Blocking alert drawn over everything else
pub fn render(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Alert")
        .border_style(theme.danger_style());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            theme.title_style().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Press Enter to dismiss", theme.muted_style())),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
