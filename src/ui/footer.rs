use ratatui::{
    layout::{Alignment, Rect},
    widgets::Paragraph,
    Frame,
};

use crate::theme::Theme;

pub const FOOTER_TEXT: &str = "© Recipe Box. All rights reserved";

pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
    let footer = Paragraph::new(FOOTER_TEXT)
        .alignment(Alignment::Center)
        .style(theme.muted_style());
    frame.render_widget(footer, area);
}
