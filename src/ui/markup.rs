use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};

/// Narrowest width handed to the HTML renderer
const MIN_RENDER_WIDTH: usize = 10;

/// How recipe descriptions are interpreted before display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupPolicy {
    /// Markup is rendered exactly as stored
    Trusted,
    /// Markup passes through the HTML sanitizer first
    Sanitized,
}

impl MarkupPolicy {
    pub fn from_config(sanitize: bool) -> Self {
        if sanitize {
            MarkupPolicy::Sanitized
        } else {
            MarkupPolicy::Trusted
        }
    }
}

/// Every description shown anywhere goes through here.
pub fn render_description_text(desc: &str, policy: MarkupPolicy, width: usize) -> String {
    let source = match policy {
        MarkupPolicy::Trusted => desc.to_string(),
        MarkupPolicy::Sanitized => ammonia::clean(desc),
    };

    let rendered = html2text::from_read(source.as_bytes(), width.max(MIN_RENDER_WIDTH));
    rendered
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// Styled-line form of [`render_description_text`] for the card view
pub fn render_description(
    desc: &str,
    policy: MarkupPolicy,
    width: usize,
    style: Style,
) -> Text<'static> {
    let lines: Vec<Line<'static>> = render_description_text(desc, policy, width)
        .lines()
        .map(|line| Line::from(Span::styled(line.to_string(), style)))
        .collect();
    Text::from(lines)
}
