//! Layout utilities and common components

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::input::Action;
use crate::app::state::{Button, StatusLine};
use crate::theme::Theme;

/// An on-screen button before layout
pub struct ButtonSpec {
    pub label: &'static str,
    pub action: Action,
    pub enabled: bool,
}

impl ButtonSpec {
    pub fn new(label: &'static str, action: Action, enabled: bool) -> Self {
        Self { label, action, enabled }
    }
}

/// Draw a centered row of buttons. Returns the enabled ones with their
/// rects so clicks can be routed.
pub fn draw_buttons(frame: &mut Frame, area: Rect, specs: &[ButtonSpec], theme: &Theme) -> Vec<Button> {
    const GAP: u16 = 3;

    let widths: Vec<u16> = specs.iter().map(|s| s.label.chars().count() as u16 + 2).collect();
    let total = widths.iter().sum::<u16>() + GAP * specs.len().saturating_sub(1) as u16;
    let mut x = area.x + area.width.saturating_sub(total) / 2;

    let mut buttons = Vec::new();
    for (spec, width) in specs.iter().zip(widths) {
        let width = width.min(area.right().saturating_sub(x));
        if width == 0 {
            break;
        }
        let rect = Rect::new(x, area.y, width, area.height.min(1));

        let style = if spec.enabled {
            Style::default().fg(theme.accent_primary).bg(theme.bg_tertiary)
        } else {
            Style::default().fg(theme.fg_muted).bg(theme.bg_secondary)
        };
        let label = Paragraph::new(format!(" {} ", spec.label)).style(style);
        frame.render_widget(label, rect);

        if spec.enabled {
            buttons.push(Button { area: rect, action: spec.action });
        }
        x += width + GAP;
    }
    buttons
}

/// Draw the status line: a message if there is one, otherwise key hints
pub fn draw_status(frame: &mut Frame, area: Rect, status: &StatusLine, hints: &str, theme: &Theme) {
    let line = match &status.message {
        Some(msg) if status.is_error => {
            Line::from(Span::styled(msg.as_str(), Style::default().fg(theme.error)))
        }
        Some(msg) => Line::from(Span::styled(msg.as_str(), Style::default().fg(theme.info))),
        None => Line::from(Span::styled(hints, Style::default().fg(theme.fg_muted))),
    };

    let para = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(para, area);
}

/// Draw the keyboard help overlay
pub fn draw_help(frame: &mut Frame, area: Rect, vim_mode: bool, theme: &Theme) {
    let overlay = centered_rect(60, 70, area);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .title(" Keys ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let nav = if vim_mode { "← → / h l / [ ]" } else { "← → / [ ]" };
    let rows = [
        (nav, "Previous / next card (missed / knew it in practice)"),
        ("Space", "Flip the card"),
        ("drag", "Swipe the card with the mouse"),
        ("p", "Pronounce"),
        ("f", "Cycle the category filter"),
        ("Enter", "Reshuffle / start a new session"),
        ("y n", "Knew it / missed it"),
        ("r", "Retry missed cards"),
        ("0", "Back to the first card / end session"),
        ("Tab", "Switch between browse and practice"),
        ("q", "Quit"),
    ];

    let mut lines = vec![Line::from("")];
    for (keys, what) in rows {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {keys:>16}  "),
                Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD),
            ),
            Span::styled(what, Style::default().fg(theme.fg_secondary)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [?] Close",
        Style::default().fg(theme.fg_muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Create a centered rectangle with the given percentage of width and height
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    #[test]
    fn disabled_buttons_are_not_clickable() {
        let backend = TestBackend::new(60, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();
        let mut buttons = Vec::new();

        terminal
            .draw(|frame| {
                let specs = [
                    ButtonSpec::new("◀ Prev", Action::Prev, false),
                    ButtonSpec::new("Next ▶", Action::Next, true),
                ];
                let area = frame.area();
                buttons = draw_buttons(frame, area, &specs, &theme);
            })
            .unwrap();

        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].action, Action::Next);
        assert_eq!(buttons[0].area.height, 1);
    }

    #[test]
    fn centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 70, outer);
        assert!(inner.x >= outer.x && inner.right() <= outer.right());
        assert!(inner.y >= outer.y && inner.bottom() <= outer.bottom());
    }
}
