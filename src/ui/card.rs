//! The flashcard itself, drawn at its animated offset

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::app::state::Shown;
use crate::deck::Item;
use crate::theme::Theme;

const CARD_WIDTH: u16 = 44;
const CARD_HEIGHT: u16 = 11;

/// Rotation (degrees) past which the tilt marker shows
const TILT_MARKER_AT: f32 = 2.0;

/// What goes on the card
pub struct CardFace<'a> {
    pub item: &'a Item,
    pub flipped: bool,
    /// 1-based position and deck size
    pub position: (usize, usize),
}

/// Where the card sits when at rest
pub fn rest_rect(area: Rect) -> Rect {
    let width = CARD_WIDTH.min(area.width);
    let height = CARD_HEIGHT.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Shift `rest` horizontally by `columns`, clipped to `area`
pub fn shifted(rest: Rect, columns: i32, area: Rect) -> Option<Rect> {
    let left = (i32::from(rest.x) + columns).max(i32::from(area.x));
    let right = (i32::from(rest.right()) + columns).min(i32::from(area.right()));
    if right - left < 4 {
        return None;
    }
    Some(Rect::new(left as u16, rest.y, (right - left) as u16, rest.height))
}

/// Draw the card at its animated offset. `rotation` only picks a tilt
/// marker; terminals can't rotate cells.
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    face: &CardFace<'_>,
    shown: Shown,
    rotation: f32,
    units_per_column: f32,
    theme: &Theme,
) {
    let columns = (shown.translate_x / units_per_column.max(f32::EPSILON)).round() as i32;
    let Some(rect) = shifted(rest_rect(area), columns, area) else {
        return;
    };

    let fg = theme.faded(shown.opacity);
    let border = if shown.opacity >= 0.85 { theme.border_focused } else { theme.border };

    let tilt = if rotation <= -TILT_MARKER_AT {
        "↺ "
    } else if rotation >= TILT_MARKER_AT {
        "↻ "
    } else {
        ""
    };
    let (index, total) = face.position;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(format!(" {tilt}{} ", face.item.category.label()))
        .title_bottom(Line::from(format!(" {index} / {total} ")).alignment(Alignment::Right))
        .style(Style::default().bg(theme.bg_secondary));

    let inner = block.inner(rect);
    frame.render_widget(Clear, rect);
    frame.render_widget(block, rect);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            face.item.front.as_str(),
            Style::default().fg(fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if face.flipped {
        lines.push(Line::from(Span::styled(face.item.back.as_str(), Style::default().fg(fg))));
        if !face.item.romanization.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("/{}/", face.item.romanization),
                Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
            )));
        }
    } else {
        lines.push(Line::from(Span::styled("Space to flip", Style::default().fg(theme.fg_muted))));
    }

    let para = Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true });
    frame.render_widget(para, inner);
}

/// Message in place of a card (empty deck, session not started)
pub fn draw_empty(frame: &mut Frame, area: Rect, lines: Vec<Line<'_>>, theme: &Theme) {
    let rect = rest_rect(area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_secondary));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let para = Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true });
    frame.render_widget(para, inner);
}
