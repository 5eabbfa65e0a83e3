//! UI rendering components

pub mod card;
pub mod layout;
pub mod practice;

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::input::Action;
use crate::app::state::{AppState, Screen};
use crate::theme::Theme;
use card::CardFace;
use layout::ButtonSpec;

const BROWSE_HINTS: &str = "[←/→] navigate  [Space] flip  [f] filter  [p] say  [Tab] practice  [?] help";

/// Main draw function. Also records the card surface and button rects
/// so pointer events can be routed.
pub fn draw(frame: &mut Frame, state: &mut AppState, theme: &Theme, now: Instant) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), area);

    let [header, body, buttons, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_header(frame, header, state, theme);

    let (specs, hints) = match state.screen {
        Screen::Browse => {
            draw_browse(frame, body, state, theme, now);
            (browse_buttons(state), BROWSE_HINTS)
        }
        Screen::Practice => {
            practice::draw(frame, body, state, theme, now);
            (practice::button_specs(state), practice::hints(state.practice.session()))
        }
    };

    state.buttons = layout::draw_buttons(frame, buttons, &specs, theme);
    layout::draw_status(frame, status, &state.status, hints, theme);

    if state.show_help {
        layout::draw_help(frame, area, state.vim_mode, theme);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let tab = |screen: Screen| {
        if screen == state.screen {
            Span::styled(
                format!(" {} ", screen.title()),
                Style::default()
                    .fg(theme.bg_primary)
                    .bg(theme.accent_primary)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!(" {} ", screen.title()), Style::default().fg(theme.fg_muted))
        }
    };

    let filter = match state.screen {
        Screen::Browse => state.filter,
        Screen::Practice => state.practice_filter,
    };

    let mut spans = vec![
        Span::styled(
            " swipedeck ",
            Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD),
        ),
        tab(Screen::Browse),
        Span::raw(" "),
        tab(Screen::Practice),
        Span::styled(format!("   filter: {filter}"), Style::default().fg(theme.fg_muted)),
    ];
    if state.speech.is_busy() {
        spans.push(Span::styled("   ♪ speaking", Style::default().fg(theme.info)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg_secondary)),
        area,
    );
}

fn draw_browse(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme, now: Instant) {
    state.browse.attach(card::rest_rect(area));

    if state.browse.deck().is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("No cards", Style::default().fg(theme.fg_primary))),
            Line::from(""),
            Line::from(Span::styled("[f] change filter", Style::default().fg(theme.fg_muted))),
        ];
        card::draw_empty(frame, area, lines, theme);
        return;
    }

    let visual = state.browse.visual();
    let shown = state.browse_tween.sample(&visual, now);
    let face = CardFace {
        item: state.browse.current(),
        flipped: state.browse.is_flipped(),
        position: (state.browse.index() + 1, state.browse.total()),
    };
    card::draw(frame, area, &face, shown, visual.rotation, state.units_per_column, theme);
}

fn browse_buttons(state: &AppState) -> Vec<ButtonSpec> {
    let card = &state.browse;
    let resting = card.motion().is_resting();
    vec![
        ButtonSpec::new("◀ Prev", Action::Prev, resting && card.can_retreat()),
        ButtonSpec::new("Flip", Action::Flip, card.total() > 0),
        ButtonSpec::new("Next ▶", Action::Next, resting && card.can_advance()),
        ButtonSpec::new("♪ Say", Action::Pronounce, state.audio_enabled && !state.speech.is_busy()),
    ]
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::config::Config;
    use crate::deck::{ContentPool, DeckBuilder};
    use crate::nav::Phase;

    #[test]
    fn draw_records_surface_and_buttons() {
        let pool = ContentPool::builtin();
        let now = Instant::now();
        let mut builder = DeckBuilder::with_rng(&pool, StdRng::seed_from_u64(5));
        let mut state = AppState::new(&Config::default(), &mut builder, now);
        let theme = Theme::default();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| draw(frame, &mut state, &theme, now)).unwrap();

        // Wrapping deck: every button is live
        let actions: Vec<_> = state.buttons.iter().map(|b| b.action).collect();
        assert_eq!(actions, vec![Action::Prev, Action::Flip, Action::Next, Action::Pronounce]);

        // A press in the middle of the screen lands on the card
        assert_eq!(state.pointer_down(40, 11), None);
        assert_eq!(state.browse.motion().phase(), Phase::Dragging);
    }

    #[test]
    fn help_overlay_lists_keys() {
        let pool = ContentPool::builtin();
        let now = Instant::now();
        let mut builder = DeckBuilder::with_rng(&pool, StdRng::seed_from_u64(5));
        let mut state = AppState::new(&Config::default(), &mut builder, now);
        state.show_help = true;

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, &mut state, &Theme::default(), now)).unwrap();

        let text: String =
            terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Flip the card"));
    }
}
