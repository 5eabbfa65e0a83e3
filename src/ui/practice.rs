//! Practice screen: setup, the running session and results

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::card::{self, CardFace};
use super::layout::ButtonSpec;
use crate::app::input::Action;
use crate::app::state::AppState;
use crate::deck::Filter;
use crate::practice::{PracticeSession, SessionState};
use crate::theme::Theme;

/// Most answer markers shown on the results screen
const MAX_MARKERS: usize = 30;

pub fn draw(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme, now: Instant) {
    let [progress_area, card_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(area);
    state.practice.attach(card::rest_rect(card_area));

    match state.practice.session().state() {
        SessionState::NotStarted => draw_setup(frame, card_area, state.practice_filter, theme),
        SessionState::InProgress => {
            draw_progress(frame, progress_area, state.practice.session(), theme);

            let visual = state.practice.visual();
            let shown = state.practice_tween.sample(&visual, now);
            let session = state.practice.session();
            let face = CardFace {
                item: session.current_item(),
                flipped: session.is_flipped(),
                position: (session.index() + 1, session.total()),
            };
            card::draw(frame, card_area, &face, shown, visual.rotation, state.units_per_column, theme);
        }
        SessionState::Finished => draw_results(frame, area, state.practice.session(), theme),
    }
}

/// Buttons for the current session state
pub fn button_specs(state: &AppState) -> Vec<ButtonSpec> {
    let session = state.practice.session();
    let resting = state.practice.motion().is_resting();
    match session.state() {
        SessionState::NotStarted => vec![
            ButtonSpec::new("Start", Action::NewSession, true),
            ButtonSpec::new("Filter", Action::CycleFilter, true),
        ],
        SessionState::InProgress => vec![
            ButtonSpec::new("✗ Missed it", Action::Incorrect, resting),
            ButtonSpec::new("Flip", Action::Flip, true),
            ButtonSpec::new("✓ Knew it", Action::Correct, resting),
            ButtonSpec::new("♪ Say", Action::Pronounce, state.audio_enabled && !state.speech.is_busy()),
        ],
        SessionState::Finished => vec![
            ButtonSpec::new("Retry missed", Action::RetryMissed, session.stats().incorrect > 0),
            ButtonSpec::new("New session", Action::NewSession, true),
            ButtonSpec::new("Filter", Action::CycleFilter, true),
        ],
    }
}

pub fn hints(session: &PracticeSession) -> &'static str {
    match session.state() {
        SessionState::NotStarted => "[Enter] start  [f] filter  [Tab] browse  [?] help",
        SessionState::InProgress => "[→/y] knew it  [←/n] missed  [Space] flip  [p] say  [0] end",
        SessionState::Finished => "[r] retry missed  [Enter] new session  [Tab] browse  [q] quit",
    }
}

fn draw_setup(frame: &mut Frame, area: Rect, filter: Filter, theme: &Theme) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Practice",
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Filter: ", Style::default().fg(theme.fg_muted)),
            Span::styled(filter.to_string(), Style::default().fg(theme.fg_primary)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Swipe right if you knew it, left if you didn't",
            Style::default().fg(theme.fg_muted),
        )),
    ];
    card::draw_empty(frame, area, lines, theme);
}

fn draw_progress(frame: &mut Frame, area: Rect, session: &PracticeSession, theme: &Theme) {
    let stats = session.stats();
    let line = Line::from(vec![
        Span::styled(
            format!("Card {} of {}", session.index() + 1, session.total()),
            Style::default().fg(theme.fg_secondary),
        ),
        Span::raw("    "),
        Span::styled(format!("\u{2713} {}", stats.correct), Style::default().fg(theme.success)),
        Span::raw("  "),
        Span::styled(format!("\u{2717} {}", stats.incorrect), Style::default().fg(theme.error)),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// Draw results screen
fn draw_results(frame: &mut Frame, area: Rect, session: &PracticeSession, theme: &Theme) {
    let stats = session.stats();
    let percentage = session.percentage();

    let score_color = if percentage >= 80 {
        theme.success
    } else if percentage >= 50 {
        theme.warning
    } else {
        theme.error
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Session complete",
            Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}/{} correct ({}%)", stats.correct, session.total(), percentage),
            Style::default().fg(score_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    // One marker per answered card, in order
    let markers: Vec<Span> = stats
        .seen
        .iter()
        .take(MAX_MARKERS)
        .map(|seen| {
            if seen.was_correct {
                Span::styled("\u{2713} ", Style::default().fg(theme.success))
            } else {
                Span::styled("\u{2717} ", Style::default().fg(theme.error))
            }
        })
        .collect();
    lines.push(Line::from(markers));
    lines.push(Line::from(""));

    let missed = session.missed_items();
    if missed.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing missed!",
            Style::default().fg(theme.success),
        )));
    } else {
        lines.push(Line::from(Span::styled("Missed", Style::default().fg(theme.fg_muted))));
        for item in &missed {
            lines.push(Line::from(vec![
                Span::styled(
                    item.front.clone(),
                    Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(item.back.clone(), Style::default().fg(theme.fg_secondary)),
            ]));
        }
    }

    let para = Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true });
    frame.render_widget(para, area);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::config::Config;
    use crate::deck::{ContentPool, DeckBuilder};

    fn render(state: &mut AppState, now: Instant) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|frame| {
                let area = frame.area();
                draw(frame, area, state, &theme, now);
            })
            .unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn setup_shows_filter() {
        let pool = ContentPool::builtin();
        let now = Instant::now();
        let mut builder = DeckBuilder::with_rng(&pool, StdRng::seed_from_u64(1));
        let mut state = AppState::new(&Config::default(), &mut builder, now);

        let text = render(&mut state, now);
        assert!(text.contains("Filter: all"));
        assert_eq!(button_specs(&state)[0].action, Action::NewSession);
    }

    #[test]
    fn results_list_missed_cards() {
        let pool = ContentPool::builtin();
        let mut now = Instant::now();
        let mut builder = DeckBuilder::with_rng(&pool, StdRng::seed_from_u64(1));
        let mut state = AppState::new(&Config::default(), &mut builder, now);
        state.practice_filter = Filter::Vowels;
        state.start_practice(&mut builder);

        for i in 0..5 {
            let action = if i == 0 { Action::Incorrect } else { Action::Correct };
            state.apply(action, &mut builder, now);
            now += Duration::from_millis(200);
            state.tick(now);
            state.frame_rendered();
            state.frame_rendered();
        }

        let missed = state.practice.session().missed_items();
        let text = render(&mut state, now);
        assert!(text.contains("4/5 correct (80%)"));
        assert!(text.contains(&missed[0].back));
        assert!(button_specs(&state)[0].enabled);
    }
}
