//! Application state and event handling

pub mod input;
pub mod state;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::deck::{ContentPool, DeckBuilder, Filter};
use crate::speech::{PlayOutcome, Speaker};
use crate::theme::Theme;
use crate::ui;
use input::{Action, key_to_action};
use state::{AppState, Effect};

/// Frame budget for the event poll
const FRAME: Duration = Duration::from_millis(16);

/// The main application
pub struct App {
    /// Application configuration
    config: Config,

    /// Items decks are built from
    pool: ContentPool,

    /// Current application state
    state: AppState,

    theme: Theme,

    /// Pronunciation adapter; `None` if the audio config is unusable
    speaker: Option<Arc<Speaker>>,

    /// Outcomes from background pronunciation tasks, tagged with the
    /// request's ticket
    speech_tx: mpsc::Sender<(u64, PlayOutcome)>,
    speech_rx: mpsc::Receiver<(u64, PlayOutcome)>,

    /// Cancels in-flight pronunciation on exit
    cancel_token: CancellationToken,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config, pool: ContentPool) -> Result<Self> {
        let mut state = {
            let mut builder = DeckBuilder::new(&pool);
            AppState::new(&config, &mut builder, Instant::now())
        };

        let speaker = if config.audio.enabled {
            match Speaker::from_config(&config.audio) {
                Ok(speaker) => Some(Arc::new(speaker)),
                Err(e) => {
                    tracing::warn!(error = %e, "audio disabled");
                    state.audio_enabled = false;
                    None
                }
            }
        } else {
            None
        };

        let (speech_tx, speech_rx) = mpsc::channel(8);
        let theme = config.active_theme();
        let terminal = Self::setup_terminal()?;

        Ok(Self {
            config,
            pool,
            state,
            theme,
            speaker,
            speech_tx,
            speech_rx,
            cancel_token: CancellationToken::new(),
            terminal,
        })
    }

    /// Open straight into a new practice session
    pub fn start_practice(&mut self, filter: Filter) {
        let mut builder = DeckBuilder::new(&self.pool);
        self.state.practice_filter = filter;
        self.state.start_practice(&mut builder);
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        tracing::info!(cards = self.state.browse.total(), "session started");

        loop {
            // Handle events
            if event::poll(FRAME)? {
                let quit = match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => false,
                };
                if quit {
                    break;
                }
            }

            // Update animations
            let now = Instant::now();
            self.state.tick(now);

            // Draw UI
            let theme = &self.theme;
            let state = &mut self.state;
            self.terminal.draw(|frame| ui::draw(frame, state, theme, now))?;
            self.state.frame_rendered();

            while let Ok((ticket, outcome)) = self.speech_rx.try_recv() {
                tracing::debug!(ticket, ?outcome, "pronunciation finished");
                self.state.speech_finished(ticket, outcome);
            }
        }

        self.cancel_token.cancel();
        self.restore_terminal()?;
        tracing::info!("session ended");
        Ok(())
    }

    /// Handle a key press, returns true if should exit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key_to_action(key.code, key.modifiers, self.config.vim_mode) {
            Some(action) => self.dispatch(action),
            None => false,
        }
    }

    /// Handle a mouse event, returns true if should exit
    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(action) = self.state.pointer_down(column, row) {
                    return self.dispatch(action);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => self.state.pointer_drag(column, row),
            MouseEventKind::Up(MouseButton::Left) => {
                self.state.pointer_up(column, row, Instant::now());
            }
            _ => {}
        }
        false
    }

    /// Apply an action and carry out its effect, returns true if should exit
    fn dispatch(&mut self, action: Action) -> bool {
        let effect = {
            let mut builder = DeckBuilder::new(&self.pool);
            self.state.apply(action, &mut builder, Instant::now())
        };
        match effect {
            Effect::None => false,
            Effect::Quit => true,
            Effect::Pronounce { text, ticket } => {
                self.spawn_pronounce(text, ticket);
                false
            }
        }
    }

    /// Play in the background; the outcome comes back through the channel
    fn spawn_pronounce(&mut self, text: String, ticket: u64) {
        let Some(speaker) = self.speaker.as_ref().map(Arc::clone) else {
            self.state.speech_finished(ticket, PlayOutcome::Failed);
            return;
        };
        let tx = self.speech_tx.clone();
        let cancel_token = self.cancel_token.clone();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = cancel_token.cancelled() => PlayOutcome::Cancelled,
                outcome = speaker.play(&text) => outcome,
            };
            // Receiver gone means the app has exited
            let _ = tx.send((ticket, outcome)).await;
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}
