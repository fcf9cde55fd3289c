//! Application state and event loop

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, DefaultTerminal, Frame};

use crate::config::Config;
use crate::logging;
use crate::services::{
    billing_history, select_connection_view, BillingHistory, DashboardSession, FetchOutcome,
    FetchTicket,
};
use crate::sources::DataSource;
use crate::types::{DataFetchFailure, FetchedRecords, Identity};

use super::theme::Theme;
use super::widgets::{
    billing::BillingView,
    help::HelpPopup,
    overview::{Overview, OverviewData},
    spinner::{LoadingStage, Spinner},
    tabs::Tab,
};

/// Name given to background fetch threads
const FETCH_THREAD: &str = "acctdash-fetch";

/// Result of one background fetch, tagged with the ticket that started it
pub type FetchMessage = (FetchTicket, Result<FetchedRecords, DataFetchFailure>);

/// Main application
pub struct App {
    session: DashboardSession,
    billing: BillingHistory,
    current_tab: Tab,
    spinner_frame: usize,
    show_help: bool,
    should_quit: bool,
    theme: Theme,
    queued: Option<FetchTicket>,
}

impl App {
    /// Create the app. A present identity queues the first fetch.
    pub fn new(identity: Option<Identity>, theme: Theme) -> Self {
        let mut session = DashboardSession::new();
        let queued = session.set_identity(identity);

        Self {
            session,
            billing: billing_history(),
            current_tab: Tab::default(),
            spinner_frame: 0,
            show_help: false,
            should_quit: false,
            theme,
            queued,
        }
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.should_quit = true;
                    }
                    KeyCode::Tab => {
                        self.current_tab = self.current_tab.next();
                    }
                    KeyCode::BackTab => {
                        self.current_tab = self.current_tab.prev();
                    }
                    KeyCode::Char(c @ '1'..='2') => {
                        if let Some(tab) = Tab::from_number(c as u8 - b'0') {
                            self.current_tab = tab;
                        }
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        self.request_refresh();
                    }
                    KeyCode::Char('?') => {
                        self.show_help = !self.show_help;
                    }
                    _ => {}
                }
            }
        }
    }

    /// Start a new fetch generation for the current identity
    fn request_refresh(&mut self) {
        if let Some(ticket) = self.session.begin_fetch() {
            tracing::debug!(generation = ticket.generation, "refresh requested");
            self.queued = Some(ticket);
        }
    }

    /// Take the fetch waiting to be started, if any
    pub fn take_queued_fetch(&mut self) -> Option<FetchTicket> {
        self.queued.take()
    }

    /// Apply a completed background fetch
    pub fn apply_fetch(&mut self, message: FetchMessage) -> FetchOutcome {
        let (ticket, result) = message;
        self.session.complete(&ticket, result)
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if self.session.is_loading() {
            self.spinner_frame = Spinner::next_frame(self.spinner_frame);
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn loading_stage(&self) -> LoadingStage {
        if self.session.identity().is_some() {
            LoadingStage::Fetching
        } else {
            LoadingStage::SignIn
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.current_tab {
            Tab::Overview => {
                let connections = select_connection_view(
                    self.session.connections(),
                    self.session.is_loading(),
                    Utc::now(),
                );
                let data = OverviewData {
                    summary: self.session.summary(),
                    connections: &connections,
                    loading: self.session.is_loading(),
                    stage: self.loading_stage(),
                    spinner_frame: self.spinner_frame,
                    selected_tab: self.current_tab,
                };
                Overview::new(data, self.theme).render(area, buf);
            }
            Tab::Billing => {
                BillingView::new(&self.billing, self.theme)
                    .with_tab(self.current_tab)
                    .render(area, buf);
            }
        }

        if self.show_help {
            let popup_area = HelpPopup::centered_area(area);
            HelpPopup::new(self.theme).render(popup_area, buf);
        }
    }
}

/// Run the TUI application
pub fn run(config: Config) -> anyhow::Result<()> {
    // Logs go to a file; stderr belongs to the terminal UI
    if let Ok(path) = logging::default_log_path() {
        logging::init_file(&path).ok();
    }

    let source = config.data_source()?;
    let theme = Theme::detect();
    let app = App::new(config.identity(), theme);

    tracing::info!(source = source.name(), user_id = ?config.user_id, "starting dashboard");

    let mut terminal = ratatui::init();
    keep_terminal_on_worker_panic();
    let result = run_app(&mut terminal, app, source);
    ratatui::restore();
    result
}

/// Wrap the hook installed by `ratatui::init`. A panic on a fetch worker is
/// caught and reported by `spawn_fetch`, so it must not restore the terminal
/// while the UI keeps drawing.
fn keep_terminal_on_worker_panic() {
    let restore_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if thread::current().name() == Some(FETCH_THREAD) {
            tracing::error!(panic = %info, "fetch worker panicked");
        } else {
            restore_hook(info);
        }
    }));
}

/// Run one fetch on a background thread. A panicking source reports as a
/// failed fetch so the session can still clear its loading state.
fn spawn_fetch(
    ticket: FetchTicket,
    source: Arc<dyn DataSource>,
    tx: mpsc::Sender<FetchMessage>,
) -> std::io::Result<()> {
    thread::Builder::new()
        .name(FETCH_THREAD.to_string())
        .spawn(move || {
            let result =
                panic::catch_unwind(AssertUnwindSafe(|| source.fetch_all(&ticket.identity)))
                    .unwrap_or_else(|_| {
                        Err(DataFetchFailure::new("fetch_all", "fetch worker panicked"))
                    });
            // Receiver is gone once the UI has quit
            let _ = tx.send((ticket, result));
        })?;
    Ok(())
}

fn run_app(
    terminal: &mut DefaultTerminal,
    mut app: App,
    source: Arc<dyn DataSource>,
) -> anyhow::Result<()> {
    let (fetch_tx, fetch_rx) = mpsc::channel();

    loop {
        if let Some(ticket) = app.take_queued_fetch() {
            spawn_fetch(ticket, Arc::clone(&source), fetch_tx.clone())?;
        }

        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        // Completed fetches (non-blocking); stale ones are discarded by the session
        while let Ok(message) = fetch_rx.try_recv() {
            app.apply_fetch(message);
        }

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        } else {
            app.tick();
        }
    }

    Ok(())
}
