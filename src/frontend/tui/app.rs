use super::countdown::CountdownPanel;
use super::notice::NoticePanel;
use crate::config::UiConfig;
use crate::core::AppCore;
use crate::frontend::{Frontend, FrontendEvent};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

const FOOTER: &str = "q / Esc to quit";

/// TUI Frontend using ratatui
///
/// Renders the page using ratatui and handles events via crossterm.
pub struct TuiFrontend {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    poll_timeout: Duration,
    ui: UiConfig,
    restored: bool,
}

impl TuiFrontend {
    /// Create a new TUI frontend
    ///
    /// Initializes terminal in raw mode and enters the alternate screen.
    pub fn new(ui: UiConfig) -> Result<Self> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor()?;

        Ok(Self {
            terminal,
            poll_timeout: Duration::from_millis(ui.poll_timeout_ms.max(1)),
            ui,
            restored: false,
        })
    }

    /// Set poll timeout (for controlling frame rate)
    pub fn set_poll_timeout(&mut self, timeout: Duration) {
        self.poll_timeout = timeout;
    }

    /// Convert crossterm event to FrontendEvent
    fn convert_event(event: Event) -> Option<FrontendEvent> {
        match event {
            Event::Key(key_event) => {
                // Only process key press events (ignore repeats and releases)
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                Some(FrontendEvent::key(key_event.code, key_event.modifiers))
            }
            Event::Resize(w, h) => Some(FrontendEvent::resize(w, h)),
            _ => None,
        }
    }
}

/// Lay out and draw every element present on the page
pub fn draw_page(f: &mut Frame, app: &AppCore, ui: &UiConfig) {
    let area = f.area();
    if area.height == 0 {
        return;
    }

    let countdown_height = if app.countdown_text().is_some() {
        CountdownPanel::height(ui)
    } else {
        0
    };

    let [countdown_area, notice_area, footer_area] = Layout::vertical([
        Constraint::Length(countdown_height),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    if let Some(text) = app.countdown_text() {
        let panel = CountdownPanel::new(&app.config.elements.countdown_id, text, ui);
        f.render_widget(panel, countdown_area);
    }

    if let Some(markup) = app.notice_markup() {
        let panel = NoticePanel::new(&app.config.elements.notice_id, markup, ui);
        f.render_widget(panel, notice_area);
    }

    draw_footer(f, footer_area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(FOOTER))
        .style(Style::default().add_modifier(Modifier::DIM));
    f.render_widget(footer, area);
}

impl Frontend for TuiFrontend {
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>> {
        let mut events = Vec::new();

        // Poll events with timeout
        while event::poll(self.poll_timeout)? {
            if let Ok(ev) = event::read() {
                if let Some(frontend_event) = Self::convert_event(ev) {
                    events.push(frontend_event);
                }
            }
        }

        Ok(events)
    }

    fn render(&mut self, app: &AppCore) -> Result<()> {
        let ui = &self.ui;
        self.terminal.draw(|f| draw_page(f, app, ui))?;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        // Restore terminal
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        self.restored = true;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        let size = self.terminal.size().unwrap_or_default();
        (size.width, size.height)
    }
}

impl Drop for TuiFrontend {
    fn drop(&mut self) {
        // Ensure terminal is restored even if cleanup() wasn't called
        let _ = self.cleanup();
    }
}
