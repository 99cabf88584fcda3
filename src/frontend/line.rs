//! Plain line frontend for pipes and dumb terminals.
//!
//! Prints the notice once as plain text, then the countdown each time it
//! changes. On a terminal the countdown line is rewritten in place.

use super::markup::markup_to_plain;
use super::{Frontend, FrontendEvent};
use crate::core::AppCore;
use anyhow::Result;
use std::io::{self, IsTerminal, Write};

pub struct LineFrontend<W: Write = io::Stdout> {
    out: W,
    /// Rewrite the countdown with '\r' instead of printing new lines
    overwrite: bool,
    last_countdown: Option<String>,
    notice_printed: bool,
}

impl LineFrontend<io::Stdout> {
    pub fn stdout() -> Self {
        let out = io::stdout();
        let overwrite = out.is_terminal();
        Self::new(out, overwrite)
    }
}

impl<W: Write> LineFrontend<W> {
    pub fn new(out: W, overwrite: bool) -> Self {
        Self {
            out,
            overwrite,
            last_countdown: None,
            notice_printed: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Frontend for LineFrontend<W> {
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>> {
        // No input handling; the caller watches for Ctrl+C
        Ok(Vec::new())
    }

    fn render(&mut self, app: &AppCore) -> Result<()> {
        if !self.notice_printed {
            if let Some(markup) = app.notice_markup() {
                writeln!(self.out, "{}", markup_to_plain(markup))?;
            }
            self.notice_printed = true;
        }

        if let Some(text) = app.countdown_text() {
            if self.last_countdown.as_deref() != Some(text) {
                if self.overwrite {
                    // Clear the rest of the line in case the text got shorter
                    write!(self.out, "\r{}\x1b[K", text)?;
                } else {
                    writeln!(self.out, "{}", text)?;
                }
                self.last_countdown = Some(text.to_string());
            }
        }

        self.out.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.overwrite && self.last_countdown.is_some() {
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        crossterm::terminal::size().unwrap_or((80, 24))
    }
}
