//! Countdown panel: the countdown element's text centered in an optional
//! bordered block titled with the element id.

use super::{border_type, parse_color};
use crate::config::UiConfig;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct CountdownPanel<'a> {
    title: &'a str,
    text: &'a str,
    ui: &'a UiConfig,
}

impl<'a> CountdownPanel<'a> {
    pub fn new(title: &'a str, text: &'a str, ui: &'a UiConfig) -> Self {
        Self { title, text, ui }
    }

    /// Rows needed to show the panel
    pub fn height(ui: &UiConfig) -> u16 {
        if ui.show_border {
            3
        } else {
            1
        }
    }
}

impl Widget for CountdownPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 1 {
            return;
        }

        let text_color = parse_color(&self.ui.text_color);
        let mut paragraph = Paragraph::new(self.text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(text_color).add_modifier(Modifier::BOLD));

        if self.ui.show_border {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(border_type(&self.ui.border_style))
                .border_style(Style::default().fg(text_color))
                .title(self.title);
            paragraph = paragraph.block(block);
        }

        paragraph.render(area, buf);
    }
}
