//! Notice panel: the notice markup rendered as styled, wrapped text.

use super::{border_type, parse_color};
use crate::config::UiConfig;
use crate::frontend::markup::{parse_markup, MarkupSpan};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct NoticePanel<'a> {
    title: &'a str,
    markup: &'a str,
    ui: &'a UiConfig,
}

impl<'a> NoticePanel<'a> {
    pub fn new(title: &'a str, markup: &'a str, ui: &'a UiConfig) -> Self {
        Self { title, markup, ui }
    }

    fn span_style(&self, span: &MarkupSpan) -> Style {
        let mut style = Style::default().fg(parse_color(&self.ui.text_color));
        if span.bold {
            style = style
                .fg(parse_color(&self.ui.highlight_color))
                .add_modifier(Modifier::BOLD);
        }
        if span.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        style
    }

    fn lines(&self) -> Vec<Line<'static>> {
        parse_markup(self.markup)
            .into_iter()
            .map(|spans| {
                Line::from(
                    spans
                        .iter()
                        .map(|s| Span::styled(s.text.clone(), self.span_style(s)))
                        .collect::<Vec<_>>(),
                )
            })
            .collect()
    }
}

impl Widget for NoticePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 1 {
            return;
        }

        let mut paragraph = Paragraph::new(self.lines()).wrap(Wrap { trim: true });

        if self.ui.show_border {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(border_type(&self.ui.border_style))
                .border_style(Style::default().fg(parse_color(&self.ui.text_color)))
                .title(self.title);
            paragraph = paragraph.block(block);
        }

        paragraph.render(area, buf);
    }
}
