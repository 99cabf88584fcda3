//! Minimal markup reader for terminal frontends.
//!
//! Notice templates may carry a handful of inline HTML tags. Terminals can't
//! show HTML, so the markup is flattened into lines of styled runs: `<strong>`
//! and `<b>` become bold, `<em>` and `<i>` italic, `<br>` and `<p>` break
//! lines. Unknown tags are dropped and their text kept.

/// A run of text sharing one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

pub type MarkupLine = Vec<MarkupSpan>;

#[derive(Default)]
struct SpanBuilder {
    lines: Vec<MarkupLine>,
    current_line: MarkupLine,
    text: String,
    bold_depth: usize,
    italic_depth: usize,
}

impl SpanBuilder {
    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = decode_entities(&std::mem::take(&mut self.text));
        let bold = self.bold_depth > 0;
        let italic = self.italic_depth > 0;

        // Merge with the previous run when the style didn't change
        if let Some(last) = self.current_line.last_mut() {
            if last.bold == bold && last.italic == italic {
                last.text.push_str(&text);
                return;
            }
        }
        self.current_line.push(MarkupSpan { text, bold, italic });
    }

    fn break_line(&mut self) {
        self.flush_text();
        let line = std::mem::take(&mut self.current_line);
        self.lines.push(line);
    }

    fn handle_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        let closing = tag.starts_with('/');
        let name: String = tag
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match name.as_str() {
            "strong" | "b" => {
                self.flush_text();
                if closing {
                    self.bold_depth = self.bold_depth.saturating_sub(1);
                } else {
                    self.bold_depth += 1;
                }
            }
            "em" | "i" => {
                self.flush_text();
                if closing {
                    self.italic_depth = self.italic_depth.saturating_sub(1);
                } else {
                    self.italic_depth += 1;
                }
            }
            "br" => self.break_line(),
            "p" | "div" => {
                // Block boundaries start a new line unless we're already at one
                self.flush_text();
                if !self.current_line.is_empty() {
                    self.break_line();
                }
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<MarkupLine> {
        self.flush_text();
        if !self.current_line.is_empty() || self.lines.is_empty() {
            self.lines.push(self.current_line);
        }
        self.lines
    }
}

/// Split markup into styled lines (always at least one, possibly empty)
pub fn parse_markup(markup: &str) -> Vec<MarkupLine> {
    let mut builder = SpanBuilder::default();
    let mut remaining = markup;

    while let Some(tag_start) = remaining.find('<') {
        // A tag needs '/', '!' or a letter right after '<'; anything else is text
        if !opens_tag(&remaining[tag_start + 1..]) {
            builder.text.push_str(&remaining[..=tag_start]);
            remaining = &remaining[tag_start + 1..];
            continue;
        }
        match remaining[tag_start..].find('>') {
            Some(rel_end) => {
                builder.text.push_str(&remaining[..tag_start]);
                builder.handle_tag(&remaining[tag_start + 1..tag_start + rel_end]);
                remaining = &remaining[tag_start + rel_end + 1..];
            }
            None => {
                // Unterminated '<' is plain text
                break;
            }
        }
    }
    builder.text.push_str(remaining);

    builder.finish()
}

fn opens_tag(after_lt: &str) -> bool {
    matches!(after_lt.chars().next(), Some(c) if c == '/' || c == '!' || c.is_ascii_alphabetic())
}

/// Markup flattened to plain text, lines joined with '\n'
pub fn markup_to_plain(markup: &str) -> String {
    parse_markup(markup)
        .iter()
        .map(|line| line.iter().map(|s| s.text.as_str()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp..];
        let decoded = after.find(';').and_then(|semi| {
            let replacement = match &after[1..semi] {
                "amp" => "&",
                "lt" => "<",
                "gt" => ">",
                "quot" => "\"",
                "apos" | "#39" => "'",
                "nbsp" => "\u{a0}",
                _ => return None,
            };
            Some((replacement, semi + 1))
        });
        match decoded {
            Some((replacement, consumed)) => {
                out.push_str(replacement);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = &after[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
