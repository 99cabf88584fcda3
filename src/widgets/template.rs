//! `{field}` placeholder templates shared by the countdown and the notice.

use regex::Regex;
use std::sync::OnceLock;

/// Placeholder pattern, `None` if it failed to compile (templates then render as literals)
fn placeholder_regex() -> Option<&'static Regex> {
    static PLACEHOLDER: OnceLock<Option<Regex>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| match Regex::new(r"\{([a-z]+)\}") {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!("Placeholder pattern failed to compile: {}", e);
                None
            }
        })
        .as_ref()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A template split once into literal runs and named fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        let Some(pattern) = placeholder_regex() else {
            return Self::literal(source);
        };

        for caps in pattern.captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(source[last..whole.start()].to_string()));
            }
            segments.push(Segment::Field(name.as_str().to_string()));
            last = whole.end();
        }

        if last < source.len() {
            segments.push(Segment::Literal(source[last..].to_string()));
        }

        Self {
            source: source.to_string(),
            segments,
        }
    }

    /// The whole source as one literal run, no fields
    fn literal(source: &str) -> Self {
        let segments = if source.is_empty() {
            Vec::new()
        } else {
            vec![Segment::Literal(source.to_string())]
        };
        Self {
            source: source.to_string(),
            segments,
        }
    }

    /// Field names in order of appearance (duplicates included)
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Fields not in `known`, deduplicated, in order of first appearance
    pub fn unknown_fields(&self, known: &[&str]) -> Vec<String> {
        let mut unknown: Vec<String> = Vec::new();
        for field in self.fields() {
            if !known.contains(&field) && !unknown.iter().any(|u| u == field) {
                unknown.push(field.to_string());
            }
        }
        unknown
    }

    /// Substitute fields. Anything `lookup` doesn't know stays as `{name}`.
    pub fn render<F>(&self, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                },
            }
        }
        out
    }
}
