//! In-memory page: target elements addressed by id.
//!
//! An element that was never added is "absent", and features that write to it
//! are skipped by the caller.

/// What an element currently holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementContent {
    /// Plain text, escaped when serialized
    Text(String),
    /// Trusted markup, inserted verbatim
    Markup(String),
}

impl Default for ElementContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    id: String,
    content: ElementContent,
}

impl Element {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            content: ElementContent::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &ElementContent {
        &self.content
    }

    /// Replace content with plain text. Returns true if it changed.
    pub fn set_text(&mut self, text: String) -> bool {
        self.replace(ElementContent::Text(text))
    }

    /// Replace content with markup. Returns true if it changed.
    pub fn set_markup(&mut self, markup: String) -> bool {
        self.replace(ElementContent::Markup(markup))
    }

    fn replace(&mut self, content: ElementContent) -> bool {
        if self.content == content {
            return false;
        }
        self.content = content;
        true
    }

    /// Raw string regardless of kind
    pub fn as_str(&self) -> &str {
        match &self.content {
            ElementContent::Text(s) | ElementContent::Markup(s) => s,
        }
    }
}

/// Ordered set of elements
#[derive(Debug, Clone, Default)]
pub struct Page {
    elements: Vec<Element>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page with one empty element per id. Duplicate ids are collapsed.
    pub fn with_elements<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut page = Self::new();
        for id in ids {
            page.add(id);
        }
        page
    }

    /// Add an element unless one with that id already exists
    pub fn add(&mut self, id: &str) -> &mut Element {
        let index = match self.elements.iter().position(|e| e.id == id) {
            Some(index) => index,
            None => {
                self.elements.push(Element::new(id));
                self.elements.len() - 1
            }
        };
        &mut self.elements[index]
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Minimal standalone HTML document, one `<div>` per element
    pub fn to_html(&self, title: &str) -> String {
        let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        html.push_str("</head>\n<body>\n");
        for element in self.elements() {
            let body = match element.content() {
                ElementContent::Text(text) => escape_html(text),
                ElementContent::Markup(markup) => markup.clone(),
            };
            html.push_str(&format!(
                "<div id=\"{}\">{}</div>\n",
                escape_html(element.id()),
                body
            ));
        }
        html.push_str("</body>\n</html>\n");
        html
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
