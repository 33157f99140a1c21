// Markdown -> HTML rendering with styled tables
use pulldown_cmark::{html, Event, Options, Parser};

pub struct MarkdownRenderer {
    table_open: Option<String>,
    soft_breaks_as_br: bool,
}

impl MarkdownRenderer {
    pub fn new<S: AsRef<str>>(table_classes: &[S]) -> Self {
        let classes = table_classes
            .iter()
            .map(|c| c.as_ref().trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let table_open = (!classes.is_empty()).then(|| format!("<table class=\"{classes}\">"));
        Self {
            table_open,
            soft_breaks_as_br: false,
        }
    }

    /// Renders single newlines inside paragraphs as `<br />`.
    pub fn with_soft_breaks_as_br(mut self) -> Self {
        self.soft_breaks_as_br = true;
        self
    }

    pub fn render(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let events = Parser::new_ext(markdown, options).map(|event| match event {
            Event::SoftBreak if self.soft_breaks_as_br => Event::HardBreak,
            other => other,
        });

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events);

        match &self.table_open {
            Some(open) => out.replace("<table>", open),
            None => out,
        }
    }
}
