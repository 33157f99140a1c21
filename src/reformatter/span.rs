// Span representation of a rendered HTML block.
//
// `tokenize` splits markup into spans without parsing it as a tree, and
// `render` writes spans back out; for spans the passes never touched the
// round trip is byte-for-byte.
use crate::model::ProductMention;

pub const CARD_CLASS: &str = "product-item";
pub const TITLE_CLASS: &str = "product-title";
pub const PRICE_CLASS: &str = "product-price";
pub const DETAILS_CLASS: &str = "product-details";
pub const FEATURE_CLASS: &str = "product-feature";

/// Elements carrying one of these classes were produced by an earlier run.
const PROTECTED_CLASSES: [&str; 2] = [CARD_CLASS, FEATURE_CLASS];

#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    /// Character data between two pieces of markup.
    Text(String),
    /// A `<br>` marker in any of its spellings.
    Break(String),
    /// Any other markup, kept verbatim.
    Tag(String),
    /// A whole element written by an earlier reformat, kept verbatim.
    Protected(String),
    Link(String),
    Card(Card),
    Feature(String),
}

impl Span {
    pub fn is_break(&self) -> bool {
        matches!(self, Span::Break(_))
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Span::Text(raw) | Span::Break(raw) | Span::Tag(raw) | Span::Protected(raw) => {
                out.push_str(raw)
            }
            Span::Link(url) => out.push_str(&format!(
                r#"<a href="{url}" target="_blank" rel="noopener noreferrer">{url}</a>"#
            )),
            Span::Card(card) => card.write_to(out),
            Span::Feature(text) => write_feature(text, out),
        }
    }
}

/// A recognized product mention plus whatever followed it on the same line.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub mention: ProductMention,
    pub tail: Vec<CardPart>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardPart {
    Text(String),
    Feature(String),
}

impl Card {
    pub fn new(mention: ProductMention) -> Self {
        Self { mention, tail: Vec::new() }
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(&format!("<div class=\"{CARD_CLASS}\">\n"));
        out.push_str(&format!(
            "<div class=\"{TITLE_CLASS}\">{}</div>\n",
            self.mention.name
        ));
        out.push_str(&format!(
            "<div class=\"{PRICE_CLASS}\">{}</div>\n",
            self.mention.price()
        ));
        if !self.tail.is_empty() {
            out.push_str(&format!("<div class=\"{DETAILS_CLASS}\">"));
            for part in &self.tail {
                match part {
                    CardPart::Text(text) => out.push_str(text),
                    CardPart::Feature(text) => write_feature(text, out),
                }
            }
            out.push_str("</div>\n");
        }
        out.push_str("</div>");
    }
}

fn write_feature(text: &str, out: &mut String) {
    out.push_str(&format!("<div class=\"{FEATURE_CLASS}\">{text}</div>"));
}

pub fn tokenize(html: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut rest = html;

    while !rest.is_empty() {
        let Some(open) = rest.find('<') else {
            spans.push(Span::Text(rest.to_string()));
            break;
        };
        if open > 0 {
            spans.push(Span::Text(rest[..open].to_string()));
            rest = &rest[open..];
            continue;
        }

        // An unterminated tag runs to the end of the input.
        let tag_end = rest.find('>').map_or(rest.len(), |i| i + 1);
        let tag = &rest[..tag_end];
        let consumed = if let Some(name) = protected_element(tag) {
            let end = element_end(rest, tag_end, name);
            spans.push(Span::Protected(rest[..end].to_string()));
            end
        } else if is_line_break(tag) {
            spans.push(Span::Break(tag.to_string()));
            tag_end
        } else {
            spans.push(Span::Tag(tag.to_string()));
            tag_end
        };
        rest = &rest[consumed..];
    }

    spans
}

pub fn render(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        span.write_to(&mut out);
    }
    out
}

pub fn is_line_break(tag: &str) -> bool {
    let inner = tag
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_end_matches('/')
        .trim();
    inner.eq_ignore_ascii_case("br")
}

/// Returns whether the tag is a closing tag, and its element name.
pub fn tag_name(tag: &str) -> Option<(bool, &str)> {
    let inner = tag.strip_prefix('<')?;
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let len = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    (len > 0).then(|| (closing, &inner[..len]))
}

fn protected_element(tag: &str) -> Option<&str> {
    let (closing, name) = tag_name(tag)?;
    if closing {
        return None;
    }
    let class = class_attribute(tag)?;
    class
        .split_whitespace()
        .any(|c| PROTECTED_CLASSES.contains(&c))
        .then_some(name)
}

fn class_attribute(tag: &str) -> Option<&str> {
    let start = tag.find("class=")? + "class=".len();
    let rest = &tag[start..];
    match rest.chars().next()? {
        quote @ ('"' | '\'') => {
            let body = &rest[1..];
            body.find(quote).map(|end| &body[..end])
        }
        _ => {
            let end = rest
                .find(|c: char| c.is_whitespace() || c == '>')
                .unwrap_or(rest.len());
            Some(&rest[..end])
        }
    }
}

/// Byte offset just past the tag that closes the element opened at the
/// start of `html`. Unbalanced elements extend to the end of the input.
fn element_end(html: &str, from: usize, name: &str) -> usize {
    let mut depth = 1usize;
    let mut pos = from;

    while let Some(offset) = html[pos..].find('<') {
        let at = pos + offset;
        let tag_end = html[at..].find('>').map_or(html.len(), |i| at + i + 1);
        if let Some((closing, tag)) = tag_name(&html[at..tag_end]) {
            if tag.eq_ignore_ascii_case(name) {
                if closing {
                    depth -= 1;
                    if depth == 0 {
                        return tag_end;
                    }
                } else {
                    depth += 1;
                }
            }
        }
        pos = tag_end;
    }

    html.len()
}
