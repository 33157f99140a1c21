// Plain-text rendering of region HTML for the terminal
use scraper::{ElementRef, Html, Node};

const BLOCK_ELEMENTS: [&str; 18] = [
    "p", "div", "li", "tr", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "table", "thead",
    "tbody", "section", "blockquote", "pre",
];

pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    walk(fragment.root_element(), &mut out);
    tidy(&out)
}

fn walk(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                if !text.trim().is_empty() {
                    out.push_str(text);
                } else if !text.contains('\n') {
                    out.push(' ');
                }
            }
            Node::Element(el) => {
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                match el.name() {
                    "br" => out.push('\n'),
                    "script" | "style" => {}
                    "canvas" => out.push_str("[chart]\n"),
                    name => {
                        if name == "li" {
                            out.push_str("• ");
                        }
                        walk(child_element, out);
                        if name == "td" || name == "th" {
                            out.push_str(" | ");
                        } else if BLOCK_ELEMENTS.contains(&name) {
                            out.push('\n');
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// Trims line ends and squeezes blank-line runs down to one.
fn tidy(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in raw.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            if lines.last().is_none_or(|last| last.is_empty()) {
                continue;
            }
            lines.push("");
        } else {
            lines.push(line);
        }
    }
    while lines.last() == Some(&"") {
        lines.pop();
    }
    if lines.is_empty() {
        String::new()
    } else {
        lines.join("\n") + "\n"
    }
}
