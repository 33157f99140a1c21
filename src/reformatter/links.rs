// Turns bare URLs in text into anchors that open in a new tab
use crate::reformatter::span::{tag_name, Span};
use crate::reformatter::traits::Pass;
use regex::Regex;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"]+"#).unwrap());

pub struct LinkifyPass;

impl Pass for LinkifyPass {
    fn name(&self) -> &'static str {
        "linkify"
    }

    fn apply(&self, spans: Vec<Span>) -> Vec<Span> {
        let mut out = Vec::with_capacity(spans.len());
        let mut in_anchor = false;

        for span in spans {
            match span {
                Span::Tag(ref tag) => {
                    if let Some((closing, name)) = tag_name(tag) {
                        if name.eq_ignore_ascii_case("a") {
                            in_anchor = !closing;
                        }
                    }
                    out.push(span);
                }
                Span::Text(text) if !in_anchor => split_links(&text, &mut out),
                other => out.push(other),
            }
        }

        out
    }
}

fn split_links(text: &str, out: &mut Vec<Span>) {
    let mut cursor = 0;
    for found in URL_RE.find_iter(text) {
        // Sentence punctuation right after a URL is not part of it.
        let url = found
            .as_str()
            .trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);
        if url.ends_with("://") {
            continue;
        }
        if found.start() > cursor {
            out.push(Span::Text(text[cursor..found.start()].to_string()));
        }
        out.push(Span::Link(url.to_string()));
        cursor = found.start() + url.len();
    }
    if cursor < text.len() {
        out.push(Span::Text(text[cursor..].to_string()));
    }
}
