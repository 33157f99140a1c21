// Wraps feature clauses found inside product card tails
use crate::reformatter::span::{CardPart, Span};
use crate::reformatter::traits::Pass;
use regex::Regex;

pub const DEFAULT_FEATURE_KEYWORDS: [&str; 23] = [
    "camera",
    "battery",
    "display",
    "screen",
    "storage",
    "memory",
    "ram",
    "processor",
    "cpu",
    "gpu",
    "resolution",
    "wireless",
    "bluetooth",
    "warranty",
    "weight",
    "lightweight",
    "portable",
    "fast",
    "charging",
    "eco-friendly",
    "popular",
    "high-quality",
    "discounted",
];

pub struct CardKeywordPass {
    /// `None` when the vocabulary is empty.
    pattern: Option<Regex>,
}

impl CardKeywordPass {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, regex::Error> {
        let mut words: Vec<&str> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .collect();
        if words.is_empty() {
            return Ok(Self { pattern: None });
        }
        words.sort_by_key(|w| std::cmp::Reverse(w.len()));

        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))?;
        Ok(Self { pattern: Some(pattern) })
    }

    fn wrap_clauses(&self, pattern: &Regex, tail: Vec<CardPart>) -> Vec<CardPart> {
        let mut out = Vec::with_capacity(tail.len());
        for part in tail {
            match part {
                CardPart::Text(text) => split_clauses(pattern, &text, &mut out),
                // Already wrapped, never rescanned.
                feature @ CardPart::Feature(_) => out.push(feature),
            }
        }
        out
    }
}

impl Pass for CardKeywordPass {
    fn name(&self) -> &'static str {
        "card-keywords"
    }

    fn apply(&self, spans: Vec<Span>) -> Vec<Span> {
        let Some(pattern) = &self.pattern else {
            return spans;
        };
        spans
            .into_iter()
            .map(|span| match span {
                Span::Card(mut card) => {
                    card.tail = self.wrap_clauses(pattern, std::mem::take(&mut card.tail));
                    Span::Card(card)
                }
                other => other,
            })
            .collect()
    }
}

/// A clause runs from the keyword to the next full stop or the end of the text.
fn split_clauses(pattern: &Regex, text: &str, out: &mut Vec<CardPart>) {
    let mut cursor = 0;
    while let Some(found) = pattern.find_at(text, cursor) {
        let clause_end = text[found.end()..]
            .find('.')
            .map_or(text.len(), |offset| found.end() + offset);
        let clause = text[found.start()..clause_end].trim_end();

        if found.start() > cursor {
            out.push(CardPart::Text(text[cursor..found.start()].to_string()));
        }
        out.push(CardPart::Feature(clause.to_string()));
        cursor = found.start() + clause.len();
    }
    if cursor < text.len() {
        out.push(CardPart::Text(text[cursor..].to_string()));
    }
}
