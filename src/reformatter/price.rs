// Recognizes "name - price" mentions and turns them into product cards
use crate::model::{Currency, ProductMention};
use crate::reformatter::span::{Card, CardPart, Span};
use crate::reformatter::traits::Pass;
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<name>[^\n<>]+?)(?:\s*-\s*|\s*:\s*|\s+)(?P<currency>₹|Rs\.?|INR|\$)\s*(?P<amount>[0-9]+(?:,[0-9]+)*(?:\.[0-9]{2})?)",
    )
    .unwrap()
});

/// Characters stripped from both ends of a product name besides whitespace.
/// `;` is never among them: it closes HTML entities.
const NAME_PUNCTUATION: [char; 6] = ['-', ':', ',', '|', '•', '*'];

pub struct PriceCardPass;

impl Pass for PriceCardPass {
    fn name(&self) -> &'static str {
        "price-cards"
    }

    fn apply(&self, spans: Vec<Span>) -> Vec<Span> {
        let mut out = Vec::with_capacity(spans.len());
        for span in spans {
            match span {
                Span::Text(text) => split_cards(&text, &mut out),
                other => out.push(other),
            }
        }
        out
    }
}

/// Finds every product mention in a text span.
pub fn find_mentions(text: &str) -> Vec<(Range<usize>, ProductMention)> {
    PRICE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            mention_from(&caps).map(|mention| (whole.range(), mention))
        })
        .collect()
}

fn mention_from(caps: &Captures<'_>) -> Option<ProductMention> {
    let name = caps
        .name("name")?
        .as_str()
        .trim_matches(|c: char| c.is_whitespace() || NAME_PUNCTUATION.contains(&c));
    if name.is_empty() {
        return None;
    }
    Some(ProductMention {
        name: name.to_string(),
        currency: Currency::from_marker(caps.name("currency")?.as_str())?,
        amount: caps.name("amount")?.as_str().to_string(),
    })
}

fn split_cards(text: &str, out: &mut Vec<Span>) {
    let found = find_mentions(text);
    if found.is_empty() {
        out.push(Span::Text(text.to_string()));
        return;
    }

    let mut cursor = 0;
    for (i, (range, mention)) in found.iter().enumerate() {
        if range.start > cursor {
            out.push(Span::Text(text[cursor..range.start].to_string()));
        }

        // The rest of the line belongs to the card, up to the next mention.
        let limit = found.get(i + 1).map_or(text.len(), |(next, _)| next.start);
        let line_end = text[range.end..limit]
            .find('\n')
            .map_or(limit, |offset| range.end + offset);
        let tail = &text[range.end..line_end];

        let mut card = Card::new(mention.clone());
        if tail.trim().is_empty() {
            cursor = range.end;
        } else {
            card.tail.push(CardPart::Text(tail.to_string()));
            cursor = line_end;
        }
        out.push(Span::Card(card));
    }

    if cursor < text.len() {
        out.push(Span::Text(text[cursor..].to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mentions(text: &str) -> Vec<ProductMention> {
        find_mentions(text).into_iter().map(|(_, m)| m).collect()
    }

    #[test]
    fn recognizes_every_currency_marker() {
        let cases = [
            ("Kettle - ₹1,499", Currency::Rupee, "1,499"),
            ("Kettle: Rs 1499", Currency::Rs, "1499"),
            ("Kettle Rs.1,499.00", Currency::RsDot, "1,499.00"),
            ("Kettle - INR 1499", Currency::Inr, "1499"),
            ("Kettle $19.99", Currency::Dollar, "19.99"),
        ];
        for (text, currency, amount) in cases {
            let found = mentions(text);
            assert_eq!(found.len(), 1, "text: {text}");
            assert_eq!(found[0].name, "Kettle");
            assert_eq!(found[0].currency, currency);
            assert_eq!(found[0].amount, amount);
        }
    }

    #[test]
    fn separator_is_not_part_of_the_name() {
        let found = mentions("Wireless Mouse - $25.99");
        assert_eq!(found[0].name, "Wireless Mouse");
        assert_eq!(found[0].price(), "$25.99");
    }

    #[test]
    fn trailing_comma_stays_out_of_the_amount() {
        let found = mentions("Running Shoes - Rs.2000, lightweight");
        assert_eq!(found[0].amount, "2000");
    }

    #[test]
    fn price_without_a_name_is_ignored() {
        assert!(mentions("$25.99").is_empty());
        assert!(mentions(" - $25.99").is_empty());
    }

    #[test]
    fn entity_at_the_end_of_a_name_is_kept_whole() {
        let found = mentions("Samsung TV 55&quot; - ₹45,999");
        assert_eq!(found[0].name, "Samsung TV 55&quot;");
        assert_eq!(found[0].price(), "₹45,999");
    }

    #[test]
    fn rest_of_line_becomes_the_card_tail() {
        let out = PriceCardPass.apply(vec![Span::Text(
            "Running Shoes - Rs.2000 lightweight and durable\nnext line".into(),
        )]);
        let Span::Card(card) = &out[0] else {
            panic!("expected a card, got {:?}", out[0]);
        };
        assert_eq!(card.mention.name, "Running Shoes");
        assert_eq!(
            card.tail,
            vec![CardPart::Text(" lightweight and durable".into())]
        );
        assert_eq!(out[1], Span::Text("\nnext line".into()));
    }

    #[test]
    fn two_mentions_on_one_line_make_two_cards() {
        let out = PriceCardPass.apply(vec![Span::Text("Mouse - $10, Keyboard - $20".into())]);
        let names: Vec<_> = out
            .iter()
            .filter_map(|s| match s {
                Span::Card(card) => Some(card.mention.name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["Mouse", "Keyboard"]);
    }
}
