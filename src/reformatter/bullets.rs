// Bullet lines between line breaks become feature fragments
use crate::reformatter::span::{tag_name, Span};
use crate::reformatter::traits::Pass;

const BULLET_GLYPHS: [char; 3] = ['-', '•', '*'];

/// Closing tags that end a bullet line as a break does.
const LINE_CLOSERS: [&str; 10] = ["p", "li", "div", "td", "h1", "h2", "h3", "h4", "h5", "h6"];

pub struct BulletPass;

impl Pass for BulletPass {
    fn name(&self) -> &'static str {
        "bullets"
    }

    fn apply(&self, spans: Vec<Span>) -> Vec<Span> {
        let mut out = Vec::with_capacity(spans.len());
        let mut i = 0;

        while i < spans.len() {
            if let (Span::Break(_), Some(Span::Text(text))) = (&spans[i], spans.get(i + 1)) {
                // The closing break is left in place so it can open the next bullet.
                let closed = spans.get(i + 2).is_none_or(ends_line);
                if let Some(feature) = bullet_text(text).filter(|_| closed) {
                    out.push(Span::Feature(feature.to_string()));
                    i += 2;
                    continue;
                }
            }
            out.push(spans[i].clone());
            i += 1;
        }

        out
    }
}

fn ends_line(span: &Span) -> bool {
    match span {
        Span::Break(_) => true,
        Span::Tag(tag) => matches!(
            tag_name(tag),
            Some((true, name)) if LINE_CLOSERS.iter().any(|c| c.eq_ignore_ascii_case(name))
        ),
        _ => false,
    }
}

fn bullet_text(text: &str) -> Option<&str> {
    let feature = text.trim_start().strip_prefix(BULLET_GLYPHS)?.trim();
    (!feature.is_empty()).then_some(feature)
}
