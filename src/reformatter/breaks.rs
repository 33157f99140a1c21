// Collapses runs of three or more line breaks down to two
use crate::reformatter::span::Span;
use crate::reformatter::traits::Pass;

pub struct CollapseBreaksPass;

impl Pass for CollapseBreaksPass {
    fn name(&self) -> &'static str {
        "collapse-breaks"
    }

    fn apply(&self, spans: Vec<Span>) -> Vec<Span> {
        let mut out = Vec::with_capacity(spans.len());
        let mut i = 0;

        while i < spans.len() {
            if !spans[i].is_break() {
                out.push(spans[i].clone());
                i += 1;
                continue;
            }

            let end = run_end(&spans, i);
            let run = &spans[i..end];
            if run.iter().filter(|s| s.is_break()).count() >= 3 {
                out.extend(run.iter().filter(|s| s.is_break()).take(2).cloned());
            } else {
                out.extend(run.iter().cloned());
            }
            i = end;
        }

        out
    }
}

/// Index just past the last break of the run starting at `start`.
/// Whitespace-only text between breaks belongs to the run.
fn run_end(spans: &[Span], start: usize) -> usize {
    let mut end = start + 1;
    let mut j = start + 1;
    while let Some(span) = spans.get(j) {
        match span {
            Span::Break(_) => {
                j += 1;
                end = j;
            }
            Span::Text(text) if text.trim().is_empty() => j += 1,
            _ => break,
        }
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reformatter::span::{render, tokenize};

    fn collapse(html: &str) -> String {
        render(&CollapseBreaksPass.apply(tokenize(html)))
    }

    #[test]
    fn three_or_more_breaks_become_two() {
        assert_eq!(collapse("a<br><br><br>b"), "a<br><br>b");
        assert_eq!(collapse("a<br>\n<br> <br/>\n<br>b"), "a<br><br>b");
    }

    #[test]
    fn two_breaks_are_untouched() {
        assert_eq!(collapse("a<br>\n<br>b"), "a<br>\n<br>b");
    }

    #[test]
    fn trailing_whitespace_after_a_run_is_kept() {
        assert_eq!(collapse("<br><br><br> x"), "<br><br> x");
    }
}
