// Recommendation reformatter: rewrites recognized product mentions and
// feature phrases in rendered recommendation HTML into styled fragments.

pub mod breaks;
pub mod bullets;
pub mod keywords;
pub mod links;
pub mod price;
pub mod span;
pub mod traits;

use breaks::CollapseBreaksPass;
use bullets::BulletPass;
use keywords::CardKeywordPass;
use links::LinkifyPass;
use price::PriceCardPass;
use span::{render, tokenize};
use tracing::debug;
pub use traits::Pass;

pub struct Reformatter {
    passes: Vec<Box<dyn Pass>>,
}

impl Reformatter {
    pub fn new(passes: Vec<Box<dyn Pass>>) -> Self {
        Self { passes }
    }

    /// The standard pipeline. Order matters: links, price cards, bullets,
    /// break collapsing, then keywords inside the cards.
    pub fn with_keywords<S: AsRef<str>>(keywords: &[S]) -> Result<Self, regex::Error> {
        Ok(Self::new(vec![
            Box::new(LinkifyPass),
            Box::new(PriceCardPass),
            Box::new(BulletPass),
            Box::new(CollapseBreaksPass),
            Box::new(CardKeywordPass::new(keywords)?),
        ]))
    }

    pub fn reformat(&self, html: &str) -> String {
        let mut spans = tokenize(html);
        for pass in &self.passes {
            spans = pass.apply(spans);
            debug!(pass = pass.name(), spans = spans.len(), "reformatter pass applied");
        }
        render(&spans)
    }
}
