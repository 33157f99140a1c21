use crate::reformatter::span::Span;

/// One step of the reformatter pipeline.
///
/// A pass only ever replaces spans it recognizes; everything else must be
/// handed back unchanged and in order.
pub trait Pass: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, spans: Vec<Span>) -> Vec<Span>;
}
