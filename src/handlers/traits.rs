use crate::handlers::{Context, FormSnapshot, HandlerError};
use crate::page::Region;

#[async_trait::async_trait]
pub trait Handler: Send + Sync {
    /// Region the handler's output is written to.
    fn region(&self) -> Region;

    /// Checked before anything is shown or sent; the error is the alert text.
    fn validate(&self, _form: &FormSnapshot) -> Result<(), String> {
        Ok(())
    }

    async fn handle(&self, ctx: &mut Context<'_>, form: &FormSnapshot) -> Result<String, HandlerError>;
}
