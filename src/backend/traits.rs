use crate::backend::{Endpoint, Payload};
use crate::model::{BackendReply, QueryError, StockList};

#[async_trait::async_trait]
pub trait QueryService: Send + Sync {
    /// Sends one payload to one endpoint.
    async fn query(&self, endpoint: Endpoint, payload: &Payload) -> Result<BackendReply, QueryError>;

    async fn stock_list(&self) -> Result<StockList, QueryError>;
}
