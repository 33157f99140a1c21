// Per-session state shared by the handlers
use crate::charts::ChartRegistry;
use crate::model::StockList;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct CachedStockList {
    pub stocks: StockList,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Session {
    /// Fetched at most once per session.
    pub stock_list: Option<CachedStockList>,
    pub charts: ChartRegistry,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_stock_list(&mut self, stocks: StockList) -> &CachedStockList {
        self.stock_list.insert(CachedStockList {
            stocks,
            fetched_at: Utc::now(),
        })
    }
}
