// Action handlers: validate form input, query a backend, write one page region

pub mod shop;
pub mod stock;
pub mod traits;

pub use traits::Handler;

use crate::backend::{Endpoint, QueryService};
use crate::charts::ChartRenderer;
use crate::config::AppConfig;
use crate::model::{ChartError, ConfigError, QueryError};
use crate::page::{error_banner, Page, Region};
use crate::reformatter::Reformatter;
use crate::session::Session;
use shop::{PreferencesHandler, ShopSearchHandler};
use std::collections::HashMap;
use stock::{ChartQueryHandler, MarkdownQueryHandler, StockListHandler};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ShopSearch,
    CategoryChanged,
    StockPrice,
    AnalystRecommendations,
    CompanyInfo,
    CompanyNews,
    CustomAnalysis,
    PriceTrends,
    VolumeAnalysis,
    TechnicalIndicators,
    LoadStocks,
}

/// Form controls at the moment an action fired: control name -> values.
#[derive(Debug, Clone, Default)]
pub struct FormSnapshot {
    fields: HashMap<String, Vec<String>>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value; repeated names model multi-selects.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields
            .entry(name.to_string())
            .or_default()
            .push(value.into());
        self
    }

    /// First non-blank value, trimmed.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values(name).into_iter().next()
    }

    pub fn values(&self, name: &str) -> Vec<&str> {
        self.fields
            .get(name)
            .map(|values| {
                values
                    .iter()
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Everything a handler may use besides the form.
pub struct Context<'a> {
    pub backend: &'a dyn QueryService,
    pub session: &'a mut Session,
    pub charts: &'a dyn ChartRenderer,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("Missing form field: {0}")]
    MissingField(&'static str),
}

/// How a dispatched action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rendered,
    /// The region shows an error banner.
    Failed,
    /// Input was rejected before any request was made.
    Rejected,
    Unhandled,
}

#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<Action, Box<dyn Handler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handlers for every action of both dashboards.
    pub fn standard(config: &AppConfig) -> Result<Self, ConfigError> {
        let reformatter = Reformatter::with_keywords(&config.feature_keywords)?;
        let tables = config.table_classes.as_slice();

        let mut dispatcher = Self::new();
        dispatcher.register(
            Action::ShopSearch,
            Box::new(ShopSearchHandler::new(tables, reformatter)),
        );
        dispatcher.register(Action::CategoryChanged, Box::new(PreferencesHandler));
        dispatcher.register(
            Action::StockPrice,
            Box::new(MarkdownQueryHandler::ticker(Endpoint::StockPrice, Region::StockPrice, tables)),
        );
        dispatcher.register(
            Action::AnalystRecommendations,
            Box::new(MarkdownQueryHandler::ticker(
                Endpoint::AnalystRecommendations,
                Region::AnalystRecommendations,
                tables,
            )),
        );
        dispatcher.register(
            Action::CompanyInfo,
            Box::new(MarkdownQueryHandler::ticker(Endpoint::CompanyInfo, Region::CompanyInfo, tables)),
        );
        dispatcher.register(
            Action::CompanyNews,
            Box::new(MarkdownQueryHandler::ticker(Endpoint::CompanyNews, Region::CompanyNews, tables)),
        );
        dispatcher.register(
            Action::CustomAnalysis,
            Box::new(MarkdownQueryHandler::prompt(
                Endpoint::CustomAnalysis,
                Region::CustomAnalysis,
                tables,
            )),
        );
        dispatcher.register(
            Action::PriceTrends,
            Box::new(ChartQueryHandler::new(Endpoint::PriceTrends, Region::PriceChart, "priceChart")),
        );
        dispatcher.register(
            Action::VolumeAnalysis,
            Box::new(ChartQueryHandler::new(Endpoint::VolumeAnalysis, Region::VolumeChart, "volumeChart")),
        );
        dispatcher.register(
            Action::TechnicalIndicators,
            Box::new(ChartQueryHandler::new(
                Endpoint::TechnicalIndicators,
                Region::TechnicalChart,
                "technicalChart",
            )),
        );
        dispatcher.register(Action::LoadStocks, Box::new(StockListHandler));
        Ok(dispatcher)
    }

    pub fn register(&mut self, action: Action, handler: Box<dyn Handler>) {
        self.handlers.insert(action, handler);
    }

    /// Runs one action against the page. Failures end up in the page,
    /// never in the caller.
    pub async fn dispatch(
        &self,
        action: Action,
        form: &FormSnapshot,
        ctx: &mut Context<'_>,
        page: &mut dyn Page,
    ) -> Outcome {
        let Some(handler) = self.handlers.get(&action) else {
            warn!("No handler registered for {:?}", action);
            return Outcome::Unhandled;
        };

        if let Err(message) = handler.validate(form) {
            info!("{:?} rejected: {}", action, message);
            page.alert(&message);
            return Outcome::Rejected;
        }

        let region = handler.region();
        page.set_loading(region, true);
        let outcome = match handler.handle(ctx, form).await {
            Ok(html) => {
                page.set_html(region, html);
                Outcome::Rendered
            }
            Err(e) => {
                error!("{:?} failed: {}", action, e);
                page.set_html(region, error_banner(&e.to_string()));
                Outcome::Failed
            }
        };
        page.set_loading(region, false);
        outcome
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeBackend;
    use super::*;
    use crate::charts::HtmlChartRenderer;
    use crate::model::BackendReply;
    use crate::page::BufferedPage;
    use scraper::{Html, Selector};

    async fn run(backend: &FakeBackend, action: Action, form: &FormSnapshot) -> (Outcome, BufferedPage) {
        let dispatcher = Dispatcher::standard(&AppConfig::default()).unwrap();
        let mut session = Session::new();
        let mut page = BufferedPage::new();
        let mut ctx = Context {
            backend,
            session: &mut session,
            charts: &HtmlChartRenderer,
        };
        let outcome = dispatcher.dispatch(action, form, &mut ctx, &mut page).await;
        (outcome, page)
    }

    #[test]
    fn form_values_skip_blanks() {
        let form = FormSnapshot::new()
            .with("ticker", "   ")
            .with("preferences", "popular")
            .with("preferences", "")
            .with("preferences", " warranty ");
        assert_eq!(form.value("ticker"), None);
        assert_eq!(form.values("preferences"), ["popular", "warranty"]);
        assert_eq!(form.value("missing"), None);
    }

    #[tokio::test]
    async fn failed_fetch_shows_a_banner_and_hides_loading() {
        let backend = FakeBackend::default();
        let form = FormSnapshot::new().with("ticker", "aapl");
        let (outcome, page) = run(&backend, Action::StockPrice, &form).await;

        assert_eq!(outcome, Outcome::Failed);
        assert!(!page.is_loading(Region::StockPrice));
        let html = Html::parse_fragment(page.html(Region::StockPrice).unwrap());
        let banner = Selector::parse("div.alert.alert-danger").unwrap();
        let text: String = html.select(&banner).next().unwrap().text().collect();
        assert!(text.contains("connection refused"));
    }

    #[tokio::test]
    async fn rejected_input_alerts_without_a_request() {
        let backend = FakeBackend::default();
        let (outcome, page) = run(&backend, Action::CompanyNews, &FormSnapshot::new()).await;

        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(page.alerts(), ["Please select a stock"]);
        assert!(backend.calls().is_empty());
        assert_eq!(page.html(Region::CompanyNews), None);
        assert!(!page.is_loading(Region::CompanyNews));
    }

    #[tokio::test]
    async fn markdown_reply_fills_its_region() {
        let backend = FakeBackend::replying(BackendReply::Markdown("# Company Information: Apple".into()));
        let form = FormSnapshot::new().with("ticker", " aapl ");
        let (outcome, page) = run(&backend, Action::CompanyInfo, &form).await;

        assert_eq!(outcome, Outcome::Rendered);
        assert!(page.html(Region::CompanyInfo).unwrap().contains("<h1>Company Information: Apple</h1>"));
        assert_eq!(
            backend.calls(),
            [(Endpoint::CompanyInfo, crate::backend::Payload::Ticker("AAPL".into()))]
        );
    }

    #[tokio::test]
    async fn unregistered_action_is_unhandled() {
        let dispatcher = Dispatcher::new();
        let backend = FakeBackend::default();
        let mut session = Session::new();
        let mut page = BufferedPage::new();
        let mut ctx = Context {
            backend: &backend,
            session: &mut session,
            charts: &HtmlChartRenderer,
        };
        let outcome = dispatcher
            .dispatch(Action::LoadStocks, &FormSnapshot::new(), &mut ctx, &mut page)
            .await;
        assert_eq!(outcome, Outcome::Unhandled);
    }
}
