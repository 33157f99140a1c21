use crate::backend::{Endpoint, Payload};
use crate::handlers::{Context, FormSnapshot, Handler, HandlerError};
use crate::markdown::MarkdownRenderer;
use crate::model::StockList;
use crate::page::Region;
use crate::utils::{escape_html, normalize_ticker};
use tracing::{debug, info};

/// Which form field feeds the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Ticker,
    Prompt,
}

fn ticker_from(form: &FormSnapshot) -> Result<String, HandlerError> {
    form.value("ticker")
        .map(normalize_ticker)
        .ok_or(HandlerError::MissingField("ticker"))
}

fn require_ticker(form: &FormSnapshot) -> Result<(), String> {
    match form.value("ticker") {
        Some(_) => Ok(()),
        None => Err("Please select a stock".to_string()),
    }
}

/// Finance actions whose reply is markdown shown as-is.
pub struct MarkdownQueryHandler {
    endpoint: Endpoint,
    region: Region,
    input: Input,
    markdown: MarkdownRenderer,
}

impl MarkdownQueryHandler {
    pub fn ticker<S: AsRef<str>>(endpoint: Endpoint, region: Region, table_classes: &[S]) -> Self {
        Self {
            endpoint,
            region,
            input: Input::Ticker,
            markdown: MarkdownRenderer::new(table_classes),
        }
    }

    pub fn prompt<S: AsRef<str>>(endpoint: Endpoint, region: Region, table_classes: &[S]) -> Self {
        Self {
            input: Input::Prompt,
            ..Self::ticker(endpoint, region, table_classes)
        }
    }

    fn payload(&self, form: &FormSnapshot) -> Result<Payload, HandlerError> {
        match self.input {
            Input::Ticker => ticker_from(form).map(Payload::Ticker),
            Input::Prompt => form
                .value("prompt")
                .map(|p| Payload::Prompt(p.to_string()))
                .ok_or(HandlerError::MissingField("prompt")),
        }
    }
}

#[async_trait::async_trait]
impl Handler for MarkdownQueryHandler {
    fn region(&self) -> Region {
        self.region
    }

    fn validate(&self, form: &FormSnapshot) -> Result<(), String> {
        match self.input {
            Input::Ticker => require_ticker(form),
            Input::Prompt if form.value("prompt").is_none() => {
                Err("Please enter an analysis prompt".to_string())
            }
            Input::Prompt => Ok(()),
        }
    }

    async fn handle(&self, ctx: &mut Context<'_>, form: &FormSnapshot) -> Result<String, HandlerError> {
        let payload = self.payload(form)?;
        info!("Querying {:?}", self.endpoint);
        let markdown = ctx.backend.query(self.endpoint, &payload).await?.into_markdown()?;
        Ok(self.markdown.render(&markdown))
    }
}

/// Finance actions whose reply is a chart configuration.
pub struct ChartQueryHandler {
    endpoint: Endpoint,
    region: Region,
    canvas: &'static str,
}

impl ChartQueryHandler {
    pub fn new(endpoint: Endpoint, region: Region, canvas: &'static str) -> Self {
        Self { endpoint, region, canvas }
    }
}

#[async_trait::async_trait]
impl Handler for ChartQueryHandler {
    fn region(&self) -> Region {
        self.region
    }

    fn validate(&self, form: &FormSnapshot) -> Result<(), String> {
        require_ticker(form)
    }

    async fn handle(&self, ctx: &mut Context<'_>, form: &FormSnapshot) -> Result<String, HandlerError> {
        let ticker = ticker_from(form)?;
        info!("Querying {:?} for {}", self.endpoint, ticker);
        let config = ctx
            .backend
            .query(self.endpoint, &Payload::Ticker(ticker))
            .await?
            .into_chart()?;

        let instance = ctx.charts.render(self.canvas, &config)?;
        let markup = ctx.session.charts.replace(instance).markup.clone();
        debug!("{} live chart(s)", ctx.session.charts.len());
        Ok(markup)
    }
}

/// Fills the ticker select, fetching the stock list once per session.
pub struct StockListHandler;

#[async_trait::async_trait]
impl Handler for StockListHandler {
    fn region(&self) -> Region {
        Region::TickerSelect
    }

    async fn handle(&self, ctx: &mut Context<'_>, form: &FormSnapshot) -> Result<String, HandlerError> {
        let filter = form.value("filter").unwrap_or_default();
        let html = match &ctx.session.stock_list {
            Some(cached) => {
                debug!("Using stock list fetched at {}", cached.fetched_at);
                render_stock_options(&cached.stocks, filter)
            }
            None => {
                let stocks = ctx.backend.stock_list().await?;
                info!("Loaded {} sectors", stocks.len());
                let cached = ctx.session.cache_stock_list(stocks);
                render_stock_options(&cached.stocks, filter)
            }
        };
        Ok(html)
    }
}

/// One `<optgroup>` per sector; sectors left empty by the filter are skipped.
pub fn render_stock_options(stocks: &StockList, filter: &str) -> String {
    let needle = filter.trim().to_lowercase();
    let mut out = String::from("<option value=\"\">Select a stock</option>\n");

    for (sector, entries) in stocks {
        let matching: Vec<_> = entries
            .iter()
            .filter(|e| {
                needle.is_empty()
                    || e.ticker.to_lowercase().contains(&needle)
                    || e.name.to_lowercase().contains(&needle)
            })
            .collect();
        if matching.is_empty() {
            continue;
        }

        out.push_str(&format!("<optgroup label=\"{}\">\n", escape_html(sector)));
        for entry in matching {
            out.push_str(&format!(
                "<option value=\"{}\">{} - {}</option>\n",
                escape_html(&entry.ticker),
                escape_html(&entry.ticker),
                escape_html(&entry.name)
            ));
        }
        out.push_str("</optgroup>\n");
    }
    out
}
