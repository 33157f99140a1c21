// Backend Query Service: endpoints, payloads and reply decoding

pub mod client;
pub mod traits;

pub use client::HttpQueryService;
pub use traits::QueryService;

use crate::charts::ChartConfig;
use crate::model::{BackendReply, QueryError};
use serde::{Deserialize, Serialize};

/// Which backend an endpoint lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Finance,
    Shopping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    StockPrice,
    AnalystRecommendations,
    CompanyInfo,
    CompanyNews,
    CustomAnalysis,
    PriceTrends,
    VolumeAnalysis,
    TechnicalIndicators,
    StockList,
    Recommendations,
}

impl Endpoint {
    /// Path on the finance backend. The shopping recommendation path is
    /// configurable and therefore not known here.
    pub fn finance_path(&self) -> Option<&'static str> {
        match self {
            Endpoint::StockPrice => Some("/api/get_stock_price"),
            Endpoint::AnalystRecommendations => Some("/api/get_analyst_recommendations"),
            Endpoint::CompanyInfo => Some("/api/get_company_info"),
            Endpoint::CompanyNews => Some("/api/get_company_news"),
            Endpoint::CustomAnalysis => Some("/api/run_custom_analysis"),
            Endpoint::PriceTrends => Some("/api/get_price_trends"),
            Endpoint::VolumeAnalysis => Some("/api/get_volume_analysis"),
            Endpoint::TechnicalIndicators => Some("/api/get_technical_indicators"),
            Endpoint::StockList => Some("/api/get_stock_list"),
            Endpoint::Recommendations => None,
        }
    }

    pub fn service(&self) -> Service {
        match self {
            Endpoint::Recommendations => Service::Shopping,
            _ => Service::Finance,
        }
    }
}

/// The single scalar a request carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    Ticker(String),
    Prompt(String),
}

#[derive(Debug, Deserialize)]
struct RawReply {
    markdown: Option<String>,
    /// Older backends send the markdown under this key only.
    content: Option<String>,
    config: Option<ChartConfig>,
    error: Option<String>,
}

/// Maps an HTTP status and body onto a reply or an error.
pub fn decode_reply(status: u16, body: &str) -> Result<BackendReply, QueryError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<RawReply>(body)
            .ok()
            .and_then(|raw| raw.error)
            .unwrap_or_else(|| body.trim().to_string());
        return Err(QueryError::Api { status, message });
    }

    let raw: RawReply =
        serde_json::from_str(body).map_err(|e| QueryError::Malformed(e.to_string()))?;

    if let Some(config) = raw.config {
        return Ok(BackendReply::Chart(config));
    }
    if let Some(markdown) = raw.markdown.or(raw.content) {
        return Ok(BackendReply::Markdown(markdown));
    }
    match raw.error {
        Some(error) => Err(QueryError::Backend(error)),
        None => Err(QueryError::Malformed(
            "reply carries neither markdown nor a chart configuration".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_a_single_keyed_object() {
        assert_eq!(
            serde_json::to_string(&Payload::Ticker("AAPL".into())).unwrap(),
            r#"{"ticker":"AAPL"}"#
        );
        assert_eq!(
            serde_json::to_string(&Payload::Prompt("Compare AAPL and MSFT".into())).unwrap(),
            r#"{"prompt":"Compare AAPL and MSFT"}"#
        );
    }

    #[test]
    fn markdown_reply_is_decoded() {
        let reply = decode_reply(200, r##"{"content": "x", "markdown": "# NVDA"}"##).unwrap();
        assert!(matches!(reply, BackendReply::Markdown(md) if md == "# NVDA"));
    }

    #[test]
    fn content_only_reply_is_markdown() {
        let reply = decode_reply(200, r###"{"content": "## Error\nboom"}"###).unwrap();
        assert!(matches!(reply, BackendReply::Markdown(md) if md.starts_with("## Error")));
    }

    #[test]
    fn chart_reply_is_decoded() {
        let body = r#"{"config": {"type": "bar", "data": {"labels": ["d1"], "datasets": [{"label": "NVDA Volume", "data": [1200]}]}}}"#;
        let config = decode_reply(200, body).unwrap().into_chart().unwrap();
        assert_eq!(config.kind, "bar");
        assert_eq!(config.data.datasets[0].data, vec![Some(1200.0)]);
    }

    #[test]
    fn server_error_uses_the_error_field() {
        let err = decode_reply(500, r#"{"error": "No data found for ticker"}"#).unwrap_err();
        assert!(matches!(
            err,
            QueryError::Api { status: 500, ref message } if message == "No data found for ticker"
        ));
    }

    #[test]
    fn server_error_without_json_keeps_the_body() {
        let err = decode_reply(502, "Bad Gateway\n").unwrap_err();
        assert_eq!(err.to_string(), "Backend responded with status 502: Bad Gateway");
    }

    #[test]
    fn error_field_on_success_status_is_an_error() {
        let err = decode_reply(200, r#"{"error": "rate limited"}"#).unwrap_err();
        assert!(matches!(err, QueryError::Backend(msg) if msg == "rate limited"));
    }

    #[test]
    fn unexpected_shapes_are_malformed() {
        assert!(matches!(decode_reply(200, "{}"), Err(QueryError::Malformed(_))));
        assert!(matches!(decode_reply(200, "<html>"), Err(QueryError::Malformed(_))));
    }

    #[test]
    fn only_recommendations_live_on_the_shopping_backend() {
        assert_eq!(Endpoint::Recommendations.service(), Service::Shopping);
        assert_eq!(Endpoint::Recommendations.finance_path(), None);
        assert_eq!(Endpoint::PriceTrends.service(), Service::Finance);
        assert_eq!(Endpoint::PriceTrends.finance_path(), Some("/api/get_price_trends"));
    }
}
