// Output surface: designated regions, loading indicators and alerts

pub mod buffer;
pub mod terminal;

pub use buffer::BufferedPage;

use crate::utils::escape_html;

/// A designated output region of one of the dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Recommendations,
    Preferences,
    TickerSelect,
    StockPrice,
    AnalystRecommendations,
    CompanyInfo,
    CompanyNews,
    CustomAnalysis,
    PriceChart,
    VolumeChart,
    TechnicalChart,
}

impl Region {
    pub fn id(&self) -> &'static str {
        match self {
            Region::Recommendations => "recommendations",
            Region::Preferences => "preferences",
            Region::TickerSelect => "ticker-select",
            Region::StockPrice => "stock-price-result",
            Region::AnalystRecommendations => "analyst-recommendations-result",
            Region::CompanyInfo => "company-info-result",
            Region::CompanyNews => "company-news-result",
            Region::CustomAnalysis => "custom-analysis-result",
            Region::PriceChart => "price-chart-container",
            Region::VolumeChart => "volume-chart-container",
            Region::TechnicalChart => "technical-chart-container",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Region::Recommendations => "Recommendations",
            Region::Preferences => "Preferences",
            Region::TickerSelect => "Stocks",
            Region::StockPrice => "Stock Price",
            Region::AnalystRecommendations => "Analyst Recommendations",
            Region::CompanyInfo => "Company Information",
            Region::CompanyNews => "Company News",
            Region::CustomAnalysis => "Custom Analysis",
            Region::PriceChart => "Price Trends",
            Region::VolumeChart => "Volume Analysis",
            Region::TechnicalChart => "Technical Indicators",
        }
    }
}

/// What a handler may do to the page.
pub trait Page: Send {
    fn set_html(&mut self, region: Region, html: String);
    fn set_loading(&mut self, region: Region, loading: bool);
    /// Blocking notice, used for rejected input.
    fn alert(&mut self, message: &str);
}

pub const ERROR_BANNER_CLASS: &str = "alert alert-danger";

pub fn error_banner(message: &str) -> String {
    format!(
        "<div class=\"{ERROR_BANNER_CLASS}\" role=\"alert\">{}</div>",
        escape_html(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_escapes_the_message() {
        assert_eq!(
            error_banner("Network error: <timeout>"),
            "<div class=\"alert alert-danger\" role=\"alert\">Network error: &lt;timeout&gt;</div>"
        );
    }
}
