// Core structs: ProductMention, StockEntry, BackendReply and the error enums
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::charts::ChartConfig;

/// Currency markers recognized in recommendation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Rupee,
    Rs,
    RsDot,
    Inr,
    Dollar,
}

impl Currency {
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "₹" => Some(Currency::Rupee),
            "Rs" => Some(Currency::Rs),
            "Rs." => Some(Currency::RsDot),
            "INR" => Some(Currency::Inr),
            "$" => Some(Currency::Dollar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Rupee => "₹",
            Currency::Rs => "Rs",
            Currency::RsDot => "Rs.",
            Currency::Inr => "INR",
            Currency::Dollar => "$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product name followed by a price, as found in free text.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductMention {
    pub name: String,
    pub currency: Currency,
    pub amount: String,
}

impl ProductMention {
    /// Price line text: marker and amount with no space between them.
    pub fn price(&self) -> String {
        format!("{}{}", self.currency, self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub ticker: String,
    pub name: String,
}

/// Sector name -> stocks in that sector.
pub type StockList = BTreeMap<String, Vec<StockEntry>>;

/// A successful backend answer.
#[derive(Debug, Clone)]
pub enum BackendReply {
    Markdown(String),
    Chart(ChartConfig),
}

impl BackendReply {
    pub fn into_markdown(self) -> Result<String, QueryError> {
        match self {
            BackendReply::Markdown(md) => Ok(md),
            BackendReply::Chart(_) => Err(QueryError::Unexpected { expected: "markdown" }),
        }
    }

    pub fn into_chart(self) -> Result<ChartConfig, QueryError> {
        match self {
            BackendReply::Chart(config) => Ok(config),
            BackendReply::Markdown(_) => Err(QueryError::Unexpected { expected: "chart configuration" }),
        }
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend responded with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Backend(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Unexpected response, expected {expected}")]
    Unexpected { expected: &'static str },
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        QueryError::Network(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid feature keyword list: {0}")]
    Keywords(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Chart for '{0}' has no datasets")]
    NoDatasets(String),

    #[error("Cannot serialize chart configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}
