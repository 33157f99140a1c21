use crate::model::ConfigError;
use crate::reformatter::keywords::DEFAULT_FEATURE_KEYWORDS;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the finance backend.
    pub finance_url: String,
    /// Base URL of the shopping backend.
    pub shopping_url: String,
    pub recommend_path: String,
    pub user_agent: String,
    /// No timeout when unset.
    pub request_timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            finance_url: "http://127.0.0.1:5000".to_string(),
            shopping_url: "http://127.0.0.1:5001".to_string(),
            recommend_path: "/api/recommendations".to_string(),
            user_agent: concat!("shopfin-dash/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub table_classes: Vec<String>,
    pub feature_keywords: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            table_classes: ["table", "table-striped", "table-bordered"]
                .map(String::from)
                .to_vec(),
            feature_keywords: DEFAULT_FEATURE_KEYWORDS.map(String::from).to_vec(),
        }
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Like `load_config`, but a missing file means defaults.
pub fn load_config_or_default(path: &str) -> Result<AppConfig, ConfigError> {
    match load_config(path) {
        Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            warn!("Config file {} not found, using defaults", path);
            Ok(AppConfig::default())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "backend": { "finance_url": "http://finance.local" }, "table_classes": ["table"] }"#,
        )
        .unwrap();
        assert_eq!(config.backend.finance_url, "http://finance.local");
        assert_eq!(config.backend.recommend_path, "/api/recommendations");
        assert_eq!(config.table_classes, ["table"]);
        assert!(config.feature_keywords.iter().any(|k| k == "warranty"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_config_or_default("does/not/exist/config.json").unwrap();
        assert_eq!(config.table_classes.len(), 3);
        assert_eq!(config.backend.request_timeout_secs, None);
    }

    #[test]
    fn unreadable_json_is_an_error() {
        let path = std::env::temp_dir().join("shopfin-dash-bad-config.json");
        fs::write(&path, "{ not json").unwrap();
        let result = load_config_or_default(path.to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        let _ = fs::remove_file(path);
    }
}
