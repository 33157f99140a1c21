// Chart configurations from the finance backend and their rendering
use crate::model::ChartError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: ChartData,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    #[serde(default)]
    pub label: String,
    /// Gaps (e.g. the warm-up of a moving average) arrive as `null`.
    #[serde(default)]
    pub data: Vec<Option<f64>>,
    /// Styling keys (colors, dash patterns, ...) passed through untouched.
    #[serde(flatten)]
    pub style: Map<String, Value>,
}

/// A chart drawn on a canvas. Dropping it through `destroy` releases the canvas.
#[derive(Debug, Clone)]
pub struct ChartInstance {
    pub canvas: String,
    pub markup: String,
    pub created_at: DateTime<Utc>,
}

impl ChartInstance {
    pub fn destroy(self) {
        debug!(
            "Destroying chart on '{}' created at {}",
            self.canvas, self.created_at
        );
    }
}

pub trait ChartRenderer: Send + Sync {
    fn render(&self, canvas: &str, config: &ChartConfig) -> Result<ChartInstance, ChartError>;
}

/// Emits a `<canvas>` plus the script that hands the configuration to Chart.js.
pub struct HtmlChartRenderer;

impl ChartRenderer for HtmlChartRenderer {
    fn render(&self, canvas: &str, config: &ChartConfig) -> Result<ChartInstance, ChartError> {
        if config.data.datasets.is_empty() {
            return Err(ChartError::NoDatasets(canvas.to_string()));
        }
        for dataset in &config.data.datasets {
            if dataset.data.len() != config.data.labels.len() {
                warn!(
                    "Dataset '{}' has {} points for {} labels",
                    dataset.label,
                    dataset.data.len(),
                    config.data.labels.len()
                );
            }
        }

        // A literal "</" would end the inline script early.
        let json = serde_json::to_string(config)?.replace("</", "<\\/");
        let markup = format!(
            "<canvas id=\"{canvas}\"></canvas>\n<script>new Chart(document.getElementById(\"{canvas}\"), {json});</script>"
        );

        Ok(ChartInstance {
            canvas: canvas.to_string(),
            markup,
            created_at: Utc::now(),
        })
    }
}

/// Live charts, at most one per canvas.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    active: HashMap<String, ChartInstance>,
}

impl ChartRegistry {
    /// Registers a chart, destroying whatever was drawn on its canvas before.
    pub fn replace(&mut self, instance: ChartInstance) -> &ChartInstance {
        let canvas = instance.canvas.clone();
        if let Some(previous) = self.active.insert(canvas.clone(), instance) {
            previous.destroy();
        }
        &self.active[&canvas]
    }

    #[cfg(test)]
    pub fn get(&self, canvas: &str) -> Option<&ChartInstance> {
        self.active.get(canvas)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn price_trend() -> ChartConfig {
        serde_json::from_value(json!({
            "type": "line",
            "data": {
                "labels": ["2024-01-02", "2024-01-03"],
                "datasets": [{
                    "label": "NVDA Price",
                    "data": [48.1, null],
                    "borderColor": "#0066B3",
                    "fill": true,
                    "tension": 0.4
                }]
            },
            "options": { "plugins": { "title": { "display": true, "text": "Price Trend - NVDA" } } }
        }))
        .unwrap()
    }

    #[test]
    fn config_keeps_nulls_and_styling() {
        let config = price_trend();
        let dataset = &config.data.datasets[0];
        assert_eq!(dataset.data, vec![Some(48.1), None]);
        assert_eq!(dataset.style["borderColor"], json!("#0066B3"));

        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back["data"]["datasets"][0]["tension"], json!(0.4));
        assert_eq!(back["type"], json!("line"));
    }

    #[test]
    fn renders_canvas_and_script() {
        let chart = HtmlChartRenderer.render("priceChart", &price_trend()).unwrap();
        assert!(chart.markup.starts_with("<canvas id=\"priceChart\"></canvas>"));
        assert!(chart.markup.contains("new Chart(document.getElementById(\"priceChart\")"));
        assert!(chart.markup.contains("\"Price Trend - NVDA\""));
    }

    #[test]
    fn script_end_tags_in_labels_are_escaped() {
        let mut config = price_trend();
        config.data.datasets[0].label = "</script><b>".into();
        let chart = HtmlChartRenderer.render("priceChart", &config).unwrap();
        assert_eq!(chart.markup.matches("</script>").count(), 1);
    }

    #[test]
    fn config_without_datasets_is_rejected() {
        let mut config = price_trend();
        config.data.datasets.clear();
        assert!(matches!(
            HtmlChartRenderer.render("volumeChart", &config),
            Err(ChartError::NoDatasets(canvas)) if canvas == "volumeChart"
        ));
    }

    #[test]
    fn registry_keeps_one_chart_per_canvas() {
        let mut registry = ChartRegistry::default();
        let first = HtmlChartRenderer.render("priceChart", &price_trend()).unwrap();
        let first_created = first.created_at;
        registry.replace(first);

        let mut config = price_trend();
        config.data.datasets[0].label = "NVDA Close".into();
        let second = HtmlChartRenderer.render("priceChart", &config).unwrap();
        registry.replace(second);

        assert_eq!(registry.len(), 1);
        let live = registry.get("priceChart").unwrap();
        assert!(live.markup.contains("NVDA Close"));
        assert!(live.created_at >= first_created);
    }
}
