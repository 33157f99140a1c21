use crate::page::terminal::html_to_text;
use crate::page::{Page, Region};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Keeps region contents in memory until they are printed.
#[derive(Debug, Default)]
pub struct BufferedPage {
    regions: BTreeMap<Region, String>,
    loading: BTreeSet<Region>,
    alerts: Vec<String>,
}

impl BufferedPage {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn html(&self, region: Region) -> Option<&str> {
        self.regions.get(&region).map(String::as_str)
    }

    #[cfg(test)]
    pub fn is_loading(&self, region: Region) -> bool {
        self.loading.contains(&region)
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Raw HTML of every filled region, in region order.
    pub fn render_html(&self) -> String {
        self.regions
            .iter()
            .map(|(region, html)| format!("<section id=\"{}\">\n{}\n</section>\n", region.id(), html))
            .collect()
    }

    /// Terminal rendering of every filled region, in region order.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for (region, html) in &self.regions {
            out.push_str(&format!("== {} ==\n", region.title()));
            out.push_str(&html_to_text(html));
            out.push('\n');
        }
        out
    }
}

impl Page for BufferedPage {
    fn set_html(&mut self, region: Region, html: String) {
        debug!("Region {} updated ({} bytes)", region.id(), html.len());
        self.regions.insert(region, html);
    }

    fn set_loading(&mut self, region: Region, loading: bool) {
        if loading {
            self.loading.insert(region);
        } else {
            self.loading.remove(&region);
        }
    }

    fn alert(&mut self, message: &str) {
        warn!("Alert: {}", message);
        self.alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_latest_html_per_region() {
        let mut page = BufferedPage::new();
        page.set_html(Region::StockPrice, "<p>old</p>".into());
        page.set_html(Region::StockPrice, "<p>new</p>".into());
        assert_eq!(page.html(Region::StockPrice), Some("<p>new</p>"));
        assert_eq!(page.html(Region::CompanyNews), None);
    }

    #[test]
    fn loading_indicator_toggles() {
        let mut page = BufferedPage::new();
        page.set_loading(Region::PriceChart, true);
        assert!(page.is_loading(Region::PriceChart));
        page.set_loading(Region::PriceChart, false);
        assert!(!page.is_loading(Region::PriceChart));
    }

    #[test]
    fn renders_regions_in_order() {
        let mut page = BufferedPage::new();
        page.set_html(Region::CompanyInfo, "<p>info</p>".into());
        page.set_html(Region::StockPrice, "<h1>NVDA</h1>".into());
        assert_eq!(
            page.render_text(),
            "== Stock Price ==\nNVDA\n\n== Company Information ==\ninfo\n\n"
        );
        assert!(page.render_html().starts_with("<section id=\"stock-price-result\">"));
    }
}
