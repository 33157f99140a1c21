// Turns the shopping form into the natural-language request sent to the recommender
use crate::preferences::label_for;

#[derive(Debug, Clone, Default)]
pub struct ShopQuery {
    pub category: String,
    pub item: Option<String>,
    /// Preference values as selected in the form.
    pub preferences: Vec<String>,
    pub budget: String,
    pub brand: Option<String>,
    pub notes: Option<String>,
}

pub fn budget_text(range: &str) -> &'static str {
    match range {
        "0-1000" => "under Rs. 1,000",
        "1000-5000" => "between Rs. 1,000 and Rs. 5,000",
        "5000-10000" => "between Rs. 5,000 and Rs. 10,000",
        "10000-20000" => "between Rs. 10,000 and Rs. 20,000",
        "20000-50000" => "between Rs. 20,000 and Rs. 50,000",
        "50000+" => "above Rs. 50,000",
        _ => "flexible budget",
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ShopQuery {
    pub fn format_query(&self) -> String {
        let subject = non_blank(&self.item).unwrap_or(self.category.as_str());
        let mut query = format!("I am looking for {subject}");

        if let Some(brand) = non_blank(&self.brand) {
            query.push_str(&format!(" from {brand}"));
        }

        // Unknown values are sent as typed.
        let preferences = self
            .preferences
            .iter()
            .map(|p| label_for(p).unwrap_or(p.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        query.push_str(" with the following preferences: ");
        query.push_str(&preferences);
        query.push_str(&format!(". Budget: {}", budget_text(&self.budget)));

        if let Some(notes) = non_blank(&self.notes) {
            query.push_str(&format!(". Additional requirements: {notes}"));
        }
        query
    }
}
