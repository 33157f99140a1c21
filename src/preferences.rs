// Shopping form catalogues: categories, budgets, brands and per-category preferences
use crate::utils::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

const fn pref(value: &'static str, label: &'static str) -> Choice {
    Choice { value, label }
}

pub static CATEGORIES: [Choice; 8] = [
    pref("electronics", "Electronics"),
    pref("clothing", "Clothing"),
    pref("footwear", "Footwear"),
    pref("home_appliances", "Home Appliances"),
    pref("beauty", "Beauty & Personal Care"),
    pref("sports", "Sports & Fitness"),
    pref("books", "Books"),
    pref("toys", "Toys & Games"),
];

pub static BUDGET_RANGES: [Choice; 6] = [
    pref("0-1000", "Under ₹1,000"),
    pref("1000-5000", "₹1,000 - ₹5,000"),
    pref("5000-10000", "₹5,000 - ₹10,000"),
    pref("10000-20000", "₹10,000 - ₹20,000"),
    pref("20000-50000", "₹20,000 - ₹50,000"),
    pref("50000+", "Above ₹50,000"),
];

/// The empty value stands for any brand.
pub static BRANDS: [Choice; 10] = [
    pref("", "Any Brand"),
    pref("samsung", "Samsung"),
    pref("apple", "Apple"),
    pref("nike", "Nike"),
    pref("adidas", "Adidas"),
    pref("sony", "Sony"),
    pref("lg", "LG"),
    pref("hp", "HP"),
    pref("dell", "Dell"),
    pref("lenovo", "Lenovo"),
];

static COMMON: [Choice; 4] = [
    pref("high_quality", "High Quality"),
    pref("popular", "Popular/Highly Rated"),
    pref("fast_delivery", "Fast Delivery"),
    pref("discounted", "On Discount/Sale"),
];

static ELECTRONICS: [Choice; 4] = [
    pref("energy_efficient", "Energy Efficient"),
    pref("warranty", "Extended Warranty"),
    pref("latest_model", "Latest Model"),
    pref("good_battery", "Good Battery Life"),
];

static CLOTHING: [Choice; 4] = [
    pref("comfortable", "Comfortable"),
    pref("trendy", "Trendy/Fashionable"),
    pref("durable", "Durable/Long-lasting"),
    pref("easy_care", "Easy Care/Wash"),
];

static FOOTWEAR: [Choice; 4] = [
    pref("comfortable", "Comfortable"),
    pref("durable", "Durable/Long-lasting"),
    pref("waterproof", "Waterproof"),
    pref("lightweight", "Lightweight"),
];

static HOME_APPLIANCES: [Choice; 4] = [
    pref("energy_efficient", "Energy Efficient"),
    pref("warranty", "Extended Warranty"),
    pref("quiet_operation", "Quiet Operation"),
    pref("space_saving", "Space-saving"),
];

static BEAUTY: [Choice; 4] = [
    pref("natural", "Natural/Organic"),
    pref("cruelty_free", "Cruelty-free"),
    pref("fragrance_free", "Fragrance-free"),
    pref("long_lasting", "Long-lasting"),
];

static SPORTS: [Choice; 4] = [
    pref("durable", "Durable/Long-lasting"),
    pref("lightweight", "Lightweight"),
    pref("high_performance", "High Performance"),
    pref("waterproof", "Waterproof/Weather-resistant"),
];

fn category_specific(category: &str) -> &'static [Choice] {
    match category {
        "electronics" => &ELECTRONICS,
        "clothing" => &CLOTHING,
        "footwear" => &FOOTWEAR,
        "home_appliances" => &HOME_APPLIANCES,
        "beauty" => &BEAUTY,
        "sports" => &SPORTS,
        _ => &[],
    }
}

/// Common options first, then the category's own.
pub fn options_for(category: &str) -> impl Iterator<Item = &'static Choice> {
    COMMON.iter().chain(category_specific(category))
}

/// Human label for a preference value, looked up across all categories.
pub fn label_for(value: &str) -> Option<&'static str> {
    [
        &COMMON[..],
        &ELECTRONICS,
        &CLOTHING,
        &FOOTWEAR,
        &HOME_APPLIANCES,
        &BEAUTY,
        &SPORTS,
    ]
    .into_iter()
    .flatten()
    .find(|p| p.value == value)
    .map(|p| p.label)
}

pub fn is_known(catalogue: &[Choice], value: &str) -> bool {
    catalogue.iter().any(|c| c.value == value)
}

fn option_tag(choice: &Choice, selected: bool) -> String {
    format!(
        "<option value=\"{}\"{}>{}</option>\n",
        escape_html(choice.value),
        if selected { " selected" } else { "" },
        escape_html(choice.label)
    )
}

/// `<option>` list for the category, keeping earlier selections selected.
pub fn render_options<S: AsRef<str>>(category: &str, selected: &[S]) -> String {
    options_for(category)
        .map(|p| option_tag(p, selected.iter().any(|s| s.as_ref() == p.value)))
        .collect()
}

/// `<option>` list for a single-choice dropdown.
pub fn render_select(catalogue: &[Choice], selected: Option<&str>) -> String {
    catalogue
        .iter()
        .map(|c| option_tag(c, selected == Some(c.value)))
        .collect()
}

/// Terminal listing of a catalogue, one `value  label` pair per line.
pub fn render_listing(title: &str, catalogue: &[Choice]) -> String {
    let width = catalogue.iter().map(|c| c.value.len()).max().unwrap_or(0);
    let mut out = format!("== {title} ==\n");
    for choice in catalogue {
        let value = if choice.value.is_empty() { "-" } else { choice.value };
        out.push_str(&format!("{value:<width$}  {}\n", choice.label));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_options_come_first() {
        let values: Vec<_> = options_for("footwear").map(|p| p.value).collect();
        assert_eq!(
            values,
            [
                "high_quality",
                "popular",
                "fast_delivery",
                "discounted",
                "comfortable",
                "durable",
                "waterproof",
                "lightweight"
            ]
        );
    }

    #[test]
    fn unknown_category_gets_common_options_only() {
        assert_eq!(options_for("books").count(), 4);
        assert_eq!(options_for("").count(), 4);
    }

    #[test]
    fn selections_survive_a_category_change() {
        let html = render_options("sports", &["popular", "lightweight", "easy_care"]);
        assert!(html.contains("<option value=\"popular\" selected>Popular/Highly Rated</option>"));
        assert!(html.contains("<option value=\"lightweight\" selected>Lightweight</option>"));
        assert!(html.contains("<option value=\"durable\">Durable/Long-lasting</option>"));
        assert!(!html.contains("easy_care"));
    }

    #[test]
    fn budget_select_marks_the_chosen_range() {
        let html = render_select(&BUDGET_RANGES, Some("5000-10000"));
        assert!(html.contains("<option value=\"5000-10000\" selected>₹5,000 - ₹10,000</option>"));
        assert_eq!(html.matches(" selected").count(), 1);
    }

    #[test]
    fn category_labels_are_escaped() {
        let html = render_select(&CATEGORIES, None);
        assert!(html.contains("<option value=\"beauty\">Beauty &amp; Personal Care</option>"));
        assert!(!html.contains("selected"));
    }

    #[test]
    fn catalogues_know_their_values() {
        assert!(is_known(&CATEGORIES, "home_appliances"));
        assert!(!is_known(&CATEGORIES, "groceries"));
        assert!(is_known(&BUDGET_RANGES, "50000+"));
        assert!(is_known(&BRANDS, ""));
    }

    #[test]
    fn listing_aligns_values() {
        let text = render_listing("Brands", &BRANDS[..3]);
        assert_eq!(text, "== Brands ==\n-        Any Brand\nsamsung  Samsung\napple    Apple\n");
    }

    #[test]
    fn labels_are_found_across_categories() {
        assert_eq!(label_for("good_battery"), Some("Good Battery Life"));
        assert_eq!(label_for("fast_delivery"), Some("Fast Delivery"));
        assert_eq!(label_for("made_up"), None);
    }
}
