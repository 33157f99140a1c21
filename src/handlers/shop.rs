use crate::backend::{Endpoint, Payload};
use crate::handlers::{Context, FormSnapshot, Handler, HandlerError};
use crate::markdown::MarkdownRenderer;
use crate::page::Region;
use crate::preferences::{is_known, render_options, BUDGET_RANGES, CATEGORIES};
use crate::prompt::ShopQuery;
use crate::reformatter::Reformatter;
use tracing::{debug, info, warn};

/// Shopping search: prompt -> recommender -> markdown -> reformatted HTML.
pub struct ShopSearchHandler {
    markdown: MarkdownRenderer,
    reformatter: Reformatter,
}

impl ShopSearchHandler {
    pub fn new<S: AsRef<str>>(table_classes: &[S], reformatter: Reformatter) -> Self {
        Self {
            markdown: MarkdownRenderer::new(table_classes).with_soft_breaks_as_br(),
            reformatter,
        }
    }

    fn query_from(form: &FormSnapshot) -> Result<ShopQuery, HandlerError> {
        let owned = |name: &str| form.value(name).map(str::to_string);
        Ok(ShopQuery {
            category: owned("category").ok_or(HandlerError::MissingField("category"))?,
            item: owned("item"),
            preferences: form.values("preferences").into_iter().map(String::from).collect(),
            budget: owned("budget").ok_or(HandlerError::MissingField("budget"))?,
            brand: owned("brand"),
            notes: owned("notes"),
        })
    }
}

#[async_trait::async_trait]
impl Handler for ShopSearchHandler {
    fn region(&self) -> Region {
        Region::Recommendations
    }

    fn validate(&self, form: &FormSnapshot) -> Result<(), String> {
        if form.value("category").is_none() {
            return Err("Please select a product category".to_string());
        }
        if form.value("budget").is_none() {
            return Err("Please select a budget range".to_string());
        }
        Ok(())
    }

    async fn handle(&self, ctx: &mut Context<'_>, form: &FormSnapshot) -> Result<String, HandlerError> {
        let query = Self::query_from(form)?;
        if !is_known(&CATEGORIES, &query.category) {
            warn!("Category '{}' is not in the catalogue", query.category);
        }
        if !is_known(&BUDGET_RANGES, &query.budget) {
            warn!("Budget range '{}' is not in the catalogue, sent as flexible", query.budget);
        }
        let query = query.format_query();
        info!("Requesting recommendations");
        debug!("Prompt: {}", query);

        let markdown = ctx
            .backend
            .query(Endpoint::Recommendations, &Payload::Prompt(query))
            .await?
            .into_markdown()?;
        let html = self.markdown.render(&markdown);
        let formatted = self.reformatter.reformat(&html);
        Ok(format!("<div class=\"markdown-content\">\n{formatted}</div>"))
    }
}

/// Rebuilds the preference options after the category changes.
pub struct PreferencesHandler;

#[async_trait::async_trait]
impl Handler for PreferencesHandler {
    fn region(&self) -> Region {
        Region::Preferences
    }

    async fn handle(&self, _ctx: &mut Context<'_>, form: &FormSnapshot) -> Result<String, HandlerError> {
        let category = form.value("category").unwrap_or_default();
        Ok(render_options(category, &form.values("preferences")))
    }
}
