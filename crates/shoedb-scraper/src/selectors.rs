//! Compiled CSS selectors for the catalog listing markup.

use scraper::Selector;
use shoedb_core::SelectorConfig;

use crate::error::ScraperError;

/// Selectors compiled once at startup and shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct CatalogSelectors {
    pub item_container: Selector,
    pub brand: Selector,
    pub name: Selector,
    pub original_price: Selector,
    pub discount: Selector,
    pub discounted_price: Selector,
    pub reviews_count: Selector,
    pub promotions: Selector,
}

impl CatalogSelectors {
    /// Compiles every selector in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] naming the first field whose
    /// selector does not parse.
    pub fn compile(config: &SelectorConfig) -> Result<Self, ScraperError> {
        Ok(Self {
            item_container: compile_one("item_container", &config.item_container)?,
            brand: compile_one("brand", &config.brand)?,
            name: compile_one("name", &config.name)?,
            original_price: compile_one("original_price", &config.original_price)?,
            discount: compile_one("discount", &config.discount)?,
            discounted_price: compile_one("discounted_price", &config.discounted_price)?,
            reviews_count: compile_one("reviews_count", &config.reviews_count)?,
            promotions: compile_one("promotions", &config.promotions)?,
        })
    }
}

fn compile_one(field: &'static str, selector: &str) -> Result<Selector, ScraperError> {
    Selector::parse(selector).map_err(|e| ScraperError::InvalidSelector {
        field,
        selector: selector.to_owned(),
        reason: e.to_string(),
    })
}
