//! Splits a listing page into per-item HTML fragments.

use scraper::Html;

use crate::selectors::CatalogSelectors;

/// Returns the outer HTML of every item container on the page, in document
/// order.
///
/// A page without containers, or a body that is not HTML at all, yields an
/// empty list. The fragments are owned so they can be handed to extraction
/// tasks after the parsed document is dropped.
#[must_use]
pub fn item_fragments(body: &str, selectors: &CatalogSelectors) -> Vec<String> {
    let document = Html::parse_document(body);
    document
        .select(&selectors.item_container)
        .map(|item| item.html())
        .collect()
}
