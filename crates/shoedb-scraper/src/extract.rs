//! Builds one [`ProductRecord`] from one listing item.
//!
//! Extraction is all-or-nothing per item: the first field that fails aborts
//! the item and is reported with its raw text. Siblings are unaffected since
//! each item is extracted independently.

use scraper::{ElementRef, Html, Selector};
use shoedb_core::{Price, ProductRecord};
use thiserror::Error;

use crate::parse::{normalize_reviews_text, parse_discount_percent, parse_price, MalformedNumber};
use crate::selectors::CatalogSelectors;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("field {field} did not parse: {source}")]
    MalformedNumber {
        field: &'static str,
        #[source]
        source: MalformedNumber,
    },

    #[error("field {field} is missing or empty")]
    MissingField { field: &'static str },
}

impl ExtractError {
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            ExtractError::MalformedNumber { field, .. } | ExtractError::MissingField { field } => {
                field
            }
        }
    }

    /// The scraped text that failed, if any was found.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            ExtractError::MalformedNumber { source, .. } => &source.raw,
            ExtractError::MissingField { .. } => "",
        }
    }
}

/// Extracts a record from an item container element.
///
/// Brand may be empty; name must be present. The four numeric fields must all
/// parse. Promotions collect every match in document order.
///
/// # Errors
///
/// Returns [`ExtractError`] for the first field that is missing or does not parse.
pub fn extract_record(
    item: ElementRef<'_>,
    selectors: &CatalogSelectors,
) -> Result<ProductRecord, ExtractError> {
    let brand = child_text(item, &selectors.brand);
    let name = child_text(item, &selectors.name);
    if name.is_empty() {
        return Err(ExtractError::MissingField { field: "name" });
    }

    let original_raw = child_text(item, &selectors.original_price);
    let discount_raw = child_text(item, &selectors.discount);
    let discounted_raw = child_text(item, &selectors.discounted_price);
    let reviews_raw = child_text(item, &selectors.reviews_count);

    let original = parse_price(&original_raw).map_err(numeric("original_price"))?;
    let discount_percent = parse_discount_percent(&discount_raw).map_err(numeric("discount"))?;
    let discounted = parse_price(&discounted_raw).map_err(numeric("discounted_price"))?;
    let reviews = normalize_reviews_text(&reviews_raw);
    let reviews_count = reviews.count(&reviews_raw).map_err(numeric("reviews_count"))?;

    if reviews.needs_review {
        tracing::warn!(
            name = %name,
            raw = %reviews_raw,
            parsed = reviews_count,
            "review count text is not a plain integer; stored value needs manual review"
        );
    }

    let promotions = item
        .select(&selectors.promotions)
        .map(collapse_text)
        .filter(|text| !text.is_empty())
        .collect();

    Ok(ProductRecord {
        brand,
        name,
        price: Price {
            original,
            discount_percent,
            discounted,
        },
        reviews_count,
        promotions,
    })
}

/// Extracts a record from an item's outer HTML, as captured by
/// [`crate::page::item_fragments`].
///
/// Field selectors are matched below the first item container in the
/// fragment, never against the container itself.
///
/// # Errors
///
/// Same as [`extract_record`].
pub fn extract_fragment(
    fragment: &str,
    selectors: &CatalogSelectors,
) -> Result<ProductRecord, ExtractError> {
    let html = Html::parse_fragment(fragment);
    let item = html
        .select(&selectors.item_container)
        .next()
        .unwrap_or_else(|| html.root_element());
    extract_record(item, selectors)
}

fn numeric(field: &'static str) -> impl Fn(MalformedNumber) -> ExtractError {
    move |source| ExtractError::MalformedNumber { field, source }
}

/// Trimmed text of the first descendant matching `selector`, or `""`.
fn child_text(item: ElementRef<'_>, selector: &Selector) -> String {
    item.select(selector)
        .next()
        .map(collapse_text)
        .unwrap_or_default()
}

fn collapse_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_owned()
}
