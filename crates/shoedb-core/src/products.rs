use serde::{Deserialize, Serialize};

/// One catalog listing entry extracted from a listing page.
///
/// Records are built per item, written to the store at most once, and never
/// updated afterwards. `(brand, name)` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Empty when the listing shows no brand label.
    pub brand: String,
    pub name: String,
    pub price: Price,
    pub reviews_count: i64,
    /// Promotion badges in document order. Duplicates are kept.
    pub promotions: Vec<String>,
}

/// Listing prices in whole currency units.
///
/// `discounted <= original` is usual but not guaranteed by the source markup;
/// values are passed through as scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub original: i64,
    pub discount_percent: i32,
    pub discounted: i64,
}

impl Price {
    /// Returns `true` when the discounted price exceeds the original price.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.discounted > self.original
    }
}

impl ProductRecord {
    /// The natural key used for de-duplication in the store.
    #[must_use]
    pub fn natural_key(&self) -> (&str, &str) {
        (self.brand.as_str(), self.name.as_str())
    }
}
