pub mod client;
pub mod error;
pub mod extract;
pub mod page;
pub mod parse;
pub mod selectors;

pub use client::CatalogClient;
pub use error::ScraperError;
pub use extract::{extract_fragment, extract_record, ExtractError};
pub use page::item_fragments;
pub use parse::{
    normalize_reviews_text, parse_discount_percent, parse_price, parse_reviews_count,
    MalformedNumber, ReviewsText,
};
pub use selectors::CatalogSelectors;
