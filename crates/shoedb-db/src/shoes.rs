//! Database operations for the `shoe_shop.shoes` table.

use chrono::{DateTime, Utc};
use shoedb_core::ProductRecord;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `shoe_shop.shoes` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShoeRow {
    pub id: i64,
    pub brand: String,
    pub name: String,
    pub price_original: i64,
    pub price_discount_percent: i32,
    pub price_discounted: i64,
    pub reviews_count: i64,
    /// Promotion badges in the order they appeared on the listing page.
    pub promotions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Result of a single insert against the natural-key constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted { id: i64 },
    /// A row with the same `(brand, name)` already exists; nothing was written.
    Duplicate,
}

/// Inserts one record.
///
/// Conflicts on `(brand, name)` are ignored rather than updated: rows are
/// written once and never modified by a later run.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_shoe(pool: &PgPool, record: &ProductRecord) -> Result<InsertOutcome, DbError> {
    let id: Option<i64> = sqlx::query_scalar::<_, i64>(
        "INSERT INTO shoe_shop.shoes \
             (brand, name, price_original, price_discount_percent, price_discounted, \
              reviews_count, promotions) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT ON CONSTRAINT shoes_natural_key DO NOTHING \
         RETURNING id",
    )
    .bind(&record.brand)
    .bind(&record.name)
    .bind(record.price.original)
    .bind(record.price.discount_percent)
    .bind(record.price.discounted)
    .bind(record.reviews_count)
    .bind(&record.promotions)
    .fetch_optional(pool)
    .await?;

    Ok(id.map_or(InsertOutcome::Duplicate, |id| InsertOutcome::Inserted { id }))
}
