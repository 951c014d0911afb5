//! Offline unit tests for shoedb-db pool configuration and row types.
//! These tests do not require a live database connection.

use shoedb_core::AppConfig;
use shoedb_db::{InsertOutcome, PoolConfig, ShoeRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        log_level: "info".to_string(),
        catalog_base_url: "https://kari.com/catalog/".to_string(),
        total_pages: 1,
        page_delay_ms: 0,
        selectors_path: None,
        max_concurrent_items: 4,
        writer_queue_depth: 16,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        db_max_retries: 0,
        scraper_request_timeout_secs: 30,
        scraper_user_agent: "ua".to_string(),
        scraper_max_retries: 0,
        scraper_retry_backoff_base_secs: 2,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`ShoeRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn shoe_row_has_expected_fields() {
    use chrono::Utc;

    let row = ShoeRow {
        id: 1_i64,
        brand: "Acme".to_string(),
        name: "Runner X".to_string(),
        price_original: 5000_i64,
        price_discount_percent: 10_i32,
        price_discounted: 4500_i64,
        reviews_count: 42_i64,
        promotions: vec!["Sale".to_string()],
        created_at: Utc::now(),
    };

    assert_eq!(row.brand, "Acme");
    assert_eq!(row.price_discounted, 4500);
    assert_eq!(row.promotions, vec!["Sale".to_string()]);
}

#[test]
fn insert_outcome_distinguishes_duplicates() {
    assert_ne!(InsertOutcome::Inserted { id: 1 }, InsertOutcome::Duplicate);
}
