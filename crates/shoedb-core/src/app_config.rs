use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    pub catalog_base_url: String,
    pub total_pages: u32,
    pub page_delay_ms: u64,
    pub selectors_path: Option<PathBuf>,
    pub max_concurrent_items: usize,
    pub writer_queue_depth: usize,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub db_max_retries: u32,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("catalog_base_url", &self.catalog_base_url)
            .field("total_pages", &self.total_pages)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("selectors_path", &self.selectors_path)
            .field("max_concurrent_items", &self.max_concurrent_items)
            .field("writer_queue_depth", &self.writer_queue_depth)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("db_max_retries", &self.db_max_retries)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_secs",
                &self.scraper_retry_backoff_base_secs,
            )
            .finish()
    }
}
