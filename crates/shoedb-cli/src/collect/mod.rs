//! `collect` command: scrape every catalog page and store the records.
//!
//! Called from `main` after configuration is loaded. Store connection and
//! migrations happen here before the first page is requested; failing either
//! aborts the command.

mod pipeline;
mod sink;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use shoedb_core::{load_selectors, AppConfig, SelectorConfig};
use shoedb_scraper::{CatalogClient, CatalogSelectors};
use tokio_util::sync::CancellationToken;

use pipeline::{run_pipeline, PipelineSettings, RunReport};
use sink::{DryRunStore, PgStore};

/// Command-line overrides for a collect run.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CollectOptions {
    pub(crate) total_pages: Option<u32>,
    pub(crate) page_delay_ms: Option<u64>,
    pub(crate) dry_run: bool,
}

/// Runs the collect command.
///
/// # Errors
///
/// Returns an error if the selectors cannot be loaded or compiled, the HTTP
/// client cannot be built, or (outside dry-run) the store cannot be reached or
/// migrated. Failures after that point are logged and counted only.
pub(crate) async fn run_collect(
    config: &AppConfig,
    options: CollectOptions,
    cancel: &CancellationToken,
) -> anyhow::Result<RunReport> {
    let selectors = Arc::new(load_catalog_selectors(config)?);
    let client = CatalogClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_secs,
    )
    .context("failed to build catalog HTTP client")?;
    let settings = pipeline_settings(config, options);

    tracing::info!(
        catalog_base_url = %settings.catalog_base_url,
        total_pages = settings.total_pages,
        page_delay_ms = settings.page_delay.as_millis(),
        max_concurrent_items = settings.max_concurrent_items,
        dry_run = options.dry_run,
        "starting collection run"
    );

    if options.dry_run {
        return run_pipeline(DryRunStore, &client, selectors, &settings, cancel).await;
    }

    let pool_config = shoedb_db::PoolConfig::from_app_config(config);
    let pool = shoedb_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("store unavailable: cannot connect to database")?;
    let applied = shoedb_db::run_migrations(&pool)
        .await
        .context("store unavailable: migrations failed")?;
    if applied > 0 {
        tracing::info!(applied, "applied pending migrations");
    }

    run_pipeline(PgStore::new(pool), &client, selectors, &settings, cancel).await
}

fn load_catalog_selectors(config: &AppConfig) -> anyhow::Result<CatalogSelectors> {
    let selector_config = match &config.selectors_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading selector overrides");
            load_selectors(path)?
        }
        None => SelectorConfig::default(),
    };
    Ok(CatalogSelectors::compile(&selector_config)?)
}

fn pipeline_settings(config: &AppConfig, options: CollectOptions) -> PipelineSettings {
    PipelineSettings {
        catalog_base_url: config.catalog_base_url.clone(),
        total_pages: options.total_pages.unwrap_or(config.total_pages),
        page_delay: Duration::from_millis(options.page_delay_ms.unwrap_or(config.page_delay_ms)),
        max_concurrent_items: config.max_concurrent_items,
        writer_queue_depth: config.writer_queue_depth,
        db_max_retries: config.db_max_retries,
    }
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
