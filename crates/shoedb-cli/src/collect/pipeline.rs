//! Page loop, bounded item fan-out, and drain.
//!
//! Pages are fetched strictly in order with a fixed pause between them. Every
//! item on a fetched page is extracted on its own task, bounded by a
//! semaphore. Failures at any level are logged and counted; none of them stop
//! the run. Cancellation stops the page loop, but everything already
//! dispatched is still drained and persisted before the store is closed.

use std::sync::Arc;
use std::time::Duration;

use shoedb_scraper::{extract_fragment, item_fragments, CatalogClient, CatalogSelectors};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::sink::{spawn_writer, RecordStore, SinkHandle};

/// Knobs for one pipeline run.
#[derive(Debug, Clone)]
pub(crate) struct PipelineSettings {
    pub(crate) catalog_base_url: String,
    pub(crate) total_pages: u32,
    pub(crate) page_delay: Duration,
    pub(crate) max_concurrent_items: usize,
    pub(crate) writer_queue_depth: usize,
    pub(crate) db_max_retries: u32,
}

/// Counters for a finished run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunReport {
    pub(crate) pages_fetched: u64,
    pub(crate) pages_failed: u64,
    pub(crate) items_dispatched: u64,
    pub(crate) extraction_failures: u64,
    pub(crate) inserted: u64,
    pub(crate) duplicates: u64,
    pub(crate) insert_failures: u64,
    pub(crate) cancelled: bool,
}

enum ItemOutcome {
    Submitted,
    Rejected,
    SinkClosed,
}

/// Runs the pipeline to completion against `store`.
///
/// # Errors
///
/// Returns an error only if the writer task panics. Per-page, per-item, and
/// per-insert failures are counted in the [`RunReport`].
pub(crate) async fn run_pipeline<S: RecordStore>(
    store: S,
    client: &CatalogClient,
    selectors: Arc<CatalogSelectors>,
    settings: &PipelineSettings,
    cancel: &CancellationToken,
) -> anyhow::Result<RunReport> {
    let (sink, writer) = spawn_writer(store, settings.writer_queue_depth, settings.db_max_retries);
    let semaphore = Arc::new(Semaphore::new(settings.max_concurrent_items));
    let mut tasks: JoinSet<ItemOutcome> = JoinSet::new();
    let mut report = RunReport::default();

    for page in 1..=settings.total_pages {
        if cancel.is_cancelled() {
            tracing::warn!(page, "run cancelled; not fetching remaining pages");
            report.cancelled = true;
            break;
        }

        let url = match CatalogClient::page_url(&settings.catalog_base_url, page) {
            Ok(url) => url,
            Err(e) => {
                report.pages_failed += 1;
                tracing::error!(page, error = %e, "cannot build page URL");
                continue;
            }
        };

        tracing::info!(page, url = %url, "fetching catalog page");
        match client.fetch_page(&url).await {
            Ok(body) => {
                report.pages_fetched += 1;
                let fragments = item_fragments(&body, &selectors);
                tracing::debug!(page, items = fragments.len(), "page parsed");

                for fragment in fragments {
                    let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                        break;
                    };
                    tasks.spawn(extract_item(
                        page,
                        fragment,
                        Arc::clone(&selectors),
                        sink.clone(),
                        permit,
                    ));
                    report.items_dispatched += 1;

                    while let Some(joined) = tasks.try_join_next() {
                        tally(&mut report, joined);
                    }
                }
            }
            Err(e) => {
                report.pages_failed += 1;
                tracing::error!(page, url = %url, error = %e, "page fetch failed; moving on");
            }
        }

        if page < settings.total_pages {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(settings.page_delay) => {}
            }
        }
    }

    tracing::debug!(in_flight = tasks.len(), "draining extraction tasks");
    while let Some(joined) = tasks.join_next().await {
        tally(&mut report, joined);
    }

    drop(sink);
    let summary = writer
        .await
        .map_err(|e| anyhow::anyhow!("record writer task failed: {e}"))?;
    report.inserted = summary.inserted;
    report.duplicates = summary.duplicates;
    report.insert_failures += summary.failed;

    tracing::info!(
        pages_fetched = report.pages_fetched,
        pages_failed = report.pages_failed,
        items_dispatched = report.items_dispatched,
        extraction_failures = report.extraction_failures,
        inserted = report.inserted,
        duplicates = report.duplicates,
        insert_failures = report.insert_failures,
        cancelled = report.cancelled,
        "collection run finished"
    );

    Ok(report)
}

async fn extract_item(
    page: u32,
    fragment: String,
    selectors: Arc<CatalogSelectors>,
    sink: SinkHandle,
    _permit: OwnedSemaphorePermit,
) -> ItemOutcome {
    let record = match extract_fragment(&fragment, &selectors) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(
                page,
                field = e.field(),
                raw = %e.raw(),
                error = %e,
                "item extraction failed; skipping item"
            );
            return ItemOutcome::Rejected;
        }
    };

    tracing::info!(
        page,
        brand = %record.brand,
        name = %record.name,
        original = record.price.original,
        discount_percent = record.price.discount_percent,
        discounted = record.price.discounted,
        reviews_count = record.reviews_count,
        promotions = ?record.promotions,
        "extracted record"
    );

    if sink.submit(record).await {
        ItemOutcome::Submitted
    } else {
        tracing::error!(page, "record writer stopped; record dropped");
        ItemOutcome::SinkClosed
    }
}

fn tally(report: &mut RunReport, joined: Result<ItemOutcome, tokio::task::JoinError>) {
    match joined {
        Ok(ItemOutcome::Submitted) => {}
        Ok(ItemOutcome::Rejected) => report.extraction_failures += 1,
        Ok(ItemOutcome::SinkClosed) => report.insert_failures += 1,
        Err(e) => {
            report.extraction_failures += 1;
            tracing::error!(error = %e, "extraction task panicked");
        }
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
