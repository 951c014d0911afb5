//! Single-writer persistence sink.
//!
//! One task owns the store and drains a bounded queue of records, so at most
//! one insert is in flight at any time. Extraction workers hold a cloned
//! [`SinkHandle`]; once every handle is dropped the writer finishes the queue,
//! closes the store, and returns its tallies.

use std::future::Future;

use shoedb_core::{retry_with_backoff, ProductRecord};
use shoedb_db::{DbError, InsertOutcome};
use sqlx::PgPool;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const DB_RETRY_BACKOFF_BASE_SECS: u64 = 1;

/// Destination for extracted records.
pub(crate) trait RecordStore: Send + Sync + 'static {
    fn insert(
        &self,
        record: &ProductRecord,
    ) -> impl Future<Output = Result<InsertOutcome, DbError>> + Send;

    /// Releases the underlying connection. Called once, after the last insert.
    fn close(self) -> impl Future<Output = ()> + Send
    where
        Self: Sized;
}

/// Writes records to `shoe_shop.shoes`.
pub(crate) struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl RecordStore for PgStore {
    async fn insert(&self, record: &ProductRecord) -> Result<InsertOutcome, DbError> {
        shoedb_db::insert_shoe(&self.pool, record).await
    }

    async fn close(self) {
        self.pool.close().await;
    }
}

/// Logs records instead of writing them. Used by `collect --dry-run`.
pub(crate) struct DryRunStore;

impl RecordStore for DryRunStore {
    async fn insert(&self, record: &ProductRecord) -> Result<InsertOutcome, DbError> {
        tracing::info!(
            brand = %record.brand,
            name = %record.name,
            "dry-run: would insert record"
        );
        Ok(InsertOutcome::Inserted { id: 0 })
    }

    async fn close(self) {}
}

/// Per-run writer tallies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SinkSummary {
    pub(crate) inserted: u64,
    pub(crate) duplicates: u64,
    pub(crate) failed: u64,
}

/// Cloneable producer side of the writer queue.
#[derive(Clone)]
pub(crate) struct SinkHandle {
    tx: mpsc::Sender<ProductRecord>,
}

impl SinkHandle {
    /// Queues `record` for insertion, waiting while the queue is full.
    ///
    /// Returns `false` if the writer has already stopped.
    pub(crate) async fn submit(&self, record: ProductRecord) -> bool {
        self.tx.send(record).await.is_ok()
    }
}

/// Spawns the writer task for `store`.
///
/// `max_retries` additional attempts are made for transient insert failures;
/// anything still failing is logged and counted, never propagated.
pub(crate) fn spawn_writer<S: RecordStore>(
    store: S,
    queue_depth: usize,
    max_retries: u32,
) -> (SinkHandle, JoinHandle<SinkSummary>) {
    let (tx, rx) = mpsc::channel(queue_depth);
    let writer = tokio::spawn(run_writer(store, rx, max_retries));
    (SinkHandle { tx }, writer)
}

async fn run_writer<S: RecordStore>(
    store: S,
    mut rx: mpsc::Receiver<ProductRecord>,
    max_retries: u32,
) -> SinkSummary {
    let mut summary = SinkSummary::default();

    while let Some(record) = rx.recv().await {
        let result = retry_with_backoff(
            max_retries,
            DB_RETRY_BACKOFF_BASE_SECS,
            DbError::is_transient,
            || store.insert(&record),
        )
        .await;

        match result {
            Ok(InsertOutcome::Inserted { id }) => {
                summary.inserted += 1;
                tracing::debug!(id, brand = %record.brand, name = %record.name, "record stored");
            }
            Ok(InsertOutcome::Duplicate) => {
                summary.duplicates += 1;
                tracing::info!(
                    brand = %record.brand,
                    name = %record.name,
                    "record already stored; skipping"
                );
            }
            Err(e) => {
                summary.failed += 1;
                tracing::error!(
                    brand = %record.brand,
                    name = %record.name,
                    error = %e,
                    "failed to store record"
                );
            }
        }
    }

    store.close().await;
    summary
}
