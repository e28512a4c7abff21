use crate::{Client, Comment, Error};
use tokio::task::JoinHandle;

/// Hard ceiling on concurrent deletion workers, shared with the HTTP
/// connection pool sizing.
pub(crate) const MAX_WORKERS: usize = 50;

/// Outcome of one deletion attempt.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeleteOutcome {
    /// The comment was deleted (moved to the trash, or erased when forced).
    Deleted,
    /// The comment was already gone. Counts as success: the goal is an empty
    /// moderation queue, and this makes re-runs idempotent.
    AlreadyGone,
    /// The deletion failed, with the status and error body as the reason.
    Failed(String),
}

/// Settings for one sweep run.
#[derive(Clone, Debug)]
pub struct SweepConfig {
    /// Comments requested per page. The API caps this at 100.
    pub page_size: u32,
    /// Concurrent deletion workers. `None` derives a default from available
    /// parallelism; either way the count is clamped to `1..=50` and never
    /// exceeds the number of comments on the page.
    pub workers: Option<usize>,
    /// Skip the trash and erase comments permanently.
    pub force: bool,
}

impl Default for SweepConfig {
    fn default() -> SweepConfig {
        SweepConfig {
            page_size: 100,
            workers: None,
            force: false,
        }
    }
}

/// Totals for one sweep run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SweepReport {
    /// Comments deleted, or already gone when we got to them.
    pub succeeded: u64,
    /// Comments that could not be deleted. Re-running is safe.
    pub failed: u64,
}

/// Drives the sweep: fetches pages of pending comments and fans deletions out
/// to a bounded set of concurrent workers, tallying outcomes as they land.
#[derive(Clone, Debug)]
pub struct Sweeper {
    client: Client,
    config: SweepConfig,
}

impl Sweeper {
    /// Creates a sweeper over `client` with the given settings.
    #[must_use]
    pub fn new(client: Client, config: SweepConfig) -> Sweeper {
        Sweeper { client, config }
    }

    /// Deletes every pending comment the API hands out, page by page.
    ///
    /// Individual deletion failures are tallied and logged, never fatal. Only
    /// a fetch the retry policy cannot recover from ends the run early, and
    /// re-running after that is safe since already-deleted comments count as
    /// success.
    ///
    /// When a page past the first comes back empty, the sweep restarts from
    /// page 1: deletions shift the surviving comments toward the front of the
    /// collection, so a later page going empty does not prove the queue is
    /// drained. Restarts are bounded by
    /// [`RetryPolicy::max_restarts`](crate::RetryPolicy::max_restarts), so
    /// the loop always terminates.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> Result<SweepReport, Error> {
        let mut report = SweepReport::default();
        let mut page = 1;
        let mut restarts = 0;

        loop {
            let comments = self.client.fetch_page(page, self.config.page_size).await?;

            if comments.is_empty() {
                if page == 1 {
                    break;
                }
                let policy = self.client.retry_policy();
                if restarts >= policy.max_restarts {
                    tracing::warn!(restarts, "restart budget exhausted, stopping the sweep");
                    break;
                }
                restarts += 1;
                tracing::info!(page, restarts, "page came back empty, restarting from page 1");
                tokio::time::sleep(policy.initial_delay).await;
                page = 1;
                continue;
            }

            let (succeeded, failed) = self.delete_page(comments).await;
            report.succeeded += succeeded;
            report.failed += failed;
            page += 1;
        }

        tracing::info!(
            succeeded = report.succeeded,
            failed = report.failed,
            "sweep finished"
        );
        Ok(report)
    }

    /// Deletes one page of comments, returning its (succeeded, failed)
    /// subtotals.
    ///
    /// The page is split into one chunk per worker; each chunk runs on its
    /// own task and works through its comments sequentially. The workers
    /// share nothing but the HTTP client: subtotals are folded in here, on
    /// the coordinator, after the tasks join. A panicked task counts its
    /// whole chunk as failed and the page still completes.
    async fn delete_page(&self, comments: Vec<Comment>) -> (u64, u64) {
        let workers = worker_count(comments.len(), self.config.workers);
        let chunk_size = comments.len().div_ceil(workers);
        tracing::debug!(comments = comments.len(), workers, chunk_size, "deleting page");

        let mut lens = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);
        for chunk in comments.chunks(chunk_size) {
            let client = self.client.clone();
            let chunk = chunk.to_vec();
            let force = self.config.force;
            lens.push(chunk.len() as u64);
            handles.push(tokio::spawn(async move {
                delete_chunk(&client, chunk, force).await
            }));
        }

        join_chunks(lens, handles).await
    }
}

/// Joins the chunk tasks of one page and folds their subtotals. A task that
/// panicked or was aborted counts its whole chunk as failed; the rest of the
/// page is unaffected.
async fn join_chunks(lens: Vec<u64>, handles: Vec<JoinHandle<(u64, u64)>>) -> (u64, u64) {
    let mut succeeded = 0;
    let mut failed = 0;
    for (len, joined) in lens.into_iter().zip(futures::future::join_all(handles).await) {
        match joined {
            Ok((ok, bad)) => {
                succeeded += ok;
                failed += bad;
            }
            Err(e) => {
                tracing::error!(error = %e, "deletion task panicked, counting its chunk as failed");
                failed += len;
            }
        }
    }
    (succeeded, failed)
}

/// Deletes one chunk of comments sequentially, returning its subtotals.
async fn delete_chunk(client: &Client, chunk: Vec<Comment>, force: bool) -> (u64, u64) {
    let mut succeeded = 0;
    let mut failed = 0;
    for comment in chunk {
        match client.delete_comment(comment.id, force).await {
            DeleteOutcome::Deleted => {
                tracing::info!(id = %comment.id, author = %comment.author_name, "deleted");
                succeeded += 1;
            }
            DeleteOutcome::AlreadyGone => {
                tracing::info!(id = %comment.id, "already gone");
                succeeded += 1;
            }
            DeleteOutcome::Failed(reason) => {
                tracing::warn!(id = %comment.id, %reason, "delete failed");
                failed += 1;
            }
        }
    }
    (succeeded, failed)
}

/// Worker count for a page: the override or a parallelism-derived default,
/// clamped to `1..=MAX_WORKERS` and to the number of comments.
fn worker_count(comments: usize, requested: Option<usize>) -> usize {
    let base = requested
        .unwrap_or_else(|| std::thread::available_parallelism().map_or(4, |n| n.get() * 4));
    base.clamp(1, MAX_WORKERS).min(comments).max(1)
}
