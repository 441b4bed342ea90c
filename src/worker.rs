//! Deadline-bounded batch execution
//!
//! The engine has no internal cancellation. Callers that need to abandon
//! superseded searches run the batch on the blocking pool and race it
//! against a timer; a late result is simply dropped.

use crate::error::SearchError;
use crate::note::Note;
use crate::search::{BatchProcessor, BatchResult, HighlightOptions};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Run a batch search on tokio's blocking pool, giving up after `deadline`
pub async fn process_with_deadline(
    notes: Arc<[Note]>,
    query: String,
    options: HighlightOptions,
    deadline: Duration,
) -> Result<BatchResult, SearchError> {
    options.validate()?;

    let started = Instant::now();
    let task = tokio::task::spawn_blocking(move || {
        BatchProcessor::new().process(&notes, &query, &options)
    });

    match timeout(deadline, task).await {
        Ok(joined) => {
            let result = joined?;
            debug!("Batch finished in {:?}", started.elapsed());
            Ok(result)
        }
        Err(_) => {
            warn!("Batch abandoned after {:?}", deadline);
            Err(SearchError::Timeout(deadline))
        }
    }
}
