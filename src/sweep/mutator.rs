use std::collections::HashSet;

use derive_getters::Getters;
use log::{debug, warn};
use thiserror::Error;

use crate::{
    gmail::{MailSession, ProviderError},
    sweep::Pacer,
};

/// The provider's documented ceiling on ids per bulk mutation call.
pub const BATCH_CEILING: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutateOp {
    Delete,
    Trash,
}

/// Aggregated outcome of a batched mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct BatchResult {
    attempted: usize,
    succeeded: usize,
    failed_ids: HashSet<String>,
}

impl BatchResult {
    pub fn is_complete(&self) -> bool {
        self.failed_ids.is_empty()
    }

    pub fn absorb(&mut self, other: BatchResult) {
        self.attempted += other.attempted;
        self.succeeded += other.succeeded;
        self.failed_ids.extend(other.failed_ids);
    }

    fn note_succeeded(&mut self, ids: &[String]) {
        self.attempted += ids.len();
        self.succeeded += ids.len();
    }

    fn note_failed(&mut self, ids: &[String]) {
        self.attempted += ids.len();
        self.failed_ids.extend(ids.iter().cloned());
    }
}

/// A mutation cut short by an authentication failure, with the progress made
/// up to that point attached.
#[derive(Debug, Error)]
#[error("mutation aborted on batch {batch}: {source}")]
pub struct MutateAborted {
    pub batch: usize,
    pub partial: BatchResult,
    pub source: ProviderError,
}

/// A mutation result paired with the error that ended it early, if any.
/// Counts are authoritative for what was actually issued.
#[derive(Debug, Clone, Default)]
pub struct MutationSummary {
    pub result: BatchResult,
    pub error: Option<ProviderError>,
}

/// Issues `op` over `ids` in bounded batches, sequentially.
///
/// A failed batch records all of its ids and processing continues with the
/// next one: another session may have removed messages already, and one bad
/// batch must not strand the rest. Authentication failure is the exception:
/// it invalidates everything that would follow, so the run aborts with
/// partial progress attached. Never retries; retrying a delete is a caller
/// decision.
pub async fn mutate(
    session: &impl MailSession,
    ids: &[String],
    op: MutateOp,
    batch_size: usize,
    pacer: &impl Pacer,
) -> Result<BatchResult, MutateAborted> {
    let batch_size = batch_size.clamp(1, BATCH_CEILING);
    let mut result = BatchResult::default();

    for (batch, chunk) in ids.chunks(batch_size).enumerate() {
        if batch > 0 {
            pacer.pause().await;
        }

        let outcome = match op {
            MutateOp::Delete => session.batch_delete(chunk).await,
            MutateOp::Trash => session.batch_trash(chunk).await,
        };

        match outcome {
            Ok(()) => {
                result.note_succeeded(chunk);
                debug!(batch, size = chunk.len(); "batch mutation succeeded");
            }
            Err(source) if source.is_fatal() => {
                result.note_failed(chunk);
                return Err(MutateAborted {
                    batch,
                    partial: result,
                    source,
                });
            }
            Err(source) => {
                warn!("batch {batch} of {} ids failed: {source}", chunk.len());
                result.note_failed(chunk);
            }
        }
    }

    Ok(result)
}
