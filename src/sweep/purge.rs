use std::collections::HashMap;

use log::{debug, info, warn};

use crate::{
    gmail::{MailSession, ProviderError, Query},
    mailbox::{MessageSummary, SUMMARY_HEADERS},
    sweep::{BATCH_CEILING, MutateOp, MutationSummary, Pacer, mutate},
};

const PURGE_PAGE_SIZE: u32 = 500;
const TOP_SENDERS: usize = 10;
const SAMPLE_SUBJECTS: usize = 5;
const SUBJECT_PREVIEW_CHARS: usize = 80;

/// Governs whether a mass operation mutates the mailbox or only reports.
#[derive(Debug, Clone, Copy)]
pub struct Mode {
    pub dry_run: bool,
    pub sample_size: u32,
    pub hard_limit: Option<u64>,
}

/// Findings of a dry run. `error` flags a sample that ended early.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub total_sampled: usize,
    pub top_senders: Vec<(String, u64)>,
    pub sample_subjects: Vec<String>,
    pub error: Option<ProviderError>,
}

#[derive(Debug)]
pub enum PurgeOutput {
    Analysis(Report),
    Purged(MutationSummary),
}

/// Runs a mass operation over everything the query matches.
///
/// Dry runs are cheap by construction: one listing call bounded by the
/// sample size and no mutation whatsoever. Live runs stream: each page is
/// fetched and mutated before the next one is requested, so the whole id
/// set is never held in memory. Either way the outcome carries everything
/// learned or done before any early termination.
pub async fn purge(
    session: &impl MailSession,
    query: &Query,
    op: MutateOp,
    mode: Mode,
    pacer: &impl Pacer,
) -> PurgeOutput {
    if mode.dry_run {
        PurgeOutput::Analysis(analyze(session, query, mode.sample_size).await)
    } else {
        PurgeOutput::Purged(drain(session, query, op, mode.hard_limit, pacer).await)
    }
}

async fn analyze(session: &impl MailSession, query: &Query, sample_size: u32) -> Report {
    let mut report = Report::default();

    let page = match session.list_messages(query, None, sample_size).await {
        Ok(page) => page,
        Err(error) => {
            report.error = Some(error);
            return report;
        }
    };
    debug!(
        sampled = page.refs.len(),
        estimated = page.result_size_estimate.unwrap_or_default();
        "analyzing sample"
    );

    let mut tally = SenderTally::default();
    for message_ref in page.refs.iter().take(sample_size as usize) {
        let metadata = match session
            .message_metadata(message_ref.id(), &SUMMARY_HEADERS)
            .await
        {
            Ok(metadata) => metadata,
            Err(ProviderError::NotFound(id)) => {
                debug!("sampled message {id} disappeared mid-analysis");
                continue;
            }
            Err(error) => {
                report.error = Some(error);
                break;
            }
        };

        let summary = MessageSummary::from_metadata(&metadata);
        tally.note(summary.sender());
        if report.sample_subjects.len() < SAMPLE_SUBJECTS {
            report.sample_subjects.push(subject_preview(&summary));
        }
        report.total_sampled += 1;
    }

    report.top_senders = tally.top(TOP_SENDERS);
    report
}

async fn drain(
    session: &impl MailSession,
    query: &Query,
    op: MutateOp,
    hard_limit: Option<u64>,
    pacer: &impl Pacer,
) -> MutationSummary {
    let mut summary = MutationSummary::default();

    loop {
        let attempted = summary.result.attempted() as u64;
        let remaining = hard_limit.map(|limit| limit.saturating_sub(attempted));
        if remaining == Some(0) {
            info!("stopping at the requested limit of {attempted} messages");
            break;
        }
        let page_size =
            remaining.map_or(PURGE_PAGE_SIZE, |left| {
                u32::try_from(left.min(u64::from(PURGE_PAGE_SIZE))).unwrap_or(PURGE_PAGE_SIZE)
            });

        // Mutation invalidates continuation tokens, so every cycle re-lists
        // from the front of the query. The shrinking result set is what
        // advances the loop.
        let page = match session.list_messages(query, None, page_size).await {
            Ok(page) => page,
            Err(error) => {
                summary.error = Some(error);
                break;
            }
        };
        if page.refs.is_empty() {
            break;
        }

        let mut ids: Vec<String> = page
            .refs
            .into_iter()
            .map(crate::mailbox::MessageRef::into_id)
            .filter(|id| !id.is_empty())
            .collect();
        if let Some(left) = remaining {
            ids.truncate(usize::try_from(left).unwrap_or(usize::MAX));
        }
        if ids.is_empty() {
            break;
        }

        let succeeded_before = summary.result.succeeded();
        match mutate(session, &ids, op, BATCH_CEILING, pacer).await {
            Ok(batch) => summary.result.absorb(batch),
            Err(aborted) => {
                summary.result.absorb(aborted.partial);
                summary.error = Some(aborted.source);
                break;
            }
        }

        if summary.result.succeeded() == succeeded_before {
            // Refetching would return the same page that just failed.
            warn!("no message on this page could be removed; stopping");
            if summary.error.is_none() {
                summary.error = Some(ProviderError::Transient(
                    "page produced no successful mutations".to_string(),
                ));
            }
            break;
        }

        if page.next_cursor.is_none() {
            break;
        }
        pacer.pause().await;
    }

    summary
}

fn subject_preview(summary: &MessageSummary) -> String {
    format!("{} (from {})", summary.subject(), summary.sender())
        .chars()
        .take(SUBJECT_PREVIEW_CHARS)
        .collect()
}

/// Counts messages per sender, ranking by frequency with ties broken by
/// first-seen order.
#[derive(Default)]
struct SenderTally {
    counts: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl SenderTally {
    fn note(&mut self, sender: &str) {
        if let Some(&position) = self.index.get(sender) {
            self.counts[position].1 += 1;
        } else {
            self.index.insert(sender.to_string(), self.counts.len());
            self.counts.push((sender.to_string(), 1));
        }
    }

    fn top(mut self, limit: usize) -> Vec<(String, u64)> {
        // stable sort keeps first-seen order among equal counts
        self.counts.sort_by(|left, right| right.1.cmp(&left.1));
        self.counts.truncate(limit);
        self.counts
    }
}
