//! Caller-facing mailbox operations.
//!
//! Every operation takes the session explicitly and validates its input
//! before issuing any remote call.

use jiff::{Span, Zoned, civil::Date};
use log::{debug, error, info};
use thiserror::Error;

use crate::{
    gmail::{Category, MailSession, ProviderError, Query, QueryBuilder},
    mailbox::{MessageRef, MessageSummary, SUMMARY_HEADERS},
    sweep::{
        BATCH_CEILING, CollectError, Mode, MutateOp, MutationSummary, Pacer, PurgeOutput, collect,
        mutate, purge, select_oldest,
    },
};

const SCAN_PAGE_SIZE: u32 = 100;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Listing(#[from] CollectError),
}

/// Parameters of a mass delete/trash over one year and category.
#[derive(Debug, Clone, Copy)]
pub struct PurgeRequest {
    pub year: i16,
    pub category: Option<Category>,
    pub unread_only: bool,
    pub op: MutateOp,
    pub mode: Mode,
}

/// Fetches the mailbox profile to prove the stored credentials work.
pub async fn test_authentication(session: &impl MailSession) -> bool {
    match session.profile().await {
        Ok(profile) => {
            info!("authenticated as {}", profile.email_address());
            true
        }
        Err(err) => {
            error!("authentication check failed: {err}");
            false
        }
    }
}

/// Unread messages received within the last `days`, newest-known first as
/// listed by the provider, at most `max` of them.
pub async fn recent_unread(
    session: &impl MailSession,
    days: u32,
    max: u32,
    pacer: &impl Pacer,
) -> Result<Vec<MessageSummary>, OpError> {
    if days == 0 {
        return Err(OpError::Invalid("day window must be positive".to_string()));
    }
    if max == 0 {
        return Err(OpError::Invalid("result cap must be positive".to_string()));
    }

    let query = unread_query_builder()
        .after(days_ago(days)?)
        .build()
        .expect("query should build from defaulted fields");
    let refs = collect(session, &query, max, max as usize, pacer).await?;

    summarize(session, &refs).await
}

/// The `limit` oldest unread messages that are at least `min_age_days` old,
/// scanning at most `scan_cap` candidates.
pub async fn oldest_unread(
    session: &impl MailSession,
    limit: usize,
    min_age_days: u32,
    scan_cap: usize,
    pacer: &impl Pacer,
) -> Result<Vec<MessageSummary>, OpError> {
    if limit == 0 {
        return Err(OpError::Invalid("limit must be positive".to_string()));
    }
    if scan_cap < limit {
        return Err(OpError::Invalid(
            "scan cap must be at least the requested limit".to_string(),
        ));
    }

    let query = aged_unread_query(min_age_days)?;
    let refs = collect(session, &query, SCAN_PAGE_SIZE, scan_cap, pacer).await?;
    debug!("scanned {} unread candidates", refs.len());
    let oldest = select_oldest(refs, limit);

    summarize(session, &oldest).await
}

/// How many unread messages older than `days` a delete would touch, bounded
/// by `scan_cap`. The preview counterpart of [`delete_older_than`].
pub async fn count_older_than(
    session: &impl MailSession,
    days: u32,
    scan_cap: usize,
    pacer: &impl Pacer,
) -> Result<usize, OpError> {
    if days == 0 {
        return Err(OpError::Invalid("age must be positive".to_string()));
    }
    if scan_cap == 0 {
        return Err(OpError::Invalid("scan cap must be positive".to_string()));
    }

    let query = aged_unread_query(days)?;
    let refs = collect(session, &query, SCAN_PAGE_SIZE, scan_cap, pacer).await?;

    Ok(refs.len())
}

/// Removes unread messages older than `days`. The age threshold is always
/// caller-supplied; there is no assumed default.
pub async fn delete_older_than(
    session: &impl MailSession,
    days: u32,
    op: MutateOp,
    scan_cap: usize,
    pacer: &impl Pacer,
) -> Result<MutationSummary, OpError> {
    if days == 0 {
        return Err(OpError::Invalid("age must be positive".to_string()));
    }
    if scan_cap == 0 {
        return Err(OpError::Invalid("scan cap must be positive".to_string()));
    }

    let query = aged_unread_query(days)?;
    let refs = collect(session, &query, SCAN_PAGE_SIZE, scan_cap, pacer).await?;
    let ids: Vec<String> = refs.into_iter().map(MessageRef::into_id).collect();

    Ok(run_mutation(session, &ids, op, pacer).await)
}

/// Mass delete/trash by year and category, streaming or dry-run.
pub async fn mass_purge(
    session: &impl MailSession,
    request: PurgeRequest,
    pacer: &impl Pacer,
) -> Result<PurgeOutput, OpError> {
    if !(1970..=9998).contains(&request.year) {
        return Err(OpError::Invalid(format!(
            "year {} outside supported range",
            request.year
        )));
    }
    if request.mode.dry_run && request.mode.sample_size == 0 {
        return Err(OpError::Invalid(
            "dry-run sample size must be positive".to_string(),
        ));
    }
    if request.mode.hard_limit == Some(0) {
        return Err(OpError::Invalid("limit must be positive".to_string()));
    }

    let after = year_start(request.year)?;
    let before = year_start(request.year + 1)?;
    let mut builder = QueryBuilder::default();
    builder
        .unread_only(request.unread_only)
        .after(after)
        .before(before);
    if let Some(category) = request.category {
        builder.category(category);
    }
    let query = builder
        .build()
        .expect("query should build from defaulted fields");

    Ok(purge(session, &query, request.op, request.mode, pacer).await)
}

/// Deletes one message by id.
pub async fn delete_message(session: &impl MailSession, id: &str) -> Result<(), OpError> {
    if id.is_empty() {
        return Err(OpError::Invalid("message id must not be empty".to_string()));
    }

    session.delete_message(id).await?;
    info!("deleted message {id}");

    Ok(())
}

/// Deletes or trashes an explicit id list through the batch mutator.
pub async fn delete_batch(
    session: &impl MailSession,
    ids: &[String],
    op: MutateOp,
    pacer: &impl Pacer,
) -> Result<MutationSummary, OpError> {
    if ids.is_empty() {
        return Err(OpError::Invalid("id list must not be empty".to_string()));
    }
    if ids.iter().any(String::is_empty) {
        return Err(OpError::Invalid("message ids must not be empty".to_string()));
    }

    Ok(run_mutation(session, ids, op, pacer).await)
}

async fn run_mutation(
    session: &impl MailSession,
    ids: &[String],
    op: MutateOp,
    pacer: &impl Pacer,
) -> MutationSummary {
    match mutate(session, ids, op, BATCH_CEILING, pacer).await {
        Ok(result) => MutationSummary {
            result,
            error: None,
        },
        Err(aborted) => MutationSummary {
            result: aborted.partial,
            error: Some(aborted.source),
        },
    }
}

async fn summarize(
    session: &impl MailSession,
    refs: &[MessageRef],
) -> Result<Vec<MessageSummary>, OpError> {
    let mut summaries = Vec::with_capacity(refs.len());
    for message_ref in refs {
        match session
            .message_metadata(message_ref.id(), &SUMMARY_HEADERS)
            .await
        {
            Ok(metadata) => summaries.push(MessageSummary::from_metadata(&metadata)),
            Err(ProviderError::NotFound(id)) => {
                debug!("message {id} disappeared before its metadata fetch");
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(summaries)
}

fn unread_query_builder() -> QueryBuilder {
    let mut builder = QueryBuilder::default();
    builder.unread_only(true);
    builder
}

fn aged_unread_query(days: u32) -> Result<Query, OpError> {
    Ok(unread_query_builder()
        .before(days_ago(days)?)
        .build()
        .expect("query should build from defaulted fields"))
}

fn days_ago(days: u32) -> Result<Date, OpError> {
    let span = Span::new()
        .try_days(i64::from(days))
        .map_err(|err| OpError::Invalid(format!("unusable day count {days}: {err}")))?;

    Zoned::now()
        .date()
        .checked_sub(span)
        .map_err(|err| OpError::Invalid(format!("day count {days} out of range: {err}")))
}

fn year_start(year: i16) -> Result<Date, OpError> {
    Date::new(year, 1, 1).map_err(|err| OpError::Invalid(format!("unusable year {year}: {err}")))
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;
    use crate::{
        gmail::{ListPage, fake::FakeSession},
        mailbox::{Header, MessageMetadata},
        sweep::NoDelay,
    };

    fn page(ids: &[(&str, i64)], next_cursor: Option<&str>) -> ListPage {
        ListPage {
            refs: ids
                .iter()
                .map(|(id, timestamp)| MessageRef::new(*id, *timestamp))
                .collect(),
            next_cursor: next_cursor.map(ToString::to_string),
            result_size_estimate: None,
        }
    }

    fn metadata(id: &str) -> MessageMetadata {
        MessageMetadata::new(
            id,
            vec![
                Header::new("Subject", format!("subject {id}")),
                Header::new("From", "someone@example.com"),
            ],
            "",
            100,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn test_validation_rejects_before_any_remote_call() {
        let session = FakeSession::default();

        assert_err!(recent_unread(&session, 0, 50, &NoDelay).await);
        assert_err!(oldest_unread(&session, 0, 365, 1000, &NoDelay).await);
        assert_err!(oldest_unread(&session, 100, 365, 10, &NoDelay).await);
        assert_err!(delete_older_than(&session, 0, MutateOp::Delete, 1000, &NoDelay).await);
        assert_err!(delete_older_than(&session, 365, MutateOp::Delete, 0, &NoDelay).await);
        assert_err!(count_older_than(&session, 365, 0, &NoDelay).await);
        assert_err!(delete_message(&session, "").await);
        assert_err!(delete_batch(&session, &[], MutateOp::Delete, &NoDelay).await);

        let log = session.log();
        assert!(log.lists.is_empty());
        assert_eq!(0, log.mutation_calls());
    }

    #[rstest]
    #[case(1969)]
    #[case(9999)]
    #[tokio::test]
    async fn test_purge_year_bounds_are_validated(#[case] year: i16) {
        let session = FakeSession::default();
        let request = PurgeRequest {
            year,
            category: None,
            unread_only: false,
            op: MutateOp::Delete,
            mode: Mode {
                dry_run: true,
                sample_size: 10,
                hard_limit: None,
            },
        };

        assert_err!(mass_purge(&session, request, &NoDelay).await);
        assert!(session.log().lists.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_purge_query_carries_year_and_category_bounds() {
        let session = FakeSession::with_pages([ListPage::default()]);
        let request = PurgeRequest {
            year: 2020,
            category: Some(Category::Promotions),
            unread_only: true,
            op: MutateOp::Delete,
            mode: Mode {
                dry_run: true,
                sample_size: 10,
                hard_limit: None,
            },
        };

        assert_ok!(mass_purge(&session, request, &NoDelay).await);

        let log = session.log();
        assert_eq!(
            "is:unread category:promotions after:2020/01/01 before:2021/01/01",
            log.lists[0].search
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_oldest_unread_selects_and_summarizes_the_oldest() {
        let mut session =
            FakeSession::with_pages([page(&[("a", 300), ("b", 100), ("c", 200)], None)]);
        for id in ["a", "b", "c"] {
            session.insert_metadata(metadata(id));
        }

        let summaries = assert_ok!(oldest_unread(&session, 2, 365, 1000, &NoDelay).await);

        let ids: Vec<&str> = summaries
            .iter()
            .map(|summary| summary.id().as_str())
            .collect();
        assert_eq!(vec!["b", "c"], ids);
        assert_eq!("subject b", summaries[0].subject());
    }

    #[rstest]
    #[tokio::test]
    async fn test_oldest_unread_tolerates_vanished_messages() {
        let mut session =
            FakeSession::with_pages([page(&[("a", 300), ("b", 100), ("c", 200)], None)]);
        session.insert_metadata(metadata("a"));
        session.insert_metadata(metadata("c"));

        let summaries = assert_ok!(oldest_unread(&session, 3, 365, 1000, &NoDelay).await);

        // "b" disappeared between collection and metadata fetch
        assert_eq!(2, summaries.len());
    }

    #[rstest]
    #[tokio::test]
    async fn test_recent_unread_queries_a_day_window() {
        let session = FakeSession::with_pages([ListPage::default()]);

        let summaries = assert_ok!(recent_unread(&session, 30, 50, &NoDelay).await);

        assert!(summaries.is_empty());
        let log = session.log();
        assert_eq!(1, log.lists.len());
        assert_eq!(50, log.lists[0].page_size);
        assert_starts_with!(log.lists[0].search, "is:unread after:");
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_older_than_collects_then_mutates() {
        let session = FakeSession::with_pages([page(&[("a", 1), ("b", 2)], None)]);

        let summary =
            assert_ok!(delete_older_than(&session, 365, MutateOp::Delete, 1000, &NoDelay).await);

        assert_eq!(2, summary.result.attempted());
        assert_eq!(2, summary.result.succeeded());
        assert!(summary.error.is_none());
        assert_starts_with!(session.log().lists[0].search, "is:unread before:");
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_batch_reports_partial_failure() {
        let mut session = FakeSession::default();
        session.fail_batch(0, ProviderError::Transient("oops".to_string()));
        let ids = vec!["a".to_string(), "b".to_string()];

        let summary = assert_ok!(delete_batch(&session, &ids, MutateOp::Delete, &NoDelay).await);

        assert_eq!(2, summary.result.attempted());
        assert_eq!(0, summary.result.succeeded());
        assert_eq!(2, summary.result.failed_ids().len());
    }

    #[rstest]
    #[tokio::test]
    async fn test_single_delete_propagates_not_found() {
        let mut session = FakeSession::default();
        session.fail_delete("gone", ProviderError::NotFound("gone".to_string()));

        let error = assert_err!(delete_message(&session, "gone").await);
        assert!(matches!(
            error,
            OpError::Provider(ProviderError::NotFound(_))
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn test_authentication_check_reports_success() {
        let session = FakeSession::default();
        assert!(test_authentication(&session).await);
    }
}
