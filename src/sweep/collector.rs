use log::{debug, warn};
use thiserror::Error;

use crate::{
    gmail::{MailSession, ProviderError, Query},
    mailbox::MessageRef,
    sweep::Pacer,
};

/// A listing failure with the page it happened on.
///
/// Carries no partial results on purpose: a truncated collection must never
/// be mistaken for the whole mailbox.
#[derive(Debug, Error)]
#[error("listing aborted on page {page}: {source}")]
pub struct CollectError {
    pub page: usize,
    pub source: ProviderError,
}

/// Walks the paginated message index and accumulates lightweight refs.
///
/// Follows continuation cursors until the provider runs out of pages or the
/// accumulated count reaches `hard_cap`; the remote index can be unbounded,
/// so the cap is mandatory. Records without an id are discarded. Each call
/// re-queries from scratch; there is no resumption.
pub async fn collect(
    session: &impl MailSession,
    query: &Query,
    page_size: u32,
    hard_cap: usize,
    pacer: &impl Pacer,
) -> Result<Vec<MessageRef>, CollectError> {
    if hard_cap == 0 {
        return Ok(Vec::new());
    }

    let mut refs = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page = 0usize;

    loop {
        let listed = session
            .list_messages(query, cursor.as_deref(), page_size)
            .await
            .map_err(|source| CollectError { page, source })?;
        debug!(page, fetched = listed.refs.len(); "collected listing page");

        for message_ref in listed.refs {
            if message_ref.id().is_empty() {
                warn!("discarding listed record without id");
                continue;
            }
            refs.push(message_ref);
            if refs.len() >= hard_cap {
                debug!("listing stopped at hard cap of {hard_cap}");
                return Ok(refs);
            }
        }

        match listed.next_cursor {
            None => return Ok(refs),
            Some(next) => {
                cursor = Some(next);
                page += 1;
                pacer.pause().await;
            }
        }
    }
}
