use crate::mailbox::MessageRef;

/// The `limit` oldest refs by server timestamp, oldest first.
///
/// The sort is stable, so refs with equal timestamps keep their collection
/// order and repeated runs against an unchanged mailbox pick the same
/// messages. Purely local; no remote calls.
pub fn select_oldest(mut refs: Vec<MessageRef>, limit: usize) -> Vec<MessageRef> {
    refs.sort_by_key(MessageRef::internal_date_ms);
    refs.truncate(limit);

    refs
}
