use derive_getters::Getters;

use crate::mailbox::{Header, ResolvedTimestamp, header_value, resolve, try_header_value};

/// Header names fetched for display and dry-run analysis.
pub const SUMMARY_HEADERS: [&str; 3] = ["Subject", "From", "Date"];

pub const NO_SUBJECT: &str = "No Subject";
pub const UNKNOWN_SENDER: &str = "Unknown Sender";

/// Identifies a message without fetching its content.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MessageRef {
    id: String,
    internal_date_ms: i64,
}

impl MessageRef {
    pub fn new(id: impl Into<String>, internal_date_ms: i64) -> Self {
        Self {
            id: id.into(),
            internal_date_ms,
        }
    }

    pub fn into_id(self) -> String {
        self.id
    }
}

/// The metadata envelope of a single message, as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MessageMetadata {
    id: String,
    headers: Vec<Header>,
    snippet: String,
    internal_date_ms: i64,
}

impl MessageMetadata {
    pub fn new(
        id: impl Into<String>,
        headers: Vec<Header>,
        snippet: impl Into<String>,
        internal_date_ms: i64,
    ) -> Self {
        Self {
            id: id.into(),
            headers,
            snippet: snippet.into(),
            internal_date_ms,
        }
    }
}

/// A message prepared for display or deletion confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MessageSummary {
    id: String,
    subject: String,
    sender: String,
    date: ResolvedTimestamp,
    snippet: String,
}

impl MessageSummary {
    pub fn from_metadata(metadata: &MessageMetadata) -> Self {
        let headers = metadata.headers();
        let date = resolve(
            try_header_value(headers, "Date"),
            metadata.internal_date_ms(),
        );

        Self {
            id: metadata.id().clone(),
            subject: header_value(headers, "Subject", NO_SUBJECT).to_string(),
            sender: header_value(headers, "From", UNKNOWN_SENDER).to_string(),
            date,
            snippet: metadata.snippet().clone(),
        }
    }
}
