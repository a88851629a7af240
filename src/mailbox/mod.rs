mod header;
mod message;
mod timestamp;

pub use header::Header;
pub use header::header_value;
pub use header::try_header_value;
pub use message::MessageMetadata;
pub use message::MessageRef;
pub use message::MessageSummary;
pub use message::SUMMARY_HEADERS;
pub use timestamp::ResolvedTimestamp;
pub use timestamp::resolve;
