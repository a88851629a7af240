use derive_getters::Getters;
use jiff::{
    Timestamp,
    fmt::{rfc2822, strtime},
    tz::TimeZone,
};
use log::debug;

const DISPLAY_FORMAT: &str = "%a, %d %b %Y %I:%M %p";

/// One authoritative point in time for a message.
///
/// `for_sort` is always the server-assigned timestamp. The `Date` header is
/// client-supplied and may be forged, zoneless or malformed, so it only ever
/// influences `for_display`.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ResolvedTimestamp {
    for_sort: i64,
    for_display: String,
}

/// Resolves a possibly absent `Date` header against the server timestamp.
///
/// Never fails: an unparsable header degrades to a rendering of `server_ms`,
/// and an out-of-range `server_ms` degrades to the raw number.
pub fn resolve(date_header: Option<&str>, server_ms: i64) -> ResolvedTimestamp {
    let for_display = date_header
        .and_then(parse_header_for_display)
        .unwrap_or_else(|| server_display(server_ms));

    ResolvedTimestamp {
        for_sort: server_ms,
        for_display,
    }
}

fn parse_header_for_display(raw: &str) -> Option<String> {
    match rfc2822::parse(raw) {
        Ok(zoned) => rfc2822::to_string(&zoned).ok(),
        Err(err) => {
            debug!("unparsable Date header {raw:?}: {err}");
            None
        }
    }
}

fn server_display(server_ms: i64) -> String {
    match Timestamp::from_millisecond(server_ms) {
        Ok(timestamp) => {
            let zoned = timestamp.to_zoned(TimeZone::UTC);
            strtime::format(DISPLAY_FORMAT, &zoned).unwrap_or_else(|_| zoned.to_string())
        }
        Err(err) => {
            debug!("server timestamp {server_ms} out of range: {err}");
            server_ms.to_string()
        }
    }
}
