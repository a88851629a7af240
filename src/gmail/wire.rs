//! Serde DTOs for the provider's REST responses.

use log::debug;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    #[serde(default)]
    pub messages: Vec<ListedMessage>,
    pub next_page_token: Option<String>,
    pub result_size_estimate: Option<u64>,
}

/// A list entry. The id is defaulted so that malformed records survive
/// decoding and can be discarded downstream instead of failing the page.
#[derive(Debug, Deserialize)]
pub struct ListedMessage {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub snippet: String,
    // The provider serializes this int64 as a decimal string.
    pub internal_date: Option<String>,
    pub payload: Option<Payload>,
}

impl Message {
    pub fn internal_date_ms(&self) -> i64 {
        let Some(raw) = &self.internal_date else {
            return 0;
        };
        raw.parse().unwrap_or_else(|err| {
            debug!("unparsable internalDate {raw:?}: {err}");
            0
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub headers: Vec<MessageHeader>,
}

#[derive(Debug, Deserialize)]
pub struct MessageHeader {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub email_address: String,
    pub messages_total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Extracts the human-readable message from a provider error body, if the
/// body is the documented error envelope.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|response| response.error.message)
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn test_list_response_tolerates_missing_fields() {
        let decoded: ListResponse = assert_ok!(serde_json::from_str("{}"));
        assert!(decoded.messages.is_empty());
        assert_eq!(None, decoded.next_page_token);
    }

    #[rstest]
    fn test_listed_message_without_id_decodes_to_empty_id() {
        let decoded: ListResponse =
            assert_ok!(serde_json::from_str(r#"{"messages":[{"threadId":"t1"}]}"#));
        assert_eq!(1, decoded.messages.len());
        assert_eq!("", decoded.messages[0].id);
    }

    #[rstest]
    #[case(Some("1764000000000"), 1_764_000_000_000)]
    #[case(Some("garbage"), 0)]
    #[case(None, 0)]
    fn test_internal_date_parsing_degrades_to_zero(
        #[case] raw: Option<&str>,
        #[case] expected: i64,
    ) {
        let message = Message {
            id: "m".to_string(),
            snippet: String::new(),
            internal_date: raw.map(ToString::to_string),
            payload: None,
        };
        assert_eq!(expected, message.internal_date_ms());
    }

    #[rstest]
    fn test_error_message_extraction() {
        let body = r#"{"error":{"code":404,"message":"Not Found","status":"NOT_FOUND"}}"#;
        assert_eq!(Some("Not Found".to_string()), error_message(body));
        assert_eq!(None, error_message("half a page of html"));
    }
}
