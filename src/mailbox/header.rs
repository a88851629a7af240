use derive_getters::Getters;

/// A single name/value pair from a message's metadata envelope.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Header {
    name: String,
    value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Value of the first header whose name matches exactly, or `default`.
///
/// The match is case-sensitive, mirroring the provider's header semantics.
/// Missing headers are expected, not exceptional.
pub fn header_value<'a>(headers: &'a [Header], name: &str, default: &'a str) -> &'a str {
    try_header_value(headers, name).unwrap_or(default)
}

pub fn try_header_value<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|header| header.name() == name)
        .map(|header| header.value().as_str())
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    #[fixture]
    fn headers() -> Vec<Header> {
        vec![
            Header::new("From", "alice@example.com"),
            Header::new("Subject", "first"),
            Header::new("Subject", "second"),
            Header::new("Date", "Mon, 24 Nov 2025 08:01:17 -0500"),
        ]
    }

    #[rstest]
    fn test_first_matching_header_wins(headers: Vec<Header>) {
        assert_eq!("first", header_value(&headers, "Subject", "fallback"));
    }

    #[rstest]
    fn test_default_returned_exactly_when_no_exact_match(headers: Vec<Header>) {
        assert_eq!("fallback", header_value(&headers, "Reply-To", "fallback"));
        assert_eq!(
            "alice@example.com",
            header_value(&headers, "From", "fallback")
        );
    }

    #[rstest]
    fn test_match_is_case_sensitive(headers: Vec<Header>) {
        assert_eq!("fallback", header_value(&headers, "subject", "fallback"));
        assert_eq!("fallback", header_value(&headers, "FROM", "fallback"));
    }

    #[rstest]
    fn test_empty_sequence_yields_default() {
        assert_eq!("fallback", header_value(&[], "Subject", "fallback"));
        assert_eq!(None, try_header_value(&[], "Subject"));
    }
}
