//! Response comparison utilities

use crate::client::{display_value, CapturedResponse};
use reqwest::header::HeaderValue;
use serde::Serialize;
use std::fmt;

/// Headers whose values are server-specific or time-dependent
pub const IGNORED_HEADERS: [&str; 6] = [
    "Date",
    "Server",
    "Last-Modified",
    "ETag",
    "Accept-Ranges",
    "Transfer-Encoding",
];

/// A header whose value differs between the two servers
///
/// Values are rendered for display only; the comparison itself is on raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderDiff {
    pub name: String,
    pub expected: String,
    /// `None` when the candidate did not send the header at all
    pub actual: Option<String>,
}

impl fmt::Display for HeaderDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Header [{}]: Expected '{}', Got '{}'",
            self.name,
            self.expected,
            self.actual.as_deref().unwrap_or("(missing)")
        )
    }
}

pub fn is_ignored_header(name: &str) -> bool {
    IGNORED_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}

/// Compare headers, driven by the reference response.
///
/// Headers only the candidate sends are never reported.
pub fn compare_headers(
    reference: &[(String, HeaderValue)],
    candidate: &[(String, HeaderValue)],
) -> Vec<HeaderDiff> {
    reference
        .iter()
        .filter(|(name, _)| !is_ignored_header(name))
        .filter_map(|(name, expected)| {
            let actual = candidate
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v);

            match actual {
                Some(actual) if actual == expected => None,
                _ => Some(HeaderDiff {
                    name: name.clone(),
                    expected: display_value(expected),
                    actual: actual.map(display_value),
                }),
            }
        })
        .collect()
}

/// Everything that differed between the two responses of one test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseComparison {
    pub status_match: bool,
    pub header_diffs: Vec<HeaderDiff>,
    pub body_match: bool,
}

impl ResponseComparison {
    pub fn is_match(&self) -> bool {
        self.status_match && self.header_diffs.is_empty() && self.body_match
    }
}

/// Compare two captured responses. Bodies must be byte-identical.
pub fn compare_responses(
    reference: &CapturedResponse,
    candidate: &CapturedResponse,
) -> ResponseComparison {
    ResponseComparison {
        status_match: reference.status == candidate.status,
        header_diffs: compare_headers(&reference.headers, &candidate.headers),
        body_match: reference.body == candidate.body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn headers(pairs: &[(&str, &str)]) -> Vec<(String, HeaderValue)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), HeaderValue::from_str(v).unwrap()))
            .collect()
    }

    fn response(status: u16, pairs: &[(&str, &str)], body: &str) -> CapturedResponse {
        CapturedResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: headers(pairs),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_identical_headers_produce_no_diffs() {
        let h = headers(&[("content-type", "text/html"), ("content-length", "12")]);
        assert!(compare_headers(&h, &h).is_empty());
    }

    #[test]
    fn test_ignored_headers_never_differ() {
        let reference = headers(&[
            ("Date", "Mon, 01 Jan 2024 00:00:00 GMT"),
            ("server", "nginx/1.25"),
            ("LAST-MODIFIED", "yesterday"),
            ("etag", "\"abc\""),
            ("accept-ranges", "bytes"),
            ("transfer-encoding", "chunked"),
        ]);
        let candidate = headers(&[("date", "Tue, 02 Jan 2024 00:00:00 GMT"), ("server", "webserv")]);
        assert!(compare_headers(&reference, &candidate).is_empty());
    }

    #[test]
    fn test_value_mismatch_is_reported() {
        let reference = headers(&[("Content-Type", "text/html")]);
        let candidate = headers(&[("content-type", "text/plain")]);

        let diffs = compare_headers(&reference, &candidate);
        assert_eq!(
            diffs,
            vec![HeaderDiff {
                name: "Content-Type".to_string(),
                expected: "text/html".to_string(),
                actual: Some("text/plain".to_string()),
            }]
        );
        assert_eq!(
            diffs[0].to_string(),
            "Header [Content-Type]: Expected 'text/html', Got 'text/plain'"
        );
    }

    #[test]
    fn test_missing_header_is_reported() {
        let reference = headers(&[("content-length", "42")]);
        let diffs = compare_headers(&reference, &[]);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].actual, None);
        assert!(diffs[0].to_string().ends_with("Got '(missing)'"));
    }

    #[test]
    fn test_candidate_only_headers_are_not_flagged() {
        let reference = headers(&[("content-type", "text/html")]);
        let candidate = headers(&[("content-type", "text/html"), ("x-powered-by", "webserv")]);
        assert!(compare_headers(&reference, &candidate).is_empty());
    }

    #[test]
    fn test_header_values_compare_exactly() {
        let reference = headers(&[("content-type", "text/html; charset=utf-8")]);
        let candidate = headers(&[("content-type", "text/html; charset=UTF-8")]);
        assert_eq!(compare_headers(&reference, &candidate).len(), 1);
    }

    #[test]
    fn test_compare_responses() {
        let a = response(200, &[("content-type", "text/html")], "<h1>hi</h1>");
        assert!(compare_responses(&a, &a.clone()).is_match());

        let b = response(404, &[("content-type", "text/html")], "<h1>hi</h1>");
        let result = compare_responses(&a, &b);
        assert!(!result.status_match);
        assert!(result.body_match);
        assert!(!result.is_match());

        let c = response(200, &[("content-type", "text/html")], "<h1>hi</h1>\n");
        let result = compare_responses(&a, &c);
        assert!(result.status_match);
        assert!(!result.body_match);
    }

    #[test]
    fn test_header_values_compare_as_bytes() {
        let reference = vec![(
            "content-disposition".to_string(),
            HeaderValue::from_bytes(&[b'a', 0xe9]).unwrap(),
        )];
        let candidate = vec![(
            "content-disposition".to_string(),
            HeaderValue::from_bytes(&[b'a', 0xe8]).unwrap(),
        )];
        let diffs = compare_headers(&reference, &candidate);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].expected, "a\u{fffd}");
        assert_eq!(diffs[0].actual.as_deref(), Some("a\u{fffd}"));
    }

    #[test]
    fn test_non_utf8_bodies_compare_as_bytes() {
        let mut a = response(200, &[], "");
        let mut b = a.clone();
        a.body = vec![0xff, 0x00];
        b.body = vec![0xfe, 0x00];
        assert_eq!(a.text(), b.text());

        let result = compare_responses(&a, &b);
        assert!(!result.body_match);
        assert!(!result.is_match());
    }
}
