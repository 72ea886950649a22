// Status-to-error classification.
//
// Control flow depends only on the status code; the body is read solely to
// build a readable message for the generic `ApiError`.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiError, Error};

const MESSAGE_PREVIEW_LEN: usize = 200;

// ── RESTCONF error document (RFC 8040 §7.1) ─────────────────────────

#[derive(Deserialize)]
struct ErrorDocument {
    #[serde(rename = "ietf-restconf:errors", alias = "errors")]
    errors: ErrorList,
}

#[derive(Deserialize)]
struct ErrorList {
    #[serde(default)]
    error: Vec<ErrorEntry>,
}

#[derive(Deserialize)]
struct ErrorEntry {
    #[serde(rename = "error-tag", default)]
    tag: Option<String>,
    #[serde(rename = "error-message", default)]
    message: Option<String>,
}

/// Map a response onto the error taxonomy; `Ok(())` only for HTTP 200.
pub fn classify(status: u16, body: &str, url: &str) -> Result<(), Error> {
    let err = match status {
        200 => return Ok(()),
        401 => Error::AuthenticationFailed,
        403 => Error::AccessForbidden,
        404 => Error::ResourceNotFound,
        _ => Error::Api(ApiError {
            status_code: status,
            message: message_for(status, body),
            body: body.to_owned(),
        }),
    };
    debug!(status, url, error = %err, "request failed");
    Err(err)
}

/// Human-readable message for a generic failure.
fn message_for(status: u16, body: &str) -> String {
    if let Ok(doc) = serde_json::from_str::<ErrorDocument>(body) {
        let parts: Vec<String> = doc
            .errors
            .error
            .into_iter()
            .filter_map(|e| e.message.or(e.tag))
            .collect();
        if !parts.is_empty() {
            return parts.join("; ");
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.chars().take(MESSAGE_PREVIEW_LEN).collect();
    }

    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map_or_else(|| format!("HTTP {status}"), str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::ErrorKind;

    const URL: &str = "https://wnc/restconf/data/x";

    fn api_error(status: u16, body: &str) -> ApiError {
        match classify(status, body, URL) {
            Err(Error::Api(e)) => e,
            other => panic!("expected Api error, got: {other:?}"),
        }
    }

    #[test]
    fn ok_only_for_200() {
        classify(200, "", URL).unwrap();
        assert_eq!(classify(201, "", URL).unwrap_err().kind(), ErrorKind::Api);
        assert_eq!(classify(204, "", URL).unwrap_err().kind(), ErrorKind::Api);
    }

    #[test]
    fn named_sentinels() {
        let cases = [
            (401, ErrorKind::AuthenticationFailed),
            (403, ErrorKind::AccessForbidden),
            (404, ErrorKind::ResourceNotFound),
        ];
        for (status, kind) in cases {
            // The body never changes the outcome for these.
            for body in ["", "{\"ietf-restconf:errors\":{}}", "denied"] {
                assert_eq!(classify(status, body, URL).unwrap_err().kind(), kind);
            }
        }
    }

    #[test]
    fn restconf_error_document_becomes_message() {
        let body = r#"{
            "ietf-restconf:errors": {
                "error": [
                    {"error-type": "application", "error-tag": "invalid-value",
                     "error-message": "uri keypath not found"},
                    {"error-type": "protocol", "error-tag": "malformed-message"}
                ]
            }
        }"#;
        let err = api_error(400, body);
        assert_eq!(err.status_code, 400);
        assert_eq!(err.message, "uri keypath not found; malformed-message");
        assert_eq!(err.body, body);
    }

    #[test]
    fn plain_body_is_truncated_into_message() {
        let body = "x".repeat(500);
        let err = api_error(500, &body);
        assert_eq!(err.message.len(), MESSAGE_PREVIEW_LEN);
        assert_eq!(err.body.len(), 500);
    }

    #[test]
    fn empty_body_falls_back_to_status_text() {
        assert_eq!(api_error(503, "").message, "Service Unavailable");
        assert_eq!(api_error(599, "  ").message, "HTTP 599");
    }
}
