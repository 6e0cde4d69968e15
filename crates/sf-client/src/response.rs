//! HTTP response handling and verification.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, ErrorKind, Result};

/// A response as returned by a [`Transport`](crate::Transport).
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// Header names are lower-cased.
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl RawResponse {
    /// Build a response, normalizing header names to lowercase.
    pub fn new(status: u16, headers: HashMap<String, String>, body: impl Into<Bytes>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();

        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Body as UTF-8 text (lossy).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Verify the status and decode the body.
    ///
    /// SOAP responses come back untouched as [`Reply::Raw`]; everything else
    /// is parsed as JSON, with an empty body read as `null`.
    pub fn into_reply(self, soap: bool) -> Result<Reply> {
        if self.status >= 300 {
            return Err(Error::new(ErrorKind::RequestFailed {
                status: self.status,
                body: self.text(),
            }));
        }

        if soap {
            return Ok(Reply::Raw(self));
        }

        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Reply::Json(Value::Null));
        }

        self.json().map(Reply::Json)
    }
}

/// A verified response.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Parsed JSON (REST).
    Json(Value),
    /// The verified raw response (SOAP).
    Raw(RawResponse),
}

impl Reply {
    /// Take the JSON value, failing if this is a raw reply.
    pub fn into_json(self) -> Result<Value> {
        match self {
            Reply::Json(value) => Ok(value),
            Reply::Raw(_) => Err(Error::new(ErrorKind::InvalidResponse(
                "expected a JSON reply, got a raw SOAP response".to_string(),
            ))),
        }
    }

    /// Take the raw response, failing if this is a JSON reply.
    pub fn into_raw(self) -> Result<RawResponse> {
        match self {
            Reply::Raw(raw) => Ok(raw),
            Reply::Json(_) => Err(Error::new(ErrorKind::InvalidResponse(
                "expected a raw SOAP response, got JSON".to_string(),
            ))),
        }
    }
}

/// Sanitize an error body so that tokens and session ids never reach logs.
pub(crate) fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let mut sanitized = message.to_string();

    // Salesforce access tokens: org id prefix, "!", then the secret part
    if let Ok(token_pattern) = regex_lite::Regex::new(r"00[A-Za-z0-9]{13,}[!][A-Za-z0-9_.]+") {
        sanitized = token_pattern
            .replace_all(&sanitized, "[REDACTED_TOKEN]")
            .to_string();
    }

    if let Ok(session_pattern) = regex_lite::Regex::new(r"sid=[A-Za-z0-9]{20,}") {
        sanitized = session_pattern
            .replace_all(&sanitized, "sid=[REDACTED]")
            .to_string();
    }

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> RawResponse {
        RawResponse::new(status, HashMap::new(), body.to_string())
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let resp = RawResponse::new(
            200,
            HashMap::from([("Content-Type".to_string(), "text/xml".to_string())]),
            Bytes::new(),
        );
        assert_eq!(resp.header("content-type"), Some("text/xml"));
        assert_eq!(resp.header("CONTENT-TYPE"), Some("text/xml"));
    }

    #[test]
    fn test_json_reply() {
        let reply = response(200, r#"{"totalSize":0,"done":true,"records":[]}"#)
            .into_reply(false)
            .unwrap();
        let value = reply.into_json().unwrap();
        assert_eq!(value["done"], true);
    }

    #[test]
    fn test_empty_body_is_null() {
        let reply = response(204, "").into_reply(false).unwrap();
        assert_eq!(reply.into_json().unwrap(), Value::Null);
    }

    #[test]
    fn test_soap_reply_is_raw() {
        let reply = response(200, "<soapenv:Envelope/>").into_reply(true).unwrap();
        let raw = reply.into_raw().unwrap();
        assert_eq!(raw.text(), "<soapenv:Envelope/>");
    }

    #[test]
    fn test_status_300_and_above_fails() {
        for status in [300, 400, 401, 404, 500] {
            let err = response(status, "nope").into_reply(false).unwrap_err();
            match err.kind {
                ErrorKind::RequestFailed { status: s, ref body } => {
                    assert_eq!(s, status);
                    assert_eq!(body, "nope");
                }
                other => panic!("expected RequestFailed, got {other:?}"),
            }
        }

        // SOAP faults are verified the same way
        let err = response(500, "<faultstring>bad</faultstring>")
            .into_reply(true)
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = response(200, "not json").into_reply(false).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Json(_)));
    }

    #[test]
    fn test_reply_accessors_reject_wrong_variant() {
        let err = Reply::Json(Value::Null).into_raw().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidResponse(_)));

        let err = Reply::Raw(response(200, "")).into_json().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidResponse(_)));
    }

    #[test]
    fn test_sanitize_redacts_access_tokens() {
        let msg = "Session expired: 00Dxx0000001gEF!AQcAQH3k9s7LKbp_example_token_value.here";
        let sanitized = sanitize_error_message(msg);
        assert!(sanitized.contains("[REDACTED_TOKEN]"), "{sanitized}");
        assert!(!sanitized.contains("AQcAQH3k9s7LKbp"), "{sanitized}");
    }

    #[test]
    fn test_sanitize_redacts_session_ids() {
        let msg = "Invalid session: sid=abc123def456ghi789jkl012";
        let sanitized = sanitize_error_message(msg);
        assert!(sanitized.contains("sid=[REDACTED]"), "{sanitized}");
        assert!(!sanitized.contains("abc123def456"), "{sanitized}");
    }

    #[test]
    fn test_sanitize_truncates_long_messages() {
        let long_msg = "é".repeat(400);
        let sanitized = sanitize_error_message(&long_msg);
        assert!(sanitized.ends_with("...[truncated]"));
        assert!(sanitized.len() <= 500 + "...[truncated]".len());
    }

    #[test]
    fn test_sanitize_leaves_plain_messages_alone() {
        let msg = "MALFORMED_QUERY: unexpected token";
        assert_eq!(sanitize_error_message(msg), msg);
    }
}
