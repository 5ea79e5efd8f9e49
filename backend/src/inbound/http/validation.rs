//! Shared request-shape helpers for inbound HTTP adapters.
//!
//! Field-level validation belongs to the domain schemas. This module only
//! handles what never reaches them: malformed JSON bodies and path
//! identifiers that are not UUIDs. Both surface as `invalid_request` (400).

use actix_web::HttpRequest;
use actix_web::error::JsonPayloadError;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidJson,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidJson => "invalid_json",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

/// Parse a path segment into a UUID-backed identifier.
pub(crate) fn parse_path_id<T: From<Uuid>>(value: &str, field: FieldName) -> Result<T, Error> {
    Uuid::parse_str(value)
        .map(T::from)
        .map_err(|_| invalid_uuid_error(field, value))
}

/// Map JSON extractor failures onto the shared error envelope.
///
/// Installed through `web::JsonConfig::error_handler`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected request body");
    let message = match &err {
        JsonPayloadError::ContentType => "request body must be application/json",
        JsonPayloadError::Deserialize(inner) if inner.is_data() => {
            "request body must be a JSON object"
        }
        _ => "request body is not valid JSON",
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": ErrorCode::InvalidJson.as_str() }))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainErrorCode, TweetId};
    use rstest::rstest;

    const FIELD: FieldName = FieldName::new("tweet_id");

    #[rstest]
    fn parses_valid_uuid_into_identifier() {
        let id: TweetId =
            parse_path_id("6f1c2a8e-3b5d-4c7e-9f10-2a3b4c5d6e7f", FIELD).expect("valid id");
        assert_eq!(id.to_string(), "6f1c2a8e-3b5d-4c7e-9f10-2a3b4c5d6e7f");
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("6f1c2a8e-3b5d")]
    fn rejects_non_uuid_with_details(#[case] raw: &str) {
        let err = parse_path_id::<TweetId>(raw, FIELD).expect_err("invalid id");
        assert_eq!(err.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(err.message(), "tweet_id must be a valid UUID");
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "tweet_id", "value": raw, "code": "invalid_uuid" }))
        );
    }
}
