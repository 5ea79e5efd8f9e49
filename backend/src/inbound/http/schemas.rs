//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.
#![expect(
    dead_code,
    reason = "Schema wrappers are used only for OpenAPI generation via utoipa"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Malformed JSON body or path identifier.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// One or more fields failed validation; see `details.violations`.
    #[schema(rename = "validation_failed")]
    ValidationFailed,
    /// Credentials were rejected.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested record does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with a stored record.
    #[schema(rename = "conflict")]
    Conflict,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "validation_failed")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "request failed validation")]
    message: String,
    /// Correlation identifier, echoed in the `trace-id` response header.
    #[schema(example = "6f1c2a8e-3b5d-4c7e-9f10-2a3b4c5d6e7f")]
    trace_id: Option<String>,
    /// Supplementary details, e.g. `{"violations": [{field, code, message}]}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
pub struct UserSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    user_id: String,
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(example = "Ada")]
    first_name: String,
    #[schema(example = "Lovelace")]
    last_name: String,
    /// Calendar date (`YYYY-MM-DD`) or `null`.
    #[schema(example = "1815-12-10")]
    birth_date: Option<String>,
}

/// OpenAPI schema for [`crate::domain::TweetAuthor`].
#[derive(ToSchema)]
#[schema(as = crate::domain::TweetAuthor)]
pub struct TweetAuthorSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    user_id: String,
}

/// OpenAPI schema for [`crate::domain::Tweet`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Tweet)]
pub struct TweetSchema {
    #[schema(example = "6f1c2a8e-3b5d-4c7e-9f10-2a3b4c5d6e7f")]
    tweet_id: String,
    #[schema(example = "hello")]
    content: String,
    #[schema(example = "2024-05-01T12:00:00Z")]
    created_at: String,
    /// Omitted until the tweet is first edited.
    updated_at: Option<String>,
    by: TweetAuthorSchema,
}

/// Request body for `POST /signup`.
#[derive(ToSchema)]
pub struct SignupRequestSchema {
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(example = "Ada", min_length = 1, max_length = 50)]
    first_name: String,
    #[schema(example = "Lovelace", min_length = 1, max_length = 50)]
    last_name: String,
    #[schema(example = "1815-12-10")]
    birth_date: Option<String>,
    #[schema(min_length = 8, max_length = 64)]
    password: String,
}

/// Request body for `POST /login`.
#[derive(ToSchema)]
pub struct LoginRequestSchema {
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(min_length = 8, max_length = 64)]
    password: String,
}

/// Request body for `PUT /users/{user_id}`; every field optional.
#[derive(ToSchema)]
pub struct UserUpdateSchema {
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    birth_date: Option<String>,
}

/// Request body for `POST /tweet`.
#[derive(ToSchema)]
pub struct TweetRequestSchema {
    #[schema(example = "hello", min_length = 1, max_length = 256)]
    content: String,
    by: TweetAuthorSchema,
}

/// Request body for `PUT /tweet/{tweet_id}`.
#[derive(ToSchema)]
pub struct TweetUpdateSchema {
    #[schema(example = "edited", min_length = 1, max_length = 256)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_variants_match_domain() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "validation_failed",
            "unauthorized",
            "not_found",
            "conflict",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn domain_wrappers_use_domain_names() {
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert_eq!(UserSchema::name(), "crate.domain.User");
        assert_eq!(TweetSchema::name(), "crate.domain.Tweet");
    }

    #[test]
    fn tweet_schema_lists_wire_fields() {
        let schema_json = schema_to_json::<TweetSchema>();
        for field in ["tweet_id", "content", "created_at", "updated_at", "by"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }
}
