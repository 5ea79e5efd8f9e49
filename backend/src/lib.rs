//! Validated append-only record store behind a micro-blogging REST API.
//!
//! Users, their credentials, and tweets live in one JSON collection each.
//! Every write is validated against a field schema before it is appended
//! and persisted atomically.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
