//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every users, tweets, and health endpoint
//! - **Schemas**: domain type wrappers ([`ErrorSchema`], [`UserSchema`],
//!   [`TweetSchema`] and friends) that provide OpenAPI definitions without
//!   coupling domain types to the utoipa framework
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, LoginRequestSchema, SignupRequestSchema, TweetAuthorSchema,
    TweetRequestSchema, TweetSchema, TweetUpdateSchema, UserSchema, UserUpdateSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Twitter API",
        description = "Users, credentials, and tweets persisted as validated JSON collections."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::tweets::list_tweets,
        crate::inbound::http::tweets::post_tweet,
        crate::inbound::http::tweets::get_tweet,
        crate::inbound::http::tweets::update_tweet,
        crate::inbound::http::tweets::delete_tweet,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        TweetSchema,
        TweetAuthorSchema,
        ErrorSchema,
        ErrorCodeSchema,
        SignupRequestSchema,
        LoginRequestSchema,
        UserUpdateSchema,
        TweetRequestSchema,
        TweetUpdateSchema
    )),
    tags(
        (name = "users", description = "Registration, login, and profile management"),
        (name = "tweets", description = "Posting and editing tweets"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
