//! Tweets API handlers.
//!
//! ```text
//! GET    /                     all tweets in posting order
//! POST   /tweet                {"content","by":{"user_id"}}
//! GET    /tweet/{tweet_id}
//! PUT    /tweet/{tweet_id}     {"content"?}
//! DELETE /tweet/{tweet_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde_json::Value;

use crate::domain::{
    Error, FieldViolation, RawFields, Tweet, TweetAuthor, TweetId, UserId, ValidationErrors,
    ViolationCode, author_schema, tweet_schema,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_path_id};

const TWEET_ID: FieldName = FieldName::new("tweet_id");
const AUTHOR_FIELD: &str = "by";

/// Detach the `by` author reference from a tweet body.
///
/// When the author is invalid the remaining fields are validated as well so
/// one response lists every violation.
fn split_author(mut fields: RawFields) -> Result<(RawFields, UserId), Error> {
    let author = match fields.remove(AUTHOR_FIELD) {
        None | Some(Value::Null) => Err(ValidationErrors::single(FieldViolation::new(
            AUTHOR_FIELD,
            ViolationCode::MissingField,
            "by is required",
        ))),
        Some(Value::Object(by)) => author_schema().validate_at(Some(AUTHOR_FIELD), &by),
        Some(_) => Err(ValidationErrors::single(FieldViolation::new(
            AUTHOR_FIELD,
            ViolationCode::InvalidType,
            "by must be an object",
        ))),
    };

    match author {
        Ok(validated) => {
            let author: TweetAuthor = validated.into_typed()?;
            Ok((fields, author.user_id))
        }
        Err(author_errors) => {
            let mut errors = tweet_schema().validate(&fields).err().unwrap_or_default();
            errors.merge(author_errors);
            Err(errors.into())
        }
    }
}

/// List every tweet.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Tweets in posting order", body = [crate::inbound::http::schemas::TweetSchema]),
        (status = 500, description = "Internal server error", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["tweets"],
    operation_id = "listTweets"
)]
#[get("/")]
pub async fn list_tweets(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Tweet>>> {
    Ok(web::Json(state.tweets.list_tweets().await?))
}

/// Post a tweet.
#[utoipa::path(
    post,
    path = "/tweet",
    request_body = crate::inbound::http::schemas::TweetRequestSchema,
    responses(
        (status = 201, description = "Tweet posted", body = crate::inbound::http::schemas::TweetSchema),
        (status = 400, description = "Malformed JSON body", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 422, description = "Field validation failed", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 500, description = "Internal server error", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["tweets"],
    operation_id = "postTweet"
)]
#[post("/tweet")]
pub async fn post_tweet(
    state: web::Data<HttpState>,
    payload: web::Json<RawFields>,
) -> ApiResult<HttpResponse> {
    let (fields, author) = split_author(payload.into_inner())?;
    let tweet = state.tweets.submit_tweet(fields, author).await?;
    Ok(HttpResponse::Created().json(tweet))
}

/// Fetch one tweet.
#[utoipa::path(
    get,
    path = "/tweet/{tweet_id}",
    params(("tweet_id" = String, Path, description = "Tweet identifier (UUID)")),
    responses(
        (status = 200, description = "Tweet", body = crate::inbound::http::schemas::TweetSchema),
        (status = 400, description = "Malformed identifier", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown tweet", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["tweets"],
    operation_id = "getTweet"
)]
#[get("/tweet/{tweet_id}")]
pub async fn get_tweet(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Tweet>> {
    let tweet_id: TweetId = parse_path_id(&path, TWEET_ID)?;
    Ok(web::Json(state.tweets.get_tweet(tweet_id).await?))
}

/// Edit the content of a tweet.
#[utoipa::path(
    put,
    path = "/tweet/{tweet_id}",
    params(("tweet_id" = String, Path, description = "Tweet identifier (UUID)")),
    request_body = crate::inbound::http::schemas::TweetUpdateSchema,
    responses(
        (status = 200, description = "Updated tweet", body = crate::inbound::http::schemas::TweetSchema),
        (status = 400, description = "Malformed request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown tweet", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 422, description = "Field validation failed", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["tweets"],
    operation_id = "updateTweet"
)]
#[put("/tweet/{tweet_id}")]
pub async fn update_tweet(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<RawFields>,
) -> ApiResult<web::Json<Tweet>> {
    let tweet_id: TweetId = parse_path_id(&path, TWEET_ID)?;
    let tweet = state
        .tweets
        .update_tweet(tweet_id, payload.into_inner())
        .await?;
    Ok(web::Json(tweet))
}

/// Delete a tweet.
#[utoipa::path(
    delete,
    path = "/tweet/{tweet_id}",
    params(("tweet_id" = String, Path, description = "Tweet identifier (UUID)")),
    responses(
        (status = 200, description = "Deleted tweet", body = crate::inbound::http::schemas::TweetSchema),
        (status = 400, description = "Malformed identifier", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown tweet", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["tweets"],
    operation_id = "deleteTweet"
)]
#[delete("/tweet/{tweet_id}")]
pub async fn delete_tweet(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Tweet>> {
    let tweet_id: TweetId = parse_path_id(&path, TWEET_ID)?;
    Ok(web::Json(state.tweets.delete_tweet(tweet_id).await?))
}
