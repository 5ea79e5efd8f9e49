//! Users API handlers.
//!
//! ```text
//! POST   /signup            {"email","first_name","last_name","birth_date"?,"password"}
//! POST   /login             {"email","password"}
//! GET    /users
//! GET    /users/{user_id}
//! PUT    /users/{user_id}   any subset of the profile fields
//! DELETE /users/{user_id}
//! ```
//!
//! Bodies are passed to the [`UserAccounts`](crate::domain::ports::UserAccounts)
//! port as raw JSON objects; the domain schemas decide what is valid.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{RawFields, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_path_id};

const USER_ID: FieldName = FieldName::new("user_id");

/// Register a new user.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = crate::inbound::http::schemas::SignupRequestSchema,
    responses(
        (status = 201, description = "User registered", body = crate::inbound::http::schemas::UserSchema),
        (status = 400, description = "Malformed JSON body", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Email already registered", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 422, description = "Field validation failed", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 500, description = "Internal server error", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "signup"
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<RawFields>,
) -> ApiResult<HttpResponse> {
    let user = state.users.submit_user(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Check an email and password pair.
#[utoipa::path(
    post,
    path = "/login",
    request_body = crate::inbound::http::schemas::LoginRequestSchema,
    responses(
        (status = 200, description = "Credentials accepted", body = crate::inbound::http::schemas::UserSchema),
        (status = 400, description = "Malformed JSON body", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Invalid credentials", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 422, description = "Field validation failed", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 500, description = "Internal server error", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<RawFields>,
) -> ApiResult<web::Json<User>> {
    let user = state.users.login(payload.into_inner()).await?;
    Ok(web::Json(user))
}

/// List registered users.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use twitter_api::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [crate::inbound::http::schemas::UserSchema]),
        (status = 500, description = "Internal server error", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    Ok(web::Json(state.users.list_users().await?))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "User", body = crate::inbound::http::schemas::UserSchema),
        (status = 400, description = "Malformed identifier", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown user", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let user_id: UserId = parse_path_id(&path, USER_ID)?;
    Ok(web::Json(state.users.get_user(user_id).await?))
}

/// Update profile fields of one user.
#[utoipa::path(
    put,
    path = "/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier (UUID)")),
    request_body = crate::inbound::http::schemas::UserUpdateSchema,
    responses(
        (status = 200, description = "Updated user", body = crate::inbound::http::schemas::UserSchema),
        (status = 400, description = "Malformed request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown user", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Email already registered", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 422, description = "Field validation failed", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<RawFields>,
) -> ApiResult<web::Json<User>> {
    let user_id: UserId = parse_path_id(&path, USER_ID)?;
    let user = state
        .users
        .update_user(user_id, payload.into_inner())
        .await?;
    Ok(web::Json(user))
}

/// Delete one user and their credentials.
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "Deleted user", body = crate::inbound::http::schemas::UserSchema),
        (status = 400, description = "Malformed identifier", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown user", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let user_id: UserId = parse_path_id(&path, USER_ID)?;
    Ok(web::Json(state.users.delete_user(user_id).await?))
}

#[cfg(test)]
mod tests;
