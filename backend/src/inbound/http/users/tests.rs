//! Tests for users API handlers.

use super::*;
use crate::domain::ports::MockUserAccounts;
use crate::domain::Error;
use crate::inbound::http::test_utils::{json_config, memory_state};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .service(signup)
        .service(login)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
}

fn signup_body(email: &str) -> Value {
    json!({
        "email": email,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "birth_date": "1815-12-10",
        "password": "analytical"
    })
}

async fn body_json(response: actix_web::dev::ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("json body")
}

#[actix_web::test]
async fn signup_returns_created_user_without_password() {
    let app = actix_test::init_service(test_app(memory_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/signup")
            .set_json(signup_body("Ada@Example.com"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let value = body_json(response).await;
    assert_eq!(value["email"], "ada@example.com");
    assert_eq!(value["birth_date"], "1815-12-10");
    assert!(value["user_id"].as_str().is_some());
    assert!(value.get("password").is_none());
}

#[actix_web::test]
async fn signup_reports_violations_in_rule_order() {
    let app = actix_test::init_service(test_app(memory_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({ "email": "nope", "first_name": "", "nickname": "x" }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let value = body_json(response).await;
    assert_eq!(value["code"], "validation_failed");
    let fields: Vec<&str> = value["details"]["violations"]
        .as_array()
        .expect("violations")
        .iter()
        .filter_map(|v| v["field"].as_str())
        .collect();
    assert_eq!(
        fields,
        ["email", "first_name", "last_name", "password", "nickname"]
    );
}

#[actix_web::test]
async fn duplicate_signup_conflicts() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/signup")
                .set_json(signup_body("ada@example.com"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), expected);
    }
}

#[rstest]
#[case("ada@example.com", "analytical", StatusCode::OK)]
#[case("ADA@example.com", "analytical", StatusCode::OK)]
#[case("ada@example.com", "wrong-password", StatusCode::UNAUTHORIZED)]
#[case("bob@example.com", "analytical", StatusCode::UNAUTHORIZED)]
#[actix_web::test]
async fn login_checks_credentials(
    #[case] email: &str,
    #[case] password: &str,
    #[case] expected: StatusCode,
) {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/signup")
            .set_json(signup_body("ada@example.com"))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), expected);
    if expected == StatusCode::UNAUTHORIZED {
        let value = body_json(response).await;
        assert_eq!(value["message"], "invalid email or password");
    }
}

#[actix_web::test]
async fn user_lifecycle_over_http() {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let created = body_json(
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/signup")
                .set_json(signup_body("ada@example.com"))
                .to_request(),
        )
        .await,
    )
    .await;
    let user_id = created["user_id"].as_str().expect("user id").to_owned();

    let listed = body_json(
        actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/users").to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let updated = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/users/{user_id}"))
            .set_json(json!({ "first_name": "Augusta" }))
            .to_request(),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = body_json(updated).await;
    assert_eq!(updated["first_name"], "Augusta");
    assert_eq!(updated["last_name"], "Lovelace");

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/users/{user_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let missing = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/users/{user_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case("/users/not-a-uuid")]
#[case("/users/1234")]
#[actix_web::test]
async fn malformed_user_id_is_bad_request(#[case] uri: &str) {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = body_json(response).await;
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["details"]["code"], "invalid_uuid");
}

#[rstest]
#[case("{not json", "request body is not valid JSON")]
#[case("[1, 2, 3]", "request body must be a JSON object")]
#[actix_web::test]
async fn malformed_body_is_bad_request(#[case] payload: &'static str, #[case] message: &str) {
    let app = actix_test::init_service(test_app(memory_state())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/signup")
            .insert_header(("content-type", "application/json"))
            .set_payload(payload)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = body_json(response).await;
    assert_eq!(value["message"], message);
    assert_eq!(value["details"]["code"], "invalid_json");
}

#[actix_web::test]
async fn internal_errors_are_redacted() {
    let mut users = MockUserAccounts::new();
    users
        .expect_list_users()
        .times(1)
        .returning(|| Err(Error::internal("users storage failed at /srv/data/users.json")));
    let state = HttpState::new(Arc::new(users), memory_state().tweets);
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/users").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let value = body_json(response).await;
    assert_eq!(value["code"], "internal_error");
    assert!(
        !value.to_string().contains("/srv/data"),
        "storage path leaked: {value}"
    );
}

#[actix_web::test]
async fn handlers_forward_path_identifier_to_port() {
    let expected: UserId = "3fa85f64-5717-4562-b3fc-2c963f66afa6"
        .parse()
        .expect("uuid");
    let mut users = MockUserAccounts::new();
    users
        .expect_get_user()
        .withf(move |id| *id == expected)
        .times(1)
        .returning(|_| Err(Error::not_found("user not found")));
    let tweets = memory_state().tweets;
    let app = actix_test::init_service(test_app(HttpState::new(Arc::new(users), tweets))).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users/3fa85f64-5717-4562-b3fc-2c963f66afa6")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
