//! Tests for the domain user model.

use super::*;
use crate::domain::RecordId;
use chrono::TimeZone;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn stored_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn draft() -> UserDraft {
    UserDraft {
        email: EmailAddress::new("ada@example.com").expect("valid email"),
        first_name: PersonName::new("Ada").expect("valid name"),
        last_name: PersonName::new("Lovelace").expect("valid name"),
        birth_date: None,
    }
}

#[rstest]
#[case("", UserValidationError::NameTooShort { min: NAME_MIN })]
#[case(&"x".repeat(51), UserValidationError::NameTooLong { max: NAME_MAX })]
fn person_name_rejects_out_of_bounds(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(PersonName::new(raw), Err(expected));
}

#[rstest]
#[case("  Ada@Example.com ", Ok("ada@example.com"))]
#[case("   ", Err(UserValidationError::EmptyEmail))]
#[case("ada.example.com", Err(UserValidationError::InvalidEmail))]
#[case("ada@example", Err(UserValidationError::InvalidEmail))]
fn email_is_normalised_and_checked(
    #[case] raw: &str,
    #[case] expected: Result<&str, UserValidationError>,
) {
    let parsed = EmailAddress::new(raw).map(String::from);
    assert_eq!(parsed, expected.map(str::to_owned));
}

#[rstest]
fn serialises_absent_birth_date_as_null(draft: UserDraft, stored_at: DateTime<Utc>) {
    let id = UserId::generate();
    let user = User::assemble(id, stored_at, draft);
    let value = serde_json::to_value(&user).expect("serialises");

    assert_eq!(
        value,
        json!({
            "user_id": id.to_string(),
            "email": "ada@example.com",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "birth_date": null,
        })
    );
}

#[rstest]
fn stored_form_round_trips(mut draft: UserDraft, stored_at: DateTime<Utc>) {
    draft.birth_date = NaiveDate::from_ymd_opt(1815, 12, 10);
    let user = User::assemble(UserId::generate(), stored_at, draft);
    let value = serde_json::to_value(&user).expect("serialises");
    assert_eq!(value["birth_date"], json!("1815-12-10"));

    let decoded: User = serde_json::from_value(value).expect("deserialises");
    assert_eq!(decoded, user);
}

#[rstest]
fn stored_form_rejects_password_field(draft: UserDraft, stored_at: DateTime<Utc>) {
    let user = User::assemble(UserId::generate(), stored_at, draft);
    let mut value = serde_json::to_value(&user).expect("serialises");
    if let Value::Object(map) = &mut value {
        map.insert("password".into(), json!("hunter2hunter2"));
    }
    assert!(serde_json::from_value::<User>(value).is_err());
}

#[rstest]
fn apply_changes_only_supplied_fields(draft: UserDraft, stored_at: DateTime<Utc>) {
    let mut user = User::assemble(UserId::generate(), stored_at, draft);
    let before = user.clone();

    user.apply(
        UserPatch {
            first_name: Some(PersonName::new("Augusta").expect("valid name")),
            ..UserPatch::default()
        },
        stored_at,
    );

    assert_eq!(user.first_name().as_ref(), "Augusta");
    assert_eq!(user.last_name(), before.last_name());
    assert_eq!(user.email(), before.email());
    assert_eq!(user.user_id(), before.user_id());
}

#[rstest]
fn registration_schema_output_builds_a_registration() {
    let raw = json!({
        "email": "ADA@example.com",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "password": "correct horse",
    });
    let fields = registration_schema()
        .validate(raw.as_object().expect("object"))
        .expect("valid registration");
    let registration: Registration = fields.into_typed().expect("typed");
    let (draft, password) = registration.into_parts();

    assert_eq!(draft.email.as_ref(), "ada@example.com");
    assert!(draft.birth_date.is_none());
    assert_eq!(password.expose(), "correct horse");
}

#[rstest]
fn registration_schema_requires_password() {
    let raw = json!({
        "email": "ada@example.com",
        "first_name": "Ada",
        "last_name": "Lovelace",
    });
    let errors = registration_schema()
        .validate(raw.as_object().expect("object"))
        .expect_err("password missing");
    assert!(errors.cites("password"));
}

#[rstest]
fn profile_patch_schema_rejects_password_and_identity() {
    let raw = json!({ "password": "correct horse", "user_id": "x" });
    let errors = profile_patch_schema()
        .validate(raw.as_object().expect("object"))
        .expect_err("fields not patchable");
    assert!(errors.cites("password"));
    assert!(errors.cites("user_id"));
}
