//! Schema validation for raw inbound records.
//!
//! A [`Schema`] checks a JSON object field by field and reports every
//! violation at once, so clients can fix a whole form in one round trip.
//! Accepted values are normalised before they are handed to typed drafts:
//!
//! - `Email`: trimmed and lower-cased, `local@domain.tld` shape;
//! - `Date`: calendar date rendered as `YYYY-MM-DD`;
//! - `Uuid`: hyphenated lower case.
//!
//! Unknown fields are rejected. A `null` value counts as absent.

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::domain::Error;

/// Raw field map as received from a client.
pub type RawFields = Map<String, Value>;

/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 254;

const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Return whether `candidate` has the shape of an email address.
pub(crate) fn is_email(candidate: &str) -> bool {
    email_regex().is_match(candidate)
}

/// Normalise an email address the way the validator does.
pub(crate) fn normalise_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Value type expected for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, checked for length only.
    Text,
    /// Email address.
    Email,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// UUID string.
    Uuid,
}

impl FieldKind {
    fn describe(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "a valid email address",
            Self::Date => "a calendar date (YYYY-MM-DD)",
            Self::Uuid => "a valid UUID",
        }
    }
}

/// Rule for a single named field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    name: &'static str,
    kind: FieldKind,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
}

impl FieldRule {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            min_length: None,
            max_length: None,
        }
    }

    /// Required free-text field.
    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// Required email field, bounded to [`EMAIL_MAX`] characters.
    pub const fn email(name: &'static str) -> Self {
        Self::new(name, FieldKind::Email).length(1, EMAIL_MAX)
    }

    /// Required calendar date field.
    pub const fn date(name: &'static str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    /// Required UUID field.
    pub const fn uuid(name: &'static str) -> Self {
        Self::new(name, FieldKind::Uuid)
    }

    /// Mark the field optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Bound the length of the field in characters, inclusive.
    #[must_use]
    pub const fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    /// Field name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the field must be present.
    pub const fn is_required(&self) -> bool {
        self.required
    }

    fn check(&self, value: Option<&Value>, path: &str, sink: &mut Vec<FieldViolation>) -> Option<Value> {
        let raw = match value {
            None | Some(Value::Null) => {
                if self.required {
                    sink.push(FieldViolation::new(
                        path,
                        ViolationCode::MissingField,
                        format!("{path} is required"),
                    ));
                }
                return None;
            }
            Some(Value::String(raw)) => raw,
            Some(_) => {
                sink.push(FieldViolation::new(
                    path,
                    ViolationCode::InvalidType,
                    format!("{path} must be a string"),
                ));
                return None;
            }
        };

        let normalised = match self.kind {
            FieldKind::Text => raw.clone(),
            FieldKind::Email => normalise_email(raw),
            FieldKind::Date => match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
                Ok(date) => date.format(DATE_FORMAT).to_string(),
                Err(_) => return self.format_violation(path, sink),
            },
            FieldKind::Uuid => match Uuid::parse_str(raw.trim()) {
                Ok(uuid) => uuid.hyphenated().to_string(),
                Err(_) => return self.format_violation(path, sink),
            },
        };

        let length = normalised.chars().count();
        if let Some(min) = self.min_length.filter(|min| length < *min) {
            sink.push(FieldViolation::new(
                path,
                ViolationCode::TooShort,
                format!("{path} must be at least {min} characters"),
            ));
            return None;
        }
        if let Some(max) = self.max_length.filter(|max| length > *max) {
            sink.push(FieldViolation::new(
                path,
                ViolationCode::TooLong,
                format!("{path} must be at most {max} characters"),
            ));
            return None;
        }

        if self.kind == FieldKind::Email && !is_email(&normalised) {
            return self.format_violation(path, sink);
        }

        Some(Value::String(normalised))
    }

    fn format_violation(&self, path: &str, sink: &mut Vec<FieldViolation>) -> Option<Value> {
        sink.push(FieldViolation::new(
            path,
            ViolationCode::InvalidFormat,
            format!("{path} must be {}", self.kind.describe()),
        ));
        None
    }
}

/// Machine-readable reason a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// Required field absent or `null`.
    MissingField,
    /// Value has the wrong JSON type.
    InvalidType,
    /// Text shorter than the rule allows.
    TooShort,
    /// Text longer than the rule allows.
    TooLong,
    /// Not a valid email, date, or UUID.
    InvalidFormat,
    /// Field not declared by the schema.
    UnknownField,
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    field: String,
    code: ViolationCode,
    message: String,
}

impl FieldViolation {
    /// Build a violation for `field`.
    pub fn new(field: impl Into<String>, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }

    /// Dotted path of the rejected field.
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Reason code.
    pub fn code(&self) -> ViolationCode {
        self.code
    }

    /// Human-readable explanation.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Every violation found while validating a record.
///
/// ## Invariants
/// - Never empty when returned from [`Schema::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Wrap a single violation.
    pub fn single(violation: FieldViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// Violations in report order.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Whether any violation names `field`.
    pub fn cites(&self, field: &str) -> bool {
        self.violations.iter().any(|violation| violation.field == field)
    }

    /// Append the violations of another report.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.violations.extend(other.violations);
    }

    /// Whether the report is empty.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.violations.iter().map(FieldViolation::field).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        Error::validation_failed("request failed validation")
            .with_details(json!({ "violations": value.violations }))
    }
}

/// Normalised fields that passed a [`Schema`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedFields(Map<String, Value>);

impl ValidatedFields {
    /// Look up a normalised value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether no field was supplied (possible for patch schemas).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deserialise the fields into a typed draft.
    ///
    /// Typed drafts re-check their invariants on construction; a failure
    /// here means the schema and the draft disagree, which is a server bug.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, Error> {
        serde_json::from_value(Value::Object(self.0))
            .map_err(|err| Error::internal(format!("validated fields rejected by draft: {err}")))
    }
}

/// Ordered set of field rules.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use twitter_api::domain::{FieldRule, Schema};
///
/// let schema = Schema::new([FieldRule::text("content").length(1, 256)]);
/// let raw = json!({ "content": "" });
/// let errors = schema
///     .validate(raw.as_object().expect("object"))
///     .expect_err("empty content is rejected");
/// assert!(errors.cites("content"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    rules: Vec<FieldRule>,
}

impl Schema {
    /// Build a schema from rules, checked in the given order.
    pub fn new(rules: impl IntoIterator<Item = FieldRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Derive a schema accepting any subset of the fields.
    #[must_use]
    pub fn as_patch(&self) -> Self {
        Self::new(self.rules.iter().map(|rule| rule.optional()))
    }

    /// Validate top-level fields.
    pub fn validate(&self, raw: &RawFields) -> Result<ValidatedFields, ValidationErrors> {
        self.validate_at(None, raw)
    }

    /// Validate a nested object, reporting paths as `prefix.field`.
    pub fn validate_at(
        &self,
        prefix: Option<&str>,
        raw: &RawFields,
    ) -> Result<ValidatedFields, ValidationErrors> {
        let path_of = |name: &str| match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.to_owned(),
        };

        let mut violations = Vec::new();
        let mut accepted = Map::new();
        for rule in &self.rules {
            let path = path_of(rule.name);
            if let Some(value) = rule.check(raw.get(rule.name), &path, &mut violations) {
                accepted.insert(rule.name.to_owned(), value);
            }
        }

        for key in raw.keys() {
            if !self.rules.iter().any(|rule| rule.name == key) {
                let path = path_of(key);
                violations.push(FieldViolation::new(
                    path.as_str(),
                    ViolationCode::UnknownField,
                    format!("{path} is not a recognised field"),
                ));
            }
        }

        if violations.is_empty() {
            Ok(ValidatedFields(accepted))
        } else {
            Err(ValidationErrors { violations })
        }
    }
}
