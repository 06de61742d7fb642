//! Declarative request-body validation.
//!
//! Rules are declared per field and run against the raw JSON body before it
//! is deserialized, so a missing field and an empty one are reported the same
//! way:
//!
//! ```rust,ignore
//! let errors = validate(&body, &[
//!   check("status", "Status is required").not_empty(),
//!   check("to", "To date is invalid").date(),
//! ]);
//! ```

use axum::{
  body::Bytes,
  extract::{FromRequest, Request},
  http::header,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

// ─── Request body ─────────────────────────────────────────────────────────────

/// The raw JSON body of a write request, read leniently so that validation
/// always runs.
///
/// A body without a JSON content type, or an empty one, reads as `{}` and is
/// then reported field by field. Only a non-empty JSON body that fails to
/// parse is rejected outright.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

fn has_json_content_type(req: &Request) -> bool {
  req
    .headers()
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.split(';').next())
    .map(|essence| {
      let essence = essence.trim().to_ascii_lowercase();
      essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
    })
    .unwrap_or(false)
}

impl<S> FromRequest<S> for JsonBody
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let is_json = has_json_content_type(&req);
    let bytes = Bytes::from_request(req, state)
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
      return Ok(JsonBody(Value::Object(Map::new())));
    }
    serde_json::from_slice(&bytes)
      .map(JsonBody)
      .map_err(|e| ApiError::BadRequest(format!("Malformed request body: {e}")))
  }
}

// ─── Rules ────────────────────────────────────────────────────────────────────

/// One failed rule, reported to the client as part of `{"errors": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value:    Option<Value>,
  pub msg:      String,
  pub param:    String,
  pub location: &'static str,
}

#[derive(Debug, Clone, Copy)]
enum Check {
  NotEmpty,
  /// Absent or empty is fine; anything else must parse with [`parse_date`].
  Date,
}

/// A field rule built with [`check`].
#[derive(Debug, Clone)]
pub struct Rule {
  field:  &'static str,
  msg:    &'static str,
  checks: Vec<Check>,
}

/// Start a rule for `field`, reporting `msg` when any of its checks fail.
pub fn check(field: &'static str, msg: &'static str) -> Rule {
  Rule { field, msg, checks: Vec::new() }
}

impl Rule {
  pub fn not_empty(mut self) -> Self {
    self.checks.push(Check::NotEmpty);
    self
  }

  pub fn date(mut self) -> Self {
    self.checks.push(Check::Date);
    self
  }

  fn passes(&self, value: Option<&Value>) -> bool {
    self.checks.iter().all(|c| match c {
      Check::NotEmpty => !is_empty(value),
      Check::Date => match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty() || parse_date(s).is_some(),
        Some(_) => false,
      },
    })
  }
}

/// Run `rules` against the top-level fields of `body`.
///
/// Rules are reported in declaration order, at most once each.
pub fn validate(body: &Value, rules: &[Rule]) -> Vec<Violation> {
  rules
    .iter()
    .filter_map(|rule| {
      let value = body.get(rule.field);
      (!rule.passes(value)).then(|| Violation {
        value:    value.filter(|v| !v.is_null()).cloned(),
        msg:      rule.msg.to_string(),
        param:    rule.field.to_string(),
        location: "body",
      })
    })
    .collect()
}

/// Missing, `null`, `""`, `[]` and `{}` are empty. Whitespace is not trimmed.
pub fn is_empty(value: Option<&Value>) -> bool {
  match value {
    None | Some(Value::Null) => true,
    Some(Value::String(s)) => s.is_empty(),
    Some(Value::Array(a)) => a.is_empty(),
    Some(Value::Object(o)) => o.is_empty(),
    Some(Value::Bool(_) | Value::Number(_)) => false,
  }
}

/// Accept an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn profile_rules() -> Vec<Rule> {
    vec![
      check("status", "Status is required").not_empty(),
      check("skills", "Skills is required").not_empty(),
    ]
  }

  #[test]
  fn complete_body_has_no_violations() {
    let body = json!({ "status": "Developer", "skills": "rust" });
    assert!(validate(&body, &profile_rules()).is_empty());
  }

  #[test]
  fn missing_and_empty_fields_are_reported_in_order() {
    let body = json!({ "skills": [] });
    let errors = validate(&body, &profile_rules());
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].param, "status");
    assert_eq!(errors[0].msg, "Status is required");
    assert_eq!(errors[0].value, None);
    assert_eq!(errors[1].param, "skills");
    assert_eq!(errors[1].value, Some(json!([])));
    assert!(errors.iter().all(|e| e.location == "body"));
  }

  #[test]
  fn whitespace_is_not_empty() {
    assert!(!is_empty(Some(&json!(" "))));
    assert!(is_empty(Some(&json!(""))));
    assert!(is_empty(Some(&json!({}))));
    assert!(!is_empty(Some(&json!(false))));
  }

  #[test]
  fn date_rule_accepts_absent_and_valid_dates() {
    let rules = [check("to", "To date is invalid").date()];
    assert!(validate(&json!({}), &rules).is_empty());
    assert!(validate(&json!({ "to": "" }), &rules).is_empty());
    assert!(validate(&json!({ "to": "2021-06-01" }), &rules).is_empty());
    assert!(validate(&json!({ "to": "2021-06-01T12:00:00Z" }), &rules).is_empty());
    assert_eq!(validate(&json!({ "to": "June" }), &rules).len(), 1);
    assert_eq!(validate(&json!({ "to": 5 }), &rules).len(), 1);
  }

  #[test]
  fn bare_date_is_midnight_utc() {
    let dt = parse_date("2021-06-01").unwrap();
    assert_eq!(dt.to_rfc3339(), "2021-06-01T00:00:00+00:00");
  }

  // ── JsonBody ─────────────────────────────────────────────────────────────────

  async fn read_body(content_type: Option<&str>, body: &'static str) -> Result<Value, ApiError> {
    let mut builder = Request::builder().method("POST").uri("/");
    if let Some(ct) = content_type {
      builder = builder.header(header::CONTENT_TYPE, ct);
    }
    let req = builder.body(axum::body::Body::from(body)).unwrap();
    JsonBody::from_request(req, &()).await.map(|JsonBody(v)| v)
  }

  #[tokio::test]
  async fn missing_or_empty_body_reads_as_empty_object() {
    assert_eq!(read_body(None, "").await.unwrap(), json!({}));
    assert_eq!(read_body(Some("application/json"), "").await.unwrap(), json!({}));
    assert_eq!(read_body(Some("text/plain"), "{\"status\":\"x\"}").await.unwrap(), json!({}));
  }

  #[tokio::test]
  async fn json_body_is_parsed() {
    let body = read_body(Some("application/json; charset=utf-8"), "{\"status\":\"x\"}").await;
    assert_eq!(body.unwrap(), json!({ "status": "x" }));
  }

  #[tokio::test]
  async fn malformed_json_is_a_bad_request() {
    let err = read_body(Some("application/json"), "{\"status\":").await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(m) if m.starts_with("Malformed request body")));
  }
}
