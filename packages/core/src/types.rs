// ABOUTME: Data model shared by the credential store, service clients and the UI
// ABOUTME: Credentials, moderation verdicts, admin token records and service error bodies

use crate::severity::Severity;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Which credential slot a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialScope {
    /// Durable, survives restarts
    User,
    /// Volatile, lives only as long as the process
    Admin,
}

impl CredentialScope {
    pub fn is_durable(self) -> bool {
        matches!(self, CredentialScope::User)
    }

    /// Inline message for an action attempted without this credential
    pub fn missing_message(self) -> &'static str {
        match self {
            CredentialScope::User => "Please set a token first",
            CredentialScope::Admin => "Please authenticate as admin first",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub value: String,
    pub scope: CredentialScope,
}

impl Credential {
    pub fn new(value: impl Into<String>, scope: CredentialScope) -> Self {
        Self {
            value: value.into(),
            scope,
        }
    }
}

/// Moderation result for one submitted image.
///
/// Categories keep the order the service sent them in. Severities are kept as
/// raw JSON so malformed values survive decoding and render as `Unknown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    pub is_safe: bool,
    pub confidence: f64,
    #[serde(default)]
    pub categories: Map<String, Value>,
}

impl ModerationVerdict {
    pub fn safety_label(&self) -> &'static str {
        if self.is_safe {
            "Safe"
        } else {
            "Unsafe"
        }
    }

    /// Confidence as a percentage with one decimal, e.g. `87.0%`
    pub fn confidence_label(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }

    pub fn ratings(&self) -> impl Iterator<Item = CategoryRating> + '_ {
        self.categories
            .iter()
            .map(|(name, value)| CategoryRating::new(name, value))
    }

    /// The most severe known category, if any
    pub fn worst(&self) -> Option<CategoryRating> {
        self.ratings()
            .filter(|rating| rating.severity.level().is_some())
            .max_by_key(|rating| rating.severity.level())
    }
}

/// One rendered category line, e.g. `violence: Extreme (5)`
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRating {
    pub name: String,
    pub severity: Severity,
    /// The value exactly as the service sent it
    pub raw: String,
}

impl CategoryRating {
    pub fn new(name: &str, value: &Value) -> Self {
        let raw = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Self {
            name: name.to_string(),
            severity: Severity::from_value(value),
            raw,
        }
    }

    pub fn label(&self) -> &'static str {
        self.severity.label()
    }

    pub fn color(&self) -> &'static str {
        self.severity.color()
    }
}

impl fmt::Display for CategoryRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.name, self.label(), self.raw)
    }
}

/// A bearer token as listed by the token-management endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminTokenRecord {
    pub token: String,
    pub is_admin: bool,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl AdminTokenRecord {
    pub fn scope(&self) -> CredentialScope {
        if self.is_admin {
            CredentialScope::Admin
        } else {
            CredentialScope::User
        }
    }
}

/// Body of `POST /auth/tokens`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTokenRequest {
    pub is_admin: bool,
}

/// Body returned with non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Human-readable detail, if the server sent a usable one
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

// Accepts RFC 3339 as well as naive ISO-8601 timestamps, which are read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_verdict_rendering() {
        let verdict: ModerationVerdict = serde_json::from_value(json!({
            "is_safe": false,
            "confidence": 0.87,
            "categories": {"violence": 5, "nudity": 0}
        }))
        .unwrap();

        assert_eq!(verdict.safety_label(), "Unsafe");
        assert_eq!(verdict.confidence_label(), "87.0%");

        let lines: Vec<String> = verdict.ratings().map(|r| r.to_string()).collect();
        assert_eq!(lines, vec!["violence: Extreme (5)", "nudity: Safe (0)"]);
    }

    #[test]
    fn test_malformed_severity_passes_through() {
        let verdict: ModerationVerdict = serde_json::from_value(json!({
            "is_safe": true,
            "confidence": 0.5,
            "categories": {"spam": "high", "gore": 9}
        }))
        .unwrap();

        let lines: Vec<String> = verdict.ratings().map(|r| r.to_string()).collect();
        assert_eq!(lines, vec!["spam: Unknown (high)", "gore: Unknown (9)"]);
        assert!(verdict.worst().is_none());
    }

    #[test]
    fn test_worst_category() {
        let verdict: ModerationVerdict = serde_json::from_value(json!({
            "is_safe": false,
            "confidence": 0.9,
            "categories": {"nudity": 1, "violence": 4, "drugs": 2}
        }))
        .unwrap();

        assert_eq!(verdict.worst().map(|r| r.name), Some("violence".to_string()));
    }

    #[test]
    fn test_missing_categories_default_to_empty() {
        let verdict: ModerationVerdict =
            serde_json::from_value(json!({"is_safe": true, "confidence": 1.0})).unwrap();
        assert!(verdict.categories.is_empty());
        assert_eq!(verdict.confidence_label(), "100.0%");
    }

    #[test]
    fn test_token_record_accepts_naive_timestamp() {
        let record: AdminTokenRecord = serde_json::from_value(json!({
            "token": "abc",
            "is_admin": true,
            "created_at": "2024-03-01T12:30:45.123456"
        }))
        .unwrap();

        assert_eq!(record.created_at.year(), 2024);
        assert_eq!(record.created_at.hour(), 12);
        assert_eq!(record.scope(), CredentialScope::Admin);
    }

    #[test]
    fn test_token_record_accepts_rfc3339_timestamp() {
        let record: AdminTokenRecord = serde_json::from_value(json!({
            "token": "abc",
            "is_admin": false,
            "created_at": "2024-03-01T12:30:45+02:00"
        }))
        .unwrap();

        assert_eq!(record.created_at.hour(), 10);
    }

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody = serde_json::from_value(json!({"detail": "Invalid token"})).unwrap();
        assert_eq!(body.message(), Some("Invalid token".to_string()));

        let body: ErrorBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.message(), None);

        let body: ErrorBody = serde_json::from_value(json!({"detail": null})).unwrap();
        assert_eq!(body.message(), None);

        let body: ErrorBody =
            serde_json::from_value(json!({"detail": [{"msg": "field required"}]})).unwrap();
        assert_eq!(body.message(), Some(r#"[{"msg":"field required"}]"#.to_string()));
    }
}
