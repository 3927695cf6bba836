//! appdb API data transfer objects
//!
//! These types represent the data exchanged with the update service and
//! the ignore list. They are intentionally separate from the coordinator's
//! state to keep this crate reusable.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API error code signalling that the update status is still being computed
pub const NOT_READY_CODE: &str = "ERROR_NOT_READY";

/// Where an installed app came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppSource {
    /// Regular iOS app
    Ios,
    /// Cydia package
    Cydia,
}

impl AppSource {
    /// Get the display label for this source
    pub fn label(&self) -> &'static str {
        match self {
            AppSource::Ios => "iOS",
            AppSource::Cydia => "Cydia",
        }
    }
}

/// An installed app tracked for updates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCandidate {
    /// Stable identifier
    #[serde(rename = "trackid", deserialize_with = "string_or_number")]
    pub track_id: String,

    /// Display name as reported by the service
    pub name: String,

    /// Source type
    #[serde(rename = "type")]
    pub source: AppSource,

    /// Installed version
    #[serde(default)]
    pub version_old: String,

    /// Available version
    #[serde(default)]
    pub version_new: String,

    /// Changelog text
    #[serde(default)]
    pub whatsnew: String,

    /// Icon URL
    #[serde(rename = "image", default)]
    pub icon_url: String,

    /// Whether the app can be updated in place (otherwise it needs a manual reinstall)
    #[serde(deserialize_with = "bool_or_int")]
    pub updateable: bool,
}

/// An app the user chose to hide from the update list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreEntry {
    pub track_id: String,
    pub name: String,
    #[serde(default)]
    pub icon_url: String,
    pub source: AppSource,
}

impl From<&UpdateCandidate> for IgnoreEntry {
    fn from(candidate: &UpdateCandidate) -> Self {
        Self {
            track_id: candidate.track_id.clone(),
            name: candidate.name.clone(),
            icon_url: candidate.icon_url.clone(),
            source: candidate.source,
        }
    }
}

/// Opaque token scoping the poll attempts of one update check
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PollTicket(String);

impl PollTicket {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PollTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failure reported by an update service call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The API answered with an error envelope
    #[error("{message}")]
    Api { message: String, code: String },

    /// The request never produced a usable answer (network, HTTP status, decoding)
    #[error("{0}")]
    Transport(String),
}

impl ServiceError {
    pub fn api(message: impl Into<String>, code: impl Into<String>) -> Self {
        ServiceError::Api {
            message: message.into(),
            code: code.into(),
        }
    }

    /// A "try again shortly" answer while the service computes the status
    pub fn not_ready() -> Self {
        Self::api("Update status is not ready yet", NOT_READY_CODE)
    }

    /// Is this the distinguished retry signal?
    pub fn is_not_ready(&self) -> bool {
        matches!(self, ServiceError::Api { code, .. } if code == NOT_READY_CODE || code == "NOT_READY")
    }

    /// API error code, if the service returned one
    pub fn code(&self) -> Option<&str> {
        match self {
            ServiceError::Api { code, .. } => Some(code),
            ServiceError::Transport(_) => None,
        }
    }

    /// Human readable message
    pub fn message(&self) -> &str {
        match self {
            ServiceError::Api { message, .. } => message,
            ServiceError::Transport(message) => message,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

// The API has sent both `true` and `1` for this flag over time
fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(b) => Ok(b),
        serde_json::Value::Number(n) => Ok(n.as_i64().is_some_and(|v| v != 0)),
        serde_json::Value::String(s) => Ok(s == "1" || s.eq_ignore_ascii_case("true")),
        other => Err(de::Error::custom(format!(
            "expected bool or integer, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_deserialize_wire_names() {
        let json = r#"{
            "trackid": 1234,
            "name": "Delta",
            "type": "ios",
            "version_old": "1.4",
            "version_new": "1.5",
            "whatsnew": "Bug fixes",
            "image": "https://example.com/delta.png",
            "updateable": 1
        }"#;
        let candidate: UpdateCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.track_id, "1234");
        assert_eq!(candidate.source, AppSource::Ios);
        assert_eq!(candidate.icon_url, "https://example.com/delta.png");
        assert!(candidate.updateable);
    }

    #[test]
    fn test_candidate_updateable_flag_variants() {
        let json = r#"{"trackid": "9", "name": "Filza", "type": "cydia", "updateable": false}"#;
        let candidate: UpdateCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.track_id, "9");
        assert_eq!(candidate.source, AppSource::Cydia);
        assert!(!candidate.updateable);
        assert!(candidate.version_old.is_empty());

        let json = r#"{"trackid": "9", "name": "Filza", "type": "cydia", "updateable": 0}"#;
        let candidate: UpdateCandidate = serde_json::from_str(json).unwrap();
        assert!(!candidate.updateable);
    }

    #[test]
    fn test_candidate_rejects_unknown_source() {
        let json = r#"{"trackid": "1", "name": "x", "type": "books", "updateable": true}"#;
        assert!(serde_json::from_str::<UpdateCandidate>(json).is_err());
    }

    #[test]
    fn test_not_ready_detection() {
        assert!(ServiceError::not_ready().is_not_ready());
        assert!(ServiceError::api("wait", "NOT_READY").is_not_ready());
        assert!(!ServiceError::api("nope", "ERROR_INVALID_TICKET").is_not_ready());
        assert!(!ServiceError::Transport("offline".into()).is_not_ready());
    }

    #[test]
    fn test_service_error_accessors() {
        let err = ServiceError::api("Invalid ticket", "ERROR_INVALID_TICKET");
        assert_eq!(err.code(), Some("ERROR_INVALID_TICKET"));
        assert_eq!(err.message(), "Invalid ticket");
        assert_eq!(err.to_string(), "Invalid ticket");

        let err = ServiceError::Transport("connection refused".into());
        assert_eq!(err.code(), None);
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_ignore_entry_from_candidate() {
        let candidate = UpdateCandidate {
            track_id: "42".into(),
            name: "Provenance".into(),
            source: AppSource::Ios,
            version_old: "2.0".into(),
            version_new: "2.1".into(),
            whatsnew: String::new(),
            icon_url: "icon".into(),
            updateable: true,
        };
        let entry = IgnoreEntry::from(&candidate);
        assert_eq!(entry.track_id, "42");
        assert_eq!(entry.name, "Provenance");
        assert_eq!(entry.icon_url, "icon");
        assert_eq!(entry.source, AppSource::Ios);
    }
}
