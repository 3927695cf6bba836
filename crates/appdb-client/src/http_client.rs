//! HTTP implementation of the `UpdateService` trait
//!
//! Talks to the storefront's JSON API. Every answer is wrapped in the same
//! envelope:
//!
//! ```json
//! { "success": false, "errors": [{ "code": "ERROR_NOT_READY", "translated": "..." }] }
//! ```

use crate::client::UpdateService;
use crate::types::{PollTicket, ServiceError, UpdateCandidate};
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const ACTION_GET_UPDATE_TICKET: &str = "get_update_ticket";
const ACTION_GET_UPDATE_STATUS: &str = "get_update_status";

/// Response envelope shared by all API actions
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    translated: String,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, ServiceError> {
        if !self.success {
            return Err(match self.errors.into_iter().next() {
                Some(err) => {
                    let message = if err.translated.is_empty() {
                        err.code.clone()
                    } else {
                        err.translated
                    };
                    ServiceError::api(message, err.code)
                }
                None => ServiceError::api("Unknown error", ""),
            });
        }
        self.data
            .ok_or_else(|| ServiceError::Transport("Response is missing its data".to_string()))
    }
}

/// Update service backed by the appdb JSON API
#[derive(Debug, Clone)]
pub struct HttpUpdateService {
    http: reqwest::Client,
    endpoint: String,
    link_token: Option<String>,
    language: String,
}

impl HttpUpdateService {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `endpoint` - API base URL
    /// * `link_token` - Token identifying the linked device, if any
    /// * `language` - Language code for translated error messages
    pub fn new(
        endpoint: impl Into<String>,
        link_token: Option<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            link_token,
            language: language.into(),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        action: &str,
        extra: &[(&str, &str)],
    ) -> Result<T, ServiceError> {
        let mut query: Vec<(&str, &str)> = vec![("action", action), ("lang", self.language.as_str())];
        if let Some(token) = &self.link_token {
            query.push(("lt", token.as_str()));
        }
        query.extend_from_slice(extra);

        debug!("appdb API call: {}", action);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| ServiceError::Transport(format!("Invalid response: {}", e)))?;

        envelope.into_result()
    }
}

#[async_trait]
impl UpdateService for HttpUpdateService {
    async fn request_ticket(&self) -> Result<PollTicket, ServiceError> {
        let token: String = self.call(ACTION_GET_UPDATE_TICKET, &[]).await?;
        Ok(PollTicket::new(token))
    }

    async fn poll_updates(&self, ticket: &PollTicket) -> Result<Vec<UpdateCandidate>, ServiceError> {
        self.call(ACTION_GET_UPDATE_STATUS, &[("t", ticket.as_str())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode<T: DeserializeOwned>(json: &str) -> Result<T, ServiceError> {
        serde_json::from_str::<ApiResponse<T>>(json)
            .unwrap()
            .into_result()
    }

    #[test]
    fn test_envelope_success_ticket() {
        let ticket: String = decode(r#"{"success": true, "data": "abc123"}"#).unwrap();
        assert_eq!(ticket, "abc123");
    }

    #[test]
    fn test_envelope_not_ready() {
        let err = decode::<Vec<UpdateCandidate>>(
            r#"{"success": false, "errors": [{"code": "ERROR_NOT_READY", "translated": "Please wait"}]}"#,
        )
        .unwrap_err();
        assert!(err.is_not_ready());
        assert_eq!(err.message(), "Please wait");
    }

    #[test]
    fn test_envelope_error_without_translation_uses_code() {
        let err = decode::<String>(
            r#"{"success": false, "errors": [{"code": "ERROR_NO_DEVICE"}]}"#,
        )
        .unwrap_err();
        assert_eq!(err, ServiceError::api("ERROR_NO_DEVICE", "ERROR_NO_DEVICE"));
    }

    #[test]
    fn test_envelope_failure_without_errors() {
        let err = decode::<String>(r#"{"success": false}"#).unwrap_err();
        assert_eq!(err.message(), "Unknown error");
        assert!(!err.is_not_ready());
    }

    #[test]
    fn test_envelope_success_without_data() {
        let err = decode::<String>(r#"{"success": true}"#).unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_)));
    }

    #[test]
    fn test_envelope_candidate_list() {
        let apps: Vec<UpdateCandidate> = decode(
            r#"{"success": true, "data": [
                {"trackid": 1, "name": "Delta", "type": "ios", "updateable": 1},
                {"trackid": "cy-2", "name": "Filza", "type": "cydia", "updateable": 0}
            ]}"#,
        )
        .unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].track_id, "1");
        assert!(apps[0].updateable);
        assert_eq!(apps[1].track_id, "cy-2");
        assert!(!apps[1].updateable);
    }
}
