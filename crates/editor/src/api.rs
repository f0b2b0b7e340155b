//! REST client for the agent configuration endpoints.
//!
//! [`AgentApi`] is the seam the editor depends on; [`HttpAgentApi`] is the
//! production implementation over [`reqwest`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use callflow_core::export::AgentExport;
use callflow_core::reconcile::CommittedConfig;
use callflow_core::types::{DbId, Timestamp};

use crate::config::ClientConfig;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A stored configuration version as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigVersion {
    pub id: DbId,
    pub agent_id: DbId,
    pub version: i32,
    pub config_json: serde_json::Value,
    pub global_prompt: Option<String>,
    pub rag_enabled: bool,
    pub rag_config_id: Option<DbId>,
    pub voice_config_id: Option<DbId>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl ConfigVersion {
    /// The fields a save reconciles against.
    pub fn committed_config(&self) -> CommittedConfig {
        CommittedConfig {
            config_json: self.config_json.clone(),
            global_prompt: self.global_prompt.clone(),
            rag_enabled: self.rag_enabled,
            rag_config_id: self.rag_config_id,
            voice_config_id: self.voice_config_id,
        }
    }
}

/// Agent detail including its active version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDetail {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub active_version: Option<ConfigVersion>,
}

/// Body of `POST /agents/{agent_id}/versions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitVersionRequest {
    pub config_json: serde_json::Value,
    pub notes: Option<String>,
    pub global_prompt: Option<String>,
    pub rag_enabled: bool,
    pub rag_config_id: Option<DbId>,
    pub voice_config_id: Option<DbId>,
    pub auto_activate: bool,
}

/// Identity of a freshly committed version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedVersion {
    pub id: DbId,
    pub version: i32,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// One field-level problem reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDetail {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    code: Option<String>,
    #[serde(default)]
    details: Vec<FieldDetail>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the agent REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
        details: Vec<FieldDetail>,
    },
}

impl ApiError {
    /// Human-readable message: the base message plus any field-level
    /// details joined with `"; "`.
    pub fn full_message(&self) -> String {
        match self {
            ApiError::Api {
                message, details, ..
            } if !details.is_empty() => {
                let joined = details
                    .iter()
                    .map(|d| format!("{}: {}", d.field, d.message))
                    .collect::<Vec<_>>()
                    .join("; ");
                format!("{message}: {joined}")
            }
            other => other.to_string(),
        }
    }

    /// HTTP status for server-side failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Request(err) => err.status().map(|s| s.as_u16()),
        }
    }
}

// ---------------------------------------------------------------------------
// Trait seam
// ---------------------------------------------------------------------------

/// Server operations the editing session needs.
#[async_trait]
pub trait AgentApi: Send + Sync {
    async fn get_agent(&self, agent_id: DbId) -> Result<AgentDetail, ApiError>;

    async fn commit_version(
        &self,
        agent_id: DbId,
        request: &CommitVersionRequest,
    ) -> Result<CommittedVersion, ApiError>;

    async fn activate_version(
        &self,
        agent_id: DbId,
        version_id: DbId,
    ) -> Result<ConfigVersion, ApiError>;

    async fn export_agent(
        &self,
        agent_id: DbId,
        version: Option<i32>,
    ) -> Result<AgentExport, ApiError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// HTTP client for the `/api/v1` agent endpoints.
pub struct HttpAgentApi {
    client: reqwest::Client,
    api_url: String,
}

impl HttpAgentApi {
    /// Create a client for `api_url`, e.g. `http://host:3000/api/v1`.
    pub fn new(api_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Build a client honoring the configured base URL and request timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. On failure the
    /// `{ error, code, details }` body is decoded when present, otherwise
    /// the raw text becomes the message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        let err = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => ApiError::Api {
                status: status.as_u16(),
                message: body.error,
                code: body.code,
                details: body.details,
            },
            Err(_) => ApiError::Api {
                status: status.as_u16(),
                message: if text.is_empty() {
                    format!("Request failed with status {status}")
                } else {
                    text
                },
                code: None,
                details: Vec::new(),
            },
        };
        Err(err)
    }

    /// Parse a successful `{ "data": T }` response.
    async fn parse_data<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<DataEnvelope<T>>().await?.data)
    }
}

#[async_trait]
impl AgentApi for HttpAgentApi {
    async fn get_agent(&self, agent_id: DbId) -> Result<AgentDetail, ApiError> {
        let response = self
            .client
            .get(format!("{}/agents/{agent_id}", self.api_url))
            .send()
            .await?;

        Self::parse_data(response).await
    }

    async fn commit_version(
        &self,
        agent_id: DbId,
        request: &CommitVersionRequest,
    ) -> Result<CommittedVersion, ApiError> {
        let response = self
            .client
            .post(format!("{}/agents/{agent_id}/versions", self.api_url))
            .json(request)
            .send()
            .await?;

        Self::parse_data(response).await
    }

    async fn activate_version(
        &self,
        agent_id: DbId,
        version_id: DbId,
    ) -> Result<ConfigVersion, ApiError> {
        let response = self
            .client
            .put(format!(
                "{}/agents/{agent_id}/versions/{version_id}/activate",
                self.api_url
            ))
            .send()
            .await?;

        Self::parse_data(response).await
    }

    async fn export_agent(
        &self,
        agent_id: DbId,
        version: Option<i32>,
    ) -> Result<AgentExport, ApiError> {
        let mut request = self
            .client
            .get(format!("{}/agents/{agent_id}/export", self.api_url));
        if let Some(version) = version {
            request = request.query(&[("version", version)]);
        }

        Self::parse_data(request.send().await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(details: Vec<FieldDetail>) -> ApiError {
        ApiError::Api {
            status: 400,
            message: "Request validation failed".into(),
            code: Some("VALIDATION_ERROR".into()),
            details,
        }
    }

    #[test]
    fn base_url_is_stored_without_trailing_slash() {
        let api = HttpAgentApi::new("http://localhost:3000/api/v1/".into());
        assert_eq!(api.api_url(), "http://localhost:3000/api/v1");

        let config = ClientConfig {
            api_url: "http://localhost:3000/api/v1//".into(),
            ..ClientConfig::default()
        };
        assert_eq!(
            HttpAgentApi::from_config(&config).unwrap().api_url(),
            "http://localhost:3000/api/v1"
        );
    }

    #[test]
    fn full_message_without_details_is_base_message() {
        assert_eq!(api_error(vec![]).full_message(), "Request validation failed");
    }

    #[test]
    fn full_message_joins_details() {
        let err = api_error(vec![
            FieldDetail {
                field: "notes".into(),
                message: "must be at most 1000 characters".into(),
            },
            FieldDetail {
                field: "globalPrompt".into(),
                message: "must be at most 20000 characters".into(),
            },
        ]);
        assert_eq!(
            err.full_message(),
            "Request validation failed: notes: must be at most 1000 characters; \
             globalPrompt: must be at most 20000 characters"
        );
    }

    #[test]
    fn error_body_details_default_to_empty() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"Agent with id 4 not found","code":"NOT_FOUND"}"#)
                .unwrap();
        assert!(body.details.is_empty());
        assert_eq!(body.code.as_deref(), Some("NOT_FOUND"));
    }

    #[test]
    fn agent_detail_decodes_null_active_version() {
        let detail: AgentDetail = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Support",
            "description": null,
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z",
            "activeVersion": null
        }))
        .unwrap();
        assert_eq!(detail.active_version, None);
    }
}
