//! In-memory doubles for the editor's server and host seams.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use callflow_core::export::{AgentExport, EXPORT_FORMAT_VERSION};
use callflow_core::navigation::NavigationIntent;
use callflow_core::types::DbId;
use callflow_editor::api::{
    AgentApi, AgentDetail, ApiError, CommitVersionRequest, CommittedVersion, ConfigVersion,
    FieldDetail,
};
use callflow_editor::host::{Navigator, Notification, NotificationLevel, Notifier};
use callflow_editor::session::AgentEditor;

pub const AGENT_ID: DbId = 12;
pub const AGENT_NAME: &str = "Front Desk";

/// A canned failure for the next commit.
#[derive(Debug, Clone)]
pub struct FailNext {
    pub status: u16,
    pub message: String,
    pub details: Vec<FieldDetail>,
}

#[derive(Default)]
struct FakeState {
    versions: Vec<ConfigVersion>,
    commits: Vec<CommitVersionRequest>,
    fail_next_commit: Option<FailNext>,
    fail_next_get: bool,
}

/// Agent API backed by a vector of versions, numbering like the server.
#[derive(Default)]
pub struct FakeAgentApi {
    state: Mutex<FakeState>,
}

impl FakeAgentApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an active version with `config_json`, as another session would.
    pub fn seed_active(&self, config_json: serde_json::Value) -> ConfigVersion {
        let mut state = self.state.lock().unwrap();
        next_version(&mut state, config_json, None, true)
    }

    /// Make `version_id` active without going through the editor.
    pub fn activate_externally(&self, version_id: DbId) {
        let mut state = self.state.lock().unwrap();
        for v in &mut state.versions {
            v.is_active = v.id == version_id;
        }
    }

    /// Make the next `get_agent` call fail with a 500.
    pub fn fail_next_get(&self) {
        self.state.lock().unwrap().fail_next_get = true;
    }

    pub fn fail_next_commit(&self, fail: FailNext) {
        self.state.lock().unwrap().fail_next_commit = Some(fail);
    }

    pub fn commits(&self) -> Vec<CommitVersionRequest> {
        self.state.lock().unwrap().commits.clone()
    }

    pub fn active(&self) -> Option<ConfigVersion> {
        self.state
            .lock()
            .unwrap()
            .versions
            .iter()
            .find(|v| v.is_active)
            .cloned()
    }

    pub fn versions(&self) -> Vec<ConfigVersion> {
        self.state.lock().unwrap().versions.clone()
    }
}

fn next_version(
    state: &mut FakeState,
    config_json: serde_json::Value,
    notes: Option<String>,
    activate: bool,
) -> ConfigVersion {
    let number = state.versions.len() as i32 + 1;
    if activate {
        for v in &mut state.versions {
            v.is_active = false;
        }
    }
    let version = ConfigVersion {
        id: 100 + number as DbId,
        agent_id: AGENT_ID,
        version: number,
        config_json,
        global_prompt: None,
        rag_enabled: false,
        rag_config_id: None,
        voice_config_id: None,
        notes,
        created_by: None,
        is_active: activate,
        created_at: Utc::now(),
    };
    state.versions.push(version.clone());
    version
}

fn not_found(entity: &str, id: DbId) -> ApiError {
    ApiError::Api {
        status: 404,
        message: format!("{entity} with id {id} not found"),
        code: Some("NOT_FOUND".into()),
        details: Vec::new(),
    }
}

#[async_trait]
impl AgentApi for FakeAgentApi {
    async fn get_agent(&self, agent_id: DbId) -> Result<AgentDetail, ApiError> {
        if agent_id != AGENT_ID {
            return Err(not_found("Agent", agent_id));
        }
        if std::mem::take(&mut self.state.lock().unwrap().fail_next_get) {
            return Err(ApiError::Api {
                status: 500,
                message: "An internal error occurred".into(),
                code: Some("INTERNAL_ERROR".into()),
                details: Vec::new(),
            });
        }
        Ok(AgentDetail {
            id: AGENT_ID,
            name: AGENT_NAME.into(),
            description: None,
            active_version: self.active(),
        })
    }

    async fn commit_version(
        &self,
        agent_id: DbId,
        request: &CommitVersionRequest,
    ) -> Result<CommittedVersion, ApiError> {
        if agent_id != AGENT_ID {
            return Err(not_found("Agent", agent_id));
        }
        let mut state = self.state.lock().unwrap();
        if let Some(fail) = state.fail_next_commit.take() {
            return Err(ApiError::Api {
                status: fail.status,
                message: fail.message,
                code: Some("VALIDATION_ERROR".into()),
                details: fail.details,
            });
        }

        state.commits.push(request.clone());
        next_version(
            &mut state,
            request.config_json.clone(),
            request.notes.clone(),
            request.auto_activate,
        );
        let stored = state.versions.last_mut().unwrap();
        stored.global_prompt = request.global_prompt.clone();
        stored.rag_enabled = request.rag_enabled;
        stored.rag_config_id = request.rag_config_id;
        stored.voice_config_id = request.voice_config_id;

        Ok(CommittedVersion {
            id: stored.id,
            version: stored.version,
        })
    }

    async fn activate_version(
        &self,
        _agent_id: DbId,
        version_id: DbId,
    ) -> Result<ConfigVersion, ApiError> {
        let mut state = self.state.lock().unwrap();
        if !state.versions.iter().any(|v| v.id == version_id) {
            return Err(not_found("ConfigVersion", version_id));
        }
        for v in &mut state.versions {
            v.is_active = v.id == version_id;
        }
        Ok(state
            .versions
            .iter()
            .find(|v| v.id == version_id)
            .cloned()
            .unwrap())
    }

    async fn export_agent(
        &self,
        _agent_id: DbId,
        version: Option<i32>,
    ) -> Result<AgentExport, ApiError> {
        let state = self.state.lock().unwrap();
        let found = match version {
            Some(n) => state.versions.iter().find(|v| v.version == n),
            None => state.versions.iter().find(|v| v.is_active),
        };
        let Some(v) = found else {
            return Err(ApiError::Api {
                status: 409,
                message: "Agent has no configuration versions to export".into(),
                code: Some("CONFLICT".into()),
                details: Vec::new(),
            });
        };
        Ok(AgentExport {
            format_version: EXPORT_FORMAT_VERSION,
            agent_name: AGENT_NAME.into(),
            version: v.version,
            exported_at: Utc::now(),
            config_json: v.config_json.clone(),
            global_prompt: v.global_prompt.clone(),
            rag_enabled: v.rag_enabled,
            rag_config_id: v.rag_config_id,
            voice_config_id: v.voice_config_id,
        })
    }
}

/// Records every navigation the editor performs.
#[derive(Default)]
pub struct RecordingNavigator {
    pub calls: Mutex<Vec<(String, NavigationIntent)>>,
}

impl RecordingNavigator {
    pub fn calls(&self) -> Vec<(String, NavigationIntent)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str, intent: NavigationIntent) {
        self.calls.lock().unwrap().push((path.to_string(), intent));
    }
}

/// Records every toast the editor shows.
#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications.lock().unwrap().last().cloned()
    }

    pub fn errors(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|n| n.level == NotificationLevel::Error)
            .map(|n| n.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

/// Everything a test needs to drive one editing page.
pub struct Harness {
    pub api: Arc<FakeAgentApi>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
    pub editor: AgentEditor,
}

/// A committed baseline with a small workflow graph.
pub fn baseline_config() -> serde_json::Value {
    json!({
        "workflow": {
            "nodes": [{ "id": "start", "type": "startCall" }],
            "edges": []
        }
    })
}

pub fn edited_config(node: &str) -> serde_json::Value {
    json!({
        "workflow": {
            "nodes": [
                { "id": "start", "type": "startCall" },
                { "id": node, "type": "agentNode" }
            ],
            "edges": [{ "source": "start", "target": node }]
        }
    })
}

/// An editor mounted on an agent whose version 1 is active.
pub async fn mounted_editor() -> Harness {
    let api = Arc::new(FakeAgentApi::new());
    api.seed_active(baseline_config());

    let navigator = Arc::new(RecordingNavigator::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let mut editor = AgentEditor::new(
        AGENT_ID,
        api.clone(),
        navigator.clone(),
        notifier.clone(),
    );
    editor.refresh().await.unwrap();

    Harness {
        api,
        navigator,
        notifier,
        editor,
    }
}
