//! Turning a server export snapshot into a downloadable file.

use callflow_core::export::{export_file_name, AgentExport};

use crate::api::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ExportError {
    pub fn full_message(&self) -> String {
        match self {
            ExportError::Api(err) => err.full_message(),
            other => other.to_string(),
        }
    }
}

/// A file ready to hand to the host's download mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

/// Serialize `export` pretty-printed, named after the agent and version.
pub fn build_export_file(export: &AgentExport) -> Result<ExportFile, serde_json::Error> {
    Ok(ExportFile {
        file_name: export_file_name(&export.agent_name, export.version),
        contents: serde_json::to_string_pretty(export)?,
    })
}
