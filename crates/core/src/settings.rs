//! Settings-form draft and its projection into a `config_json` payload.
//!
//! The settings surface edits a flat bag of typed fields. On save each group
//! of fields is written into its canonical nested block (see
//! [`crate::agent_config`]). Reading a committed payload back into a
//! [`SettingsDraft`] is the inverse, so a draft initialised from the
//! committed version and saved unchanged reproduces the same blocks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::agent_config::{workflow_keys, AUTO_HANGUP_KEY, WORKFLOW_KEY};
use crate::reconcile::CommittedConfig;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Draft types
// ---------------------------------------------------------------------------

/// The settings surface's in-progress edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsDraft {
    pub llm_enabled: bool,
    pub llm_provider_id: Option<String>,
    pub llm_model: Option<String>,
    pub llm_temperature: Option<f64>,
    pub llm_max_tokens: Option<u32>,

    pub extraction_llm_enabled: bool,
    pub extraction_llm_provider_id: Option<String>,
    pub extraction_llm_model: Option<String>,

    pub tts_enabled: bool,
    pub tts_provider_id: Option<String>,
    pub tts_voice_id: Option<String>,
    pub tts_model: Option<String>,
    pub tts_speed: Option<f64>,

    /// Per-agent RAG override; written to the version's scalar columns.
    pub rag_enabled: bool,
    pub rag_config_id: Option<DbId>,
    pub voice_config_id: Option<DbId>,
    pub global_prompt: Option<String>,

    pub auto_hangup_enabled: bool,
    pub auto_hangup_silence_timeout_secs: Option<u32>,
    pub auto_hangup_max_duration_secs: Option<u32>,

    pub webhooks: Vec<WebhookSetting>,

    pub post_call_analysis_enabled: bool,
    pub post_call_analysis_provider_id: Option<String>,
    pub post_call_analysis_model: Option<String>,
    pub post_call_questions: Vec<PostCallQuestion>,

    pub global_intents: Vec<GlobalIntent>,
}

/// An outbound webhook fired on call lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSetting {
    pub url: String,
    pub events: Vec<String>,
    pub secret: Option<String>,
}

/// Answer type of a post-call analysis question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    String,
    Number,
    Boolean,
    Enum,
}

impl QuestionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
        }
    }

    fn parse(value: &str) -> Self {
        match value {
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "enum" => Self::Enum,
            _ => Self::String,
        }
    }
}

/// A question the post-call analysis LLM answers about each call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCallQuestion {
    pub name: String,
    pub description: String,
    pub question_type: QuestionType,
    pub choices: Vec<String>,
    pub required: bool,
}

/// An intent recognised at any point of the call, outside the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalIntent {
    pub name: String,
    pub description: String,
    pub phrases: Vec<String>,
}

// ---------------------------------------------------------------------------
// Projection (draft -> payload)
// ---------------------------------------------------------------------------

/// Write every settings block into `config_json`, replacing each target block
/// wholesale and leaving all other keys untouched.
///
/// A non-object `config_json` (or `workflow` entry) is replaced by an object.
pub fn project_into(config_json: &mut Value, draft: &SettingsDraft) {
    let root = ensure_object(config_json);

    let workflow = ensure_object(
        root.entry(WORKFLOW_KEY)
            .or_insert_with(|| Value::Object(Map::new())),
    );
    workflow.insert(workflow_keys::LLM.to_string(), draft.llm_block());
    workflow.insert(
        workflow_keys::EXTRACTION_LLM.to_string(),
        draft.extraction_llm_block(),
    );
    workflow.insert(workflow_keys::TTS.to_string(), draft.tts_block());
    workflow.insert(
        workflow_keys::POST_CALL_ANALYSIS.to_string(),
        draft.post_call_analysis_block(),
    );
    workflow.insert(workflow_keys::WEBHOOKS.to_string(), draft.webhooks_block());
    workflow.insert(
        workflow_keys::GLOBAL_INTENTS.to_string(),
        draft.global_intents_block(),
    );

    root.insert(AUTO_HANGUP_KEY.to_string(), draft.auto_hangup_block());
}

impl SettingsDraft {
    fn llm_block(&self) -> Value {
        let mut block = Map::new();
        block.insert("enabled".into(), Value::Bool(self.llm_enabled));
        insert_identifier(&mut block, "provider_id", &self.llm_provider_id);
        insert_opt(&mut block, "model", &self.llm_model);
        insert_opt(&mut block, "temperature", &self.llm_temperature);
        insert_opt(&mut block, "max_tokens", &self.llm_max_tokens);
        Value::Object(block)
    }

    fn extraction_llm_block(&self) -> Value {
        let mut block = Map::new();
        block.insert("enabled".into(), Value::Bool(self.extraction_llm_enabled));
        insert_identifier(&mut block, "provider_id", &self.extraction_llm_provider_id);
        insert_opt(&mut block, "model", &self.extraction_llm_model);
        Value::Object(block)
    }

    fn tts_block(&self) -> Value {
        let mut block = Map::new();
        block.insert("enabled".into(), Value::Bool(self.tts_enabled));
        insert_identifier(&mut block, "provider_id", &self.tts_provider_id);
        insert_opt(&mut block, "voice_id", &self.tts_voice_id);
        insert_opt(&mut block, "model", &self.tts_model);
        insert_opt(&mut block, "speed", &self.tts_speed);
        Value::Object(block)
    }

    fn post_call_analysis_block(&self) -> Value {
        let mut block = Map::new();
        block.insert(
            "enabled".into(),
            Value::Bool(self.post_call_analysis_enabled),
        );
        insert_identifier(
            &mut block,
            "provider_id",
            &self.post_call_analysis_provider_id,
        );
        insert_opt(&mut block, "model", &self.post_call_analysis_model);
        let questions = self
            .post_call_questions
            .iter()
            .map(PostCallQuestion::to_payload)
            .collect();
        block.insert("questions".into(), Value::Array(questions));
        Value::Object(block)
    }

    fn webhooks_block(&self) -> Value {
        let hooks = self
            .webhooks
            .iter()
            .map(|hook| {
                let mut entry = Map::new();
                entry.insert("url".into(), Value::String(hook.url.clone()));
                entry.insert("events".into(), string_array(&hook.events));
                insert_opt(&mut entry, "secret", &hook.secret);
                Value::Object(entry)
            })
            .collect();
        Value::Array(hooks)
    }

    fn global_intents_block(&self) -> Value {
        let intents = self
            .global_intents
            .iter()
            .map(|intent| {
                let mut entry = Map::new();
                entry.insert("name".into(), Value::String(intent.name.clone()));
                entry.insert(
                    "description".into(),
                    Value::String(intent.description.clone()),
                );
                entry.insert("phrases".into(), string_array(&intent.phrases));
                Value::Object(entry)
            })
            .collect();
        Value::Array(intents)
    }

    fn auto_hangup_block(&self) -> Value {
        let mut block = Map::new();
        block.insert("enabled".into(), Value::Bool(self.auto_hangup_enabled));
        insert_opt(
            &mut block,
            "silence_timeout_secs",
            &self.auto_hangup_silence_timeout_secs,
        );
        insert_opt(
            &mut block,
            "max_duration_secs",
            &self.auto_hangup_max_duration_secs,
        );
        Value::Object(block)
    }
}

impl PostCallQuestion {
    /// Serialize a question, omitting sub-fields that hold their defaults:
    /// `type` unless not `"string"`, `choices` unless non-empty, `required`
    /// unless `true`.
    fn to_payload(&self) -> Value {
        let mut entry = Map::new();
        entry.insert("name".into(), Value::String(self.name.clone()));
        entry.insert(
            "description".into(),
            Value::String(self.description.clone()),
        );
        if self.question_type != QuestionType::String {
            entry.insert(
                "type".into(),
                Value::String(self.question_type.as_str().to_string()),
            );
        }
        if !self.choices.is_empty() {
            entry.insert("choices".into(), string_array(&self.choices));
        }
        if self.required {
            entry.insert("required".into(), Value::Bool(true));
        }
        Value::Object(entry)
    }

    fn from_payload(value: &Value) -> Self {
        Self {
            name: str_field(value, "name").unwrap_or_default(),
            description: str_field(value, "description").unwrap_or_default(),
            question_type: str_field(value, "type")
                .map(|t| QuestionType::parse(&t))
                .unwrap_or_default(),
            choices: string_list(value.get("choices")),
            required: bool_field(value, "required"),
        }
    }
}

// ---------------------------------------------------------------------------
// Read-back (payload -> draft)
// ---------------------------------------------------------------------------

impl SettingsDraft {
    /// Build a draft that mirrors the committed configuration.
    ///
    /// Missing blocks and fields fall back to their defaults.
    pub fn from_committed(committed: &CommittedConfig) -> Self {
        let workflow = committed.config_json.get(WORKFLOW_KEY);

        let llm = nested_block(workflow, workflow_keys::LLM);
        let extraction = nested_block(workflow, workflow_keys::EXTRACTION_LLM);
        let tts = nested_block(workflow, workflow_keys::TTS);
        let analysis = nested_block(workflow, workflow_keys::POST_CALL_ANALYSIS);
        let hangup = committed
            .config_json
            .get(AUTO_HANGUP_KEY)
            .unwrap_or(&Value::Null);

        let webhooks = nested_block(workflow, workflow_keys::WEBHOOKS)
            .as_array()
            .map(|hooks| {
                hooks
                    .iter()
                    .map(|hook| WebhookSetting {
                        url: str_field(hook, "url").unwrap_or_default(),
                        events: string_list(hook.get("events")),
                        secret: str_field(hook, "secret"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let global_intents = nested_block(workflow, workflow_keys::GLOBAL_INTENTS)
            .as_array()
            .map(|intents| {
                intents
                    .iter()
                    .map(|intent| GlobalIntent {
                        name: str_field(intent, "name").unwrap_or_default(),
                        description: str_field(intent, "description").unwrap_or_default(),
                        phrases: string_list(intent.get("phrases")),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let post_call_questions = analysis
            .get("questions")
            .and_then(Value::as_array)
            .map(|qs| qs.iter().map(PostCallQuestion::from_payload).collect())
            .unwrap_or_default();

        Self {
            llm_enabled: bool_field(llm, "enabled"),
            llm_provider_id: str_field(llm, "provider_id"),
            llm_model: str_field(llm, "model"),
            llm_temperature: llm.get("temperature").and_then(Value::as_f64),
            llm_max_tokens: u32_field(llm, "max_tokens"),

            extraction_llm_enabled: bool_field(extraction, "enabled"),
            extraction_llm_provider_id: str_field(extraction, "provider_id"),
            extraction_llm_model: str_field(extraction, "model"),

            tts_enabled: bool_field(tts, "enabled"),
            tts_provider_id: str_field(tts, "provider_id"),
            tts_voice_id: str_field(tts, "voice_id"),
            tts_model: str_field(tts, "model"),
            tts_speed: tts.get("speed").and_then(Value::as_f64),

            rag_enabled: committed.rag_enabled,
            rag_config_id: committed.rag_config_id,
            voice_config_id: committed.voice_config_id,
            global_prompt: committed.global_prompt.clone(),

            auto_hangup_enabled: bool_field(hangup, "enabled"),
            auto_hangup_silence_timeout_secs: u32_field(hangup, "silence_timeout_secs"),
            auto_hangup_max_duration_secs: u32_field(hangup, "max_duration_secs"),

            webhooks,

            post_call_analysis_enabled: bool_field(analysis, "enabled"),
            post_call_analysis_provider_id: str_field(analysis, "provider_id"),
            post_call_analysis_model: str_field(analysis, "model"),
            post_call_questions,

            global_intents,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Coerce `value` into an object in place and return its map.
fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just coerced to an object"),
    }
}

/// Look up a block under the workflow object, or `null` when absent.
fn nested_block<'a>(workflow: Option<&'a Value>, key: &str) -> &'a Value {
    workflow.and_then(|w| w.get(key)).unwrap_or(&Value::Null)
}

/// Insert an optional identifier only when it is present and non-empty.
fn insert_identifier(block: &mut Map<String, Value>, key: &str, id: &Option<String>) {
    if let Some(id) = id.as_deref().filter(|id| !id.is_empty()) {
        block.insert(key.to_string(), Value::String(id.to_string()));
    }
}

fn insert_opt<T: Serialize>(block: &mut Map<String, Value>, key: &str, value: &Option<T>) {
    if let Some(value) = value {
        if let Ok(json) = serde_json::to_value(value) {
            block.insert(key.to_string(), json);
        }
    }
}

fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn bool_field(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn u32_field(value: &Value, key: &str) -> Option<u32> {
    value
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
