use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Inputs accepted by the tool: the operation to run and the file it applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    pub tool_name: String,
    /// Path to the file to be converted to markdown
    pub tool_input_data: String,
}

impl InputSchema {
    pub fn new(tool_name: impl Into<String>, tool_input_data: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_input_data: tool_input_data.into(),
        }
    }

    /// JSON schema describing the tool inputs, for hosts that advertise tools.
    pub fn json_schema() -> Value {
        json!({
            "title": "InputSchema",
            "type": "object",
            "properties": {
                "tool_name": {
                    "title": "Tool Name",
                    "type": "string"
                },
                "tool_input_data": {
                    "title": "Tool Input Data",
                    "type": "string",
                    "description": "Path to the file to be converted to markdown"
                }
            },
            "required": ["tool_name", "tool_input_data"]
        })
    }
}

/// Outcome of a conversion. Serializes as `{"text_content": ...}` or
/// `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionResult {
    TextContent(String),
    Error(String),
}

impl ConversionResult {
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Self::TextContent(text) => Some(text),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            Self::TextContent(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_type: Option<String>,
}

/// Deployment metadata handed over by the orchestration host. The tool keeps
/// it around but never interprets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolDeployment {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub module: Option<Value>,
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Module-invocation envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRunInput {
    pub inputs: InputSchema,
    #[serde(default)]
    pub deployment: ToolDeployment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}
