//! The files-to-markdown tool and the dispatch entry point the orchestration
//! host calls.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    path::Path,
    str::FromStr,
};

use serde_json::Value;
use tracing::{debug, error, info};

use crate::{
    converter::{DocumentConverter, MarkdownConverter},
    error::{ConversionError, ToolError},
    schemas::{ConversionResult, InputSchema, ToolDeployment, ToolRunInput},
};

/// Operations the tool exposes by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolMethod {
    FilesToMarkdown,
}

impl ToolMethod {
    pub const ALL: [ToolMethod; 1] = [ToolMethod::FilesToMarkdown];

    pub fn name(self) -> &'static str {
        match self {
            ToolMethod::FilesToMarkdown => "files_to_markdown",
        }
    }
}

impl FromStr for ToolMethod {
    type Err = ToolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.name() == value)
            .ok_or_else(|| ToolError::MethodNotFound(value.to_string()))
    }
}

pub struct FilesToMarkdownTool<C = MarkdownConverter> {
    deployment: ToolDeployment,
    converter: C,
}

impl FilesToMarkdownTool {
    pub fn new(deployment: ToolDeployment) -> Self {
        Self::with_converter(deployment, MarkdownConverter::from_env())
    }
}

impl<C: DocumentConverter> FilesToMarkdownTool<C> {
    pub fn with_converter(deployment: ToolDeployment, converter: C) -> Self {
        Self {
            deployment,
            converter,
        }
    }

    pub fn call(&self, method: ToolMethod, inputs: &InputSchema) -> ConversionResult {
        match method {
            ToolMethod::FilesToMarkdown => self.files_to_markdown(inputs),
        }
    }

    /// Convert a file to markdown. Every failure is reported in the returned
    /// result; nothing escapes as an error or a panic.
    pub fn files_to_markdown(&self, inputs: &InputSchema) -> ConversionResult {
        info!(deployment = ?self.deployment.name, "Converting file: {}", inputs.tool_input_data);

        match self.convert(Path::new(&inputs.tool_input_data), &inputs.tool_input_data) {
            Ok(text_content) => ConversionResult::TextContent(text_content),
            Err(message) => {
                error!("Error converting file: {message} to markdown");
                ConversionResult::Error(message)
            }
        }
    }

    fn convert(&self, path: &Path, raw: &str) -> Result<String, String> {
        if !path.exists() {
            return Err(ConversionError::FileNotFound(raw.to_string()).to_string());
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.converter.convert(path))) {
            Ok(Ok(doc)) => {
                debug!(path = %path.display(), title = ?doc.title, "converted document");
                Ok(doc.text_content)
            }
            Ok(Err(err)) => Err(err.to_string()),
            Err(payload) => Err(format!("conversion panicked: {}", panic_message(&*payload))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run the tool for a module-invocation envelope using the default converter.
pub fn run(module_run: ToolRunInput) -> Result<ConversionResult, ToolError> {
    run_with(module_run, MarkdownConverter::from_env())
}

pub fn run_with<C: DocumentConverter>(
    module_run: ToolRunInput,
    converter: C,
) -> Result<ConversionResult, ToolError> {
    let method: ToolMethod = module_run.inputs.tool_name.parse()?;
    let tool = FilesToMarkdownTool::with_converter(module_run.deployment, converter);
    Ok(tool.call(method, &module_run.inputs))
}

/// Same as [`run`], for envelopes that arrive as untyped JSON.
pub fn run_json(module_run: Value) -> Result<ConversionResult, ToolError> {
    let module_run: ToolRunInput = serde_json::from_value(module_run)?;
    run(module_run)
}
