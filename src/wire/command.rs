use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::wire::page::Page;

/// Command emitted by the sandbox at a suspension point.
///
/// Exactly one command is outstanding at any time; the script does not run
/// again until the command's response has been resumed into it. Kinds this
/// build does not understand deserialize into [`Command::Unknown`] so a
/// newer script cannot crash an older host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Command {
    /// Ask the UI to display a page and wait for the user.
    RenderPage { page: Page },

    /// Hand a finished donation bundle to the system side. Resolved
    /// immediately with a void payload, without user interaction.
    Donate { key: String, json_string: String },

    /// Catch-all for future command kinds; logged and dropped by the router.
    #[serde(untagged)]
    Unknown(serde_json::Value),
}

impl Command {
    /// Human-readable kind name for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Command::RenderPage { .. } => "render-page",
            Command::Donate { .. } => "donate",
            Command::Unknown(_) => "unknown",
        }
    }
}

/// Reference to a user-selected file on the host filesystem.
///
/// The file itself never crosses into the sandbox; the runtime copies its
/// bytes to a scratch path and delivers that path to the script instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileRef {
    pub name: String,
    pub path: PathBuf,
}

impl FileRef {
    /// Build a reference from a path, using its final component as the name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Self { name, path }
    }
}

/// Value resumed into the suspended script.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Payload {
    /// A JSON document, passed as its serialized text.
    Json { value: String },

    /// Affirmative answer to a confirm prompt.
    True,

    /// Negative answer, or a skipped prompt.
    False,

    /// Plain text value.
    String { value: String },

    /// A file picked by the user; mounted into the sandbox before delivery.
    File { value: FileRef },

    /// Acknowledgement carrying no value (system commands).
    Void,
}

impl Payload {
    /// Human-readable kind name for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Payload::Json { .. } => "json",
            Payload::True => "true",
            Payload::False => "false",
            Payload::String { .. } => "string",
            Payload::File { .. } => "file",
            Payload::Void => "void",
        }
    }
}

/// Identity of one rendered prompt instance, allocated by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromptHandle(u64);

impl PromptHandle {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Pairs a payload with the prompt it resolves.
///
/// A response is consumed exactly once: the engine moves the payload into
/// the next resume and the value is gone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    pub prompt: PromptHandle,
    pub payload: Payload,
}

impl Response {
    pub fn new(prompt: PromptHandle, payload: Payload) -> Self {
        Self { prompt, payload }
    }
}
