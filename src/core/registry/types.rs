//! Function descriptor types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Kind of execution engine a function needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionType {
    #[default]
    Code,
    Generative,
    Agentic,
    Human,
    Cascade,
}

impl FunctionType {
    pub const ALL: [FunctionType; 5] = [
        FunctionType::Code,
        FunctionType::Generative,
        FunctionType::Agentic,
        FunctionType::Human,
        FunctionType::Cascade,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionType::Code => "code",
            FunctionType::Generative => "generative",
            FunctionType::Agentic => "agentic",
            FunctionType::Human => "human",
            FunctionType::Cascade => "cascade",
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FunctionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(FunctionType::Code),
            "generative" => Ok(FunctionType::Generative),
            "agentic" => Ok(FunctionType::Agentic),
            "human" => Ok(FunctionType::Human),
            "cascade" => Ok(FunctionType::Cascade),
            other => Err(format!("Unknown function type: {}", other)),
        }
    }
}

/// Metadata for one registered function version
///
/// `type` is kept as the raw tag so descriptors written by newer platform
/// versions still load; [`FunctionDescriptor::function_type`] resolves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub id: String,
    pub version: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(
        default,
        alias = "timeoutMs",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout_ms: Option<u64>,
    /// Type-specific fields passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FunctionDescriptor {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            kind: None,
            language: None,
            timeout_ms: None,
            extra: Map::new(),
        }
    }

    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Type tag, `code` when absent
    pub fn type_name(&self) -> &str {
        self.kind.as_deref().unwrap_or(FunctionType::Code.as_str())
    }

    /// Resolved type; `None` for tags this gateway does not know
    pub fn function_type(&self) -> Option<FunctionType> {
        self.type_name().parse().ok()
    }
}
