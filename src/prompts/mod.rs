//! Instruction templates for each generation task.
//!
//! Composers are pure: the same inputs always yield the same instruction text
//! and the same declared response shape.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

pub mod economics;
pub mod proposal;
pub mod scene;
pub mod script;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    ScriptGeneration,
    ScriptTuning,
    ScenePlan,
    AdEconomics,
    Proposal,
}

impl Task {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScriptGeneration => "script-generation",
            Self::ScriptTuning => "script-tuning",
            Self::ScenePlan => "scene-plan",
            Self::AdEconomics => "ad-economics",
            Self::Proposal => "proposal",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// Structured output constrained by a provider response schema.
    Json { schema: Value },
    /// Free-form markup document.
    Html,
}

impl ResponseShape {
    pub fn schema(&self) -> Option<&Value> {
        match self {
            Self::Json { schema } => Some(schema),
            Self::Html => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    pub task: Task,
    pub instruction: String,
    pub shape: ResponseShape,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub(crate) fn require_text(
    field: &'static str,
    value: &str,
    message: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, message));
    }
    Ok(())
}
