use std::fmt;

use anyhow::Error;
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::generation::GenerationError;
use crate::prompts::ValidationError;
use crate::records::RecordError;
use crate::shell::ShellError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodedErrorKind {
    Usage,
    Auth,
    Records,
    Provider,
    Response,
    Runtime,
}

impl CodedErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Runtime => 1,
            Self::Usage => 2,
            Self::Auth => 3,
            Self::Records => 4,
            Self::Provider => 5,
            Self::Response => 6,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CodedError {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
    pub kind: CodedErrorKind,
}

impl CodedError {
    pub fn new(kind: CodedErrorKind, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            kind,
        }
    }

    pub fn usage(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(CodedErrorKind::Usage, code, message)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            ok: false,
            error: ErrorEnvelopeBody {
                code: self.code.to_owned(),
                message: self.message.clone(),
                details: self.details.clone(),
            },
        }
    }
}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CodedError {}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub ok: bool,
    pub error: ErrorEnvelopeBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelopeBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

pub fn find_coded_error(error: &Error) -> Option<&CodedError> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<CodedError>())
}

impl From<&GenerationError> for CodedError {
    fn from(error: &GenerationError) -> Self {
        let message = error.to_string();
        match error {
            GenerationError::MissingCredential => {
                Self::usage("config.missing_credential", message)
            }
            GenerationError::Validation(validation) => validation.into(),
            GenerationError::InvalidCredential => {
                Self::new(CodedErrorKind::Provider, "provider.invalid_credential", message)
            }
            GenerationError::QuotaExceeded => {
                Self::new(CodedErrorKind::Provider, "provider.quota_exceeded", message)
            }
            GenerationError::Provider(transport) => {
                let coded = Self::new(CodedErrorKind::Provider, "provider.failure", message);
                match transport.status {
                    Some(status) => coded.with_details(json!({ "status": status })),
                    None => coded,
                }
            }
            GenerationError::EmptyResponse => {
                Self::new(CodedErrorKind::Response, "response.empty", message)
            }
            GenerationError::MalformedResponse { expected, raw, .. } => {
                Self::new(CodedErrorKind::Response, "response.malformed", message)
                    .with_details(json!({ "expected": expected, "raw": raw }))
            }
            GenerationError::ModeMismatch { expected, actual } => {
                Self::new(CodedErrorKind::Response, "response.mode_mismatch", message)
                    .with_details(json!({ "expected": expected, "actual": actual }))
            }
        }
    }
}

impl From<&ValidationError> for CodedError {
    fn from(error: &ValidationError) -> Self {
        Self::usage("input.invalid", error.to_string())
            .with_details(json!({ "field": error.field }))
    }
}

impl From<&RecordError> for CodedError {
    fn from(error: &RecordError) -> Self {
        let message = error.to_string();
        match error {
            RecordError::DuplicateId(id) => {
                Self::new(CodedErrorKind::Records, "records.duplicate_id", message)
                    .with_details(json!({ "id": id }))
            }
            RecordError::ProtectedAccount(id) => {
                Self::new(CodedErrorKind::Records, "records.protected_account", message)
                    .with_details(json!({ "id": id }))
            }
            RecordError::Invalid(_) => Self::new(CodedErrorKind::Records, "records.invalid", message),
            RecordError::Storage(_) => Self::new(CodedErrorKind::Runtime, "records.storage", message),
        }
    }
}

impl From<&AuthError> for CodedError {
    fn from(error: &AuthError) -> Self {
        Self::new(CodedErrorKind::Auth, "auth.rejected", error.to_string())
    }
}

impl From<&ShellError> for CodedError {
    fn from(error: &ShellError) -> Self {
        let code = match error {
            ShellError::NotAuthenticated => "auth.rejected",
            ShellError::AdminRequired => "auth.admin_required",
        };
        Self::new(CodedErrorKind::Auth, code, error.to_string())
    }
}

/// An explicit `CodedError` anywhere in the chain wins; otherwise the first
/// recognisable library error is given its stable code.
pub fn code_for(error: &Error) -> CodedError {
    if let Some(coded) = find_coded_error(error) {
        return coded.clone();
    }
    for cause in error.chain() {
        if let Some(generation) = cause.downcast_ref::<GenerationError>() {
            return generation.into();
        }
        if let Some(record) = cause.downcast_ref::<RecordError>() {
            return record.into();
        }
        if let Some(auth) = cause.downcast_ref::<AuthError>() {
            return auth.into();
        }
        if let Some(shell) = cause.downcast_ref::<ShellError>() {
            return shell.into();
        }
        if let Some(validation) = cause.downcast_ref::<ValidationError>() {
            return validation.into();
        }
    }
    CodedError::new(CodedErrorKind::Runtime, "runtime.failure", format!("{error:#}"))
}
