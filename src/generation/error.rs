use thiserror::Error;

use crate::model::EconomicsMode;
use crate::prompts::ValidationError;

/// Raw failure from the transport, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(
        "no API key is configured; set API_KEY (or GEMINI_API_KEY) in the environment and run again"
    )]
    MissingCredential,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("the generation API rejected the API key; check the API_KEY setting")]
    InvalidCredential,
    #[error(
        "the generation API quota is exhausted (429); wait for the quota window to reset or enable billing for the API project"
    )]
    QuotaExceeded,
    #[error("the generation API returned an empty response")]
    EmptyResponse,
    #[error("the generation API response could not be read as {expected}: {source}")]
    MalformedResponse {
        expected: &'static str,
        raw: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("requested a {expected} report but the generation API returned {actual}")]
    ModeMismatch {
        expected: EconomicsMode,
        actual: EconomicsMode,
    },
    #[error(transparent)]
    Provider(TransportError),
}

const QUOTA_SIGNATURES: [&str; 3] = ["429", "Quota exceeded", "RESOURCE_EXHAUSTED"];
const INVALID_KEY_SIGNATURES: [&str; 2] = ["API key not valid", "API_KEY_INVALID"];

/// Maps known provider failure signatures; anything else passes through as is.
pub fn classify(error: TransportError) -> GenerationError {
    if error.status == Some(429)
        || QUOTA_SIGNATURES
            .iter()
            .any(|signature| error.message.contains(signature))
    {
        return GenerationError::QuotaExceeded;
    }
    if matches!(error.status, Some(401) | Some(403))
        || INVALID_KEY_SIGNATURES
            .iter()
            .any(|signature| error.message.contains(signature))
    {
        return GenerationError::InvalidCredential;
    }
    GenerationError::Provider(error)
}

#[cfg(test)]
mod tests {
    use super::{classify, GenerationError, TransportError};

    #[test]
    fn quota_signatures_map_to_quota_exceeded() {
        for error in [
            TransportError::new(Some(429), "Too Many Requests"),
            TransportError::new(Some(400), "Quota exceeded for metric"),
            TransportError::new(None, "status: RESOURCE_EXHAUSTED"),
        ] {
            assert!(matches!(classify(error), GenerationError::QuotaExceeded));
        }
    }

    #[test]
    fn key_rejection_maps_to_invalid_credential() {
        let error = TransportError::new(
            Some(400),
            "API key not valid. Please pass a valid API key.",
        );
        assert!(matches!(classify(error), GenerationError::InvalidCredential));
        assert!(matches!(
            classify(TransportError::new(Some(403), "forbidden")),
            GenerationError::InvalidCredential
        ));
    }

    #[test]
    fn unknown_failures_pass_through_unmodified() {
        let original = TransportError::new(Some(500), "upstream exploded");
        match classify(original.clone()) {
            GenerationError::Provider(error) => assert_eq!(error, original),
            other => panic!("unexpected classification: {other:?}"),
        }
    }
}
