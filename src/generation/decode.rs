use std::sync::OnceLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::generation::error::GenerationError;

fn fenced_block() -> &'static Regex {
    static FENCED: OnceLock<Regex> = OnceLock::new();
    FENCED.get_or_init(|| {
        Regex::new(r"(?s)^```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)\s*```$")
            .expect("code fence regex should compile")
    })
}

/// Removes a surrounding markdown code fence, with or without a language tag.
pub fn strip_code_fences(input: &str) -> String {
    let trimmed = input.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_owned();
    }
    match fenced_block().captures(trimmed) {
        Some(captures) => captures
            .get(1)
            .map_or("", |body| body.as_str())
            .trim()
            .to_owned(),
        None => trimmed
            .trim_start_matches('`')
            .trim_end_matches('`')
            .trim()
            .to_owned(),
    }
}

pub fn decode_json<T: DeserializeOwned>(
    raw: &str,
    expected: &'static str,
) -> Result<T, GenerationError> {
    serde_json::from_str(raw).map_err(|source| {
        warn!(expected, %source, raw, "generation response did not match the declared shape");
        GenerationError::MalformedResponse {
            expected,
            raw: raw.to_owned(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{decode_json, strip_code_fences};
    use crate::generation::error::GenerationError;
    use crate::model::ScenePlanItem;

    #[test]
    fn fences_are_removed_with_or_without_language_tag() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("  ```json{\"a\":1}```  "), "{\"a\":1}");
        assert_eq!(strip_code_fences("```html\n<!DOCTYPE html>\n```"), "<!DOCTYPE html>");
    }

    #[test]
    fn unfenced_text_is_only_trimmed() {
        assert_eq!(strip_code_fences("  {\"a\":1}\n"), "{\"a\":1}");
        assert_eq!(strip_code_fences("<p>```</p>"), "<p>```</p>");
    }

    #[test]
    fn non_json_is_reported_with_raw_text() {
        let error = decode_json::<Vec<ScenePlanItem>>("sorry, I cannot do that", "scene plan")
            .expect_err("prose should not decode");
        match error {
            GenerationError::MalformedResponse { expected, raw, .. } => {
                assert_eq!(expected, "scene plan");
                assert_eq!(raw, "sorry, I cannot do that");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
