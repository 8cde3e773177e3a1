//! Remote generation client.
//!
//! Every entry point validates its inputs, then refuses to proceed without an
//! API key, before anything is sent over the wire. Provider failures are
//! classified once and never retried.

use tracing::{debug, info, warn};

use crate::model::{
    AdEconomicsReport, AdInputs, AdvertiserBrief, ProposalInputs, ScenePlanItem, ScriptResult,
    ShotRecord,
};
use crate::prompts::{self, ComposedPrompt};

pub mod decode;
pub mod error;
pub mod transport;

pub use decode::{decode_json, strip_code_fences};
pub use error::{classify, GenerationError, TransportError};
pub use transport::{GeminiTransport, GenerationRequest, GenerationTransport, DEFAULT_API_BASE};

pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

pub struct GenerationClient<T> {
    transport: T,
    api_key: Option<String>,
    model: String,
}

impl<T: GenerationTransport> GenerationClient<T> {
    pub fn new(transport: T, api_key: Option<String>) -> Self {
        Self {
            transport,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: DEFAULT_MODEL.to_owned(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn generate_script(
        &self,
        brief: &AdvertiserBrief,
    ) -> Result<ScriptResult, GenerationError> {
        prompts::script::validate_brief(brief)?;
        let raw = self
            .run(prompts::script::compose_generation(brief))
            .await?;
        let result: ScriptResult = decode_json(&raw, "script result")?;
        flag_unknown_patterns(&result);
        Ok(result)
    }

    pub async fn tune_script(&self, script: &str) -> Result<ScriptResult, GenerationError> {
        prompts::script::validate_tuning(script)?;
        let raw = self.run(prompts::script::compose_tuning(script)).await?;
        let result: ScriptResult = decode_json(&raw, "script result")?;
        flag_unknown_patterns(&result);
        Ok(result)
    }

    pub async fn generate_scene_plan(
        &self,
        script: &str,
        shots: &[ShotRecord],
    ) -> Result<Vec<ScenePlanItem>, GenerationError> {
        prompts::scene::validate(script)?;
        let raw = self.run(prompts::scene::compose(script, shots)).await?;
        let plan: Vec<ScenePlanItem> = decode_json(&raw, "scene plan")?;
        for item in &plan {
            for recommendation in &item.recommendations {
                if !shots.iter().any(|shot| shot.name == recommendation.shot_name) {
                    warn!(
                        sentence_id = item.sentence_id,
                        shot = %recommendation.shot_name,
                        "recommended shot is not in the reference collection"
                    );
                }
            }
        }
        Ok(plan)
    }

    pub async fn analyze_economics(
        &self,
        inputs: &AdInputs,
    ) -> Result<AdEconomicsReport, GenerationError> {
        prompts::economics::validate(inputs)?;
        let expected = prompts::economics::select_mode(inputs);
        let raw = self.run(prompts::economics::compose(inputs)).await?;
        let report: AdEconomicsReport = decode_json(&raw, "ad economics report")?;
        if report.mode() != expected {
            return Err(GenerationError::ModeMismatch {
                expected,
                actual: report.mode(),
            });
        }
        Ok(report)
    }

    pub async fn generate_proposal(
        &self,
        inputs: &ProposalInputs,
    ) -> Result<String, GenerationError> {
        prompts::proposal::validate(inputs)?;
        self.run(prompts::proposal::compose(inputs)).await
    }

    async fn run(&self, prompt: ComposedPrompt) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        debug!(
            task = %prompt.task,
            model = %self.model,
            chars = prompt.instruction.chars().count(),
            "sending generation request"
        );
        let request = GenerationRequest {
            model: self.model.clone(),
            instruction: prompt.instruction,
            schema: prompt.shape.schema().cloned(),
        };

        let text = self
            .transport
            .generate(api_key, &request)
            .await
            .map_err(|error| {
                warn!(task = %prompt.task, status = ?error.status, "generation request failed: {error}");
                classify(error)
            })?;

        let body = strip_code_fences(&text);
        if body.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        info!(task = %prompt.task, chars = body.chars().count(), "generation response received");
        Ok(body)
    }
}

fn flag_unknown_patterns(result: &ScriptResult) {
    if !prompts::script::is_known_hook(&result.hook_type) {
        warn!(hook = %result.hook_type, "script uses a hook outside the catalogue");
    }
    if !prompts::script::is_known_flow(&result.flow_type) {
        warn!(flow = %result.flow_type, "script uses a flow outside the catalogue");
    }
}
