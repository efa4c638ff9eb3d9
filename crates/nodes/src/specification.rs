//! Specification generation stage.

use pipeline::render::{render_prompt, SAMPLING_TEMPERATURE, SYSTEM_INSTRUCTION};
use pipeline::{
    CompletionRequest, GenerationError, IssueRequest, LanguageModel, SourceContext,
    SpecificationRecord,
};
use tracing::{debug, instrument};

/// Builds the prompt, calls the model once, and parses the reply strictly.
///
/// There is no retry and no fallback record: any failure is returned to the
/// executor, which aborts the run.
pub struct SpecificationGenerator {
    model: Box<dyn LanguageModel>,
}

impl SpecificationGenerator {
    pub fn new(model: Box<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// The request sent for `issue` and `context`.
    pub fn request_for(issue: &IssueRequest, context: &SourceContext) -> CompletionRequest {
        CompletionRequest {
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt: render_prompt(issue, context),
            temperature: SAMPLING_TEMPERATURE,
            json_object: true,
        }
    }

    #[instrument(skip_all, fields(issue = %issue.id, files = context.len()))]
    pub async fn generate(
        &self,
        issue: &IssueRequest,
        context: &SourceContext,
    ) -> Result<SpecificationRecord, GenerationError> {
        let request = Self::request_for(issue, context);
        debug!(prompt_chars = request.prompt.chars().count(), "sending generation request");

        let reply = self.model.complete(&request).await?;
        let spec = SpecificationRecord::from_json(&reply)?;

        debug!(criteria = spec.acceptance_criteria.len(), "specification parsed");
        Ok(spec)
    }
}
