//! Prompt construction for pipeline stages.
//!
//! Every stage is described by one [`StageDefinition`] row. Prompts are
//! composed from the row, the previous stage's output, and the campaign
//! context. Composition is pure and deterministic.

mod campaign;
mod templates;

pub use campaign::{ideas_prompt, strategy_prompt};

use crate::core::StageId;
use crate::errors::PromptBuildError;

/// Heading used when a stage has no inline slot for the prior output.
const PRIOR_CONTEXT_HEADING: &str = "Context from the previous stage";

/// Static description of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDefinition {
    /// The stage identifier.
    pub id: StageId,
    /// Display name.
    pub name: &'static str,
    /// Agent credited with the stage.
    pub agent_label: &'static str,
    /// Opening line used when there is no prior output to quote.
    pub headline: &'static str,
    /// Opening label that quotes the prior output inline, if the stage
    /// builds directly on it.
    pub prior_label: Option<&'static str>,
    /// The instruction list.
    pub instructions: &'static str,
    /// Whether the generation call may use search augmentation.
    pub search_augmented: bool,
}

impl StageDefinition {
    /// Renders the prompt for this stage.
    ///
    /// A non-empty `prior_output` always appears verbatim: inline after the
    /// prior label, or in a trailing context block for stages without one.
    #[must_use]
    pub fn render(&self, prior_output: &str, campaign_context: Option<&str>) -> String {
        let mut prompt = String::new();

        match self.prior_label {
            Some(label) if !prior_output.is_empty() => {
                prompt.push_str(&format!("{label}: \"{prior_output}\""));
            }
            _ => prompt.push_str(self.headline),
        }
        prompt.push_str("\n\n");

        if let Some(ctx) = campaign_context.filter(|c| !c.trim().is_empty()) {
            prompt.push_str(ctx);
            prompt.push_str("\n\n");
        }

        prompt.push_str(self.instructions);

        if self.prior_label.is_none() && !prior_output.is_empty() {
            prompt.push_str(&format!("\n\n{PRIOR_CONTEXT_HEADING}: \"{prior_output}\""));
        }

        prompt
    }
}

/// Returns the definitions of all stages, in pipeline order.
#[must_use]
pub fn definitions() -> &'static [StageDefinition] {
    &templates::DEFINITIONS
}

/// Returns the definition for a stage.
#[must_use]
pub fn definition(id: StageId) -> &'static StageDefinition {
    // The table is ordered like `StageId::ALL`.
    &templates::DEFINITIONS[id as usize]
}

/// Builds the prompt for a stage given by its string identifier.
///
/// # Errors
///
/// Returns [`PromptBuildError::UnknownStage`] if `stage_id` is not one of the
/// known stages.
pub fn build_prompt(
    stage_id: &str,
    prior_output: &str,
    campaign_context: Option<&str>,
) -> Result<String, PromptBuildError> {
    let id: StageId = stage_id.parse()?;
    Ok(render_prompt(id, prior_output, campaign_context))
}

/// Builds the prompt for a stage.
#[must_use]
pub fn render_prompt(id: StageId, prior_output: &str, campaign_context: Option<&str>) -> String {
    definition(id).render(prior_output, campaign_context)
}
