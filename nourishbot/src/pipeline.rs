//! Recipe pipeline orchestrator.
//!
//! Models one user submission as a fixed sequential chain of stages:
//! extract ingredients from the image, clean the raw list locally,
//! adjust it for the dietary restriction, then suggest recipes as
//! schema-constrained JSON. Each stage consumes an explicit input struct
//! assembled from named prior outputs; no stage runs before its
//! predecessor's output exists, and any stage failure aborts the run.
//!
//! Each run is identified by a freshly minted run id; nothing about a
//! run touches shared filesystem state, so concurrent runs are
//! independent.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::{ChatProvider, ChatRequest};
use crate::error::{LlmError, Result};
use crate::image::ImageSource;
use crate::ingredients::filter_ingredients;
use crate::llm::LlmConfig;
use crate::message::{ContentPart, Message};
use crate::prompts::PromptTemplates;
use crate::recipe::RecipeSuggestionOutput;
use crate::usage::Usage;

/// Sampling temperature shared by all stages.
const TEMPERATURE: f32 = 0.2;
/// Per-stage completion budgets.
const MAX_TOKENS_EXTRACTION: u32 = 300;
const MAX_TOKENS_DIETARY: u32 = 512;
const MAX_TOKENS_SUGGESTION: u32 = 512;
const MAX_TOKENS_NUTRITION: u32 = 700;

/// One user submission. Owned by a single pipeline run and discarded
/// when the run completes.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// The image to analyze.
    pub image: ImageSource,
    /// Optional free-text dietary restriction (e.g., "vegan").
    pub dietary_restrictions: Option<String>,
}

impl PipelineRequest {
    /// Create a request for the given image with no dietary restriction.
    #[must_use]
    pub const fn new(image: ImageSource) -> Self {
        Self {
            image,
            dietary_restrictions: None,
        }
    }

    /// Set the dietary restriction.
    #[must_use]
    pub fn with_dietary_restrictions(mut self, diet: impl Into<String>) -> Self {
        self.dietary_restrictions = Some(diet.into());
        self
    }
}

/// Run lifecycle states.
///
/// `Failed` is absorbing: it is reachable from any non-terminal state
/// and nothing already computed is cached or reused on retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Run created, nothing executed yet.
    Pending,
    /// Vision stage in flight.
    ExtractingIngredients,
    /// Dietary adjustment stage in flight.
    FilteringByDiet,
    /// Recipe suggestion stage in flight.
    SuggestingRecipes,
    /// All stages finished and the final output validated.
    Completed,
    /// A stage errored; the run aborted.
    Failed,
}

/// The pipeline stages, for reporting and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Vision call turning the image into a raw ingredient string.
    ExtractIngredients,
    /// Text call adjusting ingredients for the dietary restriction.
    FilterByDiet,
    /// Text call producing schema-constrained recipe JSON.
    SuggestRecipes,
}

impl Stage {
    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExtractIngredients => "extract_ingredients",
            Self::FilterByDiet => "filter_by_diet",
            Self::SuggestRecipes => "suggest_recipes",
        }
    }
}

/// Outcome of one completed stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageOutcome {
    /// Which stage ran.
    pub stage: Stage,
    /// Model that served it.
    pub model: String,
    /// Wall-clock duration in milliseconds.
    pub elapsed_ms: u64,
    /// Token usage, if the endpoint reported it.
    pub usage: Option<Usage>,
}

/// Report produced alongside the typed output of every run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique id minted for this run.
    pub run_id: Uuid,
    /// Terminal state of the run.
    pub state: RunState,
    /// Per-stage outcomes in execution order.
    pub stages: Vec<StageOutcome>,
    /// Token usage aggregated across all stages.
    pub usage: Usage,
}

impl RunReport {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            state: RunState::Pending,
            stages: Vec::new(),
            usage: Usage::zero(),
        }
    }
}

/// A successful pipeline run: the validated suggestions plus the report.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// The validated recipe suggestions.
    pub suggestions: RecipeSuggestionOutput,
    /// The run report.
    pub report: RunReport,
}

/// Which model serves which kind of stage.
#[derive(Debug, Clone)]
pub struct StageModels {
    /// Vision-capable model (extraction, nutrition analysis).
    pub vision: String,
    /// Text model (dietary filtering, recipe suggestion).
    pub text: String,
}

impl From<&LlmConfig> for StageModels {
    fn from(config: &LlmConfig) -> Self {
        Self {
            vision: config.vision_model.clone(),
            text: config.text_model.clone(),
        }
    }
}

/// Explicit input to the extraction stage.
struct ExtractionInput {
    image_data_uri: String,
}

/// Explicit input to the dietary stage: the extractor's cleaned output
/// plus the externally supplied restriction.
struct DietaryInput {
    ingredients: Vec<String>,
    dietary_restrictions: Option<String>,
}

/// Explicit input to the suggestion stage.
struct SuggestionInput {
    filtered_ingredients: String,
}

/// The recipe pipeline.
///
/// Holds the chat provider, the per-stage models, the prompt templates
/// and an HTTP client for image fetches. All of it is read-only after
/// construction, so one pipeline can serve concurrent runs.
#[derive(Debug, Clone)]
pub struct RecipePipeline<P> {
    provider: P,
    models: StageModels,
    prompts: PromptTemplates,
    fetcher: reqwest::Client,
}

impl<P: ChatProvider> RecipePipeline<P> {
    /// Create a pipeline with the built-in prompt templates.
    #[must_use]
    pub fn new(provider: P, models: StageModels) -> Self {
        Self {
            provider,
            models,
            prompts: PromptTemplates::builtin(),
            fetcher: reqwest::Client::new(),
        }
    }

    /// Replace the prompt templates.
    #[must_use]
    pub fn with_prompts(mut self, prompts: PromptTemplates) -> Self {
        self.prompts = prompts;
        self
    }

    /// Run the full pipeline for one submission.
    ///
    /// Stages execute strictly in order; the first failure aborts the
    /// run and is returned as-is, after logging the run's terminal
    /// state. There are no retries.
    ///
    /// # Errors
    ///
    /// Propagates image resolution errors, any stage's [`LlmError`],
    /// and [`Error::SchemaValidation`](crate::Error::SchemaValidation)
    /// if the final output does not match the recipe schema.
    pub async fn run(&self, request: PipelineRequest) -> Result<PipelineResult> {
        let run_id = Uuid::new_v4();
        let mut report = RunReport::new(run_id);
        info!(%run_id, image = %request.image, "starting recipe pipeline run");

        match self.run_stages(&request, &mut report).await {
            Ok(suggestions) => {
                report.state = RunState::Completed;
                info!(
                    %run_id,
                    recipes = suggestions.recipes.len(),
                    total_tokens = report.usage.total_tokens,
                    "pipeline run completed"
                );
                Ok(PipelineResult {
                    suggestions,
                    report,
                })
            }
            Err(e) => {
                report.state = RunState::Failed;
                warn!(%run_id, stages_completed = report.stages.len(), error = %e, "pipeline run failed");
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        request: &PipelineRequest,
        report: &mut RunReport,
    ) -> Result<RecipeSuggestionOutput> {
        report.state = RunState::ExtractingIngredients;
        let image_data_uri = request.image.to_data_uri(&self.fetcher).await?;
        let raw = self
            .extract_ingredients(ExtractionInput { image_data_uri }, report)
            .await?;

        let ingredients = filter_ingredients(&raw);

        report.state = RunState::FilteringByDiet;
        let adjusted = self
            .filter_by_diet(
                DietaryInput {
                    ingredients,
                    dietary_restrictions: request.dietary_restrictions.clone(),
                },
                report,
            )
            .await?;

        report.state = RunState::SuggestingRecipes;
        let completion = self
            .suggest_recipes(
                SuggestionInput {
                    filtered_ingredients: adjusted,
                },
                report,
            )
            .await?;

        RecipeSuggestionOutput::from_completion(&completion)
    }

    async fn extract_ingredients(
        &self,
        input: ExtractionInput,
        report: &mut RunReport,
    ) -> Result<String> {
        let prompt = &self.prompts.ingredient_extraction;

        let mut request = ChatRequest::new(&self.models.vision)
            .max_tokens(MAX_TOKENS_EXTRACTION)
            .temperature(TEMPERATURE);
        if !prompt.system.is_empty() {
            request = request.system(&prompt.system);
        }
        let request = request.message(Message::user_parts(vec![
            ContentPart::text(&prompt.user),
            ContentPart::image_url(input.image_data_uri),
        ]));

        self.call_stage(Stage::ExtractIngredients, &request, report)
            .await
    }

    async fn filter_by_diet(&self, input: DietaryInput, report: &mut RunReport) -> Result<String> {
        let prompt = &self.prompts.dietary_filtering;
        let ingredients = input.ingredients.join(", ");
        let diet = input.dietary_restrictions.as_deref().unwrap_or("none");

        let user = prompt.render_user(&[
            ("ingredients", ingredients.as_str()),
            ("dietary_restrictions", diet),
        ]);

        let mut request = ChatRequest::new(&self.models.text)
            .max_tokens(MAX_TOKENS_DIETARY)
            .temperature(TEMPERATURE);
        if !prompt.system.is_empty() {
            request = request.system(&prompt.system);
        }
        let request = request.user(user);

        self.call_stage(Stage::FilterByDiet, &request, report).await
    }

    async fn suggest_recipes(
        &self,
        input: SuggestionInput,
        report: &mut RunReport,
    ) -> Result<String> {
        let prompt = &self.prompts.recipe_suggestion;
        let user = prompt.render_user(&[(
            "filtered_ingredients",
            input.filtered_ingredients.as_str(),
        )]);

        let mut request = ChatRequest::new(&self.models.text)
            .max_tokens(MAX_TOKENS_SUGGESTION)
            .temperature(TEMPERATURE)
            .output_type::<RecipeSuggestionOutput>();
        if !prompt.system.is_empty() {
            request = request.system(&prompt.system);
        }
        let request = request.user(user);

        self.call_stage(Stage::SuggestRecipes, &request, report)
            .await
    }

    /// Issue one stage's completion call and record its outcome.
    async fn call_stage(
        &self,
        stage: Stage,
        request: &ChatRequest,
        report: &mut RunReport,
    ) -> Result<String> {
        let started = Instant::now();
        let response = self.provider.chat(request).await?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let text = response
            .text()
            .map(str::to_owned)
            .ok_or_else(|| LlmError::response_format("text content", "empty message"))?;

        if let Some(usage) = response.usage {
            report.usage += usage;
        }
        info!(
            run_id = %report.run_id,
            stage = stage.as_str(),
            model = %request.model,
            elapsed_ms,
            total_tokens = response.usage.map_or(0, |u| u.total_tokens),
            "stage completed"
        );
        report.stages.push(StageOutcome {
            stage,
            model: request.model.clone(),
            elapsed_ms,
            usage: response.usage,
        });

        Ok(text)
    }

    /// Standalone nutrition analysis of a single image.
    ///
    /// One vision completion producing a structured markdown report,
    /// returned verbatim without schema validation.
    ///
    /// # Errors
    ///
    /// Propagates image resolution errors and the stage's [`LlmError`].
    pub async fn nutrition_report(&self, image: &ImageSource) -> Result<String> {
        let prompt = &self.prompts.nutrition_analysis;
        let image_data_uri = image.to_data_uri(&self.fetcher).await?;

        let mut request = ChatRequest::new(&self.models.vision)
            .max_tokens(MAX_TOKENS_NUTRITION)
            .temperature(TEMPERATURE);
        if !prompt.system.is_empty() {
            request = request.system(&prompt.system);
        }
        let request = request.message(Message::user_parts(vec![
            ContentPart::text(&prompt.user),
            ContentPart::image_url(image_data_uri),
        ]));

        let started = Instant::now();
        let response = self.provider.chat(&request).await?;
        let text = response
            .text()
            .map(str::to_owned)
            .ok_or_else(|| LlmError::response_format("text content", "empty message"))?;

        info!(
            model = %request.model,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            total_tokens = response.usage.map_or(0, |u| u.total_tokens),
            "nutrition analysis completed"
        );

        Ok(text)
    }
}
