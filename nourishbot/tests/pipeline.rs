//! End-to-end pipeline tests against a scripted in-process provider.
//!
//! No live network: completions are served from a queue and every
//! request is recorded so the tests can assert on stage ordering,
//! model selection and prompt contents.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::collections::VecDeque;
use std::sync::Mutex;

use assert_fs::prelude::*;
use async_trait::async_trait;

use nourishbot::chat::ResponseFormat;
use nourishbot::message::{Content, ContentPart};
use nourishbot::prelude::*;

const RECIPE_JSON: &str = r#"{"recipes":[{"title":"Vegan Omelette","ingredients":["tofu","milk"],"instructions":"Whisk and cook.","calorie_estimate":250}]}"#;

/// Serves canned responses in order and records every request.
struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<ChatResponse>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<Result<ChatResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn text(text: &str) -> Result<ChatResponse> {
        Ok(ChatResponse::from_text(text))
    }

    fn text_with_usage(text: &str, input: u32, output: u32) -> Result<ChatResponse> {
        let mut response = ChatResponse::from_text(text);
        response.usage = Some(Usage::new(input, output));
        Ok(response)
    }

    fn recorded(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for &ScriptedProvider {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("scripted provider exhausted"))
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

fn models() -> StageModels {
    StageModels {
        vision: "vision-model".to_owned(),
        text: "text-model".to_owned(),
    }
}

fn temp_image() -> assert_fs::NamedTempFile {
    let file = assert_fs::NamedTempFile::new("fridge.jpg").unwrap();
    file.write_binary(&[0xFF, 0xD8, 0xFF, 0xE0, 0x01, 0x02]).unwrap();
    file
}

fn user_text(request: &ChatRequest) -> String {
    request
        .messages
        .iter()
        .filter(|m| matches!(m.role, Role::User))
        .filter_map(Message::text)
        .collect()
}

#[tokio::test]
async fn full_run_produces_validated_suggestions() {
    let provider = ScriptedProvider::new(vec![
        ScriptedProvider::text_with_usage("Tomato, , EGGS,milk ", 100, 10),
        ScriptedProvider::text_with_usage("tofu, milk", 50, 5),
        ScriptedProvider::text_with_usage(RECIPE_JSON, 200, 80),
    ]);
    let image = temp_image();
    let pipeline = RecipePipeline::new(&provider, models());

    let request =
        PipelineRequest::new(ImageSource::from_path(image.path())).with_dietary_restrictions("vegan");
    let result = pipeline.run(request).await.unwrap();

    assert_eq!(result.suggestions.recipes.len(), 1);
    assert_eq!(result.suggestions.recipes[0].title, "Vegan Omelette");

    let report = &result.report;
    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.stages.len(), 3);
    assert_eq!(report.usage, Usage::new(350, 95));
    assert_eq!(report.stages[0].model, "vision-model");
    assert_eq!(report.stages[1].model, "text-model");
    assert_eq!(report.stages[2].model, "text-model");
}

#[tokio::test]
async fn stages_receive_prior_outputs_and_injected_diet() {
    let provider = ScriptedProvider::new(vec![
        ScriptedProvider::text("Tomato, , EGGS,milk "),
        ScriptedProvider::text("tomato, eggs substitute, milk"),
        ScriptedProvider::text(RECIPE_JSON),
    ]);
    let image = temp_image();
    let pipeline = RecipePipeline::new(&provider, models());

    let request =
        PipelineRequest::new(ImageSource::from_path(image.path())).with_dietary_restrictions("vegan");
    pipeline.run(request).await.unwrap();

    let requests = provider.recorded();
    assert_eq!(requests.len(), 3);

    // Extraction: vision model, multi-part message carrying the data URI.
    assert_eq!(requests[0].model, "vision-model");
    let has_data_uri = requests[0].messages.iter().any(|m| match &m.content {
        Content::Parts(parts) => parts.iter().any(|p| match p {
            ContentPart::ImageUrl { image_url } => {
                image_url.url.starts_with("data:image/jpeg;base64,")
            }
            ContentPart::Text { .. } => false,
        }),
        Content::Text(_) => false,
    });
    assert!(has_data_uri, "extraction request must embed the image as a data URI");

    // Dietary stage: cleaned ingredient list plus the injected restriction.
    let dietary = user_text(&requests[1]);
    assert!(dietary.contains("tomato, eggs, milk"));
    assert!(dietary.contains("vegan"));

    // Suggestion stage: dietary stage's output, schema-constrained.
    let suggestion = user_text(&requests[2]);
    assert!(suggestion.contains("tomato, eggs substitute, milk"));
    match &requests[2].response_format {
        Some(ResponseFormat::JsonSchema { json_schema }) => {
            assert_eq!(json_schema.name, "RecipeSuggestionOutput");
            assert_eq!(json_schema.strict, Some(true));
        }
        other => panic!("expected JSON schema response format, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_dietary_restriction_renders_as_none() {
    let provider = ScriptedProvider::new(vec![
        ScriptedProvider::text("egg"),
        ScriptedProvider::text("egg"),
        ScriptedProvider::text(RECIPE_JSON),
    ]);
    let image = temp_image();
    let pipeline = RecipePipeline::new(&provider, models());

    pipeline
        .run(PipelineRequest::new(ImageSource::from_path(image.path())))
        .await
        .unwrap();

    let dietary = user_text(&provider.recorded()[1]);
    assert!(dietary.contains("none"));
}

#[tokio::test]
async fn unparseable_final_output_is_schema_validation_error() {
    let provider = ScriptedProvider::new(vec![
        ScriptedProvider::text("egg, milk"),
        ScriptedProvider::text("egg, milk"),
        ScriptedProvider::text("Here are some tasty ideas for you!"),
    ]);
    let image = temp_image();
    let pipeline = RecipePipeline::new(&provider, models());

    let err = pipeline
        .run(PipelineRequest::new(ImageSource::from_path(image.path())))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SchemaValidation { .. }));
}

#[tokio::test]
async fn final_output_missing_recipes_key_is_rejected() {
    let provider = ScriptedProvider::new(vec![
        ScriptedProvider::text("egg, milk"),
        ScriptedProvider::text("egg, milk"),
        ScriptedProvider::text(r#"{"dishes": []}"#),
    ]);
    let image = temp_image();
    let pipeline = RecipePipeline::new(&provider, models());

    let err = pipeline
        .run(PipelineRequest::new(ImageSource::from_path(image.path())))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SchemaValidation { .. }));
}

#[tokio::test]
async fn missing_image_aborts_before_any_completion_call() {
    let provider = ScriptedProvider::new(vec![]);
    let pipeline = RecipePipeline::new(&provider, models());

    let err = pipeline
        .run(PipelineRequest::new(ImageSource::parse("/no/such/fridge.jpg")))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ImageNotFound { .. }));
    assert!(provider.recorded().is_empty());
}

#[tokio::test]
async fn failed_remote_image_fetch_aborts_before_any_completion_call() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Minimal one-shot HTTP listener answering every request with 404.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0_u8; 1024];
            let _ = stream.read(&mut buf).await;
            let _ = stream
                .write_all(
                    b"HTTP/1.1 404 Not Found\r\ncontent-length: 9\r\nconnection: close\r\n\r\nnot found",
                )
                .await;
        }
    });

    let provider = ScriptedProvider::new(vec![]);
    let pipeline = RecipePipeline::new(&provider, models());

    let url = format!("http://{addr}/fridge.jpg");
    let err = pipeline
        .run(PipelineRequest::new(ImageSource::parse(&url)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Llm(LlmError::HttpStatus { status: 404, .. })
    ));
    // The fetch happens before any stage; nothing reached the endpoint.
    assert!(provider.recorded().is_empty());
}

#[tokio::test]
async fn stage_failure_aborts_the_run() {
    let provider = ScriptedProvider::new(vec![
        Err(LlmError::network("connection refused").into()),
    ]);
    let image = temp_image();
    let pipeline = RecipePipeline::new(&provider, models());

    let err = pipeline
        .run(PipelineRequest::new(ImageSource::from_path(image.path())))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Llm(LlmError::Network(_))));
    // Only the failed stage was attempted; nothing downstream ran.
    assert_eq!(provider.recorded().len(), 1);
}

#[tokio::test]
async fn nutrition_report_uses_vision_model_and_returns_markdown_verbatim() {
    let report_md = "1. Identified food items\n- eggs\n\n2. Estimated total calories\n~300";
    let provider = ScriptedProvider::new(vec![ScriptedProvider::text(report_md)]);
    let image = temp_image();
    let pipeline = RecipePipeline::new(&provider, models());

    let report = pipeline
        .nutrition_report(&ImageSource::from_path(image.path()))
        .await
        .unwrap();

    assert_eq!(report, report_md);
    let requests = provider.recorded();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "vision-model");
    assert_eq!(requests[0].max_tokens, Some(700));
}

#[tokio::test]
async fn formatter_renders_pipeline_output() {
    let provider = ScriptedProvider::new(vec![
        ScriptedProvider::text("tofu, milk"),
        ScriptedProvider::text("tofu, milk"),
        ScriptedProvider::text(RECIPE_JSON),
    ]);
    let image = temp_image();
    let pipeline = RecipePipeline::new(&provider, models());

    let result = pipeline
        .run(PipelineRequest::new(ImageSource::from_path(image.path())))
        .await
        .unwrap();

    let markdown = format_recipes(&result.suggestions);
    assert!(markdown.starts_with("## 🍽 Recipe Ideas"));
    assert!(markdown.contains("### 1. Vegan Omelette"));
    assert!(markdown.contains("| tofu |"));
    assert!(markdown.contains("250 kcal"));
}
