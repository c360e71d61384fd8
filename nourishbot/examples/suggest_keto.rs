//! Pre-filled example: keto recipe suggestions from a local photo.
//!
//! ```bash
//! export OPENAI_API_BASE=http://localhost:8000/v1
//! cargo run --example suggest_keto -- path/to/food.jpg
//! ```

#![allow(clippy::print_stdout)]

use nourishbot::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("nourishbot=info")
        .init();

    let image = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "food.jpg".to_owned());

    let config = LlmConfig::from_env();
    let models = StageModels::from(&config);
    let pipeline = RecipePipeline::new(OpenAi::new(config)?, models);

    let request =
        PipelineRequest::new(ImageSource::parse(&image)).with_dietary_restrictions("keto");

    let result = pipeline.run(request).await?;
    println!("{}", format_recipes(&result.suggestions));
    println!(
        "run {}: {} tokens",
        result.report.run_id, result.report.usage.total_tokens
    );

    Ok(())
}
