//! Pre-filled example: vegan recipe suggestions from a fridge photo URL.
//!
//! ```bash
//! export OPENAI_API_BASE=http://localhost:8000/v1
//! cargo run --example suggest_vegan
//! ```

#![allow(clippy::print_stdout)]

use nourishbot::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("nourishbot=info")
        .init();

    let config = LlmConfig::from_env();
    let models = StageModels::from(&config);
    let pipeline = RecipePipeline::new(OpenAi::new(config)?, models);

    let request = PipelineRequest::new(ImageSource::parse(
        "https://upload.wikimedia.org/wikipedia/commons/6/69/Fridge_with_food.jpg",
    ))
    .with_dietary_restrictions("vegan");

    let result = pipeline.run(request).await?;
    println!("{}", format_recipes(&result.suggestions));

    Ok(())
}
