//! Standalone nutrition analysis of a single dish image.
//!
//! ```bash
//! cargo run --example nutrition_report -- path/to/dish.jpg
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
        .unwrap_or_else(|| "dish.jpg".to_owned());

    let config = LlmConfig::from_env();
    let models = StageModels::from(&config);
    let pipeline = RecipePipeline::new(OpenAi::new(config)?, models);

    let report = pipeline.nutrition_report(&ImageSource::parse(&image)).await?;
    println!("{report}");

    Ok(())
}
