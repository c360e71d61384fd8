//! NourishBot CLI
//!
//! Turns a fridge photo (local path or URL) into recipe suggestions or
//! a nutrition report, printed as markdown.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use nourishbot::prelude::*;

/// NourishBot - AI recipe suggestions from fridge photos
#[derive(Parser)]
#[command(name = "nourishbot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Prompt template YAML file (defaults to built-in prompts)
    #[arg(short, long, env = "NOURISHBOT_PROMPTS", global = true)]
    prompts: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest recipes from an image of food or fridge contents
    Suggest(SuggestArgs),

    /// Produce a structured nutrition report for one dish image
    Nutrition(NutritionArgs),
}

/// Arguments for the suggest command
#[derive(Args)]
struct SuggestArgs {
    /// Image to analyze: http(s) URL or local file path
    #[arg(short, long)]
    image: String,

    /// Dietary restriction, free text (e.g., "vegan", "keto")
    #[arg(short, long)]
    diet: Option<String>,
}

/// Arguments for the nutrition command
#[derive(Args)]
struct NutritionArgs {
    /// Image to analyze: http(s) URL or local file path
    #[arg(short, long)]
    image: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging based on verbosity.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nourishbot={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let config = LlmConfig::from_env();
    let models = StageModels::from(&config);
    let provider = OpenAi::new(config)?;

    let mut pipeline = RecipePipeline::new(provider, models);
    if let Some(path) = cli.prompts {
        let mut templates = PromptTemplates::from_file(path)?;
        templates.merge_defaults(&PromptTemplates::builtin());
        pipeline = pipeline.with_prompts(templates);
    }

    match cli.command {
        Commands::Suggest(args) => cmd_suggest(&pipeline, args).await,
        Commands::Nutrition(args) => cmd_nutrition(&pipeline, args).await,
    }
}

/// Run the recipe pipeline and print the rendered result.
async fn cmd_suggest(pipeline: &RecipePipeline<OpenAi>, args: SuggestArgs) -> Result<()> {
    let mut request = PipelineRequest::new(ImageSource::parse(&args.image));
    if let Some(diet) = args.diet {
        request = request.with_dietary_restrictions(diet);
    }

    let result = pipeline.run(request).await?;
    println!("{}", format_recipes(&result.suggestions));

    Ok(())
}

/// Run the standalone nutrition analysis and print the report.
async fn cmd_nutrition(pipeline: &RecipePipeline<OpenAi>, args: NutritionArgs) -> Result<()> {
    let report = pipeline
        .nutrition_report(&ImageSource::parse(&args.image))
        .await?;
    println!("{report}");

    Ok(())
}
