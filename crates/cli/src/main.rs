//! Carousel CLI
//!
//! Runs the generation pipeline from the terminal. Events stream to stdout as
//! JSON lines, logs go to stderr.
//! Run with: OPENAI_API_KEY=xxx carousel run "5 habits of calm engineers"

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use carousel_core::clients::{OpenAiClient, UnsplashClient};
use carousel_core::models::ModelConfig;
use carousel_core::schema::{Language, PipelineConfig, Quality, Style};
use carousel_core::GenerationPipeline;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tokio_stream::StreamExt;

#[derive(Parser, Clone)]
#[command(author, version, about = "Carousel - AI slide carousel generator")]
struct Args {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// Generate a carousel for a topic
    Run {
        /// What the carousel is about
        topic: String,
        /// professional, casual, educational or inspirational
        #[arg(long, default_value = "professional", value_parser = parse_lowercase::<Style>)]
        style: Style,
        /// Number of slides (1-10)
        #[arg(short = 'n', long, default_value = "5")]
        slides: usize,
        /// de or en
        #[arg(short, long, default_value = "en", value_parser = parse_lowercase::<Language>)]
        language: Language,
        /// basic, standard or premium
        #[arg(short, long, default_value = "standard", value_parser = parse_lowercase::<Quality>)]
        quality: Quality,
        /// Search Unsplash for slide images (needs UNSPLASH_ACCESS_KEY)
        #[arg(long)]
        images: bool,
        #[arg(long, default_value = "1080")]
        width: u32,
        #[arg(long, default_value = "1350")]
        height: u32,
        /// Write the carousel JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show credits charged per quality tier
    Credits,
}

fn parse_lowercase<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_lowercase()))
        .map_err(|_| format!("unsupported value '{}'", value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("carousel_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    match args.command {
        CliCommand::Credits => {
            for quality in [Quality::Basic, Quality::Standard, Quality::Premium] {
                println!("{:<10} {}", quality.as_str(), carousel_core::credits_for_quality(quality));
            }
            Ok(())
        }
        CliCommand::Run {
            topic,
            style,
            slides,
            language,
            quality,
            images,
            width,
            height,
            output,
        } => {
            let config = PipelineConfig::new(topic)
                .with_style(style)
                .with_slide_count(slides)
                .with_language(language)
                .with_quality(quality)
                .with_images(images)
                .with_canvas(width, height);
            run(config, output).await
        }
    }
}

async fn run(config: PipelineConfig, output: Option<PathBuf>) -> anyhow::Result<()> {
    let models = ModelConfig::from_env().context("Set OPENAI_API_KEY in the environment or .env")?;
    let client = OpenAiClient::new(&models)?;

    let mut pipeline = GenerationPipeline::new(Arc::new(client), config.clone()).with_models(models);
    if config.use_images {
        let unsplash = UnsplashClient::from_env()
            .context("--images needs UNSPLASH_ACCESS_KEY in the environment or .env")?;
        pipeline = pipeline.with_image_search(Arc::new(unsplash));
    }

    tracing::info!(quality = %config.quality, credits = config.quality.credits(), "starting run");

    let mut handle = pipeline.spawn();

    let cancel = handle.cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling after the current call");
            cancel.cancel();
        }
    });

    while let Some(event) = handle.events.next().await {
        println!("{}", serde_json::to_string(&event).unwrap_or_default());
    }

    let carousel = handle
        .task
        .await
        .context("pipeline task panicked")??;

    let json = serde_json::to_string_pretty(&carousel)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), slides = carousel.slides.len(), "carousel written");
        }
        None => println!("{}", json),
    }
    Ok(())
}
