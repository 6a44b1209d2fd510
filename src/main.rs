//! Infinite Adventure
//!
//! An endless text adventure narrated by a locally hosted Ollama model.
//! The player starts a session, reads the opening scene and types their
//! choices; the narrator carries the story forward one turn at a time.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod console;
mod conversation;
mod core;
mod providers;

use config::{Config, StoryConfig};
use crate::core::{EngineSettings, StoryEngine};
use providers::Provider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "infinite_adventure=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env()?;

    let story = match config.story_file {
        Some(ref path) => {
            tracing::info!(path = %path.display(), "loading story file");
            StoryConfig::from_file(path)?
        }
        None => StoryConfig::default(),
    };
    config.merge_story(&story);

    let provider = Provider::from_name("ollama", &config)?;
    tracing::info!(url = %config.ollama_url, model = %config.model, "narrator backend");

    let settings = EngineSettings {
        model: config.model.clone(),
        timeout: config.request_timeout(),
        prompts: story.prompts,
    };

    let (engine, completions) =
        StoryEngine::new(Arc::new(provider), settings, Box::new(console::ConsoleSink));

    console::run(engine, completions, &config.transcript_dir).await
}
