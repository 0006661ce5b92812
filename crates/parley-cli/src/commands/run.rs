use anyhow::{Context, Result};
use clap::Args;
use cliclack::spinner;
use parley::conversation::{Conversation, DEFAULT_TURNS};
use parley::providers::anthropic::AnthropicProvider;
use parley::providers::configs::{AnthropicProviderConfig, ANTHROPIC_MODEL};
use std::env;
use std::sync::Arc;

use crate::render;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// What the Researcher wants to learn about
    #[arg(short, long)]
    pub topic: String,

    /// Number of Expert replies
    #[arg(long, default_value_t = DEFAULT_TURNS)]
    pub turns: usize,

    /// Model used by both agents
    #[arg(short, long, default_value = ANTHROPIC_MODEL)]
    pub model: String,

    /// Anthropic API key (can also be set via ANTHROPIC_API_KEY environment variable)
    #[arg(long)]
    pub api_key: Option<String>,
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let api_key = args
        .api_key
        .or_else(|| env::var("ANTHROPIC_API_KEY").ok())
        .context("API key must be provided via --api-key or ANTHROPIC_API_KEY environment variable")?;

    let provider = AnthropicProvider::new(AnthropicProviderConfig::new(api_key))?;
    let conversation = Conversation::new(Arc::new(provider), &args.model);

    let spin = spinner();
    spin.start(format!("talking about {}", args.topic));
    let result = match conversation.run(&args.topic, args.turns).await {
        Ok(result) => {
            spin.stop(format!("{} messages exchanged", result.conversation.len()));
            result
        }
        Err(e) => {
            spin.error(&e);
            return Err(e);
        }
    };

    render::conversation(&result)
}
