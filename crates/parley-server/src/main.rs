mod configuration;
mod error;
mod routes;
mod state;

use anyhow::Result;
use dotenv::dotenv;
use parley::conversation::Conversation;
use parley::providers::anthropic::AnthropicProvider;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::configuration::Settings;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new()?;
    let addr = settings.server.socket_addr()?;

    let model = settings.provider.model.clone();
    let provider = AnthropicProvider::new(settings.provider.into_config())?;
    let conversation = Conversation::new(Arc::new(provider), &model);

    let app = routes::configure(AppState::new(conversation));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Multi-agent demo listening on {}", listener.local_addr()?);
    info!("  POST /api/conversation - Start a conversation");
    info!("  GET  /api/health - Health check");

    axum::serve(listener, app).await?;
    Ok(())
}
