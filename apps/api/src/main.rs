mod config;
mod errors;
mod interview;
mod llm_client;
mod resume_text;
mod routes;
mod speech;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::interviewer::Interviewer;
use crate::llm_client::LlmClient;
use crate::resume_text::PdfTextExtractor;
use crate::routes::build_router;
use crate::speech::deepgram::DeepgramClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(
        config.groq_api_key.clone(),
        config.upstream_timeout,
    )?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Deepgram serves both transcription and speech synthesis
    let deepgram = Arc::new(DeepgramClient::new(
        config.deepgram_api_key.clone(),
        config.upstream_timeout,
    )?);
    info!(
        "Speech client initialized (voice: {})",
        speech::deepgram::VOICE_MODEL
    );

    let state = AppState {
        interviewer: Arc::new(Interviewer::new(llm, deepgram.clone())),
        speech_to_text: deepgram,
        resume_text: Arc::new(PdfTextExtractor::new(config.upstream_timeout)),
    };

    // Build router
    let app = build_router(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // browser UI is served from another origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!(
        "Listening on {addr} (upstream timeout {:?})",
        config.upstream_timeout
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
