//! Main HTTP Gateway Server.
//!
//! Owns the shared state (collaborators, storage, prompt) and the route table.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use media::{audio_router, MediaStore, AUDIO_ROUTE_PREFIX};
use soilcast_config::{SoilcastConfig, TtsProviderName, VisionProviderName};
use soilcast_tts::{create_tts, AudioFormat, TtsProvider, TtsProviderKind};
use soilcast_understanding::{create_vision, PromptTemplate, VisionModel, VisionProviderKind};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use crate::analyze;
use crate::control_ui;
use crate::health_api;
use crate::narration::NarrationOptions;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub vision: Arc<dyn VisionModel>,
    pub tts: Arc<dyn TtsProvider>,
    pub store: MediaStore,
    pub prompt: Arc<PromptTemplate>,
    pub narration: NarrationOptions,
    /// Keep a copy of every upload under the upload directory.
    pub keep_uploads: bool,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(vision: Arc<dyn VisionModel>, tts: Arc<dyn TtsProvider>, store: MediaStore) -> Self {
        Self {
            vision,
            tts,
            store,
            prompt: Arc::new(PromptTemplate::default()),
            narration: NarrationOptions::default(),
            keep_uploads: true,
            started_at: Instant::now(),
        }
    }

    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = Arc::new(prompt);
        self
    }

    pub fn with_narration(mut self, options: NarrationOptions) -> Self {
        self.narration = options;
        self
    }

    pub fn with_keep_uploads(mut self, keep: bool) -> Self {
        self.keep_uploads = keep;
        self
    }

    /// Builds the collaborators and storage described by a loaded config.
    pub async fn from_config(config: &SoilcastConfig) -> Result<Self> {
        let vision_key = config.vision.api_key.clone().unwrap_or_default();
        let vision_kind = match config.vision.provider {
            VisionProviderName::Gemini => VisionProviderKind::Gemini {
                api_key: vision_key,
                model: config.vision.model.clone(),
            },
            VisionProviderName::OpenAi => VisionProviderKind::OpenAi {
                api_key: vision_key,
                model: config.vision.model.clone(),
            },
        };
        let vision = create_vision(vision_kind, Duration::from_secs(config.vision.timeout_secs))
            .context("Failed to build vision provider")?;

        let tts_kind = match config.tts.provider {
            TtsProviderName::Google => TtsProviderKind::Google,
            TtsProviderName::OpenAi => TtsProviderKind::OpenAi {
                api_key: config.tts.api_key.clone().unwrap_or_default(),
                model: config.tts.model.clone(),
                voice: config.tts.voice.clone(),
                format: parse_audio_format(config.tts.format.as_deref())?,
            },
        };
        let tts_timeout = Duration::from_secs(config.tts.timeout_secs);
        let tts = create_tts(tts_kind, tts_timeout).context("Failed to build TTS provider")?;

        let store = MediaStore::new(&config.storage.upload_dir, &config.storage.audio_dir);
        store.ensure_dirs().await?;

        let prompt = PromptTemplate::load(config.vision.prompt_file.as_deref()).await?;

        info!(
            vision = vision.provider(),
            tts = ?config.tts.provider,
            audio_dir = %config.storage.audio_dir.display(),
            "Gateway state ready"
        );

        Ok(Self::new(vision, tts, store)
            .with_prompt(prompt)
            .with_narration(NarrationOptions {
                max_concurrency: config.tts.max_concurrency,
                timeout: tts_timeout,
            })
            .with_keep_uploads(config.storage.keep_uploads))
    }
}

fn parse_audio_format(format: Option<&str>) -> Result<AudioFormat> {
    match format {
        None => Ok(AudioFormat::default()),
        Some(name) => serde_json::from_value(serde_json::Value::String(name.to_lowercase()))
            .with_context(|| format!("Unknown TTS audio format: {name}")),
    }
}

/// Route table for the gateway.
pub fn build_router(state: GatewayState, max_upload_bytes: usize) -> Router {
    let audio = audio_router(state.store.audio_dir().to_path_buf());

    Router::new()
        .route("/", get(control_ui::index))
        .route("/api/health", get(health_api::get_health))
        .route("/analyze-image/", post(analyze::analyze_image))
        .route("/analyze-image", post(analyze::analyze_image))
        .nest(AUDIO_ROUTE_PREFIX, audio)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the main Axum HTTP server for the gateway.
#[instrument(skip(router))]
pub async fn start_server(addr: SocketAddr, router: Router) -> Result<()> {
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Gateway HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
