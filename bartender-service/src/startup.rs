//! Application assembly and lifecycle.

use crate::config::BartenderConfig;
use crate::handlers;
use crate::services::providers::openai::{OpenAiChatProvider, OpenAiConfig};
use crate::services::providers::ChatProvider;
use crate::services::{
    CocktailImageCache, ImageGenerator, KeyValueStore, RedisStore, SessionManager,
};
use axum::{
    middleware::from_fn,
    routing::{delete, get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state. The store client is constructed once at startup
/// and injected; nothing reaches for a process-wide global.
#[derive(Clone)]
pub struct AppState {
    pub config: BartenderConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub sessions: SessionManager,
    pub image_cache: CocktailImageCache,
    pub image_generator: Arc<ImageGenerator>,
    pub chat_provider: Arc<dyn ChatProvider>,
}

impl AppState {
    /// Wire up state from configuration plus injected store and chat
    /// provider. Tests pass mocks; `Application::build` passes the real ones.
    pub fn new(
        config: BartenderConfig,
        store: Arc<dyn KeyValueStore>,
        chat_provider: Arc<dyn ChatProvider>,
    ) -> Result<Self, AppError> {
        let sessions = SessionManager::new(store.clone(), config.session.ttl_seconds);
        let image_cache = CocktailImageCache::new(store.clone());
        let image_generator = Arc::new(
            ImageGenerator::new(config.image.clone())
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
        );

        Ok(Self {
            config,
            store,
            sessions,
            image_cache,
            image_generator,
            chat_provider,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/session", post(handlers::session::create_session))
        .route("/session/verify", post(handlers::session::verify_session))
        .route(
            "/session/:user_id/:session_id",
            get(handlers::session::get_session).delete(handlers::session::delete_session),
        )
        .route("/session/:user_id", delete(handlers::session::revoke_sessions))
        .route("/agents/list_agents", get(handlers::agents::list_agents))
        .route("/agents/casual_chat", post(handlers::agents::casual_chat))
        .route(
            "/agents/classic_bartender",
            post(handlers::agents::classic_bartender),
        )
        .route(
            "/agents/creative_bartender",
            post(handlers::agents::creative_bartender),
        )
        .route("/agents/cocktail_image", get(handlers::agents::cocktail_image))
        .route("/agents/make_image", post(handlers::agents::make_image));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build with production collaborators: a real Redis store (fatal if
    /// unreachable) and the OpenAI-compatible chat provider.
    pub async fn build(config: BartenderConfig) -> Result<Self, AppError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(RedisStore::new(&config.redis).await?);

        let chat_provider: Arc<dyn ChatProvider> = Arc::new(
            OpenAiChatProvider::new(OpenAiConfig {
                api_key: config.llm.api_key.clone(),
                base_url: config.llm.base_url.clone(),
            })
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
        );
        tracing::info!(
            model = %config.llm.chat_model,
            base_url = %config.llm.base_url,
            "Initialized chat provider"
        );

        let state = AppState::new(config, store, chat_provider)?;
        Self::with_state(state).await
    }

    /// Bind a listener for the given state (port 0 = random port for tests).
    pub async fn with_state(state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port, "Bartender service listening");

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }
}
