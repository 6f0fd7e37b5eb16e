//! Server instance management

use axum::Router;
use http::{header, HeaderValue, Method};
use lepasserelle::{Pipeline, PipelineConfig};
use lestockage::{SkillGraphStore, Storage};
use std::net::SocketAddr;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::handlers::{create_router, AppState};

/// LeServe HTTP server
///
/// Owns the prediction pipeline and serves it until a shutdown signal.
pub struct LeServeServer<S: SkillGraphStore + 'static = Storage> {
    /// Server configuration
    config: ServerConfig,

    /// Shared handler state
    state: AppState<S>,
}

impl LeServeServer<Storage> {
    /// Create a server backed by the configured pipeline
    ///
    /// Loads the pipeline TOML (explicit path or `.leparcours/config.toml`),
    /// applies pipeline environment overrides, then the server's own db path.
    pub fn new(config: ServerConfig) -> Result<Self, ApiError> {
        let pipeline_config = load_pipeline_config(&config)
            .map_err(|e| ApiError::internal(format!("Invalid pipeline config: {:#}", e)))?;

        let pipeline = Pipeline::from_config(&pipeline_config).map_err(|e| {
            error!("Failed to build pipeline: {:#}", e);
            ApiError::internal(format!("Failed to build pipeline: {:#}", e))
        })?;

        Self::with_pipeline(config, pipeline)
    }
}

impl<S: SkillGraphStore + 'static> LeServeServer<S> {
    /// Create a server around an existing pipeline
    pub fn with_pipeline(config: ServerConfig, pipeline: Pipeline<S>) -> Result<Self, ApiError> {
        if let Err(e) = config.validate() {
            return Err(ApiError::internal(format!("Invalid config: {}", e)));
        }

        let state = AppState::new(pipeline, config.clone());
        Ok(Self { config, state })
    }

    /// Get socket address for binding
    pub fn socket_addr(&self) -> Result<SocketAddr, ApiError> {
        self.config.socket_addr().map_err(ApiError::internal)
    }

    /// Router with state, CORS and tracing layers applied
    pub fn router(&self) -> Router {
        let app = create_router().with_state(self.state.clone());
        let cors = cors_layer(&self.config);

        if self.config.enable_logging {
            app.layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors),
            )
        } else {
            app.layer(cors)
        }
    }

    /// Start server and serve until Ctrl+C or SIGTERM
    pub async fn start(&self) -> Result<(), ApiError> {
        let addr = self.socket_addr()?;
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind to {}: {:?}", addr, e);
            ApiError::internal(format!("Failed to bind to {}: {}", addr, e))
        })?;

        info!("Server listening on: {}", self.server_url());

        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_shutdown())
            .await
            .map_err(|e| ApiError::internal(format!("Server error: {}", e)))
    }

    /// Shared handler state
    pub fn state(&self) -> AppState<S> {
        self.state.clone()
    }

    /// Get server URL
    #[must_use]
    pub fn server_url(&self) -> String {
        self.config.server_url()
    }
}

fn load_pipeline_config(config: &ServerConfig) -> anyhow::Result<PipelineConfig> {
    let mut pipeline_config = match &config.pipeline_config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::load(std::env::current_dir()?)?,
    };
    pipeline_config.apply_env();
    if let Some(db_path) = &config.db_path {
        pipeline_config.storage.db_path = db_path.clone();
    }
    Ok(pipeline_config)
}

/// CORS for the configured origins
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allows_any_origin() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}

/// Resolves on Ctrl+C or SIGTERM
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix;
        match unix::signal(unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received TERM signal");
            }
            Err(e) => {
                error!("Failed to install TERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
