pub mod extract;

use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir};

use crate::controllers::{fallback, health, root};
use crate::infrastructure::config::Config;
use crate::infrastructure::lifecycle::{signals, spawn_supervised, Server, ShutdownOutcome};
use crate::infrastructure::middleware::{
    error_handler, limit_request_body, panic_response, request_logger,
};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            started_at: Instant::now(),
        }
    }
}

/// Routes plus the full middleware stack
pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();
    with_middleware(routes(state), &config)
}

/// `/`, `/health` and the uploads directory. A known path with an
/// unsupported method is treated like an unknown path.
pub fn routes(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config.upload_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(fallback::not_found.into_service());
    let uploads_prefix = state.config.uploads_prefix.clone();

    Router::new()
        .route("/", get(root::index).fallback(fallback::not_found))
        .route("/health", get(health::health).fallback(fallback::not_found))
        .with_state(state)
        .nest_service(&uploads_prefix, uploads)
        .fallback(fallback::not_found)
}

/// Wrap a router in the middleware stack. Outermost to innermost:
/// CORS, request logger (development only), error handler, body limit,
/// panic capture.
pub fn with_middleware(router: Router, config: &Arc<Config>) -> Router {
    let router = router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(middleware::from_fn_with_state(config.clone(), limit_request_body))
        .layer(middleware::from_fn_with_state(config.clone(), error_handler));

    let router = if config.is_development() {
        router.layer(middleware::from_fn(request_logger))
    } else {
        router
    };

    router.layer(cors_layer(config))
}

pub fn cors_layer(config: &Config) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(config.cors_origin.clone())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Start the HTTP server and block until it has shut down
pub async fn start_http_server(
    config: Arc<Config>,
    grace: Duration,
) -> Result<ShutdownOutcome, Box<dyn std::error::Error>> {
    let app = create_app(AppState::new(config.clone()));
    let server = Server::bind(&config.socket_addr(), app).await?;
    let addr = server.local_addr()?;

    tracing::info!("Server is running on http://localhost:{}", addr.port());
    tracing::info!("Environment: {}", config.environment.as_str());
    tracing::info!("Health check: http://localhost:{}/health", addr.port());

    let shutdown = server.shutdown_handle();
    spawn_supervised("signal-listener", shutdown.clone(), signals::listen(shutdown));

    Ok(server.run(grace).await?)
}
