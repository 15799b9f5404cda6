//! Route configuration and setup

use crate::constants::{API_PREFIX, ASSETS_ROUTE, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::{Config, StorageBackend};

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let protected_routes = protected_routes(config, state.clone()).route_layer(
        axum::middleware::from_fn_with_state(state.clone(), crate::auth::middleware::auth_middleware),
    );

    let mut app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(protected_routes);

    if serves_local_assets(config) {
        tracing::info!(
            root = %config.storage.assets_root.display(),
            "Serving local assets at {}",
            ASSETS_ROUTE
        );
        app = app.nest_service(ASSETS_ROUTE, ServeDir::new(&config.storage.assets_root));
    }

    Ok(app
        .layer(ConcurrencyLimitLayer::new(config.base.http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

fn protected_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let video_limit = body_limit(config.media.max_video_size_bytes);
    let thumbnail_limit = body_limit(config.media.max_thumbnail_size_bytes);

    Router::new()
        .route(
            &format!("{}/videos/{{video_id}}/video", API_PREFIX),
            post(handlers::video_upload::upload_video).layer(DefaultBodyLimit::max(video_limit)),
        )
        .route(
            &format!("{}/videos/{{video_id}}/thumbnail", API_PREFIX),
            post(handlers::thumbnail_upload::upload_thumbnail)
                .layer(DefaultBodyLimit::max(thumbnail_limit)),
        )
        .with_state(state)
}

/// Whole-request cap for an upload whose file part may hold `max_file_bytes`.
fn body_limit(max_file_bytes: u64) -> usize {
    usize::try_from(max_file_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)).unwrap_or(usize::MAX)
}

fn serves_local_assets(config: &Config) -> bool {
    config.storage.storage_backend == StorageBackend::Local
        || config.storage.thumbnail_storage == StorageBackend::Local
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.base.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .base
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
