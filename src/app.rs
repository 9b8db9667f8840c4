use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{delete, get},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenVerifier;
use crate::config::AppConfig;
use crate::database::FavoritesRepository;
use crate::error::{panic_response, ApiError};
use crate::handlers::{protected, public};
use crate::middleware::auth_middleware;
use crate::services::CharacterService;
use crate::upstream::UpstreamApi;

/// Shared, request-independent dependencies. Each request gets a clone.
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
    pub characters: CharacterService,
    pub favorites: Arc<dyn FavoritesRepository>,
}

impl AppState {
    pub fn new(
        verifier: TokenVerifier,
        upstream: Arc<dyn UpstreamApi>,
        favorites: Arc<dyn FavoritesRepository>,
    ) -> Self {
        Self {
            verifier: Arc::new(verifier),
            characters: CharacterService::new(upstream),
            favorites,
        }
    }
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    // Upstream proxies are gated per route; everything under /api, including
    // paths with no handler, is gated by prefix
    let upstream = upstream_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
    let api = api_routes()
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let app = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(upstream)
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response));

    let app = match cors_layer(config) {
        Some(cors) => app.layer(cors),
        None => app,
    };

    app.layer(TraceLayer::new_for_http())
}

fn upstream_routes() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(protected::quote_list))
        .route("/character", get(protected::character_list))
        // Both routes share the parameter name; the handler decides what it means
        .route("/character/:character", get(protected::character_get))
        .route("/character/:character/quotes", get(protected::character_quotes))
}

/// Mounted under `/api`
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/test", get(protected::api_test))
        .route(
            "/favorites",
            get(protected::favorites_list).post(protected::favorites_create),
        )
        .route("/favorites/:id", delete(protected::favorites_delete))
}

/// Permissive in development or when no origins are configured, otherwise
/// restricted to the configured list.
fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    let security = &config.security;
    if !security.enable_cors {
        return None;
    }

    if config.is_development() || security.cors_origins.is_empty() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any),
    )
}

async fn not_found() -> ApiError {
    ApiError::not_found("route not found")
}
