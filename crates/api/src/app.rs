use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use domain::services::AdSelector;
use persistence::{
    db::PgPool,
    metrics::{BACKEND_MEMORY, BACKEND_POSTGRES},
    AdvertisementRepository, AdvertisementStore, InMemoryAdvertisementStore,
    InMemorySettingsStore, SettingsRepository, SettingsStore,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_admin, trace_id};
use crate::routes::{advertisements, assets, health, placeholder, render, settings};

/// Advertisement and settings storage the handlers work against.
#[derive(Clone)]
pub struct Stores {
    pub ads: Arc<dyn AdvertisementStore>,
    pub settings: Arc<dyn SettingsStore>,
    /// Backend label reported by the health endpoint.
    pub backend: &'static str,
}

impl Stores {
    /// Process-local stores; contents are lost on restart.
    pub fn in_memory() -> Self {
        Self {
            ads: Arc::new(InMemoryAdvertisementStore::new()),
            settings: Arc::new(InMemorySettingsStore::new()),
            backend: BACKEND_MEMORY,
        }
    }

    /// Stores backed by the given PostgreSQL pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            ads: Arc::new(AdvertisementRepository::new(pool.clone())),
            settings: Arc::new(SettingsRepository::new(pool)),
            backend: BACKEND_POSTGRES,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub ads: Arc<dyn AdvertisementStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub selector: Arc<AdSelector>,
    pub config: Arc<Config>,
    pub storage_backend: &'static str,
}

pub fn create_app(config: Config, stores: Stores) -> Router {
    let config = Arc::new(config);

    if config.selection.seed.is_some() {
        tracing::warn!("Advertisement selection uses a fixed RNG seed");
    }

    let state = AppState {
        ads: stores.ads,
        settings: stores.settings,
        selector: Arc::new(AdSelector::new(config.selection.seed)),
        config: config.clone(),
        storage_backend: stores.backend,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public page-facing routes: placeholder, client fetcher, selection
    let public_routes = Router::new()
        .route("/advertisement/render", get(render::render_advertisement))
        .route("/advertisement/placeholder", get(placeholder::render_placeholder))
        .route("/advertisement/advertisement.js", get(assets::client_script));

    // Admin routes (require admin API key)
    let admin_routes = Router::new()
        .route(
            "/api/v1/advertisements",
            get(advertisements::list_advertisements).post(advertisements::create_advertisement),
        )
        .route(
            "/api/v1/advertisements/:advertisement_id",
            get(advertisements::get_advertisement)
                .patch(advertisements::update_advertisement)
                .delete(advertisements::delete_advertisement),
        )
        .route(
            "/api/v1/advertisement/settings",
            put(settings::update_settings).get(settings::get_settings),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Operational routes (no authentication required)
    let ops_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .merge(ops_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
