pub mod handlers;
pub mod models;
pub mod openapi;

use crate::config::Config;
use axum::{Json, Router, routing::get};
use handlers::{AppService, api_routes, health};
use http::{HeaderValue, Method, header};
use openapi::ApiDoc;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Budget Tracker API",
        "docs": "/docs",
        "health": "/health",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match config.frontend_url.as_str() {
        "*" => AllowOrigin::from(Any),
        url => match HeaderValue::from_str(url) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!(frontend_url = %url, "invalid FRONTEND_URL, allowing any origin");
                AllowOrigin::from(Any)
            }
        },
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// The full application: public endpoints, `/api`, Swagger UI and the
/// HTTP middleware stack.
pub fn router(service: Arc<AppService>, config: &Config) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", api_routes(service))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new()) // Gzip compression
        .layer(TimeoutLayer::new(Duration::from_secs(30))) // 30-second timeout
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http()) // Request tracing
}
