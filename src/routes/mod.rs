//! Router assembly: common and entity routes behind CORS, tracing, the body limit and the JSON
//! response filter.

mod common;
mod entity;

pub use common::common_routes;
pub use entity::{entity_routes, resource_routes};

use crate::response::{json_content_type, route_not_found};
use crate::state::AppState;
use axum::{
    http::{header, Method},
    middleware, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Any origin; GET/POST/PUT/DELETE/OPTIONS; Content-Type and Authorization headers.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// The complete application.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes())
        .merge(entity_routes())
        .fallback(route_not_found)
        // outside the body limit so its 413 is reshaped too
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn(json_content_type))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
