//! Entity CRUD routes, one static table per resource.

use crate::handlers::{create, delete as delete_handler, list, read, update, Resource};
use crate::model::{Client, Game, Genre, Rental};
use crate::state::AppState;
use axum::{routing::get, Router};

/// `GET|POST /{resource}` and `GET|PUT|DELETE /{resource}/:id`.
pub fn resource_routes<E: Resource>() -> Router<AppState> {
    Router::new()
        .route(&format!("/{}", E::PATH), get(list::<E>).post(create::<E>))
        .route(
            &format!("/{}/:id", E::PATH),
            get(read::<E>).put(update::<E>).delete(delete_handler::<E>),
        )
}

pub fn entity_routes() -> Router<AppState> {
    Router::new()
        .merge(resource_routes::<Genre>())
        .merge(resource_routes::<Client>())
        .merge(resource_routes::<Game>())
        .merge(resource_routes::<Rental>())
}
