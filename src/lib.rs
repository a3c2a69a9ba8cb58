//! Locadora API: REST backend for a video-game rental store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, ConfigError, StorageError};
pub use migration::apply_migrations;
pub use model::{Client, EntityRef, Game, Genre, Rental};
pub use routes::app;
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, Repository};
