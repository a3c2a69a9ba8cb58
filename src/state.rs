//! Shared application state for all routes. Repositories are stateless and built once at startup.

use crate::model::{Client, Game, Genre, Rental};
use crate::store::{
    ClientRepository, GameRepository, GenreRepository, MemoryStore, RentalRepository, Repository,
};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// `None` when running on the in-process store.
    pub pool: Option<PgPool>,
    pub genres: Arc<dyn Repository<Genre>>,
    pub clients: Arc<dyn Repository<Client>>,
    pub games: Arc<dyn Repository<Game>>,
    pub rentals: Arc<dyn Repository<Rental>>,
}

impl AppState {
    pub fn postgres(pool: PgPool) -> Self {
        AppState {
            genres: Arc::new(GenreRepository::new(pool.clone())),
            clients: Arc::new(ClientRepository::new(pool.clone())),
            games: Arc::new(GameRepository::new(pool.clone())),
            rentals: Arc::new(RentalRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    pub fn in_memory(store: MemoryStore) -> Self {
        AppState {
            pool: None,
            genres: Arc::new(store.clone()),
            clients: Arc::new(store.clone()),
            games: Arc::new(store.clone()),
            rentals: Arc::new(store),
        }
    }
}
