//! Repositories: one fixed set of SQL statements per resource, plus the in-process store.
//!
//! Every operation borrows a pooled connection for a single statement and returns it before the
//! call completes. Nothing here opens a transaction.

mod client;
mod game;
mod genre;
pub mod memory;
mod rental;

pub use client::ClientRepository;
pub use game::GameRepository;
pub use genre::GenreRepository;
pub use memory::MemoryStore;
pub use rental::RentalRepository;

use crate::error::StorageError;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgQueryResult};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// CRUD over one resource. Reads never hide failures: an empty `Vec` or `None` means no rows.
#[async_trait]
pub trait Repository<E>: Send + Sync {
    /// All rows ordered by primary key.
    async fn list_all(&self) -> Result<Vec<E>, StorageError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<E>, StorageError>;

    /// Insert and write the generated id back onto `entity`.
    async fn insert(&self, entity: &mut E) -> Result<(), StorageError>;

    /// Replace all mutable columns of the row `entity.id`. `NotFound` when no row was touched.
    async fn update(&self, entity: &E) -> Result<(), StorageError>;

    /// `ConstraintViolation` when another row still references this one.
    async fn delete(&self, id: i64) -> Result<(), StorageError>;
}

/// Open the connection pool.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Single-row mutations report `NotFound` when the row disappeared after the existence probe.
pub(crate) fn expect_one_row(result: PgQueryResult) -> Result<(), StorageError> {
    if result.rows_affected() == 0 {
        return Err(StorageError::NotFound);
    }
    Ok(())
}

/// Split `DATABASE_URL` into options for the `postgres` maintenance database and the target name.
fn maintenance_options(database_url: &str) -> Result<(PgConnectOptions, Option<String>), StorageError> {
    let target = PgConnectOptions::from_str(database_url).map_err(StorageError::bootstrap("parse DATABASE_URL"))?;
    let name = target.get_database().map(str::to_owned);
    Ok((target.database("postgres"), name))
}

/// Create the database named in `DATABASE_URL` when it is missing. No-op for `postgres` itself.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StorageError> {
    let (maintenance, name) = maintenance_options(database_url)?;
    let name = match name {
        Some(name) if name != "postgres" => name,
        _ => return Ok(()),
    };
    let mut conn = maintenance
        .connect()
        .await
        .map_err(StorageError::bootstrap("connect to maintenance database"))?;
    let present: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&name)
        .fetch_one(&mut conn)
        .await
        .map_err(StorageError::bootstrap("look up database"))?;
    if present {
        tracing::debug!(database = %name, "database present");
        return Ok(());
    }
    tracing::info!(database = %name, "creating database");
    // CREATE DATABASE takes no bind parameters.
    let ddl = format!("CREATE DATABASE \"{}\"", name.replace('"', "\"\""));
    sqlx::query(&ddl)
        .execute(&mut conn)
        .await
        .map_err(StorageError::bootstrap("create database"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maintenance_options_target_postgres() {
        let (maintenance, name) =
            maintenance_options("postgres://u:p@localhost:5432/locadora?sslmode=disable").unwrap();
        assert_eq!(maintenance.get_database(), Some("postgres"));
        assert_eq!(maintenance.get_host(), "localhost");
        assert_eq!(name.as_deref(), Some("locadora"));
    }

    #[tokio::test]
    async fn unparseable_url_is_a_bootstrap_error() {
        let err = ensure_database_exists("not a url").await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Bootstrap {
                step: "parse DATABASE_URL",
                ..
            }
        ));
    }
}
