use super::{expect_one_row, Repository};
use crate::error::StorageError;
use crate::model::Genre;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const SELECT_ALL: &str = "SELECT id, nome FROM genero ORDER BY id";
const SELECT_BY_ID: &str = "SELECT id, nome FROM genero WHERE id = $1";
const INSERT: &str = "INSERT INTO genero (nome) VALUES ($1) RETURNING id";
const UPDATE: &str = "UPDATE genero SET nome = $1 WHERE id = $2";
const DELETE: &str = "DELETE FROM genero WHERE id = $1";

#[derive(Clone)]
pub struct GenreRepository {
    pool: PgPool,
}

impl GenreRepository {
    pub fn new(pool: PgPool) -> Self {
        GenreRepository { pool }
    }
}

fn hydrate(row: &PgRow) -> Result<Genre, sqlx::Error> {
    Ok(Genre {
        id: row.try_get("id")?,
        nome: row.try_get("nome")?,
    })
}

#[async_trait]
impl Repository<Genre> for GenreRepository {
    async fn list_all(&self) -> Result<Vec<Genre>, StorageError> {
        tracing::debug!(sql = SELECT_ALL, "query");
        let rows = sqlx::query(SELECT_ALL).fetch_all(&self.pool).await?;
        let genres = rows.iter().map(hydrate).collect::<Result<Vec<_>, _>>()?;
        Ok(genres)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Genre>, StorageError> {
        tracing::debug!(sql = SELECT_BY_ID, id, "query");
        let row = sqlx::query(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(hydrate).transpose()?)
    }

    async fn insert(&self, genre: &mut Genre) -> Result<(), StorageError> {
        tracing::debug!(sql = INSERT, "execute");
        let id: i64 = sqlx::query_scalar(INSERT)
            .bind(&genre.nome)
            .fetch_one(&self.pool)
            .await?;
        genre.id = id;
        Ok(())
    }

    async fn update(&self, genre: &Genre) -> Result<(), StorageError> {
        tracing::debug!(sql = UPDATE, id = genre.id, "execute");
        let result = sqlx::query(UPDATE)
            .bind(&genre.nome)
            .bind(genre.id)
            .execute(&self.pool)
            .await?;
        expect_one_row(result)
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        tracing::debug!(sql = DELETE, id, "execute");
        let result = sqlx::query(DELETE).bind(id).execute(&self.pool).await?;
        expect_one_row(result)
    }
}
