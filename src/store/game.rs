use super::{expect_one_row, Repository};
use crate::error::StorageError;
use crate::model::{EntityRef, Game};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

// `preco` is NUMERIC in the table and read back as float8. `idadeMinima` is unquoted, so
// PostgreSQL folds it to `idademinima`; the alias keeps the hydrated column name stable.
const SELECT_ALL: &str = "SELECT j.id, j.nome, j.preco::float8 AS preco, j.idadeMinima AS idade_minima, \
     g.id AS genero_id, g.nome AS genero_nome \
     FROM jogo j LEFT JOIN genero g ON g.id = j.genero_id \
     ORDER BY j.id";
const SELECT_BY_ID: &str = "SELECT j.id, j.nome, j.preco::float8 AS preco, j.idadeMinima AS idade_minima, \
     g.id AS genero_id, g.nome AS genero_nome \
     FROM jogo j LEFT JOIN genero g ON g.id = j.genero_id \
     WHERE j.id = $1";
const INSERT: &str = "INSERT INTO jogo (nome, preco, idadeMinima, genero_id) VALUES ($1, $2, $3, $4) RETURNING id";
const UPDATE: &str = "UPDATE jogo SET nome = $1, preco = $2, idadeMinima = $3, genero_id = $4 WHERE id = $5";
const DELETE: &str = "DELETE FROM jogo WHERE id = $1";

#[derive(Clone)]
pub struct GameRepository {
    pool: PgPool,
}

impl GameRepository {
    pub fn new(pool: PgPool) -> Self {
        GameRepository { pool }
    }
}

fn hydrate(row: &PgRow) -> Result<Game, sqlx::Error> {
    let genero = EntityRef::from_join(row.try_get("genero_id")?, row.try_get("genero_nome")?);
    Ok(Game {
        id: row.try_get("id")?,
        nome: row.try_get("nome")?,
        preco: row.try_get("preco")?,
        idade_minima: row.try_get("idade_minima")?,
        genero,
    })
}

fn genre_id(game: &Game) -> Option<i64> {
    game.genero.as_ref().map(|g| g.id)
}

#[async_trait]
impl Repository<Game> for GameRepository {
    async fn list_all(&self) -> Result<Vec<Game>, StorageError> {
        tracing::debug!(sql = SELECT_ALL, "query");
        let rows = sqlx::query(SELECT_ALL).fetch_all(&self.pool).await?;
        let games = rows.iter().map(hydrate).collect::<Result<Vec<_>, _>>()?;
        Ok(games)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Game>, StorageError> {
        tracing::debug!(sql = SELECT_BY_ID, id, "query");
        let row = sqlx::query(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(hydrate).transpose()?)
    }

    async fn insert(&self, game: &mut Game) -> Result<(), StorageError> {
        tracing::debug!(sql = INSERT, genero_id = ?genre_id(game), "execute");
        let id: i64 = sqlx::query_scalar(INSERT)
            .bind(&game.nome)
            .bind(game.preco)
            .bind(game.idade_minima)
            .bind(genre_id(game))
            .fetch_one(&self.pool)
            .await?;
        game.id = id;
        Ok(())
    }

    async fn update(&self, game: &Game) -> Result<(), StorageError> {
        tracing::debug!(sql = UPDATE, id = game.id, "execute");
        let result = sqlx::query(UPDATE)
            .bind(&game.nome)
            .bind(game.preco)
            .bind(game.idade_minima)
            .bind(genre_id(game))
            .bind(game.id)
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
