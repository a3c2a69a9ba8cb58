use super::{expect_one_row, Repository};
use crate::error::StorageError;
use crate::model::{EntityRef, Rental};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const SELECT_ALL: &str = "SELECT l.id, l.data_locacao, l.data_devolucao, \
     j.id AS jogo_id, j.nome AS jogo_nome, \
     c.id AS cliente_id, c.nome AS cliente_nome \
     FROM locacao l \
     LEFT JOIN jogo j ON j.id = l.jogo_id \
     LEFT JOIN cliente c ON c.id = l.cliente_id \
     ORDER BY l.id";
const SELECT_BY_ID: &str = "SELECT l.id, l.data_locacao, l.data_devolucao, \
     j.id AS jogo_id, j.nome AS jogo_nome, \
     c.id AS cliente_id, c.nome AS cliente_nome \
     FROM locacao l \
     LEFT JOIN jogo j ON j.id = l.jogo_id \
     LEFT JOIN cliente c ON c.id = l.cliente_id \
     WHERE l.id = $1";
const INSERT: &str = "INSERT INTO locacao (data_locacao, data_devolucao, jogo_id, cliente_id) \
     VALUES ($1, $2, $3, $4) RETURNING id";
const UPDATE: &str = "UPDATE locacao SET data_locacao = $1, data_devolucao = $2, jogo_id = $3, cliente_id = $4 \
     WHERE id = $5";
const DELETE: &str = "DELETE FROM locacao WHERE id = $1";

#[derive(Clone)]
pub struct RentalRepository {
    pool: PgPool,
}

impl RentalRepository {
    pub fn new(pool: PgPool) -> Self {
        RentalRepository { pool }
    }
}

/// Game and client are hydrated independently; each is absent when its own key column is NULL.
fn hydrate(row: &PgRow) -> Result<Rental, sqlx::Error> {
    let jogo = EntityRef::from_join(row.try_get("jogo_id")?, row.try_get("jogo_nome")?);
    let cliente = EntityRef::from_join(row.try_get("cliente_id")?, row.try_get("cliente_nome")?);
    Ok(Rental {
        id: row.try_get("id")?,
        data_locacao: row.try_get("data_locacao")?,
        data_vencimento: row.try_get("data_devolucao")?,
        jogo,
        cliente,
    })
}

fn link_ids(rental: &Rental) -> (Option<i64>, Option<i64>) {
    (
        rental.jogo.as_ref().map(|j| j.id),
        rental.cliente.as_ref().map(|c| c.id),
    )
}

#[async_trait]
impl Repository<Rental> for RentalRepository {
    async fn list_all(&self) -> Result<Vec<Rental>, StorageError> {
        tracing::debug!(sql = SELECT_ALL, "query");
        let rows = sqlx::query(SELECT_ALL).fetch_all(&self.pool).await?;
        let rentals = rows.iter().map(hydrate).collect::<Result<Vec<_>, _>>()?;
        Ok(rentals)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Rental>, StorageError> {
        tracing::debug!(sql = SELECT_BY_ID, id, "query");
        let row = sqlx::query(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(hydrate).transpose()?)
    }

    async fn insert(&self, rental: &mut Rental) -> Result<(), StorageError> {
        let (jogo_id, cliente_id) = link_ids(rental);
        tracing::debug!(sql = INSERT, ?jogo_id, ?cliente_id, "execute");
        let id: i64 = sqlx::query_scalar(INSERT)
            .bind(rental.data_locacao)
            .bind(rental.data_vencimento)
            .bind(jogo_id)
            .bind(cliente_id)
            .fetch_one(&self.pool)
            .await?;
        rental.id = id;
        Ok(())
    }

    async fn update(&self, rental: &Rental) -> Result<(), StorageError> {
        let (jogo_id, cliente_id) = link_ids(rental);
        tracing::debug!(sql = UPDATE, id = rental.id, "execute");
        let result = sqlx::query(UPDATE)
            .bind(rental.data_locacao)
            .bind(rental.data_vencimento)
            .bind(jogo_id)
            .bind(cliente_id)
            .bind(rental.id)
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
