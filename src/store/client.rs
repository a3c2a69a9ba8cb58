use super::{expect_one_row, Repository};
use crate::error::StorageError;
use crate::model::Client;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const SELECT_ALL: &str = "SELECT id, nome, idade FROM cliente ORDER BY id";
const SELECT_BY_ID: &str = "SELECT id, nome, idade FROM cliente WHERE id = $1";
const INSERT: &str = "INSERT INTO cliente (nome, idade) VALUES ($1, $2) RETURNING id";
const UPDATE: &str = "UPDATE cliente SET nome = $1, idade = $2 WHERE id = $3";
const DELETE: &str = "DELETE FROM cliente WHERE id = $1";

#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        ClientRepository { pool }
    }
}

fn hydrate(row: &PgRow) -> Result<Client, sqlx::Error> {
    Ok(Client {
        id: row.try_get("id")?,
        nome: row.try_get("nome")?,
        idade: row.try_get("idade")?,
    })
}

#[async_trait]
impl Repository<Client> for ClientRepository {
    async fn list_all(&self) -> Result<Vec<Client>, StorageError> {
        tracing::debug!(sql = SELECT_ALL, "query");
        let rows = sqlx::query(SELECT_ALL).fetch_all(&self.pool).await?;
        let clients = rows.iter().map(hydrate).collect::<Result<Vec<_>, _>>()?;
        Ok(clients)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Client>, StorageError> {
        tracing::debug!(sql = SELECT_BY_ID, id, "query");
        let row = sqlx::query(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(hydrate).transpose()?)
    }

    async fn insert(&self, client: &mut Client) -> Result<(), StorageError> {
        tracing::debug!(sql = INSERT, "execute");
        // `None` binds as SQL NULL.
        let id: i64 = sqlx::query_scalar(INSERT)
            .bind(&client.nome)
            .bind(client.idade)
            .fetch_one(&self.pool)
            .await?;
        client.id = id;
        Ok(())
    }

    async fn update(&self, client: &Client) -> Result<(), StorageError> {
        tracing::debug!(sql = UPDATE, id = client.id, "execute");
        let result = sqlx::query(UPDATE)
            .bind(&client.nome)
            .bind(client.idade)
            .bind(client.id)
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
