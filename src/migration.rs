//! Schema bootstrap. Foreign keys keep the default `NO ACTION`, so deleting a referenced row fails.

use crate::error::StorageError;
use sqlx::PgPool;

const TABLES: &[(&str, &str)] = &[
    (
        "genero",
        r#"
        CREATE TABLE IF NOT EXISTS genero (
            id BIGSERIAL PRIMARY KEY,
            nome TEXT NOT NULL
        )
        "#,
    ),
    (
        "cliente",
        r#"
        CREATE TABLE IF NOT EXISTS cliente (
            id BIGSERIAL PRIMARY KEY,
            nome TEXT NOT NULL,
            idade INTEGER
        )
        "#,
    ),
    (
        "jogo",
        r#"
        CREATE TABLE IF NOT EXISTS jogo (
            id BIGSERIAL PRIMARY KEY,
            nome TEXT NOT NULL,
            preco NUMERIC(10, 2) NOT NULL,
            idadeMinima INTEGER NOT NULL DEFAULT 0,
            genero_id BIGINT REFERENCES genero (id)
        )
        "#,
    ),
    (
        "locacao",
        r#"
        CREATE TABLE IF NOT EXISTS locacao (
            id BIGSERIAL PRIMARY KEY,
            data_locacao DATE NOT NULL,
            data_devolucao DATE NOT NULL,
            jogo_id BIGINT REFERENCES jogo (id),
            cliente_id BIGINT REFERENCES cliente (id)
        )
        "#,
    ),
];

// Serialises concurrent bootstraps (several instances, parallel test binaries).
const MIGRATION_LOCK: i64 = 0x6c6f_6361_646f_7261;

/// Create the four store tables in dependency order. Idempotent; runs in one transaction.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), StorageError> {
    let mut tx = pool.begin().await.map_err(StorageError::bootstrap("begin migration"))?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MIGRATION_LOCK)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::bootstrap("migration lock"))?;
    for (name, ddl) in TABLES {
        tracing::debug!(table = *name, "ensuring table");
        sqlx::query(ddl).execute(&mut *tx).await.map_err(StorageError::bootstrap(*name))?;
    }
    tx.commit().await.map_err(StorageError::bootstrap("commit migration"))?;
    tracing::info!(tables = TABLES.len(), "schema ready");
    Ok(())
}
