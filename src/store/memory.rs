//! In-process store with the same observable behaviour as the PostgreSQL repositories:
//! monotonically increasing ids, join hydration and foreign-key enforcement.
//!
//! Selected with `DATABASE_URL=memory:` and used by the test-suite.

use super::Repository;
use crate::error::StorageError;
use crate::model::{Client, EntityRef, Game, Genre, Rental};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

struct Table<T> {
    last_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn insert(&mut self, row: T) -> i64 {
        self.last_id += 1;
        self.rows.insert(self.last_id, row);
        self.last_id
    }

    fn replace(&mut self, id: i64, row: T) -> Result<(), StorageError> {
        match self.rows.get_mut(&id) {
            Some(slot) => {
                *slot = row;
                Ok(())
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn remove(&mut self, id: i64) -> Result<(), StorageError> {
        self.rows.remove(&id).map(|_| ()).ok_or(StorageError::NotFound)
    }
}

struct GameRow {
    nome: String,
    preco: f64,
    idade_minima: i32,
    genero_id: Option<i64>,
}

struct RentalRow {
    data_locacao: NaiveDate,
    data_vencimento: NaiveDate,
    jogo_id: Option<i64>,
    cliente_id: Option<i64>,
}

#[derive(Default)]
struct Tables {
    genero: Table<String>,
    cliente: Table<(String, Option<i32>)>,
    jogo: Table<GameRow>,
    locacao: Table<RentalRow>,
}

impl Tables {
    fn game(&self, id: i64, row: &GameRow) -> Game {
        let genero = row.genero_id.map(|gid| EntityRef {
            id: gid,
            nome: self.genero.rows.get(&gid).cloned(),
        });
        Game {
            id,
            nome: row.nome.clone(),
            preco: row.preco,
            idade_minima: row.idade_minima,
            genero,
        }
    }

    fn rental(&self, id: i64, row: &RentalRow) -> Rental {
        let jogo = row.jogo_id.map(|jid| EntityRef {
            id: jid,
            nome: self.jogo.rows.get(&jid).map(|g| g.nome.clone()),
        });
        let cliente = row.cliente_id.map(|cid| EntityRef {
            id: cid,
            nome: self.cliente.rows.get(&cid).map(|c| c.0.clone()),
        });
        Rental {
            id,
            data_locacao: row.data_locacao,
            data_vencimento: row.data_vencimento,
            jogo,
            cliente,
        }
    }

    fn check_links<T>(table: &Table<T>, id: Option<i64>, constraint: &str) -> Result<(), StorageError> {
        match id {
            Some(id) if !table.rows.contains_key(&id) => {
                Err(StorageError::ConstraintViolation(constraint.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn game_row(&self, game: &Game) -> Result<GameRow, StorageError> {
        let genero_id = game.genero.as_ref().map(|g| g.id);
        Self::check_links(&self.genero, genero_id, "jogo_genero_id_fkey")?;
        Ok(GameRow {
            nome: game.nome.clone(),
            preco: game.preco,
            idade_minima: game.idade_minima,
            genero_id,
        })
    }

    fn rental_row(&self, rental: &Rental) -> Result<RentalRow, StorageError> {
        let jogo_id = rental.jogo.as_ref().map(|j| j.id);
        let cliente_id = rental.cliente.as_ref().map(|c| c.id);
        Self::check_links(&self.jogo, jogo_id, "locacao_jogo_id_fkey")?;
        Self::check_links(&self.cliente, cliente_id, "locacao_cliente_id_fkey")?;
        Ok(RentalRow {
            data_locacao: rental.data_locacao,
            data_vencimento: rental.data_vencimento,
            jogo_id,
            cliente_id,
        })
    }
}

/// Cheap to clone; clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<Genre> for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Genre>, StorageError> {
        let t = self.tables.lock().await;
        Ok(t.genero
            .rows
            .iter()
            .map(|(id, nome)| Genre {
                id: *id,
                nome: nome.clone(),
            })
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Genre>, StorageError> {
        let t = self.tables.lock().await;
        Ok(t.genero.rows.get(&id).map(|nome| Genre {
            id,
            nome: nome.clone(),
        }))
    }

    async fn insert(&self, genre: &mut Genre) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        let nome = genre.nome.clone();
        genre.id = t.genero.insert(nome);
        Ok(())
    }

    async fn update(&self, genre: &Genre) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.genero.replace(genre.id, genre.nome.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        if t.jogo.rows.values().any(|g| g.genero_id == Some(id)) {
            return Err(StorageError::ConstraintViolation("jogo_genero_id_fkey".into()));
        }
        t.genero.remove(id)
    }
}

#[async_trait]
impl Repository<Client> for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Client>, StorageError> {
        let t = self.tables.lock().await;
        Ok(t.cliente
            .rows
            .iter()
            .map(|(id, (nome, idade))| Client {
                id: *id,
                nome: nome.clone(),
                idade: *idade,
            })
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Client>, StorageError> {
        let t = self.tables.lock().await;
        Ok(t.cliente.rows.get(&id).map(|(nome, idade)| Client {
            id,
            nome: nome.clone(),
            idade: *idade,
        }))
    }

    async fn insert(&self, client: &mut Client) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        let row = (client.nome.clone(), client.idade);
        client.id = t.cliente.insert(row);
        Ok(())
    }

    async fn update(&self, client: &Client) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.cliente.replace(client.id, (client.nome.clone(), client.idade))
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        if t.locacao.rows.values().any(|r| r.cliente_id == Some(id)) {
            return Err(StorageError::ConstraintViolation("locacao_cliente_id_fkey".into()));
        }
        t.cliente.remove(id)
    }
}

#[async_trait]
impl Repository<Game> for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Game>, StorageError> {
        let t = self.tables.lock().await;
        Ok(t.jogo.rows.iter().map(|(id, row)| t.game(*id, row)).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Game>, StorageError> {
        let t = self.tables.lock().await;
        Ok(t.jogo.rows.get(&id).map(|row| t.game(id, row)))
    }

    async fn insert(&self, game: &mut Game) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        let row = t.game_row(game)?;
        game.id = t.jogo.insert(row);
        Ok(())
    }

    async fn update(&self, game: &Game) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        let row = t.game_row(game)?;
        t.jogo.replace(game.id, row)
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        if t.locacao.rows.values().any(|r| r.jogo_id == Some(id)) {
            return Err(StorageError::ConstraintViolation("locacao_jogo_id_fkey".into()));
        }
        t.jogo.remove(id)
    }
}

#[async_trait]
impl Repository<Rental> for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Rental>, StorageError> {
        let t = self.tables.lock().await;
        Ok(t.locacao.rows.iter().map(|(id, row)| t.rental(*id, row)).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Rental>, StorageError> {
        let t = self.tables.lock().await;
        Ok(t.locacao.rows.get(&id).map(|row| t.rental(id, row)))
    }

    async fn insert(&self, rental: &mut Rental) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        let row = t.rental_row(rental)?;
        rental.id = t.locacao.insert(row);
        Ok(())
    }

    async fn update(&self, rental: &Rental) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        let row = t.rental_row(rental)?;
        t.locacao.replace(rental.id, row)
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.locacao.remove(id)
    }
}
