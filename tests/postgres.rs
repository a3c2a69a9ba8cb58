//! PostgreSQL repository tests
//!
//! Run against a disposable database:
//! `DATABASE_URL=postgres://... cargo test --test postgres -- --ignored`
//!
//! Tests share the schema and run in parallel, so each one only asserts on rows it created.

use chrono::NaiveDate;
use locadora_api::store::{self, ClientRepository, GameRepository, GenreRepository, RentalRepository};
use locadora_api::{apply_migrations, Client, EntityRef, Game, Genre, Rental, Repository, StorageError};
use sqlx::PgPool;

// No row ever gets this id.
const MISSING_ID: i64 = i64::MAX;

async fn create_test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
    let pool = store::connect(&url, 4).await.expect("Failed to create test pool");
    apply_migrations(&pool).await.expect("Failed to apply migrations");
    pool
}

async fn is_null(pool: &PgPool, sql: &str, id: i64) -> bool {
    sqlx::query_scalar(sql)
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to inspect row")
}

fn genre(nome: &str) -> Genre {
    Genre {
        id: 0,
        nome: nome.into(),
    }
}

fn game(nome: &str, genero: Option<i64>) -> Game {
    Game {
        id: 0,
        nome: nome.into(),
        preco: 199.9,
        idade_minima: 16,
        genero: genero.map(|id| EntityRef { id, nome: None }),
    }
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

#[tokio::test]
#[ignore] // Requires database setup
async fn genre_repository_crud() {
    let pool = create_test_pool().await;
    let repo = GenreRepository::new(pool);

    let mut rpg = genre("RPG");
    repo.insert(&mut rpg).await.unwrap();
    assert!(rpg.id > 0);
    let mut puzzle = genre("Puzzle");
    repo.insert(&mut puzzle).await.unwrap();
    assert!(puzzle.id > rpg.id);

    assert_eq!(repo.get_by_id(rpg.id).await.unwrap(), Some(rpg.clone()));

    let listed = repo.list_all().await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|g| g.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted, "list is ordered by id");
    assert!(listed.contains(&rpg) && listed.contains(&puzzle));

    rpg.nome = "Ação".into();
    repo.update(&rpg).await.unwrap();
    assert_eq!(repo.get_by_id(rpg.id).await.unwrap().unwrap().nome, "Ação");

    repo.delete(rpg.id).await.unwrap();
    assert_eq!(repo.get_by_id(rpg.id).await.unwrap(), None);

    // zero affected rows
    assert!(matches!(repo.delete(rpg.id).await, Err(StorageError::NotFound)));
    let ghost = Genre {
        id: MISSING_ID,
        nome: "x".into(),
    };
    assert!(matches!(repo.update(&ghost).await, Err(StorageError::NotFound)));

    repo.delete(puzzle.id).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires database setup
async fn client_without_age_stores_null() {
    let pool = create_test_pool().await;
    let repo = ClientRepository::new(pool.clone());

    let mut bruno = Client {
        id: 0,
        nome: "Bruno".into(),
        idade: None,
    };
    repo.insert(&mut bruno).await.unwrap();
    assert!(is_null(&pool, "SELECT idade IS NULL FROM cliente WHERE id = $1", bruno.id).await);
    assert_eq!(repo.get_by_id(bruno.id).await.unwrap(), Some(bruno.clone()));

    bruno.idade = Some(40);
    repo.update(&bruno).await.unwrap();
    assert_eq!(repo.get_by_id(bruno.id).await.unwrap().unwrap().idade, Some(40));

    bruno.idade = None;
    repo.update(&bruno).await.unwrap();
    assert!(is_null(&pool, "SELECT idade IS NULL FROM cliente WHERE id = $1", bruno.id).await);

    repo.delete(bruno.id).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires database setup
async fn game_hydrates_genre_and_price() {
    let pool = create_test_pool().await;
    let genres = GenreRepository::new(pool.clone());
    let games = GameRepository::new(pool.clone());

    let mut rpg = genre("RPG");
    genres.insert(&mut rpg).await.unwrap();

    let mut elden = game("Elden Ring", Some(rpg.id));
    games.insert(&mut elden).await.unwrap();
    let stored = games.get_by_id(elden.id).await.unwrap().unwrap();
    assert_eq!(stored.genero, Some(EntityRef::new(rpg.id, "RPG")));
    assert_eq!(stored.preco, 199.9);
    assert_eq!(stored.idade_minima, 16);
    assert!(games.list_all().await.unwrap().contains(&stored));

    let mut tetris = game("Tetris", None);
    games.insert(&mut tetris).await.unwrap();
    assert!(is_null(&pool, "SELECT genero_id IS NULL FROM jogo WHERE id = $1", tetris.id).await);
    assert_eq!(games.get_by_id(tetris.id).await.unwrap().unwrap().genero, None);

    // unlink, then the genre can go
    elden.genero = None;
    games.update(&elden).await.unwrap();
    assert_eq!(games.get_by_id(elden.id).await.unwrap().unwrap().genero, None);
    genres.delete(rpg.id).await.unwrap();

    games.delete(elden.id).await.unwrap();
    games.delete(tetris.id).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires database setup
async fn referenced_genre_cannot_be_deleted() {
    let pool = create_test_pool().await;
    let genres = GenreRepository::new(pool.clone());
    let games = GameRepository::new(pool);

    let mut rpg = genre("RPG");
    genres.insert(&mut rpg).await.unwrap();
    let mut elden = game("Elden Ring", Some(rpg.id));
    games.insert(&mut elden).await.unwrap();

    match genres.delete(rpg.id).await {
        Err(StorageError::ConstraintViolation(constraint)) => {
            assert_eq!(constraint, "jogo_genero_id_fkey")
        }
        other => panic!("expected a constraint violation, got {:?}", other),
    }
    assert!(genres.get_by_id(rpg.id).await.unwrap().is_some());

    let mut orphan = game("Orphan", Some(MISSING_ID));
    assert!(matches!(
        games.insert(&mut orphan).await,
        Err(StorageError::ConstraintViolation(_))
    ));

    games.delete(elden.id).await.unwrap();
    genres.delete(rpg.id).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires database setup
async fn rental_links_are_partial_and_nullable() {
    let pool = create_test_pool().await;
    let games = GameRepository::new(pool.clone());
    let clients = ClientRepository::new(pool.clone());
    let rentals = RentalRepository::new(pool.clone());

    let mut elden = game("Elden Ring", None);
    games.insert(&mut elden).await.unwrap();
    let mut ana = Client {
        id: 0,
        nome: "Ana".into(),
        idade: Some(31),
    };
    clients.insert(&mut ana).await.unwrap();

    let mut linked = Rental {
        id: 0,
        data_locacao: date(1),
        data_vencimento: date(8),
        jogo: Some(EntityRef {
            id: elden.id,
            nome: None,
        }),
        cliente: Some(EntityRef {
            id: ana.id,
            nome: None,
        }),
    };
    rentals.insert(&mut linked).await.unwrap();
    let stored = rentals.get_by_id(linked.id).await.unwrap().unwrap();
    assert_eq!(stored.jogo, Some(EntityRef::new(elden.id, "Elden Ring")));
    assert_eq!(stored.cliente, Some(EntityRef::new(ana.id, "Ana")));
    assert_eq!(stored.data_vencimento, date(8));

    let mut bare = Rental {
        id: 0,
        data_locacao: date(2),
        data_vencimento: date(9),
        jogo: None,
        cliente: None,
    };
    rentals.insert(&mut bare).await.unwrap();
    assert!(
        is_null(
            &pool,
            "SELECT jogo_id IS NULL AND cliente_id IS NULL FROM locacao WHERE id = $1",
            bare.id
        )
        .await
    );
    let listed = rentals.list_all().await.unwrap();
    let bare_row = listed.iter().find(|r| r.id == bare.id).expect("rental without links is listed");
    assert_eq!((bare_row.jogo.as_ref(), bare_row.cliente.as_ref()), (None, None));

    assert!(matches!(
        clients.delete(ana.id).await,
        Err(StorageError::ConstraintViolation(c)) if c == "locacao_cliente_id_fkey"
    ));
    assert!(matches!(
        games.delete(elden.id).await,
        Err(StorageError::ConstraintViolation(c)) if c == "locacao_jogo_id_fkey"
    ));

    linked.jogo = None;
    rentals.update(&linked).await.unwrap();
    games.delete(elden.id).await.unwrap();

    rentals.delete(linked.id).await.unwrap();
    rentals.delete(bare.id).await.unwrap();
    clients.delete(ana.id).await.unwrap();
}
