//! Store entities as exchanged over HTTP.
//!
//! Field names follow the public JSON API. Ids are server-assigned; an entity that has not been
//! stored yet carries `id == 0`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reference to another resource embedded in an entity.
///
/// Requests only need the `id` (`{"id": 1}`); hydrated responses also carry the `nome`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
}

impl EntityRef {
    pub fn new(id: i64, nome: impl Into<String>) -> Self {
        EntityRef {
            id,
            nome: Some(nome.into()),
        }
    }

    /// Builds a hydrated reference from a joined row. A NULL key means there is nothing linked.
    pub fn from_join(id: Option<i64>, nome: Option<String>) -> Option<Self> {
        id.map(|id| EntityRef { id, nome })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub id: i64,
    pub nome: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default)]
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub idade: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    #[serde(default)]
    pub id: i64,
    pub nome: String,
    pub preco: f64,
    pub idade_minima: i32,
    #[serde(default)]
    pub genero: Option<EntityRef>,
}

/// A rental. The embedded game and client are partial (id and name only).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    #[serde(default)]
    pub id: i64,
    pub data_locacao: NaiveDate,
    pub data_vencimento: NaiveDate,
    #[serde(default)]
    pub jogo: Option<EntityRef>,
    #[serde(default)]
    pub cliente: Option<EntityRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn game_accepts_bare_genre_reference() {
        let game: Game = serde_json::from_value(json!({
            "nome": "Elden Ring",
            "preco": 250.0,
            "idadeMinima": 18,
            "genero": {"id": 1}
        }))
        .unwrap();
        assert_eq!(game.id, 0);
        assert_eq!(game.genero, Some(EntityRef { id: 1, nome: None }));
    }

    #[test]
    fn missing_genre_serializes_as_null() {
        let game = Game {
            id: 3,
            nome: "Tetris".into(),
            preco: 9.9,
            idade_minima: 0,
            genero: None,
        };
        let v = serde_json::to_value(&game).unwrap();
        assert_eq!(v["genero"], serde_json::Value::Null);
        assert_eq!(v["idadeMinima"], json!(0));
    }

    #[test]
    fn rental_dates_are_iso() {
        let rental: Rental = serde_json::from_value(json!({
            "dataLocacao": "2024-03-01",
            "dataVencimento": "2024-03-08",
            "jogo": {"id": 2},
            "cliente": {"id": 5}
        }))
        .unwrap();
        assert_eq!(rental.data_locacao, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let v = serde_json::to_value(&rental).unwrap();
        assert_eq!(v["dataVencimento"], json!("2024-03-08"));
        assert_eq!(v["cliente"], json!({"id": 5}));
    }

    #[test]
    fn client_age_is_optional() {
        let client: Client = serde_json::from_value(json!({"nome": "Ana"})).unwrap();
        assert_eq!(client.idade, None);
    }

    #[test]
    fn null_join_key_yields_no_reference() {
        assert_eq!(EntityRef::from_join(None, Some("RPG".into())), None);
        assert_eq!(
            EntityRef::from_join(Some(1), Some("RPG".into())),
            Some(EntityRef::new(1, "RPG"))
        );
    }
}
