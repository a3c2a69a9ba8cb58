//! Per-resource wiring of the handler contract: path, repository and messages.

use super::entity::{Message, Resource};
use crate::model::{Client, Game, Genre, Rental};
use crate::state::AppState;
use crate::store::Repository;

impl Resource for Genre {
    const PATH: &'static str = "generos";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn repository(state: &AppState) -> &dyn Repository<Self> {
        state.genres.as_ref()
    }

    fn message(message: Message) -> String {
        match message {
            Message::NotFound(id) => format!("Gênero com ID {} não encontrado", id),
            Message::MissingForUpdate => "Gênero não encontrado para atualização.".into(),
            Message::MissingForDelete => "Gênero não encontrado para exclusão.".into(),
            Message::ListFailed => "Erro ao listar gêneros.".into(),
            Message::ReadFailed => "Erro ao buscar gênero.".into(),
            Message::CreateFailed => "Erro ao criar gênero.".into(),
            Message::UpdateFailed => "Erro ao atualizar gênero.".into(),
            Message::DeleteFailed => "Erro ao deletar gênero.".into(),
            Message::DeleteConflict => {
                "Não é possível excluir o gênero. Ele está sendo usado por um ou mais jogos.".into()
            }
        }
    }
}

impl Resource for Client {
    const PATH: &'static str = "clientes";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn repository(state: &AppState) -> &dyn Repository<Self> {
        state.clients.as_ref()
    }

    fn message(message: Message) -> String {
        match message {
            Message::NotFound(id) => format!("Cliente com ID {} não encontrado", id),
            Message::MissingForUpdate => "Cliente não encontrado para atualização.".into(),
            Message::MissingForDelete => "Cliente não encontrado para exclusão.".into(),
            Message::ListFailed => "Erro ao listar clientes.".into(),
            Message::ReadFailed => "Erro ao buscar cliente.".into(),
            Message::CreateFailed => "Erro ao criar cliente.".into(),
            Message::UpdateFailed => "Erro ao atualizar cliente.".into(),
            Message::DeleteFailed => "Erro ao deletar cliente.".into(),
            Message::DeleteConflict => {
                "Não é possível excluir o cliente. Ele possui uma ou mais locações.".into()
            }
        }
    }
}

impl Resource for Game {
    const PATH: &'static str = "jogos";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn repository(state: &AppState) -> &dyn Repository<Self> {
        state.games.as_ref()
    }

    fn message(message: Message) -> String {
        match message {
            Message::NotFound(id) => format!("Jogo com ID {} não encontrado", id),
            Message::MissingForUpdate => "Jogo não encontrado para atualização.".into(),
            Message::MissingForDelete => "Jogo não encontrado para exclusão.".into(),
            Message::ListFailed => "Erro ao listar jogos.".into(),
            Message::ReadFailed => "Erro ao buscar jogo.".into(),
            Message::CreateFailed => "Erro ao criar jogo.".into(),
            Message::UpdateFailed => "Erro ao atualizar jogo.".into(),
            Message::DeleteFailed => "Erro ao deletar jogo.".into(),
            Message::DeleteConflict => {
                "Não é possível excluir o jogo. Ele está sendo usado em uma ou mais locações.".into()
            }
        }
    }
}

impl Resource for Rental {
    const PATH: &'static str = "locacoes";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn repository(state: &AppState) -> &dyn Repository<Self> {
        state.rentals.as_ref()
    }

    fn message(message: Message) -> String {
        match message {
            Message::NotFound(id) => format!("Locação com ID {} não encontrada", id),
            Message::MissingForUpdate => "Locação não encontrada para atualização.".into(),
            Message::MissingForDelete => "Locação não encontrada para exclusão.".into(),
            Message::ListFailed => "Erro ao listar locações.".into(),
            Message::ReadFailed => "Erro ao buscar locação.".into(),
            Message::CreateFailed => "Erro ao criar locação.".into(),
            Message::UpdateFailed => "Erro ao atualizar locação.".into(),
            Message::DeleteFailed => "Erro ao deletar locação.".into(),
            // No table references locacao.
            Message::DeleteConflict => "Não é possível excluir a locação.".into(),
        }
    }
}
