//! Entity CRUD handlers: list, read, create, update, delete.
//!
//! One generic implementation serves every resource; the per-resource parts (path, repository,
//! messages) come from [`Resource`].

use crate::error::{AppError, StorageError};
use crate::state::AppState;
use crate::store::Repository;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;

/// Client-facing messages a resource has to provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    NotFound(i64),
    MissingForUpdate,
    MissingForDelete,
    ListFailed,
    ReadFailed,
    CreateFailed,
    UpdateFailed,
    DeleteFailed,
    /// Delete rejected because other rows still reference this one.
    DeleteConflict,
}

pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection path segment, e.g. `generos`.
    const PATH: &'static str;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    fn repository(state: &AppState) -> &dyn Repository<Self>;

    fn message(message: Message) -> String;
}

/// Ids are validated before any storage access.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| AppError::InvalidId)
}

/// Log the detail, answer with the resource's short message.
fn internal<E: Resource>(message: Message, err: impl Display) -> AppError {
    tracing::error!(resource = E::PATH, error = %err, "request failed");
    AppError::Internal(E::message(message))
}

fn parse_body<E: Resource>(body: &Bytes, on_error: Message) -> Result<E, AppError> {
    serde_json::from_slice(body).map_err(|e| internal::<E>(on_error, e))
}

async fn ensure_exists<E: Resource>(
    repo: &dyn Repository<E>,
    id: i64,
    missing: Message,
    on_error: Message,
) -> Result<(), AppError> {
    match repo.get_by_id(id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(AppError::NotFound(E::message(missing))),
        Err(e) => Err(internal::<E>(on_error, e)),
    }
}

/// Read the row back after a write so embedded references are hydrated.
async fn stored<E: Resource>(repo: &dyn Repository<E>, written: E, on_error: Message) -> Result<E, AppError> {
    let row = repo
        .get_by_id(written.id())
        .await
        .map_err(|e| internal::<E>(on_error, e))?;
    Ok(row.unwrap_or(written))
}

pub async fn list<E: Resource>(State(state): State<AppState>) -> Result<Json<Vec<E>>, AppError> {
    let rows = E::repository(&state)
        .list_all()
        .await
        .map_err(|e| internal::<E>(Message::ListFailed, e))?;
    Ok(Json(rows))
}

pub async fn read<E: Resource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<E>, AppError> {
    let id = parse_id(&id_str)?;
    let row = E::repository(&state)
        .get_by_id(id)
        .await
        .map_err(|e| internal::<E>(Message::ReadFailed, e))?
        .ok_or_else(|| AppError::NotFound(E::message(Message::NotFound(id))))?;
    Ok(Json(row))
}

pub async fn create<E: Resource>(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<E>), AppError> {
    let mut entity: E = parse_body(&body, Message::CreateFailed)?;
    let repo = E::repository(&state);
    repo.insert(&mut entity)
        .await
        .map_err(|e| internal::<E>(Message::CreateFailed, e))?;
    tracing::info!(resource = E::PATH, id = entity.id(), "created");
    let entity = stored(repo, entity, Message::CreateFailed).await?;
    Ok((StatusCode::CREATED, Json(entity)))
}

pub async fn update<E: Resource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Bytes,
) -> Result<Json<E>, AppError> {
    let id = parse_id(&id_str)?;
    let repo = E::repository(&state);
    ensure_exists(repo, id, Message::MissingForUpdate, Message::UpdateFailed).await?;
    let mut entity: E = parse_body(&body, Message::UpdateFailed)?;
    // The path decides which row is written, whatever the body says.
    entity.set_id(id);
    repo.update(&entity).await.map_err(|e| match e {
        StorageError::NotFound => AppError::NotFound(E::message(Message::MissingForUpdate)),
        other => internal::<E>(Message::UpdateFailed, other),
    })?;
    tracing::info!(resource = E::PATH, id, "updated");
    let entity = stored(repo, entity, Message::UpdateFailed).await?;
    Ok(Json(entity))
}

pub async fn delete<E: Resource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id_str)?;
    let repo = E::repository(&state);
    ensure_exists(repo, id, Message::MissingForDelete, Message::DeleteFailed).await?;
    repo.delete(id).await.map_err(|e| match e {
        StorageError::NotFound => AppError::NotFound(E::message(Message::MissingForDelete)),
        StorageError::ConstraintViolation(constraint) => {
            tracing::warn!(resource = E::PATH, id, %constraint, "delete blocked by reference");
            AppError::Conflict(E::message(Message::DeleteConflict))
        }
        other => internal::<E>(Message::DeleteFailed, other),
    })?;
    tracing::info!(resource = E::PATH, id, "deleted");
    Ok(StatusCode::NO_CONTENT)
}
