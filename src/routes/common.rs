//! Common routes: capability listing, health, readiness, version.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Html, routing::get, Json, Router};
use serde::Serialize;

const INDEX_HTML: &str = "<h1>API de Locadora de Jogos</h1>\
<p>Endpoints disponíveis:</p>\
<h2>Locações</h2><ul>\
<li>GET /locacoes - Listar todas as locações</li>\
<li>GET /locacoes/:id - Buscar locação por ID</li>\
<li>POST /locacoes - Criar nova locação</li>\
<li>PUT /locacoes/:id - Atualizar locação</li>\
<li>DELETE /locacoes/:id - Deletar locação</li>\
</ul>\
<h2>Jogos</h2><ul>\
<li>GET /jogos - Listar todos os jogos</li>\
<li>GET /jogos/:id - Buscar jogo por ID</li>\
<li>POST /jogos - Criar novo jogo</li>\
<li>PUT /jogos/:id - Atualizar jogo</li>\
<li>DELETE /jogos/:id - Deletar jogo</li>\
</ul>\
<h2>Clientes</h2><ul>\
<li>GET /clientes - Listar todos os clientes</li>\
<li>GET /clientes/:id - Buscar cliente por ID</li>\
<li>POST /clientes - Criar novo cliente</li>\
<li>PUT /clientes/:id - Atualizar cliente</li>\
<li>DELETE /clientes/:id - Deletar cliente</li>\
</ul>\
<h2>Gêneros</h2><ul>\
<li>GET /generos - Listar todos os gêneros</li>\
<li>GET /generos/:id - Buscar gênero por ID</li>\
<li>POST /generos - Criar novo gênero</li>\
<li>PUT /generos/:id - Atualizar gênero</li>\
<li>DELETE /generos/:id - Deletar gênero</li>\
</ul>";

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    database: &'static str,
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(State(state): State<AppState>) -> Result<Json<ReadyBody>, (StatusCode, Json<ReadyBody>)> {
    let Some(pool) = &state.pool else {
        return Ok(Json(ReadyBody {
            status: "ok",
            database: "memory",
        }));
    };
    if let Err(e) = sqlx::query("SELECT 1").fetch_optional(pool).await {
        tracing::warn!(error = %e, "readiness probe failed");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                database: "unavailable",
            }),
        ));
    }
    Ok(Json(ReadyBody {
        status: "ok",
        database: "ok",
    }))
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /, /health, /ready, /version.
pub fn common_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
}
