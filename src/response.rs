//! Response shaping shared by every route.

use crate::error::{AppError, ErrorBody};
use axum::{
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

pub const APPLICATION_JSON: &str = "application/json";

/// Force `application/json` on every response except the HTML index and bodiless 204s.
///
/// Error responses produced outside the handlers (unknown route, wrong method, oversized body)
/// get their body replaced by `{"message": ...}` so every error has the same shape.
pub async fn json_content_type(req: Request, next: Next) -> Response {
    let is_index = req.uri().path() == "/";
    let res = next.run(req).await;
    let status = res.status();
    if is_index || status == StatusCode::NO_CONTENT {
        return res;
    }
    if (status.is_client_error() || status.is_server_error()) && !is_json(&res) {
        return with_message(res, status);
    }
    let mut res = res;
    res.headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    res
}

fn is_json(res: &Response) -> bool {
    res.headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(APPLICATION_JSON.as_bytes()))
}

/// Keeps status and headers (e.g. `Allow` on 405), swaps the body.
fn with_message(res: Response, status: StatusCode) -> Response {
    let message = match status {
        StatusCode::NOT_FOUND => "Recurso não encontrado.",
        StatusCode::METHOD_NOT_ALLOWED => "Método não permitido.",
        StatusCode::PAYLOAD_TOO_LARGE => "Corpo da requisição muito grande.",
        other => other.canonical_reason().unwrap_or("Erro."),
    };
    let (mut parts, _) = res.into_parts();
    let (json_parts, body) = Json(ErrorBody {
        message: message.to_string(),
    })
    .into_response()
    .into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    if let Some(ct) = json_parts.headers.get(header::CONTENT_TYPE) {
        parts.headers.insert(header::CONTENT_TYPE, ct.clone());
    }
    Response::from_parts(parts, body)
}

/// Router fallback for paths no route matches.
pub async fn route_not_found() -> AppError {
    AppError::NotFound("Recurso não encontrado.".into())
}
