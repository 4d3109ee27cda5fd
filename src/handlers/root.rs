// src/handlers/root.rs

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::{config::AppState, docs::ApiDoc};

/// Índice da API com a URL de cada recurso.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiRoot {
    #[schema(example = "http://localhost:8000/users/")]
    pub users: String,
    #[schema(example = "http://localhost:8000/inventories/")]
    pub inventories: String,
    #[schema(example = "http://localhost:8000/items/")]
    pub items: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Root",
    responses((status = 200, body = ApiRoot))
)]
pub async fn api_root(State(app_state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let base = format!("http://{}{}", host, app_state.settings.api_prefix);

    Json(ApiRoot {
        users: format!("{base}/users/"),
        inventories: format!("{base}/inventories/"),
        items: format!("{base}/items/"),
    })
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
