// src/handlers/items.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::{error::AppError, extract::AppJson},
    config::AppState,
    models::inventory::{InventoryItem, InventoryItemPayload, ItemFilter},
};

#[utoipa::path(
    post,
    path = "/items/",
    tag = "Items",
    request_body = InventoryItemPayload,
    responses(
        (status = 201, description = "Item criado", body = InventoryItem),
        (status = 400, description = "Dados inválidos ou inventário inexistente")
    )
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<InventoryItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    let item = app_state.item_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    get,
    path = "/items/",
    tag = "Items",
    params(ItemFilter),
    responses((status = 200, body = Vec<InventoryItem>))
)]
pub async fn list_items(
    State(app_state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.item_service.list(filter.inventory_id).await?))
}

#[utoipa::path(
    get,
    path = "/items/{id}/",
    tag = "Items",
    params(("id" = i64, Path, description = "Id do item")),
    responses(
        (status = 200, body = InventoryItem),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn get_item(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.item_service.get(id).await?))
}

// `currentRoom: null` limpa a sala atual; omitir o campo mantém o valor
#[utoipa::path(
    put,
    path = "/items/{id}/",
    tag = "Items",
    params(("id" = i64, Path, description = "Id do item")),
    request_body = InventoryItemPayload,
    responses(
        (status = 200, body = InventoryItem),
        (status = 400, description = "Dados inválidos ou inventário inexistente"),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<InventoryItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.item_service.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/items/{id}/",
    tag = "Items",
    params(("id" = i64, Path, description = "Id do item")),
    responses(
        (status = 204, description = "Removido"),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.item_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
