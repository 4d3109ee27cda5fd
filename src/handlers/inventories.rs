// src/handlers/inventories.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::{error::AppError, extract::AppJson},
    config::AppState,
    models::inventory::{Inventory, InventoryFilter, InventoryPayload},
};

#[utoipa::path(
    post,
    path = "/inventories/",
    tag = "Inventories",
    request_body = InventoryPayload,
    responses(
        (status = 201, description = "Inventário criado", body = Inventory),
        (status = 400, description = "Dados inválidos ou usuário inexistente")
    )
)]
pub async fn create_inventory(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<InventoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    let inventory = app_state.inventory_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(inventory)))
}

#[utoipa::path(
    get,
    path = "/inventories/",
    tag = "Inventories",
    params(InventoryFilter),
    responses((status = 200, body = Vec<Inventory>))
)]
pub async fn list_inventories(
    State(app_state): State<AppState>,
    Query(filter): Query<InventoryFilter>,
) -> Result<impl IntoResponse, AppError> {
    let inventories = app_state.inventory_service.list(filter.user_id).await?;
    Ok(Json(inventories))
}

#[utoipa::path(
    get,
    path = "/inventories/{id}/",
    tag = "Inventories",
    params(("id" = i64, Path, description = "Id do inventário")),
    responses(
        (status = 200, body = Inventory),
        (status = 404, description = "Inventário não encontrado")
    )
)]
pub async fn get_inventory(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.inventory_service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/inventories/{id}/",
    tag = "Inventories",
    params(("id" = i64, Path, description = "Id do inventário")),
    request_body = InventoryPayload,
    responses(
        (status = 200, body = Inventory),
        (status = 400, description = "Dados inválidos ou usuário inexistente"),
        (status = 404, description = "Inventário não encontrado")
    )
)]
pub async fn update_inventory(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<InventoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.inventory_service.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/inventories/{id}/",
    tag = "Inventories",
    params(("id" = i64, Path, description = "Id do inventário")),
    responses(
        (status = 204, description = "Removido"),
        (status = 404, description = "Inventário não encontrado"),
        (status = 409, description = "O inventário ainda possui itens")
    )
)]
pub async fn delete_inventory(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.inventory_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
